use std::fs;
use std::num::NonZeroU64;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::Mat4;
use log::info;
use thiserror::Error;
use wgpu::util::DeviceExt;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::scene::{DrawItem, Lighting, MeshData, Vertex};

/// Adapter configurations tried in order of preference: dedicated hardware
/// first, then low-power hardware, then a software fallback.
const ADAPTER_CANDIDATES: [(wgpu::PowerPreference, bool); 3] = [
    (wgpu::PowerPreference::HighPerformance, false),
    (wgpu::PowerPreference::LowPower, false),
    (wgpu::PowerPreference::LowPower, true),
];

/// Locations of the external assets the renderer loads at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPaths {
    pub shader: PathBuf,
    pub texture: PathBuf,
}

impl AssetPaths {
    /// Resolves the shader and texture below the given assets directory.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            shader: root.join("shaders").join("scene.wgsl"),
            texture: root.join("textures").join("asphalt.png"),
        }
    }
}

/// Fatal startup failures, grouped the way setup can fail.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("window has zero client area")]
    ZeroArea,
    #[error("no compatible GPU adapter ({0} candidate configurations tried)")]
    NoAdapter(usize),
    #[error("failed to create rendering surface")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("failed to create GPU device")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to read shader source {}", path.display())]
    ShaderRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("shader {} failed to compile: {diagnostic}", path.display())]
    ShaderCompile { path: PathBuf, diagnostic: String },
    #[error("failed to load texture {}", path.display())]
    Texture {
        path: PathBuf,
        source: image::ImageError,
    },
}

/// GPU renderer owning the surface, pipeline and the fixed scene buffers.
pub struct Renderer {
    window: Arc<Window>,
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    size: PhysicalSize<u32>,
    depth: DepthBuffer,
    pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    meshes: [MeshBuffers; 2],
}

impl Renderer {
    /// Initializes the device, surface, pipeline and static scene resources.
    ///
    /// Every failure here is fatal for the windowed session; the typed
    /// [`InitError`] distinguishes the window/device/shader/asset classes.
    pub async fn new(window: Arc<Window>, assets: &AssetPaths) -> Result<Self> {
        let size = window.inner_size();
        if size.width == 0 || size.height == 0 {
            return Err(InitError::ZeroArea.into());
        }

        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });
        let surface = unsafe { instance.create_surface(window.as_ref()) }
            .map_err(InitError::Surface)?;

        let mut adapter = None;
        for (power_preference, force_fallback_adapter) in ADAPTER_CANDIDATES {
            if let Some(found) = instance
                .request_adapter(&wgpu::RequestAdapterOptions {
                    power_preference,
                    compatible_surface: Some(&surface),
                    force_fallback_adapter,
                })
                .await
            {
                adapter = Some(found);
                break;
            }
        }
        let adapter = adapter.ok_or(InitError::NoAdapter(ADAPTER_CANDIDATES.len()))?;
        let adapter_info = adapter.get_info();
        info!(
            "using adapter {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("cratewalk-device"),
                    features: wgpu::Features::empty(),
                    limits: wgpu::Limits::downlevel_defaults(),
                },
                None,
            )
            .await
            .map_err(InitError::Device)?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|format| format.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        // Uncapped presentation when the platform allows it.
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .iter()
                .copied()
                .find(|mode| {
                    matches!(
                        mode,
                        wgpu::PresentMode::Mailbox | wgpu::PresentMode::Immediate
                    )
                })
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let depth = DepthBuffer::create(&device, config.width, config.height);

        let shader = compile_shader(&device, &assets.shader).await?;
        let (texture_view, sampler) = load_texture(&device, &queue, &assets.texture)?;

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<FrameUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material-bind-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("object-bind-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(
                        std::mem::size_of::<ObjectUniform>() as u64
                    ),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene-pipeline-layout"),
            bind_group_layouts: &[&frame_layout, &material_layout, &object_layout],
            push_constant_ranges: &[],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let material_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material-bind-group"),
            layout: &material_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        // Solid fill, no culling, depth-tested; the 3-attribute layout must
        // match the Vertex struct byte-for-byte.
        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("scene-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<Vertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 0,
                            shader_location: 0,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x3,
                            offset: 12,
                            shader_location: 1,
                        },
                        wgpu::VertexAttribute {
                            format: wgpu::VertexFormat::Float32x2,
                            offset: 24,
                            shader_location: 2,
                        },
                    ],
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DepthBuffer::FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
        });
        if let Some(error) = device.pop_error_scope().await {
            return Err(InitError::ShaderCompile {
                path: assets.shader.clone(),
                diagnostic: error.to_string(),
            }
            .into());
        }

        let meshes = [
            MeshBuffers::from_data(&device, &MeshData::crate_cube(), "crate"),
            MeshBuffers::from_data(&device, &MeshData::ground_plane(), "ground"),
        ];

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            size,
            depth,
            pipeline,
            frame_buffer,
            frame_bind_group,
            material_bind_group,
            object_layout,
            meshes,
        })
    }

    /// Returns the identifier of the window owned by the renderer.
    pub fn window_id(&self) -> WindowId {
        self.window.id()
    }

    /// Exposes the inner window for event handling.
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Reconfigures the swap chain and depth buffer after a resize.  The
    /// projection matrix is deliberately left alone; only presentation
    /// state is kept valid here.
    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);
        self.depth = DepthBuffer::create(&self.device, new_size.width, new_size.height);
    }

    /// Uploads the combined transform and lighting block for this frame.
    pub fn update_frame(&self, view: Mat4, projection: Mat4, lighting: &Lighting) {
        let uniform = FrameUniform::pack(view, projection, lighting);
        self.queue
            .write_buffer(&self.frame_buffer, 0, bytes_of(&uniform));
    }

    /// Clears the targets and draws the given items in order, then presents.
    pub fn render(&mut self, items: &[DrawItem]) -> Result<(), wgpu::SurfaceError> {
        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("scene-encoder"),
            });

        let object_bind_groups: Vec<wgpu::BindGroup> = items
            .iter()
            .map(|item| {
                let constants = ObjectUniform {
                    world: item.world.to_cols_array_2d(),
                };
                let buffer = self
                    .device
                    .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                        label: Some("object-uniform"),
                        contents: bytes_of(&constants),
                        usage: wgpu::BufferUsages::UNIFORM,
                    });
                self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("object-bind-group"),
                    layout: &self.object_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffer.as_entire_binding(),
                    }],
                })
            })
            .collect();

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            pass.set_bind_group(1, &self.material_bind_group, &[]);

            for (item, bind_group) in items.iter().zip(&object_bind_groups) {
                let mesh = &self.meshes[item.mesh.index()];
                pass.set_vertex_buffer(0, mesh.vertex.slice(..));
                pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint16);
                pass.set_bind_group(2, bind_group, &[]);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

/// Reads and compiles the WGSL source, surfacing the compiler diagnostic
/// on failure instead of letting the device panic.
async fn compile_shader(device: &wgpu::Device, path: &Path) -> Result<wgpu::ShaderModule> {
    let source = fs::read_to_string(path).map_err(|source| InitError::ShaderRead {
        path: path.to_path_buf(),
        source,
    })?;
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("scene-shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    if let Some(error) = device.pop_error_scope().await {
        return Err(InitError::ShaderCompile {
            path: path.to_path_buf(),
            diagnostic: error.to_string(),
        }
        .into());
    }
    info!("compiled shader {}", path.display());
    Ok(module)
}

/// Decodes the ground texture and uploads it once, together with the
/// session's linear wrap sampler.
fn load_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    path: &Path,
) -> Result<(wgpu::TextureView, wgpu::Sampler)> {
    let pixels = image::open(path)
        .map_err(|source| InitError::Texture {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();
    let (width, height) = pixels.dimensions();
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("ground-texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::ImageCopyTexture {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &pixels,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    info!("loaded texture {} ({width}x{height})", path.display());

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some("linear-wrap-sampler"),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    });
    Ok((view, sampler))
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
}

impl MeshBuffers {
    fn from_data(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-vertices")),
            contents: cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}-indices")),
            contents: cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex,
            index,
            index_count: mesh.indices.len() as u32,
        }
    }
}

struct DepthBuffer {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
}

impl DepthBuffer {
    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;

    fn create(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
        }
    }
}

/// Combined per-frame constant block; the field order and padding mirror
/// the `FrameUniform` struct in the WGSL source exactly.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct FrameUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    diffuse_material: [f32; 4],
    diffuse_light: [f32; 4],
    ambient_material: [f32; 4],
    ambient_light: [f32; 4],
    specular_material: [f32; 4],
    specular_light: [f32; 4],
    /// xyz is the light direction, w the specular power.
    light_dir: [f32; 4],
    eye_position: [f32; 4],
}

impl FrameUniform {
    fn pack(view: Mat4, projection: Mat4, lighting: &Lighting) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            projection: projection.to_cols_array_2d(),
            diffuse_material: lighting.diffuse_material.to_array(),
            diffuse_light: lighting.diffuse_light.to_array(),
            ambient_material: lighting.ambient_material.to_array(),
            ambient_light: lighting.ambient_light.to_array(),
            specular_material: lighting.specular_material.to_array(),
            specular_light: lighting.specular_light.to_array(),
            light_dir: lighting.light_dir.extend(lighting.specular_power).to_array(),
            eye_position: lighting.specular_eye.extend(1.0).to_array(),
        }
    }
}

#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
struct ObjectUniform {
    world: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4};

    #[test]
    fn frame_uniform_matches_wgsl_block_size() {
        // 2 mat4x4 + 8 vec4
        assert_eq!(std::mem::size_of::<FrameUniform>(), 2 * 64 + 8 * 16);
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 64);
    }

    #[test]
    fn pack_carries_specular_power_in_light_dir_w() {
        let lighting = Lighting {
            light_dir: Vec3::new(0.0, 1.0, 0.0),
            specular_power: 5.0,
            ..Lighting::default()
        };
        let uniform = FrameUniform::pack(Mat4::IDENTITY, Mat4::IDENTITY, &lighting);
        assert_eq!(uniform.light_dir, [0.0, 1.0, 0.0, 5.0]);
    }

    #[test]
    fn pack_keeps_authored_material_colors() {
        let uniform =
            FrameUniform::pack(Mat4::IDENTITY, Mat4::IDENTITY, &Lighting::default());
        assert_eq!(uniform.ambient_material, Vec4::new(0.6, 0.6, 0.6, 1.0).to_array());
        assert_eq!(uniform.diffuse_light, [1.0; 4]);
    }

    #[test]
    fn asset_paths_resolve_below_root() {
        let assets = AssetPaths::new("assets");
        assert!(assets.shader.ends_with("shaders/scene.wgsl"));
        assert!(assets.texture.ends_with("textures/asphalt.png"));
    }

    #[test]
    fn adapter_exhaustion_reports_candidate_count() {
        let error = InitError::NoAdapter(ADAPTER_CANDIDATES.len());
        assert!(error.to_string().contains("3 candidate"));
    }
}
