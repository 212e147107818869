//! A small real-time rendering demo: a textured crate and a flat ground
//! plane drawn with wgpu, viewed through a four-mode keyboard camera rig.
//!
//! The crate splits into a pure, headless-testable core (the camera state
//! machine, the scene data, the input snapshot) and a thin GPU layer that
//! owns the window surface and issues the two draw calls per frame.  The
//! binary wires both to a winit event loop and falls back to a headless
//! simulation when no display is available.

pub mod app;
pub mod camera;
pub mod input;
pub mod render;
pub mod scene;

pub use camera::{CameraMode, CameraRig, FrameInput, Viewpoint};
pub use input::{InputState, KeyCode, NamedKey};
pub use render::{AssetPaths, InitError, Renderer};
pub use scene::{DrawItem, Lighting, MeshData, MeshId, Vertex};
