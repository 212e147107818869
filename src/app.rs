use glam::{Mat4, Vec3};

use crate::camera::{CameraRig, FrameInput};
use crate::input::InputState;
use crate::scene::{DrawItem, MeshId};

/// World transform of the ground plane; constant for the session.
pub fn ground_world() -> Mat4 {
    Mat4::from_scale(Vec3::new(10.0, 1.0, 10.0))
}

/// The fixed two-object draw list for the current camera state.
pub fn frame_draw_items(rig: &CameraRig) -> [DrawItem; 2] {
    [
        DrawItem {
            mesh: MeshId::Crate,
            world: rig.crate_world(),
        },
        DrawItem {
            mesh: MeshId::Ground,
            world: ground_world(),
        },
    ]
}

/// Polls the shared input snapshot and advances the rig by one frame.
pub fn advance_frame(rig: &mut CameraRig, input: &InputState) {
    rig.update(&FrameInput::poll(input));
}

pub fn print_final_state(rig: &CameraRig) {
    println!("Final camera state:");
    println!(" - mode {}", rig.mode.digit());
    print_viewpoint("primary", rig.primary.eye, rig.primary.target);
    print_viewpoint("secondary", rig.secondary.eye, rig.secondary.target);
}

fn print_viewpoint(label: &str, eye: Vec3, target: Vec3) {
    println!(
        " - {label} eye=({:.2}, {:.2}, {:.2}) target=({:.2}, {:.2}, {:.2})",
        eye.x, eye.y, eye.z, target.x, target.y, target.z
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraMode;

    #[test]
    fn draw_list_pairs_each_mesh_with_its_transform() {
        let rig = CameraRig::new();
        let items = frame_draw_items(&rig);
        assert_eq!(items[0].mesh, MeshId::Crate);
        assert_eq!(items[0].world, rig.crate_world());
        assert_eq!(items[1].mesh, MeshId::Ground);
        assert_eq!(items[1].world, ground_world());
    }

    #[test]
    fn ground_transform_is_mode_independent() {
        let mut rig = CameraRig::new();
        rig.mode = CameraMode::FreeFly;
        assert_eq!(frame_draw_items(&rig)[1].world, ground_world());
    }

    #[test]
    fn advancing_with_idle_input_changes_nothing() {
        let input = InputState::new();
        let mut rig = CameraRig::new();
        let before = rig.clone();
        advance_frame(&mut rig, &input);
        assert_eq!(rig, before);
    }
}
