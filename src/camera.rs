use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Mat4, Vec3};

use crate::input::{InputState, KeyCode, NamedKey};

/// Per-frame translation step, as a fraction of the eye-to-target direction.
const MOVE_STEP: f32 = 0.01;
/// Per-frame yaw applied to the look target while a turn key is held.
const TURN_STEP: f32 = 0.01;
/// Per-frame height change of the free camera's look target.
const LIFT_STEP: f32 = 0.05;
/// Eye height below which the walking camera counts as lowered.
const HEIGHT_THRESHOLD: f32 = -0.1;
/// Eye height moved when swapping between standing and ground-level modes.
const HEIGHT_SWAP: f32 = 1.5;
/// Target height moved along with a standing/ground-level swap.
const TARGET_SWAP: f32 = 0.05;
/// The crate hangs this far below the primary eye.
const CRATE_DROP: f32 = 1.5;
/// Horizontal distance the crate is pushed ahead in ground-level mode.
const GROUND_PUSH: f32 = 2.0;

/// The four view configurations selectable with the number keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CameraMode {
    /// Key 0: walk the primary camera, crate carried below the eye.
    FirstPerson,
    /// Key 1: primary camera lowered to the ground, crate pushed ahead.
    GroundLevel,
    /// Key 2: view from the secondary camera; it can be flown freely.
    FreeFly,
    /// Key 3: secondary camera frozen where the primary stood; the
    /// primary keeps moving and carries the crate.
    Tripod,
}

impl CameraMode {
    /// Maps a number key (0-3) to its mode.
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            0 => Some(Self::FirstPerson),
            1 => Some(Self::GroundLevel),
            2 => Some(Self::FreeFly),
            3 => Some(Self::Tripod),
            _ => None,
        }
    }

    pub fn digit(self) -> u8 {
        match self {
            Self::FirstPerson => 0,
            Self::GroundLevel => 1,
            Self::FreeFly => 2,
            Self::Tripod => 3,
        }
    }
}

/// An eye position together with the point it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub eye: Vec3,
    pub target: Vec3,
}

impl Viewpoint {
    fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    /// Unit vector from the eye toward the target, or zero when degenerate.
    pub fn direction(&self) -> Vec3 {
        let offset = self.target - self.eye;
        if offset.length_squared() <= f32::EPSILON {
            Vec3::ZERO
        } else {
            offset.normalize()
        }
    }

    /// The per-frame movement step along the view direction.
    pub fn step(&self) -> Vec3 {
        self.direction() * MOVE_STEP
    }

    /// Moves eye and target together, keeping their relative offset.
    fn translate(&mut self, delta: Vec3) {
        self.eye += delta;
        self.target += delta;
    }

    /// Rotates the target around the eye by `angle` radians about +Y.
    fn turn(&mut self, angle: f32) {
        let offset = self.target - self.eye;
        self.target = self.eye + Mat3::from_rotation_y(angle) * offset;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }
}

/// Key states sampled once per frame.  Keys are polled, not consumed: a key
/// held across frames re-triggers its branch every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub forward: bool,
    pub back: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub fly: bool,
    pub select: Option<CameraMode>,
}

impl FrameInput {
    /// Samples the shared input snapshot for this frame.
    pub fn poll(input: &InputState) -> Self {
        let mut select = None;
        for digit in 0..=3 {
            if input.is_key_down(KeyCode::Digit(digit)) {
                select = CameraMode::from_digit(digit);
            }
        }
        Self {
            forward: input.is_key_down(KeyCode::Named(NamedKey::Up)),
            back: input.is_key_down(KeyCode::Named(NamedKey::Down)),
            turn_left: input.is_key_down(KeyCode::Named(NamedKey::Left)),
            turn_right: input.is_key_down(KeyCode::Named(NamedKey::Right)),
            fly: input.is_key_down(KeyCode::Named(NamedKey::Space)),
            select,
        }
    }
}

/// Both viewpoints plus the discrete mode selector.
///
/// The rig is the whole mutable state of the demo; [`CameraRig::update`] is a
/// pure function of the previous state and the frame's key snapshot, and each
/// viewpoint's movement is derived only from that viewpoint's own state.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    pub primary: Viewpoint,
    pub secondary: Viewpoint,
    pub mode: CameraMode,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraRig {
    pub fn new() -> Self {
        let start = Viewpoint::new(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO);
        Self {
            primary: start,
            secondary: start,
            mode: CameraMode::FirstPerson,
        }
    }

    /// Advances the rig by one frame.
    ///
    /// Movement keys run first, then a mode switch if one is requested; any
    /// mode may follow any mode.  With no keys held this is the identity.
    pub fn update(&mut self, input: &FrameInput) {
        let step = self.primary.step();
        let step2 = self.secondary.step();
        let walking = matches!(
            self.mode,
            CameraMode::FirstPerson | CameraMode::GroundLevel | CameraMode::Tripod
        );

        if input.forward {
            if walking {
                self.primary.translate(Vec3::new(step.x, 0.0, step.z));
            } else {
                self.secondary.target.y += LIFT_STEP;
            }
        }
        if input.back {
            if walking {
                self.primary.translate(Vec3::new(-step.x, 0.0, -step.z));
            } else {
                self.secondary.target.y -= LIFT_STEP;
            }
        }
        // Turning right is a clockwise yaw seen from above.
        if input.turn_right {
            if walking {
                self.primary.turn(-TURN_STEP);
            } else {
                self.secondary.turn(-TURN_STEP);
            }
        }
        if input.turn_left {
            if walking {
                self.primary.turn(TURN_STEP);
            } else {
                self.secondary.turn(TURN_STEP);
            }
        }
        if input.fly && self.mode == CameraMode::FreeFly {
            self.secondary.translate(step2);
        }

        if let Some(next) = input.select {
            self.select_mode(next, step);
        }
    }

    /// Applies a mode switch and its entry rules.
    ///
    /// Entering the standing or ground-level mode swaps the primary eye
    /// across the height threshold; entering tripod mode freezes the
    /// secondary camera at the primary's current position.
    fn select_mode(&mut self, next: CameraMode, step: Vec3) {
        self.mode = next;
        match next {
            CameraMode::FirstPerson => {
                if self.primary.eye.y < HEIGHT_THRESHOLD {
                    let nudge = step / 10.0;
                    self.primary.eye.y += HEIGHT_SWAP;
                    self.primary.target.y += TARGET_SWAP;
                    self.primary.eye.x -= nudge.x;
                    self.primary.eye.z -= nudge.z;
                    self.primary.target.x -= nudge.x;
                    self.primary.target.z -= nudge.z;
                }
            }
            CameraMode::GroundLevel => {
                if self.primary.eye.y > HEIGHT_THRESHOLD {
                    let nudge = step / 10.0;
                    self.primary.eye.y -= HEIGHT_SWAP;
                    self.primary.target.y -= TARGET_SWAP;
                    self.primary.eye.x += nudge.x;
                    self.primary.eye.z += nudge.z;
                    self.primary.target.x += nudge.x;
                    self.primary.target.z += nudge.z;
                }
            }
            CameraMode::FreeFly => {}
            CameraMode::Tripod => {
                self.secondary.eye = self.primary.eye;
            }
        }
    }

    /// The viewpoint the frame is rendered from.
    pub fn active_viewpoint(&self) -> &Viewpoint {
        match self.mode {
            CameraMode::FirstPerson | CameraMode::GroundLevel => &self.primary,
            CameraMode::FreeFly | CameraMode::Tripod => &self.secondary,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.active_viewpoint().view_matrix()
    }

    /// World transform of the crate, derived from the primary eye and mode.
    pub fn crate_world(&self) -> Mat4 {
        let eye = self.primary.eye;
        match self.mode {
            CameraMode::GroundLevel => {
                let dir = self.primary.direction();
                Mat4::from_translation(Vec3::new(
                    eye.x - GROUND_PUSH * dir.x,
                    eye.y,
                    eye.z - GROUND_PUSH * dir.z,
                ))
            }
            _ => Mat4::from_translation(Vec3::new(eye.x, eye.y - CRATE_DROP, eye.z)),
        }
    }
}

/// Projection for the initial window size.  Computed once at startup and
/// reused for every frame; resizing the window does not re-derive it.
pub fn projection(width: u32, height: u32) -> Mat4 {
    let aspect = width as f32 / height.max(1) as f32;
    Mat4::perspective_rh(FRAC_PI_2, aspect.max(0.01), 0.01, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rig_in_mode(mode: CameraMode) -> CameraRig {
        let mut rig = CameraRig::new();
        rig.mode = mode;
        rig
    }

    #[test]
    fn no_input_update_is_identity_in_every_mode() {
        for mode in [
            CameraMode::FirstPerson,
            CameraMode::GroundLevel,
            CameraMode::FreeFly,
            CameraMode::Tripod,
        ] {
            let mut rig = rig_in_mode(mode);
            let before = rig.clone();
            for _ in 0..10 {
                rig.update(&FrameInput::default());
            }
            assert_eq!(rig, before, "mode {mode:?} drifted with no input");
        }
    }

    #[test]
    fn forward_preserves_eye_to_target_offset() {
        let mut rig = CameraRig::new();
        let offset = rig.primary.target - rig.primary.eye;
        rig.update(&FrameInput {
            forward: true,
            ..FrameInput::default()
        });
        let drift = (rig.primary.target - rig.primary.eye - offset).length();
        assert!(drift < 1e-5, "offset drifted by {drift}");
        assert!(rig.primary.eye.z > -10.0, "forward should move toward the target");
    }

    #[test]
    fn ground_level_entry_lowers_eye_by_exact_swap() {
        let mut rig = CameraRig::new();
        let eye_before = rig.primary.eye;
        let target_before = rig.primary.target;
        rig.update(&FrameInput {
            select: Some(CameraMode::GroundLevel),
            ..FrameInput::default()
        });
        assert_eq!(rig.mode, CameraMode::GroundLevel);
        assert_eq!(rig.primary.eye.y, eye_before.y - 1.5);
        assert_eq!(rig.primary.target.y, target_before.y - 0.05);
    }

    #[test]
    fn ground_level_entry_is_guarded_by_threshold() {
        let mut rig = CameraRig::new();
        rig.primary.eye.y = -0.2;
        let before = rig.primary;
        rig.update(&FrameInput {
            select: Some(CameraMode::GroundLevel),
            ..FrameInput::default()
        });
        assert_eq!(rig.mode, CameraMode::GroundLevel);
        assert_eq!(rig.primary, before, "already-lowered eye must not move");
    }

    #[test]
    fn standing_entry_mirrors_ground_level_entry() {
        let mut rig = rig_in_mode(CameraMode::GroundLevel);
        rig.primary.eye.y = -1.5;
        rig.primary.target.y = -0.05;
        rig.update(&FrameInput {
            select: Some(CameraMode::FirstPerson),
            ..FrameInput::default()
        });
        assert_eq!(rig.mode, CameraMode::FirstPerson);
        assert_eq!(rig.primary.eye.y, 0.0);
        assert_eq!(rig.primary.target.y, 0.0);

        // Above the threshold the swap must not re-apply.
        let before = rig.primary;
        rig.update(&FrameInput {
            select: Some(CameraMode::FirstPerson),
            ..FrameInput::default()
        });
        assert_eq!(rig.primary, before);
    }

    #[test]
    fn tripod_entry_snapshots_primary_eye() {
        let mut rig = CameraRig::new();
        rig.primary.eye = Vec3::new(3.0, 1.0, -4.0);
        let secondary_target = rig.secondary.target;
        rig.update(&FrameInput {
            select: Some(CameraMode::Tripod),
            ..FrameInput::default()
        });
        assert_eq!(rig.secondary.eye, rig.primary.eye);
        assert_eq!(rig.secondary.target, secondary_target);
    }

    #[test]
    fn turning_keeps_eye_and_target_radius() {
        let mut rig = CameraRig::new();
        let eye = rig.primary.eye;
        let radius = (rig.primary.target - eye).length();
        for _ in 0..50 {
            rig.update(&FrameInput {
                turn_right: true,
                ..FrameInput::default()
            });
        }
        assert_eq!(rig.primary.eye, eye);
        let turned = (rig.primary.target - eye).length();
        assert!((turned - radius).abs() < 1e-3);
    }

    #[test]
    fn turn_right_yaws_clockwise_from_above() {
        // Eye at -Z looking toward +Z; screen-right is world -X in a
        // right-handed view, so a right turn pulls the target that way.
        let mut rig = CameraRig::new();
        rig.update(&FrameInput {
            turn_right: true,
            ..FrameInput::default()
        });
        assert!(rig.primary.target.x < 0.0);
        assert_eq!(rig.primary.target.y, 0.0);
    }

    #[test]
    fn free_fly_lift_touches_only_secondary_target_height() {
        let mut rig = rig_in_mode(CameraMode::FreeFly);
        let before = rig.clone();
        rig.update(&FrameInput {
            forward: true,
            ..FrameInput::default()
        });
        assert_eq!(rig.primary, before.primary);
        assert_eq!(rig.secondary.eye, before.secondary.eye);
        assert_eq!(rig.secondary.target.y, before.secondary.target.y + 0.05);
    }

    #[test]
    fn fly_key_moves_secondary_eye_and_target_together() {
        let mut rig = rig_in_mode(CameraMode::FreeFly);
        let offset = rig.secondary.target - rig.secondary.eye;
        rig.update(&FrameInput {
            fly: true,
            ..FrameInput::default()
        });
        let drift = (rig.secondary.target - rig.secondary.eye - offset).length();
        assert!(drift < 1e-5, "offset drifted by {drift}");
        assert_ne!(rig.secondary.eye, CameraRig::new().secondary.eye);
    }

    #[test]
    fn fly_key_is_ignored_outside_free_fly() {
        let mut rig = CameraRig::new();
        let before = rig.clone();
        rig.update(&FrameInput {
            fly: true,
            ..FrameInput::default()
        });
        assert_eq!(rig, before);
    }

    #[test]
    fn crate_world_hangs_below_primary_eye() {
        let rig = CameraRig::new();
        let world = rig.crate_world();
        let translation = world.w_axis.truncate();
        assert_eq!(translation, rig.primary.eye - Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn crate_world_in_ground_level_pushes_ahead() {
        let mut rig = rig_in_mode(CameraMode::GroundLevel);
        rig.primary = Viewpoint::new(Vec3::new(0.0, -1.5, -10.0), Vec3::new(0.0, -0.05, 0.0));
        let translation = rig.crate_world().w_axis.truncate();
        let dir = rig.primary.direction();
        assert!((translation.x - (0.0 - 2.0 * dir.x)).abs() < 1e-6);
        assert_eq!(translation.y, -1.5);
        assert!((translation.z - (-10.0 - 2.0 * dir.z)).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_follows_active_viewpoint() {
        let mut rig = CameraRig::new();
        rig.secondary.eye = Vec3::new(5.0, 2.0, 5.0);
        rig.mode = CameraMode::Tripod;
        assert_eq!(rig.view_matrix(), rig.secondary.view_matrix());
        rig.mode = CameraMode::GroundLevel;
        assert_eq!(rig.view_matrix(), rig.primary.view_matrix());
    }

    #[test]
    fn degenerate_viewpoint_produces_zero_step() {
        let vp = Viewpoint::new(Vec3::ONE, Vec3::ONE);
        assert_eq!(vp.step(), Vec3::ZERO);
    }

    #[test]
    fn digit_round_trips() {
        for digit in 0..=3 {
            let mode = CameraMode::from_digit(digit).unwrap();
            assert_eq!(mode.digit(), digit);
        }
        assert_eq!(CameraMode::from_digit(4), None);
    }

    #[test]
    fn projection_guards_degenerate_sizes() {
        let matrix = projection(1920, 0);
        assert!(matrix.is_finite());
    }
}
