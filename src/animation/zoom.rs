//! The two-state camera flight: overview (`Back`) and close-up (`Zoomed`).

use glam::Vec3;

use crate::animation::easing::Easing;
use crate::animation::tween::Tween;

/// Flight time between the two poses, seconds.
pub const FLIGHT_DURATION: f32 = 0.5;

/// Idle bounce amplitude while in the overview pose.
pub const BOUNCE_AMPLITUDE: f32 = 0.125;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomState {
    Back,
    Zoomed,
}

/// Everything a state pins down: the camera pose, the vertical offsets of
/// the nodes that move with it, and the idle bounce amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseTargets {
    pub camera_position: Vec3,
    pub camera_rotation: Vec3,
    pub group_y: f32,
    pub screen_y: f32,
    pub backing_y: f32,
    pub bounce_amplitude: f32,
}

impl ZoomState {
    pub fn targets(self) -> PoseTargets {
        match self {
            ZoomState::Back => PoseTargets {
                camera_position: Vec3::new(-4.5, 0.0, 18.6),
                camera_rotation: Vec3::ZERO,
                group_y: -4.25,
                screen_y: 1.87,
                backing_y: 2.0,
                bounce_amplitude: BOUNCE_AMPLITUDE,
            },
            ZoomState::Zoomed => PoseTargets {
                camera_position: Vec3::new(0.0, 1.0, 8.0),
                camera_rotation: Vec3::new(-0.12, 0.0, 0.0),
                group_y: -5.75,
                screen_y: 0.37,
                backing_y: 0.5,
                bounce_amplitude: 0.0,
            },
        }
    }
}

/// A snapshot of the animated values, fed back in as the starting point of
/// a new flight so a mid-flight reversal retargets smoothly.
#[derive(Debug, Clone, Copy)]
pub struct CurrentPose {
    pub camera_position: Vec3,
    pub camera_rotation: Vec3,
    pub group_y: f32,
    pub screen_y: f32,
    pub backing_y: f32,
}

struct Flight {
    camera_position: Tween<Vec3>,
    camera_rotation: Tween<Vec3>,
    group_y: Tween<f32>,
    screen_y: Tween<f32>,
    backing_y: Tween<f32>,
}

impl Flight {
    fn toward(targets: &PoseTargets, from: &CurrentPose) -> Self {
        let ease = Easing::QuadraticOut;
        Self {
            camera_position: Tween::new(
                from.camera_position,
                targets.camera_position,
                FLIGHT_DURATION,
                ease,
            ),
            camera_rotation: Tween::new(
                from.camera_rotation,
                targets.camera_rotation,
                FLIGHT_DURATION,
                ease,
            ),
            group_y: Tween::new(from.group_y, targets.group_y, FLIGHT_DURATION, ease),
            screen_y: Tween::new(from.screen_y, targets.screen_y, FLIGHT_DURATION, ease),
            backing_y: Tween::new(from.backing_y, targets.backing_y, FLIGHT_DURATION, ease),
        }
    }
}

/// The zoom state machine. The logical state flips the moment a flight is
/// triggered; the tweens carry the scene there over the next half second.
pub struct ZoomAnimator {
    state: ZoomState,
    flight: Option<Flight>,
    bounce_amplitude: f32,
}

impl ZoomAnimator {
    pub fn new() -> Self {
        Self {
            state: ZoomState::Back,
            flight: None,
            bounce_amplitude: BOUNCE_AMPLITUDE,
        }
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn in_flight(&self) -> bool {
        self.flight.is_some()
    }

    /// Amplitude switches at trigger time, not at flight completion, same
    /// as the original demo.
    pub fn bounce_amplitude(&self) -> f32 {
        self.bounce_amplitude
    }

    /// Starts a flight toward `target`. Triggering the state that is
    /// already active is ignored; triggering the opposite state mid-flight
    /// retargets from the current interpolated values. Returns whether a
    /// flight was started.
    pub fn trigger(&mut self, target: ZoomState, from: &CurrentPose) -> bool {
        if target == self.state {
            return false;
        }

        log::info!("flight: {:?} -> {:?}", self.state, target);

        let targets = target.targets();
        self.flight = Some(Flight::toward(&targets, from));
        self.state = target;
        self.bounce_amplitude = targets.bounce_amplitude;
        true
    }

    /// Advances an active flight, returning the values to apply this
    /// frame. `None` while parked at a pose.
    pub fn advance(&mut self, dt: f32) -> Option<CurrentPose> {
        let flight = self.flight.as_mut()?;

        let applied = CurrentPose {
            camera_position: flight.camera_position.advance(dt),
            camera_rotation: flight.camera_rotation.advance(dt),
            group_y: flight.group_y.advance(dt),
            screen_y: flight.screen_y.advance(dt),
            backing_y: flight.backing_y.advance(dt),
        };

        if flight.camera_position.finished() {
            self.flight = None;
        }

        Some(applied)
    }
}

impl Default for ZoomAnimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn back_pose() -> CurrentPose {
        let targets = ZoomState::Back.targets();
        CurrentPose {
            camera_position: targets.camera_position,
            camera_rotation: targets.camera_rotation,
            group_y: targets.group_y,
            screen_y: targets.screen_y,
            backing_y: targets.backing_y,
        }
    }

    fn run_to_completion(animator: &mut ZoomAnimator) -> CurrentPose {
        let mut last = None;
        for _ in 0..120 {
            match animator.advance(1.0 / 60.0) {
                Some(applied) => last = Some(applied),
                None => break,
            }
        }
        last.expect("flight produced no frames")
    }

    #[test]
    fn starts_in_back_with_bounce() {
        let animator = ZoomAnimator::new();
        assert_eq!(animator.state(), ZoomState::Back);
        assert!(!animator.in_flight());
        assert_eq!(animator.bounce_amplitude(), BOUNCE_AMPLITUDE);
    }

    #[test]
    fn zoom_flight_lands_on_the_zoomed_pose() {
        let mut animator = ZoomAnimator::new();
        assert!(animator.trigger(ZoomState::Zoomed, &back_pose()));
        assert_eq!(animator.state(), ZoomState::Zoomed);
        assert_eq!(animator.bounce_amplitude(), 0.0);

        let landed = run_to_completion(&mut animator);
        assert!(!animator.in_flight());

        // Exact arrival: the spec scenario pose, no drift.
        assert_eq!(landed.camera_position, Vec3::new(0.0, 1.0, 8.0));
        assert_eq!(landed.camera_rotation, Vec3::new(-0.12, 0.0, 0.0));
        assert_eq!(landed.group_y, -5.75);
        assert_eq!(landed.screen_y, 0.37);
        assert_eq!(landed.backing_y, 0.5);
    }

    #[test]
    fn return_flight_restores_the_back_pose() {
        let mut animator = ZoomAnimator::new();
        animator.trigger(ZoomState::Zoomed, &back_pose());
        let zoomed = run_to_completion(&mut animator);

        animator.trigger(ZoomState::Back, &zoomed);
        assert_eq!(animator.bounce_amplitude(), BOUNCE_AMPLITUDE);
        let landed = run_to_completion(&mut animator);

        assert_eq!(landed.camera_position, Vec3::new(-4.5, 0.0, 18.6));
        assert_eq!(landed.camera_rotation, Vec3::ZERO);
        assert_eq!(landed.group_y, -4.25);
    }

    #[test]
    fn retriggering_the_active_state_is_ignored() {
        let mut animator = ZoomAnimator::new();
        assert!(!animator.trigger(ZoomState::Back, &back_pose()));
        assert!(!animator.in_flight());

        animator.trigger(ZoomState::Zoomed, &back_pose());
        // Mid-flight repeat of the same target: still a no-op.
        animator.advance(0.1);
        assert!(!animator.trigger(ZoomState::Zoomed, &back_pose()));
    }

    #[test]
    fn midflight_reversal_retargets_from_current_values() {
        let mut animator = ZoomAnimator::new();
        animator.trigger(ZoomState::Zoomed, &back_pose());
        let midway = animator.advance(0.25).unwrap();

        assert!(animator.trigger(ZoomState::Back, &midway));
        let first = animator.advance(0.0).unwrap();

        // The reversal starts where the aborted flight left off.
        assert_abs_diff_eq!(first.camera_position.x, midway.camera_position.x, epsilon = 1e-5);
        assert_abs_diff_eq!(first.camera_position.z, midway.camera_position.z, epsilon = 1e-5);

        let landed = run_to_completion(&mut animator);
        assert_eq!(landed.camera_position, Vec3::new(-4.5, 0.0, 18.6));
        assert_eq!(animator.state(), ZoomState::Back);
    }
}
