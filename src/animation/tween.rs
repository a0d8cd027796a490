use glam::Vec3;

use crate::animation::easing::Easing;

/// Values a tween can interpolate.
pub trait Lerp: Copy {
    fn lerp(from: Self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        from + (to - from) * t
    }
}

impl Lerp for Vec3 {
    fn lerp(from: Self, to: Self, t: f32) -> Self {
        from.lerp(to, t)
    }
}

/// A fixed-duration interpolation of a single value. Advancing past the
/// duration snaps to the target exactly, so finished flights never leave
/// residual error on the pose.
#[derive(Debug, Clone, Copy)]
pub struct Tween<T: Lerp> {
    from: T,
    to: T,
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl<T: Lerp> Tween<T> {
    pub fn new(from: T, to: T, duration: f32, easing: Easing) -> Self {
        Self {
            from,
            to,
            duration: duration.max(f32::EPSILON),
            elapsed: 0.0,
            easing,
        }
    }

    pub fn advance(&mut self, dt: f32) -> T {
        self.elapsed += dt;
        self.value()
    }

    pub fn value(&self) -> T {
        if self.finished() {
            return self.to;
        }
        let t = self.easing.evaluate(self.elapsed / self.duration);
        T::lerp(self.from, self.to, t)
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn reaches_target_exactly() {
        let mut tween = Tween::new(0.0_f32, 18.6, 0.5, Easing::QuadraticOut);

        // Deliberately uneven steps that overshoot the duration.
        for _ in 0..7 {
            tween.advance(0.08);
        }

        assert!(tween.finished());
        assert_eq!(tween.value(), 18.6);
    }

    #[test]
    fn progresses_monotonically() {
        let mut tween = Tween::new(Vec3::ZERO, Vec3::new(0.0, 1.0, 8.0), 0.5, Easing::Linear);

        let mut last = 0.0;
        for _ in 0..10 {
            let value = tween.advance(0.05);
            assert!(value.z >= last);
            last = value.z;
        }
        assert_abs_diff_eq!(last, 8.0);
    }

    #[test]
    fn unstarted_tween_reports_start_value() {
        let tween = Tween::new(5.0_f32, 10.0, 0.5, Easing::Linear);
        assert_eq!(tween.value(), 5.0);
        assert!(!tween.finished());
    }
}
