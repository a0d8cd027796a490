use glam::{Mat4, Vec2, Vec3};

/// A half-line in world or object space. The direction is normalized at
/// construction time but not after [`Ray::transformed`], so that hit
/// distances stay comparable across differently scaled objects.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Maps the ray through `matrix` without renormalizing the direction.
    /// A `t` found in the mapped space measures the same distance along the
    /// original ray.
    pub fn transformed(&self, matrix: &Mat4) -> Ray {
        Ray {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }

    /// Intersection with the axis-aligned rectangle on the local z = 0
    /// plane, extending `half_extents` from the origin. Returns the distance
    /// along the ray, front or back face alike.
    pub fn intersect_quad(&self, half_extents: Vec2) -> Option<f32> {
        if self.direction.z.abs() <= f32::EPSILON {
            return None;
        }

        let t = -self.origin.z / self.direction.z;
        if t < 0.0 {
            return None;
        }

        let hit = self.origin + self.direction * t;
        if hit.x.abs() <= half_extents.x && hit.y.abs() <= half_extents.y {
            Some(t)
        } else {
            None
        }
    }

    #[allow(dead_code)]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn quad_hit_straight_on() {
        let ray = Ray::new(Vec3::new(0.5, -0.25, 5.0), -Vec3::Z);
        let t = ray.intersect_quad(Vec2::new(1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(t, 5.0);
    }

    #[test]
    fn quad_miss_outside_extents() {
        let ray = Ray::new(Vec3::new(1.5, 0.0, 5.0), -Vec3::Z);
        assert!(ray.intersect_quad(Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn quad_behind_ray_is_ignored() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(ray.intersect_quad(Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn quad_parallel_ray_is_ignored() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!(ray.intersect_quad(Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn transformed_ray_keeps_world_distances() {
        // A quad scaled up 2x should report the same world-space distance as
        // an unscaled quad twice the size.
        let world = Mat4::from_scale(Vec3::splat(2.0));
        let ray = Ray::new(Vec3::new(1.5, 0.0, 4.0), -Vec3::Z);

        let local = ray.transformed(&world.inverse());
        let t = local.intersect_quad(Vec2::new(1.0, 1.0)).unwrap();
        assert_abs_diff_eq!(t, 4.0);
    }
}
