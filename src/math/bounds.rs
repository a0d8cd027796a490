use glam::Vec3;

use crate::math::ray::Ray;

/// Axis-aligned bounding box in object space.
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(point1: Vec3, point2: Vec3) -> Aabb {
        let min = point1.min(point2);
        let max = point1.max(point2);
        Aabb { min, max }
    }

    /// Smallest box containing every point. `None` for an empty slice.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Aabb> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Aabb::new(first, first);
        for point in points {
            bounds.grow(point);
        }
        Some(bounds)
    }

    pub fn grow(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    #[allow(dead_code)]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Slab test. Returns the entry distance along the ray, clamped to zero
    /// when the ray starts inside the box.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv = ray.direction.recip();

        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;

        let t_near = t1.min(t2);
        let t_far = t1.max(t2);

        let t_min = t_near.max_element().max(0.0);
        let t_max = t_far.min_element();

        if t_max >= t_min {
            Some(t_min)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn ray_hits_box_front_face() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let t = unit_box().intersect_ray(&ray).unwrap();
        assert_abs_diff_eq!(t, 4.0);
    }

    #[test]
    fn ray_misses_box() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), -Vec3::Z);
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn ray_starting_inside_reports_zero() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);
        let t = unit_box().intersect_ray(&ray).unwrap();
        assert_abs_diff_eq!(t, 0.0);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn from_points_covers_all() {
        let bounds = Aabb::from_points([
            Vec3::new(-1.0, 2.0, 0.5),
            Vec3::new(3.0, -4.0, 0.0),
            Vec3::new(0.0, 0.0, -2.0),
        ])
        .unwrap();

        assert_eq!(bounds.min, Vec3::new(-1.0, -4.0, -2.0));
        assert_eq!(bounds.max, Vec3::new(3.0, 2.0, 0.5));
        assert!(bounds.contains_point(Vec3::ZERO));
    }
}
