use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::math::Ray;

const FOV_Y: f32 = 45.0_f32.to_radians();
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// The demo camera: a position and an XYZ Euler rotation, the same pose
/// parameterization the zoom flight animates.
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub position: Vec3,
    /// Euler angles in radians, applied in XYZ order.
    pub rotation: Vec3,
    pub aspect: f32,
}

impl CameraRig {
    pub fn new(position: Vec3, rotation: Vec3) -> Self {
        Self {
            position,
            rotation,
            aspect: 16.0 / 9.0,
        }
    }

    /// Updates the aspect ratio only; the pose is untouched.
    pub fn resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width > 0 && size.height > 0 {
            self.aspect = size.width as f32 / size.height as f32;
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_euler(
                EulerRot::XYZ,
                self.rotation.x,
                self.rotation.y,
                self.rotation.z,
            )
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.world_matrix().inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(FOV_Y, self.aspect, Z_NEAR, Z_FAR)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a pointer position in normalized device
    /// coordinates (x right, y up, both in [-1, 1]).
    pub fn screen_ray(&self, ndc: Vec2) -> Ray {
        let inverse_vp = self.view_projection().inverse();
        let far = inverse_vp.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Default)]
pub struct CameraUniform {
    view_proj: Mat4,
}

impl CameraUniform {
    pub fn update(&mut self, camera: &CameraRig) {
        self.view_proj = camera.view_projection();
    }

    pub fn create_buffer(&self, device: &wgpu::Device) -> wgpu::Buffer {
        device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Uniform Buffer"),
            contents: bytemuck::cast_slice(&[*self]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        })
    }

    pub fn update_buffer(&self, queue: &wgpu::Queue, buffer: &wgpu::Buffer) {
        queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[*self]));
    }
}

/// Drag-to-orbit around the scene origin, with damped motion and the same
/// angle limits as the original demo. Pan is not offered.
pub struct OrbitController {
    target: Vec3,

    azimuth: f32,
    polar: f32,
    radius: f32,
    desired_azimuth: f32,
    desired_polar: f32,

    enabled: bool,
    dragging: bool,
    last_cursor: Option<Vec2>,

    rotate_speed: f32,
    damping: f32,
}

const MIN_POLAR: f32 = 40.0_f32.to_radians();
const MAX_POLAR: f32 = 90.0_f32.to_radians();
const MAX_AZIMUTH: f32 = 53.0_f32.to_radians();

impl OrbitController {
    pub fn new() -> Self {
        Self {
            target: Vec3::ZERO,
            azimuth: 0.0,
            polar: MAX_POLAR,
            radius: 1.0,
            desired_azimuth: 0.0,
            desired_polar: MAX_POLAR,
            enabled: true,
            dragging: false,
            last_cursor: None,
            rotate_speed: 0.005,
            damping: 6.0,
        }
    }

    /// Re-derives the spherical state from a camera pose, so orbiting
    /// continues from wherever a flight left the camera.
    pub fn sync_from(&mut self, rig: &CameraRig) {
        let offset = rig.position - self.target;
        self.radius = offset.length().max(1e-4);
        self.polar = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
        self.azimuth = offset.x.atan2(offset.z);
        self.desired_azimuth = self.azimuth;
        self.desired_polar = self.polar;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.dragging = false;
            self.last_cursor = None;
        }
    }

    pub fn begin_drag(&mut self) {
        if self.enabled {
            self.dragging = true;
            self.last_cursor = None;
        }
    }

    pub fn end_drag(&mut self) {
        self.dragging = false;
        self.last_cursor = None;
    }

    /// Feeds a cursor position (window pixels) into an active drag.
    pub fn drag_to(&mut self, cursor: Vec2) {
        if !self.dragging || !self.enabled {
            return;
        }

        if let Some(last) = self.last_cursor {
            let delta = cursor - last;
            self.desired_azimuth = (self.desired_azimuth - delta.x * self.rotate_speed)
                .clamp(-MAX_AZIMUTH, MAX_AZIMUTH);
            self.desired_polar = (self.desired_polar - delta.y * self.rotate_speed)
                .clamp(MIN_POLAR, MAX_POLAR);
        }
        self.last_cursor = Some(cursor);
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    /// Damps the angles toward their targets and writes the resulting pose
    /// into the rig. Leaves the rig alone while disabled or fully settled,
    /// so a pose restored by a flight stays bit-exact until the user drags.
    pub fn update(&mut self, dt: f32, rig: &mut CameraRig) {
        if !self.enabled {
            return;
        }

        let settled = !self.dragging
            && (self.desired_azimuth - self.azimuth).abs() < 1e-5
            && (self.desired_polar - self.polar).abs() < 1e-5;
        if settled {
            return;
        }

        let blend = 1.0 - (-self.damping * dt).exp();
        self.azimuth += (self.desired_azimuth - self.azimuth) * blend;
        self.polar += (self.desired_polar - self.polar) * blend;

        let offset = Vec3::new(
            self.polar.sin() * self.azimuth.sin(),
            self.polar.cos(),
            self.polar.sin() * self.azimuth.cos(),
        ) * self.radius;

        rig.position = self.target + offset;

        let view = Mat4::look_at_rh(rig.position, self.target, Vec3::Y);
        let (_, rotation, _) = view.inverse().to_scale_rotation_translation();
        let (x, y, z) = rotation.to_euler(EulerRot::XYZ);
        rig.rotation = Vec3::new(x, y, z);
    }
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn resize_changes_aspect_only() {
        let mut rig = CameraRig::new(Vec3::new(-4.5, 0.0, 18.6), Vec3::ZERO);
        rig.resize(winit::dpi::PhysicalSize::new(1920, 1080));

        assert_abs_diff_eq!(rig.aspect, 1920.0 / 1080.0);
        assert_eq!(rig.position, Vec3::new(-4.5, 0.0, 18.6));
        assert_eq!(rig.rotation, Vec3::ZERO);
    }

    #[test]
    fn zero_size_resize_is_ignored() {
        let mut rig = CameraRig::new(Vec3::ZERO, Vec3::ZERO);
        let before = rig.aspect;
        rig.resize(winit::dpi::PhysicalSize::new(0, 0));
        assert_eq!(rig.aspect, before);
    }

    #[test]
    fn center_ray_looks_down_negative_z() {
        let rig = CameraRig::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO);
        let ray = rig.screen_ray(Vec2::ZERO);

        assert_eq!(ray.origin, rig.position);
        assert_abs_diff_eq!(ray.direction.x, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ray.direction.y, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(ray.direction.z, -1.0, epsilon = 1e-5);
    }

    #[test]
    fn projected_point_round_trips_through_screen_ray() {
        let rig = CameraRig::new(Vec3::new(-4.5, 0.0, 18.6), Vec3::ZERO);
        let world = Vec3::new(0.0, 1.87, 2.5);

        let clip = rig.view_projection().project_point3(world);
        let ray = rig.screen_ray(Vec2::new(clip.x, clip.y));

        let t = (world - ray.origin).length();
        let hit = ray.point_at(t);
        assert_abs_diff_eq!(hit.x, world.x, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.y, world.y, epsilon = 1e-3);
        assert_abs_diff_eq!(hit.z, world.z, epsilon = 1e-3);
    }

    #[test]
    fn orbit_respects_angle_limits() {
        let mut orbit = OrbitController::new();
        let mut rig = CameraRig::new(Vec3::new(-4.5, 0.0, 18.6), Vec3::ZERO);
        orbit.sync_from(&rig);

        orbit.begin_drag();
        orbit.drag_to(Vec2::new(0.0, 0.0));
        orbit.drag_to(Vec2::new(100_000.0, 100_000.0));
        orbit.end_drag();

        // Long settle: angles converge onto the clamped targets.
        for _ in 0..600 {
            orbit.update(1.0 / 60.0, &mut rig);
        }

        assert_abs_diff_eq!(orbit.azimuth, -MAX_AZIMUTH, epsilon = 1e-3);
        assert_abs_diff_eq!(orbit.polar, MIN_POLAR, epsilon = 1e-3);
    }

    #[test]
    fn sync_from_recovers_the_back_pose() {
        let mut orbit = OrbitController::new();
        let mut rig = CameraRig::new(Vec3::new(-4.5, 0.0, 18.6), Vec3::ZERO);
        orbit.sync_from(&rig);

        // Without input, updating must keep the camera where the pose put it.
        orbit.update(1.0 / 60.0, &mut rig);
        assert_abs_diff_eq!(rig.position.x, -4.5, epsilon = 1e-4);
        assert_abs_diff_eq!(rig.position.y, 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(rig.position.z, 18.6, epsilon = 1e-4);
    }
}
