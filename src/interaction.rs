//! Hover picking. Both zoom transitions are requested from here: the ray
//! through the pointer either lands on the screen surface (zoom in) or on
//! the backing plane behind it (zoom out).

use glam::Vec2;
use winit::dpi::{PhysicalPosition, PhysicalSize};

use crate::animation::ZoomState;
use crate::camera::CameraRig;
use crate::scene_graph::{ObjectId, PickShape, Scene};

pub struct InteractionController {
    pointer_ndc: Option<Vec2>,
    last_hover: Option<ObjectId>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            pointer_ndc: None,
            last_hover: None,
        }
    }

    /// Records the pointer position in normalized device coordinates.
    pub fn set_pointer(&mut self, position: PhysicalPosition<f64>, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        let x = (position.x as f32 / size.width as f32) * 2.0 - 1.0;
        let y = 1.0 - (position.y as f32 / size.height as f32) * 2.0;
        self.set_pointer_ndc(Vec2::new(x, y));
    }

    pub fn set_pointer_ndc(&mut self, ndc: Vec2) {
        self.pointer_ndc = Some(ndc);
    }

    /// Re-evaluates the hover pick and returns the state to fly to, if the
    /// newly hovered object asks for one. Fires once per hover change, so
    /// each entry produces exactly one request.
    pub fn update(
        &mut self,
        scene: &Scene,
        camera: &CameraRig,
        state: ZoomState,
        screen: ObjectId,
        backing: ObjectId,
    ) -> Option<ZoomState> {
        let ndc = self.pointer_ndc?;
        let hover = self.pick(scene, camera, ndc);

        if hover == self.last_hover {
            return None;
        }
        self.last_hover = hover;

        let hover = hover?;
        if let Some(object) = scene.get_object(hover) {
            log::debug!("hover: {}", object.name);
        }

        match state {
            ZoomState::Back if hover == screen => Some(ZoomState::Zoomed),
            ZoomState::Zoomed if hover == backing => Some(ZoomState::Back),
            _ => None,
        }
    }

    /// Nearest pickable object under the pointer.
    fn pick(&self, scene: &Scene, camera: &CameraRig, ndc: Vec2) -> Option<ObjectId> {
        let ray = camera.screen_ray(ndc);

        let mut nearest: Option<(f32, ObjectId)> = None;
        for (id, object) in scene.objects.iter() {
            let Some(shape) = object.pick_shape else {
                continue;
            };

            let world = object.transform.get_world_matrix();
            let local_ray = ray.transformed(&world.inverse());

            let hit = match shape {
                PickShape::Quad { half_extents } => local_ray.intersect_quad(half_extents),
                PickShape::Box(bounds) => bounds.intersect_ray(&local_ray),
            };

            if let Some(t) = hit {
                if nearest.map_or(true, |(best, _)| t < best) {
                    nearest = Some((t, id));
                }
            }
        }

        nearest.map(|(_, id)| id)
    }
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    use crate::animation::zoom::PoseTargets;
    use crate::scene_graph::Object3D;

    const SCREEN_TILT: f32 = -6.5 * std::f32::consts::TAU / 360.0;

    struct Rig {
        scene: Scene,
        camera: CameraRig,
        screen: ObjectId,
        backing: ObjectId,
    }

    /// Builds the demo's pick geometry at a given state's offsets.
    fn rig_at(state: ZoomState) -> Rig {
        let targets: PoseTargets = state.targets();
        let mut scene = Scene::new();

        let mut screen = Object3D::named("screen");
        screen.transform.set_transform(
            Vec3::new(0.0, targets.screen_y, 2.5),
            Quat::from_rotation_x(SCREEN_TILT),
            0.0042,
        );
        screen.pick_shape = Some(PickShape::Quad {
            half_extents: Vec2::new(512.0, 384.0),
        });
        let screen = scene.add_object(screen);

        let mut backing = Object3D::named("backing");
        backing.transform.set_transform(
            Vec3::new(0.0, targets.backing_y, 2.5),
            Quat::from_rotation_x(SCREEN_TILT),
            0.0084,
        );
        backing.pick_shape = Some(PickShape::Quad {
            half_extents: Vec2::new(350.0, 300.0),
        });
        let backing = scene.add_object(backing);

        scene.late_update();

        let camera = CameraRig::new(targets.camera_position, targets.camera_rotation);
        Rig {
            scene,
            camera,
            screen,
            backing,
        }
    }

    /// NDC of a world point as the rig's camera sees it.
    fn ndc_of(camera: &CameraRig, world: Vec3) -> Vec2 {
        let clip = camera.view_projection().project_point3(world);
        Vec2::new(clip.x, clip.y)
    }

    #[test]
    fn hovering_the_screen_while_back_requests_zoom() {
        let rig = rig_at(ZoomState::Back);
        let mut controller = InteractionController::new();

        let screen_center = Vec3::new(0.0, 1.87, 2.5);
        controller.set_pointer_ndc(ndc_of(&rig.camera, screen_center));

        let request = controller.update(
            &rig.scene,
            &rig.camera,
            ZoomState::Back,
            rig.screen,
            rig.backing,
        );
        assert_eq!(request, Some(ZoomState::Zoomed));
    }

    #[test]
    fn each_entry_requests_exactly_once() {
        let rig = rig_at(ZoomState::Back);
        let mut controller = InteractionController::new();

        controller.set_pointer_ndc(ndc_of(&rig.camera, Vec3::new(0.0, 1.87, 2.5)));
        let first = controller.update(
            &rig.scene,
            &rig.camera,
            ZoomState::Back,
            rig.screen,
            rig.backing,
        );
        assert_eq!(first, Some(ZoomState::Zoomed));

        // Same hover next frame: no repeat request.
        for _ in 0..3 {
            let repeat = controller.update(
                &rig.scene,
                &rig.camera,
                ZoomState::Back,
                rig.screen,
                rig.backing,
            );
            assert_eq!(repeat, None);
        }
    }

    #[test]
    fn pointer_off_the_screen_never_zooms() {
        let rig = rig_at(ZoomState::Back);
        let mut controller = InteractionController::new();

        for ndc in [
            Vec2::new(0.9, 0.9),
            Vec2::new(-0.95, -0.2),
            Vec2::new(0.0, -0.9),
        ] {
            controller.set_pointer_ndc(ndc);
            let request = controller.update(
                &rig.scene,
                &rig.camera,
                ZoomState::Back,
                rig.screen,
                rig.backing,
            );
            assert_eq!(request, None);
        }
    }

    #[test]
    fn hovering_the_backing_while_zoomed_requests_back() {
        let rig = rig_at(ZoomState::Zoomed);
        let mut controller = InteractionController::new();

        // A point on the backing above the screen's top edge, so only the
        // backing is under the ray.
        let local = Vec3::new(0.0, 220.0, 0.0);
        let world = rig
            .scene
            .object_world_matrix(rig.backing)
            .unwrap()
            .transform_point3(local);
        controller.set_pointer_ndc(ndc_of(&rig.camera, world));

        let request = controller.update(
            &rig.scene,
            &rig.camera,
            ZoomState::Zoomed,
            rig.screen,
            rig.backing,
        );
        assert_eq!(request, Some(ZoomState::Back));
    }

    #[test]
    fn screen_hover_while_zoomed_does_nothing() {
        let rig = rig_at(ZoomState::Zoomed);
        let mut controller = InteractionController::new();

        controller.set_pointer_ndc(ndc_of(&rig.camera, Vec3::new(0.0, 0.37, 2.5)));
        let request = controller.update(
            &rig.scene,
            &rig.camera,
            ZoomState::Zoomed,
            rig.screen,
            rig.backing,
        );
        assert_eq!(request, None);
    }

    #[test]
    fn nearest_object_wins_the_pick() {
        let mut rig = rig_at(ZoomState::Back);

        // A box in front of the screen should shadow it.
        let mut blocker = Object3D::named("blocker");
        blocker
            .transform
            .set_translation(Vec3::new(0.0, 1.87, 6.0));
        blocker.pick_shape = Some(PickShape::Box(crate::math::Aabb::new(
            Vec3::splat(-1.5),
            Vec3::splat(1.5),
        )));
        rig.scene.add_object(blocker);
        rig.scene.late_update();

        let mut controller = InteractionController::new();
        controller.set_pointer_ndc(ndc_of(&rig.camera, Vec3::new(0.0, 1.87, 2.5)));
        let request = controller.update(
            &rig.scene,
            &rig.camera,
            ZoomState::Back,
            rig.screen,
            rig.backing,
        );
        assert_eq!(request, None);
    }
}
