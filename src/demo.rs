use anyhow::Context;
use glam::{Quat, Vec3, Vec4};

use crate::animation::zoom::CurrentPose;
use crate::animation::{ZoomAnimator, ZoomState};
use crate::camera::{CameraRig, OrbitController};
use crate::interaction::InteractionController;
use crate::model::Model;
use crate::scene_graph::{Object3D, ObjectId, PickShape, Scene};
use crate::screen;

pub const MODEL_PATH: &str = "assets/mac/mac.gltf";

const MODEL_SCALE: f32 = 0.3;

/// Tilt of the screen and backing planes, matching the computer's bezel.
const SCREEN_TILT: f32 = -6.5 * std::f32::consts::TAU / 360.0;
const SCREEN_SCALE: f32 = 0.01 * 0.42;
const BACKING_SCALE: f32 = SCREEN_SCALE * 2.0;

/// Ticker units per second while bouncing; the phase is `ticker * 0.0011`.
const TICKER_RATE: f32 = 1200.0;
const TICKER_PHASE: f32 = 0.0011;

pub struct DemoState {
    pub scene: Scene,
    pub camera: CameraRig,
    pub orbit: OrbitController,
    pub animator: ZoomAnimator,
    pub interaction: InteractionController,

    pub group: ObjectId,
    pub screen: ObjectId,
    pub backing: ObjectId,

    ticker: f32,
}

impl DemoState {
    pub fn new() -> anyhow::Result<Self> {
        let mut scene = Scene::new();

        let back = ZoomState::Back.targets();

        // Group node the loaded computer hangs off; flights move it
        // vertically as a whole.
        let mut group = Object3D::named("mac");
        group
            .transform
            .set_translation(Vec3::new(0.0, back.group_y, 0.0));
        let group = scene.add_object(group);

        let (document, buffers, _images) =
            gltf::import(MODEL_PATH).with_context(|| format!("Failed to load {}", MODEL_PATH))?;
        let gltf_scene = document
            .scenes()
            .next()
            .context("No scenes in gltf")?;

        let mut asset_root = Object3D::named("model");
        asset_root.transform.set_transform(
            Vec3::new(0.0, 0.0, -12.0 * MODEL_SCALE),
            Quat::IDENTITY,
            MODEL_SCALE,
        );
        let asset_root = scene.add_object(asset_root);
        scene.set_object_parent(asset_root, Some(group));
        scene.spawn_gltf_scene(&buffers, &gltf_scene, Some(asset_root))?;

        // The screen itself renders as the webview overlay; in the scene it
        // only exists for picking and overlay placement.
        let mut screen_object = Object3D::named("screen");
        screen_object.transform.set_transform(
            Vec3::new(0.0, back.screen_y, 2.5),
            Quat::from_rotation_x(SCREEN_TILT),
            SCREEN_SCALE,
        );
        screen_object.pick_shape = Some(PickShape::Quad {
            half_extents: screen::HALF_EXTENTS,
        });
        let screen_object = scene.add_object(screen_object);

        // Dark plane behind the page for contrast against the scene.
        let backing_model = scene.add_model(crate::scene_graph::SceneModel::new(Model::plane(
            "backing",
            700.0,
            600.0,
            Vec4::new(0.0, 0.0, 0.0, 1.0),
        )));
        let mut backing = Object3D::named("backing");
        backing.transform.set_transform(
            Vec3::new(0.0, back.backing_y, 2.5),
            Quat::from_rotation_x(SCREEN_TILT),
            BACKING_SCALE,
        );
        backing.model_id = Some(backing_model);
        backing.pick_shape = Some(PickShape::Quad {
            half_extents: glam::Vec2::new(350.0, 300.0),
        });
        let backing = scene.add_object(backing);

        let camera = CameraRig::new(back.camera_position, back.camera_rotation);
        let mut orbit = OrbitController::new();
        orbit.sync_from(&camera);

        Ok(Self {
            scene,
            camera,
            orbit,
            animator: ZoomAnimator::new(),
            interaction: InteractionController::new(),
            group,
            screen: screen_object,
            backing,
            ticker: 0.0,
        })
    }

    /// Advances everything that moves: orbit damping, an active flight,
    /// and the idle bounce. Runs before world transforms are resolved.
    pub fn animate(&mut self, dt: f32) {
        let parked_back = self.animator.state() == ZoomState::Back && !self.animator.in_flight();
        self.orbit.set_enabled(parked_back);
        self.orbit.update(dt, &mut self.camera);

        if let Some(applied) = self.animator.advance(dt) {
            self.camera.position = applied.camera_position;
            self.camera.rotation = applied.camera_rotation;
            self.scene.set_object_y(self.group, applied.group_y);
            self.scene.set_object_y(self.screen, applied.screen_y);
            self.scene.set_object_y(self.backing, applied.backing_y);

            if !self.animator.in_flight() && self.animator.state() == ZoomState::Back {
                self.orbit.sync_from(&self.camera);
            }
        }

        // Idle bounce: the whole scene floats, and the phase counter
        // freezes while zoomed.
        if self.animator.state() == ZoomState::Back {
            self.ticker += TICKER_RATE * dt;
        }
        self.scene.root_offset.y =
            (self.ticker * TICKER_PHASE).sin() * self.animator.bounce_amplitude();
    }

    /// Re-evaluates the hover pick against the freshly resolved transforms
    /// and triggers a flight if the hover asks for one.
    pub fn evaluate_hover(&mut self) {
        let request = self.interaction.update(
            &self.scene,
            &self.camera,
            self.animator.state(),
            self.screen,
            self.backing,
        );

        if let Some(target) = request {
            let pose = self.current_pose();
            self.animator.trigger(target, &pose);
        }
    }

    fn current_pose(&self) -> CurrentPose {
        let y_of = |id: ObjectId| {
            self.scene
                .get_object_transform(id)
                .map(|transform| transform.translation().y)
                .unwrap_or_default()
        };

        CurrentPose {
            camera_position: self.camera.position,
            camera_rotation: self.camera.rotation,
            group_y: y_of(self.group),
            screen_y: y_of(self.screen),
            backing_y: y_of(self.backing),
        }
    }

    pub fn log_camera_pose(&self) {
        log::info!("Camera position: {:?}", self.camera.position);
        log::info!("Camera rotation: {:?}", self.camera.rotation);
        log::info!("Azimuth: {}", self.orbit.azimuth());
    }
}
