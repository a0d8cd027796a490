use glam::Vec2;
use id_arena::Id;

use crate::math::Aabb;
use crate::scene_graph::scene_model::SceneModelId;
use crate::scene_graph::transform::Transform;

pub type ObjectId = Id<Object3D>;

/// Shape tested by the hover raycast, in the object's local space.
#[derive(Debug, Clone, Copy)]
pub enum PickShape {
    /// Rectangle on the local z = 0 plane.
    Quad { half_extents: Vec2 },
    /// Bounding box of a loaded mesh.
    Box(Aabb),
}

pub struct Object3D {
    pub name: String,
    pub transform: Transform,
    pub model_id: Option<SceneModelId>,
    pub pick_shape: Option<PickShape>,
    pub parent_id: Option<ObjectId>,
    pub child_ids: Vec<ObjectId>,
}

impl Object3D {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

impl Default for Object3D {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: Transform::default(),
            model_id: None,
            pick_shape: None,
            parent_id: None,
            child_ids: Vec::new(),
        }
    }
}
