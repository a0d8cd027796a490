use id_arena::Id;

use crate::model::Model;
use crate::rendering::render_model::RenderModelId;

pub type SceneModelId = Id<SceneModel>;

/// A mesh owned by the scene, plus its GPU counterpart once uploaded.
pub struct SceneModel {
    pub name: String,
    pub model: Model,
    pub render_model: Option<RenderModelId>,
}

impl SceneModel {
    pub fn new(model: Model) -> Self {
        Self {
            name: model.name.clone(),
            model,
            render_model: None,
        }
    }
}
