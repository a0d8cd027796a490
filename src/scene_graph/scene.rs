use glam::{Mat4, Quat, Vec3};
use id_arena::Arena;
use std::collections::HashMap;

use crate::model::Model;
use crate::scene_graph::object3d::{Object3D, ObjectId, PickShape};
use crate::scene_graph::scene_model::{SceneModel, SceneModelId};
use crate::scene_graph::transform::Transform;

pub struct Scene {
    pub objects: Arena<Object3D>,
    pub models: Arena<SceneModel>,
    /// Whole-scene offset, used for the idle bounce. Applied above every
    /// root object when world transforms are resolved.
    pub root_offset: Vec3,
    gltf_mesh_to_model: HashMap<usize, SceneModelId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Arena::new(),
            models: Arena::new(),
            root_offset: Vec3::ZERO,
            gltf_mesh_to_model: HashMap::new(),
        }
    }

    pub fn add_object(&mut self, object: Object3D) -> ObjectId {
        self.objects.alloc(object)
    }

    pub fn get_object(&self, id: ObjectId) -> Option<&Object3D> {
        self.objects.get(id)
    }

    #[allow(dead_code)]
    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .find(|(_, object)| object.name == name)
            .map(|(id, _)| id)
    }

    pub fn add_model(&mut self, model: SceneModel) -> SceneModelId {
        self.models.alloc(model)
    }

    /// Spawns every root node of a glTF scene under `parent`. Meshes shared
    /// between nodes are loaded once. Returns the last spawned root.
    pub fn spawn_gltf_scene(
        &mut self,
        buffers: crate::model::Buffers,
        scene: &gltf::Scene,
        parent: Option<ObjectId>,
    ) -> anyhow::Result<Option<ObjectId>> {
        let mut last_object_id = None;

        for node in scene.nodes() {
            last_object_id = Some(self.spawn_gltf_node(buffers, &node, parent)?);
        }

        Ok(last_object_id)
    }

    fn spawn_gltf_node(
        &mut self,
        buffers: crate::model::Buffers,
        node: &gltf::Node,
        parent: Option<ObjectId>,
    ) -> anyhow::Result<ObjectId> {
        let mut object = Object3D::default();
        let node_name = node.name().unwrap_or("Unnamed").to_string();
        object.name = node_name.clone();

        let (translation, rotation, scale) = node.transform().decomposed();
        object.transform.set_transform(
            translation.into(),
            Quat::from_array(rotation),
            scale[0], // Assume uniform scale
        );

        if let Some(mesh) = node.mesh() {
            let mesh_index = mesh.index();

            let model_id = match self.gltf_mesh_to_model.get(&mesh_index).copied() {
                Some(model_id) => model_id,
                None => {
                    let mesh_name = mesh
                        .name()
                        .map(String::from)
                        .unwrap_or_else(|| format!("{} (Mesh)", node_name));

                    let model = Model::from_gltf(mesh_name, mesh, buffers)?;
                    let model_id = self.add_model(SceneModel::new(model));
                    self.gltf_mesh_to_model.insert(mesh_index, model_id);
                    model_id
                }
            };

            object.pick_shape = self
                .models
                .get(model_id)
                .map(|scene_model| PickShape::Box(scene_model.model.bounds));
            object.model_id = Some(model_id);
        }

        let object_id = self.add_object(object);

        if parent.is_some() {
            self.set_object_parent(object_id, parent);
        }

        for child in node.children() {
            self.spawn_gltf_node(buffers, &child, Some(object_id))?;
        }

        Ok(object_id)
    }

    /// Resolves world matrices for every object, roots first.
    pub fn late_update(&self) {
        let root_matrix = Mat4::from_translation(self.root_offset);

        let root_objects = self.objects.iter().filter_map(|(id, object)| {
            if object.parent_id.is_none() {
                Some(id)
            } else {
                None
            }
        });

        for root_id in root_objects.collect::<Vec<_>>() {
            self.update_object_transform_recursive(root_id, root_matrix);
        }
    }

    fn update_object_transform_recursive(&self, object_id: ObjectId, parent_world_matrix: Mat4) {
        if let Some(object) = self.objects.get(object_id) {
            let local_matrix = *object.transform.get_local_matrix();
            let world_matrix = parent_world_matrix * local_matrix;
            object.transform.set_world_matrix(world_matrix);

            for &child_id in &object.child_ids {
                self.update_object_transform_recursive(child_id, world_matrix);
            }
        }
    }

    pub fn set_object_parent(&mut self, child_id: ObjectId, new_parent_id: Option<ObjectId>) {
        if let Some(child) = self.objects.get(child_id) {
            if let Some(old_parent_id) = child.parent_id {
                if let Some(old_parent) = self.objects.get_mut(old_parent_id) {
                    old_parent.child_ids.retain(|&id| id != child_id);
                }
            }
        }

        if let Some(child) = self.objects.get_mut(child_id) {
            child.parent_id = new_parent_id;

            if let Some(new_parent_id) = new_parent_id {
                if let Some(new_parent) = self.objects.get_mut(new_parent_id) {
                    new_parent.child_ids.push(child_id);
                }
            }
        }
    }

    pub fn set_object_translation(&mut self, object_id: ObjectId, translation: Vec3) {
        if let Some(object) = self.objects.get_mut(object_id) {
            object.transform.set_translation(translation);
        }
    }

    /// Moves an object vertically, keeping its other translation components.
    pub fn set_object_y(&mut self, object_id: ObjectId, y: f32) {
        let translation = match self.objects.get(object_id) {
            Some(object) => object.transform.translation(),
            None => return,
        };
        self.set_object_translation(object_id, Vec3::new(translation.x, y, translation.z));
    }

    pub fn get_object_transform(&self, object_id: ObjectId) -> Option<&Transform> {
        self.objects.get(object_id).map(|object| &object.transform)
    }

    /// Copy of an object's resolved world matrix, as of the last
    /// `late_update`.
    pub fn object_world_matrix(&self, object_id: ObjectId) -> Option<Mat4> {
        self.objects
            .get(object_id)
            .map(|object| *object.transform.get_world_matrix())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn world_matrices_compose_through_parents() {
        let mut scene = Scene::new();

        let mut parent = Object3D::named("parent");
        parent.transform.set_translation(Vec3::new(0.0, -4.25, 0.0));
        let parent = scene.add_object(parent);

        let mut child = Object3D::named("child");
        child
            .transform
            .set_transform(Vec3::new(0.0, 0.0, -3.6), Quat::IDENTITY, 0.3);
        let child = scene.add_object(child);
        scene.set_object_parent(child, Some(parent));

        scene.late_update();

        let world = scene.object_world_matrix(child).unwrap();
        let origin = world.transform_point3(Vec3::ZERO);
        assert_abs_diff_eq!(origin.x, 0.0);
        assert_abs_diff_eq!(origin.y, -4.25);
        assert_abs_diff_eq!(origin.z, -3.6);
    }

    #[test]
    fn root_offset_shifts_everything() {
        let mut scene = Scene::new();
        let object = scene.add_object(Object3D::named("node"));

        scene.root_offset = Vec3::new(0.0, 0.125, 0.0);
        scene.late_update();

        let world = scene.object_world_matrix(object).unwrap();
        assert_abs_diff_eq!(world.transform_point3(Vec3::ZERO).y, 0.125);
    }

    #[test]
    fn reparenting_updates_child_lists() {
        let mut scene = Scene::new();
        let a = scene.add_object(Object3D::named("a"));
        let b = scene.add_object(Object3D::named("b"));
        let child = scene.add_object(Object3D::named("child"));

        scene.set_object_parent(child, Some(a));
        scene.set_object_parent(child, Some(b));

        assert!(scene.get_object(a).unwrap().child_ids.is_empty());
        assert_eq!(scene.get_object(b).unwrap().child_ids, vec![child]);
        assert_eq!(scene.get_object(child).unwrap().parent_id, Some(b));
    }

    #[test]
    fn lookup_by_name() {
        let mut scene = Scene::new();
        let screen = scene.add_object(Object3D::named("screen"));

        assert_eq!(scene.get_object_by_name("screen"), Some(screen));
        assert_eq!(scene.get_object_by_name("missing"), None);
    }
}
