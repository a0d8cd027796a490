use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3, Vec4};
use gltf::buffer;
use itertools::izip;

use crate::math::Aabb;

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub tex_coords: Vec2,
}

pub struct ModelPrimitive {
    pub index: usize,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Base color factor of the glTF material, linear RGBA.
    pub base_color: Vec4,
}

pub struct Model {
    pub name: String,
    pub primitives: Vec<ModelPrimitive>,
    /// Object-space bounds over all primitives, for hover picking.
    pub bounds: Aabb,
}

pub type Buffers<'a> = &'a [buffer::Data];

impl Model {
    pub fn from_gltf(
        name: impl Into<String>,
        mesh: gltf::Mesh,
        buffers: Buffers,
    ) -> anyhow::Result<Model> {
        let name = name.into();
        let mut primitives = Vec::new();
        let mut bounds: Option<Aabb> = None;

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                return Err(anyhow::anyhow!(
                    "Unsupported primitive mode: {:?}",
                    primitive.mode()
                ));
            }

            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

            let positions = reader
                .read_positions()
                .ok_or_else(|| anyhow::anyhow!("Primitive without positions: {}", name))?
                .map(Vec3::from)
                .collect::<Vec<Vec3>>();
            let normals = reader
                .read_normals()
                .ok_or_else(|| anyhow::anyhow!("Primitive without normals: {}", name))?
                .map(Vec3::from)
                .collect::<Vec<Vec3>>();

            // Not every material is textured; missing UVs collapse to zero.
            let tex_coords = match reader.read_tex_coords(0) {
                Some(tex_coords) => tex_coords.into_f32().map(Vec2::from).collect(),
                None => vec![Vec2::ZERO; positions.len()],
            };

            let vertices = izip!(positions, normals, tex_coords)
                .map(|(position, normal, tex_coords)| Vertex {
                    position,
                    normal,
                    tex_coords,
                })
                .collect::<Vec<Vertex>>();

            let indices = match reader.read_indices() {
                Some(index_reader) => index_reader.into_u32().collect::<Vec<u32>>(),
                None => (0..vertices.len() as u32).collect(),
            };

            let primitive_bounds = Aabb::from_points(vertices.iter().map(|v| v.position))
                .ok_or_else(|| anyhow::anyhow!("Primitive without vertices: {}", name))?;
            bounds = Some(match bounds {
                Some(bounds) => bounds.union(&primitive_bounds),
                None => primitive_bounds,
            });

            let base_color = Vec4::from_array(
                primitive
                    .material()
                    .pbr_metallic_roughness()
                    .base_color_factor(),
            );

            primitives.push(ModelPrimitive {
                index: primitive.index(),
                vertices,
                indices,
                base_color,
            });
        }

        let bounds = bounds.ok_or_else(|| anyhow::anyhow!("Mesh without primitives: {}", name))?;

        Ok(Model {
            name,
            primitives,
            bounds,
        })
    }

    /// Flat rectangle on the z = 0 plane facing +Z, centered on the origin.
    pub fn plane(name: impl Into<String>, width: f32, height: f32, base_color: Vec4) -> Model {
        let half_width = width * 0.5;
        let half_height = height * 0.5;

        let positions = [
            Vec3::new(-half_width, -half_height, 0.0),
            Vec3::new(half_width, -half_height, 0.0),
            Vec3::new(half_width, half_height, 0.0),
            Vec3::new(-half_width, half_height, 0.0),
        ];
        let uvs = [
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(0.0, 0.0),
        ];

        let vertices = positions
            .iter()
            .zip(uvs)
            .map(|(&position, tex_coords)| Vertex {
                position,
                normal: Vec3::Z,
                tex_coords,
            })
            .collect::<Vec<Vertex>>();

        let bounds = Aabb::new(
            Vec3::new(-half_width, -half_height, 0.0),
            Vec3::new(half_width, half_height, 0.0),
        );

        Model {
            name: name.into(),
            primitives: vec![ModelPrimitive {
                index: 0,
                vertices,
                indices: vec![0, 1, 2, 0, 2, 3],
                base_color,
            }],
            bounds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_spans_its_extents() {
        let plane = Model::plane("backing", 700.0, 600.0, Vec4::new(0.0, 0.0, 0.0, 1.0));

        assert_eq!(plane.primitives.len(), 1);
        assert_eq!(plane.primitives[0].indices.len(), 6);
        assert_eq!(plane.bounds.min, Vec3::new(-350.0, -300.0, 0.0));
        assert_eq!(plane.bounds.max, Vec3::new(350.0, 300.0, 0.0));
    }

    #[test]
    fn plane_faces_forward() {
        let plane = Model::plane("backing", 2.0, 2.0, Vec4::ONE);
        assert!(plane.primitives[0].vertices.iter().all(|v| v.normal == Vec3::Z));
    }
}
