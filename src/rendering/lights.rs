use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};
use wgpu::util::DeviceExt;

/// The demo's fixed lighting rig: warm ambient, two directional fills and
/// a faint hemisphere, matching the original scene.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct LightsUniform {
    /// rgb = color, w = intensity.
    pub ambient: Vec4,
    pub hemi_sky: Vec4,
    pub hemi_ground: Vec4,
    /// xyz = direction toward the light, w unused.
    pub dir0_direction: Vec4,
    pub dir0_color: Vec4,
    pub dir1_direction: Vec4,
    pub dir1_color: Vec4,
}

/// sRGB hex color to linear RGB.
pub fn srgb(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let byte = ((hex >> shift) & 0xff) as f32 / 255.0;
        byte.powf(2.2)
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

impl LightsUniform {
    pub fn demo_rig() -> Self {
        let warm_white = srgb(0xfaf9f6);

        Self {
            ambient: warm_white.extend(0.5),
            hemi_sky: srgb(0xffffbb).extend(0.2),
            hemi_ground: srgb(0x080820).extend(0.0),
            dir0_direction: Vec3::new(10.0, 10.0, 10.0).normalize().extend(0.0),
            dir0_color: warm_white.extend(0.1),
            dir1_direction: Vec3::new(-10.0, 10.0, 10.0).normalize().extend(0.0),
            dir1_color: warm_white.extend(0.3),
        }
    }
}

pub struct Lights {
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl Lights {
    pub fn new(device: &wgpu::Device, uniform: LightsUniform) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights uniform buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Lights bind group layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Lights bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        Self {
            bind_group,
            bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn srgb_endpoints() {
        assert_eq!(srgb(0x000000), Vec3::ZERO);
        assert_abs_diff_eq!(srgb(0xffffff).x, 1.0);
    }

    #[test]
    fn light_directions_are_unit_length() {
        let rig = LightsUniform::demo_rig();
        assert_abs_diff_eq!(rig.dir0_direction.truncate().length(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rig.dir1_direction.truncate().length(), 1.0, epsilon = 1e-6);
    }
}
