//! Vertex data structures for chunk meshes.
//!
//! This module defines the vertex format the mesher emits and the external
//! renderer uploads as-is.

use cgmath::{Point3, Vector2, Vector3};

/// A vertex of a chunk mesh.
///
/// Positions are relative to the chunk's world origin; the renderer places
/// the chunk with a per-chunk model transform.
///
/// # Memory Layout
/// - Position: [f32; 3] (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Normal: [f32; 3] (12 bytes)
/// - Ambient occlusion level: u8, 0 darkest to 3 unoccluded (1 byte)
/// - Padding: [u8; 3] (3 bytes)
///
/// Total size: 36 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub ambient: u8,
    _padding: [u8; 3],
}

impl Vertex {
    /// Creates a new vertex.
    ///
    /// # Arguments
    /// * `position` - Chunk-relative position
    /// * `tex_coords` - Texture atlas coordinates
    /// * `normal` - Face normal
    /// * `ambient` - Ambient occlusion level in `0..=3`
    pub fn new(
        position: Point3<f32>,
        tex_coords: Vector2<f32>,
        normal: Vector3<f32>,
        ambient: u8,
    ) -> Self {
        Vertex {
            position: position.into(),
            tex_coords: tex_coords.into(),
            normal: normal.into(),
            ambient,
            _padding: [0; 3],
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.position.into()
    }

    pub fn normal(&self) -> Vector3<f32> {
        self.normal.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_no_implicit_padding() {
        assert_eq!(std::mem::size_of::<Vertex>(), 36);
        let vertex = Vertex::new(
            Point3::new(1.0, 2.0, 3.0),
            Vector2::new(0.5, 0.25),
            Vector3::unit_y(),
            2,
        );
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(bytes[32], 2);
        assert_eq!(&bytes[0..4], &1.0f32.to_ne_bytes());
    }
}
