//! View frustum culling for chunk meshes.
//!
//! Planes are extracted from a combined view-projection matrix with OpenGL
//! clip-space conventions, which is what `cgmath::perspective` produces.

use cgmath::{InnerSpace, Matrix, Matrix4, Point3, Vector3, Vector4};

/// The six planes of a view frustum, each as `(normal, distance)` with the
/// normal pointing into the frustum.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frustum {
    planes: [Vector4<f32>; 6],
}

impl Frustum {
    /// Extracts the frustum planes of a view-projection matrix.
    ///
    /// # Arguments
    /// * `view_projection` - Projection matrix multiplied by the view matrix
    pub fn from_matrix(view_projection: Matrix4<f32>) -> Self {
        let row = |i| view_projection.row(i);
        let planes = [
            row(3) + row(0),
            row(3) - row(0),
            row(3) + row(1),
            row(3) - row(1),
            row(3) + row(2),
            row(3) - row(2),
        ]
        .map(normalize_plane);
        Self { planes }
    }

    /// Whether any part of the box `min..max` may be inside the frustum.
    ///
    /// Tests the corner furthest along each plane normal; boxes straddling a
    /// plane are kept.
    pub fn intersects_aabb(&self, min: Point3<f32>, max: Point3<f32>) -> bool {
        self.planes.iter().all(|plane| {
            let positive = Vector3::new(
                if plane.x >= 0.0 { max.x } else { min.x },
                if plane.y >= 0.0 { max.y } else { min.y },
                if plane.z >= 0.0 { max.z } else { min.z },
            );
            plane.truncate().dot(positive) + plane.w >= 0.0
        })
    }
}

fn normalize_plane(plane: Vector4<f32>) -> Vector4<f32> {
    let length = plane.truncate().magnitude();
    if length == 0.0 {
        return plane;
    }
    plane / length
}
