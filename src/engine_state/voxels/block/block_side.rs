//! # Block Side Module
//!
//! This module defines the six axis-aligned faces/directions of a voxel block
//! and the four corners of a face quad.
//!
//! Directions are encoded as `axis * 2 + (negative ? 1 : 0)`. The mesher's quad
//! table, raycast hit normals and collision directions all share this encoding,
//! so a raycast normal can be used directly to pick the face that was clicked.

use cgmath::Vector3;

/// Index of the X axis in a `Vector3`.
pub const AXIS_X: usize = 0;
/// Index of the Y axis in a `Vector3`.
pub const AXIS_Y: usize = 1;
/// Index of the Z axis in a `Vector3`.
pub const AXIS_Z: usize = 2;

/// Represents the six possible faces of a voxel block.
///
/// The order is: [RIGHT, LEFT, TOP, BOTTOM, FRONT, BACK]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face pointing towards positive X
    Right = 0,

    /// The face pointing towards negative X
    Left = 1,

    /// The face pointing towards positive Y
    Top = 2,

    /// The face pointing towards negative Y
    Bottom = 3,

    /// The face pointing towards positive Z
    Front = 4,

    /// The face pointing towards negative Z
    Back = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in encoding order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::Right,
            BlockSide::Left,
            BlockSide::Top,
            BlockSide::Bottom,
            BlockSide::Front,
            BlockSide::Back,
        ]
    }

    /// Builds a side from an axis index and the sign along it.
    ///
    /// # Arguments
    /// * `axis` - One of `AXIS_X`, `AXIS_Y`, `AXIS_Z`
    /// * `negative` - Whether the direction points towards the negative end of the axis
    pub fn from_axis(axis: usize, negative: bool) -> Self {
        Self::all()[axis * 2 + usize::from(negative)]
    }

    /// Picks the side whose normal is closest to the given vector
    /// (the component with the largest magnitude wins).
    pub fn from_vector(vector: Vector3<f32>) -> Self {
        let mut axis = AXIS_X;
        for i in [AXIS_Y, AXIS_Z] {
            if vector[i].abs() > vector[axis].abs() {
                axis = i;
            }
        }
        Self::from_axis(axis, vector[axis] < 0.0)
    }

    /// The axis this side is perpendicular to.
    pub fn axis(self) -> usize {
        self as usize / 2
    }

    /// Whether this side faces the negative end of its axis.
    pub fn is_negative(self) -> bool {
        self as usize % 2 == 1
    }

    /// Unit integer offset towards the neighbouring cell on this side.
    pub fn offset(self) -> Vector3<i32> {
        let mut offset = Vector3::new(0, 0, 0);
        offset[self.axis()] = if self.is_negative() { -1 } else { 1 };
        offset
    }

    /// Unit normal of this side.
    pub fn normal(self) -> Vector3<f32> {
        self.offset().cast::<f32>().unwrap_or(Vector3::new(0.0, 0.0, 0.0))
    }
}

/// The four corners of a face quad, in the order the quad table stores them.
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum Corner {
    BottomLeft = 0,
    BottomRight = 1,
    TopLeft = 2,
    TopRight = 3,
}

impl Corner {
    /// All four corners in storage order.
    pub fn all() -> [Corner; 4] {
        [
            Corner::BottomLeft,
            Corner::BottomRight,
            Corner::TopLeft,
            Corner::TopRight,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_sign_encoding_is_stable() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_axis(side.axis(), side.is_negative()), side);
            assert_eq!(side as usize, side.axis() * 2 + usize::from(side.is_negative()));
        }
        assert_eq!(BlockSide::from_axis(AXIS_Y, false), BlockSide::Top);
        assert_eq!(BlockSide::from_axis(AXIS_Z, true), BlockSide::Back);
    }

    #[test]
    fn from_vector_uses_largest_magnitude() {
        assert_eq!(BlockSide::from_vector(Vector3::new(0.1, -0.9, 0.2)), BlockSide::Bottom);
        assert_eq!(BlockSide::from_vector(Vector3::new(-0.8, 0.5, 0.2)), BlockSide::Left);
        assert_eq!(BlockSide::from_vector(Vector3::new(0.0, 0.0, 1.0)), BlockSide::Front);
    }
}
