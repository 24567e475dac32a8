//! Spatial queries over the loaded world: volume lookup and raycasting.

use cgmath::{InnerSpace, Point3, Vector3};

use super::World;
use crate::engine_state::voxels::block::{block_side::BlockSide, Block};

/// Where a ray first met a solid block.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RaycastHit {
    /// World position of the struck block.
    pub block_position: Point3<i32>,
    pub block: Block,
    /// Point where the ray entered the block.
    pub position: Point3<f32>,
    /// Face of the block the ray entered through.
    pub normal: BlockSide,
    /// Distance travelled along the ray.
    pub distance: f32,
}

impl RaycastHit {
    /// The cell in front of the struck face, where a new block would be placed.
    pub fn adjacent_position(&self) -> Point3<i32> {
        self.block_position + self.normal.offset()
    }
}

/// Integer cell containing a point.
pub fn block_position(position: Point3<f32>) -> Point3<i32> {
    Point3::new(
        position.x.floor() as i32,
        position.y.floor() as i32,
        position.z.floor() as i32,
    )
}

/// Last cell overlapped by a box edge at `max`, which is exclusive on whole numbers.
fn last_cell(max: f32) -> i32 {
    let cell = max.floor() as i32;
    if max.fract() == 0.0 {
        cell - 1
    } else {
        cell
    }
}

impl World {
    /// Every solid block overlapping an axis-aligned box.
    ///
    /// A box edge lying exactly on a block boundary does not overlap the
    /// block on the other side, so boxes resting on the ground do not collide with it.
    ///
    /// # Arguments
    /// * `center` - Center of the box
    /// * `size` - Full extent of the box along each axis
    ///
    /// # Returns
    /// The positions and blocks of every overlapped solid block.
    pub fn get_blocks_in_volume(
        &self,
        center: Point3<f32>,
        size: Vector3<f32>,
    ) -> Vec<(Point3<i32>, Block)> {
        let min = center - size / 2.0;
        let max = center + size / 2.0;
        let (first, last) = (
            block_position(min),
            Point3::new(last_cell(max.x), last_cell(max.y), last_cell(max.z)),
        );

        let mut hits = Vec::new();
        for y in first.y..=last.y {
            for z in first.z..=last.z {
                for x in first.x..=last.x {
                    let position = Point3::new(x, y, z);
                    let block = self.get_block(position);
                    if block.is_solid() {
                        hits.push((position, block));
                    }
                }
            }
        }
        hits
    }

    /// Casts a ray through the block grid.
    ///
    /// Steps cell by cell to the nearest axis boundary. A ray starting inside a
    /// solid block hits it immediately, with the normal facing back along the
    /// ray. Rays stop without a hit when they leave loaded data.
    ///
    /// # Arguments
    /// * `origin` - Start of the ray
    /// * `direction` - Direction of the ray; need not be normalized
    /// * `max_length` - Longest distance to travel
    ///
    /// # Returns
    /// The first solid block hit, or `None`.
    pub fn raycast(
        &self,
        origin: Point3<f32>,
        direction: Vector3<f32>,
        max_length: f32,
    ) -> Option<RaycastHit> {
        if direction.magnitude2() == 0.0 || max_length.is_nan() {
            return None;
        }
        let direction = direction.normalize();

        let mut cell = block_position(origin);
        let start = self.get_block(cell);
        if start.is_solid() {
            return Some(RaycastHit {
                block_position: cell,
                block: start,
                position: origin,
                normal: BlockSide::from_vector(-direction),
                distance: 0.0,
            });
        }

        // Distance along the ray to the next boundary on each axis, and
        // between consecutive boundaries.
        let mut next = [f32::INFINITY; 3];
        let mut delta = [f32::INFINITY; 3];
        for axis in 0..3 {
            let d = direction[axis];
            if d == 0.0 {
                continue;
            }
            let fraction = origin[axis] - origin[axis].floor();
            let to_boundary = if d > 0.0 { 1.0 - fraction } else { fraction };
            delta[axis] = (1.0 / d).abs();
            next[axis] = to_boundary * delta[axis];
        }

        loop {
            let mut axis = 0;
            for candidate in 1..3 {
                if next[candidate] < next[axis] {
                    axis = candidate;
                }
            }

            let distance = next[axis];
            if distance > max_length {
                return None;
            }

            let negative = direction[axis] < 0.0;
            cell[axis] += if negative { -1 } else { 1 };
            next[axis] += delta[axis];

            let block = self.get_block(cell);
            if block.is_error() {
                return None;
            }
            if block.is_solid() {
                return Some(RaycastHit {
                    block_position: cell,
                    block,
                    position: origin + direction * distance,
                    normal: BlockSide::from_axis(axis, !negative),
                    distance,
                });
            }
        }
    }
}
