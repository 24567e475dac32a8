//! # Entity Module
//!
//! Moving bodies and their collision with the block grid.
//!
//! Movement is swept one axis at a time, X then Z then Y, and one block
//! boundary at a time along each axis. Before each step the world is asked for
//! solid blocks overlapping the body's box at its destination; the first step
//! that would overlap anything is cancelled and the body is told which of its
//! sides struck.
//!
//! Resolving horizontal movement first lets a body slide along walls while
//! falling, and resolving Y last means a body resting on the ground is
//! re-grounded every tick by its own gravity.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::{
    block::{
        block_side::{BlockSide, AXIS_X, AXIS_Y, AXIS_Z},
        Block,
    },
    world::World,
};

pub mod player;

pub use player::{Player, PlayerInput};

/// Default body size: a little under one block wide and two tall.
pub const DEFAULT_BODY_SIZE: Vector3<f32> = Vector3 {
    x: 0.8,
    y: 1.8,
    z: 0.8,
};

/// Axis order used when resolving movement.
const MOVE_ORDER: [usize; 3] = [AXIS_X, AXIS_Z, AXIS_Y];

/// Boundary distances below this are treated as already on the boundary.
const BOUNDARY_EPSILON: f32 = 1e-4;

/// Position, size and velocity of an axis-aligned box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    /// Center of the box.
    pub position: Point3<f32>,
    /// Full extent of the box along each axis.
    pub size: Vector3<f32>,
    pub velocity: Vector3<f32>,
}

impl Body {
    pub fn new(position: Point3<f32>, size: Vector3<f32>) -> Self {
        Body {
            position,
            size,
            velocity: Vector3::new(0.0, 0.0, 0.0),
        }
    }

    /// Whether this body's box overlaps the unit block at `position`.
    pub fn overlaps_block(&self, position: Point3<i32>) -> bool {
        let block_center = Point3::new(
            position.x as f32 + 0.5,
            position.y as f32 + 0.5,
            position.z as f32 + 0.5,
        );
        aabb_overlap(
            self.position,
            self.size,
            block_center,
            Vector3::new(1.0, 1.0, 1.0),
        )
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::new(Point3::new(0.0, 0.0, 0.0), DEFAULT_BODY_SIZE)
    }
}

/// A cancelled movement step.
#[derive(Clone, Debug, PartialEq)]
pub struct Collision {
    /// Side of the moving body that struck; `Bottom` when landing.
    pub side: BlockSide,
    /// Solid blocks the body would have overlapped.
    pub blocks: Vec<(Point3<i32>, Block)>,
}

/// Something that moves through the world as a box.
pub trait MovingBody {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    /// Called when movement along one axis is cancelled.
    ///
    /// Stops the body along the struck axis.
    fn on_collision(&mut self, collision: &Collision) {
        self.body_mut().velocity[collision.side.axis()] = 0.0;
    }
}

impl MovingBody for Body {
    fn body(&self) -> &Body {
        self
    }

    fn body_mut(&mut self) -> &mut Body {
        self
    }
}

/// Whether two boxes, given by center and size, overlap with positive volume.
pub fn aabb_overlap(
    a_center: Point3<f32>,
    a_size: Vector3<f32>,
    b_center: Point3<f32>,
    b_size: Vector3<f32>,
) -> bool {
    (0..3).all(|axis| {
        let reach = (a_size[axis] + b_size[axis]) / 2.0;
        (a_center[axis] - b_center[axis]).abs() < reach
    })
}

/// Moves a body by `delta`, stopping each axis at the first solid block.
///
/// # Arguments
/// * `mover` - The body to move; its collision hook runs for every blocked axis
/// * `world` - Supplies the blocks to collide with
/// * `delta` - Desired displacement; non-finite components are ignored
pub fn move_body<M: MovingBody + ?Sized>(mover: &mut M, world: &World, delta: Vector3<f32>) {
    for axis in MOVE_ORDER {
        let mut remaining = delta[axis];
        if !remaining.is_finite() {
            continue;
        }
        // Each step reaches a block boundary or finishes the move.
        let mut steps_left = (remaining.abs().ceil() as usize).saturating_add(2);

        while remaining != 0.0 && steps_left > 0 {
            steps_left -= 1;
            let body = mover.body();
            let negative = remaining < 0.0;
            let sign = if negative { -1.0 } else { 1.0 };

            let edge = body.position[axis] + sign * body.size[axis] / 2.0;
            let fraction = edge - edge.floor();
            let mut to_boundary = if negative { fraction } else { 1.0 - fraction };
            if to_boundary < BOUNDARY_EPSILON {
                to_boundary = 1.0;
            }
            let step = sign * to_boundary.min(remaining.abs());

            let mut target = body.position;
            target[axis] += step;

            let blocks = world.get_blocks_in_volume(target, body.size);
            if blocks.is_empty() {
                mover.body_mut().position = target;
                remaining -= step;
            } else {
                let collision = Collision {
                    side: BlockSide::from_axis(axis, negative),
                    blocks,
                };
                mover.on_collision(&collision);
                break;
            }
        }
    }
}

/// Applies gravity for `dt` seconds, then moves the body by its velocity.
pub fn update_body<M: MovingBody + ?Sized>(mover: &mut M, world: &World, gravity: f32, dt: f32) {
    mover.body_mut().velocity.y -= gravity * dt;
    let delta = mover.body().velocity * dt;
    move_body(mover, world, delta);
}

#[cfg(test)]
mod tests {
    use cgmath::Point2;

    use super::*;
    use crate::config::{GenerationMethod, WorldConfig};
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn floor_world() -> World {
        let mut world = World::new(WorldConfig {
            generation: GenerationMethod::Flat { height: 1 },
            ..WorldConfig::default()
        });
        for x in -1..=1 {
            for z in -1..=1 {
                world.load_chunk(Point2::new(x, z));
            }
        }
        world
    }

    #[test]
    fn overlap_requires_positive_volume() {
        let unit = Vector3::new(1.0, 1.0, 1.0);
        let origin = Point3::new(0.0, 0.0, 0.0);
        assert!(aabb_overlap(origin, unit, Point3::new(0.9, 0.0, 0.0), unit));
        assert!(!aabb_overlap(origin, unit, Point3::new(1.0, 0.0, 0.0), unit));
        assert!(!aabb_overlap(origin, unit, Point3::new(0.5, 2.0, 0.5), unit));
    }

    #[test]
    fn falling_body_lands_on_floor() {
        let world = floor_world();
        let mut body = Body::new(Point3::new(0.5, 3.0, 0.5), Vector3::new(1.0, 2.0, 1.0));
        body.velocity.y = -10.0;
        move_body(&mut body, &world, Vector3::new(0.0, -5.0, 0.0));

        assert_eq!(body.position.y, 2.0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn walls_stop_horizontal_movement_only() {
        let mut world = floor_world();
        for y in 1..4 {
            world.set_block(Point3::new(3, y, 0), Block::new(BlockType::Stone));
        }

        let mut body = Body::new(Point3::new(0.5, 1.9, 0.5), DEFAULT_BODY_SIZE);
        body.velocity = Vector3::new(4.0, 0.0, 1.0);
        move_body(&mut body, &world, Vector3::new(4.0, 0.0, 1.0));

        assert!((body.position.x - 2.6).abs() < 1e-4);
        assert!((body.position.z - 1.5).abs() < 1e-4);
        assert_eq!(body.velocity.x, 0.0);
        assert_eq!(body.velocity.z, 1.0);
    }

    #[test]
    fn long_fall_does_not_tunnel() {
        let world = floor_world();
        let mut body = Body::new(Point3::new(5.5, 200.0, 5.5), DEFAULT_BODY_SIZE);
        move_body(&mut body, &world, Vector3::new(0.0, -500.0, 0.0));
        assert!((body.position.y - 1.9).abs() < 1e-3);
    }

    #[test]
    fn non_finite_and_huge_moves_are_safe() {
        let world = floor_world();
        let start = Point3::new(5.5, 10.0, 5.5);
        let mut body = Body::new(start, DEFAULT_BODY_SIZE);
        move_body(&mut body, &world, Vector3::new(f32::INFINITY, f32::NAN, f32::NEG_INFINITY));
        assert_eq!(body.position, start);

        move_body(&mut body, &world, Vector3::new(0.0, -f32::MAX, 0.0));
        assert!((body.position.y - 1.9).abs() < 1e-3);
    }

    #[test]
    fn gravity_accumulates_velocity() {
        let world = floor_world();
        let mut body = Body::new(Point3::new(0.5, 50.0, 0.5), DEFAULT_BODY_SIZE);
        update_body(&mut body, &world, 20.0, 0.5);
        assert_eq!(body.velocity.y, -10.0);
        assert!((body.position.y - 45.0).abs() < 1e-3);
    }
}
