//! The player: a moving body with a first-person view and block editing.

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

use super::{update_body, Body, Collision, MovingBody, DEFAULT_BODY_SIZE};
use crate::engine_state::voxels::block::{block_side::BlockSide, block_type::BlockType, Block};
use crate::engine_state::voxels::world::World;

/// Upward velocity given by a jump.
pub const JUMP_VELOCITY: f32 = 10.0;
/// Walking speed in blocks per second.
pub const WALK_SPEED: f32 = 5.0;
/// Sprinting speed in blocks per second.
pub const SPRINT_SPEED: f32 = 10.0;
/// Free-flight speeds, normal and sprinting.
pub const NOCLIP_SPEED: f32 = 10.0;
pub const NOCLIP_SPRINT_SPEED: f32 = 100.0;
/// Height of the eyes above the body center, as a fraction of body height.
const EYE_HEIGHT_FRACTION: f32 = 0.4;

/// Player intent for one tick.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct PlayerInput {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
    /// Jump, or rise while flying.
    pub jump: bool,
    /// Sink while flying.
    pub descend: bool,
    pub sprint: bool,
    /// Change in yaw and pitch, in radians.
    pub look: (f32, f32),
    pub place: bool,
    pub destroy: bool,
    pub toggle_noclip: bool,
}

/// The locally controlled observer.
#[derive(Clone, Debug)]
pub struct Player {
    body: Body,
    yaw: Rad<f32>,
    pitch: Rad<f32>,
    can_jump: bool,
    grounded: bool,
    /// Free flight without gravity or collision.
    pub noclip: bool,
}

impl Player {
    pub fn new(position: Point3<f32>) -> Self {
        Player {
            body: Body::new(position, DEFAULT_BODY_SIZE),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            can_jump: false,
            grounded: false,
            noclip: false,
        }
    }

    pub fn position(&self) -> Point3<f32> {
        self.body.position
    }

    pub fn teleport(&mut self, position: Point3<f32>) {
        self.body.position = position;
    }

    pub fn yaw(&self) -> Rad<f32> {
        self.yaw
    }

    pub fn pitch(&self) -> Rad<f32> {
        self.pitch
    }

    /// Sets the view angles, clamping pitch to straight up or down.
    pub fn set_rotation(&mut self, yaw: Rad<f32>, pitch: Rad<f32>) {
        self.yaw = yaw;
        self.pitch = Rad(pitch.0.clamp(-FRAC_PI_2, FRAC_PI_2));
    }

    /// Whether the last downward movement ended on the ground.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn can_jump(&self) -> bool {
        self.can_jump
    }

    /// Where the camera sits.
    pub fn eye_position(&self) -> Point3<f32> {
        self.body.position + Vector3::new(0.0, self.body.size.y * EYE_HEIGHT_FRACTION, 0.0)
    }

    /// Unit view direction.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_sin, pitch_sin, pitch_cos * yaw_cos).normalize()
    }

    /// Horizontal view direction.
    pub fn forward_aligned(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_sin, 0.0, yaw_cos)
    }

    pub fn right(&self) -> Vector3<f32> {
        let (sin, cos) = (self.yaw.0 - FRAC_PI_2).sin_cos();
        Vector3::new(sin, 0.0, cos)
    }

    pub fn up(&self) -> Vector3<f32> {
        self.right().cross(self.forward())
    }

    /// The view matrix for rendering from the player's eyes.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.eye_position(), self.forward(), Vector3::unit_y())
    }

    /// Applies one tick of input and physics.
    ///
    /// # Arguments
    /// * `input` - What the player wants to do this tick
    /// * `world` - The world to collide with
    /// * `gravity` - Downward acceleration
    /// * `dt` - Seconds since the last tick
    pub fn update(&mut self, input: &PlayerInput, world: &World, gravity: f32, dt: f32) {
        self.set_rotation(self.yaw + Rad(input.look.0), self.pitch + Rad(input.look.1));
        if input.toggle_noclip {
            self.noclip = !self.noclip;
        }

        if self.noclip {
            self.body.velocity = Vector3::new(0.0, 0.0, 0.0);
            let mut direction = self.walk_direction(input, self.forward());
            if input.jump {
                direction += self.up();
            }
            if input.descend {
                direction -= self.up();
            }
            if direction.magnitude2() > 0.0 {
                let speed = if input.sprint { NOCLIP_SPRINT_SPEED } else { NOCLIP_SPEED };
                self.body.position += direction.normalize() * speed * dt;
            }
            return;
        }

        let direction = self.walk_direction(input, self.forward_aligned());
        if direction.magnitude2() > 0.0 {
            let speed = if input.sprint { SPRINT_SPEED } else { WALK_SPEED };
            super::move_body(self, world, direction.normalize() * speed * dt);
        }

        if self.can_jump && input.jump {
            self.body.velocity = Vector3::new(0.0, JUMP_VELOCITY, 0.0);
            self.can_jump = false;
        }

        self.grounded = false;
        update_body(self, world, gravity, dt);
    }

    fn walk_direction(&self, input: &PlayerInput, forward: Vector3<f32>) -> Vector3<f32> {
        let mut direction = Vector3::new(0.0, 0.0, 0.0);
        if input.move_forward {
            direction += forward;
        }
        if input.move_backward {
            direction -= forward;
        }
        if input.move_left {
            direction -= self.right();
        }
        if input.move_right {
            direction += self.right();
        }
        direction
    }

    /// Replaces the block the player is looking at with air.
    ///
    /// # Returns
    /// The position of the removed block, if any.
    pub fn destroy_block(&self, world: &mut World) -> Option<Point3<i32>> {
        let hit = world.raycast(self.eye_position(), self.forward(), f32::INFINITY)?;
        world
            .set_block(hit.block_position, Block::AIR)
            .then_some(hit.block_position)
    }

    /// Places dirt against the face the player is looking at.
    ///
    /// Nothing is placed where it would overlap the player.
    ///
    /// # Returns
    /// The position of the placed block, if any.
    pub fn place_block(&self, world: &mut World) -> Option<Point3<i32>> {
        let hit = world.raycast(self.eye_position(), self.forward(), f32::INFINITY)?;
        let position = hit.adjacent_position();
        if self.body.overlaps_block(position) {
            return None;
        }
        world
            .set_block(position, Block::new(BlockType::Dirt))
            .then_some(position)
    }
}

impl MovingBody for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_collision(&mut self, collision: &Collision) {
        if collision.side == BlockSide::Bottom {
            self.can_jump = true;
            self.grounded = true;
        }
        self.body.velocity[collision.side.axis()] = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use cgmath::{Deg, Point2};

    use super::*;
    use crate::config::{GenerationMethod, WorldConfig};

    fn flat_world() -> World {
        let mut world = World::new(WorldConfig {
            generation: GenerationMethod::Flat { height: 10 },
            ..WorldConfig::default()
        });
        for x in -1..=1 {
            for z in -1..=1 {
                world.load_chunk(Point2::new(x, z));
            }
        }
        world
    }

    fn standing_player(world: &World) -> Player {
        let mut player = Player::new(Point3::new(0.5, 12.0, 0.5));
        for _ in 0..60 {
            player.update(&PlayerInput::default(), world, 20.0, 1.0 / 60.0);
        }
        player
    }

    #[test]
    fn player_lands_and_can_jump() {
        let world = flat_world();
        let mut player = standing_player(&world);
        assert!(player.is_grounded());
        assert!(player.can_jump());
        assert!((player.position().y - 10.9).abs() < 1e-3);

        let jump = PlayerInput {
            jump: true,
            ..PlayerInput::default()
        };
        player.update(&jump, &world, 20.0, 1.0 / 60.0);
        assert!(!player.can_jump());
        assert!(player.position().y > 10.9);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut player = Player::new(Point3::new(0.0, 0.0, 0.0));
        player.set_rotation(Rad(0.0), Rad(10.0));
        assert_eq!(player.pitch(), Rad(FRAC_PI_2));
        assert!((player.forward() - Vector3::unit_y()).magnitude() < 1e-5);
    }

    #[test]
    fn looking_down_destroys_and_places() {
        let mut world = flat_world();
        let mut player = standing_player(&world);
        player.set_rotation(Rad(0.0), Deg(-90.0).into());

        assert_eq!(player.destroy_block(&mut world), Some(Point3::new(0, 9, 0)));
        assert!(world.get_block(Point3::new(0, 9, 0)).is_air());

        player.teleport(Point3::new(0.5, 11.5, 0.5));
        assert_eq!(player.place_block(&mut world), Some(Point3::new(0, 9, 0)));
        assert_eq!(world.get_block(Point3::new(0, 9, 0)).block_type, BlockType::Dirt);
    }

    #[test]
    fn placing_inside_the_player_is_refused() {
        let mut world = flat_world();
        let mut player = standing_player(&world);
        player.set_rotation(Rad(0.0), Deg(-90.0).into());
        world.set_block(Point3::new(0, 9, 0), Block::AIR);
        // Standing in the hole, the refilled cell would overlap the body.
        player.teleport(Point3::new(0.5, 10.5, 0.5));
        assert_eq!(player.place_block(&mut world), None);
    }
}
