use cgmath::{Point2, Point3, Vector3};
use voxel_world::{
    config::{GenerationMethod, WorldConfig},
    engine_state::{
        entity::{move_body, Body, Collision, MovingBody},
        voxels::{
            block::{block_side::BlockSide, block_type::BlockType, Block},
            chunk::{local_to_world, world_to_local, CHUNK_HEIGHT, CHUNK_SIZE},
            world::World,
        },
    },
};

fn world(generation: GenerationMethod) -> World {
    World::new(WorldConfig {
        generation,
        ..WorldConfig::default()
    })
}

fn load_around_origin(world: &mut World) {
    for x in -1..=1 {
        for z in -1..=1 {
            world.load_chunk(Point2::new(x, z));
        }
    }
}

#[test]
fn ray_straight_down_hits_single_block() {
    let mut world = world(GenerationMethod::Empty);
    load_around_origin(&mut world);
    world.set_block(Point3::new(0, 0, 0), Block::new(BlockType::Stone));

    let hit = world
        .raycast(Point3::new(0.5, 5.0, 0.5), Vector3::new(0.0, -1.0, 0.0), 100.0)
        .expect("the block is below the origin");

    assert_eq!(hit.block_position, Point3::new(0, 0, 0));
    assert_eq!(hit.normal, BlockSide::Top);
    assert!((hit.distance - 4.0).abs() < 1e-5);
}

/// Records the last collision and grounds on downward strikes.
struct Walker {
    body: Body,
    grounded: bool,
    last_side: Option<BlockSide>,
}

impl MovingBody for Walker {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn on_collision(&mut self, collision: &Collision) {
        self.last_side = Some(collision.side);
        if collision.side == BlockSide::Bottom {
            self.grounded = true;
        }
        self.body.velocity[collision.side.axis()] = 0.0;
    }
}

#[test]
fn falling_body_rests_on_floor() {
    // Flat height 1 fills only y = 0, so the floor top is at y = 1.
    let mut world = world(GenerationMethod::Flat { height: 1 });
    load_around_origin(&mut world);

    let mut walker = Walker {
        body: Body::new(Point3::new(0.5, 3.0, 0.5), Vector3::new(1.0, 2.0, 1.0)),
        grounded: false,
        last_side: None,
    };
    walker.body.velocity.y = -20.0;
    let delta = walker.body.velocity * 0.25;
    move_body(&mut walker, &world, delta);

    assert_eq!(walker.body.position.y, 1.0 + 1.0);
    assert_eq!(walker.body.velocity.y, 0.0);
    assert!(walker.grounded);
    assert_eq!(walker.last_side, Some(BlockSide::Bottom));
}

#[test]
fn streaming_meshes_exactly_the_chunks_in_range() {
    let mut world = World::new(WorldConfig {
        render_distance: 24.0,
        chunks_per_tick: 2,
        generation: GenerationMethod::Flat { height: 8 },
        ..WorldConfig::default()
    });
    let observer = Point3::new(8.0, 20.0, 8.0);

    for _ in 0..100 {
        world.update_streaming(observer, 1.0 / 60.0);
    }

    let in_range = world.chunks_in_range(observer);
    assert_eq!(in_range.len(), 9);
    for position in &in_range {
        assert!(world.is_meshed(*position), "{position:?} not meshed");
    }
    for chunk in world.chunks().filter(|chunk| chunk.is_meshed()) {
        assert!(in_range.contains(&chunk.position()));
    }
}

#[test]
fn block_queries_never_fail() {
    let mut world = world(GenerationMethod::Flat { height: 4 });
    world.load_chunk(Point2::new(0, 0));

    let mut rng = fastrand::Rng::with_seed(17);
    for _ in 0..2000 {
        let position = Point3::new(
            rng.i32(-40..40),
            rng.i32(-20..CHUNK_HEIGHT + 20),
            rng.i32(-40..40),
        );
        let block = world.get_block(position);
        let loaded = (0..CHUNK_SIZE).contains(&position.x) && (0..CHUNK_SIZE).contains(&position.z);
        let in_height = (0..CHUNK_HEIGHT).contains(&position.y);
        assert_eq!(block.is_error(), !(loaded && in_height), "{position:?}");
    }
}

#[test]
fn repeated_edit_does_not_remesh() {
    let mut world = world(GenerationMethod::Flat { height: 4 });
    load_around_origin(&mut world);
    world.mesh_chunk(Point2::new(0, 0));
    let builds = world.chunk(Point2::new(0, 0)).map(|c| c.mesh_builds());

    let position = Point3::new(5, 10, 5);
    assert!(world.set_block(position, Block::new(BlockType::Log)));
    let after_first = world.chunk(Point2::new(0, 0)).map(|c| c.mesh_builds());
    assert_eq!(after_first, builds.map(|b| b + 1));

    assert!(!world.set_block(position, Block::new(BlockType::Log)));
    let after_second = world.chunk(Point2::new(0, 0)).map(|c| c.mesh_builds());
    assert_eq!(after_second, after_first);
}

#[test]
fn local_world_round_trip() {
    let mut rng = fastrand::Rng::with_seed(3);
    for _ in 0..500 {
        let chunk = Point2::new(rng.i32(-1000..1000), rng.i32(-1000..1000));
        let local = Point3::new(
            rng.i32(0..CHUNK_SIZE),
            rng.i32(0..CHUNK_HEIGHT),
            rng.i32(0..CHUNK_SIZE),
        );
        assert_eq!(world_to_local(local_to_world(local, chunk), chunk), local);
    }
}

#[test]
fn terrain_worlds_agree_across_generation_order() {
    let mut forward = world(GenerationMethod::Terrain);
    let mut backward = world(GenerationMethod::Terrain);
    let positions: Vec<Point2<i32>> = (-2..=2).map(|x| Point2::new(x, 1)).collect();
    for &position in &positions {
        forward.load_chunk(position);
    }
    for &position in positions.iter().rev() {
        backward.load_chunk(position);
    }

    for x in -32..48 {
        for y in 0..CHUNK_HEIGHT {
            let position = Point3::new(x, y, 20);
            assert_eq!(forward.get_block(position), backward.get_block(position));
        }
    }
}
