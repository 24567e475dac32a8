//! Chunk streaming around a moving observer.
//!
//! Each tick:
//! 1. The observer's own chunk is generated and meshed immediately
//! 2. Every chunk's load animation rises if in range and sinks otherwise
//! 3. In-range chunks are generated, meshed or rebuilt nearest first, within the per-tick budget
//! 4. Fully sunk chunks lose their mesh, and unneeded out-of-range chunks are dropped
//!
//! A chunk is meshed only once enough of its 8 neighbors are meshed, so most
//! chunks are built with their surroundings already known. A chunk that loses
//! its mesh keeps its blocks while a meshed neighbor may still read them.
//!
//! Generating a chunk marks its meshed neighbors stale. Their rebuilds come out
//! of the same budget as first-time meshing.

use cgmath::{Point2, Point3};
use log::{debug, info};

use super::{neighbors_of, World};
use crate::engine_state::voxels::chunk::{chunk_origin, to_chunk_position, CHUNK_SIZE};

/// What one streaming tick did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingStats {
    pub generated: u32,
    pub meshed: u32,
    pub unmeshed: u32,
    pub unloaded: u32,
}

impl StreamingStats {
    pub fn is_idle(&self) -> bool {
        *self == Self::default()
    }
}

impl World {
    /// Advances streaming by one tick.
    ///
    /// # Arguments
    /// * `observer` - World position the world streams around
    /// * `dt` - Seconds since the last tick
    pub fn update_streaming(&mut self, observer: Point3<f32>, dt: f32) -> StreamingStats {
        let mut stats = StreamingStats::default();
        let home = to_chunk_position(Point3::new(
            observer.x.floor() as i32,
            0,
            observer.z.floor() as i32,
        ));

        if self.load_chunk(home) {
            stats.generated += 1;
        }
        if !self.is_meshed(home) {
            self.mesh_chunk(home);
            stats.meshed += 1;
        }

        let radius_squared = self.config.render_distance_squared();
        for chunk in self.chunks.values_mut() {
            let in_range = chunk.in_range(observer, radius_squared);
            chunk.update_height_timer(in_range, dt, &self.config);
        }

        self.stream_in(observer, &mut stats);
        self.stream_out(observer, home, &mut stats);

        if stats.unloaded > 0 {
            info!(
                "Streaming: {} chunks loaded, {} unloaded this tick",
                self.chunks.len(),
                stats.unloaded
            );
        } else if !stats.is_idle() {
            debug!("Streaming: {stats:?}, {} chunks loaded", self.chunks.len());
        }
        stats
    }

    /// Every chunk coordinate within streaming range, nearest first.
    pub fn chunks_in_range(&self, observer: Point3<f32>) -> Vec<Point2<i32>> {
        let home = to_chunk_position(Point3::new(
            observer.x.floor() as i32,
            0,
            observer.z.floor() as i32,
        ));
        let radius_squared = self.config.render_distance_squared();
        let reach = (self.config.render_distance / CHUNK_SIZE as f32).ceil() as i32 + 1;

        let mut coords: Vec<(f32, Point2<i32>)> = Vec::new();
        for z in home.y - reach..=home.y + reach {
            for x in home.x - reach..=home.x + reach {
                let position = Point2::new(x, z);
                let distance = center_distance_squared(position, observer);
                if distance <= radius_squared {
                    coords.push((distance, position));
                }
            }
        }
        coords.sort_by(|a, b| a.0.total_cmp(&b.0));
        coords.into_iter().map(|(_, position)| position).collect()
    }

    fn in_range(&self, position: Point2<i32>, observer: Point3<f32>) -> bool {
        center_distance_squared(position, observer) <= self.config.render_distance_squared()
    }

    /// Generates, meshes and rebuilds stale in-range chunks until the budget
    /// runs out. The observer's chunk is already generated and meshed here, so
    /// it only comes up again once stale.
    fn stream_in(&mut self, observer: Point3<f32>, stats: &mut StreamingStats) {
        let mut budget = self.config.chunks_per_tick;
        let threshold = self.config.mesh_neighbor_threshold;

        for position in self.chunks_in_range(observer) {
            if budget == 0 {
                break;
            }

            if self.load_chunk(position) {
                stats.generated += 1;
                budget -= 1;
            } else if self.is_stale(position)
                || (!self.is_meshed(position) && self.meshed_neighbor_count(position) >= threshold)
            {
                self.mesh_chunk(position);
                stats.meshed += 1;
                budget -= 1;
            }
        }
    }

    /// Unmeshes sunk chunks and drops out-of-range chunks nothing depends on.
    fn stream_out(&mut self, observer: Point3<f32>, home: Point2<i32>, stats: &mut StreamingStats) {
        let candidates: Vec<Point2<i32>> = self
            .chunks
            .values()
            .filter(|chunk| chunk.position() != home && !self.in_range(chunk.position(), observer))
            .map(|chunk| chunk.position())
            .collect();

        for position in candidates {
            let Some(chunk) = self.chunks.get(&position) else {
                continue;
            };
            let supported = self.meshed_neighbor_count(position) > 0;

            if chunk.is_meshed() {
                if !chunk.is_sunk() {
                    continue;
                }
                if supported {
                    if let Some(chunk) = self.chunks.get_mut(&position) {
                        chunk.clear_mesh();
                    }
                    stats.unmeshed += 1;
                } else {
                    self.unload_chunk(position);
                    stats.unloaded += 1;
                    stats.unloaded += self.reclaim_around(position, observer, home);
                }
            } else if !supported {
                self.unload_chunk(position);
                stats.unloaded += 1;
                stats.unloaded += self.reclaim_around(position, observer, home);
            }
        }
    }

    /// Drops out-of-range, unmeshed, unsupported chunks connected to `position`.
    ///
    /// # Returns
    /// The number of chunks dropped.
    fn reclaim_around(&mut self, position: Point2<i32>, observer: Point3<f32>, home: Point2<i32>) -> u32 {
        let mut reclaimed = 0;
        let mut pending = vec![position];

        while let Some(next) = pending.pop() {
            for neighbor in neighbors_of(next) {
                let Some(chunk) = self.chunks.get(&neighbor) else {
                    continue;
                };
                if neighbor == home
                    || chunk.is_meshed()
                    || self.in_range(neighbor, observer)
                    || self.meshed_neighbor_count(neighbor) > 0
                {
                    continue;
                }
                self.unload_chunk(neighbor);
                reclaimed += 1;
                pending.push(neighbor);
            }
        }
        reclaimed
    }
}

fn center_distance_squared(position: Point2<i32>, observer: Point3<f32>) -> f32 {
    let origin = chunk_origin(position);
    let half = CHUNK_SIZE as f32 / 2.0;
    let dx = origin.x as f32 + half - observer.x;
    let dz = origin.z as f32 + half - observer.z;
    dx * dx + dz * dz
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationMethod, WorldConfig};

    fn world(render_distance: f32) -> World {
        World::new(WorldConfig {
            render_distance,
            chunks_per_tick: 2,
            generation: GenerationMethod::Flat { height: 3 },
            ..WorldConfig::default()
        })
    }

    #[test]
    fn first_tick_meshes_the_observer_chunk() {
        let mut world = world(0.0);
        let stats = world.update_streaming(Point3::new(-3.0, 50.0, 20.0), 0.1);
        assert!(world.is_meshed(Point2::new(-1, 1)));
        assert_eq!(stats.generated, 1);
        assert_eq!(stats.meshed, 1);
    }

    #[test]
    fn chunks_in_range_are_sorted_nearest_first() {
        let world = world(40.0);
        let observer = Point3::new(8.0, 0.0, 8.0);
        let coords = world.chunks_in_range(observer);
        assert_eq!(coords[0], Point2::new(0, 0));
        let distances: Vec<_> = coords
            .iter()
            .map(|&c| center_distance_squared(c, observer))
            .collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert!(distances.iter().all(|&d| d <= 1600.0));
    }

    #[test]
    fn budget_limits_work_per_tick() {
        let mut world = world(64.0);
        world.update_streaming(Point3::new(8.0, 0.0, 8.0), 0.1);
        let stats = world.update_streaming(Point3::new(8.0, 0.0, 8.0), 0.1);
        assert!(stats.generated + stats.meshed <= 2);
    }

    #[test]
    fn neighbor_rebuilds_are_charged_to_the_budget() {
        let mut world = World::new(WorldConfig {
            render_distance: 64.0,
            chunks_per_tick: 1,
            generation: GenerationMethod::Flat { height: 3 },
            ..WorldConfig::default()
        });
        let observer = Point3::new(8.0, 0.0, 8.0);
        world.update_streaming(observer, 0.1);

        let total_builds = |world: &World| world.chunks().map(|c| c.mesh_builds()).sum::<u32>();
        let mut rebuilt_home = false;
        for _ in 0..120 {
            let before = total_builds(&world);
            let stats = world.update_streaming(observer, 0.1);
            assert!(stats.generated + stats.meshed <= 1, "{stats:?}");
            assert_eq!(total_builds(&world) - before, stats.meshed);
            rebuilt_home |= world.chunk(Point2::new(0, 0)).map(|c| c.mesh_builds()) > Some(1);
        }
        assert!(rebuilt_home);
        assert!(!world.is_stale(Point2::new(0, 0)));
    }

    #[test]
    fn distant_chunks_sink_then_unload() {
        let mut world = world(20.0);
        let start = Point3::new(8.0, 0.0, 8.0);
        for _ in 0..200 {
            world.update_streaming(start, 0.1);
        }
        assert!(world.is_meshed(Point2::new(1, 0)));

        let far = Point3::new(8.0 + 16.0 * 50.0, 0.0, 8.0);
        for _ in 0..400 {
            world.update_streaming(far, 0.1);
        }
        assert!(!world.is_loaded(Point2::new(0, 0)));
        assert!(!world.is_loaded(Point2::new(1, 0)));
        assert!(world.is_meshed(Point2::new(50, 0)));
    }

    #[test]
    fn sunk_chunk_with_meshed_neighbor_keeps_its_blocks() {
        let mut world = world(0.0);
        world.load_chunk(Point2::new(0, 0));
        world.load_chunk(Point2::new(1, 0));
        world.mesh_chunk(Point2::new(0, 0));
        world.mesh_chunk(Point2::new(1, 0));

        // Observer sits in (0, 0), so (1, 0) is out of range and starts sinking at 0.
        let stats = world.update_streaming(Point3::new(8.0, 0.0, 8.0), 0.1);
        assert_eq!(stats.unmeshed, 1);
        assert!(world.is_loaded(Point2::new(1, 0)));
        assert!(!world.is_meshed(Point2::new(1, 0)));
    }
}
