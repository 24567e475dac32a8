//! Small fixed-capacity cache of recently computed column heights.
//!
//! Chunk population asks for the same columns many times in a row (every tree
//! re-reads the height under its anchor, interpolation re-reads grid corners),
//! so a tiny ring of recent results catches most repeats without hashing.

use cgmath::Point2;

/// Number of remembered heights.
pub const HEIGHT_CACHE_CAPACITY: usize = 64;

#[derive(Copy, Clone, Debug)]
struct HeightSample {
    /// Zero marks an empty slot; generated heights are always positive.
    height: f32,
    position: Point2<i32>,
}

impl HeightSample {
    const EMPTY: HeightSample = HeightSample {
        height: 0.0,
        position: Point2 { x: 0, y: 0 },
    };
}

/// Ring of (position, height) pairs, overwritten oldest-first.
#[derive(Clone, Debug)]
pub struct HeightCache {
    samples: [HeightSample; HEIGHT_CACHE_CAPACITY],
    /// Slot the next insertion overwrites.
    cursor: usize,
}

impl Default for HeightCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HeightCache {
    pub fn new() -> Self {
        Self {
            samples: [HeightSample::EMPTY; HEIGHT_CACHE_CAPACITY],
            cursor: 0,
        }
    }

    /// Remembers a height, evicting the oldest entry.
    pub fn insert(&mut self, position: Point2<i32>, height: f32) {
        self.samples[self.cursor] = HeightSample { height, position };
        self.cursor = (self.cursor + 1) % HEIGHT_CACHE_CAPACITY;
    }

    /// Looks a height up, scanning from the most recent insertion backwards.
    pub fn get(&self, position: Point2<i32>) -> Option<f32> {
        (1..=HEIGHT_CACHE_CAPACITY)
            .map(|back| &self.samples[(self.cursor + HEIGHT_CACHE_CAPACITY - back) % HEIGHT_CACHE_CAPACITY])
            .find(|sample| sample.height > 0.0 && sample.position == position)
            .map(|sample| sample.height)
    }

    /// Forgets everything.
    pub fn clear(&mut self) {
        *self = Self::new();
    }
}
