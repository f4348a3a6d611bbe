// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spatial types for 3D pool coordinates

use serde::{Deserialize, Serialize};

/// 3D position (x, y, z) in pool space
pub type Position = (i32, i32, i32);

/// Euclidean distance between two positions.
#[inline]
pub fn euclidean(a: Position, b: Position) -> f64 {
    let dx = (a.0 - b.0) as f64;
    let dy = (a.1 - b.1) as f64;
    let dz = (a.2 - b.2) as f64;
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Rectangular 3D dimensions of a neuron pool.
///
/// Neurons are arranged on a dense grid; the flat index within the pool maps
/// to coordinates in x-fastest order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolDimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl PoolDimensions {
    pub fn new(width: u32, height: u32, depth: u32) -> Self {
        Self { width, height, depth }
    }

    /// Total number of grid cells (= neurons) in the pool.
    #[inline]
    pub fn total(&self) -> usize {
        self.width as usize * self.height as usize * self.depth as usize
    }

    /// Coordinates of the given flat index within the pool.
    #[inline]
    pub fn position_of(&self, flat_index: usize) -> Position {
        let w = self.width as usize;
        let h = self.height as usize;
        let x = (flat_index % w) as i32;
        let y = ((flat_index / w) % h) as i32;
        let z = (flat_index / (w * h)) as i32;
        (x, y, z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_roundtrip_covers_every_cell_once() {
        let dims = PoolDimensions::new(3, 4, 2);
        let mut seen = std::collections::HashSet::new();
        for i in 0..dims.total() {
            let pos = dims.position_of(i);
            assert!(pos.0 < 3 && pos.1 < 4 && pos.2 < 2);
            assert!(seen.insert(pos), "duplicate coordinate for index {}", i);
        }
        assert_eq!(seen.len(), 24);
    }

    #[test]
    fn euclidean_matches_hand_computation() {
        assert_eq!(euclidean((0, 0, 0), (3, 4, 0)), 5.0);
        assert_eq!(euclidean((1, 1, 1), (1, 1, 1)), 0.0);
    }
}
