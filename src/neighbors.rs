use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    boids::Boid,
    vector::{Planar, Vec2},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborSearch {
    #[default]
    BruteForce,
    Grid,
}

impl FromStr for NeighborSearch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "brute_force" | "brute" => Ok(NeighborSearch::BruteForce),
            "grid" => Ok(NeighborSearch::Grid),
            other => Err(format!(
                "unknown neighbor search '{other}', expected brute_force or grid"
            )),
        }
    }
}

impl fmt::Display for NeighborSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NeighborSearch::BruteForce => write!(f, "brute_force"),
            NeighborSearch::Grid => write!(f, "grid"),
        }
    }
}

/// Indices of every boid other than `index` strictly within `radius` of it.
pub fn brute_force(boids: &[Boid], index: usize, radius: f64) -> Vec<usize> {
    let position = boids[index].position;
    boids
        .iter()
        .enumerate()
        .filter(|(other_idx, other)| {
            *other_idx != index && position.distance_to(&other.position) < radius
        })
        .map(|(other_idx, _)| other_idx)
        .collect()
}

/// Uniform hash grid with cells one neighbourhood radius wide, so every boid
/// within range of a position lies in the 3x3 block of cells around it.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<(i64, i64), Vec<usize>>,
}

impl SpatialGrid {
    pub fn new(boids: &[Boid], cell_size: f64) -> Self {
        let mut grid = SpatialGrid {
            cell_size,
            cells: HashMap::new(),
        };
        grid.rebuild(boids);
        grid
    }

    fn cell_of(&self, position: &Vec2) -> (i64, i64) {
        (
            (position.x / self.cell_size).floor() as i64,
            (position.y / self.cell_size).floor() as i64,
        )
    }

    pub fn rebuild(&mut self, boids: &[Boid]) {
        self.cells.clear();
        for (index, boid) in boids.iter().enumerate() {
            let cell = self.cell_of(&boid.position);
            self.cells.entry(cell).or_default().push(index);
        }
    }

    /// Moves `index` from the cell holding `from` to the cell holding `to`.
    pub fn relocate(&mut self, index: usize, from: &Vec2, to: &Vec2) {
        let old_cell = self.cell_of(from);
        let new_cell = self.cell_of(to);
        if old_cell == new_cell {
            return;
        }
        if let Some(members) = self.cells.get_mut(&old_cell) {
            if let Some(slot) = members.iter().position(|&member| member == index) {
                members.swap_remove(slot);
            }
            if members.is_empty() {
                self.cells.remove(&old_cell);
            }
        }
        self.cells.entry(new_cell).or_default().push(index);
    }

    pub fn neighbors(&self, boids: &[Boid], index: usize, radius: f64) -> Vec<usize> {
        let position = boids[index].position;
        let (cell_x, cell_y) = self.cell_of(&position);
        let mut found = Vec::new();
        for x_offset in -1..=1 {
            for y_offset in -1..=1 {
                let Some(members) = self.cells.get(&(cell_x + x_offset, cell_y + y_offset)) else {
                    continue;
                };
                for &other_idx in members {
                    if other_idx == index {
                        continue;
                    }
                    if position.distance_to(&boids[other_idx].position) < radius {
                        found.push(other_idx);
                    }
                }
            }
        }
        // Same order as a linear scan, so downstream sums round identically.
        found.sort_unstable();
        found
    }
}

/// A neighbour query strategy bound to one flock.
#[derive(Debug, Clone)]
pub enum NeighborFinder {
    BruteForce,
    Grid(SpatialGrid),
}

impl NeighborFinder {
    pub fn new(search: NeighborSearch, boids: &[Boid], radius: f64) -> Self {
        match search {
            NeighborSearch::BruteForce => NeighborFinder::BruteForce,
            NeighborSearch::Grid => NeighborFinder::Grid(SpatialGrid::new(boids, radius)),
        }
    }

    pub fn neighbors(&self, boids: &[Boid], index: usize, radius: f64) -> Vec<usize> {
        match self {
            NeighborFinder::BruteForce => brute_force(boids, index, radius),
            NeighborFinder::Grid(grid) => grid.neighbors(boids, index, radius),
        }
    }

    /// Records that boid `index` moved, keeping later queries in the same pass exact.
    pub fn moved(&mut self, index: usize, from: &Vec2, to: &Vec2) {
        if let NeighborFinder::Grid(grid) = self {
            grid.relocate(index, from, to);
        }
    }

    pub fn rebuild(&mut self, boids: &[Boid]) {
        if let NeighborFinder::Grid(grid) = self {
            grid.rebuild(boids);
        }
    }
}
