//! Seeding patterns for populating a fresh simulation.
//!
//! All helpers spawn particles with the configured default mass and zero
//! initial velocity unless noted; they return how many particles were
//! created.

use rand::Rng;

use crate::simulation::Simulation;
use crate::utils::SimulationError;

impl Simulation {
    /// Spawns `count` particles evenly spaced along `tiles` parallel
    /// diagonal bands running from the top-left to the bottom-right of
    /// the world.
    pub fn spawn_diagonal(&mut self, tiles: usize, count: usize) -> Result<usize, SimulationError> {
        if tiles == 0 || count == 0 {
            return Ok(0);
        }
        let (width, height) = (self.config().width, self.config().height);
        let mass = self.config().particle_mass;
        let per_band = count.div_ceil(tiles);
        let band_gap = width / (tiles as f64 + 1.0);

        let mut spawned = 0;
        for band in 0..tiles {
            let offset = band_gap * (band as f64 + 1.0) - band_gap * tiles as f64 / 2.0;
            for i in 0..per_band {
                if spawned == count {
                    break;
                }
                let t = (i as f64 + 0.5) / per_band as f64;
                let x = t * width + offset;
                let y = t * height;
                if x >= 0.0 && x < width && y >= 0.0 && y < height {
                    self.spawn_particle((x, y), (0.0, 0.0), mass)?;
                    spawned += 1;
                }
            }
        }
        Ok(spawned)
    }

    /// Fills alternating cells of a `rows` × `cols` grid with `per_cell`
    /// particles laid out in a small square block at each cell center.
    pub fn spawn_checkered(
        &mut self,
        rows: usize,
        cols: usize,
        per_cell: usize,
    ) -> Result<usize, SimulationError> {
        if rows == 0 || cols == 0 || per_cell == 0 {
            return Ok(0);
        }
        let (width, height) = (self.config().width, self.config().height);
        let mass = self.config().particle_mass;
        let cell_w = width / cols as f64;
        let cell_h = height / rows as f64;
        let side = (per_cell as f64).sqrt().ceil() as usize;

        let mut spawned = 0;
        for row in 0..rows {
            for col in 0..cols {
                if (row + col) % 2 != 0 {
                    continue;
                }
                let cx = (col as f64 + 0.5) * cell_w;
                let cy = (row as f64 + 0.5) * cell_h;
                let pitch = cell_w.min(cell_h) / (2.0 * side as f64);
                for k in 0..per_cell {
                    let dx = (k % side) as f64 - (side as f64 - 1.0) / 2.0;
                    let dy = (k / side) as f64 - (side as f64 - 1.0) / 2.0;
                    self.spawn_particle((cx + dx * pitch, cy + dy * pitch), (0.0, 0.0), mass)?;
                    spawned += 1;
                }
            }
        }
        Ok(spawned)
    }

    /// Seeds a Sierpinski triangle: recurse `depth` levels into the three
    /// corner sub-triangles of the triangle anchored at `(x, y)` with the
    /// given `size`, spawning one particle per corner at the base level.
    pub fn spawn_sierpinski(
        &mut self,
        x: f64,
        y: f64,
        size: f64,
        depth: usize,
    ) -> Result<usize, SimulationError> {
        let mass = self.config().particle_mass;
        if depth == 0 {
            self.spawn_particle((x, y), (0.0, 0.0), mass)?;
            self.spawn_particle((x + size, y), (0.0, 0.0), mass)?;
            self.spawn_particle((x + size / 2.0, y + size), (0.0, 0.0), mass)?;
            return Ok(3);
        }
        let half = size / 2.0;
        let mut spawned = 0;
        spawned += self.spawn_sierpinski(x, y, half, depth - 1)?;
        spawned += self.spawn_sierpinski(x + half, y, half, depth - 1)?;
        spawned += self.spawn_sierpinski(x + half / 2.0, y + half, half, depth - 1)?;
        Ok(spawned)
    }

    /// Spawns `count` particles at `center` with uniformly random
    /// directions and speeds up to `speed`.
    pub fn spawn_burst<R: Rng>(
        &mut self,
        center: (f64, f64),
        count: usize,
        speed: f64,
        rng: &mut R,
    ) -> Result<usize, SimulationError> {
        let mass = self.config().particle_mass;
        for _ in 0..count {
            let angle = rng.random_range(0.0..std::f64::consts::TAU);
            let magnitude = rng.random_range(0.0..=speed);
            let velocity = (angle.cos() * magnitude, angle.sin() * magnitude);
            self.spawn_particle(center, velocity, mass)?;
        }
        Ok(count)
    }
}
