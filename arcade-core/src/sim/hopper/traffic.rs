use crate::geometry::ColumnSpan;
use crate::rng::SeededRng;

use super::lanes::{Board, Direction, LaneBody, LaneConfig, LaneSpawner};

#[derive(Clone, Copy, Debug)]
pub struct Vehicle {
    pub x: f32,
    pub row: u32,
    pub len_tiles: u32,
    pub dir: Direction,
    pub speed: f32,
}

impl LaneBody for Vehicle {
    fn row(&self) -> u32 {
        self.row
    }

    fn dir(&self) -> Direction {
        self.dir
    }

    fn x(&self) -> f32 {
        self.x
    }

    fn len_tiles(&self) -> u32 {
        self.len_tiles
    }
}

/// Road lanes. Every vehicle is lethal on contact.
#[derive(Clone, Debug)]
pub struct TrafficSystem {
    spawner: LaneSpawner,
    vehicles: Vec<Vehicle>,
}

impl TrafficSystem {
    pub fn new(board: Board) -> Self {
        Self {
            spawner: LaneSpawner::new(board),
            vehicles: Vec::new(),
        }
    }

    pub fn configure(&mut self, lanes: Vec<LaneConfig>) {
        self.vehicles.clear();
        self.spawner.configure(lanes);
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn lanes(&self) -> &[LaneConfig] {
        self.spawner.lanes()
    }

    pub fn update(&mut self, dt: f32, rng: &mut SeededRng) {
        let board = *self.spawner.board();
        for vehicle in &mut self.vehicles {
            vehicle.x += vehicle.dir.sign() * vehicle.speed * dt;
        }
        self.vehicles
            .retain(|v| !board.is_past_exit(v.dir, v.x, v.len_tiles));

        for request in self.spawner.tick(dt, rng, &self.vehicles) {
            self.vehicles.push(Vehicle {
                x: request.x,
                row: request.row,
                len_tiles: request.len_tiles,
                dir: request.dir,
                speed: request.speed,
            });
        }
    }

    /// Whether any vehicle in `row` covers `col`. Spans come from each
    /// vehicle's current left edge.
    pub fn overlaps(&self, row: u32, col: i32) -> bool {
        let board = self.spawner.board();
        self.vehicles.iter().filter(|v| v.row == row).any(|v| {
            ColumnSpan::from_left_edge(v.x, v.len_tiles, board.tile_w, board.offset_x).contains(col)
        })
    }

    #[cfg(test)]
    pub(crate) fn push(&mut self, vehicle: Vehicle) {
        self.vehicles.push(vehicle);
    }
}
