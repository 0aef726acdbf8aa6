use crate::{Scalar, Vec3};
use itertools::iproduct;
use na::Vector3;
use smallvec::SmallVec;
use std::collections::HashMap;

/// A bucket of particle indices occupying one cell.
///
/// A `SmallVec` is used to prevent unnecessary allocation.
type CellBucket = SmallVec<[usize; 8]>;

/// A 3d integer cell coordinate.
pub type Coord = Vector3<i32>;

/// Uniform hash grid used to restrict collision checks to nearby particles.
///
/// A particle is bucketed by its center alone; overlap across a cell boundary
/// is caught by checking the 26 neighboring cells, which is sound as long as
/// the cell size is at least one particle diameter.
pub struct SpatialGrid {
    cells: HashMap<Coord, CellBucket>,
    cell_size: Scalar,
}

impl SpatialGrid {
    pub fn new(cell_size: Scalar) -> Self {
        SpatialGrid {
            cells: HashMap::new(),
            cell_size,
        }
    }

    pub fn position_to_coord(&self, pos: Vec3) -> Coord {
        pos.map(|x| (x / self.cell_size).floor() as i32)
    }

    /// Clears and repopulates the grid from scratch. The map's allocation is
    /// kept across rebuilds, so steady-state rebuilds do not allocate.
    pub fn rebuild(&mut self, positions: &[Vec3]) {
        self.cells.clear();

        for (index, &pos) in positions.iter().enumerate() {
            let coord = self.position_to_coord(pos);
            self.cells.entry(coord).or_default().push(index);
        }
    }

    /// Indices of every particle in `coord`'s cell and its 26 neighbors.
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = usize> + Clone + '_ {
        iproduct!(
            coord.x - 1..=coord.x + 1,
            coord.y - 1..=coord.y + 1,
            coord.z - 1..=coord.z + 1
        )
        .filter_map(move |(x, y, z)| self.cells.get(&Vector3::new(x, y, z)))
        .flat_map(|bucket| bucket.iter().copied())
    }

    #[allow(dead_code)]
    pub(crate) fn occupied(&self) -> impl Iterator<Item = (Coord, &[usize])> + '_ {
        self.cells.iter().map(|(&coord, bucket)| (coord, bucket.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn coord_matches_floor(x in -40.0f32..40.0, y in -40.0f32..40.0, z in -40.0f32..40.0) {
            let grid = SpatialGrid::new(0.5);
            let coord = grid.position_to_coord(Vec3::new(x, y, z));

            prop_assert_eq!(
                coord,
                Vector3::new(
                    (x / 0.5).floor() as i32,
                    (y / 0.5).floor() as i32,
                    (z / 0.5).floor() as i32
                )
            );
        }

        #[test]
        fn every_particle_in_exactly_one_bucket(seed in 0u64..1000) {
            // A cheap LCG spread of positions; the property must hold for any layout.
            let positions: Vec<Vec3> = (0..100)
                .map(|i| {
                    let v = seed
                        .wrapping_mul(6364136223846793005)
                        .wrapping_add((i as u64).wrapping_mul(1442695040888963407));
                    Vec3::new(
                        (v % 1000) as Scalar / 50. - 10.,
                        (v / 1000 % 1000) as Scalar / 50. - 10.,
                        (v / 1000000 % 1000) as Scalar / 50. - 10.,
                    )
                })
                .collect();

            let mut grid = SpatialGrid::new(0.3);
            grid.rebuild(&positions);

            let mut seen = vec![0usize; positions.len()];
            for (coord, bucket) in grid.occupied() {
                for &index in bucket {
                    seen[index] += 1;
                    prop_assert_eq!(coord, grid.position_to_coord(positions[index]));
                }
            }

            prop_assert!(seen.iter().all(|&count| count == 1));
        }
    }

    #[test]
    fn neighbors_cover_adjacent_cells_only() {
        let positions = [
            Vec3::new(0.5, 0.5, 0.5),  // cell (0, 0, 0)
            Vec3::new(1.5, 0.5, 0.5),  // cell (1, 0, 0)
            Vec3::new(-0.5, -0.5, 0.5), // cell (-1, -1, 0)
            Vec3::new(3.5, 0.5, 0.5),  // cell (3, 0, 0), out of range
        ];

        let mut grid = SpatialGrid::new(1.);
        grid.rebuild(&positions);

        let mut found: Vec<usize> = grid.neighbors(Vector3::new(0, 0, 0)).collect();
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 2]);
    }

    #[test]
    fn empty_active_set_yields_empty_grid() {
        let mut grid = SpatialGrid::new(1.);
        grid.rebuild(&[]);

        assert_eq!(grid.neighbors(Vector3::new(0, 0, 0)).count(), 0);
        assert_eq!(grid.occupied().count(), 0);
    }

    #[test]
    fn rebuild_discards_previous_contents() {
        let mut grid = SpatialGrid::new(1.);
        grid.rebuild(&[Vec3::new(0.5, 0.5, 0.5)]);
        grid.rebuild(&[Vec3::new(5.5, 5.5, 5.5)]);

        assert_eq!(grid.neighbors(Vector3::new(0, 0, 0)).count(), 0);
        assert_eq!(grid.neighbors(Vector3::new(5, 5, 5)).count(), 1);
    }
}
