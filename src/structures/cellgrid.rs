// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of CellGrid for speeding up distance calculations.

use std::ops::Range;

use ndarray::Array3;

use crate::errors::CellGridError;
use crate::structures::{simbox::SimBox, vector3d::Vector3D};

/// A structure for efficient periodic searches within a cutoff.
///
/// Also commonly known as **cell lists**. See [Wikipedia](https://en.wikipedia.org/wiki/Cell_lists) for more information.
///
/// Positions are assigned into cells which are at least `cutoff` wide, so all neighbors
/// of a point within the cutoff are located in the cell containing the point or in
/// the directly adjacent cells. Periodic boundary conditions are applied in all dimensions
/// and distances are calculated using the minimum image convention.
///
/// The `cutoff` should not be larger than half of the shortest box dimension,
/// otherwise a single minimum image per pair does not describe all neighbors.
///
/// ## Example
/// ```
/// # use lamman_rs::prelude::*;
/// # use lamman_rs::structures::cellgrid::CellGrid;
/// #
/// let simbox = SimBox::new(10.0, 10.0, 10.0).unwrap();
/// let positions = vec![
///     Vector3D::new(0.5, 5.0, 5.0),
///     Vector3D::new(9.5, 5.0, 5.0),
///     Vector3D::new(5.0, 5.0, 5.0),
/// ];
///
/// let grid = CellGrid::new(&positions, &simbox, 2.0).unwrap();
/// let neighbors: Vec<usize> = grid
///     .neighbors_iter(&Vector3D::new(0.0, 5.0, 5.0))
///     .map(|(index, _)| index)
///     .collect();
///
/// assert_eq!(neighbors.len(), 2);
/// assert!(neighbors.contains(&0));
/// assert!(neighbors.contains(&1));
/// ```
#[derive(Debug, Clone)]
pub struct CellGrid<'a> {
    /// Grid of cells storing indices of positions.
    grid: Array3<Vec<usize>>,
    /// Dimensions of each cell of the grid.
    cell_size: Vector3D,
    /// All positions assigned to the grid.
    positions: &'a [Vector3D],
    /// Simulation box.
    simbox: &'a SimBox,
    /// Maximal distance of neighbors.
    cutoff: f64,
}

impl<'a> CellGrid<'a> {
    /// Create a new [`CellGrid`]. The time complexity of this operation is O(N), where N is the number
    /// of positions.
    ///
    /// ## Notes
    /// - If `cutoff` is larger than any dimension of the simulation box, the dimension of the box is used as the cell size.
    /// - The `cutoff` must be positive and the simulation box must be valid; otherwise, an error is returned.
    pub fn new(
        positions: &'a [Vector3D],
        simbox: &'a SimBox,
        cutoff: f64,
    ) -> Result<CellGrid<'a>, CellGridError> {
        if cutoff.is_nan() || cutoff <= 0.0 {
            return Err(CellGridError::InvalidCellSize(cutoff.to_string()));
        }

        simbox.check().map_err(CellGridError::SimBoxError)?;

        let cells = [
            Self::n_cells(simbox.x, cutoff),
            Self::n_cells(simbox.y, cutoff),
            Self::n_cells(simbox.z, cutoff),
        ];

        let cell_size = Vector3D::new(
            simbox.x / cells[0] as f64,
            simbox.y / cells[1] as f64,
            simbox.z / cells[2] as f64,
        );

        let mut grid: Array3<Vec<usize>> =
            Array3::from_elem((cells[0], cells[1], cells[2]), Vec::new());

        for (i, pos) in positions.iter().enumerate() {
            let mut wrapped = *pos;
            wrapped.wrap(simbox);
            let index = Self::pos2index(&wrapped, &cell_size, &cells);
            grid[index].push(i);
        }

        Ok(CellGrid {
            grid,
            cell_size,
            positions,
            simbox,
            cutoff,
        })
    }

    /// Returns an iterator over all positions assigned to the `CellGrid` which are
    /// located within the cutoff from the `reference` point.
    /// Each item of the iterator is `(index of the position, distance from reference)`.
    ///
    /// ## Notes
    /// - The `reference` point does not need to be wrapped into the simulation box.
    /// - The order in which the neighbors are visited is **undefined**,
    ///   but each position is visited at most once.
    pub fn neighbors_iter(
        &'a self,
        reference: &Vector3D,
    ) -> impl Iterator<Item = (usize, f64)> + 'a {
        let mut reference = *reference;
        reference.wrap(self.simbox);

        let (xcells, ycells, zcells) = self.grid.dim();
        let [x, y, z] = Self::pos2index(&reference, &self.cell_size, &[xcells, ycells, zcells]);

        // make sure that no cell is visited multiple times
        let xrange = Self::neighbor_range(xcells);
        let yrange = Self::neighbor_range(ycells);
        let zrange = Self::neighbor_range(zcells);

        xrange
            .flat_map(move |dx| {
                let yrange = yrange.clone();
                let zrange = zrange.clone();
                yrange.flat_map(move |dy| zrange.clone().map(move |dz| (dx, dy, dz)))
            })
            .flat_map(move |(dx, dy, dz)| {
                let nx = (x as isize + dx).rem_euclid(xcells as isize) as usize;
                let ny = (y as isize + dy).rem_euclid(ycells as isize) as usize;
                let nz = (z as isize + dz).rem_euclid(zcells as isize) as usize;

                self.grid[[nx, ny, nz]].iter().cloned()
            })
            .filter_map(move |index| {
                let dist = reference.distance(&self.positions[index], self.simbox);
                if dist <= self.cutoff {
                    Some((index, dist))
                } else {
                    None
                }
            })
    }

    /// Get the cutoff of the grid.
    #[inline(always)]
    pub fn get_cutoff(&self) -> f64 {
        self.cutoff
    }

    /// Range of cells, relative to the reference cell, to visit along a dimension with `n` cells.
    #[inline(always)]
    fn neighbor_range(n: usize) -> Range<isize> {
        if n < 3 {
            0..n as isize
        } else {
            -1..2
        }
    }

    /// Calculate the number of cells along a dimension of the simulation box.
    #[inline]
    fn n_cells(box_len: f64, cell_size: f64) -> usize {
        (box_len / cell_size).floor().max(1.0) as usize
    }

    /// Convert a wrapped position to index of the cell of the grid.
    #[inline(always)]
    fn pos2index(pos: &Vector3D, cell_size: &Vector3D, ncells: &[usize; 3]) -> [usize; 3] {
        [
            ((pos.x / cell_size.x).floor() as usize).min(ncells[0] - 1),
            ((pos.y / cell_size.y).floor() as usize).min(ncells[1] - 1),
            ((pos.z / cell_size.z).floor() as usize).min(ncells[2] - 1),
        ]
    }
}
