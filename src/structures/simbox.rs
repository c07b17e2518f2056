// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of the SimBox structure and its methods.

use serde::{Deserialize, Serialize};

use crate::errors::SimBoxError;

/// Orthorhombic simulation box, periodic in all three dimensions.
/// Dimensions are in Å.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimBox {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SimBox {
    /// Create a new simulation box with the given dimensions.
    ///
    /// ## Returns
    /// `SimBox` if all dimensions are positive and finite. Otherwise `SimBoxError::NotPositive`.
    pub fn new(x: f64, y: f64, z: f64) -> Result<Self, SimBoxError> {
        let simbox = SimBox { x, y, z };
        simbox.check()?;
        Ok(simbox)
    }

    /// Create a simulation box from `(lo, hi)` bounds along each dimension
    /// as written in `ITEM: BOX BOUNDS` of a dump file.
    pub fn from_bounds(bounds: [(f64, f64); 3]) -> Result<Self, SimBoxError> {
        SimBox::new(
            bounds[0].1 - bounds[0].0,
            bounds[1].1 - bounds[1].0,
            bounds[2].1 - bounds[2].0,
        )
    }

    /// Check that all dimensions of the box are positive and finite.
    pub fn check(&self) -> Result<(), SimBoxError> {
        let valid = |d: f64| d.is_finite() && d > 0.0;
        if valid(self.x) && valid(self.y) && valid(self.z) {
            Ok(())
        } else {
            Err(SimBoxError::NotPositive(format!(
                "{} {} {}",
                self.x, self.y, self.z
            )))
        }
    }

    /// Volume of the box in Å³.
    #[inline]
    pub fn volume(&self) -> f64 {
        self.x * self.y * self.z
    }

    /// Length of the shortest box edge.
    #[inline]
    pub fn min_dimension(&self) -> f64 {
        self.x.min(self.y).min(self.z)
    }

    /// Box dimensions as an array.
    #[inline]
    pub fn as_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}
