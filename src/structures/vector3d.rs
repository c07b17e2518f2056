// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of methods for three-dimensional vector.

use std::ops::{Add, Deref, DerefMut, Sub};

use nalgebra::base::Vector3;

use crate::structures::simbox::SimBox;

/// Describes a position of a point in space or a displacement between two points.
/// Implemented using `nalgebra`'s Vector3.
///
/// Components can be accessed as `.x`, `.y`, and `.z`.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct Vector3D(pub(crate) Vector3<f64>);

impl From<[f64; 3]> for Vector3D {
    #[inline]
    fn from(arr: [f64; 3]) -> Self {
        Vector3D(Vector3::new(arr[0], arr[1], arr[2]))
    }
}

impl From<Vector3D> for [f64; 3] {
    #[inline]
    fn from(vec: Vector3D) -> Self {
        [vec.0.x, vec.0.y, vec.0.z]
    }
}

impl Deref for Vector3D {
    type Target = Vector3<f64>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Vector3D {
    #[inline]
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl Add for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn add(self, rhs: Vector3D) -> Self::Output {
        Vector3D(self.0 + rhs.0)
    }
}

impl Sub for Vector3D {
    type Output = Vector3D;

    #[inline]
    fn sub(self, rhs: Vector3D) -> Self::Output {
        Vector3D(self.0 - rhs.0)
    }
}

impl Default for Vector3D {
    /// Create a zero vector.
    fn default() -> Self {
        Vector3D(Vector3::new(0.0, 0.0, 0.0))
    }
}

impl Vector3D {
    /// Create a new `Vector3D` structure.
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3D(Vector3::new(x, y, z))
    }

    /// Calculate length of the vector.
    ///
    /// ## Example
    /// ```
    /// # use lamman_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let vector = Vector3D::new(1.0, 2.0, 2.0);
    /// assert_approx_eq!(f64, vector.len(), 3.0);
    /// ```
    #[inline]
    pub fn len(&self) -> f64 {
        self.0.magnitude()
    }

    /// Calculate squared length of the vector.
    #[inline]
    pub fn len_squared(&self) -> f64 {
        self.0.magnitude_squared()
    }

    /// Wrap coordinates of the point into an orthorhombic simulation box spanning `[0, L)`.
    ///
    /// ## Example
    /// ```
    /// # use lamman_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let mut point = Vector3D::new(-0.5, 2.0, 4.2);
    /// let simbox = SimBox::new(4.0, 4.0, 4.0).unwrap();
    ///
    /// point.wrap(&simbox);
    /// assert_approx_eq!(f64, point.x, 3.5, epsilon = 1e-10);
    /// assert_approx_eq!(f64, point.y, 2.0, epsilon = 1e-10);
    /// assert_approx_eq!(f64, point.z, 0.2, epsilon = 1e-10);
    /// ```
    #[inline]
    pub fn wrap(&mut self, sbox: &SimBox) {
        self.0.x = Vector3D::wrap_coordinate(self.0.x, sbox.x);
        self.0.y = Vector3D::wrap_coordinate(self.0.y, sbox.y);
        self.0.z = Vector3D::wrap_coordinate(self.0.z, sbox.z);
    }

    #[inline(always)]
    fn wrap_coordinate(coor: f64, box_len: f64) -> f64 {
        let wrapped = coor - box_len * (coor / box_len).floor();
        // rounding can produce exactly `box_len` for tiny negative coordinates
        if wrapped >= box_len {
            0.0
        } else {
            wrapped
        }
    }

    /// Calculate distance between two points taking periodic boundary conditions
    /// into consideration (minimum image convention).
    ///
    /// ## Example
    /// ```
    /// # use lamman_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let point1 = Vector3D::new(0.5, 2.0, 3.0);
    /// let point2 = Vector3D::new(9.5, 2.0, 3.0);
    /// let simbox = SimBox::new(10.0, 10.0, 10.0).unwrap();
    ///
    /// assert_approx_eq!(f64, point1.distance(&point2, &simbox), 1.0, epsilon = 1e-10);
    /// ```
    #[inline]
    pub fn distance(&self, point: &Vector3D, sbox: &SimBox) -> f64 {
        self.min_image_to(point, sbox).len()
    }

    /// Calculate distance between two points. **Ignores PBC.**
    #[inline]
    pub fn distance_naive(&self, point: &Vector3D) -> f64 {
        (self.0 - point.0).magnitude()
    }

    /// Calculate the shortest vector connecting `self` with `point` taking PBC into consideration.
    #[inline]
    pub fn min_image_to(&self, point: &Vector3D, sbox: &SimBox) -> Vector3D {
        let mut diff = *point - *self;
        diff.min_image(sbox);
        diff
    }

    /// Apply the minimum image convention to a displacement vector in place:
    /// subtract `box_len * round(d / box_len)` along each axis.
    ///
    /// ## Example
    /// ```
    /// # use lamman_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let mut displacement = Vector3D::new(9.0, -6.0, 1.0);
    /// let simbox = SimBox::new(10.0, 10.0, 10.0).unwrap();
    ///
    /// displacement.min_image(&simbox);
    /// assert_approx_eq!(f64, displacement.x, -1.0, epsilon = 1e-10);
    /// assert_approx_eq!(f64, displacement.y, 4.0, epsilon = 1e-10);
    /// assert_approx_eq!(f64, displacement.z, 1.0, epsilon = 1e-10);
    /// ```
    #[inline]
    pub fn min_image(&mut self, sbox: &SimBox) {
        self.0.x = min_image(self.0.x, sbox.x);
        self.0.y = min_image(self.0.y, sbox.y);
        self.0.z = min_image(self.0.z, sbox.z);
    }

    /// Returns `true` if all the fields of the vector are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.x == 0.0 && self.0.y == 0.0 && self.0.z == 0.0
    }
}

/// Modify a one-dimensional displacement according to the minimum image convention.
///
/// Uses round-half-to-even, so a displacement of exactly half a box is not changed.
#[inline(always)]
pub(crate) fn min_image(dx: f64, box_len: f64) -> f64 {
    dx - box_len * (dx / box_len).round_ties_even()
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn len() {
        let vec = Vector3D::new(1.0, 2.0, 3.0);
        assert_approx_eq!(f64, vec.len(), 3.7416573867739413);
        assert_approx_eq!(f64, vec.len_squared(), 14.0);
    }

    #[test]
    fn len_null() {
        assert_eq!(Vector3D::default().len(), 0.0);
        assert!(Vector3D::default().is_zero());
    }

    #[test]
    fn wrap_negative_and_large() {
        let simbox = SimBox::new(3.0, 4.0, 5.0).unwrap();
        let mut point = Vector3D::new(-7.5, 9.0, 5.0);
        point.wrap(&simbox);

        assert_approx_eq!(f64, point.x, 1.5, epsilon = 1e-10);
        assert_approx_eq!(f64, point.y, 1.0, epsilon = 1e-10);
        assert_approx_eq!(f64, point.z, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn wrap_tiny_negative() {
        let simbox = SimBox::new(3.0, 4.0, 5.0).unwrap();
        let mut point = Vector3D::new(-1e-18, 0.0, 0.0);
        point.wrap(&simbox);
        assert!(point.x >= 0.0 && point.x < 3.0);
    }

    #[test]
    fn distance_pbc() {
        let simbox = SimBox::new(10.0, 10.0, 10.0).unwrap();
        let point1 = Vector3D::new(0.5, 0.5, 0.5);
        let point2 = Vector3D::new(9.5, 9.5, 9.5);

        assert_approx_eq!(f64, point1.distance(&point2, &simbox), 3.0f64.sqrt());
        assert_approx_eq!(f64, point1.distance_naive(&point2), 243.0f64.sqrt());
    }

    #[test]
    fn min_image_to() {
        let simbox = SimBox::new(3.5, 5.0, 5.0).unwrap();
        let point1 = Vector3D::new(1.0, 2.0, 3.0);
        let point2 = Vector3D::new(3.0, 2.0, 1.0);

        let vec = point1.min_image_to(&point2, &simbox);
        assert_approx_eq!(f64, vec.x, -1.5);
        assert_approx_eq!(f64, vec.y, 0.0);
        assert_approx_eq!(f64, vec.z, -2.0);
    }

    #[test]
    fn min_image_half_box() {
        assert_approx_eq!(f64, min_image(5.0, 10.0), 5.0);
        assert_approx_eq!(f64, min_image(-5.0, 10.0), -5.0);
        assert_approx_eq!(f64, min_image(15.0, 10.0), -5.0);
        assert_approx_eq!(f64, min_image(26.0, 10.0), -4.0);
    }

    #[test]
    fn arithmetic() {
        let a = Vector3D::new(1.0, 2.0, 3.0);
        let b = Vector3D::new(0.5, -1.0, 4.0);
        let arr: [f64; 3] = (a + b).into();
        assert_eq!(arr, [1.5, 1.0, 7.0]);
        let arr: [f64; 3] = (a - b).into();
        assert_eq!(arr, [0.5, 3.0, -1.0]);
    }
}
