// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of the ThermoTable structure, unit conversions of thermodynamic properties
//! and gaussian smoothing of their time series.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ParseThermoError, ThermoError};
use crate::io::thermo_io;

/// Thermodynamic output of a simulation as a table.
///
/// Column names are the `keywords` of the first thermo block of the log.
/// Every row has exactly as many values as there are columns.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ThermoTable {
    keywords: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl ThermoTable {
    /// Create a new `ThermoTable`.
    ///
    /// ## Panics
    /// Panics if any of the rows does not have the same length as `keywords`.
    pub fn new(keywords: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        if rows.iter().any(|row| row.len() != keywords.len()) {
            panic!("FATAL LAMMAN ERROR | ThermoTable::new | Row length does not match the number of keywords.");
        }

        ThermoTable { keywords, rows }
    }

    /// Read the thermodynamic output of a log file and construct a `ThermoTable`.
    pub fn from_log(filename: impl AsRef<Path>) -> Result<Self, ParseThermoError> {
        thermo_io::read_thermo(filename)
    }

    /// Get names of the columns.
    #[inline(always)]
    pub fn get_keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Get all rows of the table.
    #[inline(always)]
    pub fn get_rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    #[inline(always)]
    pub fn get_n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get all values of the column with the given name.
    pub fn column(&self, name: &str) -> Result<Vec<f64>, ThermoError> {
        let index = self
            .keywords
            .iter()
            .position(|keyword| keyword == name)
            .ok_or_else(|| ThermoError::ColumnNotFound(name.to_owned()))?;

        Ok(self.rows.iter().map(|row| row[index]).collect())
    }

    /// Get values of the `Step` column.
    pub fn steps(&self) -> Result<Vec<f64>, ThermoError> {
        self.column("Step")
    }

    /// Get values of the column converted into the target unit.
    ///
    /// Columns that are not recognized as a [`ThermoProperty`] can only be requested
    /// in their native unit, i.e. with `unit` being `None`.
    ///
    /// ## Example
    /// ```
    /// # use lamman_rs::prelude::*;
    /// # use float_cmp::assert_approx_eq;
    /// #
    /// let table = ThermoTable::new(
    ///     vec!["Step".to_owned(), "Temp".to_owned()],
    ///     vec![vec![0.0, 300.0], vec![100.0, 373.15]],
    /// );
    ///
    /// let celsius = table.converted_column("Temp", Some("°C")).unwrap();
    /// assert_approx_eq!(f64, celsius[0], 26.85, epsilon = 1e-9);
    /// assert_approx_eq!(f64, celsius[1], 100.0, epsilon = 1e-9);
    /// ```
    pub fn converted_column(&self, name: &str, unit: Option<&str>) -> Result<Vec<f64>, ThermoError> {
        let values = self.column(name)?;

        let unit = match unit {
            None => return Ok(values),
            Some(x) => x,
        };

        let property = ThermoProperty::from_keyword(name)
            .ok_or_else(|| ThermoError::UnsupportedUnit(name.to_owned(), unit.to_owned()))?;

        let conversion = property
            .unit(unit)
            .ok_or_else(|| ThermoError::UnsupportedUnit(name.to_owned(), unit.to_owned()))?;

        Ok(values.into_iter().map(|x| conversion.convert(x)).collect())
    }

    /// Get values of the column converted into the target unit and smoothed
    /// by a gaussian filter with the given `sigma` (in rows). See [`gaussian_filter1d`].
    pub fn smoothed_column(
        &self,
        name: &str,
        unit: Option<&str>,
        sigma: f64,
    ) -> Result<Vec<f64>, ThermoError> {
        Ok(gaussian_filter1d(&self.converted_column(name, unit)?, sigma))
    }
}

impl fmt::Display for ThermoTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for keyword in &self.keywords {
            write!(f, "{:>14}", keyword)?;
        }
        writeln!(f)?;
        for row in &self.rows {
            for value in row {
                write!(f, "{:>14.4}", value)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Physical quantity of a thermo column. Native units are those of LAMMPS `units real`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThermoProperty {
    /// kcal/mol (PotEng, KinEng, TotEng, Enthalpy)
    Energy,
    /// atm (Press)
    Pressure,
    /// K (Temp)
    Temperature,
    /// Å³ (Volume)
    Volume,
    /// g/cm³ (Density)
    Density,
}

/// Conversion of a native value into a target unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitConversion {
    /// `value * factor`
    Scale(f64),
    /// Kelvin to degrees Celsius.
    Celsius,
    /// Kelvin to degrees Fahrenheit.
    Fahrenheit,
}

impl UnitConversion {
    /// Convert a native value into the target unit.
    #[inline]
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            UnitConversion::Scale(factor) => value * factor,
            UnitConversion::Celsius => value - 273.15,
            UnitConversion::Fahrenheit => (value - 273.15) * 9.0 / 5.0 + 32.0,
        }
    }
}

const ENERGY_UNITS: [(&str, UnitConversion); 3] = [
    ("kcal/mol", UnitConversion::Scale(1.0)),
    ("kJ/mol", UnitConversion::Scale(4.184)),
    ("eV", UnitConversion::Scale(0.04336)),
];

const PRESSURE_UNITS: [(&str, UnitConversion); 4] = [
    ("atm", UnitConversion::Scale(1.0)),
    ("bar", UnitConversion::Scale(1.01325)),
    ("Pa", UnitConversion::Scale(101325.0)),
    ("MPa", UnitConversion::Scale(0.101325)),
];

const TEMPERATURE_UNITS: [(&str, UnitConversion); 3] = [
    ("K", UnitConversion::Scale(1.0)),
    ("°C", UnitConversion::Celsius),
    ("°F", UnitConversion::Fahrenheit),
];

const VOLUME_UNITS: [(&str, UnitConversion); 2] = [
    ("Å³", UnitConversion::Scale(1.0)),
    ("nm³", UnitConversion::Scale(1e-3)),
];

const DENSITY_UNITS: [(&str, UnitConversion); 1] = [("g/cm³", UnitConversion::Scale(1.0))];

impl ThermoProperty {
    /// Classify a thermo keyword. Returns `None` for keywords without a known physical quantity.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "PotEng" | "KinEng" | "TotEng" | "Enthalpy" => Some(ThermoProperty::Energy),
            "Press" => Some(ThermoProperty::Pressure),
            "Temp" => Some(ThermoProperty::Temperature),
            "Volume" => Some(ThermoProperty::Volume),
            "Density" => Some(ThermoProperty::Density),
            _ => None,
        }
    }

    /// Supported units of the property with their conversions. The first unit is the native one.
    pub fn units(&self) -> &'static [(&'static str, UnitConversion)] {
        match self {
            ThermoProperty::Energy => &ENERGY_UNITS,
            ThermoProperty::Pressure => &PRESSURE_UNITS,
            ThermoProperty::Temperature => &TEMPERATURE_UNITS,
            ThermoProperty::Volume => &VOLUME_UNITS,
            ThermoProperty::Density => &DENSITY_UNITS,
        }
    }

    /// Native unit of the property.
    pub fn native_unit(&self) -> &'static str {
        self.units()[0].0
    }

    /// Get conversion into the unit with the given name.
    pub fn unit(&self, name: &str) -> Option<UnitConversion> {
        self.units()
            .iter()
            .find(|(unit, _)| *unit == name)
            .map(|(_, conversion)| *conversion)
    }
}

/// Smooth a series using a one-dimensional gaussian filter.
///
/// The boundaries are handled by reflecting the data about the edge of the first and last value
/// (`d c b a | a b c d | d c b a`). The kernel is truncated at `4 * sigma`.
/// If `sigma` is not positive, the data are returned unchanged.
///
/// ## Example
/// ```
/// # use lamman_rs::structures::thermo::gaussian_filter1d;
/// # use float_cmp::assert_approx_eq;
/// #
/// let smoothed = gaussian_filter1d(&[2.0, 2.0, 2.0, 2.0], 1.5);
/// for value in smoothed {
///     assert_approx_eq!(f64, value, 2.0, epsilon = 1e-12);
/// }
/// ```
pub fn gaussian_filter1d(data: &[f64], sigma: f64) -> Vec<f64> {
    if data.is_empty() || sigma.is_nan() || sigma <= 0.0 {
        return data.to_vec();
    }

    let radius = (4.0 * sigma + 0.5) as isize;
    let mut kernel: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 * (x as f64 / sigma).powi(2)).exp())
        .collect();
    let norm: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= norm);

    let n = data.len() as isize;
    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * data[reflect_index(i + k as isize - radius, n)])
                .sum()
        })
        .collect()
}

/// Map an index outside of `0..n` to the reflected index (half-sample symmetric).
#[inline(always)]
fn reflect_index(index: isize, n: isize) -> usize {
    let period = 2 * n;
    let m = index.rem_euclid(period);
    if m < n {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn table() -> ThermoTable {
        ThermoTable::new(
            vec![
                "Step".to_owned(),
                "Temp".to_owned(),
                "PotEng".to_owned(),
                "Press".to_owned(),
                "Atoms".to_owned(),
            ],
            vec![
                vec![0.0, 300.0, -100.0, 1.0, 10.0],
                vec![10.0, 310.0, -90.0, 2.0, 10.0],
            ],
        )
    }

    #[test]
    fn columns() {
        let table = table();
        assert_eq!(table.steps().unwrap(), vec![0.0, 10.0]);
        assert_eq!(table.column("Temp").unwrap(), vec![300.0, 310.0]);
        assert_eq!(
            table.column("Volume"),
            Err(ThermoError::ColumnNotFound("Volume".to_owned()))
        );
        assert_eq!(table.get_n_rows(), 2);
    }

    #[test]
    fn conversions() {
        let table = table();
        let kj = table.converted_column("PotEng", Some("kJ/mol")).unwrap();
        assert_approx_eq!(f64, kj[0], -418.4, epsilon = 1e-9);

        let pa = table.converted_column("Press", Some("Pa")).unwrap();
        assert_approx_eq!(f64, pa[1], 202650.0, epsilon = 1e-6);

        let f = table.converted_column("Temp", Some("°F")).unwrap();
        assert_approx_eq!(f64, f[0], 80.33, epsilon = 1e-9);

        let native = table.converted_column("Atoms", None).unwrap();
        assert_eq!(native, vec![10.0, 10.0]);
    }

    #[test]
    fn conversion_unsupported() {
        let table = table();
        assert_eq!(
            table.converted_column("Temp", Some("bar")),
            Err(ThermoError::UnsupportedUnit("Temp".to_owned(), "bar".to_owned()))
        );
        assert_eq!(
            table.converted_column("Atoms", Some("K")),
            Err(ThermoError::UnsupportedUnit("Atoms".to_owned(), "K".to_owned()))
        );
    }

    #[test]
    fn property_classification() {
        assert_eq!(
            ThermoProperty::from_keyword("Enthalpy"),
            Some(ThermoProperty::Energy)
        );
        assert_eq!(ThermoProperty::from_keyword("Step"), None);
        assert_eq!(ThermoProperty::Volume.native_unit(), "Å³");
        assert_eq!(
            ThermoProperty::Volume.unit("nm³"),
            Some(UnitConversion::Scale(1e-3))
        );
    }

    #[test]
    fn reflect() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(9, 4), 1);
        assert_eq!(reflect_index(2, 4), 2);
    }

    #[test]
    fn gaussian_zero_sigma() {
        let data = [1.0, 5.0, 2.0];
        assert_eq!(gaussian_filter1d(&data, 0.0), data.to_vec());
    }

    #[test]
    fn gaussian_preserves_sum_of_impulse() {
        let mut data = vec![0.0; 41];
        data[20] = 1.0;
        let smoothed = gaussian_filter1d(&data, 2.0);
        let sum: f64 = smoothed.iter().sum();
        assert_approx_eq!(f64, sum, 1.0, epsilon = 1e-12);
        assert!(smoothed[20] > smoothed[19]);
        assert_approx_eq!(f64, smoothed[19], smoothed[21], epsilon = 1e-15);
    }

    #[test]
    fn gaussian_matches_reference() {
        // reference values from scipy.ndimage.gaussian_filter1d([1, 2, 3, 4, 5], 1)
        let smoothed = gaussian_filter1d(&[1.0, 2.0, 3.0, 4.0, 5.0], 1.0);
        let expected = [1.42704095, 2.06782203, 3.0, 3.93217797, 4.57295905];
        for (value, reference) in smoothed.iter().zip(expected.iter()) {
            assert_approx_eq!(f64, *value, *reference, epsilon = 1e-7);
        }
    }
}
