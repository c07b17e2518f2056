// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of errors returned by the `lamman_rs` library.

use std::path::Path;
use thiserror::Error;

/// Broad category of a failure.
///
/// Every error of the library can be classified using its `kind` method.
/// All kinds of errors are recoverable: none of them corrupts previously loaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// File is missing or could not be read.
    FileAccess,
    /// Required marker, column, block or numeric value is missing or malformed.
    Format,
    /// Too few valid points for the requested calculation.
    InsufficientData,
    /// Requested element, species, column or order has no corresponding data.
    Selection,
}

/// Errors that can occur when working with simulation box.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimBoxError {
    #[error("Simulation box dimensions `{0}` are not all positive and finite.")]
    NotPositive(String),
}

impl SimBoxError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

/// Errors that can occur when constructing a `CellGrid`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CellGridError {
    #[error("Cell size `{0}` is not positive.")]
    InvalidCellSize(String),
    #[error("Invalid simulation box: {0}")]
    SimBoxError(SimBoxError),
}

impl CellGridError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

/// Errors that can occur when reading and parsing a dump (lammpstrj) file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseDumpError {
    #[error("File `{}` was not found.", .0.display())]
    FileNotFound(Box<Path>),
    #[error("Could not read dump data: {0}")]
    CouldNotRead(String),
    #[error("Dump ended unexpectedly while reading `{0}`.")]
    UnexpectedEnd(String),
    #[error("Could not parse line `{0}`.")]
    ParseLineErr(String),
    #[error("Required column `{0}` is missing from the `ITEM: ATOMS` header.")]
    MissingColumn(String),
    #[error("`ITEM: ATOMS` section encountered before any `ITEM: TIMESTEP`.")]
    AtomsBeforeTimestep,
    #[error("Invalid simulation box: {0}")]
    InvalidSimBox(SimBoxError),
    #[error("No `ITEM: BOX BOUNDS pp pp pp` section found in the dump.")]
    MissingSimBox,
    #[error("No valid frame found in the dump.")]
    NoFrames,
}

impl ParseDumpError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) | Self::CouldNotRead(_) => ErrorKind::FileAccess,
            _ => ErrorKind::Format,
        }
    }
}

/// Errors that can occur when writing a dump file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteDumpError {
    #[error("File `{}` could not be created.", .0.display())]
    CouldNotCreate(Box<Path>),
    #[error("Could not write line into file.")]
    CouldNotWrite,
}

impl WriteDumpError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::FileAccess
    }
}

/// Errors that can occur when reading and parsing a ReaxFF species log.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseSpeciesError {
    #[error("File `{}` was not found.", .0.display())]
    FileNotFound(Box<Path>),
    #[error("Could not read species log: {0}")]
    CouldNotRead(String),
    #[error("Could not parse species counts on line `{0}`.")]
    ParseCountErr(String),
    #[error("No valid species data found.")]
    NoData,
}

impl ParseSpeciesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) | Self::CouldNotRead(_) => ErrorKind::FileAccess,
            _ => ErrorKind::Format,
        }
    }
}

/// Errors that can occur when reading and parsing thermodynamic output of a log file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseThermoError {
    #[error("File `{}` was not found.", .0.display())]
    FileNotFound(Box<Path>),
    #[error("Could not read log file: {0}")]
    CouldNotRead(String),
    #[error("No thermo data found in YAML blocks of the log.")]
    NoData,
}

impl ParseThermoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) | Self::CouldNotRead(_) => ErrorKind::FileAccess,
            Self::NoData => ErrorKind::Format,
        }
    }
}

/// Errors that can occur when querying a thermo table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThermoError {
    #[error("Column `{0}` does not exist in the thermo table.")]
    ColumnNotFound(String),
    #[error("Unit `{1}` is not supported for property `{0}`.")]
    UnsupportedUnit(String, String),
    #[error("No thermo data have been loaded.")]
    NotLoaded,
}

impl ThermoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotLoaded => ErrorKind::InsufficientData,
            _ => ErrorKind::Selection,
        }
    }
}

/// Errors that can occur when fitting a line by least squares.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegressionError {
    #[error("Linear regression requires at least 2 points (got {0}).")]
    NotEnoughPoints(usize),
    #[error("Number of x values ({0}) does not match the number of y values ({1}).")]
    LengthMismatch(usize, usize),
    #[error("Cannot calculate a linear regression if all x values are identical.")]
    IdenticalX,
}

impl RegressionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LengthMismatch(_, _) => ErrorKind::Format,
            _ => ErrorKind::InsufficientData,
        }
    }
}

/// Errors that can occur when calculating radial distribution function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RdfError {
    #[error("Trajectory contains no frames.")]
    NoFrames,
    #[error("Element `{0}` is not present in the trajectory.")]
    ElementNotFound(String),
    #[error("No frame contains both `{0}` and `{1}`.")]
    NoCommonFrame(String, String),
    #[error("No `{0}`-`{1}` pairs found within the cutoff.")]
    NoPairs(String, String),
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Invalid simulation box: {0}")]
    InvalidSimBox(SimBoxError),
    #[error("Could not construct cell grid: {0}")]
    CellGridError(CellGridError),
}

impl RdfError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFrames | Self::NoPairs(_, _) => ErrorKind::InsufficientData,
            Self::ElementNotFound(_) | Self::NoCommonFrame(_, _) => ErrorKind::Selection,
            Self::InvalidParameters(_) | Self::InvalidSimBox(_) | Self::CellGridError(_) => {
                ErrorKind::Format
            }
        }
    }
}

/// Errors that can occur when calculating mean squared displacement.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MsdError {
    #[error("Trajectory contains no frames.")]
    NoFrames,
    #[error("No atom of element `{0}` found in the first frame.")]
    ElementNotFound(String),
    #[error("Not enough frames for the linear fit of MSD (got {0}, need at least 4).")]
    NotEnoughFrames(usize),
    #[error("Invalid time step `{0}` fs.")]
    InvalidTimestep(String),
    #[error("Could not fit MSD: {0}")]
    RegressionError(RegressionError),
}

impl MsdError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFrames | Self::NotEnoughFrames(_) => ErrorKind::InsufficientData,
            Self::ElementNotFound(_) => ErrorKind::Selection,
            Self::InvalidTimestep(_) => ErrorKind::Format,
            Self::RegressionError(e) => e.kind(),
        }
    }
}

/// Errors that can occur when analyzing reaction kinetics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KineticsError {
    #[error("No experiments have been added.")]
    NoExperiments,
    #[error("Experiment with index `{0}` does not exist.")]
    ExperimentNotFound(usize),
    #[error("Temperature `{0}` K is not positive and finite.")]
    InvalidTemperature(String),
    #[error("Reagent `{0}` is not present in any loaded species log.")]
    ReagentNotFound(String),
    #[error("Reagent `{0}` has only {1} time points with positive count (need at least 3).")]
    NotEnoughPoints(String, usize),
    #[error("At least 2 valid rate constants are needed for the Arrhenius fit (got {0}).")]
    NotEnoughRateConstants(usize),
    #[error("Could not fit kinetics data: {0}")]
    RegressionError(RegressionError),
    #[error("Could not load species log: {0}")]
    SpeciesError(ParseSpeciesError),
}

impl KineticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoExperiments
            | Self::NotEnoughPoints(_, _)
            | Self::NotEnoughRateConstants(_) => ErrorKind::InsufficientData,
            Self::ExperimentNotFound(_) | Self::ReagentNotFound(_) => ErrorKind::Selection,
            Self::InvalidTemperature(_) => ErrorKind::Format,
            Self::RegressionError(e) => e.kind(),
            Self::SpeciesError(e) => e.kind(),
        }
    }
}

/// Errors that can occur when reading or validating analysis configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("File `{}` was not found.", .0.display())]
    FileNotFound(Box<Path>),
    #[error("File `{}` could not be read.", .0.display())]
    CouldNotRead(Box<Path>),
    #[error("Could not parse configuration: {0}")]
    ParseErr(String),
    #[error("Invalid value of `{0}`: {1}.")]
    InvalidValue(String, String),
}

impl ConfigError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) | Self::CouldNotRead(_) => ErrorKind::FileAccess,
            _ => ErrorKind::Format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(
            ParseDumpError::FileNotFound(Box::from(Path::new("x"))).kind(),
            ErrorKind::FileAccess
        );
        assert_eq!(ParseDumpError::NoFrames.kind(), ErrorKind::Format);
        assert_eq!(
            RdfError::ElementNotFound("O".to_owned()).kind(),
            ErrorKind::Selection
        );
        assert_eq!(
            MsdError::RegressionError(RegressionError::IdenticalX).kind(),
            ErrorKind::InsufficientData
        );
        assert_eq!(
            KineticsError::SpeciesError(ParseSpeciesError::NoData).kind(),
            ErrorKind::Format
        );
    }

    #[test]
    fn messages() {
        assert_eq!(
            ParseDumpError::MissingColumn("element".to_owned()).to_string(),
            "Required column `element` is missing from the `ITEM: ATOMS` header."
        );
        assert_eq!(
            KineticsError::NotEnoughPoints("H2O".to_owned(), 2).to_string(),
            "Reagent `H2O` has only 2 time points with positive count (need at least 3)."
        );
    }
}
