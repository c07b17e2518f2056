// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of analysis sessions owning the loaded data and the latest results.
//!
//! Each session owns its data exclusively. Loading a file replaces the data wholesale
//! and discards results calculated from the previous data. If loading fails,
//! the session is left untouched.

use std::path::{Path, PathBuf};

use crate::analysis::kinetics::{self, RateConstants};
use crate::analysis::msd::{Msd, MsdParams};
use crate::analysis::rdf::{Rdf, RdfParams};
use crate::config::ThermoParams;
use crate::errors::{
    KineticsError, MsdError, ParseDumpError, ParseSpeciesError, ParseThermoError, RdfError,
    ThermoError,
};
use crate::progress::ProgressPrinter;
use crate::structures::{
    species::{SpeciesRecord, SpeciesSnapshot},
    thermo::ThermoTable,
    trajectory::Trajectory,
};

/// Session of the structural analyses (RDF and MSD) of a dump trajectory.
///
/// ## Example
/// ```no_run
/// use lamman_rs::prelude::*;
///
/// let mut session = TrajectorySession::new();
/// session.load("dump.lammpstrj").unwrap();
///
/// let rdf = session.compute_rdf(&RdfParams::new("O", "H")).unwrap();
/// print!("{}", rdf);
///
/// let msd = session.compute_msd(&MsdParams::new("O")).unwrap();
/// print!("{}", msd);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TrajectorySession {
    source: Option<PathBuf>,
    trajectory: Option<Trajectory>,
    rdf: Option<Rdf>,
    msd: Option<Msd>,
}

impl TrajectorySession {
    pub fn new() -> Self {
        TrajectorySession::default()
    }

    /// Read a dump file and replace the currently held trajectory.
    ///
    /// ## Returns
    /// Reference to the new trajectory or `ParseDumpError` if the file could not be read.
    /// In case of an error, the previous trajectory and results are kept.
    pub fn load(&mut self, filename: impl AsRef<Path>) -> Result<&Trajectory, ParseDumpError> {
        let trajectory = Trajectory::from_dump(&filename)?;
        self.source = Some(filename.as_ref().to_path_buf());

        Ok(self.install(trajectory))
    }

    /// Replace the currently held trajectory with an already constructed one.
    pub fn replace(&mut self, trajectory: Trajectory) -> &Trajectory {
        self.source = None;
        self.install(trajectory)
    }

    /// Remove the trajectory and all results from the session.
    pub fn take(&mut self) -> Option<Trajectory> {
        self.source = None;
        self.rdf = None;
        self.msd = None;
        self.trajectory.take()
    }

    fn install(&mut self, trajectory: Trajectory) -> &Trajectory {
        self.rdf = None;
        self.msd = None;
        self.trajectory.insert(trajectory)
    }

    /// Path of the file the trajectory was read from.
    #[inline(always)]
    pub fn get_source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[inline(always)]
    pub fn get_trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    /// Get the result of the last successful RDF calculation.
    #[inline(always)]
    pub fn get_rdf(&self) -> Option<&Rdf> {
        self.rdf.as_ref()
    }

    /// Get the result of the last successful MSD calculation.
    #[inline(always)]
    pub fn get_msd(&self) -> Option<&Msd> {
        self.msd.as_ref()
    }

    /// Calculate the RDF of the held trajectory. The result replaces the previous one.
    ///
    /// ## Returns
    /// `RdfError::NoFrames` if no trajectory has been loaded.
    /// Otherwise see [`Trajectory::rdf`].
    pub fn compute_rdf(&mut self, params: &RdfParams) -> Result<&Rdf, RdfError> {
        let trajectory = self.trajectory.as_ref().ok_or(RdfError::NoFrames)?;
        let rdf = trajectory.rdf(params)?;
        Ok(self.rdf.insert(rdf))
    }

    /// Calculate the RDF of the held trajectory, reporting progress. The result replaces the previous one.
    pub fn compute_rdf_with_progress(
        &mut self,
        params: &RdfParams,
        printer: ProgressPrinter,
    ) -> Result<&Rdf, RdfError> {
        let trajectory = self.trajectory.as_ref().ok_or(RdfError::NoFrames)?;
        let rdf = trajectory.rdf_with_progress(params, printer)?;
        Ok(self.rdf.insert(rdf))
    }

    /// Calculate the MSD of the held trajectory. The result replaces the previous one.
    ///
    /// ## Returns
    /// `MsdError::NoFrames` if no trajectory has been loaded.
    /// Otherwise see [`Trajectory::msd`].
    pub fn compute_msd(&mut self, params: &MsdParams) -> Result<&Msd, MsdError> {
        let trajectory = self.trajectory.as_ref().ok_or(MsdError::NoFrames)?;
        let msd = trajectory.msd(params)?;
        Ok(self.msd.insert(msd))
    }
}

/// Session of the analysis of a single species log.
#[derive(Debug, Clone, Default)]
pub struct SpeciesSession {
    source: Option<PathBuf>,
    record: Option<SpeciesRecord>,
}

impl SpeciesSession {
    pub fn new() -> Self {
        SpeciesSession::default()
    }

    /// Read a species log and replace the currently held record.
    /// In case of an error, the previous record is kept.
    pub fn load(&mut self, filename: impl AsRef<Path>) -> Result<&SpeciesRecord, ParseSpeciesError> {
        let record = SpeciesRecord::from_log(&filename)?;
        self.source = Some(filename.as_ref().to_path_buf());

        Ok(self.record.insert(record))
    }

    /// Replace the currently held record with an already constructed one.
    pub fn replace(&mut self, record: SpeciesRecord) -> &SpeciesRecord {
        self.source = None;
        self.record.insert(record)
    }

    pub fn take(&mut self) -> Option<SpeciesRecord> {
        self.source = None;
        self.record.take()
    }

    #[inline(always)]
    pub fn get_source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[inline(always)]
    pub fn get_record(&self) -> Option<&SpeciesRecord> {
        self.record.as_ref()
    }

    /// Composition at the given timestep. `None` if nothing is loaded or the timestep is not recorded.
    pub fn snapshot(&self, timestep: u64, min_count: u64) -> Option<SpeciesSnapshot> {
        self.record.as_ref()?.snapshot(timestep, min_count)
    }

    /// Composition at the last recorded timestep.
    pub fn last_snapshot(&self, min_count: u64) -> Option<SpeciesSnapshot> {
        let record = self.record.as_ref()?;
        let last = *record.get_data().keys().next_back()?;
        record.snapshot(last, min_count)
    }

    /// Fit rate constants of the decay of `reagent`.
    ///
    /// ## Returns
    /// `KineticsError::SpeciesError` if no record has been loaded.
    /// Otherwise see [`kinetics::rate_constants`].
    pub fn rate_constants(&self, reagent: &str) -> Result<RateConstants, KineticsError> {
        let record = self
            .record
            .as_ref()
            .ok_or(KineticsError::SpeciesError(ParseSpeciesError::NoData))?;

        kinetics::rate_constants(record, reagent)
    }
}

/// Session of the analysis of thermodynamic output.
#[derive(Debug, Clone, Default)]
pub struct ThermoSession {
    source: Option<PathBuf>,
    table: Option<ThermoTable>,
}

impl ThermoSession {
    pub fn new() -> Self {
        ThermoSession::default()
    }

    /// Read thermo blocks of a LAMMPS log and replace the currently held table.
    /// In case of an error, the previous table is kept.
    pub fn load(&mut self, filename: impl AsRef<Path>) -> Result<&ThermoTable, ParseThermoError> {
        let table = ThermoTable::from_log(&filename)?;
        self.source = Some(filename.as_ref().to_path_buf());

        Ok(self.table.insert(table))
    }

    /// Replace the currently held table with an already constructed one.
    pub fn replace(&mut self, table: ThermoTable) -> &ThermoTable {
        self.source = None;
        self.table.insert(table)
    }

    pub fn take(&mut self) -> Option<ThermoTable> {
        self.source = None;
        self.table.take()
    }

    #[inline(always)]
    pub fn get_source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    #[inline(always)]
    pub fn get_table(&self) -> Option<&ThermoTable> {
        self.table.as_ref()
    }

    /// Get `(step, value)` pairs of the property described by `params`,
    /// converted into the requested unit and smoothed.
    ///
    /// ## Returns
    /// - `ThermoError::NotLoaded` if no table has been loaded.
    /// - `ThermoError::ColumnNotFound` if the table has no `Step` column or no column for the property.
    /// - `ThermoError::UnsupportedUnit` if the unit is not supported for the property.
    pub fn property(&self, params: &ThermoParams) -> Result<Vec<(f64, f64)>, ThermoError> {
        let table = self.table.as_ref().ok_or(ThermoError::NotLoaded)?;

        let steps = table.steps()?;
        let values = table.smoothed_column(&params.property, params.unit.as_deref(), params.sigma)?;

        Ok(steps.into_iter().zip(values).collect())
    }
}
