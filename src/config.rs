// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of the analysis configuration loadable from YAML files.
//!
//! Every analysis has its own optional section. Sections which are not present
//! in the configuration are not validated.
//!
//! ```yaml
//! rdf:
//!   element1: O
//!   element2: H
//!   n_bins: 150
//!   pbc: periodic
//! msd:
//!   element: O
//!   timestep_fs: 0.5
//! kinetics:
//!   reagent: O2
//!   order: first
//!   experiments:
//!     - path: species_300K.out
//!       temperature: 300
//!     - path: species_350K.out
//!       temperature: 350
//! thermo:
//!   property: Temp
//!   unit: °C
//!   sigma: 2.0
//! ```

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::kinetics::{KineticsStudy, RateOrder};
use crate::analysis::msd::MsdParams;
use crate::analysis::rdf::RdfParams;
use crate::errors::{ConfigError, KineticsError};
use crate::structures::thermo::ThermoProperty;

/// Species log of one experiment of the kinetics analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExperimentParams {
    pub path: PathBuf,
    /// Temperature of the simulation (in K).
    pub temperature: f64,
}

/// Parameters of the kinetics analysis.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KineticsParams {
    /// Formula of the decaying species.
    pub reagent: String,
    /// Order of the rate constants used in the Arrhenius fit.
    pub order: RateOrder,
    pub experiments: Vec<ExperimentParams>,
}

impl KineticsParams {
    /// Construct a `KineticsStudy` containing all the experiments.
    /// Species logs are not read.
    pub fn build_study(&self) -> Result<KineticsStudy, KineticsError> {
        let mut study = KineticsStudy::new();
        for experiment in self.experiments.iter() {
            study.add_experiment(&experiment.path, experiment.temperature)?;
        }

        Ok(study)
    }
}

/// Parameters of the processing of a thermo column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermoParams {
    /// Keyword of the thermo column.
    pub property: String,
    /// Target unit. Native unit is used if not provided.
    pub unit: Option<String>,
    /// Standard deviation of the gaussian smoothing (in rows). 0 means no smoothing.
    pub sigma: f64,
}

impl Default for ThermoParams {
    fn default() -> Self {
        ThermoParams {
            property: String::from("Temp"),
            unit: None,
            sigma: 0.0,
        }
    }
}

/// Configuration of all analyses.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    pub rdf: Option<RdfParams>,
    pub msd: Option<MsdParams>,
    pub kinetics: Option<KineticsParams>,
    pub thermo: Option<ThermoParams>,
}

impl AnalysisConfig {
    /// Read and validate configuration from a YAML file.
    ///
    /// ## Returns
    /// - `AnalysisConfig` if the file could be read, parsed and all present sections are valid.
    /// - `ConfigError::FileNotFound` or `ConfigError::CouldNotRead` if the file can not be read.
    /// - `ConfigError::ParseErr` if the file is not a valid configuration.
    /// - `ConfigError::InvalidValue` if any of the parameters is invalid.
    ///
    /// ## Example
    /// ```no_run
    /// use lamman_rs::prelude::*;
    ///
    /// let config = AnalysisConfig::from_yaml_file("analysis.yaml").unwrap();
    /// let trajectory = Trajectory::from_dump("dump.lammpstrj").unwrap();
    ///
    /// if let Some(params) = config.rdf.as_ref() {
    ///     let rdf = trajectory.rdf(params).unwrap();
    ///     print!("{}", rdf);
    /// }
    /// ```
    pub fn from_yaml_file(filename: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut file = File::open(filename.as_ref())
            .map_err(|_| ConfigError::FileNotFound(Box::from(filename.as_ref())))?;

        let mut yaml = String::new();
        file.read_to_string(&mut yaml)
            .map_err(|_| ConfigError::CouldNotRead(Box::from(filename.as_ref())))?;

        let config = AnalysisConfig::from_yaml_str(&yaml)?;
        log::info!(
            "Read analysis configuration from `{}`.",
            filename.as_ref().display()
        );

        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    /// An empty string results in the default configuration.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config = if yaml.trim().is_empty() {
            AnalysisConfig::default()
        } else {
            serde_yaml::from_str::<AnalysisConfig>(yaml)
                .map_err(|e| ConfigError::ParseErr(e.to_string()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Check all sections present in the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(rdf) = self.rdf.as_ref() {
            validate_rdf(rdf)?;
        }

        if let Some(msd) = self.msd.as_ref() {
            validate_msd(msd)?;
        }

        if let Some(kinetics) = self.kinetics.as_ref() {
            validate_kinetics(kinetics)?;
        }

        if let Some(thermo) = self.thermo.as_ref() {
            validate_thermo(thermo)?;
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue(field.to_owned(), reason.to_owned())
}

fn validate_rdf(params: &RdfParams) -> Result<(), ConfigError> {
    if params.element1.trim().is_empty() {
        return Err(invalid("rdf.element1", "element must not be empty"));
    }

    if params.element2.trim().is_empty() {
        return Err(invalid("rdf.element2", "element must not be empty"));
    }

    if params.n_bins == 0 {
        return Err(invalid("rdf.n_bins", "must be positive"));
    }

    if params.max_frames == 0 {
        return Err(invalid("rdf.max_frames", "must be positive"));
    }

    Ok(())
}

fn validate_msd(params: &MsdParams) -> Result<(), ConfigError> {
    if params.element.trim().is_empty() {
        return Err(invalid("msd.element", "element must not be empty"));
    }

    if !(params.timestep_fs.is_finite() && params.timestep_fs > 0.0) {
        return Err(invalid("msd.timestep_fs", "must be positive"));
    }

    Ok(())
}

fn validate_kinetics(params: &KineticsParams) -> Result<(), ConfigError> {
    if params.reagent.trim().is_empty() {
        return Err(invalid("kinetics.reagent", "reagent must not be empty"));
    }

    for (i, experiment) in params.experiments.iter().enumerate() {
        if !(experiment.temperature.is_finite() && experiment.temperature > 0.0) {
            return Err(invalid(
                &format!("kinetics.experiments[{}].temperature", i),
                "must be positive",
            ));
        }
    }

    Ok(())
}

fn validate_thermo(params: &ThermoParams) -> Result<(), ConfigError> {
    if params.property.trim().is_empty() {
        return Err(invalid("thermo.property", "keyword must not be empty"));
    }

    if !(params.sigma.is_finite() && params.sigma >= 0.0) {
        return Err(invalid("thermo.sigma", "must not be negative"));
    }

    if let Some(unit) = params.unit.as_deref() {
        let known = ThermoProperty::from_keyword(&params.property)
            .map(|property| property.unit(unit).is_some())
            .unwrap_or(false);

        if !known {
            return Err(invalid(
                "thermo.unit",
                &format!("unit `{}` is not supported for `{}`", unit, params.property),
            ));
        }
    }

    Ok(())
}
