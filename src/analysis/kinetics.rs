// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of rate-constant fitting from species counts and of the Arrhenius analysis.

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::analysis::regression::linear_regression;
use crate::errors::{KineticsError, ParseSpeciesError};
use crate::io::species_io;
use crate::structures::species::SpeciesRecord;

/// Gas constant in J/(mol·K).
pub const GAS_CONSTANT: f64 = 8.31446;

/// Minimal number of time points with positive count required to fit rate constants.
const MIN_RATE_POINTS: usize = 3;

/// Order of the integrated rate law.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateOrder {
    /// `c` is linear in time.
    Zero,
    /// `ln c` is linear in time.
    #[default]
    First,
    /// `1/c` is linear in time.
    Second,
}

impl RateOrder {
    pub const ALL: [RateOrder; 3] = [RateOrder::Zero, RateOrder::First, RateOrder::Second];

    /// Numeric order of the reaction.
    pub fn as_number(&self) -> u8 {
        match self {
            RateOrder::Zero => 0,
            RateOrder::First => 1,
            RateOrder::Second => 2,
        }
    }

    /// Units of the rate constant of this order.
    pub fn units(&self) -> &'static str {
        match self {
            RateOrder::Zero => "mol·L⁻¹·s⁻¹",
            RateOrder::First => "s⁻¹",
            RateOrder::Second => "L·mol⁻¹·s⁻¹",
        }
    }

    /// Transform a concentration to the quantity which is linear in time.
    fn linearize(&self, concentration: f64) -> f64 {
        match self {
            RateOrder::Zero => concentration,
            RateOrder::First => concentration.ln(),
            RateOrder::Second => 1.0 / concentration,
        }
    }

    /// Convert the slope of the linearized data to the rate constant.
    fn rate_constant(&self, slope: f64) -> f64 {
        match self {
            RateOrder::Zero | RateOrder::First => -slope,
            RateOrder::Second => slope,
        }
    }
}

impl fmt::Display for RateOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order {}", self.as_number())
    }
}

/// Rate constant of a single order and the quality of its fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RateFit {
    k: f64,
    r_squared: f64,
}

/// Rate constants of zero, first and second order fitted to the decay of a reagent.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct RateConstants {
    #[getset(get = "pub")]
    reagent: String,
    /// Number of time points used for the fits.
    #[getset(get_copy = "pub")]
    n_points: usize,
    fits: [RateFit; 3],
}

impl RateConstants {
    /// Get the fit of the given order.
    #[inline(always)]
    pub fn get(&self, order: RateOrder) -> RateFit {
        self.fits[order.as_number() as usize]
    }

    /// Get the order with the highest R².
    pub fn best_order(&self) -> RateOrder {
        let mut best = RateOrder::Zero;
        for order in RateOrder::ALL {
            if self.get(order).r_squared > self.get(best).r_squared {
                best = order;
            }
        }
        best
    }
}

/// Fit zero-, first- and second-order rate laws to the count of `reagent` over time.
///
/// Timesteps are used as the time axis, so rate constants are per timestep.
/// Timesteps at which the reagent is absent (or has zero count) are ignored.
///
/// ## Returns
/// - `RateConstants` if successful.
/// - `KineticsError::NotEnoughPoints` if fewer than 3 timesteps have a positive count.
///
/// ## Example
/// ```
/// # use lamman_rs::prelude::*;
/// # use lamman_rs::io::species_io::parse_species;
/// #
/// let log: String = ["0 1 1 1000", "100 1 1 800", "200 1 1 640"]
///     .iter()
///     .map(|data| format!("# Timestep No_Moles No_Specs O2\n{}\n", data))
///     .collect();
/// let record = parse_species(log.as_bytes()).unwrap();
/// let rates = rate_constants(&record, "O2").unwrap();
///
/// assert!(rates.get(RateOrder::First).r_squared() > 0.9999);
/// ```
pub fn rate_constants(record: &SpeciesRecord, reagent: &str) -> Result<RateConstants, KineticsError> {
    let (time, concentration): (Vec<f64>, Vec<f64>) = record
        .series(reagent)
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .map(|(timestep, count)| (timestep as f64, count as f64))
        .unzip();

    if time.len() < MIN_RATE_POINTS {
        return Err(KineticsError::NotEnoughPoints(reagent.to_owned(), time.len()));
    }

    let mut fits = [RateFit {
        k: 0.0,
        r_squared: 0.0,
    }; 3];

    for order in RateOrder::ALL {
        let linearized: Vec<f64> = concentration.iter().map(|&c| order.linearize(c)).collect();
        let fit = linear_regression(&time, &linearized).map_err(KineticsError::RegressionError)?;

        fits[order.as_number() as usize] = RateFit {
            k: order.rate_constant(fit.slope()),
            r_squared: fit.r_squared(),
        };
    }

    Ok(RateConstants {
        reagent: reagent.to_owned(),
        n_points: time.len(),
        fits,
    })
}

/// Result of the Arrhenius analysis `ln k = ln A - Ea / (R T)`.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct Arrhenius {
    /// Activation energy (in kJ/mol).
    #[getset(get_copy = "pub")]
    activation_energy: f64,
    /// Pre-exponential factor (in the units of the rate constants).
    #[getset(get_copy = "pub")]
    pre_exponential_factor: f64,
    #[getset(get_copy = "pub")]
    r_squared: f64,
    /// Order of the rate constants, if known.
    #[getset(get_copy = "pub")]
    order: Option<RateOrder>,
    /// `(temperature, k)` points used for the fit.
    #[getset(get = "pub")]
    points: Vec<(f64, f64)>,
}

/// Fit the Arrhenius equation to `(temperature in K, rate constant)` points.
///
/// Points with a rate constant that is not positive and finite are ignored (with a warning).
///
/// ## Returns
/// - `Arrhenius` if successful.
/// - `KineticsError::InvalidTemperature` if any temperature is not positive and finite.
/// - `KineticsError::NotEnoughRateConstants` if fewer than 2 valid points remain.
///
/// ## Example
/// ```
/// # use lamman_rs::prelude::*;
/// # use float_cmp::assert_approx_eq;
/// #
/// let k = |t: f64| 1e10 * (-40_000.0 / (GAS_CONSTANT * t)).exp();
/// let points = [(300.0, k(300.0)), (400.0, k(400.0)), (500.0, k(500.0))];
///
/// let fit = arrhenius(&points).unwrap();
/// assert_approx_eq!(f64, fit.activation_energy(), 40.0, epsilon = 1e-8);
/// ```
pub fn arrhenius(points: &[(f64, f64)]) -> Result<Arrhenius, KineticsError> {
    let mut valid = Vec::with_capacity(points.len());

    for &(temperature, k) in points {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(KineticsError::InvalidTemperature(temperature.to_string()));
        }

        if k.is_finite() && k > 0.0 {
            valid.push((temperature, k));
        } else {
            log::warn!(
                "Rate constant `{}` at {} K is not positive and will be ignored.",
                k,
                temperature
            );
        }
    }

    if valid.len() < 2 {
        return Err(KineticsError::NotEnoughRateConstants(valid.len()));
    }

    let inverse_t: Vec<f64> = valid.iter().map(|(t, _)| 1.0 / t).collect();
    let ln_k: Vec<f64> = valid.iter().map(|(_, k)| k.ln()).collect();
    let fit = linear_regression(&inverse_t, &ln_k).map_err(KineticsError::RegressionError)?;

    Ok(Arrhenius {
        activation_energy: -fit.slope() * GAS_CONSTANT / 1000.0,
        pre_exponential_factor: fit.intercept().exp(),
        r_squared: fit.r_squared(),
        order: None,
        points: valid,
    })
}

impl fmt::Display for Arrhenius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ea = {:.2} kJ/mol", self.activation_energy)?;
        match self.order {
            Some(order) => writeln!(f, "A  = {:.3e} {}", self.pre_exponential_factor, order.units())?,
            None => writeln!(f, "A  = {:.3e}", self.pre_exponential_factor)?,
        }
        writeln!(f, "R² = {:.4}", self.r_squared)
    }
}

/// Species log of a simulation performed at a specific temperature.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Experiment {
    #[getset(get = "pub")]
    path: PathBuf,
    /// Temperature (in K).
    #[getset(get_copy = "pub")]
    temperature: f64,
    /// Parsed species log. `None` until the log has been successfully read.
    #[getset(get = "pub")]
    species: Option<SpeciesRecord>,
}

impl Experiment {
    /// Read the species log unless it has been read already.
    fn load(&mut self) -> Result<(), ParseSpeciesError> {
        if self.species.is_none() {
            self.species = Some(species_io::read_species(&self.path)?);
        }

        Ok(())
    }
}

/// Rate constants obtained for one experiment of a [`KineticsStudy`].
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct ExperimentRates {
    /// Index of the experiment in the study.
    #[getset(get_copy = "pub")]
    index: usize,
    #[getset(get_copy = "pub")]
    temperature: f64,
    #[getset(get = "pub")]
    rates: RateConstants,
}

/// Rate constants of all experiments of a [`KineticsStudy`] for one reagent.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
#[getset(get = "pub")]
pub struct StudyRates {
    reagent: String,
    /// Experiments for which the rate constants were obtained.
    rates: Vec<ExperimentRates>,
    /// Indices of experiments that could not be analyzed.
    skipped: Vec<usize>,
}

/// Set of experiments performed at different temperatures.
///
/// Species logs are read lazily, when the reagents or the rate constants are requested.
/// Adding or removing an experiment discards previously calculated rate constants.
///
/// ## Example
/// ```no_run
/// # use lamman_rs::prelude::*;
/// #
/// let mut study = KineticsStudy::new();
/// study.add_experiment("species_300K.out", 300.0).unwrap();
/// study.add_experiment("species_350K.out", 350.0).unwrap();
/// study.add_experiment("species_400K.out", 400.0).unwrap();
///
/// println!("Reagents: {:?}", study.reagents());
///
/// study.compute_rate_constants("O2").unwrap();
/// let fit = study.fit_arrhenius(RateOrder::First).unwrap();
/// print!("{}", fit);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KineticsStudy {
    experiments: Vec<Experiment>,
    rates: Option<StudyRates>,
}

impl KineticsStudy {
    pub fn new() -> Self {
        KineticsStudy::default()
    }

    /// Add a species log recorded at `temperature` (in K). Returns the index of the experiment.
    /// The log is not read until it is needed.
    pub fn add_experiment(
        &mut self,
        path: impl AsRef<Path>,
        temperature: f64,
    ) -> Result<usize, KineticsError> {
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(KineticsError::InvalidTemperature(temperature.to_string()));
        }

        self.experiments.push(Experiment {
            path: path.as_ref().to_path_buf(),
            temperature,
            species: None,
        });
        self.rates = None;

        Ok(self.experiments.len() - 1)
    }

    /// Remove the experiment with the given index. Indices of the following experiments are shifted.
    pub fn remove_experiment(&mut self, index: usize) -> Result<Experiment, KineticsError> {
        if index >= self.experiments.len() {
            return Err(KineticsError::ExperimentNotFound(index));
        }

        self.rates = None;
        Ok(self.experiments.remove(index))
    }

    #[inline(always)]
    pub fn get_experiments(&self) -> &[Experiment] {
        &self.experiments
    }

    #[inline(always)]
    pub fn get_n_experiments(&self) -> usize {
        self.experiments.len()
    }

    /// Get the rate constants from the last call to `compute_rate_constants`.
    #[inline(always)]
    pub fn get_rates(&self) -> Option<&StudyRates> {
        self.rates.as_ref()
    }

    /// Read species logs of all experiments that have not been read yet.
    /// Returns indices of experiments whose logs could not be read.
    /// Such experiments are retried on the next call.
    pub fn load_species(&mut self) -> Vec<usize> {
        let mut failed = Vec::new();

        for (i, experiment) in self.experiments.iter_mut().enumerate() {
            if let Err(e) = experiment.load() {
                log::warn!(
                    "Could not read species log `{}`: {}",
                    experiment.path.display(),
                    e
                );
                failed.push(i);
            }
        }

        failed
    }

    /// Get sorted unique formulas of species present in any of the experiments.
    pub fn reagents(&mut self) -> Vec<String> {
        self.load_species();

        self.experiments
            .iter()
            .filter_map(|experiment| experiment.species.as_ref())
            .flat_map(|record| record.species())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Fit rate constants of all three orders to the decay of `reagent` in every experiment.
    ///
    /// Experiments whose species log can not be read or which do not contain enough
    /// points are skipped with a warning and listed in [`StudyRates::skipped`].
    ///
    /// ## Returns
    /// - Reference to the calculated `StudyRates` if successful. The rates are also
    ///   stored in the study and used by `fit_arrhenius`.
    /// - `KineticsError::NoExperiments` if the study contains no experiments.
    /// - `KineticsError::ReagentNotFound` if no experiment contains the reagent.
    pub fn compute_rate_constants(&mut self, reagent: &str) -> Result<&StudyRates, KineticsError> {
        if self.experiments.is_empty() {
            return Err(KineticsError::NoExperiments);
        }

        if !self.reagents().iter().any(|r| r == reagent) {
            return Err(KineticsError::ReagentNotFound(reagent.to_owned()));
        }

        let mut rates = Vec::new();
        let mut skipped = Vec::new();

        for (index, experiment) in self.experiments.iter().enumerate() {
            let result = match experiment.species.as_ref() {
                Some(record) => rate_constants(record, reagent),
                None => {
                    skipped.push(index);
                    continue;
                }
            };

            match result {
                Ok(constants) => rates.push(ExperimentRates {
                    index,
                    temperature: experiment.temperature,
                    rates: constants,
                }),
                Err(e) => {
                    log::warn!(
                        "Experiment `{}` at {} K skipped: {}",
                        experiment.path.display(),
                        experiment.temperature,
                        e
                    );
                    skipped.push(index);
                }
            }
        }

        Ok(self.rates.insert(StudyRates {
            reagent: reagent.to_owned(),
            rates,
            skipped,
        }))
    }

    /// Fit the Arrhenius equation to the rate constants of the given order
    /// obtained by the last call to `compute_rate_constants`.
    pub fn fit_arrhenius(&self, order: RateOrder) -> Result<Arrhenius, KineticsError> {
        let rates = match self.rates.as_ref() {
            Some(x) if x.rates.len() >= 2 => x,
            Some(x) => return Err(KineticsError::NotEnoughRateConstants(x.rates.len())),
            None => return Err(KineticsError::NotEnoughRateConstants(0)),
        };

        let points: Vec<(f64, f64)> = rates
            .rates
            .iter()
            .map(|exp| (exp.temperature, exp.rates.get(order).k))
            .collect();

        let mut fit = arrhenius(&points)?;
        fit.order = Some(order);

        log::info!(
            "Arrhenius fit of `{}` ({}): Ea = {:.2} kJ/mol.",
            rates.reagent,
            order,
            fit.activation_energy
        );

        Ok(fit)
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
