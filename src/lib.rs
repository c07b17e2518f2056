// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! # lamman_rs: LAMMPS Analysis Library for Rust
//!
//! Rust library for analyzing output of LAMMPS reactive simulations.
//!
//! ## Usage
//!
//! Run
//!
//! ```bash
//! $ cargo add lamman_rs
//! ```
//!
//! Import the crate in your Rust code:
//! ```
//! use lamman_rs::prelude::*;
//! ```
//!
//! ## Examples
//!
//! #### Radial distribution function
//!
//! Read a dump trajectory and calculate the O-H radial distribution function.
//!
//! ```no_run
//! use lamman_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     // read a dump file; its `ITEM: ATOMS` header must contain `id element x y z`
//!     let trajectory = Trajectory::from_dump("dump.lammpstrj")?;
//!
//!     // 150 bins between 0 and half of the shortest box dimension
//!     let params = RdfParams::new("O", "H").with_n_bins(150);
//!     let rdf = trajectory.rdf(&params)?;
//!
//!     // position of the first peak and the first coordination number
//!     if let Some(shell) = rdf.peaks().first() {
//!         println!("first peak at r = {:.3} Å", shell.peak_r());
//!         if let Some(cn) = shell.coordination_number() {
//!             println!("coordination number = {:.2}", cn);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Diffusion coefficient
//!
//! Calculate the mean squared displacement of oxygen atoms and the diffusion coefficient.
//! The time step of the simulation must be provided (default is 0.25 fs).
//!
//! ```no_run
//! use lamman_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let trajectory = Trajectory::from_dump("dump.lammpstrj")?;
//!
//!     let msd = trajectory.msd(&MsdParams::new("O").with_timestep(0.5))?;
//!     println!("D = {:.3e} cm²/s", msd.diffusion_cm2_s());
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Reaction kinetics
//!
//! Read species logs from simulations at different temperatures, fit first order rate constants
//! of oxygen consumption and obtain the activation energy.
//!
//! ```no_run
//! use lamman_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let mut study = KineticsStudy::new();
//!     for temperature in [2500.0, 2750.0, 3000.0] {
//!         study.add_experiment(format!("species_{}K.out", temperature), temperature)?;
//!     }
//!
//!     let rates = study.compute_rate_constants("O2")?;
//!     for experiment in rates.rates() {
//!         println!(
//!             "{} K: k = {:.3e} s⁻¹",
//!             experiment.temperature(),
//!             experiment.rates().get(RateOrder::First).k()
//!         );
//!     }
//!
//!     let arrhenius = study.fit_arrhenius(RateOrder::First)?;
//!     print!("{}", arrhenius);
//!
//!     Ok(())
//! }
//! ```
//!
//! #### Thermodynamic output
//!
//! Read thermo output (`thermo_modify line yaml`) from a LAMMPS log file
//! and get the temperature in degrees Celsius.
//!
//! ```no_run
//! use lamman_rs::prelude::*;
//! use std::error::Error;
//!
//! fn main() -> Result<(), Box<dyn Error>> {
//!     let table = ThermoTable::from_log("log.lammps")?;
//!
//!     let steps = table.steps()?;
//!     let temperature = table.smoothed_column("Temp", Some("°C"), 2.0)?;
//!
//!     for (step, temp) in steps.iter().zip(temperature.iter()) {
//!         println!("{:>10} {:8.2}", step, temp);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//! `lamman_rs` reports its progress and skipped input through the [`log`](https://docs.rs/log) facade.
//! No logger is installed by the library.
//!
//! ## Limitations
//! Only orthogonal simulation boxes are supported.
//!
//! ## License
//! This library is released under the MIT License.

/// Current version of the `lamman_rs` library.
pub const LAMMAN_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod analysis {
    pub mod kinetics;
    pub mod msd;
    pub mod peaks;
    pub mod rdf;
    pub mod regression;
}
pub mod config;
pub mod errors;
pub mod io {
    pub mod dump_io;
    pub mod species_io;
    pub mod thermo_io;
}
pub mod progress;
pub mod session;
pub mod structures {
    pub mod cellgrid;
    pub mod frame;
    pub mod simbox;
    pub mod species;
    pub mod thermo;
    pub mod trajectory;
    pub mod vector3d;
}

/// Reexported basic `lamman_rs` structures, functions and errors.
pub mod prelude {
    pub use crate::analysis::kinetics::{
        arrhenius, rate_constants, Arrhenius, KineticsStudy, RateConstants, RateFit, RateOrder,
        GAS_CONSTANT,
    };
    pub use crate::analysis::msd::{Msd, MsdParams};
    pub use crate::analysis::rdf::{PbcMode, Rdf, RdfParams};
    pub use crate::analysis::regression::LinearFit;
    pub use crate::config::{AnalysisConfig, KineticsParams, ThermoParams};
    pub use crate::errors::{
        ConfigError, ErrorKind, KineticsError, MsdError, ParseDumpError, ParseSpeciesError,
        ParseThermoError, RdfError, RegressionError, SimBoxError, ThermoError, WriteDumpError,
    };
    pub use crate::progress::{ProgressPrinter, ProgressStatus};
    pub use crate::session::{SpeciesSession, ThermoSession, TrajectorySession};
    pub use crate::structures::frame::{AtomRecord, Frame};
    pub use crate::structures::simbox::SimBox;
    pub use crate::structures::species::{SpeciesRecord, SpeciesSnapshot};
    pub use crate::structures::thermo::{ThermoProperty, ThermoTable};
    pub use crate::structures::trajectory::Trajectory;
    pub use crate::structures::vector3d::Vector3D;
}
