// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of the calculation of mean squared displacement and diffusion coefficient.

use std::fmt;

use getset::{CopyGetters, Getters};
use hashbrown::HashMap;
use ndarray::{s, Array3, Axis};
use serde::{Deserialize, Serialize};

use crate::analysis::regression::{linear_regression, LinearFit};
use crate::errors::MsdError;
use crate::structures::{trajectory::Trajectory, vector3d::min_image};

/// Conversion of Å²/ps to cm²/s.
const A2_PS_TO_CM2_S: f64 = 1e-4;

/// Parameters of the MSD calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MsdParams {
    /// Element of the tracked atoms.
    pub element: String,
    /// Integration time step of the simulation (in fs).
    pub timestep_fs: f64,
}

impl Default for MsdParams {
    fn default() -> Self {
        MsdParams {
            element: String::new(),
            timestep_fs: 0.25,
        }
    }
}

impl MsdParams {
    /// Create MSD parameters for an element using the default time step of 0.25 fs.
    pub fn new(element: &str) -> Self {
        MsdParams {
            element: element.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_timestep(mut self, timestep_fs: f64) -> Self {
        self.timestep_fs = timestep_fs;
        self
    }
}

/// Mean squared displacement of an element and the diffusion coefficient obtained from it.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct Msd {
    #[getset(get = "pub")]
    element: String,
    /// Number of tracked atoms.
    #[getset(get_copy = "pub")]
    n_atoms: usize,
    /// Time of each frame relative to the first frame (in ps).
    #[getset(get = "pub")]
    time: Vec<f64>,
    /// MSD for each time lag (in Å²).
    #[getset(get = "pub")]
    msd: Vec<f64>,
    /// Times used for the linear fit (in ps).
    #[getset(get = "pub")]
    fit_time: Vec<f64>,
    /// Fitted line evaluated at `fit_time` (in Å²).
    #[getset(get = "pub")]
    fit_msd: Vec<f64>,
    #[getset(get_copy = "pub")]
    fit: LinearFit,
    /// Diffusion coefficient (in Å²/ps).
    #[getset(get_copy = "pub")]
    diffusion_a2_ps: f64,
    /// Diffusion coefficient (in cm²/s).
    #[getset(get_copy = "pub")]
    diffusion_cm2_s: f64,
}

/// ## Methods for calculating mean squared displacement.
impl Trajectory {
    /// Calculate the mean squared displacement of atoms of the selected element
    /// and estimate the diffusion coefficient from its long-time slope.
    ///
    /// ## Returns
    /// - `Msd` structure if successful.
    /// - `MsdError` if the trajectory is empty, the element is not present in the first frame,
    ///   the time step is not positive, or the trajectory has fewer than 4 frames.
    ///
    /// ## Example
    /// ```no_run
    /// # use lamman_rs::prelude::*;
    /// #
    /// let trajectory = Trajectory::from_dump("dump.lammpstrj").unwrap();
    /// let msd = trajectory.msd(&MsdParams::new("O").with_timestep(0.5)).unwrap();
    ///
    /// println!("D = {:.3e} cm²/s", msd.diffusion_cm2_s());
    /// ```
    ///
    /// ## Notes
    /// - Atoms of the element present in the first frame are tracked.
    ///   An atom missing from a later frame is placed at the origin in that frame.
    /// - Trajectories are unwrapped using the minimum image convention between consecutive frames,
    ///   so atoms must not move by more than half a box between two frames.
    /// - MSD for lag `t` is averaged over all atoms and all pairs of frames separated by `t`.
    /// - The linear fit uses the second half of the frames. `D = slope / 6`.
    pub fn msd(&self, params: &MsdParams) -> Result<Msd, MsdError> {
        if !(params.timestep_fs.is_finite() && params.timestep_fs > 0.0) {
            return Err(MsdError::InvalidTimestep(params.timestep_fs.to_string()));
        }

        let first = self.get_frames().first().ok_or(MsdError::NoFrames)?;

        let mut ids: Vec<u64> = first
            .element_iter(&params.element)
            .map(|atom| atom.get_id())
            .collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Err(MsdError::ElementNotFound(params.element.clone()));
        }

        let index_of: HashMap<u64, usize> = ids.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let n_frames = self.get_n_frames();
        let mut positions = Array3::<f64>::zeros((n_frames, ids.len(), 3));

        for (f, frame) in self.get_frames().iter().enumerate() {
            for atom in frame.get_atoms() {
                if let Some(&index) = index_of.get(&atom.get_id()) {
                    let pos: [f64; 3] = (*atom.get_position()).into();
                    for (d, value) in pos.into_iter().enumerate() {
                        positions[[f, index, d]] = value;
                    }
                }
            }
        }

        unwrap_positions(&mut positions, self.get_box().as_array());
        let msd = mean_squared_displacement(&positions);

        let t0 = first.get_timestep() as f64;
        let time: Vec<f64> = self
            .get_frames()
            .iter()
            .map(|frame| (frame.get_timestep() as f64 - t0) * params.timestep_fs * 1e-3)
            .collect();

        let fit_start = n_frames / 2;
        if fit_start < 2 {
            return Err(MsdError::NotEnoughFrames(n_frames));
        }

        let fit = linear_regression(&time[fit_start..], &msd[fit_start..])
            .map_err(MsdError::RegressionError)?;

        let fit_time = time[fit_start..].to_vec();
        let fit_msd = fit_time.iter().map(|&t| fit.predict(t)).collect();

        let diffusion_a2_ps = fit.slope() / 6.0;

        log::info!(
            "Calculated MSD of {} `{}` atoms from {} frames (D = {:.4e} cm²/s).",
            ids.len(),
            params.element,
            n_frames,
            diffusion_a2_ps * A2_PS_TO_CM2_S
        );

        Ok(Msd {
            element: params.element.clone(),
            n_atoms: ids.len(),
            time,
            msd,
            fit_time,
            fit_msd,
            fit,
            diffusion_a2_ps,
            diffusion_cm2_s: diffusion_a2_ps * A2_PS_TO_CM2_S,
        })
    }
}

/// Remove jumps across periodic boundaries between consecutive frames.
fn unwrap_positions(positions: &mut Array3<f64>, box_len: [f64; 3]) {
    let (n_frames, n_atoms, _) = positions.dim();

    for f in 1..n_frames {
        for a in 0..n_atoms {
            for (d, &len) in box_len.iter().enumerate() {
                let previous = positions[[f - 1, a, d]];
                let displacement = min_image(positions[[f, a, d]] - previous, len);
                positions[[f, a, d]] = previous + displacement;
            }
        }
    }
}

/// Calculate MSD for every time lag from unwrapped positions.
fn mean_squared_displacement(positions: &Array3<f64>) -> Vec<f64> {
    let n_frames = positions.len_of(Axis(0));
    let mut msd = vec![0.0; n_frames];

    for (lag, value) in msd.iter_mut().enumerate().skip(1) {
        let diff = &positions.slice(s![lag.., .., ..]) - &positions.slice(s![..n_frames - lag, .., ..]);
        let squared = diff.mapv(|x| x * x).sum_axis(Axis(2));
        *value = squared.mean().unwrap_or(0.0);
    }

    msd
}

impl fmt::Display for Msd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "MSD of {} ({} atoms, {} frames)",
            self.element,
            self.n_atoms,
            self.time.len()
        )?;
        writeln!(
            f,
            "D = {:.4e} Å²/ps = {:.4e} cm²/s (R² = {:.4})",
            self.diffusion_a2_ps,
            self.diffusion_cm2_s,
            self.fit.r_squared()
        )
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::structures::{
        frame::{AtomRecord, Frame},
        simbox::SimBox,
        vector3d::Vector3D,
    };
    use float_cmp::assert_approx_eq;

    /// Atoms of element `O` moving with constant velocity, wrapped into a box of 10 Å.
    fn ballistic(n_frames: usize, velocity: f64) -> Trajectory {
        let simbox = SimBox::new(10.0, 10.0, 10.0).unwrap();
        let frames = (0..n_frames)
            .map(|f| {
                let mut o1 = Vector3D::new(9.0 + velocity * f as f64, 5.0, 5.0);
                let mut o2 = Vector3D::new(5.0, 1.0 - velocity * f as f64, 5.0);
                o1.wrap(&simbox);
                o2.wrap(&simbox);
                Frame::new(
                    f as u64 * 1000,
                    vec![
                        AtomRecord::new(1, "O", o1),
                        AtomRecord::new(2, "O", o2),
                        AtomRecord::new(3, "H", Vector3D::new(0.0, 0.0, 0.0)),
                    ],
                )
            })
            .collect();

        Trajectory::new(frames, simbox)
    }

    #[test]
    fn unwrap_monotonic_across_boundary() {
        let trajectory = ballistic(10, 0.7);
        let msd = trajectory.msd(&MsdParams::new("O")).unwrap();

        assert_eq!(msd.n_atoms(), 2);
        assert_approx_eq!(f64, msd.msd()[0], 0.0);
        for (lag, value) in msd.msd().iter().enumerate() {
            assert_approx_eq!(f64, *value, (0.7 * lag as f64).powi(2), epsilon = 1e-9);
        }

        for window in msd.msd().windows(2) {
            assert!(window[1] > window[0]);
        }
    }

    #[test]
    fn time_axis() {
        let trajectory = ballistic(6, 0.1);
        let msd = trajectory
            .msd(&MsdParams::new("O").with_timestep(2.0))
            .unwrap();
        assert_eq!(msd.time().len(), 6);
        assert_approx_eq!(f64, msd.time()[0], 0.0);
        assert_approx_eq!(f64, msd.time()[3], 6.0);
        assert_eq!(msd.fit_time().len(), 3);
        assert_approx_eq!(f64, msd.fit_time()[0], 6.0);
    }

    #[test]
    fn linear_msd_recovers_diffusion() {
        let trajectory = ballistic(8, 0.2);
        let msd = trajectory.msd(&MsdParams::new("O").with_timestep(1.0)).unwrap();

        // fit of (0.2 * lag)² over lags 4..8 with time = lag ps
        let x: Vec<f64> = (4..8).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|x| (0.2 * x).powi(2)).collect();
        let expected = linear_regression(&x, &y).unwrap();

        assert_approx_eq!(f64, msd.fit().slope(), expected.slope(), epsilon = 1e-9);
        assert_approx_eq!(f64, msd.diffusion_a2_ps(), expected.slope() / 6.0, epsilon = 1e-9);
        assert_approx_eq!(f64, msd.fit().r_squared(), expected.r_squared(), epsilon = 1e-9);
        assert_approx_eq!(f64, msd.diffusion_cm2_s(), msd.diffusion_a2_ps() * 1e-4);
        assert_eq!(msd.fit_msd().len(), 4);
        assert_approx_eq!(f64, msd.fit_msd()[0], expected.predict(4.0), epsilon = 1e-9);
    }

    #[test]
    fn missing_atom_zero_filled() {
        let simbox = SimBox::new(100.0, 100.0, 100.0).unwrap();
        let frames = (0..4)
            .map(|f| {
                let mut atoms = vec![AtomRecord::new(1, "O", Vector3D::new(1.0, 1.0, 1.0))];
                if f != 2 {
                    atoms.push(AtomRecord::new(2, "O", Vector3D::new(3.0, 0.0, 4.0)));
                }
                Frame::new(f as u64, atoms)
            })
            .collect();
        let trajectory = Trajectory::new(frames, simbox);
        let msd = trajectory.msd(&MsdParams::new("O")).unwrap();

        // atom 2 jumps to the origin in frame 2 and back: |d|² = 25
        // lag 1: pairs (0,1) (1,2) (2,3) → atom 2 contributes 0, 25, 25 → mean over 6 values
        assert_approx_eq!(f64, msd.msd()[1], 50.0 / 6.0, epsilon = 1e-12);
        // lag 2: pairs (0,2) (1,3) → 25, 0
        assert_approx_eq!(f64, msd.msd()[2], 25.0 / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn fail_not_enough_frames() {
        let trajectory = ballistic(3, 0.1);
        let error = trajectory.msd(&MsdParams::new("O")).unwrap_err();
        assert_eq!(error, MsdError::NotEnoughFrames(3));
        assert_eq!(error.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn fail_element_not_found() {
        let trajectory = ballistic(5, 0.1);
        let error = trajectory.msd(&MsdParams::new("C")).unwrap_err();
        assert_eq!(error, MsdError::ElementNotFound("C".to_owned()));
        assert_eq!(error.kind(), ErrorKind::Selection);
    }

    #[test]
    fn fail_empty() {
        let trajectory = Trajectory::new(Vec::new(), SimBox::new(1.0, 1.0, 1.0).unwrap());
        assert_eq!(
            trajectory.msd(&MsdParams::new("O")),
            Err(MsdError::NoFrames)
        );
    }

    #[test]
    fn fail_invalid_timestep() {
        let trajectory = ballistic(5, 0.1);
        match trajectory.msd(&MsdParams::new("O").with_timestep(0.0)) {
            Err(MsdError::InvalidTimestep(_)) => (),
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }
}
