// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of the calculation of radial distribution function.

use std::f64::consts::PI;
use std::fmt;

use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};

use crate::analysis::peaks::find_peaks;
use crate::errors::RdfError;
use crate::progress::{ProgressPrinter, ProgressStatus};
use crate::structures::{
    cellgrid::CellGrid, frame::Frame, simbox::SimBox, trajectory::Trajectory, vector3d::Vector3D,
};

/// Minimal height of an RDF peak.
const PEAK_MIN_HEIGHT: f64 = 1.1;
/// Minimal separation of RDF peaks (and minima) in bins.
const PEAK_MIN_DISTANCE: usize = 5;
/// Pairs of identical elements closer than this are the same atom.
const SELF_PAIR_THRESHOLD: f64 = 1e-6;

/// Treatment of periodic boundary conditions in the neighbor search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PbcMode {
    /// Distances are calculated using the minimum image convention.
    #[default]
    Periodic,
    /// Distances are calculated directly from the raw coordinates.
    None,
}

/// Parameters of the RDF calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RdfParams {
    /// Element of the reference atoms.
    pub element1: String,
    /// Element of the target atoms.
    pub element2: String,
    /// Number of histogram bins between 0 and half of the shortest box dimension.
    pub n_bins: usize,
    /// Maximal number of frames to analyze.
    pub max_frames: usize,
    pub pbc: PbcMode,
}

impl Default for RdfParams {
    fn default() -> Self {
        RdfParams {
            element1: String::new(),
            element2: String::new(),
            n_bins: 200,
            max_frames: 100,
            pbc: PbcMode::Periodic,
        }
    }
}

impl RdfParams {
    /// Create RDF parameters for a pair of elements using default values for all other parameters.
    pub fn new(element1: &str, element2: &str) -> Self {
        RdfParams {
            element1: element1.to_owned(),
            element2: element2.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_n_bins(mut self, n_bins: usize) -> Self {
        self.n_bins = n_bins;
        self
    }

    pub fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn with_pbc(mut self, pbc: PbcMode) -> Self {
        self.pbc = pbc;
        self
    }

    /// Check that the parameters can be used for the calculation.
    pub fn validate(&self) -> Result<(), RdfError> {
        if self.element1.trim().is_empty() || self.element2.trim().is_empty() {
            return Err(RdfError::InvalidParameters(
                "both elements must be specified".to_owned(),
            ));
        }

        if self.n_bins == 0 {
            return Err(RdfError::InvalidParameters(
                "number of bins must be positive".to_owned(),
            ));
        }

        if self.max_frames == 0 {
            return Err(RdfError::InvalidParameters(
                "maximal number of frames must be positive".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Peak of the RDF and the coordination shell it defines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RdfShell {
    /// Bin index of the peak.
    peak_index: usize,
    /// Distance of the peak (in Å).
    peak_r: f64,
    /// Value of g(r) at the peak.
    peak_g: f64,
    /// Bin index of the first minimum following the peak.
    minimum_index: Option<usize>,
    /// Distance of the first minimum following the peak (in Å).
    minimum_r: Option<f64>,
    /// Average number of target atoms around a reference atom up to the minimum.
    coordination_number: Option<f64>,
}

/// First and second coordination shell of the RDF, if present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, CopyGetters)]
#[getset(get_copy = "pub")]
pub struct RdfPeaks {
    first: Option<RdfShell>,
    second: Option<RdfShell>,
}

/// Radial distribution function of a pair of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct Rdf {
    /// Pair label (`element1-element2`).
    #[getset(get = "pub")]
    pair: String,
    /// Radii evenly spaced from 0 to the maximal distance (in Å), one per bin.
    #[getset(get = "pub")]
    r: Vec<f64>,
    #[getset(get = "pub")]
    g: Vec<f64>,
    /// Raw pair counts summed over all analyzed frames.
    #[getset(get = "pub")]
    histogram: Vec<u64>,
    /// Width of a bin (in Å).
    #[getset(get_copy = "pub")]
    bin_width: f64,
    /// Average number of reference atoms per analyzed frame.
    #[getset(get_copy = "pub")]
    avg_n_reference: f64,
    /// Average number of target atoms per analyzed frame.
    #[getset(get_copy = "pub")]
    avg_n_target: f64,
    /// Number of analyzed frames.
    #[getset(get_copy = "pub")]
    n_frames: usize,
    #[getset(get_copy = "pub")]
    peaks: RdfPeaks,
}

/// ## Methods for calculating radial distribution function.
impl Trajectory {
    /// Calculate the radial distribution function of `element2` atoms around `element1` atoms.
    ///
    /// ## Returns
    /// - `Rdf` structure containing g(r), the raw histogram and the detected coordination shells.
    /// - `RdfError` if the trajectory is empty, an element is missing, or no pairs were found.
    ///
    /// ## Example
    /// ```no_run
    /// # use lamman_rs::prelude::*;
    /// #
    /// let trajectory = Trajectory::from_dump("dump.lammpstrj").unwrap();
    /// let rdf = trajectory.rdf(&RdfParams::new("O", "H")).unwrap();
    ///
    /// if let Some(shell) = rdf.peaks().first() {
    ///     println!("First peak at {} Å, CN = {:?}", shell.peak_r(), shell.coordination_number());
    /// }
    /// ```
    ///
    /// ## Notes
    /// - The maximal distance is half of the shortest box dimension.
    /// - At most `max_frames` frames evenly strided across the trajectory are analyzed.
    ///   Frames that do not contain both elements are skipped.
    /// - If `element1` and `element2` are the same, an atom is never paired with itself.
    /// - Peaks are maxima of g(r) higher than 1.1 separated by at least 5 bins.
    pub fn rdf(&self, params: &RdfParams) -> Result<Rdf, RdfError> {
        self.rdf_calculate(params, None)
    }

    /// Calculate the radial distribution function printing the progress of the calculation.
    /// See [`Trajectory::rdf`] for more information.
    pub fn rdf_with_progress(
        &self,
        params: &RdfParams,
        printer: ProgressPrinter,
    ) -> Result<Rdf, RdfError> {
        self.rdf_calculate(params, Some(printer))
    }

    fn rdf_calculate(
        &self,
        params: &RdfParams,
        mut printer: Option<ProgressPrinter>,
    ) -> Result<Rdf, RdfError> {
        let result = self.rdf_accumulate(params, printer.as_mut());

        if let Some(printer) = printer.as_mut() {
            printer.set_status(if result.is_ok() {
                ProgressStatus::Completed
            } else {
                ProgressStatus::Failed
            });
            let n_frames = result.as_ref().map(|x| x.n_frames).unwrap_or(0);
            printer.print(n_frames, n_frames, self.get_frames().last().map_or(0, |f| f.get_timestep()));
        }

        result
    }

    fn rdf_accumulate(
        &self,
        params: &RdfParams,
        mut printer: Option<&mut ProgressPrinter>,
    ) -> Result<Rdf, RdfError> {
        params.validate()?;

        if self.is_empty() {
            return Err(RdfError::NoFrames);
        }

        for element in [&params.element1, &params.element2] {
            if !self.has_element(element) {
                return Err(RdfError::ElementNotFound(element.clone()));
            }
        }

        let simbox = self.get_box();
        simbox.check().map_err(RdfError::InvalidSimBox)?;

        let rmax = simbox.min_dimension() / 2.0;
        let bin_width = rmax / params.n_bins as f64;
        let same = params.element1 == params.element2;

        let mut histogram = vec![0u64; params.n_bins];
        let (mut n_reference_total, mut n_target_total, mut n_frames) = (0usize, 0usize, 0usize);

        let sampled = self.sample_frames(params.max_frames);
        let n_sampled = sampled.len();

        for (i, frame) in sampled.into_iter().enumerate() {
            if let Some(printer) = printer.as_deref_mut() {
                printer.print(i, n_sampled, frame.get_timestep());
            }

            let reference = frame.element_positions(&params.element1);
            let targets = frame.element_positions(&params.element2);

            if reference.is_empty() || targets.is_empty() {
                log::debug!(
                    "Frame at timestep {} skipped: does not contain both `{}` and `{}`.",
                    frame.get_timestep(),
                    params.element1,
                    params.element2
                );
                continue;
            }

            let mut add_distance = |distance: f64| {
                if same && distance <= SELF_PAIR_THRESHOLD {
                    return;
                }

                let bin = ((distance / bin_width) as usize).min(params.n_bins - 1);
                histogram[bin] += 1;
            };

            match params.pbc {
                PbcMode::Periodic => {
                    let grid = CellGrid::new(&targets, simbox, rmax).map_err(RdfError::CellGridError)?;
                    for point in reference.iter() {
                        grid.neighbors_iter(point).for_each(|(_, d)| add_distance(d));
                    }
                }
                PbcMode::None => naive_distances(&reference, &targets, rmax, &mut add_distance),
            }

            n_reference_total += reference.len();
            n_target_total += targets.len();
            n_frames += 1;
        }

        if n_frames == 0 {
            return Err(RdfError::NoCommonFrame(
                params.element1.clone(),
                params.element2.clone(),
            ));
        }

        if histogram.iter().all(|&count| count == 0) {
            return Err(RdfError::NoPairs(
                params.element1.clone(),
                params.element2.clone(),
            ));
        }

        let avg_n_reference = n_reference_total as f64 / n_frames as f64;
        let avg_n_target = n_target_total as f64 / n_frames as f64;

        let r = radii(rmax, params.n_bins);
        let g = normalize(
            &histogram,
            &r,
            bin_width,
            simbox,
            avg_n_reference,
            avg_n_target,
            n_frames,
            same,
        );

        let peaks = RdfPeaks::detect(&r, &g, &histogram, avg_n_reference, n_frames);

        log::info!(
            "Calculated RDF of `{}-{}` from {} frames.",
            params.element1,
            params.element2,
            n_frames
        );

        Ok(Rdf {
            pair: format!("{}-{}", params.element1, params.element2),
            r,
            g,
            histogram,
            bin_width,
            avg_n_reference,
            avg_n_target,
            n_frames,
            peaks,
        })
    }
}

/// `n_bins` radii evenly spaced over `[0, rmax]`, both ends included.
fn radii(rmax: f64, n_bins: usize) -> Vec<f64> {
    if n_bins < 2 {
        return vec![0.0; n_bins];
    }

    let step = rmax / (n_bins - 1) as f64;
    (0..n_bins).map(|i| i as f64 * step).collect()
}

/// Distances between all reference and target positions within `cutoff`, ignoring PBC.
fn naive_distances(
    reference: &[Vector3D],
    targets: &[Vector3D],
    cutoff: f64,
    add_distance: &mut impl FnMut(f64),
) {
    for point in reference {
        for target in targets {
            let distance = point.distance_naive(target);
            if distance <= cutoff {
                add_distance(distance);
            }
        }
    }
}

/// Normalize the histogram by the ideal-gas expectation.
#[allow(clippy::too_many_arguments)]
fn normalize(
    histogram: &[u64],
    r: &[f64],
    bin_width: f64,
    simbox: &SimBox,
    avg_n_reference: f64,
    avg_n_target: f64,
    n_frames: usize,
    same: bool,
) -> Vec<f64> {
    let volume = simbox.volume();
    let density = if same {
        (avg_n_reference - 1.0) / volume
    } else {
        avg_n_target / volume
    };

    let norm = density * avg_n_reference * n_frames as f64;

    histogram
        .iter()
        .zip(r.iter())
        .map(|(&count, &r)| {
            let shell = 4.0 * PI * (r + bin_width / 2.0).powi(2) * bin_width;
            count as f64 / shell / norm
        })
        .collect()
}

impl RdfPeaks {
    /// Locate the first two peaks of g(r) and the coordination numbers of the corresponding shells.
    fn detect(r: &[f64], g: &[f64], histogram: &[u64], avg_n_reference: f64, n_frames: usize) -> Self {
        let maxima = find_peaks(g, Some(PEAK_MIN_HEIGHT), Some(PEAK_MIN_DISTANCE));
        let negated: Vec<f64> = g.iter().map(|x| -x).collect();
        let minima = find_peaks(&negated, None, Some(PEAK_MIN_DISTANCE));

        let shell = |peak: usize| {
            let minimum = minima.iter().copied().find(|&m| m > peak);
            let coordination_number = minimum.map(|m| {
                histogram[..m].iter().sum::<u64>() as f64 / (avg_n_reference * n_frames as f64)
            });

            RdfShell {
                peak_index: peak,
                peak_r: r[peak],
                peak_g: g[peak],
                minimum_index: minimum,
                minimum_r: minimum.map(|m| r[m]),
                coordination_number,
            }
        };

        RdfPeaks {
            first: maxima.first().map(|&p| shell(p)),
            second: maxima.get(1).map(|&p| shell(p)),
        }
    }
}

impl fmt::Display for Rdf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "RDF {} ({} frames, {} bins of {:.4} Å)",
            self.pair,
            self.n_frames,
            self.r.len(),
            self.bin_width
        )?;

        for (label, shell) in [("1st", self.peaks.first), ("2nd", self.peaks.second)] {
            let Some(shell) = shell else { continue };
            write!(f, "{} peak: r = {:.3} Å, g = {:.3}", label, shell.peak_r, shell.peak_g)?;
            match shell.coordination_number {
                Some(cn) => writeln!(f, ", CN = {:.2}", cn)?,
                None => writeln!(f)?,
            }
        }

        Ok(())
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::structures::frame::AtomRecord;
    use float_cmp::assert_approx_eq;
    use rand::{Rng, SeedableRng};

    /// Simple cubic lattice of `n`×`n`×`n` atoms with spacing `a`, alternating elements if `mixed`.
    fn lattice(n: usize, a: f64, timestep: u64, mixed: bool) -> Frame {
        let mut atoms = Vec::new();
        let mut id = 1;
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    let element = if mixed && (i + j + k) % 2 == 1 { "B" } else { "A" };
                    atoms.push(AtomRecord::new(
                        id,
                        element,
                        Vector3D::new(i as f64 * a, j as f64 * a, k as f64 * a),
                    ));
                    id += 1;
                }
            }
        }
        Frame::new(timestep, atoms)
    }

    fn random_gas(n_atoms: usize, n_frames: usize, box_len: f64, seed: u64) -> Trajectory {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let frames = (0..n_frames)
            .map(|f| {
                let atoms = (0..n_atoms)
                    .map(|i| {
                        AtomRecord::new(
                            i as u64 + 1,
                            if i % 2 == 0 { "A" } else { "B" },
                            Vector3D::new(
                                rng.gen_range(0.0..box_len),
                                rng.gen_range(0.0..box_len),
                                rng.gen_range(0.0..box_len),
                            ),
                        )
                    })
                    .collect();
                Frame::new(f as u64 * 10, atoms)
            })
            .collect();

        Trajectory::new(frames, SimBox::new(box_len, box_len, box_len).unwrap())
    }

    /// Check that g(r) of the outer half of the bins fluctuates around 1.
    fn assert_tail_close_to_one(rdf: &Rdf) {
        let tail = &rdf.g()[rdf.g().len() / 2..];
        for &g in tail {
            assert!((g - 1.0).abs() < 0.15, "g(r) = {} is not close to 1", g);
        }

        let mean = tail.iter().sum::<f64>() / tail.len() as f64;
        assert_approx_eq!(f64, mean, 1.0, epsilon = 0.03);
    }

    #[test]
    fn ideal_gas_converges_to_one() {
        let trajectory = random_gas(400, 20, 20.0, 17);
        let rdf = trajectory.rdf(&RdfParams::new("A", "B")).unwrap();

        assert_eq!(rdf.n_frames(), 20);
        assert_approx_eq!(f64, rdf.avg_n_reference(), 200.0);
        assert_approx_eq!(f64, rdf.avg_n_target(), 200.0);
        assert_tail_close_to_one(&rdf);
    }

    #[test]
    fn ideal_gas_same_element_converges_to_one() {
        let trajectory = random_gas(400, 20, 20.0, 23);
        let rdf = trajectory.rdf(&RdfParams::new("A", "A")).unwrap();

        assert_eq!(rdf.pair(), "A-A");
        assert_approx_eq!(f64, rdf.avg_n_reference(), 200.0);
        assert_tail_close_to_one(&rdf);
    }

    #[test]
    fn radii_span_cutoff() {
        let r = radii(5.0, 200);
        assert_eq!(r.len(), 200);
        assert_approx_eq!(f64, r[0], 0.0);
        assert_approx_eq!(f64, r[1], 5.0 / 199.0);
        assert_approx_eq!(f64, r[199], 5.0);

        assert_eq!(radii(5.0, 1), vec![0.0]);
        assert!(radii(5.0, 0).is_empty());
    }

    #[test]
    fn lattice_first_shell() {
        let frames = vec![lattice(8, 2.0, 0, false), lattice(8, 2.0, 10, false)];
        let trajectory = Trajectory::new(frames, SimBox::new(16.0, 16.0, 16.0).unwrap());

        let rdf = trajectory
            .rdf(&RdfParams::new("A", "A").with_n_bins(64))
            .unwrap();
        assert_eq!(rdf.pair(), "A-A");
        assert_eq!(rdf.r().len(), 64);
        assert_approx_eq!(f64, rdf.bin_width(), 0.125);

        // each atom has 6 nearest neighbors at 2.0 Å (bin 16)
        assert_eq!(rdf.histogram()[16], 2 * 512 * 6);
        assert_eq!(rdf.histogram()[..16].iter().sum::<u64>(), 0);

        let first = rdf.peaks().first().unwrap();
        assert_eq!(first.peak_index(), 16);
        assert_approx_eq!(f64, first.peak_r(), 16.0 * 8.0 / 63.0);
        assert_eq!(first.minimum_index(), Some(19));
        assert_approx_eq!(f64, first.coordination_number().unwrap(), 6.0);

        // 12 second neighbors at 2.83 Å (bin 22)
        let second = rdf.peaks().second().unwrap();
        assert_eq!(second.peak_index(), 22);
        assert_approx_eq!(f64, second.coordination_number().unwrap(), 18.0);
    }

    #[test]
    fn lattice_mixed_pair() {
        let trajectory = Trajectory::new(
            vec![lattice(6, 2.5, 0, true)],
            SimBox::new(15.0, 15.0, 15.0).unwrap(),
        );

        let rdf = trajectory.rdf(&RdfParams::new("A", "B")).unwrap();
        let first = rdf.peaks().first().unwrap();
        assert_approx_eq!(f64, first.peak_r(), 2.5, epsilon = 0.04);
        assert_approx_eq!(f64, first.coordination_number().unwrap(), 6.0);
    }

    #[test]
    fn periodic_vs_naive() {
        let frame = Frame::new(
            0,
            vec![
                AtomRecord::new(1, "A", Vector3D::new(0.5, 5.0, 5.0)),
                AtomRecord::new(2, "B", Vector3D::new(9.5, 5.0, 5.0)),
            ],
        );
        let trajectory = Trajectory::new(vec![frame], SimBox::new(10.0, 10.0, 10.0).unwrap());

        let periodic = trajectory
            .rdf(&RdfParams::new("A", "B").with_n_bins(10))
            .unwrap();
        assert_eq!(periodic.histogram()[2], 1);

        match trajectory.rdf(&RdfParams::new("A", "B").with_pbc(PbcMode::None)) {
            Err(RdfError::NoPairs(a, b)) => {
                assert_eq!(a, "A");
                assert_eq!(b, "B");
            }
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }

    #[test]
    fn three_frames_two_atoms() {
        let trajectory = Trajectory::from_dump("test_files/dump.lammpstrj").unwrap();
        let rdf = trajectory.rdf(&RdfParams::new("A", "B")).unwrap();

        assert_eq!(rdf.n_frames(), 3);
        assert_eq!(rdf.histogram().iter().sum::<u64>(), 3);
        assert!(rdf.g().iter().all(|g| g.is_finite()));
    }

    #[test]
    fn distance_at_cutoff_in_last_bin() {
        let frame = Frame::new(
            0,
            vec![
                AtomRecord::new(1, "A", Vector3D::new(1.0, 1.0, 1.0)),
                AtomRecord::new(2, "B", Vector3D::new(6.0, 1.0, 1.0)),
            ],
        );
        let trajectory = Trajectory::new(vec![frame], SimBox::new(10.0, 10.0, 10.0).unwrap());

        for pbc in [PbcMode::Periodic, PbcMode::None] {
            let rdf = trajectory
                .rdf(&RdfParams::new("A", "B").with_n_bins(5).with_pbc(pbc))
                .unwrap();
            assert_eq!(rdf.histogram(), &vec![0, 0, 0, 0, 1]);
        }
    }

    #[test]
    fn frames_without_pair_skipped() {
        let frames = vec![
            Frame::new(0, vec![AtomRecord::new(1, "A", Vector3D::new(1.0, 1.0, 1.0))]),
            Frame::new(
                10,
                vec![
                    AtomRecord::new(1, "A", Vector3D::new(1.0, 1.0, 1.0)),
                    AtomRecord::new(2, "B", Vector3D::new(2.0, 1.0, 1.0)),
                ],
            ),
        ];
        let trajectory = Trajectory::new(frames, SimBox::new(10.0, 10.0, 10.0).unwrap());
        let rdf = trajectory.rdf(&RdfParams::new("A", "B")).unwrap();
        assert_eq!(rdf.n_frames(), 1);
    }

    #[test]
    fn fail_element_not_found() {
        let trajectory = random_gas(10, 2, 10.0, 1);
        let error = trajectory.rdf(&RdfParams::new("A", "C")).unwrap_err();
        assert_eq!(error, RdfError::ElementNotFound("C".to_owned()));
        assert_eq!(error.kind(), ErrorKind::Selection);
    }

    #[test]
    fn fail_no_common_frame() {
        let frames = vec![
            Frame::new(0, vec![AtomRecord::new(1, "A", Vector3D::new(1.0, 1.0, 1.0))]),
            Frame::new(10, vec![AtomRecord::new(2, "B", Vector3D::new(1.0, 1.0, 1.0))]),
        ];
        let trajectory = Trajectory::new(frames, SimBox::new(10.0, 10.0, 10.0).unwrap());
        assert_eq!(
            trajectory.rdf(&RdfParams::new("A", "B")),
            Err(RdfError::NoCommonFrame("A".to_owned(), "B".to_owned()))
        );
    }

    #[test]
    fn fail_single_atom_self_pair() {
        let frames = vec![Frame::new(
            0,
            vec![AtomRecord::new(1, "A", Vector3D::new(1.0, 1.0, 1.0))],
        )];
        let trajectory = Trajectory::new(frames, SimBox::new(10.0, 10.0, 10.0).unwrap());
        let error = trajectory.rdf(&RdfParams::new("A", "A")).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InsufficientData);
    }

    #[test]
    fn fail_empty_trajectory() {
        let trajectory = Trajectory::new(Vec::new(), SimBox::new(10.0, 10.0, 10.0).unwrap());
        assert_eq!(
            trajectory.rdf(&RdfParams::new("A", "B")),
            Err(RdfError::NoFrames)
        );
    }

    #[test]
    fn fail_invalid_params() {
        let trajectory = random_gas(10, 2, 10.0, 1);
        for params in [
            RdfParams::new("", "B"),
            RdfParams::new("A", "B").with_n_bins(0),
            RdfParams::new("A", "B").with_max_frames(0),
        ] {
            match trajectory.rdf(&params) {
                Err(RdfError::InvalidParameters(_)) => (),
                other => panic!("Unexpected result `{:?}`.", other),
            }
        }
    }

    #[test]
    fn with_progress() {
        let directory = tempfile::tempdir().unwrap();
        let path = directory.path().join("progress.txt");
        let output = std::fs::File::create(&path).unwrap();
        let printer = ProgressPrinter::new()
            .with_output(Box::from(output))
            .with_colored(false)
            .with_print_freq(1)
            .with_terminating("\n");

        let trajectory = random_gas(20, 3, 10.0, 5);
        let rdf = trajectory
            .rdf_with_progress(&RdfParams::new("A", "B"), printer)
            .unwrap();
        assert_eq!(rdf, trajectory.rdf(&RdfParams::new("A", "B")).unwrap());

        let content = std::fs::read_to_string(path).unwrap();
        assert_eq!(content.matches("RUNNING").count(), 3);
        assert_eq!(content.matches("COMPLETED").count(), 1);
    }
}
