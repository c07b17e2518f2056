// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of the Trajectory structure holding all frames of a dump file.

use std::collections::BTreeSet;
use std::path::Path;

use crate::errors::ParseDumpError;
use crate::io::dump_io;
use crate::structures::{frame::Frame, simbox::SimBox};

/// Ordered sequence of frames sharing one orthorhombic simulation box.
///
/// A `Trajectory` is built once per load and is never modified afterwards.
/// Analysis methods (`rdf`, `msd`) are implemented in the `analysis` module.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    frames: Vec<Frame>,
    simbox: SimBox,
}

impl Trajectory {
    /// Create a new trajectory from frames and a simulation box.
    pub fn new(frames: Vec<Frame>, simbox: SimBox) -> Self {
        Trajectory { frames, simbox }
    }

    /// Read a dump file and construct a `Trajectory`.
    ///
    /// ## Example
    /// ```no_run
    /// # use lamman_rs::prelude::*;
    /// #
    /// let trajectory = match Trajectory::from_dump("dump.lammpstrj") {
    ///     Ok(x) => x,
    ///     Err(e) => {
    ///         eprintln!("{}", e);
    ///         return;
    ///     }
    /// };
    ///
    /// println!("Read {} frames.", trajectory.get_n_frames());
    /// ```
    pub fn from_dump(filename: impl AsRef<Path>) -> Result<Self, ParseDumpError> {
        dump_io::read_dump(filename)
    }

    /// Get all frames of the trajectory.
    #[inline(always)]
    pub fn get_frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Get frame with the target index. Frames are indexed starting from 0.
    #[inline(always)]
    pub fn get_frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Get the simulation box of the trajectory.
    #[inline(always)]
    pub fn get_box(&self) -> &SimBox {
        &self.simbox
    }

    /// Get the number of frames in the trajectory.
    #[inline(always)]
    pub fn get_n_frames(&self) -> usize {
        self.frames.len()
    }

    /// Returns `true` if the trajectory contains no frames.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get sorted unique element symbols of the first frame.
    ///
    /// These are the elements that can be selected for RDF and MSD calculations.
    pub fn elements(&self) -> Vec<String> {
        match self.frames.first() {
            Some(frame) => frame
                .get_atoms()
                .iter()
                .map(|atom| atom.get_element().to_owned())
                .collect::<BTreeSet<String>>()
                .into_iter()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Returns `true` if any frame of the trajectory contains the given element.
    pub fn has_element(&self, element: &str) -> bool {
        self.frames.iter().any(|frame| frame.contains_element(element))
    }

    /// Select at most `max_frames` frames evenly strided across the trajectory.
    ///
    /// The stride is `n_frames / min(n_frames, max_frames)`. Frames are taken
    /// from the start of the trajectory with this stride, up to `max_frames` frames.
    pub fn sample_frames(&self, max_frames: usize) -> Vec<&Frame> {
        let n_sampled = self.frames.len().min(max_frames);
        if n_sampled == 0 {
            return Vec::new();
        }

        let stride = self.frames.len() / n_sampled;
        self.frames.iter().step_by(stride).take(max_frames).collect()
    }
}
