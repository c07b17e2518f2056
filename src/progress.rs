// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of ProgressPrinter structure for printing the progress of frame-by-frame analyses.

use colored::{ColoredString, Colorize};
use std::io::Write;

/// Progress of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStatus {
    /// Frames are being analyzed.
    Running,
    /// All frames have been analyzed.
    Completed,
    /// The analysis failed.
    Failed,
}

/// String that can be used inside `ProgressPrinter`.
#[derive(Debug, Clone, PartialEq)]
struct ProgressMessage {
    msg: ColoredString,
}

impl ProgressMessage {
    /// Create new `ProgressMessage`.
    ///
    /// ## Panics
    /// Panics if the string is longer than 9 characters.
    fn new(string: ColoredString) -> Self {
        if string.chars().count() > 9 {
            panic!("FATAL LAMMAN ERROR | ProgressMessage::new | `ProgressMessage` can not be longer than 9 characters.");
        }

        ProgressMessage { msg: string }
    }

    /// Print formatted `ProgressMessage`.
    fn print(&self, out: &mut dyn Write, colored: bool) -> std::io::Result<()> {
        if colored {
            write!(out, "[{: ^9}]   ", self.msg)
        } else {
            write!(out, "[{: ^9}]   ", self.msg.as_ref() as &str)
        }
    }
}

/// Structure handling printing of progress of an analysis iterating over trajectory frames.
/// Constructed using `ProgressPrinter::new()` and passed to e.g. `Trajectory::rdf_with_progress`.
///
/// Failing to write into the output stream never interrupts the analysis.
pub struct ProgressPrinter {
    /// Stream to write the progress info to.
    output: Box<dyn Write>,
    /// Current status of the analysis. Default: ProgressStatus::Running.
    status: ProgressStatus,
    /// Print every `print_freq`th frame. Default: 10 frames.
    print_freq: usize,
    /// If true, the output will be colored. Default: true.
    colored: bool,
    /// Default: "Frame".cyan().
    frame_msg: ColoredString,
    /// Default: "Step".bright_purple().
    step_msg: ColoredString,
    /// Default: "RUNNING".yellow().
    running_msg: ProgressMessage,
    /// Default: "COMPLETED".green().
    completed_msg: ProgressMessage,
    /// Default: "FAILED!".red().
    failed_msg: ProgressMessage,
    /// String terminating the progress message. Default: `\r` (carriage return).
    terminating: String,
}

impl ProgressPrinter {
    /// Create an instance of `ProgressPrinter` with default parameters.
    ///
    /// The default values of the `ProgressPrinter` parameters.
    /// - `output`: `std::io::stdout()`
    /// - `status`: `ProgressStatus::Running`
    /// - `print_freq`: `10` (progress info is printed every 10 analyzed frames)
    /// - `colored`: `true`
    /// - `frame_msg`: `"Frame".cyan()`
    /// - `step_msg`: `"Step".bright_purple()`
    /// - `running_msg`: `"RUNNING".yellow()`
    /// - `completed_msg`: `"COMPLETED".green()`
    /// - `failed_msg`: `"FAILED!".red()`
    /// - `terminating`: `\r` (useful to set to `\n` when printing to a file)
    ///
    /// ## Example
    /// ```no_run
    /// use lamman_rs::prelude::*;
    /// use colored::Colorize;
    ///
    /// let trajectory = Trajectory::from_dump("dump.lammpstrj").unwrap();
    ///
    /// let printer = ProgressPrinter::new()
    ///     .with_print_freq(5)
    ///     .with_running_msg("BINNING".yellow());
    ///
    /// let params = RdfParams::new("O", "H");
    /// let rdf = trajectory.rdf_with_progress(&params, printer).unwrap();
    /// ```
    pub fn new() -> Self {
        ProgressPrinter {
            output: Box::from(std::io::stdout()),
            status: ProgressStatus::Running,
            print_freq: 10,
            colored: true,
            frame_msg: "Frame".cyan(),
            step_msg: "Step".bright_purple(),
            running_msg: ProgressMessage::new("RUNNING".yellow()),
            completed_msg: ProgressMessage::new("COMPLETED".green()),
            failed_msg: ProgressMessage::new("FAILED!".red()),
            terminating: String::from("\r"),
        }
    }

    /// Create new `ProgressPrinter` with specific `output` stream.
    pub fn with_output(mut self, stream: Box<dyn Write>) -> Self {
        self.output = stream;
        self
    }

    /// Set new status to an already constructed `ProgressPrinter`.
    pub fn set_status(&mut self, status: ProgressStatus) {
        self.status = status;
    }

    /// Create new `ProgressPrinter` with specific value for `print_freq`.
    /// A frequency of 0 is treated as 1.
    pub fn with_print_freq(mut self, print_freq: usize) -> Self {
        self.print_freq = print_freq.max(1);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `colored`.
    pub fn with_colored(mut self, colored: bool) -> Self {
        self.colored = colored;
        self
    }

    /// ## Panics
    /// Panics if the `running_msg` is longer than 9 characters.
    pub fn with_running_msg(mut self, running_msg: ColoredString) -> Self {
        self.running_msg = ProgressMessage::new(running_msg);
        self
    }

    /// ## Panics
    /// Panics if the `completed_msg` is longer than 9 characters.
    pub fn with_completed_msg(mut self, completed_msg: ColoredString) -> Self {
        self.completed_msg = ProgressMessage::new(completed_msg);
        self
    }

    /// ## Panics
    /// Panics if the `failed_msg` is longer than 9 characters.
    pub fn with_failed_msg(mut self, failed_msg: ColoredString) -> Self {
        self.failed_msg = ProgressMessage::new(failed_msg);
        self
    }

    /// Create new `ProgressPrinter` with specific value for `terminating`.
    pub fn with_terminating(mut self, string: &str) -> Self {
        self.terminating = string.to_string();
        self
    }

    /// Print progress info. `frame_number` is the number of frames analyzed so far (counting from 0).
    /// While running, the info is only printed for every `print_freq`th frame.
    pub fn print(&mut self, frame_number: usize, n_frames: usize, timestep: u64) {
        if self.status != ProgressStatus::Running || frame_number % self.print_freq == 0 {
            // progress is informative only
            let _ = self.write_progress(frame_number, n_frames, timestep);
        }
    }

    fn write_progress(&mut self, frame_number: usize, n_frames: usize, timestep: u64) -> std::io::Result<()> {
        match self.status {
            ProgressStatus::Running => self.running_msg.print(&mut self.output, self.colored)?,
            ProgressStatus::Completed => self.completed_msg.print(&mut self.output, self.colored)?,
            ProgressStatus::Failed => self.failed_msg.print(&mut self.output, self.colored)?,
        }

        let (frame_msg, step_msg) = if self.colored {
            (self.frame_msg.to_string(), self.step_msg.to_string())
        } else {
            (
                (self.frame_msg.as_ref() as &str).to_owned(),
                (self.step_msg.as_ref() as &str).to_owned(),
            )
        };

        write!(
            self.output,
            "{} {:>6}/{:<6} | {} {:12}{}",
            frame_msg, frame_number, n_frames, step_msg, timestep, self.terminating
        )?;

        if self.status != ProgressStatus::Running {
            writeln!(self.output)?;
        }

        self.output.flush()
    }
}

impl Default for ProgressPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/******************************/
/*         UNIT TESTS         */
/******************************/
