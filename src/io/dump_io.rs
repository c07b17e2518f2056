// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of functions for reading and writing LAMMPS dump (lammpstrj) files.
//!
//! Only text dumps of orthorhombic periodic boxes (`ITEM: BOX BOUNDS pp pp pp`)
//! with `id`, `element`, `x`, `y`, and `z` columns are supported.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Lines, Write};
use std::path::Path;

use crate::errors::{ParseDumpError, WriteDumpError};
use crate::structures::{
    frame::{AtomRecord, Frame},
    simbox::SimBox,
    trajectory::Trajectory,
    vector3d::Vector3D,
};

const TIMESTEP_ITEM: &str = "ITEM: TIMESTEP";
const NATOMS_ITEM: &str = "ITEM: NUMBER OF ATOMS";
const BOX_ITEM: &str = "ITEM: BOX BOUNDS pp pp pp";
const ATOMS_ITEM: &str = "ITEM: ATOMS";

/// Upper limit on the number of atoms reserved before the atom lines are read.
const MAX_PREALLOCATED_ATOMS: usize = 1 << 16;

/// Read a dump file and construct a Trajectory structure.
pub fn read_dump(filename: impl AsRef<Path>) -> Result<Trajectory, ParseDumpError> {
    let file = File::open(filename.as_ref())
        .map_err(|_| ParseDumpError::FileNotFound(Box::from(filename.as_ref())))?;

    let trajectory = parse_dump(BufReader::new(file))?;
    log::info!(
        "Read {} frames from dump file `{}`.",
        trajectory.get_n_frames(),
        filename.as_ref().display()
    );

    Ok(trajectory)
}

/// Parse dump data from any buffered reader.
///
/// Lines are scanned sequentially for `ITEM:` markers. Lines that do not belong
/// to any recognized section are skipped. Only the simulation box of the first
/// frame is kept; the box is assumed to be constant.
///
/// ## Example
/// ```
/// # use lamman_rs::io::dump_io::parse_dump;
/// #
/// let dump = "\
/// ITEM: TIMESTEP
/// 0
/// ITEM: NUMBER OF ATOMS
/// 2
/// ITEM: BOX BOUNDS pp pp pp
/// 0.0 10.0
/// 0.0 10.0
/// 0.0 10.0
/// ITEM: ATOMS id element x y z
/// 2 O 1.0 1.0 1.0
/// 1 H 2.0 2.0 2.0
/// ";
///
/// let trajectory = parse_dump(dump.as_bytes()).unwrap();
/// assert_eq!(trajectory.get_n_frames(), 1);
/// assert_eq!(trajectory.get_frames()[0].get_atoms()[0].get_element(), "H");
/// ```
pub fn parse_dump(reader: impl BufRead) -> Result<Trajectory, ParseDumpError> {
    let mut lines = reader.lines();

    let mut frames = Vec::new();
    let mut simbox: Option<SimBox> = None;
    let mut timestep: Option<u64> = None;
    let mut n_atoms = 0usize;

    while let Some(raw_line) = lines.next() {
        let line = raw_line.map_err(|e| ParseDumpError::CouldNotRead(e.to_string()))?;
        let trimmed = line.trim();

        if trimmed == TIMESTEP_ITEM {
            let value = next_line(&mut lines, TIMESTEP_ITEM)?;
            timestep = Some(parse_integer(&value)?);
        } else if trimmed == NATOMS_ITEM {
            let value = next_line(&mut lines, NATOMS_ITEM)?;
            n_atoms = parse_integer(&value)? as usize;
        } else if trimmed == BOX_ITEM {
            let mut bounds = [(0.0, 0.0); 3];
            for bound in bounds.iter_mut() {
                *bound = line_as_bounds(&next_line(&mut lines, BOX_ITEM)?)?;
            }

            if simbox.is_none() {
                simbox = Some(SimBox::from_bounds(bounds).map_err(ParseDumpError::InvalidSimBox)?);
            }
        } else if trimmed.starts_with(ATOMS_ITEM) {
            let columns = AtomColumns::from_header(trimmed)?;
            let timestep = timestep.ok_or(ParseDumpError::AtomsBeforeTimestep)?;

            let mut atoms = Vec::with_capacity(n_atoms.min(MAX_PREALLOCATED_ATOMS));
            for _ in 0..n_atoms {
                atoms.push(columns.line_as_atom(&next_line(&mut lines, ATOMS_ITEM)?)?);
            }

            log::debug!("Read frame at timestep {} ({} atoms).", timestep, atoms.len());
            frames.push(Frame::new(timestep, atoms));
        }
    }

    if frames.is_empty() {
        return Err(ParseDumpError::NoFrames);
    }

    let simbox = simbox.ok_or(ParseDumpError::MissingSimBox)?;
    Ok(Trajectory::new(frames, simbox))
}

/// Positions of the required columns in the atom lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AtomColumns {
    id: usize,
    element: usize,
    x: usize,
    y: usize,
    z: usize,
    /// Minimal number of fields on an atom line.
    n_required: usize,
}

impl AtomColumns {
    /// Locate required columns in the `ITEM: ATOMS` header. The order of the columns is arbitrary.
    fn from_header(header: &str) -> Result<Self, ParseDumpError> {
        let names: Vec<&str> = header.split_whitespace().skip(2).collect();

        let find = |name: &str| {
            names
                .iter()
                .position(|&column| column == name)
                .ok_or_else(|| ParseDumpError::MissingColumn(name.to_owned()))
        };

        let (id, element, x, y, z) = (find("id")?, find("element")?, find("x")?, find("y")?, find("z")?);
        let n_required = [id, element, x, y, z].into_iter().max().unwrap_or(0) + 1;

        Ok(AtomColumns {
            id,
            element,
            x,
            y,
            z,
            n_required,
        })
    }

    /// Parse a line as atom.
    fn line_as_atom(&self, line: &str) -> Result<AtomRecord, ParseDumpError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < self.n_required {
            return Err(ParseDumpError::ParseLineErr(line.to_owned()));
        }

        let id = fields[self.id]
            .parse::<u64>()
            .map_err(|_| ParseDumpError::ParseLineErr(line.to_owned()))?;

        let mut position = [0.0f64; 3];
        for (item, &index) in position.iter_mut().zip([self.x, self.y, self.z].iter()) {
            *item = fields[index]
                .parse::<f64>()
                .map_err(|_| ParseDumpError::ParseLineErr(line.to_owned()))?;
        }

        Ok(AtomRecord::new(id, fields[self.element], position.into()))
    }
}

/// Read the next line of the dump or report which section ended unexpectedly.
fn next_line<B: BufRead>(lines: &mut Lines<B>, section: &str) -> Result<String, ParseDumpError> {
    match lines.next() {
        Some(Ok(line)) => Ok(line),
        Some(Err(e)) => Err(ParseDumpError::CouldNotRead(e.to_string())),
        None => Err(ParseDumpError::UnexpectedEnd(section.to_owned())),
    }
}

/// Parse a line containing a single non-negative integer.
fn parse_integer(line: &str) -> Result<u64, ParseDumpError> {
    line.trim()
        .parse::<u64>()
        .map_err(|_| ParseDumpError::ParseLineErr(line.to_owned()))
}

/// Parse a line of `ITEM: BOX BOUNDS` as `(lo, hi)`.
fn line_as_bounds(line: &str) -> Result<(f64, f64), ParseDumpError> {
    let mut split = line.split_whitespace();

    let mut next_value = || {
        split
            .next()
            .and_then(|x| x.parse::<f64>().ok())
            .ok_or_else(|| ParseDumpError::ParseLineErr(line.to_owned()))
    };

    let lo = next_value()?;
    let hi = next_value()?;
    Ok((lo, hi))
}

/// ## Methods for writing dump files.
impl Trajectory {
    /// Write the trajectory into a dump file with `id element x y z` columns.
    /// The box is written as spanning from 0 to its length along each dimension.
    pub fn write_dump(&self, filename: impl AsRef<Path>) -> Result<(), WriteDumpError> {
        let output = File::create(&filename)
            .map_err(|_| WriteDumpError::CouldNotCreate(Box::from(filename.as_ref())))?;

        let mut writer = BufWriter::new(output);
        let simbox = self.get_box();

        for frame in self.get_frames() {
            write_frame(&mut writer, frame, simbox).map_err(|_| WriteDumpError::CouldNotWrite)?;
        }

        writer.flush().map_err(|_| WriteDumpError::CouldNotWrite)?;
        Ok(())
    }
}

fn write_frame(writer: &mut impl Write, frame: &Frame, simbox: &SimBox) -> std::io::Result<()> {
    writeln!(writer, "{}", TIMESTEP_ITEM)?;
    writeln!(writer, "{}", frame.get_timestep())?;
    writeln!(writer, "{}", NATOMS_ITEM)?;
    writeln!(writer, "{}", frame.get_n_atoms())?;
    writeln!(writer, "{}", BOX_ITEM)?;
    for len in simbox.as_array() {
        writeln!(writer, "{:.16e} {:.16e}", 0.0, len)?;
    }
    writeln!(writer, "{} id element x y z", ATOMS_ITEM)?;
    for atom in frame.get_atoms() {
        let pos: [f64; 3] = (*atom.get_position()).into();
        writeln!(
            writer,
            "{} {} {} {} {}",
            atom.get_id(),
            atom.get_element(),
            pos[0],
            pos[1],
            pos[2]
        )?;
    }

    Ok(())
}

/******************************/
/*         UNIT TESTS         */
/******************************/

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;
    use tempfile::NamedTempFile;

    fn dump_text(n_frames: usize, n_atoms: usize) -> String {
        let mut text = String::new();
        for f in 0..n_frames {
            text.push_str(&format!(
                "ITEM: TIMESTEP\n{}\nITEM: NUMBER OF ATOMS\n{}\nITEM: BOX BOUNDS pp pp pp\n-5.0 5.0\n0.0 12.0\n2.0 9.0\nITEM: ATOMS x element id z y\n",
                f * 100,
                n_atoms
            ));
            // atoms written in descending id order
            for id in (1..=n_atoms).rev() {
                let element = if id % 2 == 0 { "O" } else { "H" };
                text.push_str(&format!(
                    "{} {} {} {} {}\n",
                    id as f64 * 0.1 + f as f64,
                    element,
                    id,
                    id as f64 * 0.3,
                    id as f64 * 0.2
                ));
            }
        }
        text
    }

    #[test]
    fn parse_frames_sorted() {
        let trajectory = parse_dump(dump_text(4, 5).as_bytes()).unwrap();

        assert_eq!(trajectory.get_n_frames(), 4);
        let simbox = trajectory.get_box();
        assert_approx_eq!(f64, simbox.x, 10.0);
        assert_approx_eq!(f64, simbox.y, 12.0);
        assert_approx_eq!(f64, simbox.z, 7.0);

        for (f, frame) in trajectory.get_frames().iter().enumerate() {
            assert_eq!(frame.get_timestep(), f as u64 * 100);
            assert_eq!(frame.get_n_atoms(), 5);
            let ids: Vec<u64> = frame.get_atoms().iter().map(|a| a.get_id()).collect();
            assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        }

        let atom = &trajectory.get_frames()[2].get_atoms()[3];
        assert_eq!(atom.get_id(), 4);
        assert_eq!(atom.get_element(), "O");
        assert_approx_eq!(f64, atom.get_position().x, 2.4);
        assert_approx_eq!(f64, atom.get_position().y, 0.8);
        assert_approx_eq!(f64, atom.get_position().z, 1.2);
    }

    #[test]
    fn read_fixture() {
        let trajectory = read_dump("test_files/dump.lammpstrj").unwrap();
        assert_eq!(trajectory.get_n_frames(), 3);
        assert_eq!(trajectory.elements(), vec!["A", "B"]);
        let timesteps: Vec<u64> = trajectory
            .get_frames()
            .iter()
            .map(|f| f.get_timestep())
            .collect();
        assert_eq!(timesteps, vec![0, 100, 200]);
        assert_approx_eq!(f64, trajectory.get_box().x, 10.0);
    }

    #[test]
    fn first_box_is_kept() {
        let text = dump_text(1, 2)
            + "ITEM: TIMESTEP\n100\nITEM: NUMBER OF ATOMS\n1\nITEM: BOX BOUNDS pp pp pp\n0 20\n0 20\n0 20\nITEM: ATOMS id element x y z\n1 H 0 0 0\n";
        let trajectory = parse_dump(text.as_bytes()).unwrap();
        assert_eq!(trajectory.get_n_frames(), 2);
        assert_approx_eq!(f64, trajectory.get_box().x, 10.0);
        assert_eq!(trajectory.get_frames()[1].get_n_atoms(), 1);
    }

    #[test]
    fn unrecognized_lines_skipped() {
        let text = format!("some header\n\n{}trailing garbage\n", dump_text(2, 3));
        let trajectory = parse_dump(text.as_bytes()).unwrap();
        assert_eq!(trajectory.get_n_frames(), 2);
    }

    #[test]
    fn fail_file_not_found() {
        match read_dump("test_files/nonexistent.lammpstrj") {
            Err(ParseDumpError::FileNotFound(_)) => (),
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }

    #[test]
    fn fail_no_frames() {
        assert_eq!(
            parse_dump("nothing to see here\n".as_bytes()),
            Err(ParseDumpError::NoFrames)
        );
    }

    #[test]
    fn fail_missing_column() {
        let text = dump_text(1, 2).replace("x element id z y", "x type id z y");
        assert_eq!(
            parse_dump(text.as_bytes()),
            Err(ParseDumpError::MissingColumn("element".to_owned()))
        );
    }

    #[test]
    fn fail_truncated() {
        let text = dump_text(1, 5);
        let truncated: String = text.lines().take(12).collect::<Vec<_>>().join("\n");
        assert_eq!(
            parse_dump(truncated.as_bytes()),
            Err(ParseDumpError::UnexpectedEnd(ATOMS_ITEM.to_owned()))
        );
    }

    #[test]
    fn fail_huge_atom_count() {
        let text = "\
ITEM: TIMESTEP
0
ITEM: NUMBER OF ATOMS
1000000000000000
ITEM: BOX BOUNDS pp pp pp
0.0 10.0
0.0 10.0
0.0 10.0
ITEM: ATOMS id element x y z
1 O 1.0 1.0 1.0
";
        assert_eq!(
            parse_dump(text.as_bytes()),
            Err(ParseDumpError::UnexpectedEnd(ATOMS_ITEM.to_owned()))
        );
    }

    #[test]
    fn fail_invalid_number() {
        let text = dump_text(1, 2).replace("0.2 O 2", "abc O 2");
        match parse_dump(text.as_bytes()) {
            Err(ParseDumpError::ParseLineErr(line)) => assert!(line.starts_with("abc")),
            other => panic!("Unexpected result `{:?}`.", other),
        }
    }

    #[test]
    fn fail_invalid_timestep() {
        let text = dump_text(1, 2).replacen("ITEM: TIMESTEP\n0", "ITEM: TIMESTEP\nzero", 1);
        assert_eq!(
            parse_dump(text.as_bytes()),
            Err(ParseDumpError::ParseLineErr("zero".to_owned()))
        );
    }

    #[test]
    fn fail_missing_box() {
        let text = "ITEM: TIMESTEP\n0\nITEM: NUMBER OF ATOMS\n1\nITEM: ATOMS id element x y z\n1 H 0 0 0\n";
        assert_eq!(
            parse_dump(text.as_bytes()),
            Err(ParseDumpError::MissingSimBox)
        );
    }

    #[test]
    fn fail_atoms_before_timestep() {
        let text = "ITEM: NUMBER OF ATOMS\n1\nITEM: ATOMS id element x y z\n1 H 0 0 0\n";
        assert_eq!(
            parse_dump(text.as_bytes()),
            Err(ParseDumpError::AtomsBeforeTimestep)
        );
    }

    #[test]
    fn write_and_read() {
        let trajectory = parse_dump(dump_text(3, 4).as_bytes()).unwrap();
        let output = NamedTempFile::new().unwrap();
        trajectory.write_dump(output.path()).unwrap();

        let reread = read_dump(output.path()).unwrap();
        assert_eq!(reread.get_n_frames(), 3);
        assert_approx_eq!(f64, reread.get_box().z, 7.0);
        for (a, b) in trajectory.get_frames().iter().zip(reread.get_frames()) {
            assert_eq!(a, b);
        }
    }
}
