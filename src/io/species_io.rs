// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of functions for reading ReaxFF species logs.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;

use crate::errors::ParseSpeciesError;
use crate::structures::species::SpeciesRecord;

/// Read a species log (output of `fix reaxff/species`) and construct a SpeciesRecord structure.
pub fn read_species(filename: impl AsRef<Path>) -> Result<SpeciesRecord, ParseSpeciesError> {
    let file = File::open(filename.as_ref())
        .map_err(|_| ParseSpeciesError::FileNotFound(Box::from(filename.as_ref())))?;

    let record = parse_species(BufReader::new(file))?;
    log::info!(
        "Read {} timesteps from species log `{}`.",
        record.get_n_timesteps(),
        filename.as_ref().display()
    );

    Ok(record)
}

/// Parse a species log from any buffered reader.
///
/// The log consists of pairs of lines: a header starting with `#`
/// (`# Timestep No_Moles No_Specs <formula>...`) followed by a data line
/// (`<timestep> <n_moles> <n_specs> <count>...`). Both lines of the pair are consumed
/// even if the data line does not start with a timestep, in which case the pair is ignored.
/// Lines outside of such pairs are skipped.
///
/// ## Example
/// ```
/// # use lamman_rs::io::species_io::parse_species;
/// #
/// let record = parse_species("# ts n1 n2 A B\n100 2 50 3 7\n".as_bytes()).unwrap();
///
/// let counts = record.get(100).unwrap();
/// assert_eq!(counts["A"], 3);
/// assert_eq!(counts["B"], 7);
/// ```
pub fn parse_species(reader: impl BufRead) -> Result<SpeciesRecord, ParseSpeciesError> {
    let mut lines = reader.lines();
    let mut data = BTreeMap::new();

    while let Some(raw_line) = lines.next() {
        let line = raw_line.map_err(|e| ParseSpeciesError::CouldNotRead(e.to_string()))?;
        let header = line.trim();
        if !header.starts_with('#') {
            continue;
        }

        let data_line = match lines.next() {
            Some(Ok(x)) => x,
            Some(Err(e)) => return Err(ParseSpeciesError::CouldNotRead(e.to_string())),
            None => break,
        };

        if let Some((timestep, counts)) = parse_pair(header, &data_line)? {
            if data.insert(timestep, counts).is_some() {
                log::debug!("Timestep {} is repeated in the species log.", timestep);
            }
        }
    }

    if data.is_empty() {
        return Err(ParseSpeciesError::NoData);
    }

    Ok(SpeciesRecord::new(data))
}

/// Parse a header line and its data line.
/// Returns `None` if the data line does not start with a timestep.
fn parse_pair(
    header: &str,
    data_line: &str,
) -> Result<Option<(u64, IndexMap<String, u64>)>, ParseSpeciesError> {
    let values: Vec<&str> = data_line.split_whitespace().collect();

    let timestep = match values.first() {
        Some(first) if first.bytes().all(|b| b.is_ascii_digit()) => first
            .parse::<u64>()
            .map_err(|_| ParseSpeciesError::ParseCountErr(data_line.trim().to_owned()))?,
        _ => return Ok(None),
    };

    let names = header
        .trim_start_matches(['#', ' '])
        .split_whitespace()
        .skip(3);

    let mut counts = IndexMap::new();
    for (name, value) in names.zip(values.iter().skip(3)) {
        let count = value
            .parse::<u64>()
            .map_err(|_| ParseSpeciesError::ParseCountErr(data_line.trim().to_owned()))?;
        counts.insert(name.to_owned(), count);
    }

    Ok(Some((timestep, counts)))
}

/******************************/
/*         UNIT TESTS         */
/******************************/
