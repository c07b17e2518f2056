// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of functions for reading YAML thermo output from LAMMPS log files.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Deserialize;

use crate::errors::ParseThermoError;
use crate::structures::thermo::ThermoTable;

const BLOCK_START: &str = "---";
const BLOCK_END: &str = "...";

/// Single YAML block produced by `thermo_style yaml`.
#[derive(Debug, Deserialize)]
struct ThermoBlock {
    keywords: Option<Vec<String>>,
    data: Option<Vec<Vec<f64>>>,
}

/// Read a LAMMPS log file and construct a ThermoTable from all its YAML thermo blocks.
pub fn read_thermo(filename: impl AsRef<Path>) -> Result<ThermoTable, ParseThermoError> {
    let file = File::open(filename.as_ref())
        .map_err(|_| ParseThermoError::FileNotFound(Box::from(filename.as_ref())))?;

    let table = parse_thermo(BufReader::new(file))?;
    log::info!(
        "Read {} thermo rows from log file `{}`.",
        table.get_n_rows(),
        filename.as_ref().display()
    );

    Ok(table)
}

/// Parse YAML thermo blocks from any buffered reader.
///
/// A block starts with a line `---` and ends with a line `...`. All other lines of the log are ignored.
/// Keywords are taken from the first valid block and rows of all valid blocks are concatenated
/// in the order in which they appear in the log. Blocks that can not be parsed, that lack
/// keywords or data, or whose rows do not match the keywords are skipped.
/// Returns `ParseThermoError::NoData` if no valid block is found or the valid blocks contain no rows.
///
/// ## Example
/// ```
/// # use lamman_rs::io::thermo_io::parse_thermo;
/// #
/// let log = "\
/// Step Temp
/// ---
/// keywords: ['Step', 'Temp']
/// data:
///   - [0, 300.0]
///   - [100, 310.5]
/// ...
/// ";
///
/// let table = parse_thermo(log.as_bytes()).unwrap();
/// assert_eq!(table.get_keywords(), ["Step", "Temp"]);
/// assert_eq!(table.get_n_rows(), 2);
/// ```
pub fn parse_thermo(reader: impl BufRead) -> Result<ThermoTable, ParseThermoError> {
    let mut keywords: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    let mut block: Option<String> = None;
    let mut block_index = 0usize;

    for raw_line in reader.lines() {
        let line = raw_line.map_err(|e| ParseThermoError::CouldNotRead(e.to_string()))?;

        match line.trim() {
            BLOCK_START => block = Some(String::new()),
            BLOCK_END => {
                if let Some(content) = block.take() {
                    block_index += 1;
                    match parse_block(&content, keywords.as_deref()) {
                        Ok((block_keywords, mut block_rows)) => {
                            keywords.get_or_insert(block_keywords);
                            rows.append(&mut block_rows);
                        }
                        Err(reason) => {
                            log::warn!("Skipping thermo block #{}: {}", block_index, reason)
                        }
                    }
                }
            }
            _ => {
                if let Some(content) = block.as_mut() {
                    content.push_str(&line);
                    content.push('\n');
                }
            }
        }
    }

    match keywords {
        Some(keywords) if !rows.is_empty() => Ok(ThermoTable::new(keywords, rows)),
        _ => Err(ParseThermoError::NoData),
    }
}

/// Parse the content of a single block. Rows must have the same width as `expected`
/// keywords or, if no keywords are known yet, as the keywords of the block.
fn parse_block(
    content: &str,
    expected: Option<&[String]>,
) -> Result<(Vec<String>, Vec<Vec<f64>>), String> {
    let block: ThermoBlock = serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    let keywords = block.keywords.ok_or("missing `keywords`")?;
    let data = block.data.ok_or("missing `data`")?;

    let width = expected.map_or(keywords.len(), |k| k.len());
    if let Some(row) = data.iter().find(|row| row.len() != width) {
        return Err(format!(
            "row has {} values but {} keywords are expected",
            row.len(),
            width
        ));
    }

    Ok((keywords, data))
}

/******************************/
/*         UNIT TESTS         */
/******************************/
