// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of the SpeciesRecord structure holding molecule counts from a species log.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use getset::{CopyGetters, Getters};
use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::ParseSpeciesError;
use crate::io::species_io;

/// Counts of molecular species (formula → count) at every recorded timestep.
///
/// Built once per species-log load and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpeciesRecord {
    data: BTreeMap<u64, IndexMap<String, u64>>,
}

/// Count of one species in a [`SpeciesSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct SpeciesShare {
    /// Molecular formula.
    #[getset(get = "pub")]
    formula: String,
    /// Number of molecules.
    #[getset(get_copy = "pub")]
    count: u64,
    /// Share of this species in the filtered total (in %).
    #[getset(get_copy = "pub")]
    percent: f64,
}

/// Composition of the system at one timestep.
#[derive(Debug, Clone, PartialEq, Serialize, Getters, CopyGetters)]
pub struct SpeciesSnapshot {
    #[getset(get_copy = "pub")]
    timestep: u64,
    /// Species sorted by count in descending order.
    #[getset(get = "pub")]
    entries: Vec<SpeciesShare>,
    /// Sum of counts of all listed species.
    #[getset(get_copy = "pub")]
    total: u64,
}

impl SpeciesRecord {
    /// Create a new `SpeciesRecord` from timestep → (formula → count) mapping.
    pub fn new(data: BTreeMap<u64, IndexMap<String, u64>>) -> Self {
        SpeciesRecord { data }
    }

    /// Read a species log and construct a `SpeciesRecord`.
    pub fn from_log(filename: impl AsRef<Path>) -> Result<Self, ParseSpeciesError> {
        species_io::read_species(filename)
    }

    /// Get counts of all species at the given timestep.
    #[inline(always)]
    pub fn get(&self, timestep: u64) -> Option<&IndexMap<String, u64>> {
        self.data.get(&timestep)
    }

    /// Get the underlying mapping.
    #[inline(always)]
    pub fn get_data(&self) -> &BTreeMap<u64, IndexMap<String, u64>> {
        &self.data
    }

    /// Get all recorded timesteps in ascending order.
    pub fn timesteps(&self) -> Vec<u64> {
        self.data.keys().cloned().collect()
    }

    /// Get the number of recorded timesteps.
    #[inline(always)]
    pub fn get_n_timesteps(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Get sorted unique formulas of all species present at any timestep.
    pub fn species(&self) -> Vec<String> {
        self.data
            .values()
            .flat_map(|counts| counts.keys().cloned())
            .collect::<BTreeSet<String>>()
            .into_iter()
            .collect()
    }

    /// Returns `true` if the species appears at any timestep.
    pub fn has_species(&self, formula: &str) -> bool {
        self.data.values().any(|counts| counts.contains_key(formula))
    }

    /// Get `(timestep, count)` of the species for every recorded timestep.
    /// Timesteps where the species is not listed have a count of 0.
    pub fn series(&self, formula: &str) -> Vec<(u64, u64)> {
        self.data
            .iter()
            .map(|(&timestep, counts)| (timestep, counts.get(formula).copied().unwrap_or(0)))
            .collect()
    }

    /// Get the composition at the given timestep, keeping only species with `count > min_count`.
    ///
    /// ## Returns
    /// `None` if the timestep has not been recorded.
    ///
    /// ## Example
    /// ```
    /// # use lamman_rs::prelude::*;
    /// #
    /// let record = lamman_rs::io::species_io::parse_species(
    ///     "# Timestep No_Moles No_Specs H2O H2 O2\n100 3 60 50 8 2\n".as_bytes()
    /// ).unwrap();
    ///
    /// let snapshot = record.snapshot(100, 5).unwrap();
    /// assert_eq!(snapshot.entries().len(), 2);
    /// assert_eq!(snapshot.total(), 58);
    /// assert_eq!(snapshot.entries()[0].formula(), "H2O");
    /// ```
    pub fn snapshot(&self, timestep: u64, min_count: u64) -> Option<SpeciesSnapshot> {
        let counts = self.data.get(&timestep)?;

        let mut filtered: Vec<(&String, u64)> = counts
            .iter()
            .filter(|(_, &count)| count > min_count)
            .map(|(formula, &count)| (formula, count))
            .collect();
        // stable sort, equal counts keep the order of the log
        filtered.sort_by(|a, b| b.1.cmp(&a.1));

        let total: u64 = filtered.iter().map(|(_, count)| count).sum();
        let entries = filtered
            .into_iter()
            .map(|(formula, count)| SpeciesShare {
                formula: formula.clone(),
                count,
                percent: if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
            })
            .collect();

        Some(SpeciesSnapshot {
            timestep,
            entries,
            total,
        })
    }
}

impl fmt::Display for SpeciesSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timestep {}", self.timestep)?;
        for entry in &self.entries {
            writeln!(
                f,
                "{:<20} {:>10} {:>9.2}%",
                entry.formula, entry.count, entry.percent
            )?;
        }
        if self.total > 0 {
            writeln!(f, "{:<20} {:>10} {:>9.2}%", "TOTAL", self.total, 100.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    fn record() -> SpeciesRecord {
        let mut data = BTreeMap::new();
        data.insert(
            200,
            IndexMap::from([("H2O".to_owned(), 40), ("H2".to_owned(), 10)]),
        );
        data.insert(
            100,
            IndexMap::from([
                ("H2".to_owned(), 20),
                ("O2".to_owned(), 10),
                ("HO".to_owned(), 20),
                ("H2O".to_owned(), 1),
            ]),
        );
        SpeciesRecord::new(data)
    }

    #[test]
    fn species_and_timesteps() {
        let record = record();
        assert_eq!(record.timesteps(), vec![100, 200]);
        assert_eq!(record.species(), vec!["H2", "H2O", "HO", "O2"]);
        assert!(record.has_species("O2"));
        assert!(!record.has_species("CO2"));
        assert_eq!(record.get_n_timesteps(), 2);
    }

    #[test]
    fn series_fills_zero() {
        let record = record();
        assert_eq!(record.series("O2"), vec![(100, 10), (200, 0)]);
        assert_eq!(record.series("H2O"), vec![(100, 1), (200, 40)]);
        assert_eq!(record.series("CO2"), vec![(100, 0), (200, 0)]);
    }

    #[test]
    fn snapshot_sorted_and_filtered() {
        let record = record();
        let snapshot = record.snapshot(100, 1).unwrap();

        let formulas: Vec<&str> = snapshot
            .entries()
            .iter()
            .map(|e| e.formula().as_str())
            .collect();
        assert_eq!(formulas, vec!["H2", "HO", "O2"]);
        assert_eq!(snapshot.total(), 50);
        assert_approx_eq!(f64, snapshot.entries()[0].percent(), 40.0);
        assert_approx_eq!(f64, snapshot.entries()[2].percent(), 20.0);
    }

    #[test]
    fn snapshot_missing_or_empty() {
        let record = record();
        assert!(record.snapshot(150, 0).is_none());

        let snapshot = record.snapshot(200, 100).unwrap();
        assert!(snapshot.entries().is_empty());
        assert_eq!(snapshot.total(), 0);
        assert_eq!(snapshot.to_string(), "Timestep 200\n");
    }
}
