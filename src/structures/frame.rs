// Released under MIT License.
// Copyright (c) 2025 lamman_rs developers

//! Implementation of a single trajectory frame and the atoms it contains.

use crate::structures::vector3d::Vector3D;

/// A single atom as written in a dump frame.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    /// Atom identifier (`id` column).
    id: u64,
    /// Element symbol (`element` column).
    element: String,
    /// Coordinates of the atom in Å.
    position: Vector3D,
}

impl AtomRecord {
    /// Create a new `AtomRecord`.
    pub fn new(id: u64, element: &str, position: Vector3D) -> Self {
        AtomRecord {
            id,
            element: element.to_owned(),
            position,
        }
    }

    /// Get the identifier of the atom.
    #[inline(always)]
    pub fn get_id(&self) -> u64 {
        self.id
    }

    /// Get the element symbol of the atom.
    #[inline(always)]
    pub fn get_element(&self) -> &str {
        &self.element
    }

    /// Get the position of the atom.
    #[inline(always)]
    pub fn get_position(&self) -> &Vector3D {
        &self.position
    }
}

/// Atoms of the system at one simulation step.
///
/// Atoms are always sorted by their id in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    timestep: u64,
    atoms: Vec<AtomRecord>,
}

impl Frame {
    /// Create a new frame. Atoms are sorted by their id.
    pub fn new(timestep: u64, mut atoms: Vec<AtomRecord>) -> Self {
        atoms.sort_by_key(|atom| atom.id);
        Frame { timestep, atoms }
    }

    /// Get the simulation step of the frame.
    #[inline(always)]
    pub fn get_timestep(&self) -> u64 {
        self.timestep
    }

    /// Get the atoms of the frame sorted by id.
    #[inline(always)]
    pub fn get_atoms(&self) -> &[AtomRecord] {
        &self.atoms
    }

    /// Get the number of atoms in the frame.
    #[inline(always)]
    pub fn get_n_atoms(&self) -> usize {
        self.atoms.len()
    }

    /// Iterate over the atoms of the given element.
    pub fn element_iter<'a>(
        &'a self,
        element: &'a str,
    ) -> impl Iterator<Item = &'a AtomRecord> + 'a {
        self.atoms.iter().filter(move |atom| atom.element == element)
    }

    /// Collect positions of all atoms of the given element.
    pub fn element_positions(&self, element: &str) -> Vec<Vector3D> {
        self.element_iter(element).map(|atom| atom.position).collect()
    }

    /// Returns `true` if the frame contains at least one atom of the given element.
    pub fn contains_element(&self, element: &str) -> bool {
        self.atoms.iter().any(|atom| atom.element == element)
    }
}
