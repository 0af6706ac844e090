//! Waypoint path type

use heapless::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::board::Coord;

/// Maximum relative segments per path
///
/// The longest synthesized path is a capture eviction: one off-center
/// offset plus the four legs of the relocation dogleg to the parking slot.
pub const MAX_SEGMENTS: usize = 8;

/// Path segment capacity exceeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PathCapacity;

/// An ordered waypoint path for one dragged piece
///
/// The first element is an absolute coordinate; every subsequent element
/// is a displacement relative to the previous waypoint. A path is never
/// empty and always starts absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Path {
    start: Coord,
    vectors: Vec<Coord, MAX_SEGMENTS>,
}

impl Path {
    /// Create a path anchored at an absolute coordinate
    pub fn new(start: Coord) -> Self {
        Self {
            start,
            vectors: Vec::new(),
        }
    }

    /// Append a relative displacement
    pub fn push(&mut self, vector: Coord) -> Result<(), PathCapacity> {
        self.vectors.push(vector).map_err(|_| PathCapacity)
    }

    /// Append every vector of another path segment list
    pub fn extend(&mut self, vectors: &[Coord]) -> Result<(), PathCapacity> {
        for &v in vectors {
            self.push(v)?;
        }
        Ok(())
    }

    /// Absolute starting coordinate
    pub fn start(&self) -> Coord {
        self.start
    }

    /// Relative displacement vectors, in order
    pub fn vectors(&self) -> &[Coord] {
        &self.vectors
    }

    /// Number of relative segments
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True if the path has no relative segments
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Final absolute coordinate (start plus the sum of all vectors)
    pub fn end(&self) -> Coord {
        self.vectors.iter().fold(self.start, |acc, &v| acc + v)
    }

    /// Iterate the absolute coordinate at every waypoint boundary,
    /// starting with the anchor
    pub fn waypoints(&self) -> impl Iterator<Item = Coord> + '_ {
        let mut acc = self.start;
        core::iter::once(self.start).chain(self.vectors.iter().map(move |&v| {
            acc += v;
            acc
        }))
    }
}
