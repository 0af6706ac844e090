//! Collinear segment compression
//!
//! Every command sent to the controller costs a full acknowledgement
//! round-trip, so consecutive displacement vectors that continue in the
//! same direction are merged before compilation. Merging never changes
//! the absolute start or the net displacement of a path.

use heapless::Vec;

use super::path::{Path, MAX_SEGMENTS};
use crate::board::Coord;

/// Merge consecutive collinear, same-signed vectors
///
/// Two adjacent vectors merge when their cross product is zero and their
/// dot product is positive. Zero vectors are dropped outright.
pub fn compress(path: &Path) -> Path {
    let mut merged: Vec<Coord, MAX_SEGMENTS> = Vec::new();

    for &v in path.vectors() {
        if v.is_zero() {
            continue;
        }
        match merged.last_mut() {
            Some(prev) if prev.cross(v) == 0 && prev.dot(v) > 0 => *prev = *prev + v,
            _ => {
                // Output never outgrows the input
                let _ = merged.push(v);
            }
        }
    }

    let mut out = Path::new(path.start());
    let _ = out.extend(&merged);
    out
}
