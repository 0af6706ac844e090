//! Board cells and the cell ↔ physical coordinate bijection
//!
//! A cell is a file (`a`–`h`) and rank (`1`–`8`). Mapping to physical
//! coordinates is total and bijective: adjacent cells differ by exactly
//! [`CELL_PITCH`] half-steps on the relevant axis, with `a1` at the
//! physical origin.

use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::surface::{Coord, BOARD_MAX, BOARD_MIN, CELL_PITCH};

/// Errors from cell construction or reverse coordinate mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidCell {
    /// File letter outside `a`–`h`
    File(char),
    /// Rank number outside 1–8
    Rank(u8),
    /// Physical coordinate is not a square center
    OffBoard { x: i16, y: i16 },
    /// Cell notation is not `<file><rank>`
    Notation,
}

impl fmt::Display for InvalidCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidCell::File(c) => write!(f, "file {c:?} outside a-h"),
            InvalidCell::Rank(r) => write!(f, "rank {r} outside 1-8"),
            InvalidCell::OffBoard { x, y } => {
                write!(f, "coordinate ({x}, {y}) is not a square center")
            }
            InvalidCell::Notation => write!(f, "cell notation must be <file><rank>"),
        }
    }
}

/// A board cell, guaranteed on-board by construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cell {
    /// File index, 0 = a-file
    file: u8,
    /// Rank index, 0 = rank 1
    rank: u8,
}

impl Cell {
    /// Create a cell from a file letter and a rank number
    pub fn new(file: char, rank: u8) -> Result<Self, InvalidCell> {
        if !('a'..='h').contains(&file) {
            return Err(InvalidCell::File(file));
        }
        if !(1..=8).contains(&rank) {
            return Err(InvalidCell::Rank(rank));
        }
        Ok(Self {
            file: file as u8 - b'a',
            rank: rank - 1,
        })
    }

    /// Create a cell from zero-based file and rank indices
    pub fn from_indices(file: u8, rank: u8) -> Result<Self, InvalidCell> {
        if file > 7 {
            return Err(InvalidCell::File((b'a' + file) as char));
        }
        if rank > 7 {
            return Err(InvalidCell::Rank(rank + 1));
        }
        Ok(Self { file, rank })
    }

    /// File letter, `a`–`h`
    pub fn file(&self) -> char {
        (b'a' + self.file) as char
    }

    /// Rank number, 1–8
    pub fn rank(&self) -> u8 {
        self.rank + 1
    }

    /// Zero-based file index
    pub fn file_index(&self) -> u8 {
        self.file
    }

    /// Zero-based rank index
    pub fn rank_index(&self) -> u8 {
        self.rank
    }

    /// Physical coordinate of this square's center
    pub fn to_physical(&self) -> Coord {
        Coord::new(
            self.file as i16 * CELL_PITCH,
            self.rank as i16 * CELL_PITCH,
        )
    }

    /// Reverse mapping from a physical square center
    pub fn from_physical(coord: Coord) -> Result<Self, InvalidCell> {
        let off_board = InvalidCell::OffBoard {
            x: coord.x,
            y: coord.y,
        };
        if coord.x % CELL_PITCH != 0 || coord.y % CELL_PITCH != 0 {
            return Err(off_board);
        }
        if !(BOARD_MIN..=BOARD_MAX).contains(&coord.x)
            || !(BOARD_MIN..=BOARD_MAX).contains(&coord.y)
        {
            return Err(off_board);
        }
        Ok(Self {
            file: (coord.x / CELL_PITCH) as u8,
            rank: (coord.y / CELL_PITCH) as u8,
        })
    }

    /// True for h-file squares (the closed right board edge)
    pub fn is_h_file(&self) -> bool {
        self.file == 7
    }

    /// True for rank-1 squares
    pub fn is_rank_one(&self) -> bool {
        self.rank == 0
    }

    /// True for rank-8 squares
    pub fn is_rank_eight(&self) -> bool {
        self.rank == 7
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Cell {
    type Err = InvalidCell;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let file = chars.next().ok_or(InvalidCell::Notation)?;
        let rank = chars.next().ok_or(InvalidCell::Notation)?;
        if chars.next().is_some() {
            return Err(InvalidCell::Notation);
        }
        let rank = rank.to_digit(10).ok_or(InvalidCell::Notation)? as u8;
        Cell::new(file, rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_corners() {
        let a1 = Cell::new('a', 1).unwrap();
        let h8 = Cell::new('h', 8).unwrap();
        assert_eq!(a1.to_physical(), Coord::new(0, 0));
        assert_eq!(h8.to_physical(), Coord::new(14, 14));
    }

    #[test]
    fn test_adjacent_cells_differ_by_pitch() {
        let e2: Cell = "e2".parse().unwrap();
        let e3: Cell = "e3".parse().unwrap();
        let f2: Cell = "f2".parse().unwrap();
        let delta_rank = e3.to_physical() - e2.to_physical();
        let delta_file = f2.to_physical() - e2.to_physical();
        assert_eq!(delta_rank, Coord::new(0, CELL_PITCH));
        assert_eq!(delta_file, Coord::new(CELL_PITCH, 0));
    }

    #[test]
    fn test_roundtrip_all_cells() {
        for file in 0..8u8 {
            for rank in 0..8u8 {
                let cell = Cell::from_indices(file, rank).unwrap();
                assert_eq!(Cell::from_physical(cell.to_physical()).unwrap(), cell);
            }
        }
    }

    #[test]
    fn test_invalid_cells() {
        assert_eq!(Cell::new('i', 1), Err(InvalidCell::File('i')));
        assert_eq!(Cell::new('A', 1), Err(InvalidCell::File('A')));
        assert_eq!(Cell::new('a', 0), Err(InvalidCell::Rank(0)));
        assert_eq!(Cell::new('a', 9), Err(InvalidCell::Rank(9)));
    }

    #[test]
    fn test_from_physical_rejects_lanes_and_aprons() {
        // Between-square lane
        assert!(Cell::from_physical(Coord::new(1, 0)).is_err());
        // Parking column on the left apron
        assert!(Cell::from_physical(Coord::new(-6, 4)).is_err());
        // Beyond the h-file
        assert!(Cell::from_physical(Coord::new(16, 0)).is_err());
    }

    #[test]
    fn test_notation() {
        let g5: Cell = "g5".parse().unwrap();
        assert_eq!(g5.file(), 'g');
        assert_eq!(g5.rank(), 5);
        assert!("e".parse::<Cell>().is_err());
        assert!("e44".parse::<Cell>().is_err());
        assert!("z9".parse::<Cell>().is_err());
    }

    #[test]
    fn test_edge_predicates() {
        assert!("h4".parse::<Cell>().unwrap().is_h_file());
        assert!("c1".parse::<Cell>().unwrap().is_rank_one());
        assert!("a8".parse::<Cell>().unwrap().is_rank_eight());
        let d5: Cell = "d5".parse().unwrap();
        assert!(!d5.is_h_file() && !d5.is_rank_one() && !d5.is_rank_eight());
    }

    proptest! {
        /// Round-trip bijection over arbitrary valid cells.
        #[test]
        fn prop_roundtrip(file in 0u8..8, rank in 0u8..8) {
            let cell = Cell::from_indices(file, rank).unwrap();
            prop_assert_eq!(Cell::from_physical(cell.to_physical()).unwrap(), cell);
        }
    }
}
