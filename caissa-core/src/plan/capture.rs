//! Capture choreography and the board-edge eviction table
//!
//! An ordinary capture is three drags: the mover approaches to one
//! half-step short of the destination, the victim is pulled off-center
//! and parked in its deadzone, then the mover is pulled fully onto the
//! vacated square. The eviction direction depends on which board edges
//! are open; the literal vector triples below are the specification of
//! that behavior and are locked by the exhaustive bounds matrix in the
//! tests.

use super::deadzone::DeadzoneAllocator;
use super::descriptor::{MoveDescriptor, PieceColor};
use super::synthesize::quiet_path;
use super::{MovePlan, PlanError};
use crate::board::{Cell, Coord};
use crate::motion::{relocation_dogleg, Path};

/// Edge classification of a capture destination
///
/// The a-file side is open (the left apron extends the surface), so only
/// the h-file, rank 1, and rank 8 constrain evictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EdgeClass {
    /// No closed edge adjacent
    Interior,
    /// h-file, ranks 2-7
    HFile,
    /// Rank 1, files a-g
    RankOne,
    /// Rank 8, files a-g
    RankEight,
    /// The h1 corner
    CornerH1,
    /// The h8 corner
    CornerH8,
}

impl EdgeClass {
    /// Classify a destination cell
    pub fn of(cell: Cell) -> Self {
        match (cell.is_h_file(), cell.is_rank_one(), cell.is_rank_eight()) {
            (true, true, _) => EdgeClass::CornerH1,
            (true, _, true) => EdgeClass::CornerH8,
            (true, false, false) => EdgeClass::HFile,
            (false, true, _) => EdgeClass::RankOne,
            (false, _, true) => EdgeClass::RankEight,
            _ => EdgeClass::Interior,
        }
    }
}

/// The three offsets that choreograph one capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EvictionTriple {
    /// Added to the mover's final segment so it halts short of the square
    pub stop_short: Coord,
    /// Victim's off-center pull, applied from the destination center
    pub evict: Coord,
    /// Mover's final pull onto the vacated square
    pub recenter: Coord,
}

const fn triple(stop_short: Coord, evict: Coord, recenter: Coord) -> EvictionTriple {
    EvictionTriple {
        stop_short,
        evict,
        recenter,
    }
}

/// Look up the vector triple for a destination edge class and approach
///
/// `approach` is the per-axis sign of the mover's final segment. The
/// interior rule rotates the approach 90° counter-clockwise for the
/// sideways pull; edge entries override it wherever that would push the
/// victim off the surface, and the h-file entries deliberately use the
/// open margin lane beyond the board.
pub fn eviction_triple(class: EdgeClass, approach: Coord) -> EvictionTriple {
    let d = approach;
    match (class, (d.x, d.y)) {
        // h-file, approached from the west or along the file
        (EdgeClass::HFile, (1, 1)) => triple(Coord::new(-1, -1), Coord::new(-1, 1), Coord::new(1, 1)),
        (EdgeClass::HFile, (1, 0)) => triple(Coord::new(-1, 0), Coord::new(0, 1), Coord::new(1, 0)),
        (EdgeClass::HFile, (1, -1)) => triple(Coord::new(-1, 1), Coord::new(1, 1), Coord::new(1, -1)),
        (EdgeClass::HFile, (0, 1)) => triple(Coord::new(0, -1), Coord::new(-1, 0), Coord::new(0, 1)),
        (EdgeClass::HFile, (0, -1)) => triple(Coord::new(0, 1), Coord::new(1, 0), Coord::new(0, -1)),

        // Rank 1, approached from above or along the rank
        (EdgeClass::RankOne, (1, -1)) => triple(Coord::new(-1, 1), Coord::new(1, 1), Coord::new(1, -1)),
        (EdgeClass::RankOne, (0, -1)) => triple(Coord::new(0, 1), Coord::new(1, 0), Coord::new(0, -1)),
        (EdgeClass::RankOne, (-1, -1)) => triple(Coord::new(1, 1), Coord::new(-1, 1), Coord::new(-1, -1)),
        (EdgeClass::RankOne, (1, 0)) => triple(Coord::new(-1, 0), Coord::new(0, 1), Coord::new(1, 0)),
        (EdgeClass::RankOne, (-1, 0)) => triple(Coord::new(1, 0), Coord::new(0, 1), Coord::new(-1, 0)),

        // Rank 8, approached from below or along the rank
        (EdgeClass::RankEight, (1, 1)) => triple(Coord::new(-1, -1), Coord::new(1, -1), Coord::new(1, 1)),
        (EdgeClass::RankEight, (0, 1)) => triple(Coord::new(0, -1), Coord::new(1, 0), Coord::new(0, 1)),
        (EdgeClass::RankEight, (-1, 1)) => triple(Coord::new(1, -1), Coord::new(-1, -1), Coord::new(-1, 1)),
        (EdgeClass::RankEight, (1, 0)) => triple(Coord::new(-1, 0), Coord::new(0, -1), Coord::new(1, 0)),
        (EdgeClass::RankEight, (-1, 0)) => triple(Coord::new(1, 0), Coord::new(0, -1), Coord::new(-1, 0)),

        // h1 corner: evictions lean on the open margin lane
        (EdgeClass::CornerH1, (1, -1)) => triple(Coord::new(-1, 1), Coord::new(1, 1), Coord::new(1, -1)),
        (EdgeClass::CornerH1, (1, 0)) => triple(Coord::new(-1, 0), Coord::new(0, 1), Coord::new(1, 0)),
        (EdgeClass::CornerH1, (0, -1)) => triple(Coord::new(0, 1), Coord::new(1, 0), Coord::new(0, -1)),

        // h8 corner
        (EdgeClass::CornerH8, (1, 1)) => triple(Coord::new(-1, -1), Coord::new(1, -1), Coord::new(1, 1)),
        (EdgeClass::CornerH8, (1, 0)) => triple(Coord::new(-1, 0), Coord::new(0, -1), Coord::new(1, 0)),
        (EdgeClass::CornerH8, (0, 1)) => triple(Coord::new(0, -1), Coord::new(1, 0), Coord::new(0, 1)),

        // Interior default: sideways pull, approach rotated 90° CCW
        _ => triple(-d, Coord::new(-d.y, d.x), d),
    }
}

/// Plan an ordinary capture: approach short, evict and park, re-center
pub(crate) fn capture_plan(
    deadzones: &mut DeadzoneAllocator,
    mv: &MoveDescriptor,
) -> Result<MovePlan, PlanError> {
    let victim = mv.captured.ok_or(PlanError::MissingCapturedPiece)?;
    let dest = mv.to.to_physical();

    let nominal = quiet_path(mv.from, mv.to)?;
    let last = nominal.vectors().last().copied().unwrap_or(Coord::ZERO);
    let approach = last.signum();
    let t = eviction_triple(EdgeClass::of(mv.to), approach);

    // Mover halts one half-step short of the occupied square
    let mut approach_path = Path::new(nominal.start());
    approach_path.extend(&nominal.vectors()[..nominal.len() - 1])?;
    let shortened = last + t.stop_short;
    if !shortened.is_zero() {
        approach_path.push(shortened)?;
    }

    // Victim: off-center pull, then park in its deadzone slot
    let mut victim_path = Path::new(dest);
    victim_path.push(t.evict)?;
    let slot = deadzones.next_slot(victim)?;
    let dogleg = relocation_dogleg(dest + t.evict, slot);
    victim_path.extend(dogleg.vectors())?;

    // Mover: final pull onto the vacated square
    let mut recenter_path = Path::new(dest + t.stop_short);
    recenter_path.push(t.recenter)?;

    let mut plan = MovePlan::new();
    plan.push(approach_path)?;
    plan.push(victim_path)?;
    plan.push(recenter_path)?;
    Ok(plan)
}

/// Plan an en-passant capture
///
/// The mover's drag completes normally; the captured pawn sits one rank
/// behind the destination and is pulled off at an offset toward its
/// parking side before being routed to its slot.
pub(crate) fn en_passant_plan(
    deadzones: &mut DeadzoneAllocator,
    mv: &MoveDescriptor,
) -> Result<MovePlan, PlanError> {
    let victim = mv.captured.ok_or(PlanError::MissingCapturedPiece)?;
    let from = mv.from.to_physical();
    let to = mv.to.to_physical();

    let mover_path = quiet_path(mv.from, mv.to)?;

    let victim_square = Coord::new(to.x, from.y);
    let forward = (to.y - from.y).signum();
    let side = match victim.color {
        PieceColor::White => -1,
        PieceColor::Black => 1,
    };
    let offset = Coord::new(side, -forward);

    let mut victim_path = Path::new(victim_square);
    victim_path.push(offset)?;
    let slot = deadzones.next_slot(victim)?;
    let dogleg = relocation_dogleg(victim_square + offset, slot);
    victim_path.extend(dogleg.vectors())?;

    let mut plan = MovePlan::new();
    plan.push(mover_path)?;
    plan.push(victim_path)?;
    Ok(plan)
}
