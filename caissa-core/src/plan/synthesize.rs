//! Quiet-move and castle path synthesis
//!
//! Slides travel square-center to square-center in one segment. Knight
//! moves dogleg through the between-square lanes so they never cut the
//! square diagonally adjacent to their start. Castles drag the rook
//! first, then walk the king around it on the offset lane.

use super::descriptor::MoveDescriptor;
use super::{MovePlan, PlanError};
use crate::board::{Cell, Coord, CELL_PITCH};
use crate::motion::Path;

/// Synthesize the single drag for a non-capturing, non-castle move
///
/// Orthogonal and exactly-diagonal deltas produce a two-point path;
/// anything else is knight-shaped and routed as a three-segment dogleg:
/// a diagonal half-step, a double full step along the longer axis, and a
/// diagonal half-step back onto the destination.
pub(crate) fn quiet_path(from: Cell, to: Cell) -> Result<Path, PlanError> {
    let start = from.to_physical();
    let delta = to.to_physical() - start;
    let mut path = Path::new(start);

    if delta.x == 0 || delta.y == 0 || delta.x.abs() == delta.y.abs() {
        path.push(delta)?;
        return Ok(path);
    }

    // Knight-shaped: lean onto the lane, run the long axis, lean back
    let sign = delta.signum();
    let long = if delta.y.abs() > delta.x.abs() {
        Coord::new(0, 2 * CELL_PITCH * sign.y)
    } else {
        Coord::new(2 * CELL_PITCH * sign.x, 0)
    };
    let lead = Coord::new(sign.x, sign.y);
    let trail = delta - lead - long;
    path.push(lead)?;
    path.push(long)?;
    path.push(trail)?;
    Ok(path)
}

/// Synthesize both drags of a castle
///
/// The rook slides to its new file along the offset lane first; the king
/// then enters via a diagonal half-step, runs two full steps, and steps
/// diagonally back onto the final file, visually walking around the rook.
pub(crate) fn castle_plan(mv: &MoveDescriptor) -> Result<MovePlan, PlanError> {
    let to = mv.to;
    if to.rank() != 1 && to.rank() != 8 {
        return Err(PlanError::InvalidCastle(to));
    }
    let kingside = match to.file() {
        'g' => true,
        'c' => false,
        _ => return Err(PlanError::InvalidCastle(to)),
    };

    let rank_y = to.to_physical().y;
    // Offset lane toward the board interior
    let lane = if to.rank() == 1 { 1 } else { -1 };

    let (rook_from, rook_vectors, king_vectors) = if kingside {
        (
            Coord::new(7 * CELL_PITCH, rank_y),
            [
                Coord::new(-1, lane),
                Coord::new(-2, 0),
                Coord::new(-1, -lane),
            ],
            [
                Coord::new(1, lane),
                Coord::new(4, 0),
                Coord::new(-1, -lane),
            ],
        )
    } else {
        (
            Coord::new(0, rank_y),
            [
                Coord::new(1, lane),
                Coord::new(4, 0),
                Coord::new(1, -lane),
            ],
            [
                Coord::new(-1, lane),
                Coord::new(-4, 0),
                Coord::new(1, -lane),
            ],
        )
    };

    let mut rook_path = Path::new(rook_from);
    rook_path.extend(&rook_vectors)?;
    let mut king_path = Path::new(mv.from.to_physical());
    king_path.extend(&king_vectors)?;

    let mut plan = MovePlan::new();
    plan.push(rook_path)?;
    plan.push(king_path)?;
    Ok(plan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::descriptor::PieceColor;

    fn cell(s: &str) -> Cell {
        s.parse().unwrap()
    }

    #[test]
    fn test_orthogonal_slide() {
        let path = quiet_path(cell("a1"), cell("a8")).unwrap();
        assert_eq!(path.vectors(), [Coord::new(0, 14)]);
    }

    #[test]
    fn test_diagonal_slide() {
        let path = quiet_path(cell("c1"), cell("h6")).unwrap();
        assert_eq!(path.vectors(), [Coord::new(10, 10)]);
    }

    #[test]
    fn test_knight_dogleg_g1_f3() {
        let path = quiet_path(cell("g1"), cell("f3")).unwrap();
        let delta = cell("f3").to_physical() - cell("g1").to_physical();
        assert_eq!(path.len(), 3);
        let [lead, long, trail] = [path.vectors()[0], path.vectors()[1], path.vectors()[2]];
        // Diagonal, long-axis, diagonal
        assert_eq!(lead.x.abs(), 1);
        assert_eq!(lead.y.abs(), 1);
        assert_eq!(long, Coord::new(0, 4));
        assert_eq!(trail.x.abs(), 1);
        assert_eq!(trail.y.abs(), 1);
        assert_eq!(lead + long + trail, delta);
        // Never enters the square diagonally adjacent to the start
        assert_eq!(path.start() + lead, Coord::new(11, 1));
    }

    #[test]
    fn test_knight_dogleg_long_x_axis() {
        let path = quiet_path(cell("b1"), cell("d2")).unwrap();
        assert_eq!(path.vectors()[1], Coord::new(4, 0));
        assert_eq!(path.end(), cell("d2").to_physical());
    }

    #[test]
    fn test_kingside_castle_white() {
        let mv = MoveDescriptor::quiet(cell("e1"), cell("g1"), PieceColor::White).castle();
        let plan = castle_plan(&mv).unwrap();
        assert_eq!(plan.len(), 2);
        // Rook drag first: h1 to f1
        let rook = &plan.paths()[0];
        assert_eq!(rook.start(), cell("h1").to_physical());
        assert_eq!(rook.end(), cell("f1").to_physical());
        // King drag second, ending on g1
        let king = &plan.paths()[1];
        assert_eq!(king.start(), cell("e1").to_physical());
        assert_eq!(king.end(), cell("g1").to_physical());
        // King walks the offset lane above rank 1
        let wps: heapless::Vec<Coord, 8> = king.waypoints().collect();
        assert!(wps.iter().any(|wp| wp.y == 1));
    }

    #[test]
    fn test_queenside_castle_black() {
        let mv = MoveDescriptor::quiet(cell("e8"), cell("c8"), PieceColor::Black).castle();
        let plan = castle_plan(&mv).unwrap();
        let rook = &plan.paths()[0];
        assert_eq!(rook.start(), cell("a8").to_physical());
        assert_eq!(rook.end(), cell("d8").to_physical());
        let king = &plan.paths()[1];
        assert_eq!(king.end(), cell("c8").to_physical());
        // Offset lane runs below rank 8
        let wps: heapless::Vec<Coord, 8> = king.waypoints().collect();
        assert!(wps.iter().any(|wp| wp.y == 13));
    }

    #[test]
    fn test_castle_rejects_non_targets() {
        let mv = MoveDescriptor::quiet(cell("e1"), cell("f1"), PieceColor::White).castle();
        assert_eq!(
            castle_plan(&mv),
            Err(PlanError::InvalidCastle(cell("f1")))
        );
    }
}
