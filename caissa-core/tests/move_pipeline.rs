//! Whole-pipeline planning tests: descriptor → paths → commands
//!
//! Exercises the planner the way the game-flow layer drives it and
//! checks the geometric invariants that keep pieces on their squares.

use caissa_core::command::MotionCommand;
use caissa_core::{
    compile_plan, Cell, Coord, MagnetPolicy, MotionConfig, MoveDescriptor, MovePlan, Piece,
    PieceColor, PieceKind, Planner,
};

fn cell(s: &str) -> Cell {
    s.parse().unwrap()
}

fn quiet(from: &str, to: &str) -> MoveDescriptor {
    MoveDescriptor::quiet(cell(from), cell(to), PieceColor::White)
}

/// Net displacement of all feed moves in a command list
fn net_travel(commands: &[MotionCommand]) -> Coord {
    let mut net = Coord::ZERO;
    for cmd in commands {
        if let MotionCommand::Linear { dx, dy, .. } = cmd {
            net = net + Coord::new(*dx, *dy);
        }
    }
    net
}

/// Every path in a plan must end exactly where it claims to
fn assert_paths_consistent(plan: &MovePlan) {
    for path in plan.paths() {
        let sum = path
            .vectors()
            .iter()
            .fold(path.start(), |acc, &v| acc + v);
        assert_eq!(sum, path.end());
    }
}

#[test]
fn slide_plan_reaches_destination_exactly() {
    let mut planner = Planner::new();
    let plan = planner.plan_move(&quiet("e2", "e4")).unwrap();
    assert_eq!(plan.len(), 1);
    assert_paths_consistent(&plan);
    assert_eq!(plan.paths()[0].end(), cell("e4").to_physical());
}

#[test]
fn knight_plan_sums_to_delta() {
    let mut planner = Planner::new();
    let plan = planner.plan_move(&quiet("g1", "f3")).unwrap();
    let path = &plan.paths()[0];
    assert_eq!(path.len(), 3);
    assert_eq!(path.end(), cell("f3").to_physical());
    assert_paths_consistent(&plan);
}

#[test]
fn castle_plan_moves_rook_then_king() {
    let mut planner = Planner::new();
    let mv = quiet("e1", "g1").castle();
    let plan = planner.plan_move(&mv).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.paths()[0].end(), cell("f1").to_physical());
    assert_eq!(plan.paths()[1].end(), cell("g1").to_physical());
}

#[test]
fn capture_plan_parks_and_recenters() {
    let mut planner = Planner::new();
    let mv = quiet("e4", "d5").capturing(Piece::new(PieceKind::Pawn, PieceColor::Black));
    let plan = planner.plan_move(&mv).unwrap();
    assert_eq!(plan.len(), 3);
    assert_paths_consistent(&plan);
    // Victim ends on the first right-apron slot
    assert_eq!(plan.paths()[1].end(), Coord::new(18, 0));
    // Mover ends on the destination square
    assert_eq!(plan.paths()[2].end(), cell("d5").to_physical());
}

#[test]
fn en_passant_parks_the_bypassed_pawn() {
    let mut planner = Planner::new();
    let mv = quiet("e5", "d6").en_passant(Piece::new(PieceKind::Pawn, PieceColor::Black));
    let plan = planner.plan_move(&mv).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan.paths()[0].end(), cell("d6").to_physical());
    assert_eq!(plan.paths()[1].start(), cell("d5").to_physical());
}

#[test]
fn repeated_captures_use_distinct_slots() {
    let mut planner = Planner::new();
    let mut slots = Vec::new();
    let victims = ["d5", "c6", "b7", "a8"];
    let mut from = "e4";
    for to in victims {
        let mv = MoveDescriptor::quiet(cell(from), cell(to), PieceColor::White)
            .capturing(Piece::new(PieceKind::Pawn, PieceColor::Black));
        let plan = planner.plan_move(&mv).unwrap();
        slots.push(plan.paths()[1].end());
        from = to;
    }
    for (i, a) in slots.iter().enumerate() {
        for b in slots.iter().skip(i + 1) {
            assert_ne!(a, b);
        }
    }
}

#[test]
fn compiled_plan_travel_matches_board_delta() {
    // For a quiet move, the sum of all feed deltas equals the
    // source-to-destination delta: overshoot cancels against retract
    let mut planner = Planner::new();
    let cfg = MotionConfig::default();
    for (from, to) in [("e2", "e4"), ("g1", "f3"), ("c1", "g5")] {
        let plan = planner.plan_move(&quiet(from, to)).unwrap();
        let commands = compile_plan(&plan, MagnetPolicy::MoveMode, &cfg).unwrap();
        let delta = cell(to).to_physical() - cell(from).to_physical();
        assert_eq!(net_travel(&commands), delta, "{from}->{to}");
    }
}

#[test]
fn compiled_capture_engages_magnet_per_drag() {
    let mut planner = Planner::new();
    let cfg = MotionConfig::default();
    let mv = quiet("e4", "d5").capturing(Piece::new(PieceKind::Pawn, PieceColor::Black));
    let plan = planner.plan_move(&mv).unwrap();
    let commands = compile_plan(&plan, MagnetPolicy::MoveMode, &cfg).unwrap();

    let ons = commands
        .iter()
        .filter(|c| matches!(c, MotionCommand::MagnetOn))
        .count();
    let offs = commands
        .iter()
        .filter(|c| matches!(c, MotionCommand::MagnetOff))
        .count();
    // One engage/release pair per piece drag
    assert_eq!(ons, 3);
    assert_eq!(offs, 3);
    // Each drag starts by positioning the empty gantry
    let rapids = commands
        .iter()
        .filter(|c| matches!(c, MotionCommand::Rapid { .. }))
        .count();
    assert_eq!(rapids, 3);
}

#[test]
fn board_reset_relocation_round_trip() {
    // Drag a parked piece back onto the board, then to a far corner
    let planner = Planner::new();
    let slot = Coord::new(-6, 0);
    let home = cell("d7").to_physical();
    let out = planner.plan_relocation(slot, home);
    assert_eq!(out.start(), slot);
    assert_eq!(out.end(), home);
    let back = planner.plan_relocation(home, cell("h1").to_physical());
    assert_eq!(back.end(), cell("h1").to_physical());
}
