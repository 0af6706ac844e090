//! Generic relocation planning
//!
//! Moves any single piece between two arbitrary physical coordinates
//! without per-move chess semantics. Used for board resets, deadzone
//! reorganization, and the tail of capture evictions. The long legs of
//! the path travel only on odd (between-square) lane coordinates, clamped
//! into the safe interior band so the gantry never grazes the frame.

use super::path::Path;
use crate::board::{clamp_lane_x, clamp_lane_y, Coord};

/// Nearest vertical lane (odd X) to `x`, leaning in `dir`
fn vertical_lane(x: i16, dir: i16) -> i16 {
    let lane = if x % 2 != 0 {
        x
    } else {
        x + if dir != 0 { dir } else { 1 }
    };
    clamp_lane_x(lane)
}

/// Horizontal lane (odd Y) on the near side of a destination at `y`,
/// approached along `dir`
fn horizontal_lane(y: i16, dir: i16) -> i16 {
    let lane = if y % 2 != 0 {
        y
    } else {
        y - if dir != 0 { dir } else { -1 }
    };
    clamp_lane_y(lane)
}

/// Plan a frame-safe dogleg between two coordinates
///
/// Emits a 5-point L path: start → sidestep onto a vertical lane →
/// lane travel on Y → lane travel on X at the destination's adjacent
/// row → destination. Degenerate legs collapse to zero vectors and are
/// removed by the compressor downstream.
pub fn relocation_dogleg(from: Coord, to: Coord) -> Path {
    let mut path = Path::new(from);
    if from == to {
        return path;
    }

    let step = (to - from).signum();
    let lane_x = vertical_lane(from.x, step.x);
    let lane_y = horizontal_lane(to.y, step.y);

    // Capacity is fixed at four legs; pushes cannot fail
    let _ = path.push(Coord::new(lane_x - from.x, 0));
    let _ = path.push(Coord::new(0, lane_y - from.y));
    let _ = path.push(Coord::new(to.x - lane_x, 0));
    let _ = path.push(Coord::new(0, to.y - lane_y));
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{X_LANE_MAX, X_LANE_MIN, Y_LANE_MAX, Y_LANE_MIN};
    use proptest::prelude::*;

    #[test]
    fn test_reaches_destination() {
        let from = Coord::new(0, 0);
        let to = Coord::new(14, 14);
        let path = relocation_dogleg(from, to);
        assert_eq!(path.start(), from);
        assert_eq!(path.end(), to);
        assert_eq!(path.len(), 4);
    }

    #[test]
    fn test_degenerate_same_point() {
        let at = Coord::new(6, 6);
        let path = relocation_dogleg(at, at);
        assert!(path.is_empty());
        assert_eq!(path.end(), at);
    }

    #[test]
    fn test_travels_on_lanes() {
        // The two long legs must run on odd (between-square) coordinates
        let path = relocation_dogleg(Coord::new(0, 0), Coord::new(12, 8));
        let wps: heapless::Vec<Coord, 8> = path.waypoints().collect();
        assert_eq!(wps[1].x.rem_euclid(2), 1);
        assert_eq!(wps[2].y.rem_euclid(2), 1);
        assert_eq!(wps[3].y.rem_euclid(2), 1);
    }

    #[test]
    fn test_odd_start_keeps_its_lane() {
        // An off-center start is already on a lane; no sidestep through
        // a square-center column
        let path = relocation_dogleg(Coord::new(5, 7), Coord::new(18, 0));
        let wps: heapless::Vec<Coord, 8> = path.waypoints().collect();
        assert_eq!(wps[1], Coord::new(5, 7));
        assert_eq!(wps[2], Coord::new(5, 1));
        assert_eq!(wps[3], Coord::new(18, 1));
        assert_eq!(path.end(), Coord::new(18, 0));
    }

    #[test]
    fn test_front_apron_lane_is_reachable() {
        let path = relocation_dogleg(Coord::new(4, 4), Coord::new(10, 0));
        for wp in path.waypoints() {
            assert!(wp.y >= Y_LANE_MIN);
        }
        assert_eq!(path.end(), Coord::new(10, 0));
    }

    proptest! {
        /// The path is exact and its interior waypoints stay inside the
        /// travel band with long legs on odd lanes.
        #[test]
        fn prop_waypoints_in_band(
            fx in -6i16..17, fy in 0i16..15,
            tx in -6i16..17, ty in 0i16..15,
        ) {
            let from = Coord::new(fx, fy);
            let to = Coord::new(tx, ty);
            let path = relocation_dogleg(from, to);
            prop_assert_eq!(path.end(), to);
            for (i, wp) in path.waypoints().enumerate() {
                if i != 0 && i != path.len() {
                    prop_assert!(wp.x >= X_LANE_MIN && wp.x <= X_LANE_MAX);
                    prop_assert!(wp.y >= Y_LANE_MIN && wp.y <= Y_LANE_MAX);
                }
            }
            if from != to {
                // Vertical travel runs on an odd X, horizontal on an odd Y
                let wps: heapless::Vec<Coord, 8> = path.waypoints().collect();
                prop_assert_eq!(wps[1].x.rem_euclid(2), 1);
                prop_assert_eq!(wps[2].y.rem_euclid(2), 1);
            }
        }
    }
}
