//! Fixed-tick movement simulation with elastic boundary collision.
//!
//! The shell drives the cadence (one call per [`crate::TICK_MS`] interval);
//! each call advances the whole population atomically, so stopping and
//! restarting the interval (map resize, battle entry) cannot corrupt
//! in-flight positions.

use crate::bug::Bug;
use crate::state::MapSize;

/// Advance every bug by one simulation tick: position += velocity, with a
/// lossless reflection and clamp on any axis leaving `[0, extent]`.
pub fn advance_tick(bugs: &mut [Bug], size: MapSize) {
    for bug in bugs {
        step(bug, size);
    }
}

fn step(bug: &mut Bug, size: MapSize) {
    bug.x += bug.dx;
    bug.y += bug.dy;

    if bug.x < 0.0 || bug.x > size.width {
        bug.dx = -bug.dx;
        bug.x = bug.x.clamp(0.0, size.width);
    }
    if bug.y < 0.0 || bug.y > size.height {
        bug.dy = -bug.dy;
        bug.y = bug.y.clamp(0.0, size.height);
    }
}

/// Pull every bug back inside a (possibly shrunken) map after a resize.
/// Velocities are left alone; the next tick reflects naturally.
pub fn clamp_into(bugs: &mut [Bug], size: MapSize) {
    for bug in bugs {
        bug.x = bug.x.clamp(0.0, size.width);
        bug.y = bug.y.clamp(0.0, size.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bug::Species;
    use crate::ident::BugId;

    fn bug_at(x: f32, y: f32, dx: f32, dy: f32) -> Bug {
        let id: BugId = "bug-00000000000a0001".parse().unwrap();
        let mut bug = Bug::new(id, Species::Beetle, false, 50);
        bug.x = x;
        bug.y = y;
        bug.dx = dx;
        bug.dy = dy;
        bug
    }

    #[test]
    fn straight_line_motion_without_walls() {
        let size = MapSize::default();
        let mut bugs = [bug_at(10.0, 20.0, 0.5, -0.25)];
        advance_tick(&mut bugs, size);
        assert!((bugs[0].x - 10.5).abs() < f32::EPSILON);
        assert!((bugs[0].y - 19.75).abs() < f32::EPSILON);
    }

    #[test]
    fn right_wall_reflects_and_clamps() {
        let size = MapSize {
            width: 100.0,
            height: 100.0,
        };
        let mut bugs = [bug_at(100.0, 50.0, 0.8, 0.0)];
        advance_tick(&mut bugs, size);
        assert!(bugs[0].dx < 0.0, "velocity should reflect");
        assert!(bugs[0].x <= size.width);
        assert!((bugs[0].x - size.width).abs() < f32::EPSILON, "clamped to wall");
    }

    #[test]
    fn origin_corner_reflects_both_axes() {
        let size = MapSize {
            width: 100.0,
            height: 100.0,
        };
        let mut bugs = [bug_at(0.2, 0.1, -0.9, -0.9)];
        advance_tick(&mut bugs, size);
        assert!(bugs[0].dx > 0.0 && bugs[0].dy > 0.0);
        assert!((bugs[0].x - 0.0).abs() < f32::EPSILON);
        assert!((bugs[0].y - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn speed_survives_many_bounces() {
        let size = MapSize {
            width: 30.0,
            height: 20.0,
        };
        let mut bugs = [bug_at(5.0, 5.0, 0.9, -0.7)];
        for _ in 0..10_000 {
            advance_tick(&mut bugs, size);
        }
        assert!((bugs[0].dx.abs() - 0.9).abs() < f32::EPSILON, "no speed decay");
        assert!((bugs[0].dy.abs() - 0.7).abs() < f32::EPSILON);
        assert!((0.0..=size.width).contains(&bugs[0].x));
        assert!((0.0..=size.height).contains(&bugs[0].y));
    }

    #[test]
    fn clamp_into_pulls_bugs_inside_after_shrink() {
        let mut bugs = [bug_at(500.0, 300.0, 0.1, 0.1)];
        clamp_into(
            &mut bugs,
            MapSize {
                width: 200.0,
                height: 100.0,
            },
        );
        assert!((bugs[0].x - 200.0).abs() < f32::EPSILON);
        assert!((bugs[0].y - 100.0).abs() < f32::EPSILON);
    }
}
