//! Referee scoring: point-by-point state transitions for one match.

use crate::models::{Match, MatchStatus, Points, Side, TournamentSettings};

/// Outcome of a scoring event.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PointOutcome {
    /// Match already finished; nothing changed.
    Ignored,
    /// Point recorded, game still running.
    Scored,
    /// The scoring side took the game: its set counter was bumped, both
    /// point counters reset, and the serve flipped. Whether the match is
    /// over is the caller's call.
    GameWon,
}

/// Next rung on the standard ladder; None means the point takes the game.
fn next_points(points: Points) -> Option<Points> {
    match points {
        Points::Love => Some(Points::Fifteen),
        Points::Fifteen => Some(Points::Thirty),
        Points::Thirty => Some(Points::Forty),
        Points::Forty | Points::Ad => None,
    }
}

/// Award one point to `side`.
///
/// Pure in-memory transition; persisting the new state is up to the
/// caller, as is keeping concurrent scorers off the same match.
pub fn add_point(m: &mut Match, side: Side, settings: &TournamentSettings) -> PointOutcome {
    if m.status == MatchStatus::Finished {
        return PointOutcome::Ignored;
    }

    let (current, opponent) = match side {
        Side::A => (m.points_a, m.points_b),
        Side::B => (m.points_b, m.points_a),
    };

    let mut next = next_points(current);
    // Golden point: at 40-40 under no-ad rules the next point takes the
    // game, no deuce.
    if settings.no_ad && current == Points::Forty && opponent == Points::Forty {
        next = None;
    }

    match next {
        Some(points) => {
            match side {
                Side::A => m.points_a = points,
                Side::B => m.points_b = points,
            }
            PointOutcome::Scored
        }
        None => {
            match side {
                Side::A => m.sets_a += 1,
                Side::B => m.sets_b += 1,
            }
            m.points_a = Points::Love;
            m.points_b = Points::Love;
            m.serving = m.serving.other();
            PointOutcome::GameWon
        }
    }
}

/// Flip the serving side unconditionally (referee correction).
pub fn toggle_serve(m: &mut Match) {
    m.serving = m.serving.other();
}
