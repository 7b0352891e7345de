//! Tournament engine: scoring, standings, group draw, bracket
//! generation, promotion, and winner advancement.

mod advancement;
mod bracket;
mod groups;
mod promotion;
mod scoring;
mod standings;

pub use advancement::{finish_match, start_match};
pub use bracket::generate_bracket;
pub use groups::generate_group_matches;
pub use promotion::promote_group_winners;
pub use scoring::{add_point, toggle_serve, PointOutcome};
pub use standings::{compute_standings, GroupStanding};
