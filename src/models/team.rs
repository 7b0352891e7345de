//! Team (one or two players) and the derived team identity key.

use crate::models::player::Player;
use serde::{Deserialize, Serialize};

/// A side in a match: one player (singles) or two (doubles).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub player1: Player,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player2: Option<Player>,
}

impl Team {
    /// Singles team: one player.
    pub fn singles(player1: Player) -> Self {
        Self {
            player1,
            player2: None,
        }
    }

    /// Doubles team: a pair of players.
    pub fn doubles(player1: Player, player2: Player) -> Self {
        Self {
            player1,
            player2: Some(player2),
        }
    }

    /// Derived identity key within a tournament category: player1 id then
    /// player2 id, concatenated. Player ids are globally unique, so the
    /// key is collision-free; the fixed ordering means the same pair
    /// always maps to the same key.
    pub fn key(&self) -> String {
        match &self.player2 {
            Some(p2) => format!("{}{}", self.player1.id.simple(), p2.id.simple()),
            None => self.player1.id.simple().to_string(),
        }
    }

    /// "Ana / Bia" style display label.
    pub fn display_name(&self) -> String {
        match &self.player2 {
            Some(p2) => format!("{} / {}", self.player1.name, p2.name),
            None => self.player1.name.clone(),
        }
    }

    /// Sentinel side for a bracket slot whose team is not known yet,
    /// so both sides of a placeholder match stay populated.
    pub fn placeholder(category: &str) -> Self {
        Self::singles(Player::new("TBD", category))
    }
}
