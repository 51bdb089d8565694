//! Serializable end-of-run snapshot

use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Gold, PlayerId, Tick};
use crate::game::state::GameState;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: PlayerId,
    pub name: String,
    pub alive: bool,
    pub tiles: u64,
    pub troops: f64,
    pub population: f64,
    pub gold: Gold,
    pub traitor: bool,
    /// Players this one holds an intel report on
    pub intel_on: Vec<PlayerId>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub tick: Tick,
    pub players: Vec<PlayerSummary>,
    pub live_units: usize,
    pub fallout_ratio: f64,
    pub state_hash: u64,
}

impl SimulationSummary {
    pub fn capture(game: &GameState) -> Self {
        let players = game
            .players()
            .map(|p| PlayerSummary {
                id: p.id,
                name: p.name.clone(),
                alive: p.is_alive(),
                tiles: p.tiles_owned(),
                troops: p.troops(),
                population: p.population(),
                gold: p.gold(),
                traitor: p.is_traitor(),
                intel_on: p.intel_reports().map(|r| r.target).collect(),
            })
            .collect();

        Self {
            tick: game.ticks(),
            players,
            live_units: game.units().count(),
            fallout_ratio: game.fallout_ratio(),
            state_hash: game.state_hash(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Players still in the game, most territory first
    pub fn standings(&self) -> Vec<&PlayerSummary> {
        let mut alive: Vec<&PlayerSummary> = self.players.iter().filter(|p| p.alive).collect();
        alive.sort_by(|a, b| b.tiles.cmp(&a.tiles).then(a.id.cmp(&b.id)));
        alive
    }
}
