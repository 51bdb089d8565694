//! Player state: economy, territory counters, unit inventory and intel ledger

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{Gold, PlayerId, Tick};
use crate::game::unit::UnitType;
use crate::intel::IntelReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerType {
    Human,
    Bot,
    /// AI-controlled nation that plays like a human
    FakeHuman,
}

/// Record a player is created from at game start
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub name: String,
    pub player_type: PlayerType,
}

impl PlayerInfo {
    pub fn new(name: impl Into<String>, player_type: PlayerType) -> Self {
        Self {
            name: name.into(),
            player_type,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub player_type: PlayerType,
    /// Share of population the player wants under arms
    pub target_troop_ratio: f64,
    troops: f64,
    population: f64,
    gold: Gold,
    tiles_owned: u64,
    traitor_ticks: Tick,
    alive: bool,
    spawned: bool,
    units_owned: BTreeMap<UnitType, u32>,
    units_constructed: BTreeMap<UnitType, u32>,
    /// Latest report on each other player, replaced wholesale on every gather
    intel: BTreeMap<PlayerId, IntelReport>,
}

impl Player {
    pub fn new(id: PlayerId, info: PlayerInfo, population: f64, troops: f64, troop_ratio: f64) -> Self {
        Self {
            id,
            name: info.name,
            player_type: info.player_type,
            target_troop_ratio: troop_ratio,
            troops: troops.max(0.0),
            population: population.max(0.0),
            gold: 0,
            tiles_owned: 0,
            traitor_ticks: 0,
            alive: true,
            spawned: false,
            units_owned: BTreeMap::new(),
            units_constructed: BTreeMap::new(),
            intel: BTreeMap::new(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
    }

    /// Has the player placed its starting territory at least once
    pub fn has_spawned(&self) -> bool {
        self.spawned
    }

    pub(crate) fn mark_spawned(&mut self) {
        self.spawned = true;
    }

    // === ECONOMY ===

    pub fn troops(&self) -> f64 {
        self.troops
    }

    pub fn population(&self) -> f64 {
        self.population
    }

    /// Population not serving as troops
    pub fn workers(&self) -> f64 {
        (self.population - self.troops).max(0.0)
    }

    pub fn gold(&self) -> Gold {
        self.gold
    }

    pub fn add_gold(&mut self, amount: Gold) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Spend gold if the player can afford it
    pub fn remove_gold(&mut self, amount: Gold) -> bool {
        match self.gold.checked_sub(amount) {
            Some(rest) => {
                self.gold = rest;
                true
            }
            None => false,
        }
    }

    /// Troops never go below zero
    pub fn add_troops(&mut self, amount: f64) {
        self.troops = (self.troops + amount).max(0.0);
    }

    /// Removes up to `amount` troops, returning how many were actually removed
    pub fn remove_troops(&mut self, amount: f64) -> f64 {
        let removed = amount.clamp(0.0, self.troops);
        self.troops -= removed;
        removed
    }

    pub fn set_population(&mut self, population: f64) {
        self.population = population.max(0.0);
    }

    // === TERRITORY ===

    pub fn tiles_owned(&self) -> u64 {
        self.tiles_owned
    }

    pub(crate) fn gain_tile(&mut self) {
        self.tiles_owned += 1;
    }

    pub(crate) fn lose_tile(&mut self) {
        self.tiles_owned = self.tiles_owned.saturating_sub(1);
    }

    // === TRAITOR ===

    pub fn is_traitor(&self) -> bool {
        self.traitor_ticks > 0
    }

    pub fn traitor_ticks_remaining(&self) -> Tick {
        self.traitor_ticks
    }

    pub fn mark_traitor(&mut self, duration: Tick) {
        self.traitor_ticks = duration;
    }

    pub(crate) fn decay_traitor(&mut self) {
        self.traitor_ticks = self.traitor_ticks.saturating_sub(1);
    }

    // === UNITS ===

    pub fn units_owned(&self, unit_type: UnitType) -> u32 {
        self.units_owned.get(&unit_type).copied().unwrap_or(0)
    }

    pub fn units_constructed(&self, unit_type: UnitType) -> u32 {
        self.units_constructed.get(&unit_type).copied().unwrap_or(0)
    }

    pub(crate) fn record_unit_built(&mut self, unit_type: UnitType) {
        *self.units_owned.entry(unit_type).or_insert(0) += 1;
        *self.units_constructed.entry(unit_type).or_insert(0) += 1;
    }

    pub(crate) fn record_unit_lost(&mut self, unit_type: UnitType) {
        if let Some(count) = self.units_owned.get_mut(&unit_type) {
            *count = count.saturating_sub(1);
        }
    }

    // === INTEL ===

    pub fn intel_report(&self, target: PlayerId) -> Option<&IntelReport> {
        self.intel.get(&target)
    }

    pub fn intel_reports(&self) -> impl Iterator<Item = &IntelReport> {
        self.intel.values()
    }

    pub(crate) fn store_intel_report(&mut self, report: IntelReport) {
        self.intel.insert(report.target, report);
    }

    pub(crate) fn forget_intel_on(&mut self, target: PlayerId) -> Option<IntelReport> {
        self.intel.remove(&target)
    }
}
