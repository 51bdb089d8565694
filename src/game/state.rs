//! GameState - the authoritative container for one match
//!
//! Owns the map, every player and every unit. All ownership and inventory
//! changes go through here so the counters on `Player` never disagree with
//! the map or the unit registry.

use ahash::AHashMap;
use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::core::config::RuleConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{Owner, PlayerId, Tick, TileRef, UnitId};
use crate::game::map::GameMap;
use crate::game::player::{Player, PlayerInfo};
use crate::game::unit::{Unit, UnitType};

#[derive(Debug)]
pub struct GameState {
    map: GameMap,
    /// Players in creation order
    players: Vec<Player>,
    player_index: AHashMap<PlayerId, usize>,
    /// Live units keyed by id; destroyed units are removed immediately
    units: BTreeMap<UnitId, Unit>,
    next_player_id: u32,
    next_unit_id: u32,
    ticks: Tick,
    spawn_phase_turns: Tick,
}

impl GameState {
    pub fn new(map: GameMap, config: &RuleConfig) -> Self {
        Self {
            map,
            players: Vec::new(),
            player_index: AHashMap::new(),
            units: BTreeMap::new(),
            next_player_id: 1,
            next_unit_id: 1,
            ticks: 0,
            spawn_phase_turns: config.num_spawn_phase_turns(),
        }
    }

    // === TIME ===

    pub fn ticks(&self) -> Tick {
        self.ticks
    }

    pub fn in_spawn_phase(&self) -> bool {
        self.ticks <= self.spawn_phase_turns
    }

    pub(crate) fn advance_tick(&mut self) {
        self.ticks += 1;
    }

    // === MAP ===

    pub fn map(&self) -> &GameMap {
        &self.map
    }

    pub fn owner(&self, tile: TileRef) -> Result<Owner> {
        self.map.owner(tile)
    }

    /// Fraction of land tiles currently irradiated
    pub fn fallout_ratio(&self) -> f64 {
        let land = self.map.num_land_tiles();
        if land == 0 {
            return 0.0;
        }
        self.map.num_tiles_with_fallout() as f64 / land as f64
    }

    pub fn set_fallout(&mut self, tile: TileRef, value: bool) -> Result<()> {
        self.map.set_fallout(tile, value)
    }

    /// Hand `tile` to `player`, updating both owners' tile counts
    pub fn conquer(&mut self, player: PlayerId, tile: TileRef) -> Result<()> {
        let idx = self.player_idx(player)?;
        let previous = self.map.set_owner(tile, Owner::Player(player))?;
        if previous == Owner::Player(player) {
            return Ok(());
        }
        if let Owner::Player(prev) = previous {
            let prev_idx = self.player_idx(prev)?;
            self.players[prev_idx].lose_tile();
        }
        self.players[idx].gain_tile();
        Ok(())
    }

    /// Return `tile` to TerraNullius
    pub fn relinquish(&mut self, tile: TileRef) -> Result<()> {
        if let Owner::Player(prev) = self.map.set_owner(tile, Owner::TerraNullius)? {
            let prev_idx = self.player_idx(prev)?;
            self.players[prev_idx].lose_tile();
        }
        Ok(())
    }

    /// Tiles currently held by `owner`, in tile order
    pub fn tiles_owned_by(&self, owner: Owner) -> Vec<TileRef> {
        self.map
            .owners()
            .filter(|&(_, o)| o == owner)
            .map(|(t, _)| t)
            .collect()
    }

    /// True if `tile` touches at least one tile owned by `owner`
    pub fn borders(&self, tile: TileRef, owner: Owner) -> bool {
        self.map
            .neighbors(tile)
            .into_iter()
            .any(|n| self.map.owner(n).map(|o| o == owner).unwrap_or(false))
    }

    // === PLAYERS ===

    pub fn add_player(&mut self, info: PlayerInfo, config: &RuleConfig) -> PlayerId {
        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;
        let player = Player::new(
            id,
            info,
            config.starting_population,
            config.starting_troops,
            config.default_troop_ratio,
        );
        self.player_index.insert(id, self.players.len());
        self.players.push(player);
        id
    }

    fn player_idx(&self, id: PlayerId) -> Result<usize> {
        self.player_index
            .get(&id)
            .copied()
            .ok_or(SimError::PlayerNotFound(id))
    }

    pub fn has_player(&self, id: PlayerId) -> bool {
        self.player_index.contains_key(&id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.player_index.get(&id).map(|&i| &self.players[i])
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        match self.player_index.get(&id) {
            Some(&i) => Some(&mut self.players[i]),
            None => None,
        }
    }

    /// Lookup for ids the caller already knows to be valid
    pub fn require_player(&self, id: PlayerId) -> Result<&Player> {
        self.player(id).ok_or(SimError::PlayerNotFound(id))
    }

    pub fn require_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.player_mut(id).ok_or(SimError::PlayerNotFound(id))
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    pub(crate) fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Mark a player defeated and destroy everything it still fields
    pub fn eliminate_player(&mut self, id: PlayerId) -> Result<()> {
        let idx = self.player_idx(id)?;
        self.players[idx].mark_dead();
        let doomed: Vec<UnitId> = self
            .units
            .values()
            .filter(|u| u.owner == id)
            .map(|u| u.id)
            .collect();
        for unit in doomed {
            self.delete_unit(unit);
        }
        Ok(())
    }

    pub fn mark_traitor(&mut self, id: PlayerId, config: &RuleConfig) -> Result<()> {
        self.require_player_mut(id)?.mark_traitor(config.traitor_duration);
        Ok(())
    }

    // === UNITS ===

    /// Place a finished unit; rule checks (cost, territory) are the caller's job
    pub fn build_unit(&mut self, unit_type: UnitType, owner: PlayerId, tile: TileRef) -> Result<UnitId> {
        if !self.map.is_valid(tile) {
            return Err(SimError::TileOutOfBounds(tile));
        }
        let idx = self.player_idx(owner)?;
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.units.insert(id, Unit::new(id, unit_type, owner, tile));
        self.players[idx].record_unit_built(unit_type);
        Ok(id)
    }

    /// Destroy a unit, removing it from the registry and its owner's inventory
    pub fn delete_unit(&mut self, id: UnitId) -> Option<Unit> {
        let mut unit = self.units.remove(&id)?;
        unit.deactivate();
        if let Some(&idx) = self.player_index.get(&unit.owner) {
            self.players[idx].record_unit_lost(unit.unit_type);
        }
        tracing::debug!("Deleted {} ({:?}) owned by {}", id, unit.unit_type, unit.owner);
        Some(unit)
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Hand `id` to a single driving execution. `Ok(false)` if it is already taken.
    pub fn bind_unit(&mut self, id: UnitId) -> Result<bool> {
        let unit = self.units.get_mut(&id).ok_or(SimError::UnitNotFound(id))?;
        Ok(unit.bind())
    }

    pub fn is_unit_active(&self, id: UnitId) -> bool {
        self.units.get(&id).map(Unit::is_active).unwrap_or(false)
    }

    /// Raise a unit's level by one
    pub fn upgrade_unit(&mut self, id: UnitId) -> Result<u32> {
        let unit = self.units.get_mut(&id).ok_or(SimError::UnitNotFound(id))?;
        unit.level += 1;
        Ok(unit.level)
    }

    pub fn move_unit(&mut self, id: UnitId, tile: TileRef) -> Result<()> {
        if !self.map.is_valid(tile) {
            return Err(SimError::TileOutOfBounds(tile));
        }
        let unit = self.units.get_mut(&id).ok_or(SimError::UnitNotFound(id))?;
        unit.tile = tile;
        Ok(())
    }

    /// Live units in id order
    pub fn units(&self) -> impl Iterator<Item = &Unit> {
        self.units.values()
    }

    pub fn units_of(&self, owner: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.owner == owner && u.is_active())
    }

    /// Active units of `unit_type` within Euclidean `range` of `tile`, in id order
    pub fn nearby_units(
        &self,
        tile: TileRef,
        range: f64,
        unit_type: UnitType,
    ) -> impl Iterator<Item = &Unit> {
        let range_sq = range * range;
        self.units.values().filter(move |u| {
            u.is_active()
                && u.unit_type == unit_type
                && (self.map.euclidean_dist_squared(u.tile, tile) as f64) <= range_sq
        })
    }

    // === REPLAY ===

    /// Hash of everything that replay verification compares
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.ticks.hash(&mut hasher);
        for (tile, owner) in self.map.owners() {
            tile.hash(&mut hasher);
            owner.hash(&mut hasher);
        }
        for player in &self.players {
            player.id.hash(&mut hasher);
            player.is_alive().hash(&mut hasher);
            player.troops().to_bits().hash(&mut hasher);
            player.population().to_bits().hash(&mut hasher);
            player.gold().hash(&mut hasher);
            for report in player.intel_reports() {
                report.hash(&mut hasher);
            }
        }
        for unit in self.units.values() {
            unit.id.hash(&mut hasher);
            unit.unit_type.hash(&mut hasher);
            unit.owner.hash(&mut hasher);
            unit.tile.hash(&mut hasher);
        }
        hasher.finish()
    }
}
