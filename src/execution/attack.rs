//! Land attack: a troop pool that eats its way through a target's border
//!
//! The frontier is a min-heap keyed on a jittered priority so the front
//! advances unevenly, with tiles surrounded by the attacker's land and
//! flat terrain taken first. Entries can go stale (the tile changed hands
//! since it was queued) and are skipped when popped. The heap is only an
//! ordering; `border` is the set of target tiles actually touching the
//! attacker and is what sizes the per-tick capture budget.

use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use crate::combat::{attack_logic, attack_tiles_per_tick};
use crate::core::error::{Result, SimError};
use crate::core::rng::PseudoRandom;
use crate::core::types::{Owner, PlayerId, TileRef};
use crate::execution::{Execution, TickContext};
use crate::game::map::Terrain;
use crate::game::state::GameState;

/// Share of the attacker's troops committed when no amount is given
const DEFAULT_ATTACK_SHARE: f64 = 0.2;

type FrontierEntry = Reverse<(OrderedFloat<f64>, TileRef)>;

#[derive(Debug)]
pub struct AttackExecution {
    attacker: PlayerId,
    target: Owner,
    requested: Option<f64>,
    troops: f64,
    frontier: BinaryHeap<FrontierEntry>,
    border: BTreeSet<TileRef>,
    random: Option<PseudoRandom>,
    active: bool,
}

impl AttackExecution {
    /// `troops` defaults to a fifth of the attacker's army
    pub fn new(attacker: PlayerId, target: Owner, troops: Option<f64>) -> Self {
        Self {
            attacker,
            target,
            requested: troops,
            troops: 0.0,
            frontier: BinaryHeap::new(),
            border: BTreeSet::new(),
            random: None,
            active: true,
        }
    }

    fn priority(game: &GameState, random: &mut PseudoRandom, attacker: PlayerId, tile: TileRef) -> f64 {
        let map = game.map();
        let surrounded = map
            .neighbors(tile)
            .into_iter()
            .filter(|&n| map.owner(n).map(|o| o == Owner::Player(attacker)).unwrap_or(false))
            .count() as f64;
        let terrain_penalty = match map.terrain(tile) {
            Ok(Terrain::Highland) => 0.5,
            Ok(Terrain::Mountain) => 1.0,
            _ => 0.0,
        };
        let jitter = f64::from(random.next_in_range(0, 7) + 10);
        game.ticks() as f64 + jitter * (1.0 - 0.125 * surrounded + terrain_penalty)
    }

    /// Land tiles of the target that touch `tile`
    fn target_neighbors(&self, game: &GameState, tile: TileRef) -> Vec<TileRef> {
        game.map()
            .neighbors(tile)
            .into_iter()
            .filter(|&n| game.map().is_land(n))
            .filter(|&n| game.owner(n).map(|o| o == self.target).unwrap_or(false))
            .collect()
    }

    fn build_frontier(&mut self, game: &GameState) -> Result<()> {
        let random = self
            .random
            .as_mut()
            .ok_or(SimError::NotInitialized("AttackExecution"))?;
        for own in game.tiles_owned_by(Owner::Player(self.attacker)) {
            for n in game.map().neighbors(own) {
                if game.map().is_land(n) && game.owner(n)? == self.target {
                    self.border.insert(n);
                }
            }
        }
        for &tile in &self.border {
            let key = Self::priority(game, random, self.attacker, tile);
            self.frontier.push(Reverse((OrderedFloat(key), tile)));
        }
        Ok(())
    }

    /// Drop border tiles that changed hands or lost contact since they were queued
    fn prune_border(&mut self, game: &GameState) {
        let attacker = Owner::Player(self.attacker);
        let target = self.target;
        self.border.retain(|&t| {
            game.owner(t).map(|o| o == target).unwrap_or(false) && game.borders(t, attacker)
        });
    }

    /// Hand surviving troops back to the attacker and stop
    fn retreat(&mut self, game: &mut GameState) {
        if let Some(p) = game.player_mut(self.attacker) {
            if p.is_alive() {
                p.add_troops(self.troops);
            }
        }
        self.troops = 0.0;
        self.active = false;
    }

    fn endpoints_alive(&self, game: &GameState) -> bool {
        let attacker_alive = game.player(self.attacker).map(|p| p.is_alive()).unwrap_or(false);
        let target_alive = match self.target {
            Owner::Player(id) => game.player(id).map(|p| p.is_alive()).unwrap_or(false),
            Owner::TerraNullius => true,
        };
        attacker_alive && target_alive
    }
}

impl Execution for AttackExecution {
    fn name(&self) -> &'static str {
        "AttackExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        match ctx.game.player(self.attacker) {
            Some(p) if p.is_alive() => {}
            _ => {
                tracing::warn!("AttackExecution: attacker {} is not an active player", self.attacker);
                self.active = false;
                return Ok(());
            }
        }
        if let Owner::Player(target) = self.target {
            if target == self.attacker {
                tracing::warn!("AttackExecution: {} cannot attack itself", self.attacker);
                self.active = false;
                return Ok(());
            }
            if !ctx.game.player(target).map(|p| p.is_alive()).unwrap_or(false) {
                tracing::warn!("AttackExecution: target {} is not an active player", target);
                self.active = false;
                return Ok(());
            }
        }

        let seed = (u64::from(self.attacker.0) << 32) ^ ctx.ticks();
        self.random = Some(PseudoRandom::new(seed));
        self.build_frontier(ctx.game)?;
        if self.border.is_empty() {
            tracing::warn!("AttackExecution: {} does not border {:?}", self.attacker, self.target);
            self.active = false;
            return Ok(());
        }

        let attacker = ctx.game.require_player_mut(self.attacker)?;
        let wanted = self
            .requested
            .unwrap_or(attacker.troops() * DEFAULT_ATTACK_SHARE);
        self.troops = attacker.remove_troops(wanted);
        tracing::debug!(
            "{} attacks {:?} with {:.0} troops across {} border tiles",
            self.attacker,
            self.target,
            self.troops,
            self.border.len()
        );
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if self.random.is_none() {
            return Err(SimError::NotInitialized("AttackExecution"));
        }
        if !self.endpoints_alive(ctx.game) {
            self.retreat(ctx.game);
            return Ok(());
        }

        self.prune_border(ctx.game);
        let extra = match self.random.as_mut() {
            Some(random) => random.next_in_range(0, 5),
            None => 0,
        };
        let adjacent = self.border.len() as u32 + extra;
        let mut budget = attack_tiles_per_tick(ctx.game, self.troops, self.target, adjacent)?;

        while budget > 0.0 {
            if self.troops < 1.0 {
                self.retreat(ctx.game);
                return Ok(());
            }
            let Some(Reverse((_, tile))) = self.frontier.pop() else {
                self.retreat(ctx.game);
                return Ok(());
            };
            self.border.remove(&tile);
            if ctx.game.owner(tile)? != self.target
                || !ctx.game.borders(tile, Owner::Player(self.attacker))
            {
                continue;
            }

            let result = attack_logic(ctx.game, ctx.config, self.troops, self.attacker, self.target, tile)?;
            budget -= result.tiles_per_tick_used;
            self.troops = (self.troops - result.attacker_troop_loss).max(0.0);
            if let Owner::Player(defender) = self.target {
                ctx.game
                    .require_player_mut(defender)?
                    .remove_troops(result.defender_troop_loss);
            }
            ctx.game.conquer(self.attacker, tile)?;

            let next = self.target_neighbors(ctx.game, tile);
            if let Some(random) = self.random.as_mut() {
                for n in next {
                    if !self.border.insert(n) {
                        continue;
                    }
                    let key = Self::priority(ctx.game, random, self.attacker, n);
                    self.frontier.push(Reverse((OrderedFloat(key), n)));
                }
            }
        }

        if self.frontier.is_empty() {
            self.retreat(ctx.game);
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
