//! Building and upgrading structures
//!
//! Gold is paid up front when construction starts and is not refunded if
//! the site is lost before completion.

use crate::core::error::{Result, SimError};
use crate::core::types::{Owner, PlayerId, Tick, TileRef, UnitId};
use crate::execution::{Execution, SpyReconExecution, TickContext};
use crate::game::state::GameState;
use crate::game::unit::UnitType;

#[derive(Debug)]
pub struct ConstructionExecution {
    player: PlayerId,
    unit_type: UnitType,
    tile: TileRef,
    /// Ticks left until completion, set once construction is paid for
    remaining: Option<Tick>,
    territory_bound: bool,
    active: bool,
}

impl ConstructionExecution {
    pub fn new(player: PlayerId, unit_type: UnitType, tile: TileRef) -> Self {
        Self {
            player,
            unit_type,
            tile,
            remaining: None,
            territory_bound: true,
            active: true,
        }
    }

    fn site_ok(&self, game: &GameState) -> Result<bool> {
        let map = game.map();
        Ok(match self.unit_type {
            UnitType::Warship | UnitType::TransportShip => !map.is_land(self.tile),
            _ if self.territory_bound => {
                map.is_land(self.tile) && game.owner(self.tile)? == Owner::Player(self.player)
            }
            _ => map.is_land(self.tile),
        })
    }
}

impl Execution for ConstructionExecution {
    fn name(&self) -> &'static str {
        "ConstructionExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let owned = match ctx.game.player(self.player) {
            Some(p) if p.is_alive() => p.units_owned(self.unit_type),
            _ => {
                tracing::warn!("ConstructionExecution: {} is not an active player", self.player);
                self.active = false;
                return Ok(());
            }
        };
        if !ctx.game.map().is_valid(self.tile) {
            tracing::warn!("ConstructionExecution: {} is off the map", self.tile);
            self.active = false;
            return Ok(());
        }
        if self.unit_type.is_nuke() {
            tracing::warn!("ConstructionExecution: {:?} must be launched, not built", self.unit_type);
            self.active = false;
            return Ok(());
        }

        let info = ctx.config.unit_info(self.unit_type, owned);
        self.territory_bound = info.territory_bound;
        if !self.site_ok(ctx.game)? {
            tracing::warn!(
                "ConstructionExecution: {} cannot build {:?} at {}",
                self.player,
                self.unit_type,
                self.tile
            );
            self.active = false;
            return Ok(());
        }

        let player = ctx.game.require_player_mut(self.player)?;
        if !player.remove_gold(info.cost) {
            tracing::warn!(
                "ConstructionExecution: {} cannot afford {:?} ({} gold, has {})",
                self.player,
                self.unit_type,
                info.cost,
                player.gold()
            );
            self.active = false;
            return Ok(());
        }

        self.remaining = Some(info.construction_duration);
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let remaining = self
            .remaining
            .ok_or(SimError::NotInitialized("ConstructionExecution"))?;

        if !ctx.game.player(self.player).map(|p| p.is_alive()).unwrap_or(false) {
            self.active = false;
            return Ok(());
        }
        if !self.site_ok(ctx.game)? {
            tracing::warn!(
                "{} lost the site of its {:?} at {} before completion",
                self.player,
                self.unit_type,
                self.tile
            );
            self.active = false;
            return Ok(());
        }

        if remaining > 1 {
            self.remaining = Some(remaining - 1);
            return Ok(());
        }

        let id = ctx.game.build_unit(self.unit_type, self.player, self.tile)?;
        tracing::info!("{} completed {:?} {} at {}", self.player, self.unit_type, id, self.tile);
        if self.unit_type == UnitType::Spy {
            ctx.add_execution(Box::new(SpyReconExecution::from_config(id, ctx.config)));
        }
        self.active = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// One-shot level increase of an existing structure, paid at build price
#[derive(Debug)]
pub struct UpgradeStructureExecution {
    player: PlayerId,
    unit: UnitId,
    active: bool,
}

impl UpgradeStructureExecution {
    pub fn new(player: PlayerId, unit: UnitId) -> Self {
        Self {
            player,
            unit,
            active: true,
        }
    }
}

impl Execution for UpgradeStructureExecution {
    fn name(&self) -> &'static str {
        "UpgradeStructureExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        if !ctx.game.has_player(self.player) {
            tracing::warn!("UpgradeStructureExecution: player {} not found", self.player);
            self.active = false;
        }
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        self.active = false;

        let unit_type = match ctx.game.unit(self.unit) {
            Some(u) if u.is_active() && u.owner == self.player => u.unit_type,
            _ => {
                tracing::warn!("UpgradeStructureExecution: {} has no {}", self.player, self.unit);
                return Ok(());
            }
        };

        let owned = ctx.game.require_player(self.player)?.units_owned(unit_type);
        let info = ctx.config.unit_info(unit_type, owned);
        if !info.upgradable {
            tracing::warn!("UpgradeStructureExecution: {:?} cannot be upgraded", unit_type);
            return Ok(());
        }
        if !ctx.game.require_player_mut(self.player)?.remove_gold(info.cost) {
            tracing::warn!("UpgradeStructureExecution: {} cannot afford upgrade", self.player);
            return Ok(());
        }

        let level = ctx.game.upgrade_unit(self.unit)?;
        tracing::info!("{} upgraded {:?} {} to level {}", self.player, unit_type, self.unit, level);
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RuleConfig;
    use crate::execution::{ExecutionScheduler, ExecutionState};
    use crate::game::map::GameMap;
    use crate::game::player::{PlayerInfo, PlayerType};

    fn setup() -> (GameState, RuleConfig, PlayerId, PlayerId) {
        let config = RuleConfig::default();
        let rows = ["....~", "....~", "....~"];
        let mut game = GameState::new(GameMap::from_rows(&rows).unwrap(), &config);
        let a = game.add_player(PlayerInfo::new("A", PlayerType::Human), &config);
        let b = game.add_player(PlayerInfo::new("B", PlayerType::Human), &config);
        for y in 0..3 {
            for x in 0..2 {
                let t = game.map().tile_ref(x, y).unwrap();
                game.conquer(a, t).unwrap();
            }
            let t = game.map().tile_ref(3, y).unwrap();
            game.conquer(b, t).unwrap();
        }
        game.require_player_mut(a).unwrap().add_gold(10_000_000);
        while game.in_spawn_phase() {
            game.advance_tick();
        }
        (game, config, a, b)
    }

    fn run(game: &mut GameState, config: &RuleConfig, scheduler: &mut ExecutionScheduler, ticks: usize) {
        for _ in 0..ticks {
            scheduler.execute_tick(game, config).unwrap();
        }
    }

    #[test]
    fn test_builds_after_duration() {
        let (mut game, config, a, _) = setup();
        let duration = config.unit_info(UnitType::DefensePost, 0).construction_duration as usize;
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(ConstructionExecution::new(a, UnitType::DefensePost, TileRef(0))));

        run(&mut game, &config, &mut scheduler, duration - 1);
        assert_eq!(game.player(a).unwrap().units_owned(UnitType::DefensePost), 0);
        assert_eq!(game.player(a).unwrap().gold(), 10_000_000 - 50_000);

        run(&mut game, &config, &mut scheduler, 1);
        assert_eq!(game.player(a).unwrap().units_owned(UnitType::DefensePost), 1);
        assert_eq!(scheduler.active_len(), 0);
    }

    #[test]
    fn test_requires_own_territory() {
        let (mut game, config, a, _) = setup();
        let enemy_tile = game.map().tile_ref(3, 0).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(ConstructionExecution::new(a, UnitType::City, enemy_tile)));
        let report = scheduler.execute_tick(&mut game, &config).unwrap();
        assert_eq!(report.stepped, 0);
        assert_eq!(game.player(a).unwrap().gold(), 10_000_000);
    }

    #[test]
    fn test_insufficient_gold() {
        let (mut game, config, _, b) = setup();
        let own = game.map().tile_ref(3, 1).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(ConstructionExecution::new(b, UnitType::City, own)));
        scheduler.execute_tick(&mut game, &config).unwrap();
        assert_eq!(scheduler.active_len(), 0);
        assert_eq!(game.player(b).unwrap().units_owned(UnitType::City), 0);
    }

    #[test]
    fn test_lost_site_cancels() {
        let (mut game, config, a, b) = setup();
        let site = game.map().tile_ref(1, 1).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(ConstructionExecution::new(a, UnitType::SamLauncher, site)));
        run(&mut game, &config, &mut scheduler, 3);
        game.conquer(b, site).unwrap();
        run(&mut game, &config, &mut scheduler, 1);
        assert_eq!(scheduler.active_len(), 0);
        assert_eq!(game.player(a).unwrap().units_owned(UnitType::SamLauncher), 0);
    }

    #[test]
    fn test_spy_behind_enemy_lines_starts_recon() {
        let (mut game, mut config, a, _) = setup();
        config.spy_discovery_chance = 0.0;
        let enemy_tile = game.map().tile_ref(3, 2).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(ConstructionExecution::new(a, UnitType::Spy, enemy_tile)));
        let duration = config.unit_info(UnitType::Spy, 0).construction_duration as usize;
        run(&mut game, &config, &mut scheduler, duration);

        assert_eq!(game.player(a).unwrap().units_owned(UnitType::Spy), 1);
        assert_eq!(scheduler.pending_len(), 1);
        run(&mut game, &config, &mut scheduler, 1);
        assert_eq!(
            scheduler.snapshot(),
            vec![("SpyReconExecution", ExecutionState::Active)]
        );
        assert_eq!(game.player(a).unwrap().units_owned(UnitType::Spy), 1);
    }

    #[test]
    fn test_warship_needs_water() {
        let (mut game, config, a, _) = setup();
        let water = game.map().tile_ref(4, 0).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(ConstructionExecution::new(a, UnitType::Warship, TileRef(0))));
        scheduler.add_execution(Box::new(ConstructionExecution::new(a, UnitType::Warship, water)));
        scheduler.execute_tick(&mut game, &config).unwrap();
        assert_eq!(game.player(a).unwrap().units_owned(UnitType::Warship), 1);
    }

    #[test]
    fn test_nukes_cannot_be_built() {
        let (mut game, config, a, _) = setup();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(ConstructionExecution::new(a, UnitType::AtomBomb, TileRef(0))));
        let report = scheduler.execute_tick(&mut game, &config).unwrap();
        assert_eq!(report.terminated, 1);
        assert_eq!(game.player(a).unwrap().gold(), 10_000_000);
    }

    #[test]
    fn test_upgrade_city() {
        let (mut game, config, a, _) = setup();
        let city = game.build_unit(UnitType::City, a, TileRef(0)).unwrap();
        let gold = game.player(a).unwrap().gold();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(UpgradeStructureExecution::new(a, city)));
        scheduler.execute_tick(&mut game, &config).unwrap();

        assert_eq!(game.unit(city).unwrap().level, 2);
        let cost = config.unit_info(UnitType::City, 1).cost;
        assert_eq!(game.player(a).unwrap().gold(), gold - cost);
    }

    #[test]
    fn test_upgrade_rejects_non_upgradable_and_foreign() {
        let (mut game, config, a, b) = setup();
        let post = game.build_unit(UnitType::DefensePost, a, TileRef(0)).unwrap();
        let foreign = game.build_unit(UnitType::City, b, game.map().tile_ref(3, 0).unwrap()).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(UpgradeStructureExecution::new(a, post)));
        scheduler.add_execution(Box::new(UpgradeStructureExecution::new(a, foreign)));
        scheduler.execute_tick(&mut game, &config).unwrap();
        assert_eq!(game.unit(post).unwrap().level, 1);
        assert_eq!(game.unit(foreign).unwrap().level, 1);
    }
}
