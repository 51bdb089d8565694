use crate::core::error::Result;
use crate::core::types::PlayerId;
use crate::economy::update_player_economy;
use crate::execution::{Execution, TickContext};
use crate::intel::clear_reports_on;

/// Per-player upkeep: economy, traitor timer and elimination
///
/// Scheduled once, when the player first spawns. Runs until the player has
/// no territory left.
#[derive(Debug)]
pub struct PlayerExecution {
    player: PlayerId,
    active: bool,
}

impl PlayerExecution {
    pub fn new(player: PlayerId) -> Self {
        Self { player, active: true }
    }
}

impl Execution for PlayerExecution {
    fn name(&self) -> &'static str {
        "PlayerExecution"
    }

    fn init(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        match ctx.game.player(self.player) {
            Some(p) if p.is_alive() => {}
            _ => {
                tracing::warn!("PlayerExecution: {} is not an active player", self.player);
                self.active = false;
            }
        }
        Ok(())
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) -> Result<()> {
        let player = ctx.game.require_player(self.player)?;
        if !player.is_alive() {
            self.active = false;
            return Ok(());
        }

        if player.tiles_owned() == 0 {
            let name = player.name.clone();
            ctx.game.eliminate_player(self.player)?;
            let cleared = clear_reports_on(ctx.game, self.player);
            tracing::info!(
                "{} ({}) has been eliminated at tick {}; {} intel reports on it cleared",
                name,
                self.player,
                ctx.ticks(),
                cleared
            );
            self.active = false;
            return Ok(());
        }

        update_player_economy(ctx.game, ctx.config, self.player)?;
        ctx.game.require_player_mut(self.player)?.decay_traitor();
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
    use crate::core::types::TileRef;
    use crate::execution::ExecutionScheduler;
    use crate::game::map::{GameMap, Terrain};
    use crate::game::player::{PlayerInfo, PlayerType};
    use crate::game::state::GameState;
    use crate::game::unit::UnitType;
    use crate::intel::{gather_defense_intel, report_on};

    fn setup() -> (GameState, RuleConfig, PlayerId, PlayerId) {
        let config = RuleConfig::default();
        let mut game = GameState::new(GameMap::filled(5, 5, Terrain::Plains).unwrap(), &config);
        let a = game.add_player(PlayerInfo::new("A", PlayerType::Human), &config);
        let b = game.add_player(PlayerInfo::new("B", PlayerType::Human), &config);
        game.conquer(a, TileRef(0)).unwrap();
        game.conquer(b, TileRef(24)).unwrap();
        while game.in_spawn_phase() {
            game.advance_tick();
        }
        (game, config, a, b)
    }

    #[test]
    fn test_economy_runs_each_tick() {
        let (mut game, config, a, _) = setup();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(PlayerExecution::new(a)));
        for _ in 0..10 {
            scheduler.execute_tick(&mut game, &config).unwrap();
        }
        assert!(game.player(a).unwrap().gold() > 0);
        assert_eq!(scheduler.active_len(), 1);
    }

    #[test]
    fn test_traitor_timer_counts_down() {
        let (mut game, config, a, _) = setup();
        game.mark_traitor(a, &config).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(PlayerExecution::new(a)));
        for _ in 0..10 {
            scheduler.execute_tick(&mut game, &config).unwrap();
        }
        assert_eq!(
            game.player(a).unwrap().traitor_ticks_remaining(),
            config.traitor_duration - 10
        );
    }

    #[test]
    fn test_landless_player_is_eliminated() {
        let (mut game, config, a, b) = setup();
        game.build_unit(UnitType::Satellite, b, TileRef(24)).unwrap();
        game.build_unit(UnitType::DefensePost, a, TileRef(0)).unwrap();
        gather_defense_intel(&mut game, b, a);
        assert!(report_on(&game, b, a).is_some());

        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(PlayerExecution::new(a)));
        scheduler.execute_tick(&mut game, &config).unwrap();

        game.conquer(b, TileRef(0)).unwrap();
        let report = scheduler.execute_tick(&mut game, &config).unwrap();

        assert_eq!(report.terminated, 1);
        assert!(!game.player(a).unwrap().is_alive());
        assert_eq!(game.units_of(a).count(), 0);
        assert!(report_on(&game, b, a).is_none());
    }

    #[test]
    fn test_dead_player_not_scheduled() {
        let (mut game, config, a, _) = setup();
        game.eliminate_player(a).unwrap();
        let mut scheduler = ExecutionScheduler::new();
        scheduler.add_execution(Box::new(PlayerExecution::new(a)));
        let report = scheduler.execute_tick(&mut game, &config).unwrap();
        assert_eq!(report.stepped, 0);
    }
}
