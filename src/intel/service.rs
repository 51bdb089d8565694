use crate::core::types::PlayerId;
use crate::game::state::GameState;
use crate::intel::report::{IntelAsset, IntelReport};

/// Result of a single gather attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatherOutcome {
    /// The requestor's report on the target was replaced
    Gathered { assets: usize },
    /// The requestor fields no spy or satellite; nothing was written
    NoIntelUnits,
    UnknownPlayer(PlayerId),
    /// Requestor and target are the same player; reports only cover others
    OwnForces,
}

/// Does `player` currently own an active spy or satellite
pub fn has_intel_units(game: &GameState, player: PlayerId) -> bool {
    game.units_of(player).any(|u| u.unit_type.is_intel_unit())
}

/// Replace `requestor`'s report on `target` with a fresh snapshot of the
/// target's active defense-relevant units
///
/// A requestor without intel units leaves its existing report untouched.
pub fn gather_defense_intel(game: &mut GameState, requestor: PlayerId, target: PlayerId) -> GatherOutcome {
    for id in [requestor, target] {
        if !game.has_player(id) {
            tracing::warn!("Intel gather by {} on {}: {} does not exist", requestor, target, id);
            return GatherOutcome::UnknownPlayer(id);
        }
    }
    if requestor == target {
        tracing::warn!("{} tried to gather intel on itself", requestor);
        return GatherOutcome::OwnForces;
    }

    if !has_intel_units(game, requestor) {
        tracing::warn!("{} has no intel units available to gather on {}", requestor, target);
        return GatherOutcome::NoIntelUnits;
    }

    let assets: Vec<IntelAsset> = game
        .units_of(target)
        .filter(|u| u.unit_type.is_defense_relevant())
        .map(|u| IntelAsset {
            tile: u.tile,
            unit_type: u.unit_type,
        })
        .collect();
    let count = assets.len();

    if let Some(player) = game.player_mut(requestor) {
        player.store_intel_report(IntelReport::new(target, assets));
    }
    tracing::debug!("{} gathered intel on {}: {} assets", requestor, target, count);

    GatherOutcome::Gathered { assets: count }
}

/// `requestor`'s latest report on `target`, if it has ever gathered one
pub fn report_on(game: &GameState, requestor: PlayerId, target: PlayerId) -> Option<&IntelReport> {
    game.player(requestor)?.intel_report(target)
}

/// Drop every player's report on `target`, returning how many were removed
///
/// Used once a target is eliminated; reports on live players are never
/// edited in place.
pub fn clear_reports_on(game: &mut GameState, target: PlayerId) -> usize {
    game.players_mut()
        .filter_map(|p| p.forget_intel_on(target))
        .count()
}
