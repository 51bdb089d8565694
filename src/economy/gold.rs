use crate::core::config::RuleConfig;
use crate::core::types::Gold;
use crate::game::player::Player;

/// Gold earned this tick: `floor(gold_rate * workers^gold_exponent)`
pub fn gold_addition(player: &Player, config: &RuleConfig) -> Gold {
    let earned = config.gold_rate * player.workers().powf(config.gold_exponent);
    if earned.is_finite() && earned > 0.0 {
        earned.floor() as Gold
    } else {
        0
    }
}
