//! Headless conquest simulation
//!
//! Plays a scripted game on a generated map and prints the final standings.
//! With `--replays N` the same game is played N times in parallel and the
//! final state hashes are compared.

use clap::Parser;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use conquest_core::core::config::RuleConfig;
use conquest_core::core::error::Result;
use conquest_core::core::rng::PseudoRandom;
use conquest_core::core::types::{Owner, PlayerId, TileRef};
use conquest_core::execution::{
    AttackExecution, ConstructionExecution, GatherDefenseIntelExecution, SpawnExecution,
};
use conquest_core::game::map::GameMap;
use conquest_core::game::player::{PlayerInfo, PlayerType};
use conquest_core::game::unit::UnitType;
use conquest_core::simulation::{Simulation, SimulationSummary};

/// Conquest Sim - deterministic headless game runner
#[derive(Parser, Debug, Clone)]
#[command(name = "conquest_sim")]
#[command(about = "Run a scripted territory conquest game without a client")]
struct Args {
    /// Seed for map generation and spawn placement
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Ticks to simulate after the spawn phase
    #[arg(long, default_value_t = 2000)]
    ticks: u64,

    #[arg(long, default_value_t = 80)]
    width: u32,

    #[arg(long, default_value_t = 60)]
    height: u32,

    #[arg(long, default_value_t = 4)]
    players: u32,

    /// Identical games to run in parallel; all must end in the same state
    #[arg(long, default_value_t = 1)]
    replays: usize,

    /// TOML file overriding the default rules
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Print the final summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

/// Ticks between rounds of scripted orders
const ORDER_INTERVAL: u64 = 50;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("conquest_core=info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.rules {
        Some(path) => RuleConfig::load_from_toml(path)?,
        None => RuleConfig::default(),
    };

    let start = Instant::now();
    let summaries: Vec<SimulationSummary> = (0..args.replays.max(1))
        .into_par_iter()
        .map(|_| play(&args, &config))
        .collect::<Result<Vec<_>>>()?;
    let elapsed = start.elapsed();

    let hashes: BTreeSet<u64> = summaries.iter().map(|s| s.state_hash).collect();
    if hashes.len() > 1 {
        tracing::error!("Replays diverged: {} distinct final states", hashes.len());
        std::process::exit(1);
    }

    let Some(summary) = summaries.first() else {
        return Ok(());
    };
    if args.json {
        println!("{}", summary.to_json()?);
        return Ok(());
    }

    println!("=== CONQUEST SIM ===");
    println!(
        "{} replay(s) of {} ticks in {:.2}ms, state hash {:016x}",
        summaries.len(),
        summary.tick,
        elapsed.as_secs_f64() * 1000.0,
        summary.state_hash
    );
    println!("Fallout: {:.1}% of land, {} live units", summary.fallout_ratio * 100.0, summary.live_units);
    println!();
    for (rank, p) in summary.standings().iter().enumerate() {
        println!(
            "{:>2}. {:<12} tiles {:>5}  troops {:>9.0}  pop {:>9.0}  gold {:>9}{}",
            rank + 1,
            p.name,
            p.tiles,
            p.troops,
            p.population,
            p.gold,
            if p.traitor { "  (traitor)" } else { "" }
        );
    }
    let fallen: Vec<&str> = summary
        .players
        .iter()
        .filter(|p| !p.alive)
        .map(|p| p.name.as_str())
        .collect();
    if !fallen.is_empty() {
        println!("Eliminated: {}", fallen.join(", "));
    }
    Ok(())
}

fn play(args: &Args, config: &RuleConfig) -> Result<SimulationSummary> {
    let map = GameMap::generate_simple(args.width, args.height, args.seed)?;
    let mut sim = Simulation::new(map, config.clone())?;
    let mut random = PseudoRandom::new(args.seed);

    for i in 0..args.players {
        let player_type = match i {
            0 => PlayerType::Human,
            i if i % 2 == 1 => PlayerType::FakeHuman,
            _ => PlayerType::Bot,
        };
        let id = sim.add_player(PlayerInfo::new(format!("Nation {}", i + 1), player_type));
        match pick_spawn(&sim, &mut random) {
            Some(tile) => sim.submit(Box::new(SpawnExecution::new(id, tile))),
            None => tracing::warn!("No free land left to spawn {}", id),
        }
    }

    sim.run_spawn_phase()?;
    let end = sim.ticks() + args.ticks;
    while sim.ticks() < end {
        if sim.ticks() % ORDER_INTERVAL == 0 {
            issue_orders(&mut sim);
        }
        sim.step()?;
    }

    Ok(sim.summary())
}

/// A random unowned land tile, if one turns up within a bounded number of draws
fn pick_spawn(sim: &Simulation, random: &mut PseudoRandom) -> Option<TileRef> {
    let map = sim.state().map();
    for _ in 0..1000 {
        let tile = TileRef(random.next_in_range(0, map.num_tiles() as u32));
        if map.is_land(tile) && sim.state().owner(tile).ok() == Some(Owner::TerraNullius) {
            return Some(tile);
        }
    }
    None
}

/// Everyone the player's territory touches, in a stable order
fn neighbours_of(sim: &Simulation, player: PlayerId) -> BTreeSet<Owner> {
    let state = sim.state();
    let mut found = BTreeSet::new();
    for tile in state.tiles_owned_by(Owner::Player(player)) {
        for n in state.map().neighbors(tile) {
            if !state.map().is_land(n) {
                continue;
            }
            match state.owner(n) {
                Ok(owner) if owner != Owner::Player(player) => {
                    found.insert(owner);
                }
                _ => {}
            }
        }
    }
    found
}

/// Simple scripted play: expand into free land, then attack the weakest
/// neighbour; spend gold on cities and defense; spy on the leader
fn issue_orders(sim: &mut Simulation) {
    let alive: Vec<PlayerId> = sim
        .state()
        .players()
        .filter(|p| p.is_alive() && p.tiles_owned() > 0)
        .map(|p| p.id)
        .collect();

    let leader = sim
        .state()
        .players()
        .filter(|p| p.is_alive())
        .max_by(|a, b| a.tiles_owned().cmp(&b.tiles_owned()).then(b.id.cmp(&a.id)))
        .map(|p| p.id);

    for id in alive {
        let borders = neighbours_of(sim, id);
        let target = if borders.contains(&Owner::TerraNullius) {
            Some(Owner::TerraNullius)
        } else {
            borders
                .iter()
                .filter_map(|o| o.player())
                .filter_map(|p| sim.state().player(p))
                .min_by(|a, b| a.troops().total_cmp(&b.troops()).then(a.id.cmp(&b.id)))
                .map(|p| Owner::Player(p.id))
        };
        if let Some(target) = target {
            sim.submit(Box::new(AttackExecution::new(id, target, None)));
        }

        let Some(player) = sim.state().player(id) else {
            continue;
        };
        let gold = player.gold();
        let cities = player.units_owned(UnitType::City);
        let posts = player.units_owned(UnitType::DefensePost);
        let spies = player.units_owned(UnitType::Spy);

        let home = sim.state().tiles_owned_by(Owner::Player(id));
        let (Some(&site), Some(&edge)) = (home.get(home.len() / 2), home.last()) else {
            continue;
        };

        let city_cost = sim.config().unit_info(UnitType::City, cities).cost;
        let post_cost = sim.config().unit_info(UnitType::DefensePost, posts).cost;
        let spy_cost = sim.config().unit_info(UnitType::Spy, spies).cost;
        if gold >= city_cost {
            sim.submit(Box::new(ConstructionExecution::new(id, UnitType::City, site)));
        } else if gold >= post_cost && !borders.is_empty() {
            sim.submit(Box::new(ConstructionExecution::new(id, UnitType::DefensePost, edge)));
        }

        let Some(leader) = leader.filter(|&l| l != id) else {
            continue;
        };
        if spies == 0 && gold >= city_cost + spy_cost {
            let spot = sim.state().tiles_owned_by(Owner::Player(leader)).first().copied();
            if let Some(spot) = spot {
                sim.submit(Box::new(ConstructionExecution::new(id, UnitType::Spy, spot)));
            }
        } else if spies > 0 {
            sim.submit(Box::new(GatherDefenseIntelExecution::new(id, leader)));
        }
    }
}
