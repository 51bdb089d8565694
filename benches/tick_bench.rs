use conquest_core::core::config::RuleConfig;
use conquest_core::core::types::Owner;
use conquest_core::execution::{AttackExecution, SpawnExecution};
use conquest_core::game::map::GameMap;
use conquest_core::game::player::{PlayerInfo, PlayerType};
use conquest_core::simulation::Simulation;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Four players spawned in the corners of a 120x80 map, past the spawn phase
fn contested_game() -> Simulation {
    let map = GameMap::generate_simple(120, 80, 7).unwrap();
    let mut sim = Simulation::new(map, RuleConfig::default()).unwrap();
    let corners = [(10, 10), (110, 10), (10, 70), (110, 70)];
    for (i, &(x, y)) in corners.iter().enumerate() {
        let id = sim.add_player(PlayerInfo::new(format!("P{}", i), PlayerType::Bot));
        let tile = sim.state().map().tile_ref(x, y).unwrap();
        sim.submit(Box::new(SpawnExecution::new(id, tile)));
    }
    sim.run_spawn_phase().unwrap();
    sim
}

fn bench_expansion_tick(c: &mut Criterion) {
    let mut sim = contested_game();
    let players: Vec<_> = sim.state().players().map(|p| p.id).collect();

    c.bench_function("conquest/tick(players=4,map=120x80)", |b| {
        b.iter(|| {
            if sim.ticks() % 50 == 0 {
                for &id in &players {
                    sim.submit(Box::new(AttackExecution::new(id, Owner::TerraNullius, None)));
                }
            }
            black_box(sim.step().unwrap());
        })
    });
}

fn bench_state_hash(c: &mut Criterion) {
    let mut sim = contested_game();
    let id = sim.state().players().map(|p| p.id).next().unwrap();
    sim.submit(Box::new(AttackExecution::new(id, Owner::TerraNullius, None)));
    sim.run(200).unwrap();

    c.bench_function("conquest/state_hash(map=120x80)", |b| {
        b.iter(|| black_box(sim.state_hash()))
    });
}

criterion_group!(benches, bench_expansion_tick, bench_state_hash);
criterion_main!(benches);
