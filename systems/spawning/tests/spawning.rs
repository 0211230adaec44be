use std::time::Duration;

use runebound_core::{
    CombatTuning, Command, ContentTables, EnemyDefinition, EnemyDefinitionId, Event,
    LevelGeometry, LevelId, LevelParameters,
};
use runebound_system_spawning::{Config, Spawning};
use runebound_world::{self as world, query, World};

const LEVEL: LevelId = LevelId::new(1);

fn enemy(id: u32, name: &str, airborne: bool) -> EnemyDefinition {
    EnemyDefinition {
        id: EnemyDefinitionId::new(id),
        level: LEVEL,
        name: name.to_owned(),
        damage: 3,
        health: 8,
        speed: 4.0,
        gold_drop: 10,
        spawn_rate: 0.5,
        airborne,
    }
}

fn content() -> ContentTables {
    let mut foreign = enemy(9, "Golem", false);
    foreign.level = LevelId::new(2);
    ContentTables {
        enemies: vec![
            enemy(0, "Leafer", false),
            enemy(1, "Eagle", true),
            enemy(2, "Mushroom", false),
            foreign,
        ],
        levels: vec![LevelParameters {
            enemy_spawn_delay: 2.0,
            ..LevelParameters::default()
        }],
        ..ContentTables::default()
    }
}

fn started_world() -> World {
    let mut world = World::new(content(), LevelGeometry::default(), CombatTuning::default());
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::StartLevel {
            level: LEVEL,
            first_attempt: true,
        },
        &mut events,
    );
    world
}

/// Drives the world and the spawning system frame by frame, returning every
/// command the system emitted.
fn simulate(seed: u64, frames: usize, mut inspect: impl FnMut(&World)) -> Vec<Command> {
    let mut world = started_world();
    let mut spawning = Spawning::new(Config::new(seed));
    let mut emitted = Vec::new();

    for _ in 0..frames {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );

        let mut commands = Vec::new();
        spawning.handle(
            &events,
            query::level(&world),
            query::max_enemy_count(&world),
            query::content(&world),
            &mut commands,
        );
        for command in &commands {
            world::apply(&mut world, command.clone(), &mut events);
        }
        emitted.extend(commands);
        inspect(&world);
    }

    emitted
}

#[test]
fn first_enemy_gate_spawns_within_budget() {
    let mut world = started_world();
    let mut events = Vec::new();
    for _ in 0..5 {
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(1),
            },
            &mut events,
        );
    }
    assert!(events.contains(&Event::SpawnGateOpened {
        category: runebound_core::SpawnCategory::Enemy,
        budget: 3,
    }));

    let mut spawning = Spawning::new(Config::new(0x5eed));
    let mut commands = Vec::new();
    spawning.handle(
        &events,
        query::level(&world),
        query::max_enemy_count(&world),
        query::content(&world),
        &mut commands,
    );

    let definitions = commands
        .iter()
        .find_map(|command| match command {
            Command::SpawnEnemies { definitions } => Some(definitions.clone()),
            _ => None,
        })
        .expect("enemy gate produces a spawn command");
    assert!((1..=3).contains(&definitions.len()));
    assert!(
        definitions.iter().all(|id| id.get() <= 2),
        "only level 1 enemies are picked"
    );

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let count = query::enemy_count(&world);
    assert!((1..=3).contains(&count));
}

#[test]
fn enemy_count_never_exceeds_budget() {
    let commands = simulate(0xdead_beef, 400, |world| {
        assert!(query::enemy_count(world) <= query::max_enemy_count(world));
        assert!(query::unit_view(world).len() <= 3);
    });
    assert!(commands
        .iter()
        .any(|command| matches!(command, Command::SpawnEnemies { .. })));
}

#[test]
fn npc_gate_picks_a_side() {
    let commands = simulate(11, 40, |_| {});
    assert!(commands
        .iter()
        .any(|command| matches!(command, Command::SpawnNpc { .. })));
}

#[test]
fn identical_seeds_replay_identically() {
    let first = simulate(42, 200, |_| {});
    let second = simulate(42, 200, |_| {});
    assert!(!first.is_empty());
    assert_eq!(first, second);
}
