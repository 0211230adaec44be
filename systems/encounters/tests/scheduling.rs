use std::time::Duration;

use runebound_core::{
    CombatTuning, Command, ContentTables, EncounterDefinition, EncounterId, EncounterKind, Event,
    LevelGeometry, LevelId, LevelParameters,
};
use runebound_system_encounters::{Config, EncounterAllocation};
use runebound_world::{self as world, query, World};

fn entry(id: u32, kind: EncounterKind, first_encounter: bool) -> EncounterDefinition {
    EncounterDefinition {
        id: EncounterId::new(id),
        level: LevelId::new(1),
        kind,
        first_encounter,
        trigger_band: None,
        payload: None,
    }
}

fn content() -> ContentTables {
    ContentTables {
        encounters: vec![
            entry(0, EncounterKind::Start, true),
            entry(1, EncounterKind::Elementalist, true),
            entry(2, EncounterKind::Saved, true),
            entry(3, EncounterKind::Shopkeeper, true),
        ],
        levels: vec![LevelParameters::default()],
        ..ContentTables::default()
    }
}

fn start_level(world: &mut World, allocator: &mut EncounterAllocation) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::StartLevel {
            level: LevelId::new(1),
            first_attempt: true,
        },
        &mut events,
    );
    let mut commands = Vec::new();
    allocator.handle(&events, query::content(world), &mut commands);
    for command in commands {
        world::apply(world, command, &mut events);
    }
    world::apply(world, Command::EndCutscene, &mut events);
}

#[test]
fn level_start_installs_sorted_schedule() {
    let mut world = World::new(content(), LevelGeometry::default(), CombatTuning::default());
    let mut allocator = EncounterAllocation::new(Config::multi(0xfeed));
    start_level(&mut world, &mut allocator);

    let pending = query::pending_encounters(&world);
    assert_eq!(pending.len(), 3);
    assert!(pending
        .windows(2)
        .all(|pair| pair[0].trigger <= pair[1].trigger));
}

#[test]
fn scheduled_encounters_fire_in_order() {
    let mut world = World::new(content(), LevelGeometry::default(), CombatTuning::default());
    let mut allocator = EncounterAllocation::new(Config::multi(0xfeed));
    start_level(&mut world, &mut allocator);
    let expected: Vec<EncounterKind> = query::pending_encounters(&world)
        .iter()
        .map(|encounter| encounter.kind)
        .collect();

    let mut fired = Vec::new();
    for _ in 0..1_000 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(500),
            },
            &mut events,
        );
        for event in &events {
            if let Event::EncounterStarted { kind, .. } = event {
                fired.push(*kind);
                world::apply(&mut world, Command::EndCutscene, &mut Vec::new());
            }
        }
        if query::pending_encounters(&world).is_empty() {
            break;
        }
    }

    assert_eq!(fired, expected);
}
