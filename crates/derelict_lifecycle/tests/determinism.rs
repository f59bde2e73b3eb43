//! Property-based тесты детерминизма диспетчера
//!
//! Одинаковый seed → идентичный журнал dispatch-ей (tick, entity)
//! и идентичный snapshot таблицы наблюдений

use bevy::prelude::*;
use derelict_lifecycle::logger;
use derelict_lifecycle::*;
use rand::Rng;

const DRONE_COUNT: usize = 24;

/// Дрон: хук без состояния, журнал собираем по событиям
#[derive(Component, Default)]
#[require(Enabled)]
struct Drone;

impl DisableHook for Drone {
    fn on_disabled(&mut self) {}
}

/// Запускает seeded storm из toggle-ов и возвращает журнал + snapshot
fn run_storm(seed: u64, ticks: u64) -> (Vec<(u64, u32)>, Vec<u8>) {
    let mut app = create_headless_app(seed);
    app.add_plugins(LifecyclePlugin);
    app.register_disable_hook::<Drone>();

    for _ in 0..DRONE_COUNT {
        app.world_mut().spawn(Drone::default());
    }

    let mut journal = Vec::new();
    for _ in 0..ticks {
        toggle_random_drones(&mut app);
        step_simulation(&mut app);
        let events = app
            .world_mut()
            .resource_mut::<Events<WatcherDisabled>>()
            .drain()
            .collect::<Vec<_>>();
        for event in events {
            journal.push((event.tick, event.entity.index()));
        }
    }

    (journal, watch_snapshot(app.world()))
}

/// 1-3 случайных дрона получают toggle флага
fn toggle_random_drones(app: &mut App) {
    let world = app.world_mut();

    let mut query = world.query_filtered::<Entity, With<Drone>>();
    let targets: Vec<Entity> = query.iter(world).collect();

    let picks: Vec<usize> = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        let flips = rng.rng.gen_range(1..=3);
        (0..flips)
            .map(|_| rng.rng.gen_range(0..targets.len()))
            .collect()
    };

    for pick in picks {
        if let Some(mut flag) = world.get_mut::<Enabled>(targets[pick]) {
            let active = flag.is_active();
            flag.set_active(!active);
        }
    }
}

#[test]
fn test_dispatch_journal_identical_three_runs() {
    const SEED: u64 = 42;
    const TICKS: u64 = 300;

    let (journal1, snapshot1) = run_storm(SEED, TICKS);
    let (journal2, snapshot2) = run_storm(SEED, TICKS);
    let (journal3, snapshot3) = run_storm(SEED, TICKS);

    // Storm обязан что-то диспетчеризовать, иначе тест вакуумный
    assert!(!journal1.is_empty());

    assert_eq!(
        journal1, journal2,
        "Dispatch determinism failed: run 1 != run 2"
    );
    assert_eq!(
        journal2, journal3,
        "Dispatch determinism failed: run 2 != run 3"
    );
    assert_eq!(snapshot1, snapshot2, "Watch snapshot diverged: run 1 != run 2");
    assert_eq!(snapshot2, snapshot3, "Watch snapshot diverged: run 2 != run 3");

    logger::log_info(&format!(
        "✓ Dispatch determinism: 3 runs with seed={} are identical",
        SEED
    ));
}

#[test]
fn test_journal_ticks_are_monotonic() {
    let (journal, _) = run_storm(7, 200);

    for pair in journal.windows(2) {
        assert!(
            pair[0].0 <= pair[1].0,
            "Journal ticks must be non-decreasing: {:?}",
            pair
        );
    }
}

#[test]
fn test_different_seeds_diverge() {
    const TICKS: u64 = 300;

    let (journal_a, _) = run_storm(1, TICKS);
    let (journal_b, _) = run_storm(2, TICKS);

    // Совпадение двух 300-тиковых журналов при разных seed — признак
    // сломанного seeding-а
    assert_ne!(journal_a, journal_b);
}
