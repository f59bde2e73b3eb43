//! Headless демо DERELICT lifecycle
//!
//! Запускает диспетчер без рендера: флот маяков с disable-хуком, seeded
//! storm из toggle-ов и teardown-ов, сводка по dispatch-ам каждые 100 тиков

use bevy::prelude::*;
use derelict_lifecycle::*;
use rand::Rng;

const BEACON_COUNT: usize = 32;
const STORM_TICKS: u64 = 1000;

/// Маяк: считает свои blackout-ы через disable-хук
#[derive(Component, Default)]
#[require(Enabled)]
struct Beacon {
    blackouts: u32,
}

impl DisableHook for Beacon {
    fn on_disabled(&mut self) {
        self.blackouts += 1;
    }
}

fn main() {
    let seed = 42;
    println!("Starting DERELICT lifecycle demo (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(LifecyclePlugin);
    app.register_disable_hook::<Beacon>();

    for _ in 0..BEACON_COUNT {
        app.world_mut().spawn(Beacon::default());
    }

    let mut dispatched_total = 0usize;
    for tick in 1..=STORM_TICKS {
        storm_step(&mut app);
        step_simulation(&mut app);
        dispatched_total += drain_disabled_events(&mut app);

        if tick % 100 == 0 {
            let world = app.world();
            println!(
                "Tick {}: {} watched, {} pending, {} blackouts total",
                tick,
                world.resource::<WatchTable>().len(),
                world.resource::<PendingWatches>().len(),
                dispatched_total
            );
        }
    }

    println!(
        "Demo complete: {} blackout callbacks over {} ticks",
        dispatched_total, STORM_TICKS
    );
}

/// Один шаг storm-а: случайный маяк получает toggle флага, изредка —
/// пометку на teardown (с заменой, чтобы флот не вымирал)
fn storm_step(app: &mut App) {
    let world = app.world_mut();

    let mut query = world.query_filtered::<Entity, With<Beacon>>();
    let targets: Vec<Entity> = query.iter(world).collect();
    if targets.is_empty() {
        return;
    }

    let (target, roll) = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        let pick = rng.rng.gen_range(0..targets.len());
        let roll: f64 = rng.rng.gen();
        (targets[pick], roll)
    };

    if roll < 0.05 {
        world.entity_mut(target).insert(PendingDespawn);
        world.spawn(Beacon::default());
    } else if let Some(mut flag) = world.get_mut::<Enabled>(target) {
        let active = flag.is_active();
        flag.set_active(!active);
    }
}

fn drain_disabled_events(app: &mut App) -> usize {
    app.world_mut()
        .resource_mut::<Events<WatcherDisabled>>()
        .drain()
        .count()
}
