//! DERELICT Lifecycle Core
//!
//! Per-tick диспетчер lifecycle-событий на Bevy 0.16: объект с disable-хуком
//! получает callback "выключен, но не уничтожен" ровно один раз на каждый
//! переход активности true → false и никогда — при despawn.
//!
//! Архитектура: двухфазный double-buffered движок (см. lifecycle/).
//! Staging-очередь регистраций → перенос в таблицу наблюдений со snapshot-ом
//! флага Enabled → скан с уплотнением мёртвых записей и синхронным dispatch.
//! Liveness проверяется отложенно на скане, не в момент регистрации.

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod components;
pub mod lifecycle;
pub mod logger;
pub mod schedules;

// Re-export базовых типов для удобства
pub use components::Enabled;
pub use lifecycle::{
    apply_pending_despawns, drain_to_dispatch, invoke_disable_hook, scan_and_dispatch,
    stage_added_watchers, DisableHandlers, DisableHook, DisableHookAppExt, DisableInvoker,
    LifecyclePlugin, PendingDespawn, PendingWatch, PendingWatches, WatchEntry, WatchTable,
    WatcherDisabled,
};
pub use schedules::{increment_tick_counter, TickCounter};

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    logger::init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

/// Прогоняет ровно один simulation tick (полный FixedMain)
///
/// Для тестов и детерминистичных прогонов: без накопления real-time,
/// один вызов — один тик.
pub fn step_simulation(app: &mut App) {
    app.world_mut().run_schedule(bevy::app::FixedMain);
}

/// Snapshot таблицы наблюдений для сравнения детерминизма
///
/// Порядок записей в таблице детерминирован сам по себе (порядок вставки),
/// сортировка не нужна. Требует установленного LifecyclePlugin.
pub fn watch_snapshot(world: &World) -> Vec<u8> {
    let table = world.resource::<WatchTable>();
    let mut snapshot = Vec::with_capacity(table.len() * 5);
    for entry in table.iter() {
        snapshot.extend_from_slice(&entry.target().index().to_le_bytes());
        snapshot.push(entry.last_active() as u8);
    }
    snapshot
}
