//! Lifecycle-диспетчер: callback "выключен, но не уничтожен"
//!
//! Двухфазный double-buffered движок регистрации и dispatch:
//! - регистрации копятся в PendingWatches (staging) в течение тика;
//! - ранняя фаза тика переносит их в WatchTable вместе со snapshot-ом
//!   флага Enabled;
//! - поздняя фаза сканирует таблицу: мёртвые записи уплотняет молча,
//!   на переходах true → false синхронно зовёт on_disabled.
//!
//! Фазы одного тика (FixedMain):
//! 1. FixedFirst      — increment_tick_counter
//! 2. FixedPreUpdate  — stage_added_watchers::<T> (каждый зарегистрированный
//!                      тип), затем drain_to_dispatch
//! 3. FixedUpdate     — gameplay-системы хоста (toggles, PendingDespawn)
//! 4. FixedPostUpdate — scan_and_dispatch
//! 5. FixedLast       — apply_pending_despawns
//!
//! Liveness проверяется только сканом (отложенно), не регистрацией:
//! уничтожение через PendingDespawn на тике N видно скану на тике N+1,
//! поэтому disable того же тика N успевает диспетчеризоваться, а callback
//! на само уничтожение не вызывается никогда.

use bevy::prelude::*;

pub mod buffer;
pub mod despawn;
pub mod events;
pub mod hooks;
pub mod table;

pub use buffer::{drain_to_dispatch, stage_added_watchers, PendingWatch, PendingWatches};
pub use despawn::{apply_pending_despawns, PendingDespawn};
pub use events::WatcherDisabled;
pub use hooks::{
    invoke_disable_hook, DisableHandlers, DisableHook, DisableHookAppExt, DisableInvoker,
};
pub use table::{scan_and_dispatch, WatchEntry, WatchTable};

use crate::schedules::{increment_tick_counter, TickCounter};

/// Plugin диспетчера: ресурсы + фазы в fixed-подрасписаниях
///
/// Добавляется один раз на App. Наблюдаемые типы объявляются отдельно:
/// app.register_disable_hook::<T>() после установки плагина.
pub struct LifecyclePlugin;

impl Plugin for LifecyclePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DisableHandlers>()
            .init_resource::<PendingWatches>()
            .init_resource::<WatchTable>()
            .init_resource::<TickCounter>()
            .add_event::<WatcherDisabled>()
            .add_systems(FixedFirst, increment_tick_counter)
            .add_systems(FixedPreUpdate, drain_to_dispatch)
            .add_systems(FixedPostUpdate, scan_and_dispatch)
            .add_systems(FixedLast, apply_pending_despawns);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_installs_dispatcher_state() {
        let mut app = App::new();
        app.add_plugins(LifecyclePlugin);

        assert!(app.world().contains_resource::<DisableHandlers>());
        assert!(app.world().contains_resource::<PendingWatches>());
        assert!(app.world().contains_resource::<WatchTable>());
        assert!(app.world().contains_resource::<TickCounter>());
        assert!(app
            .world()
            .contains_resource::<Events<WatcherDisabled>>());
    }

    #[test]
    fn test_fresh_dispatcher_is_empty() {
        let mut app = App::new();
        app.add_plugins(LifecyclePlugin);

        assert!(app.world().resource::<PendingWatches>().is_empty());
        assert!(app.world().resource::<WatchTable>().is_empty());
        assert!(app.world().resource::<DisableHandlers>().is_empty());
    }
}
