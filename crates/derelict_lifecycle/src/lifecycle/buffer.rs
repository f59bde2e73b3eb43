//! Registration buffer: staging-очередь регистраций
//!
//! Регистрации, сделанные в течение тика (любая фаза, любой код), копятся
//! здесь и ровно один раз за тик переносятся в таблицу наблюдений фазой
//! переноса. Разделение на два буфера гарантирует: новая регистрация не
//! мутирует таблицу, пока та, возможно, сканируется, а initial snapshot
//! флага снимается когда конструирование объекта уже завершено.

use bevy::prelude::*;
use std::any::TypeId;

use crate::components::Enabled;
use crate::lifecycle::hooks::{DisableHandlers, DisableHook, DisableInvoker};
use crate::lifecycle::table::{WatchEntry, WatchTable};
use crate::logger;

/// Отложенная регистрация: цель + связанный с ней invoker.
/// Флаг Enabled здесь НЕ читается: в момент регистрации он ещё не обязан
/// быть осмысленным.
#[derive(Debug, Clone, Copy)]
pub struct PendingWatch {
    pub target: Entity,
    pub invoker: DisableInvoker,
}

/// Staging-буфер. Ёмкость переживает тики: clear() не освобождает память,
/// рост амортизирован удвоением.
#[derive(Resource, Debug, Default)]
pub struct PendingWatches {
    watches: Vec<PendingWatch>,
}

impl PendingWatches {
    /// Ставит регистрацию в очередь. O(1) amortized.
    pub fn register(&mut self, target: Entity, invoker: DisableInvoker) {
        self.watches.push(PendingWatch { target, invoker });
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingWatch> {
        self.watches.iter()
    }

    pub fn len(&self) -> usize {
        self.watches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watches.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.watches.capacity()
    }

    fn clear(&mut self) {
        self.watches.clear();
    }
}

/// System: авто-регистрация новых instance-ов типа T
///
/// Added<T> срабатывает один раз на добавление компонента, это и есть
/// construction-hook. Для instance-ов, созданных до первого прогона системы
/// (до установки плагина), Added тоже сработает — они не теряются.
/// Ставится в FixedPreUpdate строго до drain_to_dispatch.
pub fn stage_added_watchers<T: DisableHook>(
    handlers: Res<DisableHandlers>,
    mut pending: ResMut<PendingWatches>,
    added: Query<Entity, Added<T>>,
) {
    // Система добавляется только вместе с записью в реестре
    let Some(invoker) = handlers.lookup(TypeId::of::<T>()) else {
        return;
    };
    for entity in added.iter() {
        pending.register(entity, invoker);
    }
}

/// System: фаза переноса (ранняя точка тика, один раз за тик)
///
/// Переносит ожидающие регистрации в таблицу наблюдений в порядке
/// регистрации, снимая initial snapshot флага Enabled. Цель, умершая до
/// переноса, молча отбрасывается: по ней не будет ни записи, ни callback.
pub fn drain_to_dispatch(
    mut pending: ResMut<PendingWatches>,
    mut table: ResMut<WatchTable>,
    flags: Query<&Enabled>,
) {
    if pending.is_empty() {
        return;
    }
    let mut dropped = 0usize;
    for watch in pending.iter() {
        match flags.get(watch.target) {
            Ok(flag) => table.push(WatchEntry::new(watch.target, flag.is_active(), watch.invoker)),
            // Уничтожен (или без Enabled) до переноса
            Err(_) => dropped += 1,
        }
    }
    if dropped > 0 {
        logger::log(&format!(
            "drain_to_dispatch: отброшено {} stale-регистраций",
            dropped
        ));
    }
    pending.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop_invoker(_world: &mut World, _entity: Entity) {}

    #[test]
    fn test_register_preserves_order() {
        let mut pending = PendingWatches::default();
        let a = Entity::from_raw(1);
        let b = Entity::from_raw(2);
        let c = Entity::from_raw(3);

        pending.register(a, noop_invoker);
        pending.register(b, noop_invoker);
        pending.register(c, noop_invoker);

        let order: Vec<Entity> = pending.iter().map(|w| w.target).collect();
        assert_eq!(order, vec![a, b, c]);
    }

    #[test]
    fn test_duplicate_registration_not_deduplicated() {
        // Ручной путь регистрации дубликаты не склеивает
        let mut pending = PendingWatches::default();
        let e = Entity::PLACEHOLDER;
        pending.register(e, noop_invoker);
        pending.register(e, noop_invoker);
        assert_eq!(pending.len(), 2);
    }

    #[test]
    fn test_clear_retains_capacity() {
        let mut pending = PendingWatches::default();
        for i in 0..64 {
            pending.register(Entity::from_raw(i), noop_invoker);
        }
        let capacity = pending.capacity();
        pending.clear();

        assert!(pending.is_empty());
        assert_eq!(pending.capacity(), capacity);
    }
}
