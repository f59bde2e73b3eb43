//! Dispatch table: таблица живых наблюдений + скан
//!
//! Скан выполняется один раз за тик на поздней фазе (после gameplay-систем):
//! мёртвые цели уплотняются без вызова callback, переходы Enabled
//! true → false вызывают on_disabled синхронно. Правка списка и его обход
//! не пересекаются: между сканами таблицу пополняет только фаза переноса.

use bevy::prelude::*;

use crate::components::Enabled;
use crate::lifecycle::events::WatcherDisabled;
use crate::lifecycle::hooks::DisableInvoker;
use crate::logger;
use crate::schedules::TickCounter;

/// Живое наблюдение: цель, последнее наблюдённое значение флага, invoker
#[derive(Debug, Clone, Copy)]
pub struct WatchEntry {
    target: Entity,
    last_active: bool,
    invoker: DisableInvoker,
}

impl WatchEntry {
    pub(crate) fn new(target: Entity, last_active: bool, invoker: DisableInvoker) -> Self {
        Self {
            target,
            last_active,
            invoker,
        }
    }

    pub fn target(&self) -> Entity {
        self.target
    }

    /// Значение Enabled на предыдущем скане (или initial snapshot переноса)
    pub fn last_active(&self) -> bool {
        self.last_active
    }
}

/// Таблица наблюдений в порядке вставки
///
/// Публичной мутации нет: append делает только фаза переноса, удаление —
/// только уплотнение скана. Снаружи доступно чтение (len/iter).
#[derive(Resource, Debug, Default)]
pub struct WatchTable {
    entries: Vec<WatchEntry>,
}

impl WatchTable {
    pub(crate) fn push(&mut self, entry: WatchEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WatchEntry> {
        self.entries.iter()
    }
}

/// System: скан таблицы (exclusive — invoker-ам нужен &mut World)
///
/// Один стабильный проход по порядку вставки, O(n) без аллокаций:
/// 1. цель мертва (entity despawned или Enabled снят) — слот выпадает,
///    callback подавлен;
/// 2. флаг изменился — фиксируем новое значение; если новое значение false,
///    синхронно зовём invoker и испускаем WatcherDisabled;
/// 3. выжившие записи сдвигаются к началу, порядок сохраняется.
///
/// Различение disable/destroy отложенное. Despawn, запрошенный в течение
/// тика через PendingDespawn, применяется ПОСЛЕ скана (FixedLast): переход
/// в false того же тика диспетчеризуется пока цель жива, а сама смерть
/// видна скану только на следующем тике. Panic внутри callback не
/// перехватывается и валит тик целиком.
///
/// На время прохода список забирается из ресурса (mem::take): invoker-ы
/// получают &mut World, и обход не должен пересекаться с самим ресурсом.
/// Пока идёт dispatch, таблица снаружи выглядит пустой.
pub fn scan_and_dispatch(world: &mut World) {
    if world.resource::<WatchTable>().is_empty() {
        return;
    }
    let mut entries = std::mem::take(&mut world.resource_mut::<WatchTable>().entries);
    let tick = world.resource::<TickCounter>().tick;

    let mut write = 0usize;
    for read in 0..entries.len() {
        let mut entry = entries[read];

        // Liveness: мёртвая цель уплотняется молча
        let Some(flag) = world.get::<Enabled>(entry.target) else {
            continue;
        };

        let active = flag.is_active();
        if active != entry.last_active {
            entry.last_active = active;
            // Rising edge (false → true) наблюдения не порождает
            if !active {
                (entry.invoker)(world, entry.target);
                world.send_event(WatcherDisabled {
                    entity: entry.target,
                    tick,
                });
                logger::log(&format!(
                    "scan: watcher {:?} выключен на тике {}",
                    entry.target, tick
                ));
            }
        }

        entries[write] = entry;
        write += 1;
    }
    entries.truncate(write);
    // Ёмкость возвращается вместе со списком
    world.resource_mut::<WatchTable>().entries = entries;
}
