//! События диспетчера lifecycle

use bevy::prelude::*;

/// Наблюдаемый объект выключился: переход Enabled true → false пойман сканом,
/// on_disabled уже вызван. При уничтожении объекта событие НЕ испускается.
///
/// Событие наблюдательное: подписчики (логи, UI, статистика) не участвуют
/// в самом dispatch и не могут его отменить.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherDisabled {
    pub entity: Entity,
    /// Номер тика, на скане которого пойман переход
    pub tick: u64,
}
