//! Базовые компоненты симуляции
//!
//! Enabled — структурированный флаг активности объекта. Диспетчер lifecycle
//! (см. lifecycle/) читает его на фазах переноса и скана, сам флаг дёргает
//! gameplay-код хоста.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Флаг активности: true — объект работает, false — выключен (но жив)
///
/// Контракт хоста: пока entity жив, компонент присутствует. Снятие Enabled
/// с живого entity диспетчер прочитает как уничтожение (см. lifecycle/table.rs).
/// Промежуточные переключения между сканами не наблюдаемы.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct Enabled(pub bool);

impl Default for Enabled {
    fn default() -> Self {
        Self(true)
    }
}

impl Enabled {
    pub fn is_active(&self) -> bool {
        self.0
    }

    pub fn enable(&mut self) {
        self.0 = true;
    }

    pub fn disable(&mut self) {
        self.0 = false;
    }

    pub fn set_active(&mut self, active: bool) {
        self.0 = active;
    }
}
