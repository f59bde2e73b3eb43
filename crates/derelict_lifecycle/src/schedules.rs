//! Счётчик тиков симуляции
//!
//! Один FixedMain-прогон = один tick. Счётчик инкрементируется в FixedFirst,
//! до всех фаз диспетчера, поэтому события внутри тика N помечены N.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Глобальный номер текущего тика (wraparound через wrapping_add)
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickCounter {
    pub tick: u64,
}

/// System: инкремент счётчика (FixedFirst, единственный writer)
pub fn increment_tick_counter(mut counter: ResMut<TickCounter>) {
    counter.tick = counter.tick.wrapping_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_counter_increments() {
        let mut app = App::new();
        app.init_resource::<TickCounter>()
            .add_systems(Update, increment_tick_counter);

        app.update();
        app.update();
        app.update();

        assert_eq!(app.world().resource::<TickCounter>().tick, 3);
    }

    #[test]
    fn test_tick_counter_wraps_without_panic() {
        let mut app = App::new();
        app.insert_resource(TickCounter { tick: u64::MAX })
            .add_systems(Update, increment_tick_counter);

        app.update();

        assert_eq!(app.world().resource::<TickCounter>().tick, 0);
    }
}
