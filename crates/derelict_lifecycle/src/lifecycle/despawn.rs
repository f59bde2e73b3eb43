//! Отложенный teardown: PendingDespawn → despawn в конце тика
//!
//! Сырой despawn в Bevy мгновенный, а диспетчеру нужно, чтобы уничтожение,
//! запрошенное в течение тика, вступало в силу только после поздней фазы
//! скана. Gameplay-код помечает entity маркером, reaper в FixedLast его
//! собирает. Так disable и запрос на despawn в одном тике дают ровно один
//! callback, а уплотнение записи происходит на следующем скане.

use bevy::prelude::*;

use crate::logger;

/// Маркер: entity уничтожается в конце текущего тика (FixedLast)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PendingDespawn;

/// System: собирает помеченные entity (FixedLast, после скана)
pub fn apply_pending_despawns(
    mut commands: Commands,
    pending: Query<Entity, With<PendingDespawn>>,
) {
    for entity in pending.iter() {
        logger::log(&format!("teardown: despawn {:?}", entity));
        commands.entity(entity).despawn();
    }
}
