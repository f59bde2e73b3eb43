//! Disable-хуки: типовая регистрация callback-ов
//!
//! Вместо рефлексии тип объявляет callback явно (trait DisableHook), а App
//! регистрирует тип один раз на старте через register_disable_hook::<T>().
//! Invoker для типа вычисляется один раз и живёт в DisableHandlers
//! (TypeId → fn pointer) до конца процесса. Горячий путь регистрации
//! instance-ов после этого не трогает TypeId-карту вообще.

use bevy::ecs::component::Mutable;
use bevy::prelude::*;
use std::any::{type_name, TypeId};
use std::collections::HashMap;

use crate::lifecycle::buffer::{drain_to_dispatch, stage_added_watchers};
use crate::logger;

/// Callback "выключен, но не уничтожен"
///
/// Вызывается сканом синхронно, ровно один раз на каждый наблюдённый переход
/// Enabled true → false. При despawn не вызывается никогда. Порядок вызовов
/// внутри одного скана = порядок попадания в таблицу наблюдений.
pub trait DisableHook: Component<Mutability = Mutable> {
    fn on_disabled(&mut self);
}

/// Invoker, связываемый с целью при регистрации: (invoker, Entity) — это
/// весь payload записи наблюдения, без Box и без аллокаций на вызов
pub type DisableInvoker = fn(&mut World, Entity);

/// Канонический invoker типа T: достаёт компонент цели и зовёт on_disabled.
/// Цель без T (или уже мёртвая) — no-op.
pub fn invoke_disable_hook<T: DisableHook>(world: &mut World, entity: Entity) {
    if let Some(mut hook) = world.get_mut::<T>(entity) {
        hook.on_disabled();
    }
}

/// Реестр disable-хуков процесса: TypeId → invoker
///
/// Заполняется только на старте (register_disable_hook), дальше read-only.
#[derive(Resource, Default)]
pub struct DisableHandlers {
    invokers: HashMap<TypeId, DisableInvoker>,
}

impl DisableHandlers {
    /// Регистрирует invoker для T. false — тип уже был зарегистрирован.
    pub fn insert<T: DisableHook>(&mut self) -> bool {
        use std::collections::hash_map::Entry;
        match self.invokers.entry(TypeId::of::<T>()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(invoke_disable_hook::<T>);
                true
            }
        }
    }

    /// Invoker для типа, если тип объявил хук
    pub fn lookup(&self, type_id: TypeId) -> Option<DisableInvoker> {
        self.invokers.get(&type_id).copied()
    }

    pub fn len(&self) -> usize {
        self.invokers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invokers.is_empty()
    }
}

/// Расширение App: регистрация наблюдаемого типа
pub trait DisableHookAppExt {
    /// Объявляет T наблюдаемым: каждый новый instance T автоматически попадает
    /// в очередь регистраций на ближайшей ранней фазе тика.
    ///
    /// Идемпотентно по типу: повторная регистрация — warning и no-op.
    /// Вызывать после add_plugins(LifecyclePlugin).
    fn register_disable_hook<T: DisableHook>(&mut self) -> &mut Self;
}

impl DisableHookAppExt for App {
    fn register_disable_hook<T: DisableHook>(&mut self) -> &mut Self {
        self.init_resource::<DisableHandlers>();
        let newly_added = self
            .world_mut()
            .resource_mut::<DisableHandlers>()
            .insert::<T>();
        if !newly_added {
            logger::log_warning(&format!(
                "register_disable_hook: {} уже зарегистрирован, пропускаем",
                type_name::<T>()
            ));
            return self;
        }

        // Staging строго до фазы переноса того же тика: instance, замеченный
        // на тике N, переносится в таблицу тем же N (snapshot уже steady-state)
        self.add_systems(
            FixedPreUpdate,
            stage_added_watchers::<T>.before(drain_to_dispatch),
        );
        logger::log_info(&format!("Disable hook зарегистрирован: {}", type_name::<T>()));
        self
    }
}
