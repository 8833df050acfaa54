use std::any::{Any, TypeId};
use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};

use flume::{Receiver, Sender};
use log::{debug, warn};

use crate::state::{Message, Pending};
use crate::{Error, State, Tasks, Updater};

struct Slot {
    name: &'static str,
    value: Box<dyn Any + Send>,
    revision: u64,
}

struct Subscriber {
    id: TypeId,
    notify: Sender<u64>,
}

/// The owned store.
///
/// Holds one value per registered [`State`] type. Reads borrow the current
/// snapshot; writes go either through [`StateCtx::update`] (owner, applied
/// immediately) or through an [`Updater`] (anyone, applied on
/// [`StateCtx::sync`]). Every applied write bumps the slot revision and
/// notifies subscribers of that slot.
pub struct StateCtx {
    slots: BTreeMap<TypeId, Slot>,

    send: Sender<Message>,
    recv: Receiver<Message>,

    subscribers: Vec<Subscriber>,
    tasks: Tasks,
}

impl Default for StateCtx {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for StateCtx {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCtx")
            .field(
                "slots",
                &self
                    .slots
                    .values()
                    .map(|slot| (slot.name, slot.revision))
                    .collect::<Vec<_>>(),
            )
            .field("pending", &self.recv.len())
            .field("subscribers", &self.subscribers.len())
            .field("tasks", &self.tasks.len())
            .finish()
    }
}

impl StateCtx {
    pub fn new() -> Self {
        let (send, recv) = flume::unbounded();
        Self {
            slots: BTreeMap::new(),
            send,
            recv,
            subscribers: Vec::new(),
            tasks: Tasks::new(),
        }
    }

    /// Register a state slot. Registering the same type twice replaces the value.
    pub fn add_state<T: State>(&mut self, state: T) {
        self.slots.insert(
            TypeId::of::<T>(),
            Slot {
                name: T::name(),
                value: Box::new(state),
                revision: 0,
            },
        );
    }

    pub fn try_state<T: State>(&self) -> Result<&T, Error> {
        self.slots
            .get(&TypeId::of::<T>())
            .and_then(|slot| slot.value.downcast_ref::<T>())
            .ok_or_else(|| Error::state_not_found(T::name(), "try_state"))
    }

    /// Borrow a registered state.
    ///
    /// # Panics
    /// Panics if `T` was never registered with [`StateCtx::add_state`].
    pub fn state<T: State>(&self) -> &T {
        self.try_state::<T>()
            .unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mutate a state in place and notify its subscribers.
    pub fn update<T: State>(&mut self, f: impl FnOnce(&mut T)) {
        let id = TypeId::of::<T>();
        let Some(slot) = self.slots.get_mut(&id) else {
            warn!("Update for unregistered state {}", T::name());
            return;
        };
        if let Some(state) = slot.value.downcast_mut::<T>() {
            f(state);
            slot.revision += 1;
            let revision = slot.revision;
            self.notify(id, revision);
        }
    }

    /// Revision of a state slot; starts at 0 and grows by one per applied write.
    pub fn revision<T: State>(&self) -> Option<u64> {
        self.slots.get(&TypeId::of::<T>()).map(|slot| slot.revision)
    }

    pub fn updater(&self) -> Updater {
        Updater::new(self.send.clone())
    }

    pub fn tasks(&self) -> &Tasks {
        &self.tasks
    }

    /// Receive the new revision every time the `T` slot changes.
    pub fn subscribe<T: State>(&mut self) -> Receiver<u64> {
        let (notify, recv) = flume::unbounded();
        self.subscribers.push(Subscriber {
            id: TypeId::of::<T>(),
            notify,
        });
        recv
    }

    /// Apply every queued update in arrival order. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(Message { id, name, pending }) = self.recv.try_recv() {
            let Some(slot) = self.slots.get_mut(&id) else {
                warn!("Dropping update for unregistered state {name}");
                continue;
            };
            match pending {
                Pending::Replace(value) => slot.value = value,
                Pending::Mutate(mutate) => mutate(slot.value.as_mut()),
            }
            slot.revision += 1;
            let revision = slot.revision;
            debug!("Applied update to {name}, revision {revision}");
            self.notify(id, revision);
            applied += 1;
        }
        applied
    }

    /// Wait for every background task to finish, then apply what they queued.
    pub async fn settle(&mut self) -> usize {
        self.tasks.wait_idle().await;
        self.sync()
    }

    fn notify(&mut self, id: TypeId, revision: u64) {
        self.subscribers
            .retain(|sub| sub.id != id || sub.notify.send(revision).is_ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Counter {
        value: i32,
    }

    impl State for Counter {}

    #[derive(Debug, Default)]
    struct Label(String);

    impl State for Label {}

    #[test]
    fn test_updater_changes_apply_on_sync_in_order() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        let updater = ctx.updater();

        updater.set(Counter { value: 10 });
        updater.update::<Counter>(|c| c.value *= 2);
        updater.update::<Counter>(|c| c.value += 1);

        assert_eq!(ctx.state::<Counter>().value, 0);
        assert_eq!(ctx.sync(), 3);
        assert_eq!(ctx.state::<Counter>().value, 21);
        assert_eq!(ctx.revision::<Counter>(), Some(3));
    }

    #[test]
    fn test_direct_update_bumps_revision() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Label::default());

        ctx.update::<Label>(|l| l.0.push_str("hello"));

        assert_eq!(ctx.state::<Label>().0, "hello");
        assert_eq!(ctx.revision::<Label>(), Some(1));
    }

    #[test]
    fn test_missing_state_reports_error() {
        let ctx = StateCtx::new();
        let err = ctx.try_state::<Counter>().unwrap_err();
        assert!(err.to_string().contains("Counter"));
        assert_eq!(ctx.revision::<Counter>(), None);
    }

    #[test]
    fn test_updates_for_unregistered_states_are_dropped() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        ctx.updater().set(Label("ignored".to_owned()));

        assert_eq!(ctx.sync(), 0);
        assert!(ctx.try_state::<Label>().is_err());
    }

    #[test]
    fn test_subscribers_only_hear_their_slot() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        ctx.add_state(Label::default());
        let counter_changes = ctx.subscribe::<Counter>();

        ctx.update::<Label>(|l| l.0.push('x'));
        ctx.updater().update::<Counter>(|c| c.value = 5);
        ctx.sync();

        assert_eq!(counter_changes.try_iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_dropped_subscribers_are_forgotten() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        drop(ctx.subscribe::<Counter>());

        ctx.update::<Counter>(|c| c.value = 1);

        assert_eq!(ctx.subscribers.len(), 0);
    }

    #[tokio::test]
    async fn test_settle_applies_updates_from_background_tasks() {
        let mut ctx = StateCtx::new();
        ctx.add_state(Counter::default());
        let updater = ctx.updater();

        ctx.tasks().spawn("bump", async move {
            tokio::task::yield_now().await;
            updater.update::<Counter>(|c| c.value += 7);
        });

        assert_eq!(ctx.settle().await, 1);
        assert_eq!(ctx.state::<Counter>().value, 7);
    }
}
