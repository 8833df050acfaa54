use std::any::{Any, TypeId, type_name};

use flume::Sender;
use log::warn;

/// A value that can live in a [`StateCtx`](crate::StateCtx) slot.
///
/// Every slot is keyed by the concrete type, so a context holds at most one
/// value of each `State` type.
pub trait State: Any + Send + 'static {
    /// Human readable name, used in logs and errors.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        type_name::<Self>()
    }
}

type Mutation = Box<dyn FnOnce(&mut dyn Any) + Send>;

pub(crate) enum Pending {
    Replace(Box<dyn Any + Send>),
    Mutate(Mutation),
}

pub(crate) struct Message {
    pub(crate) id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) pending: Pending,
}

/// Publish side of the store.
///
/// `Updater` is cheap to clone and `Send`, so background tasks hold one and
/// queue changes. Nothing is applied until the owner of the
/// [`StateCtx`](crate::StateCtx) calls `sync`, which keeps every read on the
/// owning thread consistent for the duration of a frame.
#[derive(Debug, Clone)]
pub struct Updater {
    send: Sender<Message>,
}

impl Updater {
    pub(crate) fn new(send: Sender<Message>) -> Self {
        Self { send }
    }

    /// Replace the whole value of a state slot.
    pub fn set<T: State>(&self, state: T) {
        self.push(Message {
            id: TypeId::of::<T>(),
            name: T::name(),
            pending: Pending::Replace(Box::new(state)),
        });
    }

    /// Apply `f` to the current value of a state slot.
    ///
    /// Updates queued from one `Updater` are applied in the order they were sent.
    pub fn update<T: State>(&self, f: impl FnOnce(&mut T) + Send + 'static) {
        let mutate = move |any: &mut dyn Any| {
            if let Some(state) = any.downcast_mut::<T>() {
                f(state);
            }
        };
        self.push(Message {
            id: TypeId::of::<T>(),
            name: T::name(),
            pending: Pending::Mutate(Box::new(mutate)),
        });
    }

    fn push(&self, message: Message) {
        let name = message.name;
        if self.send.send(message).is_err() {
            warn!("State store is gone, dropping update for {name}");
        }
    }
}
