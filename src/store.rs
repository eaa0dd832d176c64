//! Store
//!
//! An observable state container. Every change replaces the state wholesale, is persisted (when
//! the store has storage attached), and is then announced to every subscriber.

use std::{fmt, rc::Rc};

use serde::{Serialize, de::DeserializeOwned};
use slotmap::{SlotMap, new_key_type};
use tracing::{debug, warn};

use crate::storage::{Storage, StorageError};

new_key_type! {
    /// Handle returned by [`Store::subscribe`].
    pub struct SubscriptionKey;
}

type Subscriber<S> = Box<dyn FnMut(&S)>;
type Persist<S> = Box<dyn Fn(&S)>;

/// Observable state container.
pub struct Store<S> {
    state: S,
    subscribers: SlotMap<SubscriptionKey, Subscriber<S>>,
    persist: Option<Persist<S>>,
}

impl<S: fmt::Debug> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscribers", &self.subscribers.len())
            .field("persisted", &self.persist.is_some())
            .finish()
    }
}

impl<S: Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> Store<S> {
    /// Store holding `state`, without persistence.
    pub fn new(state: S) -> Self {
        Self {
            state,
            subscribers: SlotMap::with_key(),
            persist: None,
        }
    }

    /// Current state.
    pub fn get(&self) -> &S {
        &self.state
    }

    /// Replace the state, persist it, then notify subscribers.
    pub fn set(&mut self, state: S) {
        self.state = state;

        if let Some(persist) = &self.persist {
            persist(&self.state);
        }

        for subscriber in self.subscribers.values_mut() {
            subscriber(&self.state);
        }
    }

    /// Register a callback run after every change.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&S) + 'static) -> SubscriptionKey {
        self.subscribers.insert(Box::new(subscriber))
    }

    /// Remove a callback. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.subscribers.remove(key).is_some()
    }
}

impl<S: Clone> Store<S> {
    /// Apply `change` to a copy of the state and commit the copy.
    pub fn update<T>(&mut self, change: impl FnOnce(&mut S) -> T) -> T {
        let mut next = self.state.clone();
        let out = change(&mut next);

        self.set(next);

        out
    }

    /// Like [`Store::update`], but nothing is committed if `change` fails.
    ///
    /// # Errors
    ///
    /// Returns whatever error `change` returns.
    pub fn try_update<T, E>(
        &mut self,
        change: impl FnOnce(&mut S) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut next = self.state.clone();
        let out = change(&mut next)?;

        self.set(next);

        Ok(out)
    }
}

impl<S> Store<S>
where
    S: Serialize + DeserializeOwned + Default + 'static,
{
    /// Store persisted under `key`, rehydrated from whatever is already stored there.
    ///
    /// Missing, unreadable, or malformed data starts the store from the default state. Write
    /// failures are logged and otherwise ignored; the in-memory state stays authoritative.
    pub fn persisted(storage: Rc<dyn Storage>, key: &'static str) -> Self {
        let state = match load(storage.as_ref(), key) {
            Ok(Some(state)) => {
                debug!(key, "rehydrated store");
                state
            }
            Ok(None) => S::default(),
            Err(error) => {
                warn!(key, %error, "discarding unusable persisted state");
                S::default()
            }
        };

        let persist: Persist<S> = Box::new(move |state: &S| {
            if let Err(error) = save(storage.as_ref(), key, state) {
                warn!(key, %error, "failed to persist store");
            }
        });

        Self {
            state,
            subscribers: SlotMap::with_key(),
            persist: Some(persist),
        }
    }
}

fn load<S: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Result<Option<S>, StorageError> {
    let Some(raw) = storage.read(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Json {
            key: key.to_string(),
            source,
        })
}

fn save<S: Serialize>(storage: &dyn Storage, key: &str, state: &S) -> Result<(), StorageError> {
    let json = serde_json::to_string(state).map_err(|source| StorageError::Json {
        key: key.to_string(),
        source,
    })?;

    storage.write(key, &json)
}
