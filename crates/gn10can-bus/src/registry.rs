use std::collections::HashMap;
use std::rc::Rc;

use gn10can_frame::RoutingKey;
use tracing::debug;

use crate::config::{BusConfig, DuplicatePolicy};
use crate::error::{BusError, Result};
use crate::router::{HandlerRef, WeakHandlerRef};

/// Routing-key keyed table of non-owning handler references.
///
/// Entries whose handler has been dropped are treated as absent: they never
/// count toward capacity, never block a new registration, and are reclaimed
/// as soon as the registry notices them.
pub struct Registry {
    entries: HashMap<RoutingKey, WeakHandlerRef>,
    config: BusConfig,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Create an empty registry with default config.
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// Create an empty registry with explicit config.
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            entries: HashMap::new(),
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Register `handler` under `key`.
    ///
    /// Re-registering the handler already present is a no-op success.
    pub fn insert(&mut self, key: RoutingKey, handler: &HandlerRef) -> Result<()> {
        self.prune();

        if let Some(existing) = self.entries.get(&key) {
            if same_handler(existing, handler) {
                return Ok(());
            }
            return match self.config.duplicate_policy {
                DuplicatePolicy::Reject => {
                    debug!(%key, "routing key already registered, attach rejected");
                    Err(BusError::DuplicateRoutingKey(key))
                }
                DuplicatePolicy::Replace => {
                    debug!(%key, "routing key already registered, replacing");
                    self.entries.insert(key, Rc::downgrade(handler));
                    Ok(())
                }
            };
        }

        if self.entries.len() >= self.config.capacity {
            debug!(%key, capacity = self.config.capacity, "registry full, attach rejected");
            return Err(BusError::RegistryFull {
                capacity: self.config.capacity,
            });
        }

        self.entries.insert(key, Rc::downgrade(handler));
        debug!(%key, registered = self.entries.len(), "device attached");
        Ok(())
    }

    /// Remove the entry under `key` if it belongs to `handler`.
    pub fn remove_handler(&mut self, key: RoutingKey, handler: &HandlerRef) -> bool {
        match self.entries.get(&key) {
            Some(existing) if same_handler(existing, handler) => {
                self.entries.remove(&key);
                debug!(%key, "device detached");
                true
            }
            _ => false,
        }
    }

    /// Remove whatever is registered under `key`.
    pub fn remove(&mut self, key: RoutingKey) -> bool {
        let removed = self.entries.remove(&key).is_some();
        if removed {
            debug!(%key, "routing key detached");
        }
        removed
    }

    /// Live handler registered under `key`.
    ///
    /// A dead entry found here is removed.
    pub fn resolve(&mut self, key: RoutingKey) -> Option<HandlerRef> {
        let weak = self.entries.get(&key)?;
        match weak.upgrade() {
            Some(handler) => Some(handler),
            None => {
                self.entries.remove(&key);
                debug!(%key, "reclaimed registration of dropped device");
                None
            }
        }
    }

    /// True if `handler` is the live entry under `key`.
    pub fn contains_handler(&self, key: RoutingKey, handler: &HandlerRef) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|existing| same_handler(existing, handler))
    }

    /// True if a live handler is registered under `key`.
    pub fn contains_key(&self, key: RoutingKey) -> bool {
        self.entries
            .get(&key)
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.entries
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// True if nothing live is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Routing keys with a live registration, in ascending order.
    pub fn keys(&self) -> Vec<RoutingKey> {
        let mut keys: Vec<RoutingKey> = self
            .entries
            .iter()
            .filter(|(_, weak)| weak.strong_count() > 0)
            .map(|(key, _)| *key)
            .collect();
        keys.sort_unstable();
        keys
    }

    fn prune(&mut self) {
        self.entries.retain(|_, weak| weak.strong_count() > 0);
    }
}

fn same_handler(existing: &WeakHandlerRef, handler: &HandlerRef) -> bool {
    existing
        .upgrade()
        .is_some_and(|live| Rc::ptr_eq(&live, handler))
}
