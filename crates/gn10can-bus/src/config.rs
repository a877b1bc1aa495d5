/// Default maximum number of devices on one bus.
pub const DEFAULT_CAPACITY: usize = 16;

/// What happens when a device attaches under a routing key that is already taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Refuse the new registration with `BusError::DuplicateRoutingKey`.
    #[default]
    Reject,
    /// Replace the existing registration; the previous device stops receiving.
    Replace,
}

/// Controls registry behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusConfig {
    /// Maximum number of live registrations.
    pub capacity: usize,
    /// Handling of a second device on an occupied routing key.
    pub duplicate_policy: DuplicatePolicy,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            duplicate_policy: DuplicatePolicy::Reject,
        }
    }
}

impl BusConfig {
    /// Set the registry capacity.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the duplicate routing key policy.
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}
