use std::sync::{Arc, Weak};

use dashmap::DashMap;
use serenity::all::GuildId;
use tokio::sync::Mutex;

/// One async mutex per guild, only alive while someone holds it.
#[derive(Default)]
pub struct GuildLocks {
    locks: DashMap<GuildId, Weak<Mutex<()>>>,
}

impl GuildLocks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the guild's lock, creating it if nobody holds one.
    pub fn lock_for(&self, guild_id: GuildId) -> Arc<Mutex<()>> {
        let created = {
            let mut entry = self.locks.entry(guild_id).or_default();
            if let Some(lock) = entry.upgrade() {
                return lock;
            }

            let lock = Arc::new(Mutex::new(()));
            *entry = Arc::downgrade(&lock);
            lock
        };

        // the entry guard has to be gone before retain touches the shard.
        self.prune();
        created
    }

    /// Drops entries whose lock is no longer referenced.
    pub fn prune(&self) {
        self.locks.retain(|_, lock| lock.strong_count() > 0);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
