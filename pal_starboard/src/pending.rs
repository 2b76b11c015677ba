use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serenity::all::MessageId;

/// How long a self-initiated deletion waits for its gateway event.
pub const PENDING_TTL: Duration = Duration::from_secs(30);

/// Message ids the bot is about to delete itself.
///
/// The delete event that follows is consumed here instead of being handled as
/// a user deletion. Entries that never see their event expire.
pub struct PendingDeletions {
    ttl: Duration,
    ids: Mutex<HashMap<MessageId, Instant>>,
}

impl Default for PendingDeletions {
    fn default() -> Self {
        Self::with_ttl(PENDING_TTL)
    }
}

impl PendingDeletions {
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            ids: Mutex::new(HashMap::new()),
        }
    }

    pub fn mark(&self, message_id: MessageId) {
        let now = Instant::now();
        let mut ids = self.ids.lock();
        ids.retain(|_, added| now.duration_since(*added) < self.ttl);
        ids.insert(message_id, now);
    }

    /// Removes `message_id`, returning whether it was pending and unexpired.
    pub fn take(&self, message_id: MessageId) -> bool {
        let now = Instant::now();
        let mut ids = self.ids.lock();
        match ids.remove(&message_id) {
            Some(added) => now.duration_since(added) < self.ttl,
            None => false,
        }
    }

    /// Splits a batch of deleted ids, consuming the pending ones and returning
    /// the rest.
    pub fn take_unmarked(&self, message_ids: &[MessageId]) -> Vec<MessageId> {
        message_ids
            .iter()
            .copied()
            .filter(|id| !self.take(*id))
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_consumes_once() {
        let pending = PendingDeletions::default();
        pending.mark(MessageId::new(10));

        assert!(pending.take(MessageId::new(10)));
        assert!(!pending.take(MessageId::new(10)));
        assert!(!pending.take(MessageId::new(11)));
    }

    #[test]
    fn expired_entries_are_ignored() {
        let pending = PendingDeletions::with_ttl(Duration::ZERO);
        pending.mark(MessageId::new(10));
        assert!(!pending.take(MessageId::new(10)));
    }

    #[test]
    fn marking_purges_expired_entries() {
        let pending = PendingDeletions::with_ttl(Duration::from_millis(5));
        pending.mark(MessageId::new(1));
        std::thread::sleep(Duration::from_millis(20));
        pending.mark(MessageId::new(2));
        assert_eq!(pending.len(), 1);
    }

    #[test]
    fn bulk_ids_are_handled_independently() {
        let pending = PendingDeletions::default();
        pending.mark(MessageId::new(1));
        pending.mark(MessageId::new(3));

        let rest = pending.take_unmarked(&[
            MessageId::new(1),
            MessageId::new(2),
            MessageId::new(3),
            MessageId::new(4),
        ]);

        assert_eq!(rest, vec![MessageId::new(2), MessageId::new(4)]);
        assert!(pending.is_empty());
    }
}
