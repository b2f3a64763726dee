//! Subscription registry keyed by (table, filter)

use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use shared::message::{ChangeEvent, ChangeFilter};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Identity of a shared channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionKey {
    pub table: String,
    pub filter: ChangeFilter,
}

impl SubscriptionKey {
    pub fn new(table: impl Into<String>, filter: ChangeFilter) -> Self {
        Self {
            table: table.into(),
            filter,
        }
    }

    fn accepts(&self, event: &ChangeEvent) -> bool {
        self.table == event.table && self.filter.matches(event)
    }
}

#[derive(Debug)]
struct Channel {
    sender: broadcast::Sender<ChangeEvent>,
    subscribers: usize,
}

/// 进程级订阅注册表
///
/// - `subscribe()` 复用已有通道 (引用计数 +1)
/// - `Subscription` drop 时引用计数 -1，归零即移除通道
/// - `publish()` 按表名和过滤条件分发到所有匹配的通道
#[derive(Debug)]
pub struct SubscriptionRegistry {
    channels: DashMap<SubscriptionKey, Channel>,
    capacity: usize,
}

impl SubscriptionRegistry {
    pub fn new(capacity: usize) -> Arc<Self> {
        Arc::new(Self {
            channels: DashMap::new(),
            capacity: capacity.max(1),
        })
    }

    /// Subscribe to changes of `table` matching `filter`
    pub fn subscribe(self: &Arc<Self>, table: &str, filter: ChangeFilter) -> Subscription {
        let key = SubscriptionKey::new(table, filter);
        let receiver = match self.channels.entry(key.clone()) {
            Entry::Occupied(mut entry) => {
                let channel = entry.get_mut();
                channel.subscribers += 1;
                channel.sender.subscribe()
            }
            Entry::Vacant(entry) => {
                let (sender, receiver) = broadcast::channel(self.capacity);
                entry.insert(Channel {
                    sender,
                    subscribers: 1,
                });
                tracing::debug!(table = %key.table, filter = ?key.filter, "Realtime channel opened");
                receiver
            }
        };

        Subscription {
            key,
            receiver,
            registry: Arc::clone(self),
        }
    }

    /// Fan an event out to every matching channel
    ///
    /// Returns the number of receivers the event reached.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let mut delivered = 0;
        for channel in self.channels.iter() {
            if !channel.key().accepts(event) {
                continue;
            }
            // Err only means every receiver is gone; release() will drop the channel
            if let Ok(n) = channel.value().sender.send(event.clone()) {
                delivered += n;
            }
        }
        delivered
    }

    /// Number of distinct (table, filter) channels
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Number of live handles sharing the channel of `(table, filter)`
    pub fn subscriber_count(&self, table: &str, filter: &ChangeFilter) -> usize {
        self.channels
            .get(&SubscriptionKey::new(table, filter.clone()))
            .map(|c| c.subscribers)
            .unwrap_or(0)
    }

    fn release(&self, key: &SubscriptionKey) {
        if let Entry::Occupied(mut entry) = self.channels.entry(key.clone()) {
            let channel = entry.get_mut();
            channel.subscribers = channel.subscribers.saturating_sub(1);
            if channel.subscribers == 0 {
                entry.remove();
                tracing::debug!(table = %key.table, filter = ?key.filter, "Realtime channel closed");
            }
        }
    }
}

/// A live subscription handle
///
/// Dropping the handle unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    key: SubscriptionKey,
    receiver: broadcast::Receiver<ChangeEvent>,
    registry: Arc<SubscriptionRegistry>,
}

impl Subscription {
    pub fn key(&self) -> &SubscriptionKey {
        &self.key
    }

    /// Wait for the next change
    ///
    /// Lagged receivers skip the missed events and keep listening; `None`
    /// means the channel is closed.
    pub async fn recv(&mut self) -> Option<ChangeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(
                        table = %self.key.table,
                        skipped,
                        "Realtime subscriber lagging, events dropped"
                    );
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.registry.release(&self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_key_shares_one_channel() {
        let registry = SubscriptionRegistry::new(16);
        let filter = ChangeFilter::eq("establishment_id", 1);

        let a = registry.subscribe("menu", filter.clone());
        let b = registry.subscribe("menu", filter.clone());
        assert_eq!(registry.channel_count(), 1);
        assert_eq!(registry.subscriber_count("menu", &filter), 2);

        drop(a);
        assert_eq!(registry.subscriber_count("menu", &filter), 1);
        assert_eq!(registry.channel_count(), 1);

        b.unsubscribe();
        assert_eq!(registry.channel_count(), 0);
    }

    #[test]
    fn test_different_filters_get_different_channels() {
        let registry = SubscriptionRegistry::new(16);
        let _a = registry.subscribe("menu", ChangeFilter::eq("establishment_id", 1));
        let _b = registry.subscribe("menu", ChangeFilter::eq("establishment_id", 2));
        let _c = registry.subscribe("product", ChangeFilter::All);
        assert_eq!(registry.channel_count(), 3);
    }

    #[tokio::test]
    async fn test_publish_respects_table_and_filter() {
        let registry = SubscriptionRegistry::new(16);
        let mut mine = registry.subscribe("menu", ChangeFilter::eq("establishment_id", 1));
        let mut all = registry.subscribe("menu", ChangeFilter::All);
        let _other_table = registry.subscribe("stock", ChangeFilter::All);

        let event = ChangeEvent::insert("menu", json!({"id": 9, "establishment_id": 1}));
        assert_eq!(registry.publish(&event), 2);

        assert_eq!(mine.recv().await.unwrap().new.unwrap()["id"], 9);
        assert_eq!(all.recv().await.unwrap().table, "menu");

        let foreign = ChangeEvent::insert("menu", json!({"id": 10, "establishment_id": 2}));
        assert_eq!(registry.publish(&foreign), 1);
    }

    #[tokio::test]
    async fn test_shared_channel_delivers_to_every_handle() {
        let registry = SubscriptionRegistry::new(16);
        let mut a = registry.subscribe("booking", ChangeFilter::All);
        let mut b = registry.subscribe("booking", ChangeFilter::All);

        let event = ChangeEvent::delete("booking", json!({"id": 1}));
        assert_eq!(registry.publish(&event), 2);
        assert_eq!(a.recv().await, Some(event.clone()));
        assert_eq!(b.recv().await, Some(event));
    }
}
