//! 实时变更通知
//!
//! # 架构
//!
//! ```text
//! CRUD handler ──▶ ServerState::broadcast_change() ──▶ SubscriptionRegistry::publish()
//!                                                         │
//!                          (table, filter) ──▶ broadcast::Sender<ChangeEvent>
//!                                                         │
//!                                          ┌──────────────┼──────────────┐
//!                                          ▼              ▼              ▼
//!                                     Subscription   Subscription   Subscription
//!                                     (WebSocket)    (WebSocket)    (in-process)
//! ```
//!
//! 同一 (table, filter) 的所有订阅者共享一个通道，按引用计数回收。

mod registry;

pub use registry::{Subscription, SubscriptionKey, SubscriptionRegistry};

/// Default capacity of each per-key broadcast channel
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;
