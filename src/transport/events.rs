//! Event subscription registry.
//!
//! Maps event method names to ordered subscriber lists, plus a wildcard
//! list that sees every event and a fault list that sees transport
//! faults. Fan-out is synchronous, in arrival order, named subscribers
//! first. A panicking subscriber is caught and logged; the remaining
//! subscribers still receive the message.

// ============================================================================
// Imports
// ============================================================================

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::{trace, warn};

use crate::identifiers::SubscriptionId;
use crate::protocol::Event;

// ============================================================================
// Types
// ============================================================================

/// Event handler callback type.
///
/// Called on the connection's event loop for each matching event.
pub type EventHandler = Arc<dyn Fn(&Event) + Send + Sync>;

/// Fault handler callback type.
pub type FaultHandler = Arc<dyn Fn(&TransportFault) + Send + Sync>;

// ============================================================================
// TransportFault
// ============================================================================

/// Non-request-scoped problem observed on the connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportFault {
    /// An inbound frame could not be parsed. The connection stays open.
    #[error("Malformed frame ({reason}): {text}")]
    MalformedFrame {
        /// Raw frame text.
        text: String,
        /// Why parsing failed.
        reason: String,
    },

    /// An inbound frame of a kind the protocol does not use.
    #[error("Unexpected {kind} frame")]
    UnexpectedFrame {
        /// Frame kind.
        kind: &'static str,
    },

    /// The socket failed; the connection is closing.
    #[error("Socket error: {message}")]
    Socket {
        /// Description of the failure.
        message: String,
    },
}

// ============================================================================
// EventBus
// ============================================================================

/// Publish/subscribe registry owned by one connection.
#[derive(Default)]
pub struct EventBus {
    next_id: AtomicU64,
    named: RwLock<FxHashMap<String, Vec<(SubscriptionId, EventHandler)>>>,
    wildcard: RwLock<Vec<(SubscriptionId, EventHandler)>>,
    faults: RwLock<Vec<(SubscriptionId, FaultHandler)>>,
}

impl EventBus {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    /// Subscribes to events named `method`.
    pub fn on(&self, method: impl Into<String>, handler: EventHandler) -> SubscriptionId {
        let id = self.allocate();
        self.named
            .write()
            .entry(method.into())
            .or_default()
            .push((id, handler));
        id
    }

    /// Subscribes to every event.
    pub fn on_any(&self, handler: EventHandler) -> SubscriptionId {
        let id = self.allocate();
        self.wildcard.write().push((id, handler));
        id
    }

    /// Subscribes to transport faults.
    pub fn on_error(&self, handler: FaultHandler) -> SubscriptionId {
        let id = self.allocate();
        self.faults.write().push((id, handler));
        id
    }

    /// Removes a subscription. Returns `true` if it existed.
    pub fn off(&self, id: SubscriptionId) -> bool {
        {
            let mut named = self.named.write();
            let owner = named.iter_mut().find_map(|(method, handlers)| {
                let pos = handlers.iter().position(|(sid, _)| *sid == id)?;
                handlers.remove(pos);
                Some((method.clone(), handlers.is_empty()))
            });
            if let Some((method, emptied)) = owner {
                if emptied {
                    named.remove(&method);
                }
                return true;
            }
        }

        let mut wildcard = self.wildcard.write();
        if let Some(pos) = wildcard.iter().position(|(sid, _)| *sid == id) {
            wildcard.remove(pos);
            return true;
        }
        drop(wildcard);

        let mut faults = self.faults.write();
        if let Some(pos) = faults.iter().position(|(sid, _)| *sid == id) {
            faults.remove(pos);
            return true;
        }

        false
    }

    /// Returns the number of live subscriptions of every kind.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.named.read().values().map(Vec::len).sum::<usize>()
            + self.wildcard.read().len()
            + self.faults.read().len()
    }

    /// Delivers `event` to its named subscribers, then to wildcard ones.
    ///
    /// Handlers run outside the registry lock, so they may subscribe or
    /// unsubscribe. Returns the number of handlers that completed.
    pub fn publish(&self, event: &Event) -> usize {
        let mut handlers: Vec<EventHandler> = self
            .named
            .read()
            .get(&event.method)
            .map(|list| list.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();
        handlers.extend(self.wildcard.read().iter().map(|(_, h)| Arc::clone(h)));

        trace!(method = %event.method, subscribers = handlers.len(), "Dispatching event");

        let mut delivered = 0;
        for handler in &handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_ok() {
                delivered += 1;
            } else {
                warn!(method = %event.method, "Event handler panicked");
            }
        }
        delivered
    }

    /// Delivers a transport fault to fault subscribers.
    pub fn report(&self, fault: &TransportFault) -> usize {
        let handlers: Vec<FaultHandler> =
            self.faults.read().iter().map(|(_, h)| Arc::clone(h)).collect();

        let mut delivered = 0;
        for handler in &handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(fault))).is_ok() {
                delivered += 1;
            } else {
                warn!(%fault, "Fault handler panicked");
            }
        }
        delivered
    }
}

// ============================================================================
// Tests
// ============================================================================
