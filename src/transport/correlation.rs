//! Pending request table.
//!
//! Owns id allocation, the map of outstanding requests, and the
//! connected flag. All three live behind one lock so a request can never
//! be registered after the table has been flushed on disconnect.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

use super::ConnectionState;

// ============================================================================
// Types
// ============================================================================

/// Channel settling one request.
pub(crate) type Settlement = oneshot::Sender<Result<Value>>;

/// One outstanding request.
#[derive(Debug)]
pub(crate) struct PendingRequest {
    /// Protocol method, kept for diagnostics.
    pub method: String,
    /// Caller's continuation.
    pub sender: Settlement,
    /// Responses arriving after this instant are rejected as timed out.
    pub deadline: Instant,
    /// Timeout the deadline was derived from.
    pub timeout: Duration,
}

// ============================================================================
// CorrelationTable
// ============================================================================

/// Request/response correlation state for one connection.
#[derive(Debug)]
pub(crate) struct CorrelationTable {
    state: ConnectionState,
    last_id: RequestId,
    pending: FxHashMap<RequestId, PendingRequest>,
    max_pending: usize,
}

impl CorrelationTable {
    /// Creates a connected table.
    pub fn new(max_pending: usize) -> Self {
        Self {
            state: ConnectionState::Connected,
            last_id: RequestId::new(0),
            pending: FxHashMap::default(),
            max_pending,
        }
    }

    /// Returns the connection state.
    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Returns the number of outstanding requests.
    #[inline]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if `id` is outstanding.
    #[inline]
    pub fn contains(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Allocates the next id and registers a pending entry for it.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] once the table has been closed
    /// - [`Error::TooManyPending`] if the limit is reached
    pub fn register(
        &mut self,
        method: &str,
        timeout: Duration,
    ) -> Result<(RequestId, oneshot::Receiver<Result<Value>>)> {
        if self.state == ConnectionState::Disconnected {
            return Err(Error::NotConnected);
        }

        if self.pending.len() >= self.max_pending {
            return Err(Error::TooManyPending {
                pending: self.pending.len(),
                max: self.max_pending,
            });
        }

        let id = self.last_id.next();
        self.last_id = id;

        let (sender, receiver) = oneshot::channel();
        self.pending.insert(
            id,
            PendingRequest {
                method: method.to_string(),
                sender,
                deadline: Instant::now() + timeout,
                timeout,
            },
        );

        trace!(%id, method, "Registered pending request");
        Ok((id, receiver))
    }

    /// Settles the entry for `id` with `outcome`.
    ///
    /// Returns `false` if there is no such entry, or if its deadline has
    /// already passed; in that case the caller receives a timeout and the
    /// outcome is dropped.
    pub fn settle(&mut self, id: RequestId, outcome: Result<Value>) -> bool {
        let Some(entry) = self.pending.remove(&id) else {
            trace!(%id, "Dropping response for unknown request");
            return false;
        };

        if Instant::now() > entry.deadline {
            debug!(%id, method = %entry.method, "Dropping response past deadline");
            let timeout_ms = entry.timeout.as_millis() as u64;
            let _ = entry
                .sender
                .send(Err(Error::request_timeout(id, entry.method, timeout_ms)));
            return false;
        }

        // Receiver gone means the caller was dropped.
        let _ = entry.sender.send(outcome);
        true
    }

    /// Removes the entry for `id` without settling it.
    pub fn remove(&mut self, id: RequestId) -> Option<PendingRequest> {
        self.pending.remove(&id)
    }

    /// Marks the table disconnected and drains every pending entry.
    pub fn close(&mut self) -> Vec<(RequestId, PendingRequest)> {
        self.state = ConnectionState::Disconnected;
        self.pending.drain().collect()
    }
}

// ============================================================================
// PendingGuard
// ============================================================================

/// Removes a pending entry when the waiting caller goes away.
///
/// Held by the future awaiting the response. If that future is dropped
/// before settlement, the entry leaves the table instead of counting
/// against `max_pending` until disconnect. After settlement the removal
/// is a no-op.
pub(crate) struct PendingGuard {
    table: Arc<Mutex<CorrelationTable>>,
    id: RequestId,
}

impl PendingGuard {
    /// Guards the entry for `id` in `table`.
    pub fn new(table: Arc<Mutex<CorrelationTable>>, id: RequestId) -> Self {
        Self { table, id }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if let Some(entry) = self.table.lock().remove(self.id) {
            trace!(id = %self.id, method = %entry.method, "Removed abandoned request");
        }
    }
}

/// Rejects drained entries with [`Error::Disconnected`].
///
/// Returns the number of entries rejected.
pub(crate) fn reject_disconnected(drained: Vec<(RequestId, PendingRequest)>) -> usize {
    let count = drained.len();

    for (id, entry) in drained {
        trace!(%id, method = %entry.method, "Rejecting pending request");
        let _ = entry.sender.send(Err(Error::Disconnected));
    }

    if count > 0 {
        debug!(count, "Failed pending requests on disconnect");
    }
    count
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};

    const LONG: Duration = Duration::from_secs(60);

    #[test]
    fn test_ids_are_strictly_increasing() {
        let mut table = CorrelationTable::new(16);
        let (a, _ra) = table.register("A.a", LONG).expect("register");
        let (b, _rb) = table.register("B.b", LONG).expect("register");
        let (c, _rc) = table.register("C.c", LONG).expect("register");

        assert_eq!(a.get(), 1);
        assert!(a < b && b < c);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_settle_delivers_once() {
        let mut table = CorrelationTable::new(16);
        let (id, mut rx) = table.register("Runtime.evaluate", LONG).expect("register");

        assert!(table.settle(id, Ok(json!({ "ok": true }))));
        assert!(!table.settle(id, Ok(json!({ "ok": false }))));
        assert!(!table.contains(id));

        let outcome = rx.try_recv().expect("settled");
        assert_eq!(assert_ok!(outcome)["ok"], true);
    }

    #[test]
    fn test_settle_unknown_id_is_ignored() {
        let mut table = CorrelationTable::new(16);
        assert!(!table.settle(RequestId::new(99), Ok(Value::Null)));
    }

    #[test]
    fn test_settle_after_deadline_is_dropped() {
        let mut table = CorrelationTable::new(16);
        let (id, mut rx) = table.register("Runtime.evaluate", Duration::ZERO).expect("register");

        std::thread::sleep(Duration::from_millis(2));
        assert!(!table.settle(id, Ok(Value::Null)));
        assert!(!table.contains(id));

        let outcome = rx.try_recv().expect("settled");
        assert!(assert_err!(outcome).is_timeout());
    }

    #[test]
    fn test_limit_is_enforced() {
        let mut table = CorrelationTable::new(2);
        let _a = table.register("A.a", LONG).expect("register");
        let _b = table.register("B.b", LONG).expect("register");

        let err = assert_err!(table.register("C.c", LONG));
        assert!(matches!(err, Error::TooManyPending { pending: 2, max: 2 }));
    }

    #[test]
    fn test_close_rejects_everything_and_blocks_registration() {
        let mut table = CorrelationTable::new(16);
        let mut receivers = Vec::new();
        for _ in 0..3 {
            let (_, rx) = table.register("Debugger.resume", LONG).expect("register");
            receivers.push(rx);
        }

        let rejected = reject_disconnected(table.close());
        assert_eq!(rejected, 3);
        assert_eq!(table.len(), 0);
        assert_eq!(table.state(), ConnectionState::Disconnected);

        for mut rx in receivers {
            let outcome = rx.try_recv().expect("settled");
            assert!(matches!(outcome, Err(Error::Disconnected)));
        }

        assert!(matches!(
            table.register("Runtime.evaluate", LONG),
            Err(Error::NotConnected)
        ));
        assert_eq!(reject_disconnected(table.close()), 0);
    }

    #[test]
    fn test_guard_removes_unsettled_entry() {
        let table = Arc::new(Mutex::new(CorrelationTable::new(1)));
        let (id, _rx) = table.lock().register("Debugger.pause", LONG).expect("register");

        let guard = PendingGuard::new(Arc::clone(&table), id);
        assert!(table.lock().contains(id));
        drop(guard);

        assert_eq!(table.lock().len(), 0);
        assert_ok!(table.lock().register("Debugger.pause", LONG));
    }

    #[test]
    fn test_guard_after_settlement_is_noop() {
        let table = Arc::new(Mutex::new(CorrelationTable::new(16)));
        let (first, mut rx) = table.lock().register("A.a", LONG).expect("register");
        let (second, _rx) = table.lock().register("B.b", LONG).expect("register");

        let guard = PendingGuard::new(Arc::clone(&table), first);
        assert!(table.lock().settle(first, Ok(Value::Null)));
        drop(guard);

        assert!(table.lock().contains(second));
        assert_ok!(rx.try_recv().expect("settled"));
    }
}
