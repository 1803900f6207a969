//! Scripted transport for resolver tests.

use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::Value;

use crate::error::Result;
use crate::transport::Transport;

type Script = Box<dyn Fn(&str, Option<Value>) -> Result<Value> + Send + Sync>;

/// Answers every request with a closure, optionally delaying replies
/// per `objectId` to force out-of-order completion.
pub(crate) struct ScriptedTransport {
    script: Script,
    delays: FxHashMap<String, Duration>,
    calls: Mutex<Vec<(String, Option<Value>)>>,
}

impl ScriptedTransport {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&str, Option<Value>) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            delays: FxHashMap::default(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Delays replies to requests targeting `object_id`.
    pub fn with_delay(mut self, object_id: &str, delay: Duration) -> Self {
        self.delays.insert(object_id.to_string(), delay);
        self
    }

    /// Requests received so far.
    pub fn calls(&self) -> Vec<(String, Option<Value>)> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, method: &str, params: Option<Value>) -> Result<Value> {
        self.calls.lock().push((method.to_string(), params.clone()));

        let delay = params
            .as_ref()
            .and_then(|p| p.get("objectId"))
            .and_then(Value::as_str)
            .and_then(|id| self.delays.get(id))
            .copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        (self.script)(method, params)
    }
}
