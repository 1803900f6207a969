//! Expression evaluation.

use tracing::debug;

use crate::error::{Error, Result};
use crate::identifiers::CallFrameId;
use crate::protocol::{DebuggerCommand, RuntimeCommand};

use super::Inspector;
use super::value::{EvaluationResult, ResolvedValue};

// ============================================================================
// Inspector - Evaluation
// ============================================================================

impl Inspector {
    /// Evaluates `expression` in the lexical scope of a paused frame.
    ///
    /// Uses `frame` when given, otherwise asks the attached
    /// [`FrameSource`](super::FrameSource).
    ///
    /// # Errors
    ///
    /// - [`Error::NoActiveFrame`] if no frame is given or available
    /// - [`Error::Evaluation`] if the expression threw
    /// - any transport error from the underlying request
    ///
    /// # Example
    ///
    /// ```ignore
    /// let value = inspector.evaluate("user.name", Some(&frame_id)).await?;
    /// ```
    pub async fn evaluate(
        &self,
        expression: &str,
        frame: Option<&CallFrameId>,
    ) -> Result<ResolvedValue> {
        let call_frame_id = frame
            .cloned()
            .or_else(|| self.frames.as_ref().and_then(|f| f.current_frame()))
            .ok_or(Error::NoActiveFrame)?;

        debug!(%call_frame_id, expression_len = expression.len(), "Evaluating on call frame");

        let result: EvaluationResult = self
            .send_command(DebuggerCommand::EvaluateOnCallFrame {
                call_frame_id,
                expression: expression.to_string(),
                return_by_value: false,
                silent: true,
            })
            .await?;

        into_value(result)
    }

    /// Evaluates `expression` in the target's default execution context.
    ///
    /// # Errors
    ///
    /// - [`Error::Evaluation`] if the expression threw
    /// - any transport error from the underlying request
    pub async fn evaluate_global(&self, expression: &str) -> Result<ResolvedValue> {
        debug!(expression_len = expression.len(), "Evaluating globally");

        let result: EvaluationResult = self
            .send_command(RuntimeCommand::Evaluate {
                expression: expression.to_string(),
                return_by_value: false,
                silent: true,
                context_id: None,
            })
            .await?;

        into_value(result)
    }
}

fn into_value(result: EvaluationResult) -> Result<ResolvedValue> {
    if let Some(details) = result.exception_details {
        return Err(Error::evaluation(details.description()));
    }
    Ok(result.result.into())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use crate::error::Error;
    use crate::identifiers::CallFrameId;
    use crate::inspector::mock::ScriptedTransport;
    use crate::inspector::{Inspector, ValueKind};

    #[tokio::test]
    async fn test_evaluate_on_frame() {
        let transport = Arc::new(ScriptedTransport::new(|method, params| {
            assert_eq!(method, "Debugger.evaluateOnCallFrame");
            let params = params.expect("params");
            assert_eq!(params["callFrameId"], "frame-1");
            assert_eq!(params["expression"], "x");
            Ok(json!({ "result": { "type": "number", "value": 42, "description": "42" } }))
        }));
        let inspector = Inspector::new(transport.clone());

        let value = inspector
            .evaluate("x", Some(&CallFrameId::new("frame-1")))
            .await
            .expect("evaluate");

        assert_eq!(value.kind(), ValueKind::Number);
        assert_eq!(value.to_json(), json!(42));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_exception_becomes_evaluation_error() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| {
            Ok(json!({
                "result": { "type": "object", "subtype": "error", "objectId": "err-1" },
                "exceptionDetails": {
                    "exceptionId": 1,
                    "text": "Uncaught",
                    "lineNumber": 0,
                    "columnNumber": 0,
                    "exception": {
                        "type": "object",
                        "subtype": "error",
                        "description": "ReferenceError: x is not defined"
                    }
                }
            }))
        }));
        let inspector = Inspector::new(transport);

        let err = inspector
            .evaluate("x", Some(&CallFrameId::new("frame-1")))
            .await
            .expect_err("should fail");

        match err {
            Error::Evaluation { description } => {
                assert_eq!(description, "ReferenceError: x is not defined");
            }
            other => panic!("expected evaluation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_no_frame_fails_without_request() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| Ok(json!({}))));
        let inspector = Inspector::new(transport.clone());

        let err = inspector.evaluate("x", None).await.expect_err("no frame");
        assert!(matches!(err, Error::NoActiveFrame));
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_frame_source_supplies_frame() {
        let transport = Arc::new(ScriptedTransport::new(|_, params| {
            let params = params.expect("params");
            assert_eq!(params["callFrameId"], "paused-top");
            Ok(json!({ "result": { "type": "string", "value": "ok" } }))
        }));
        let inspector = Inspector::new(transport)
            .with_frame_source(Arc::new(|| Some(CallFrameId::new("paused-top"))));

        let value = inspector.evaluate("y", None).await.expect("evaluate");
        assert_eq!(value.to_json(), json!("ok"));
    }

    #[tokio::test]
    async fn test_evaluate_global_uses_runtime() {
        let transport = Arc::new(ScriptedTransport::new(|method, _| {
            assert_eq!(method, "Runtime.evaluate");
            Ok(json!({ "result": { "type": "object", "className": "Window", "objectId": "win" } }))
        }));
        let inspector = Inspector::new(transport);

        let value = inspector.evaluate_global("globalThis").await.expect("evaluate");
        assert!(value.is_remote());
        assert_eq!(value.kind(), ValueKind::Object);
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| Err(Error::Disconnected)));
        let inspector = Inspector::new(transport);

        let err = inspector.evaluate_global("1").await.expect_err("fails");
        assert!(matches!(err, Error::Disconnected));
    }
}
