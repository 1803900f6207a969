//! Command definitions organized by domain.
//!
//! Commands follow `Domain.methodName` format.
//!
//! # Command Domains
//!
//! | Domain | Commands |
//! |--------|----------|
//! | `Runtime` | Enable, evaluation, property enumeration |
//! | `Debugger` | Enable, pause control, frame evaluation |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::{CallFrameId, RemoteObjectId};

// ============================================================================
// Command Wrapper
// ============================================================================

/// All typed protocol commands organized by domain.
///
/// This enum wraps domain-specific command enums for unified serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    /// Runtime domain commands.
    Runtime(RuntimeCommand),
    /// Debugger domain commands.
    Debugger(DebuggerCommand),
}

impl Command {
    /// Splits the command into its method name and params.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] if serialization fails.
    pub fn into_parts(self) -> Result<(String, Option<Value>)> {
        let mut value = serde_json::to_value(&self)?;

        let method = value
            .get("method")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| Error::invalid_response("command serialized without a method"))?;

        let params = value.get_mut("params").map(Value::take);

        Ok((method, params))
    }
}

impl From<RuntimeCommand> for Command {
    fn from(command: RuntimeCommand) -> Self {
        Self::Runtime(command)
    }
}

impl From<DebuggerCommand> for Command {
    fn from(command: DebuggerCommand) -> Self {
        Self::Debugger(command)
    }
}

// ============================================================================
// Runtime Commands
// ============================================================================

/// Runtime domain commands for evaluation and object inspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum RuntimeCommand {
    /// Enable execution context reporting.
    #[serde(rename = "Runtime.enable")]
    Enable,

    /// Evaluate an expression in the default (or given) context.
    #[serde(rename = "Runtime.evaluate", rename_all = "camelCase")]
    Evaluate {
        /// Expression to evaluate.
        expression: String,
        /// Return the result serialized instead of as a reference.
        return_by_value: bool,
        /// Do not report exceptions to the console.
        silent: bool,
        /// Target execution context.
        #[serde(skip_serializing_if = "Option::is_none")]
        context_id: Option<i64>,
    },

    /// Enumerate properties of a remote object.
    #[serde(rename = "Runtime.getProperties", rename_all = "camelCase")]
    GetProperties {
        /// Object to enumerate.
        object_id: RemoteObjectId,
        /// Only own properties, not the prototype chain.
        own_properties: bool,
        /// Only accessor properties.
        accessor_properties_only: bool,
        /// Generate previews for object values.
        generate_preview: bool,
    },

    /// Resume a target started with `--inspect-brk`.
    #[serde(rename = "Runtime.runIfWaitingForDebugger")]
    RunIfWaitingForDebugger,
}

// ============================================================================
// Debugger Commands
// ============================================================================

/// Debugger domain commands for pause control and frame evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum DebuggerCommand {
    /// Enable debugger events.
    #[serde(rename = "Debugger.enable")]
    Enable,

    /// Disable debugger events.
    #[serde(rename = "Debugger.disable")]
    Disable,

    /// Pause execution at the next statement.
    #[serde(rename = "Debugger.pause")]
    Pause,

    /// Resume execution.
    #[serde(rename = "Debugger.resume")]
    Resume,

    /// Step over the current statement.
    #[serde(rename = "Debugger.stepOver")]
    StepOver,

    /// Step into the current call.
    #[serde(rename = "Debugger.stepInto")]
    StepInto,

    /// Step out of the current function.
    #[serde(rename = "Debugger.stepOut")]
    StepOut,

    /// Evaluate an expression in a paused frame's lexical scope.
    #[serde(rename = "Debugger.evaluateOnCallFrame", rename_all = "camelCase")]
    EvaluateOnCallFrame {
        /// Frame to evaluate in.
        call_frame_id: CallFrameId,
        /// Expression to evaluate.
        expression: String,
        /// Return the result serialized instead of as a reference.
        return_by_value: bool,
        /// Do not report exceptions to the console.
        silent: bool,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_unit_command_has_no_params() {
        let (method, params) = Command::from(DebuggerCommand::Resume)
            .into_parts()
            .expect("split");
        assert_eq!(method, "Debugger.resume");
        assert_eq!(params, None);
    }

    #[test]
    fn test_get_properties_params() {
        let command = Command::from(RuntimeCommand::GetProperties {
            object_id: RemoteObjectId::new("obj-1"),
            own_properties: true,
            accessor_properties_only: false,
            generate_preview: false,
        });

        let (method, params) = command.into_parts().expect("split");
        assert_eq!(method, "Runtime.getProperties");
        assert_eq!(
            params,
            Some(json!({
                "objectId": "obj-1",
                "ownProperties": true,
                "accessorPropertiesOnly": false,
                "generatePreview": false
            }))
        );
    }

    #[test]
    fn test_evaluate_on_call_frame_params() {
        let command = Command::from(DebuggerCommand::EvaluateOnCallFrame {
            call_frame_id: CallFrameId::new("frame-1"),
            expression: "x".to_string(),
            return_by_value: false,
            silent: true,
        });

        let (method, params) = command.into_parts().expect("split");
        assert_eq!(method, "Debugger.evaluateOnCallFrame");
        let params = params.expect("params");
        assert_eq!(params["callFrameId"], "frame-1");
        assert_eq!(params["expression"], "x");
    }

    #[test]
    fn test_evaluate_skips_missing_context() {
        let (_, params) = Command::from(RuntimeCommand::Evaluate {
            expression: "1+1".to_string(),
            return_by_value: false,
            silent: false,
            context_id: None,
        })
        .into_parts()
        .expect("split");

        assert!(params.expect("params").get("contextId").is_none());
    }
}
