//! Structured results returned by the AI gateway

use serde_json::{Map, Value};

/// Action kinds the backend can recognize
///
/// Mirrors the fixed task set of the AI service. Anything the backend
/// returns outside this set maps to [`TaskKind::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Call the elevator to a floor
    CallElevator,
    /// Create a support ticket
    CreateTicket,
    /// Show an entrance camera feed
    CheckCamera,
    /// Check snow level on the grounds
    CheckSnow,
    /// Check for obstacles in a passage
    CheckObstacles,
    /// Submit utility meter readings
    SubmitReadings,
    /// Pay a utility bill
    PayUtilities,
    /// Task name not in the recognized set
    Unknown,
}

impl TaskKind {
    /// Map a backend task name onto the closed kind set
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name {
            "call_elevator" => Self::CallElevator,
            "create_ticket" => Self::CreateTicket,
            "check_camera" => Self::CheckCamera,
            "check_snow" => Self::CheckSnow,
            "check_obstacles" => Self::CheckObstacles,
            "submit_readings" => Self::SubmitReadings,
            "pay_utilities" => Self::PayUtilities,
            _ => Self::Unknown,
        }
    }
}

/// A discriminated result from the AI gateway
///
/// Decoded leniently: missing or mistyped fields never fail the decode.
/// The raw JSON value is retained so malformed or unrecognized replies can
/// still be rendered as a dump. Anything other than `status == "success"`
/// must never be treated as a valid task.
#[derive(Debug, Clone)]
pub struct BackendTask {
    status: Option<String>,
    task: Option<String>,
    parameters: Map<String, Value>,
    reasoning: Option<String>,
    raw: Value,
}

impl BackendTask {
    /// Decode a backend reply from its JSON value
    ///
    /// Total: a reply of any shape produces a task, possibly one with no
    /// status (rendered as a raw dump downstream).
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        let status = value
            .get("status")
            .and_then(Value::as_str)
            .map(str::to_string);
        let task = value
            .get("task")
            .and_then(Value::as_str)
            .map(str::to_string);
        let parameters = value
            .get("parameters")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();
        let reasoning = value
            .get("reasoning")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            status,
            task,
            parameters,
            reasoning,
            raw: value,
        }
    }

    /// Wrap a non-JSON reply body
    #[must_use]
    pub fn from_raw_text(body: String) -> Self {
        Self {
            status: None,
            task: None,
            parameters: Map::new(),
            reasoning: None,
            raw: Value::String(body),
        }
    }

    /// Whether the backend reported success
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some("success")
    }

    /// Status string as reported, if any
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Recognized action kind
    #[must_use]
    pub fn kind(&self) -> TaskKind {
        self.task.as_deref().map_or(TaskKind::Unknown, TaskKind::from_name)
    }

    /// Raw parameter value by name
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }

    /// Parameter rendered as display text
    ///
    /// The backend is loose about scalar types (`"floor": 5` vs
    /// `"floor": "5"`), so numbers and booleans render too.
    #[must_use]
    pub fn param_text(&self, key: &str) -> Option<String> {
        match self.parameters.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Model reasoning attached to the reply, if any
    #[must_use]
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// The reply as received, for fallback dumps
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_well_formed_reply() {
        let task = BackendTask::from_value(json!({
            "status": "success",
            "task": "call_elevator",
            "parameters": {"direction": "up", "floor": 5},
            "reasoning": "user asked for the elevator"
        }));

        assert!(task.is_success());
        assert_eq!(task.kind(), TaskKind::CallElevator);
        assert_eq!(task.param_text("floor").as_deref(), Some("5"));
        assert_eq!(task.param_text("direction").as_deref(), Some("up"));
        assert_eq!(task.reasoning(), Some("user asked for the elevator"));
    }

    #[test]
    fn error_status_is_never_success() {
        let task = BackendTask::from_value(json!({"status": "error", "task": "call_elevator"}));
        assert!(!task.is_success());
    }

    #[test]
    fn missing_status_is_never_success() {
        let task = BackendTask::from_value(json!({"task": "call_elevator"}));
        assert!(!task.is_success());
        assert_eq!(task.status(), None);
    }

    #[test]
    fn unrecognized_task_maps_to_unknown() {
        let task = BackendTask::from_value(json!({"status": "success", "task": "order_pizza"}));
        assert_eq!(task.kind(), TaskKind::Unknown);
    }

    #[test]
    fn tolerates_arbitrary_shapes() {
        for value in [
            json!(null),
            json!(42),
            json!("plain string"),
            json!([1, 2, 3]),
            json!({"status": 200}),
            json!({"parameters": "not a map"}),
        ] {
            let task = BackendTask::from_value(value);
            assert!(!task.is_success());
            assert_eq!(task.kind(), TaskKind::Unknown);
        }
    }

    #[test]
    fn numeric_and_string_params_both_render() {
        let task = BackendTask::from_value(json!({
            "status": "success",
            "task": "pay_utilities",
            "parameters": {"amount": 5000, "service_type": "отопление"}
        }));
        assert_eq!(task.param_text("amount").as_deref(), Some("5000"));
        assert_eq!(task.param_text("service_type").as_deref(), Some("отопление"));
        assert_eq!(task.param_text("missing"), None);
    }
}
