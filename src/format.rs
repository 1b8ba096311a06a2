//! Rendering of backend results into chat lines
//!
//! Total over every reply shape: recognized tasks get a templated localized
//! line, reported failures get the fixed error line, and anything else
//! (unknown task kinds, payloads with no status) falls back to a raw dump.

use crate::gateway::{BackendTask, TaskKind};
use crate::strings;

/// Render a backend reply as a single display line
#[must_use]
pub fn format_reply(task: &BackendTask) -> String {
    match task.status() {
        // Malformed payload: no status at all, show what arrived
        None => dump(task),
        Some("success") => format_task(task),
        // Reported failure carries no usable task
        Some(_) => strings::PROCESSING_ERROR.to_string(),
    }
}

fn format_task(task: &BackendTask) -> String {
    match task.kind() {
        TaskKind::CallElevator => call_elevator(task),
        TaskKind::CreateTicket => create_ticket(task),
        TaskKind::CheckCamera => with_location("🎥 Показываю камеру", task),
        TaskKind::CheckSnow => with_location("❄️ Проверяю уровень снега", task),
        TaskKind::CheckObstacles => with_location("⚠️ Проверяю препятствия", task),
        TaskKind::SubmitReadings => submit_readings(task),
        TaskKind::PayUtilities => pay_utilities(task),
        TaskKind::Unknown => dump(task),
    }
}

fn call_elevator(task: &BackendTask) -> String {
    let glyph = match task.param_text("direction").as_deref() {
        Some("down") => "⬇️",
        Some("up") => "⬆️",
        _ => "🛗",
    };
    task.param_text("floor").map_or_else(
        || format!("{glyph} Вызываю лифт"),
        |floor| format!("{glyph} Вызываю лифт на {floor} этаж"),
    )
}

fn create_ticket(task: &BackendTask) -> String {
    let glyph = match task.param_text("priority").as_deref() {
        Some("high") => "🔴",
        Some("low") => "🟢",
        _ => "🟡",
    };
    task.param_text("description").map_or_else(
        || format!("{glyph} Создаю заявку в поддержку"),
        |description| format!("{glyph} Создаю заявку: {description}"),
    )
}

fn submit_readings(task: &BackendTask) -> String {
    match (task.param_text("meter_type"), task.param_text("value")) {
        (Some(meter), Some(value)) => format!("📊 Передаю показания ({meter}): {value}"),
        (None, Some(value)) => format!("📊 Передаю показания: {value}"),
        _ => "📊 Передаю показания счётчиков".to_string(),
    }
}

fn pay_utilities(task: &BackendTask) -> String {
    match (task.param_text("service_type"), task.param_text("amount")) {
        (Some(service), Some(amount)) => format!("💳 Оплачиваю {service}: {amount} ₽"),
        (Some(service), None) => format!("💳 Оплачиваю {service}"),
        (None, Some(amount)) => format!("💳 Оплачиваю счета: {amount} ₽"),
        (None, None) => "💳 Оплачиваю коммунальные услуги".to_string(),
    }
}

fn with_location(prefix: &str, task: &BackendTask) -> String {
    task.param_text("location").map_or_else(
        || prefix.to_string(),
        |location| format!("{prefix}: {location}"),
    )
}

fn dump(task: &BackendTask) -> String {
    serde_json::to_string_pretty(task.raw()).unwrap_or_else(|_| task.raw().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(value: serde_json::Value) -> BackendTask {
        BackendTask::from_value(value)
    }

    #[test]
    fn elevator_call_renders_direction_and_floor() {
        let line = format_reply(&task(json!({
            "status": "success",
            "task": "call_elevator",
            "parameters": {"direction": "up", "floor": 5}
        })));
        assert_eq!(line, "⬆️ Вызываю лифт на 5 этаж");
    }

    #[test]
    fn elevator_call_down_with_string_floor() {
        let line = format_reply(&task(json!({
            "status": "success",
            "task": "call_elevator",
            "parameters": {"direction": "down", "floor": "3"}
        })));
        assert_eq!(line, "⬇️ Вызываю лифт на 3 этаж");
    }

    #[test]
    fn elevator_call_without_floor_still_renders() {
        let line = format_reply(&task(json!({
            "status": "success",
            "task": "call_elevator",
            "parameters": {}
        })));
        assert_eq!(line, "🛗 Вызываю лифт");
    }

    #[test]
    fn ticket_shows_priority_glyph_and_description() {
        let line = format_reply(&task(json!({
            "status": "success",
            "task": "create_ticket",
            "parameters": {"priority": "high", "description": "течь трубы в ванной"}
        })));
        assert_eq!(line, "🔴 Создаю заявку: течь трубы в ванной");
    }

    #[test]
    fn camera_line_carries_marker_glyph() {
        let line = format_reply(&task(json!({
            "status": "success",
            "task": "check_camera",
            "parameters": {"location": "второй подъезд"}
        })));
        assert_eq!(line, "🎥 Показываю камеру: второй подъезд");
    }

    #[test]
    fn payment_renders_amount_from_number() {
        let line = format_reply(&task(json!({
            "status": "success",
            "task": "pay_utilities",
            "parameters": {"service_type": "отопление", "amount": 5000}
        })));
        assert_eq!(line, "💳 Оплачиваю отопление: 5000 ₽");
    }

    #[test]
    fn readings_render_with_and_without_meter_type() {
        let full = format_reply(&task(json!({
            "status": "success",
            "task": "submit_readings",
            "parameters": {"meter_type": "вода", "value": "12345"}
        })));
        assert_eq!(full, "📊 Передаю показания (вода): 12345");

        let bare = format_reply(&task(json!({
            "status": "success",
            "task": "submit_readings"
        })));
        assert_eq!(bare, "📊 Передаю показания счётчиков");
    }

    #[test]
    fn error_status_yields_fixed_line() {
        let line = format_reply(&task(json!({"status": "error", "task": "call_elevator"})));
        assert_eq!(line, strings::PROCESSING_ERROR);
    }

    #[test]
    fn unknown_task_falls_back_to_dump() {
        let value = json!({
            "status": "success",
            "task": "order_pizza",
            "parameters": {"size": "large"}
        });
        let line = format_reply(&task(value.clone()));
        assert_eq!(line, serde_json::to_string_pretty(&value).unwrap());
    }

    #[test]
    fn total_over_arbitrary_payloads() {
        for value in [
            json!(null),
            json!("upstream said nothing useful"),
            json!({"status": "success"}),
            json!({"status": "success", "task": 7}),
            json!({"status": "success", "task": "check_snow", "parameters": {"location": 4}}),
        ] {
            // Must not panic for any shape
            let _ = format_reply(&task(value));
        }
    }
}
