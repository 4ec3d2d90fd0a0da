//! Change summaries for update entries

use serde_json::{Map, Value};

const MAX_TEXT_LEN: usize = 40;

/// Describe the top-level fields that differ between two records
///
/// Returns `None` when nothing changed.
pub fn summarize_changes(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before), Value::Object(after)) => object_changes(before, after),
        _ if before != after => vec![format!("{} -> {}", show(before), show(after))],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn object_changes(before: &Map<String, Value>, after: &Map<String, Value>) -> Vec<String> {
    let mut changes = Vec::new();

    for (field, old) in before {
        match after.get(field) {
            Some(new) if new != old => {
                changes.push(format!("{}: {} -> {}", field, show(old), show(new)))
            }
            Some(_) => {}
            None => changes.push(format!("{}: {} -> (removed)", field, show(old))),
        }
    }

    for (field, new) in after {
        if !before.contains_key(field) {
            changes.push(format!("{}: (added) -> {}", field, show(new)));
        }
    }

    changes
}

fn show(value: &Value) -> String {
    match value {
        Value::String(s) if s.chars().count() > MAX_TEXT_LEN => {
            let head: String = s.chars().take(MAX_TEXT_LEN - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(fields) => format!("{{{} fields}}", fields.len()),
        other => other.to_string(),
    }
}
