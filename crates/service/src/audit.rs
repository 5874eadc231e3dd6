//! Structured audit trail for destructive operations.

use serde::Serialize;
use tracing::info;

/// Emit one `audit` event carrying the row as it was before removal.
pub fn record_delete<T: Serialize>(entity: &str, id: i32, snapshot: &T) {
    let snapshot = serde_json::to_string(snapshot).unwrap_or_else(|e| format!("<unserializable: {}>", e));
    info!(target: "audit", event = "delete", entity, id, snapshot = %snapshot);
}
