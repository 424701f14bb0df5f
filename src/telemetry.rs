// src/telemetry.rs

use tracing::info;

/// Emit a named site event with string dimensions as a structured tracing
/// event. The subscriber decides where it goes; nothing here blocks.
pub fn track_event(name: &str, dimensions: &[(&str, &str)]) {
    info!(
        target: "permitwatch::events",
        event = name,
        dimensions = ?dimensions,
        "event"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_event_is_fire_and_forget() {
        // No subscriber installed; must not panic.
        track_event("site_build", &[("pages", "3")]);
    }
}
