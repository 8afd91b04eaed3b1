// Events that flow from the session feed to the TUI
//
// The feed (demo script or a replayed transcript) delivers these over an
// mpsc channel; the TUI consumes them one at a time. The serde shape
// matches the wire protocol's {topic, data} envelopes, so a transcript
// file is just JSON Lines of SessionEvents.

use crate::text::TagNode;
use serde::{Deserialize, Serialize};

/// One inbound event for the client core.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "topic", content = "data")]
pub enum SessionEvent {
    /// A chunk of output to split into lines and append to scrollback.
    #[serde(rename = "system/display")]
    Display(TagNode),

    /// The player's own input, echoed locally. The TUI wraps it in a
    /// sent-text element before splitting so it renders in the echo color.
    #[serde(rename = "system/echo")]
    Echo(String),

    /// Connection status for the status bar.
    #[serde(rename = "system/connected")]
    Connected,
    #[serde(rename = "system/disconnected")]
    Disconnected,
}

impl SessionEvent {
    /// Plain-text display chunk.
    pub fn display_text(text: impl Into<String>) -> Self {
        SessionEvent::Display(TagNode::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_event_round_trips_through_wire_shape() {
        let event = SessionEvent::Display(TagNode::element(
            "color",
            [("foreground", "red")],
            vec![TagNode::text("hot\n")],
        ));

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""topic":"system/display""#));

        let back: SessionEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn wire_display_with_bare_string_data() {
        let json = r#"{"topic": "system/display", "data": "You see nothing special.\n"}"#;
        let event: SessionEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event, SessionEvent::display_text("You see nothing special.\n"));
    }

    #[test]
    fn status_events_need_no_data() {
        let event: SessionEvent =
            serde_json::from_str(r#"{"topic": "system/connected"}"#).unwrap();
        assert_eq!(event, SessionEvent::Connected);
    }
}
