//! Listing events for the reactive fetch loop

use serde::{Deserialize, Serialize};

/// State changes the listing reacts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ListingEvent {
    /// The viewer moved to another page
    PageChanged {
        page: usize,
    },

    /// A batch was merged into the buffer
    BufferAppended {
        buffered: usize,
        has_more: bool,
    },

    /// A coverage check finished without fetching anything
    CoverageSettled,

    /// A coverage check found the fetch slot taken and was dropped
    FetchDeferred,

    /// A batch fetch failed; the buffer is unchanged
    FetchFailed {
        error: String,
    },

    /// A forced reload finished and the buffer holds fresh records
    ReloadCompleted {
        buffered: usize,
        has_more: bool,
    },

    /// A forced reload failed
    ReloadFailed {
        error: String,
    },
}

impl ListingEvent {
    /// Whether this event should re-run the coverage check
    pub fn triggers_coverage(&self) -> bool {
        matches!(
            self,
            ListingEvent::PageChanged { .. }
                | ListingEvent::BufferAppended { .. }
                | ListingEvent::CoverageSettled
                | ListingEvent::ReloadCompleted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_classification() {
        assert!(ListingEvent::PageChanged { page: 2 }.triggers_coverage());
        assert!(ListingEvent::BufferAppended { buffered: 50, has_more: true }.triggers_coverage());
        assert!(!ListingEvent::FetchFailed { error: "timeout".into() }.triggers_coverage());
        assert!(!ListingEvent::FetchDeferred.triggers_coverage());
        assert!(!ListingEvent::ReloadFailed { error: "503".into() }.triggers_coverage());
    }

    #[test]
    fn test_event_serialization() {
        let event = ListingEvent::PageChanged { page: 3 };
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"type":"page_changed","page":3}"#);

        let back: ListingEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);

        let json = serde_json::to_string(&ListingEvent::CoverageSettled).unwrap();
        assert_eq!(json, r#"{"type":"coverage_settled"}"#);
    }
}
