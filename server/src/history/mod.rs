//! Conversation History
//!
//! Per-user rolling message window: a leading system entry followed by
//! user/assistant turns, bounded to `1 + 2N` entries and persisted in Redis
//! with a TTL.

mod store;

pub use store::HistoryStore;

use serde::{Deserialize, Serialize};

/// Role tag on a conversation entry, matching the completion API wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One entry in a conversation history.
///
/// Serializes to the completion API message object, so a stored history is
/// usable as a request `messages` field without conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub content: String,
}

impl ChatEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Trim a history to the bounded window: the leading system entry (when
/// present) plus the most recent `2 * turn_limit` entries.
///
/// Called after appending the user turn and again after appending the
/// assistant turn. Never reorders; an odd boundary may strand a single
/// unmatched entry at the window edge, which the next trim absorbs.
pub fn trim_window(entries: &mut Vec<ChatEntry>, turn_limit: usize) {
    let window = 2 * turn_limit;
    let has_system = entries.first().map(|e| e.role) == Some(ChatRole::System);

    let max_len = if has_system { 1 + window } else { window };
    if entries.len() <= max_len {
        return;
    }

    let keep_from = entries.len() - window;
    if has_system {
        entries.drain(1..keep_from);
    } else {
        entries.drain(..keep_from);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history_with_turns(turns: usize) -> Vec<ChatEntry> {
        let mut entries = vec![ChatEntry::system("prompt")];
        for i in 0..turns {
            entries.push(ChatEntry::user(format!("question {i}")));
            entries.push(ChatEntry::assistant(format!("answer {i}")));
        }
        entries
    }

    #[test]
    fn within_bound_is_untouched() {
        let mut entries = history_with_turns(3);
        let before = entries.clone();
        trim_window(&mut entries, 3);
        assert_eq!(entries, before);
    }

    #[test]
    fn never_exceeds_bound() {
        for turns in 0..12 {
            let mut entries = history_with_turns(turns);
            trim_window(&mut entries, 4);
            assert!(entries.len() <= 1 + 2 * 4, "turns={turns}");
        }
    }

    #[test]
    fn system_entry_stays_first() {
        let mut entries = history_with_turns(10);
        trim_window(&mut entries, 2);
        assert_eq!(entries[0], ChatEntry::system("prompt"));
    }

    #[test]
    fn keeps_most_recent_turns() {
        let mut entries = history_with_turns(5);
        trim_window(&mut entries, 2);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[1], ChatEntry::user("question 3"));
        assert_eq!(entries[4], ChatEntry::assistant("answer 4"));
    }

    #[test]
    fn odd_boundary_strands_one_entry() {
        // user turn appended but not yet answered
        let mut entries = history_with_turns(3);
        entries.push(ChatEntry::user("pending"));
        trim_window(&mut entries, 2);
        assert_eq!(entries.len(), 5);
        // window starts mid-pair: an unmatched assistant entry leads it
        assert_eq!(entries[1], ChatEntry::assistant("answer 1"));
        assert_eq!(entries[4], ChatEntry::user("pending"));
    }

    #[test]
    fn no_system_entry_keeps_last_window() {
        let mut entries = vec![
            ChatEntry::user("a"),
            ChatEntry::assistant("b"),
            ChatEntry::user("c"),
            ChatEntry::assistant("d"),
        ];
        trim_window(&mut entries, 1);
        assert_eq!(
            entries,
            vec![ChatEntry::user("c"), ChatEntry::assistant("d")]
        );
    }

    #[test]
    fn role_names_match_wire_format() {
        let json = serde_json::to_string(&ChatEntry::assistant("hi")).unwrap();
        assert_eq!(json, r#"{"role":"assistant","content":"hi"}"#);
    }
}
