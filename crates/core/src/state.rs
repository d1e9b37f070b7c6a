//! Shared agent state and its reducer.
//!
//! Nodes never mutate [`AgentState`] directly: each node returns a delta
//! (a sequence of messages) and the state machine folds it in through
//! [`merge`]. The merge is append-only — existing messages are never
//! dropped, reordered, or truncated; insertion order is the sole ordering
//! guarantee. Callers are responsible for not folding the same delta twice;
//! the reducer does not deduplicate.

use crate::message::Message;

/// Append `incoming` after `existing`, preserving relative order within each.
pub fn merge(existing: Vec<Message>, incoming: Vec<Message>) -> Vec<Message> {
    let mut merged = existing;
    merged.extend(incoming);
    merged
}

/// The conversation state for a single run of the state machine.
///
/// Created empty (or seeded with one user message) at run start, lives for
/// exactly one run, and is handed to the caller at the terminal state. Not
/// persisted across runs.
#[derive(Debug, Clone, Default)]
pub struct AgentState {
    /// Ordered messages, append-only through the run.
    pub messages: Vec<Message>,
}

impl AgentState {
    /// Create an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state seeded with a single user message.
    pub fn seeded(user_message: Message) -> Self {
        Self {
            messages: vec![user_message],
        }
    }

    /// Fold a node's output delta into the state via the reducer.
    pub fn apply(&mut self, delta: Vec<Message>) {
        self.messages = merge(std::mem::take(&mut self.messages), delta);
    }

    /// The most recent assistant message, if any.
    pub fn last_assistant(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == crate::message::Role::Assistant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{Message, Role, ToolCallRequest};

    #[test]
    fn merge_appends_in_order() {
        let existing = vec![Message::user("first")];
        let incoming = vec![Message::assistant("second"), Message::assistant("third")];
        let merged = merge(existing, incoming);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged[0].content, "first");
        assert_eq!(merged[1].content, "second");
        assert_eq!(merged[2].content, "third");
    }

    #[test]
    fn merge_one_at_a_time_matches_merge_at_once() {
        let m1 = Message::user("a");
        let m2 = Message::assistant("b");

        let stepped = merge(merge(Vec::new(), vec![m1.clone()]), vec![m2.clone()]);
        let batched = merge(Vec::new(), vec![m1, m2]);

        let ids = |ms: &[Message]| ms.iter().map(|m| m.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&stepped), ids(&batched));
    }

    #[test]
    fn merge_does_not_dedupe_identical_payloads() {
        let result = Message::tool_result("call_1", "output");
        let merged = merge(vec![result.clone()], vec![result]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn apply_folds_delta() {
        let mut state = AgentState::seeded(Message::user("hi"));
        state.apply(vec![Message::assistant("hello")]);
        assert_eq!(state.messages.len(), 2);
        assert_eq!(state.messages[1].role, Role::Assistant);
    }

    #[test]
    fn last_assistant_skips_tool_results() {
        let mut state = AgentState::seeded(Message::user("hi"));
        state.apply(vec![Message::assistant("").with_tool_calls(vec![
            ToolCallRequest::new("c1", "wikipedia", serde_json::json!({"query": "rust"})),
        ])]);
        state.apply(vec![Message::tool_result("c1", "summary text")]);

        let last = state.last_assistant().unwrap();
        assert_eq!(last.tool_calls.len(), 1);
    }
}
