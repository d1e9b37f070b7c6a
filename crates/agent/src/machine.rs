//! The agent state machine.
//!
//! A closed set of phases with an explicit transition table:
//!
//! ```text
//! Start → Reasoning → Action → End
//! ```
//!
//! Edges are unconditional — there is no branch on "were there tool calls?"
//! and no loop back from Action to Reasoning. A run therefore executes at
//! most one reasoning step followed by at most one action step; the
//! assistant never gets a second pass to read tool results. That one-shot
//! topology is deliberate: a multi-round loop (Action → Reasoning until no
//! pending tool calls) would be an extension with its own termination
//! condition, not a change this machine makes implicitly.

use std::sync::Arc;

use marketmind_core::error::Error;
use marketmind_core::message::Message;
use marketmind_core::provider::Provider;
use marketmind_core::state::AgentState;
use marketmind_core::tool::ToolRegistry;
use tracing::{debug, info};

use crate::nodes::{ActionNode, ReasoningNode};

/// The phases a run moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Start,
    Reasoning,
    Action,
    End,
}

impl Phase {
    /// The transition table. `End` is terminal.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::Start => Some(Phase::Reasoning),
            Phase::Reasoning => Some(Phase::Action),
            Phase::Action => Some(Phase::End),
            Phase::End => None,
        }
    }
}

/// Drives one run: seeds the state, runs the node bound to each phase,
/// folds its delta through the reducer, and yields the final state at `End`.
///
/// The machine holds no business logic beyond sequencing and merging; the
/// node contracts define everything else. Tool outcomes always fold into
/// the conversation, so a run always reaches `End` unless the provider
/// call itself fails.
pub struct AgentMachine {
    reasoning: ReasoningNode,
    action: ActionNode,
}

impl AgentMachine {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        tools: Arc<ToolRegistry>,
    ) -> Self {
        Self {
            reasoning: ReasoningNode::new(provider, model, temperature, Arc::clone(&tools)),
            action: ActionNode::new(tools),
        }
    }

    /// Set the maximum tokens per LLM response.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.reasoning = self.reasoning.with_max_tokens(max);
        self
    }

    /// Run the machine over a single incoming user message.
    pub async fn run(&self, user_message: Message) -> Result<AgentState, Error> {
        let mut state = AgentState::seeded(user_message);
        let mut phase = Phase::Start;

        info!(messages = state.messages.len(), "Starting agent run");

        while let Some(next) = phase.next() {
            debug!(from = ?phase, to = ?next, "Transition");
            let delta = match next {
                Phase::Reasoning => self.reasoning.run(&state).await?,
                Phase::Action => self.action.run(&state).await,
                Phase::Start | Phase::End => Vec::new(),
            };
            state.apply(delta);
            phase = next;
        }

        info!(messages = state.messages.len(), "Run reached End");
        Ok(state)
    }
}
