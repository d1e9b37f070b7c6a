//! The marketmind execution core.
//!
//! One run is a pass through a small state machine:
//!
//! 1. **Start** seeds the state with the incoming user message
//! 2. **Reasoning** sends the history plus tool schemas to the LLM and
//!    appends one assistant message (possibly carrying tool-call requests)
//! 3. **Action** resolves and executes each requested tool in order,
//!    appending one tool-result message per request
//! 4. **End** yields the final state to the caller
//!
//! Nodes communicate only through message deltas folded in by the reducer;
//! tool failures become conversation text, provider failures abort the run.

pub mod machine;
pub mod nodes;

pub use machine::{AgentMachine, Phase};
pub use nodes::{ActionNode, ReasoningNode};
