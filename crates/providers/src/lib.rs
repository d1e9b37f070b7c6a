//! LLM provider implementations for marketmind.
//!
//! All providers implement the `marketmind_core::Provider` trait. The only
//! backend shipped here is the OpenAI-compatible chat-completions client,
//! which covers OpenAI itself plus any endpoint speaking the same protocol.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
