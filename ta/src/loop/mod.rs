//! Agent loop
//!
//! Sends the conversation to the model, dispatches the tool calls it asks
//! for, appends their results and repeats until the model answers in plain
//! text or the iteration cap is reached.

mod config;
mod conversation;
mod engine;

pub use config::LoopConfig;
pub use conversation::Conversation;
pub use engine::{AgentLoop, IterationExhausted, LoopOutcome, LoopState};
