//! AgentLoop - model call, tool dispatch, repeat

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::llm::{CompletionRequest, LlmClient, LlmError, Message, TokenUsage, ToolCall, ToolDefinition};
use crate::tools::{ToolContext, ToolRegistry};

use super::{Conversation, LoopConfig};

/// Where the loop is
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    /// Next step calls the model
    AwaitingModel,
    /// Next step runs these calls, in order
    DispatchingTools(Vec<ToolCall>),
    /// Terminal: the model answered without calling tools
    Done { answer: String },
    /// Terminal: the iteration cap was reached first
    Exhausted,
}

impl LoopState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoopState::Done { .. } | LoopState::Exhausted)
    }
}

/// How a finished run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopOutcome {
    Done { answer: String, iterations: u32 },
    Exhausted { iterations: u32 },
}

/// The iteration cap was reached without a final answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No final answer after {iterations} iterations (max-iterations reached)")]
pub struct IterationExhausted {
    pub iterations: u32,
}

impl LoopOutcome {
    pub fn iterations(&self) -> u32 {
        match self {
            LoopOutcome::Done { iterations, .. } | LoopOutcome::Exhausted { iterations } => *iterations,
        }
    }

    pub fn answer(&self) -> Option<&str> {
        match self {
            LoopOutcome::Done { answer, .. } => Some(answer),
            LoopOutcome::Exhausted { .. } => None,
        }
    }

    /// The final answer; exhaustion is a failure, never an empty success
    pub fn into_answer(self) -> Result<String, IterationExhausted> {
        match self {
            LoopOutcome::Done { answer, .. } => Ok(answer),
            LoopOutcome::Exhausted { iterations } => Err(IterationExhausted { iterations }),
        }
    }
}

/// Drives one session's conversation to a terminal state
pub struct AgentLoop {
    config: LoopConfig,
    llm: Arc<dyn LlmClient>,
    registry: ToolRegistry,
    ctx: ToolContext,
    tools: Vec<ToolDefinition>,
    conversation: Conversation,
    state: LoopState,
    iterations: u32,
    usage: Option<TokenUsage>,
}

impl AgentLoop {
    /// Create a loop positioned before its first model call
    pub fn new(
        config: LoopConfig,
        llm: Arc<dyn LlmClient>,
        registry: ToolRegistry,
        ctx: ToolContext,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        let conversation = Conversation::new(system_prompt, user_prompt);
        debug!(max_iterations = config.max_iterations, root = ?ctx.root(), "AgentLoop::new: called");
        let tools = registry.definitions();
        Self {
            config,
            llm,
            registry,
            ctx,
            tools,
            conversation,
            state: LoopState::AwaitingModel,
            iterations: 0,
            usage: None,
        }
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Model calls made so far
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Usage summed over every call that reported it
    pub fn usage(&self) -> Option<TokenUsage> {
        self.usage
    }

    /// Advance by one transition
    ///
    /// Terminal states are left untouched, so calling this after `Done` or
    /// `Exhausted` never reaches the model again.
    pub async fn step(&mut self) -> Result<&LoopState, LlmError> {
        match std::mem::replace(&mut self.state, LoopState::AwaitingModel) {
            LoopState::AwaitingModel => {
                self.state = self.call_model().await?;
            }
            LoopState::DispatchingTools(calls) => {
                self.dispatch(&calls).await;
                self.state = LoopState::AwaitingModel;
            }
            terminal => {
                debug!(?terminal, "AgentLoop::step: already terminal");
                self.state = terminal;
            }
        }
        Ok(&self.state)
    }

    /// Step until a terminal state
    pub async fn run(&mut self) -> Result<LoopOutcome, LlmError> {
        if self.config.verbose {
            if let Some(prompt) = self.conversation.messages().first().and_then(|m| m.content.as_text()) {
                println!("User prompt: {}", prompt);
            }
        }

        while !self.step().await?.is_terminal() {}

        if let LoopState::Done { answer } = &self.state {
            info!(iterations = self.iterations, "Agent loop finished with an answer");
            Ok(LoopOutcome::Done {
                answer: answer.clone(),
                iterations: self.iterations,
            })
        } else {
            warn!(iterations = self.iterations, "Agent loop exhausted its iteration cap");
            Ok(LoopOutcome::Exhausted {
                iterations: self.iterations,
            })
        }
    }

    async fn call_model(&mut self) -> Result<LoopState, LlmError> {
        if self.iterations >= self.config.max_iterations {
            debug!(iterations = self.iterations, "AgentLoop::call_model: cap reached");
            return Ok(LoopState::Exhausted);
        }
        self.iterations += 1;

        let request = CompletionRequest {
            system_prompt: self.conversation.system().to_string(),
            messages: self.conversation.messages().to_vec(),
            tools: self.tools.clone(),
            max_tokens: self.config.max_tokens,
        };

        debug!(iteration = self.iterations, messages = self.conversation.len(), "AgentLoop::call_model: calling LLM");
        let response = self.llm.complete(request).await?;
        debug!(
            stop_reason = ?response.stop_reason,
            tool_calls = response.tool_calls.len(),
            "AgentLoop::call_model: response received"
        );

        if let Some(usage) = &response.usage {
            self.usage.get_or_insert_with(TokenUsage::default).add(usage);
        }
        if self.config.verbose {
            match &response.usage {
                Some(u) => {
                    println!("Prompt tokens: {}", u.prompt_tokens);
                    println!("Response tokens: {}", u.completion_tokens);
                }
                None => {
                    println!("Prompt tokens: N/A");
                    println!("Response tokens: N/A");
                }
            }
        }

        self.conversation.push(Message::from_response(&response));

        if response.tool_calls.is_empty() {
            Ok(LoopState::Done {
                answer: response.content.unwrap_or_default(),
            })
        } else {
            Ok(LoopState::DispatchingTools(response.tool_calls))
        }
    }

    async fn dispatch(&mut self, calls: &[ToolCall]) {
        debug!(count = calls.len(), "AgentLoop::dispatch: called");
        for call in calls {
            if self.config.verbose {
                println!("Calling function: {}({})", call.name, call.input);
            }
            let result = self.registry.dispatch(call, &self.ctx).await;
            if self.config.verbose {
                println!("-> {}", result.content);
            }
            self.conversation
                .push(Message::tool_result(&call.id, result.content, result.is_error));
        }
    }
}
