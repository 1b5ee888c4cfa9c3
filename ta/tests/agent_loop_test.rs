//! Integration tests for the agent loop
//!
//! A scripted model drives the real tool registry against a scratch working
//! root, end to end.

use std::fs;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use toolagent::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, ToolCall};
use toolagent::r#loop::{AgentLoop, LoopConfig, LoopOutcome};
use toolagent::tools::{RunnerSettings, ToolContext, ToolRegistry};

/// Replays canned responses and remembers every request it saw
struct ScriptedModel {
    responses: Mutex<Vec<CompletionResponse>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    fn new(mut responses: Vec<CompletionResponse>) -> Arc<Self> {
        responses.reverse();
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop()
            .ok_or_else(|| LlmError::InvalidResponse("script exhausted".to_string()))
    }
}

fn call(id: &str, name: &str, input: serde_json::Value) -> ToolCall {
    ToolCall::new(id, name, input)
}

fn sh_context(root: &std::path::Path) -> ToolContext {
    ToolContext::new(root).with_runner(RunnerSettings {
        interpreter: "sh".to_string(),
        extension: "sh".to_string(),
        language: "shell".to_string(),
        timeout: Duration::from_secs(10),
    })
}

fn tool_results(request: &CompletionRequest) -> Vec<String> {
    request
        .messages
        .iter()
        .filter_map(|m| match &m.content {
            toolagent::llm::MessageContent::Blocks(blocks) => blocks.iter().find_map(|b| match b {
                toolagent::llm::ContentBlock::ToolResult { content, .. } => Some(content.clone()),
                _ => None,
            }),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Happy paths
// =============================================================================

#[tokio::test]
async fn test_list_then_answer_makes_two_model_calls() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("main.py"), "print('hi')\n").unwrap();

    let model = ScriptedModel::new(vec![
        CompletionResponse::tool_calls(vec![call("call_1", "get_files_info", serde_json::json!({}))]),
        CompletionResponse::text("The directory holds main.py."),
    ]);
    let mut agent = AgentLoop::new(
        LoopConfig::default(),
        model.clone(),
        ToolRegistry::standard(),
        ToolContext::new(temp.path()),
        "system",
        "what files are there?",
    );

    let outcome = agent.run().await.expect("loop failed");

    assert_eq!(
        outcome,
        LoopOutcome::Done {
            answer: "The directory holds main.py.".to_string(),
            iterations: 2
        }
    );

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].messages.len(), 1);
    assert_eq!(
        tool_results(&requests[1]),
        vec!["- main.py: file_size=12 bytes, is_dir=false".to_string()]
    );
}

#[tokio::test]
async fn test_fix_and_rerun_script() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp.path().join("calc.sh"), "echo $((3 - 5))\n").unwrap();

    let model = ScriptedModel::new(vec![
        CompletionResponse::tool_calls(vec![call(
            "run_1",
            "run_python_file",
            serde_json::json!({"file_path": "calc.sh"}),
        )]),
        CompletionResponse::tool_calls(vec![
            call(
                "write_1",
                "write_file",
                serde_json::json!({"file_path": "calc.sh", "content": "echo $((3 + 5))\n"}),
            ),
            call("run_2", "run_python_file", serde_json::json!({"file_path": "calc.sh"})),
        ]),
        CompletionResponse::text("Fixed: 3 + 5 = 8"),
    ]);
    let mut agent = AgentLoop::new(
        LoopConfig::default(),
        model.clone(),
        ToolRegistry::standard(),
        sh_context(temp.path()),
        "system",
        "fix the calculator",
    );

    let outcome = agent.run().await.expect("loop failed");
    assert!(matches!(outcome, LoopOutcome::Done { iterations: 3, .. }));

    let results = tool_results(&model.requests()[2]);
    assert_eq!(
        results,
        vec![
            "STDOUT:\n-2\n".to_string(),
            "Successfully wrote to \"calc.sh\" (16 characters written)".to_string(),
            "STDOUT:\n8\n".to_string(),
        ]
    );
    assert_eq!(fs::read_to_string(temp.path().join("calc.sh")).unwrap(), "echo $((3 + 5))\n");
}

// =============================================================================
// Failure paths stay inside the conversation
// =============================================================================

#[tokio::test]
async fn test_escape_attempts_become_error_results() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let root = temp.path().join("calculator");
    fs::create_dir(&root).unwrap();

    let model = ScriptedModel::new(vec![
        CompletionResponse::tool_calls(vec![
            call("a", "get_files_info", serde_json::json!({"directory": "../"})),
            call("b", "get_file_content", serde_json::json!({"file_path": "/etc/passwd"})),
            call(
                "c",
                "write_file",
                serde_json::json!({"file_path": "../pwned.txt", "content": "x", "working_directory": "/"}),
            ),
            call("d", "run_python_file", serde_json::json!({"file_path": "../../x.py"})),
            call("e", "delete_everything", serde_json::json!({})),
        ]),
        CompletionResponse::text("I cannot leave the working directory."),
    ]);
    let mut agent = AgentLoop::new(
        LoopConfig::default(),
        model.clone(),
        ToolRegistry::standard(),
        ToolContext::new(&root),
        "system",
        "look around",
    );

    let outcome = agent.run().await.expect("loop failed");
    assert!(matches!(outcome, LoopOutcome::Done { .. }));

    let results = tool_results(&model.requests()[1]);
    assert_eq!(results.len(), 5);
    assert!(results.iter().all(|r| r.starts_with("Error:")));
    assert!(results[..4].iter().all(|r| r.contains("outside")));
    assert_eq!(results[4], "Error: Unknown function: delete_everything");
    assert!(!temp.path().join("pwned.txt").exists());
}

#[tokio::test]
async fn test_tool_calls_every_iteration_exhausts() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let responses = (0..20)
        .map(|i| {
            CompletionResponse::tool_calls(vec![call(
                &format!("call_{}", i),
                "get_files_info",
                serde_json::json!({}),
            )])
        })
        .collect();
    let model = ScriptedModel::new(responses);
    let mut agent = AgentLoop::new(
        LoopConfig::default(),
        model.clone(),
        ToolRegistry::standard(),
        ToolContext::new(temp.path()),
        "system",
        "loop forever",
    );

    let outcome = agent.run().await.expect("loop failed");

    assert_eq!(outcome, LoopOutcome::Exhausted { iterations: 20 });
    assert_eq!(model.requests().len(), 20);
}

#[tokio::test]
async fn test_smaller_cap_is_honoured() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    let responses = (0..5)
        .map(|i| {
            CompletionResponse::tool_calls(vec![call(
                &format!("c{}", i),
                "get_files_info",
                serde_json::json!({}),
            )])
        })
        .collect();
    let model = ScriptedModel::new(responses);
    let config = LoopConfig {
        max_iterations: 3,
        ..LoopConfig::default()
    };
    let mut agent = AgentLoop::new(
        config,
        model.clone(),
        ToolRegistry::standard(),
        ToolContext::new(temp.path()),
        "system",
        "go",
    );

    let outcome = agent.run().await.expect("loop failed");

    assert_eq!(outcome, LoopOutcome::Exhausted { iterations: 3 });
    assert_eq!(model.requests().len(), 3);
}
