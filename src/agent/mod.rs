//! Tool-calling agent with conversation memory.
//!
//! Each query rebuilds a context string from the base system context plus
//! the running transcript, then drives a bounded reasoning loop: the model
//! either answers or requests a tool through a strict JSON protocol; tool
//! output (or failure) is fed back as a system message.

mod instructions;

pub use instructions::BASE_CONTEXT;

use std::sync::Arc;

use serde_json::Value;

use crate::errors::AppError;
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::memory::MemoryBuffer;
use crate::tools::{execute_tool, Tool};
use instructions::build_agent_instructions;

const MAX_STEPS_FALLBACK: &str =
    "Agent reached the maximum number of steps without a final answer.";

enum AgentDecision {
    Final(String),
    ToolCall { name: String, args: Value },
}

pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Vec<Arc<dyn Tool>>,
    memory: MemoryBuffer,
    base_context: String,
    chat_model: String,
    max_steps: usize,
}

impl Agent {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Vec<Arc<dyn Tool>>,
        base_context: String,
        chat_model: String,
        token_limit: usize,
        max_steps: usize,
    ) -> Self {
        Self {
            provider,
            tools,
            memory: MemoryBuffer::new(token_limit),
            base_context,
            chat_model,
            max_steps: max_steps.max(1),
        }
    }

    pub fn memory(&self) -> &MemoryBuffer {
        &self.memory
    }

    /// Run one user prompt through the agent and record both turns.
    pub async fn query_with_memory(&mut self, prompt: &str) -> Result<String, AppError> {
        let mut context_with_memory = self.base_context.clone();
        if !self.memory.is_empty() {
            context_with_memory.push('\n');
            context_with_memory.push_str(&self.memory.transcript());
        }
        context_with_memory.push_str(&format!("\nUser: {}", prompt));

        let response = self.run_loop(&context_with_memory).await?;

        self.memory.push(ChatMessage::user(prompt));
        self.memory.push(ChatMessage::assistant(response.clone()));

        Ok(response)
    }

    async fn run_loop(&self, context_with_memory: &str) -> Result<String, AppError> {
        let tool_meta: Vec<(String, String)> = self
            .tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect();

        let mut messages = vec![
            ChatMessage::system(build_agent_instructions(&tool_meta)),
            ChatMessage::user(context_with_memory),
        ];

        for step in 0..self.max_steps {
            let response = self
                .provider
                .chat(ChatRequest::new(messages.clone()), &self.chat_model)
                .await?;

            match parse_agent_decision(&response) {
                AgentDecision::Final(content) => return Ok(content),
                AgentDecision::ToolCall { name, args } => {
                    tracing::info!("step {}: executing tool `{}`", step + 1, name);
                    match execute_tool(&self.tools, &name, &args).await {
                        Ok(output) => {
                            messages.push(ChatMessage::system(format!(
                                "Tool `{}` result:\n{}",
                                name, output
                            )));
                        }
                        Err(err) => {
                            let failure = format!("Tool `{}` failed: {}", name, err);
                            tracing::warn!("{}", failure);
                            messages.push(ChatMessage::system(failure));
                        }
                    }
                }
            }
        }

        Ok(MAX_STEPS_FALLBACK.to_string())
    }
}

fn parse_agent_decision(text: &str) -> AgentDecision {
    if let Some(json_value) = parse_json_from_text(text) {
        if let Some(decision) = parse_agent_decision_from_value(&json_value) {
            return decision;
        }
    }
    AgentDecision::Final(text.trim().to_string())
}

fn parse_agent_decision_from_value(value: &Value) -> Option<AgentDecision> {
    let action_type = value
        .get("type")
        .or_else(|| value.get("action"))
        .and_then(|v| v.as_str())
        .unwrap_or("");

    if action_type == "tool_call" {
        let name = value
            .get("tool_name")
            .or_else(|| value.get("name"))
            .or_else(|| value.get("tool"))
            .and_then(|v| v.as_str())?;
        let args = value
            .get("tool_args")
            .or_else(|| value.get("args"))
            .cloned()
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
        return Some(AgentDecision::ToolCall {
            name: name.to_string(),
            args,
        });
    }

    if action_type == "final" {
        let content = value
            .get("content")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .to_string();
        return Some(AgentDecision::Final(content));
    }

    None
}

fn parse_json_from_text(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return Some(value);
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&trimmed[start..=end]).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[test]
    fn plain_text_is_final() {
        match parse_agent_decision("just an answer") {
            AgentDecision::Final(content) => assert_eq!(content, "just an answer"),
            _ => panic!("expected final"),
        }
    }

    #[test]
    fn tool_call_json_is_parsed() {
        let text = r#"{"type":"tool_call","tool_name":"note_saver","tool_args":{"note":"hi"}}"#;
        match parse_agent_decision(text) {
            AgentDecision::ToolCall { name, args } => {
                assert_eq!(name, "note_saver");
                assert_eq!(args["note"], "hi");
            }
            _ => panic!("expected tool call"),
        }
    }

    #[test]
    fn json_embedded_in_prose_is_found() {
        let text = "Sure, calling:\n{\"type\":\"final\",\"content\":\"done\"}\nthanks";
        match parse_agent_decision(text) {
            AgentDecision::Final(content) => assert_eq!(content, "done"),
            _ => panic!("expected final"),
        }
    }

    struct ScriptedProvider {
        replies: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn health_check(&self) -> Result<bool, AppError> {
            Ok(true)
        }

        async fn chat(&self, _request: ChatRequest, _model_id: &str) -> Result<String, AppError> {
            let mut replies = self.replies.lock().unwrap();
            if replies.is_empty() {
                return Ok("out of script".to_string());
            }
            Ok(replies.remove(0))
        }

        async fn embed(
            &self,
            inputs: &[String],
            _model_id: &str,
        ) -> Result<Vec<Vec<f32>>, AppError> {
            Ok(inputs.iter().map(|_| vec![0.0]).collect())
        }
    }

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "echoes input"
        }

        async fn call(&self, args: &Value) -> Result<String, AppError> {
            Ok(args["input"].as_str().unwrap_or("").to_string())
        }
    }

    fn scripted_agent(replies: Vec<&str>, tools: Vec<Arc<dyn Tool>>) -> Agent {
        let provider = Arc::new(ScriptedProvider {
            replies: Mutex::new(replies.into_iter().map(String::from).collect()),
        });
        Agent::new(
            provider,
            tools,
            "Base context.".to_string(),
            "test-model".to_string(),
            2048,
            4,
        )
    }

    #[tokio::test]
    async fn direct_answer_lands_in_memory() {
        let mut agent = scripted_agent(
            vec![r#"{"type":"final","content":"hello there"}"#],
            Vec::new(),
        );

        let reply = agent.query_with_memory("hi").await.unwrap();
        assert_eq!(reply, "hello there");

        let transcript = agent.memory().transcript();
        assert!(transcript.contains("User: hi"));
        assert!(transcript.contains("Bot: hello there"));
    }

    #[tokio::test]
    async fn tool_round_trip_reaches_final_answer() {
        let mut agent = scripted_agent(
            vec![
                r#"{"type":"tool_call","tool_name":"echo","tool_args":{"input":"ping"}}"#,
                r#"{"type":"final","content":"pong"}"#,
            ],
            vec![Arc::new(EchoTool)],
        );

        let reply = agent.query_with_memory("try the tool").await.unwrap();
        assert_eq!(reply, "pong");
    }

    #[tokio::test]
    async fn unknown_tool_failure_is_survivable() {
        let mut agent = scripted_agent(
            vec![
                r#"{"type":"tool_call","tool_name":"missing","tool_args":{}}"#,
                r#"{"type":"final","content":"recovered"}"#,
            ],
            Vec::new(),
        );

        let reply = agent.query_with_memory("go").await.unwrap();
        assert_eq!(reply, "recovered");
    }

    #[tokio::test]
    async fn step_budget_yields_fallback() {
        let mut agent = scripted_agent(
            vec![
                r#"{"type":"tool_call","tool_name":"echo","tool_args":{"input":"a"}}"#,
                r#"{"type":"tool_call","tool_name":"echo","tool_args":{"input":"b"}}"#,
                r#"{"type":"tool_call","tool_name":"echo","tool_args":{"input":"c"}}"#,
                r#"{"type":"tool_call","tool_name":"echo","tool_args":{"input":"d"}}"#,
            ],
            vec![Arc::new(EchoTool)],
        );

        let reply = agent.query_with_memory("loop forever").await.unwrap();
        assert_eq!(reply, MAX_STEPS_FALLBACK);
    }
}
