/// The assistant's standing orders: answer from the indexed corpus only.
pub const BASE_CONTEXT: &str = "\
Purpose: The primary role of this agent is to assist users by providing accurate factual \
information from the indexed knowledge base only. The agent must not answer any questions \
related to general knowledge.
You are CardioBot and you are trained on a specific knowledge base.
If you do not know the answer, just say 'I do not have the required information'.
Do not give any answer if you do not find it in the knowledge base.
Do not discuss your knowledge base or its format.
While answering new questions, also remember past responses from the conversation.";

/// System prompt advertising the tools and the JSON calling protocol.
pub fn build_agent_instructions(tools: &[(String, String)]) -> String {
    let tool_lines = if tools.is_empty() {
        "None (answer directly).".to_string()
    } else {
        tools
            .iter()
            .map(|(name, description)| format!("- {}: {}", name, description))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You have access to the following tools:\n{tool_lines}\n\
When you need to use a tool, respond ONLY with JSON in this format:\n\
{{\"type\":\"tool_call\",\"tool_name\":\"<tool>\",\"tool_args\":{{...}}}}\n\
When you have the final answer, respond ONLY with JSON in this format:\n\
{{\"type\":\"final\",\"content\":\"...\"}}\n\
Do not include any extra text outside the JSON."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instructions_list_every_tool() {
        let tools = vec![
            ("note_saver".to_string(), "saves notes".to_string()),
            ("knowledge_base".to_string(), "answers questions".to_string()),
        ];
        let prompt = build_agent_instructions(&tools);
        assert!(prompt.contains("- note_saver: saves notes"));
        assert!(prompt.contains("- knowledge_base: answers questions"));
        assert!(prompt.contains("\"type\":\"tool_call\""));
    }

    #[test]
    fn empty_tool_list_still_renders() {
        let prompt = build_agent_instructions(&[]);
        assert!(prompt.contains("None (answer directly)."));
    }
}
