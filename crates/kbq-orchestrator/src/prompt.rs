use kbq_core::entities::ToolInvocation;
use kbq_search::retrieve::Source;

pub const SOURCES_START: &str = "--- SOURCES ---";
pub const SOURCES_END: &str = "--- END SOURCES ---";

const MAX_PROMPT_CHARS: usize = 8_000;
const SYSTEM_IDENTITY: &str =
    "You are a knowledge-base assistant. Answer only from the numbered sources below, citing them by number.";

fn source_line(index: usize, source: &Source) -> String {
    format!("{}. {}: {}", index + 1, source.title, source.excerpt)
}

fn tool_line(index: usize, offset: usize, invocation: &ToolInvocation) -> String {
    if invocation.success {
        let data = invocation.data.as_ref().map_or_else(String::new, serde_json::Value::to_string);
        format!("{}. [tool:{}] {}", offset + index + 1, invocation.tool, data)
    } else {
        format!(
            "{}. [tool:{} failed] {}",
            offset + index + 1,
            invocation.tool,
            invocation.error.as_deref().unwrap_or("unknown error")
        )
    }
}

/// Builds the prompt handed to a [`crate::Completer`]: system identity,
/// numbered sources, numbered tool results, then the question. If the
/// composed prompt would exceed [`MAX_PROMPT_CHARS`], the earliest sources'
/// excerpts are truncated first — sources are never dropped entirely unless
/// the prompt still exceeds the cap with every excerpt emptied.
#[must_use]
pub fn compose_prompt(question: &str, sources: &[Source], tools_used: &[ToolInvocation]) -> String {
    let mut source_lines: Vec<String> = sources.iter().enumerate().map(|(i, s)| source_line(i, s)).collect();
    let tool_lines: Vec<String> =
        tools_used.iter().enumerate().map(|(i, t)| tool_line(i, sources.len(), t)).collect();

    let mut prompt = render(question, &source_lines, &tool_lines);
    let mut truncate_at = 0;
    while prompt.chars().count() > MAX_PROMPT_CHARS && truncate_at < source_lines.len() {
        source_lines[truncate_at] = truncate_excerpt(&source_lines[truncate_at]);
        prompt = render(question, &source_lines, &tool_lines);
        truncate_at += 1;
    }
    if prompt.chars().count() > MAX_PROMPT_CHARS {
        prompt = prompt.chars().take(MAX_PROMPT_CHARS).collect();
    }
    prompt
}

fn truncate_excerpt(line: &str) -> String {
    let Some((prefix, _)) = line.split_once(": ") else {
        return line.to_string();
    };
    format!("{prefix}: (truncated)")
}

fn render(question: &str, source_lines: &[String], tool_lines: &[String]) -> String {
    let mut out = String::new();
    out.push_str(SYSTEM_IDENTITY);
    out.push_str("\n\n");
    out.push_str(SOURCES_START);
    out.push('\n');
    for line in source_lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(SOURCES_END);
    out.push('\n');
    if !tool_lines.is_empty() {
        out.push_str("--- TOOL RESULTS ---\n");
        for line in tool_lines {
            out.push_str(line);
            out.push('\n');
        }
        out.push_str("--- END TOOL RESULTS ---\n");
    }
    out.push_str("\nQuestion: ");
    out.push_str(question);
    out
}
