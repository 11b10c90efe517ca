//! Solution-card generation: turns a user problem plus retrieved manual
//! excerpts into a short structured answer via the LLM.

use tracing::{debug, info};

use crate::provider::{LlmError, LlmProvider, Message, Role};

const SYSTEM_PROMPT: &str = "You are a CNC technical support assistant.";

const PROMPT_TEMPLATE: &str = "\
User Problem:
<<<query>>>

Relevant Manual Extract:
<<<context>>>

Create a concise solution card.

Keep:
- Cause: 2-3 short sentences
- Solution: 4-5 clear steps
- Professional tone
";

const QUERY_PLACEHOLDER: &str = "<<<query>>>";
const CONTEXT_PLACEHOLDER: &str = "<<<context>>>";

/// A retrieved manual excerpt, decoupled from the storage layer's row type.
#[derive(Debug, Clone)]
pub struct ManualExcerpt {
    pub section: String,
    pub page_start: usize,
    pub page_end: usize,
    pub content: String,
}

/// Generates solution cards from retrieved manual context.
pub struct SolutionCardGenerator {
    provider: Box<dyn LlmProvider>,
    temperature: f32,
    max_tokens: u32,
}

impl SolutionCardGenerator {
    pub fn new(provider: Box<dyn LlmProvider>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            provider,
            temperature,
            max_tokens,
        }
    }

    /// Generate a solution card for `query` grounded in `excerpts`.
    pub async fn generate(
        &self,
        query: &str,
        excerpts: &[ManualExcerpt],
    ) -> Result<String, LlmError> {
        let prompt = build_prompt(query, excerpts);
        debug!("solution card prompt:\n{}", prompt);

        info!(excerpts = excerpts.len(), "generating solution card");

        let messages = vec![
            Message {
                role: Role::System,
                content: SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: Role::User,
                content: prompt,
            },
        ];

        self.provider
            .complete(messages, self.temperature, self.max_tokens)
            .await
    }
}

/// Assemble the user prompt: each excerpt labeled with its section and page
/// range, joined by blank lines.
fn build_prompt(query: &str, excerpts: &[ManualExcerpt]) -> String {
    let context = excerpts
        .iter()
        .map(|e| {
            format!(
                "Section: {} (Pages {}-{})\n{}",
                e.section, e.page_start, e.page_end, e.content
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    PROMPT_TEMPLATE
        .replace(QUERY_PLACEHOLDER, query)
        .replace(CONTEXT_PLACEHOLDER, &context)
}
