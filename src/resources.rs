//! Static resource and prompt content served alongside the tools.
//!
//! The dispatcher routes `resources/*`, `prompts/*`, and
//! `completion/complete` to a [`ContentProvider`]; the dispatch layer owns
//! only the routing. [`StaticContent`] is the built-in provider with a
//! small documentation catalog.

use crate::backend::JsonObject;

/// Metadata for one listable resource.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

/// The content of one resource read.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

/// One declared argument of a prompt.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// Metadata for one listable prompt.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PromptInfo {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

/// One message of an expanded prompt.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: PromptContent,
}

/// Text content of a prompt message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PromptContent {
    pub r#type: String,
    pub text: String,
}

impl PromptContent {
    fn text(text: String) -> Self {
        PromptContent {
            r#type: "text".to_string(),
            text,
        }
    }
}

/// The result of `prompts/get`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

/// Suggestions for `completion/complete`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct Completion {
    pub values: Vec<String>,
    pub total: usize,
    #[serde(rename = "hasMore")]
    pub has_more: bool,
}

/// A content lookup that failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContentError {
    #[error("Resource not found: {0}. Call resources/list for the available URIs.")]
    UnknownResource(String),
    #[error("Prompt not found: {0}. Call prompts/list for the available prompts.")]
    UnknownPrompt(String),
}

/// Read-only content exposed through the resources/prompts endpoints.
///
/// Implementations must be `Send + Sync`; the dispatcher shares one
/// provider across request threads.
pub trait ContentProvider: Send + Sync {
    fn list_resources(&self) -> Vec<ResourceInfo>;
    fn read_resource(&self, uri: &str) -> Result<ResourceContents, ContentError>;
    fn list_prompts(&self) -> Vec<PromptInfo>;
    fn get_prompt(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<PromptResult, ContentError>;

    /// Suggests values for a prompt argument; empty by default.
    fn complete(&self, _argument_name: &str, _partial: &str) -> Completion {
        Completion::default()
    }
}

const WORKFLOW_DOC: &str = "\
Typical Assistants API workflow:\n\
1. assistant-create with a model and instructions.\n\
2. thread-create to open a conversation.\n\
3. message-create to add the user's message to the thread.\n\
4. run-create to have the assistant respond.\n\
5. Poll run-get until status is completed, then message-list to read the reply.\n\
If a run requires tool outputs, answer with run-submit-tool-outputs.\n";

const ID_FORMAT_DOC: &str = "\
OpenAI resource IDs are a prefix, an underscore, and 24 alphanumeric characters.\n\
Prefixes: asst (assistants), thread (threads), msg (messages), run (runs),\n\
step (run steps), file (files), call (tool calls).\n\
Example: asst_abc123def456ghi789jkl012\n";

const MODEL_SUGGESTIONS: [&str; 4] = ["gpt-4", "gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"];

/// The built-in documentation catalog.
pub struct StaticContent;

impl ContentProvider for StaticContent {
    fn list_resources(&self) -> Vec<ResourceInfo> {
        vec![
            ResourceInfo {
                uri: "assistants://docs/workflow".to_string(),
                name: "Assistants workflow".to_string(),
                description: "How the assistant/thread/message/run operations fit together"
                    .to_string(),
                mime_type: "text/plain".to_string(),
            },
            ResourceInfo {
                uri: "assistants://docs/id-formats".to_string(),
                name: "ID formats".to_string(),
                description: "The ID pattern for each resource kind".to_string(),
                mime_type: "text/plain".to_string(),
            },
        ]
    }

    fn read_resource(&self, uri: &str) -> Result<ResourceContents, ContentError> {
        let text = match uri {
            "assistants://docs/workflow" => WORKFLOW_DOC,
            "assistants://docs/id-formats" => ID_FORMAT_DOC,
            _ => return Err(ContentError::UnknownResource(uri.to_string())),
        };
        Ok(ResourceContents {
            uri: uri.to_string(),
            mime_type: "text/plain".to_string(),
            text: text.to_string(),
        })
    }

    fn list_prompts(&self) -> Vec<PromptInfo> {
        vec![PromptInfo {
            name: "create-coding-assistant".to_string(),
            description: "Set up an assistant specialized for a programming language".to_string(),
            arguments: vec![PromptArgument {
                name: "language".to_string(),
                description: "The programming language to specialize in".to_string(),
                required: true,
            }],
        }]
    }

    fn get_prompt(
        &self,
        name: &str,
        arguments: Option<&JsonObject>,
    ) -> Result<PromptResult, ContentError> {
        match name {
            "create-coding-assistant" => {
                let language = arguments
                    .and_then(|args| args.get("language"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("the requested language");
                Ok(PromptResult {
                    description: format!("Create a {} coding assistant", language),
                    messages: vec![PromptMessage {
                        role: "user".to_string(),
                        content: PromptContent::text(format!(
                            "Use assistant-create to make an assistant named \"{} helper\" \
                             with instructions to answer {} questions with working code examples. \
                             Enable the code_interpreter tool.",
                            language, language
                        )),
                    }],
                })
            }
            _ => Err(ContentError::UnknownPrompt(name.to_string())),
        }
    }

    fn complete(&self, argument_name: &str, partial: &str) -> Completion {
        if argument_name != "model" {
            return Completion::default();
        }
        let values: Vec<String> = MODEL_SUGGESTIONS
            .iter()
            .filter(|m| m.starts_with(partial))
            .map(|m| m.to_string())
            .collect();
        Completion {
            total: values.len(),
            has_more: false,
            values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_resource_is_readable() {
        for info in StaticContent.list_resources() {
            let contents = StaticContent.read_resource(&info.uri).unwrap();
            assert_eq!(contents.uri, info.uri);
            assert!(!contents.text.is_empty());
        }
    }

    #[test]
    fn unknown_uri_names_the_offender() {
        let err = StaticContent
            .read_resource("assistants://docs/missing")
            .unwrap_err();
        assert!(err.to_string().contains("assistants://docs/missing"));
    }

    #[test]
    fn prompt_substitutes_arguments() {
        let mut args = JsonObject::new();
        args.insert("language".to_string(), "Rust".into());
        let prompt = StaticContent
            .get_prompt("create-coding-assistant", Some(&args))
            .unwrap();
        assert!(prompt.messages[0].content.text.contains("Rust"));
    }

    #[test]
    fn completion_filters_by_prefix() {
        let completion = StaticContent.complete("model", "gpt-4");
        assert!(completion.values.contains(&"gpt-4o".to_string()));
        assert!(!completion.values.contains(&"gpt-3.5-turbo".to_string()));
    }
}
