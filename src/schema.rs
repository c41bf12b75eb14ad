//! The tool inventory and its parameter schema table.
//!
//! Every REST operation of the Assistants API is exposed as exactly one
//! MCP tool. The closed [`ToolId`] enum is the single source of truth: the
//! wire name, description, and ordered parameter list of each tool are
//! exhaustive `match`es over it, so adding a variant without its table
//! entries is a compile error rather than a runtime surprise.
//!
//! [`validate_args`] runs the declared validators in declared order and
//! short-circuits on the first failure; the resulting single message is the
//! caller's entire diagnostic surface.

use crate::validate::{self, IdKind, ValidationError};
use serde_json::Value;

/// Identifies one of the 22 tools.
///
/// Variants are declared in advertisement order; [`ToolId::ALL`] preserves
/// it.
///
/// # Examples
///
/// ```
/// use assistants_mcp::schema::ToolId;
///
/// assert_eq!(ToolId::AssistantGet.wire_name(), "assistant-get");
/// assert_eq!(ToolId::from_wire_name("run-submit-tool-outputs"), Some(ToolId::RunSubmitToolOutputs));
/// assert_eq!(ToolId::from_wire_name("nonexistent-tool"), None);
/// assert_eq!(ToolId::ALL.len(), 22);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolId {
    AssistantCreate,
    AssistantList,
    AssistantGet,
    AssistantUpdate,
    AssistantDelete,
    ThreadCreate,
    ThreadGet,
    ThreadUpdate,
    ThreadDelete,
    MessageCreate,
    MessageList,
    MessageGet,
    MessageUpdate,
    MessageDelete,
    RunCreate,
    RunList,
    RunGet,
    RunUpdate,
    RunCancel,
    RunSubmitToolOutputs,
    RunStepList,
    RunStepGet,
}

impl ToolId {
    /// Every tool, in advertisement order.
    pub const ALL: [ToolId; 22] = [
        ToolId::AssistantCreate,
        ToolId::AssistantList,
        ToolId::AssistantGet,
        ToolId::AssistantUpdate,
        ToolId::AssistantDelete,
        ToolId::ThreadCreate,
        ToolId::ThreadGet,
        ToolId::ThreadUpdate,
        ToolId::ThreadDelete,
        ToolId::MessageCreate,
        ToolId::MessageList,
        ToolId::MessageGet,
        ToolId::MessageUpdate,
        ToolId::MessageDelete,
        ToolId::RunCreate,
        ToolId::RunList,
        ToolId::RunGet,
        ToolId::RunUpdate,
        ToolId::RunCancel,
        ToolId::RunSubmitToolOutputs,
        ToolId::RunStepList,
        ToolId::RunStepGet,
    ];

    /// The kebab-case name the tool is invoked by.
    pub fn wire_name(self) -> &'static str {
        match self {
            ToolId::AssistantCreate => "assistant-create",
            ToolId::AssistantList => "assistant-list",
            ToolId::AssistantGet => "assistant-get",
            ToolId::AssistantUpdate => "assistant-update",
            ToolId::AssistantDelete => "assistant-delete",
            ToolId::ThreadCreate => "thread-create",
            ToolId::ThreadGet => "thread-get",
            ToolId::ThreadUpdate => "thread-update",
            ToolId::ThreadDelete => "thread-delete",
            ToolId::MessageCreate => "message-create",
            ToolId::MessageList => "message-list",
            ToolId::MessageGet => "message-get",
            ToolId::MessageUpdate => "message-update",
            ToolId::MessageDelete => "message-delete",
            ToolId::RunCreate => "run-create",
            ToolId::RunList => "run-list",
            ToolId::RunGet => "run-get",
            ToolId::RunUpdate => "run-update",
            ToolId::RunCancel => "run-cancel",
            ToolId::RunSubmitToolOutputs => "run-submit-tool-outputs",
            ToolId::RunStepList => "run-step-list",
            ToolId::RunStepGet => "run-step-get",
        }
    }

    /// Resolves a wire name back to its tool.
    pub fn from_wire_name(name: &str) -> Option<ToolId> {
        ToolId::ALL.iter().copied().find(|id| id.wire_name() == name)
    }

    /// Human-readable description, advertised via `tools/list`.
    pub fn description(self) -> &'static str {
        match self {
            ToolId::AssistantCreate => {
                "Create a new assistant with a model, instructions, and optional tools."
            }
            ToolId::AssistantList => "List assistants, newest first by default.",
            ToolId::AssistantGet => "Retrieve an assistant by its ID.",
            ToolId::AssistantUpdate => "Modify an existing assistant's model, instructions, or tools.",
            ToolId::AssistantDelete => "Delete an assistant by its ID.",
            ToolId::ThreadCreate => "Create a conversation thread, optionally seeded with messages.",
            ToolId::ThreadGet => "Retrieve a thread by its ID.",
            ToolId::ThreadUpdate => "Modify a thread's metadata.",
            ToolId::ThreadDelete => "Delete a thread by its ID.",
            ToolId::MessageCreate => "Add a message to a thread.",
            ToolId::MessageList => "List the messages in a thread.",
            ToolId::MessageGet => "Retrieve a message from a thread.",
            ToolId::MessageUpdate => "Modify a message's metadata.",
            ToolId::MessageDelete => "Delete a message from a thread.",
            ToolId::RunCreate => "Start a run of an assistant on a thread.",
            ToolId::RunList => "List the runs of a thread.",
            ToolId::RunGet => "Retrieve a run by its ID.",
            ToolId::RunUpdate => "Modify a run's metadata.",
            ToolId::RunCancel => "Cancel an in-progress run.",
            ToolId::RunSubmitToolOutputs => {
                "Submit tool outputs for a run waiting on required actions."
            }
            ToolId::RunStepList => "List the steps of a run.",
            ToolId::RunStepGet => "Retrieve a single run step.",
        }
    }

    /// The ordered parameter table for this tool.
    ///
    /// Validation runs over this list in order; descriptors derive their
    /// `inputSchema` from the same list, so the two can never drift apart.
    pub fn params(self) -> Vec<ParamSpec> {
        match self {
            ToolId::AssistantCreate => vec![
                ParamSpec::model(true),
                ParamSpec::opt_string("name", "Display name for the assistant"),
                ParamSpec::opt_string("description", "What the assistant is for"),
                ParamSpec::opt_string("instructions", "System instructions the assistant follows"),
                ParamSpec::tools(),
                ParamSpec::tool_resources(),
                ParamSpec::metadata(),
            ],
            ToolId::AssistantList => vec![
                ParamSpec::limit(),
                ParamSpec::order(),
                ParamSpec::opt_id("after", IdKind::Assistant, "Return assistants after this ID"),
                ParamSpec::opt_id("before", IdKind::Assistant, "Return assistants before this ID"),
            ],
            ToolId::AssistantGet => vec![ParamSpec::assistant_id()],
            ToolId::AssistantUpdate => vec![
                ParamSpec::assistant_id(),
                ParamSpec::model(false),
                ParamSpec::opt_string("name", "Display name for the assistant"),
                ParamSpec::opt_string("description", "What the assistant is for"),
                ParamSpec::opt_string("instructions", "System instructions the assistant follows"),
                ParamSpec::tools(),
                ParamSpec::tool_resources(),
                ParamSpec::metadata(),
            ],
            ToolId::AssistantDelete => vec![ParamSpec::assistant_id()],
            ToolId::ThreadCreate => vec![
                ParamSpec {
                    name: "messages",
                    kind: ParamKind::Array,
                    required: false,
                    description: "Messages to seed the thread with",
                },
                ParamSpec::metadata(),
            ],
            ToolId::ThreadGet => vec![ParamSpec::thread_id()],
            ToolId::ThreadUpdate => vec![ParamSpec::thread_id(), ParamSpec::metadata()],
            ToolId::ThreadDelete => vec![ParamSpec::thread_id()],
            ToolId::MessageCreate => vec![
                ParamSpec::thread_id(),
                ParamSpec {
                    name: "role",
                    kind: ParamKind::Enum {
                        allowed: &["user", "assistant"],
                        default: None,
                    },
                    required: true,
                    description: "Author of the message",
                },
                ParamSpec {
                    name: "content",
                    kind: ParamKind::String {
                        examples: &["Hello! Can you help me analyze this data?"],
                    },
                    required: true,
                    description: "Text content of the message",
                },
                ParamSpec::metadata(),
            ],
            ToolId::MessageList => vec![
                ParamSpec::thread_id(),
                ParamSpec::limit(),
                ParamSpec::order(),
                ParamSpec::opt_id("after", IdKind::Message, "Return messages after this ID"),
                ParamSpec::opt_id("before", IdKind::Message, "Return messages before this ID"),
                ParamSpec::opt_id("run_id", IdKind::Run, "Only messages created by this run"),
            ],
            ToolId::MessageGet => vec![ParamSpec::thread_id(), ParamSpec::message_id()],
            ToolId::MessageUpdate => vec![
                ParamSpec::thread_id(),
                ParamSpec::message_id(),
                ParamSpec::metadata(),
            ],
            ToolId::MessageDelete => vec![ParamSpec::thread_id(), ParamSpec::message_id()],
            ToolId::RunCreate => vec![
                ParamSpec::thread_id(),
                ParamSpec::assistant_id(),
                ParamSpec::model(false),
                ParamSpec::opt_string("instructions", "Override the assistant's instructions"),
                ParamSpec::opt_string(
                    "additional_instructions",
                    "Appended to the assistant's instructions for this run",
                ),
                ParamSpec::tools(),
                ParamSpec::metadata(),
            ],
            ToolId::RunList => vec![
                ParamSpec::thread_id(),
                ParamSpec::limit(),
                ParamSpec::order(),
                ParamSpec::opt_id("after", IdKind::Run, "Return runs after this ID"),
                ParamSpec::opt_id("before", IdKind::Run, "Return runs before this ID"),
            ],
            ToolId::RunGet => vec![ParamSpec::thread_id(), ParamSpec::run_id()],
            ToolId::RunUpdate => vec![
                ParamSpec::thread_id(),
                ParamSpec::run_id(),
                ParamSpec::metadata(),
            ],
            ToolId::RunCancel => vec![ParamSpec::thread_id(), ParamSpec::run_id()],
            ToolId::RunSubmitToolOutputs => vec![
                ParamSpec::thread_id(),
                ParamSpec::run_id(),
                ParamSpec {
                    name: "tool_outputs",
                    kind: ParamKind::Array,
                    required: true,
                    description: "Outputs for the tool calls the run is waiting on",
                },
            ],
            ToolId::RunStepList => vec![
                ParamSpec::thread_id(),
                ParamSpec::run_id(),
                ParamSpec::limit(),
                ParamSpec::order(),
                ParamSpec::opt_id("after", IdKind::Step, "Return steps after this ID"),
                ParamSpec::opt_id("before", IdKind::Step, "Return steps before this ID"),
            ],
            ToolId::RunStepGet => vec![
                ParamSpec::thread_id(),
                ParamSpec::run_id(),
                ParamSpec {
                    name: "step_id",
                    kind: ParamKind::Id(IdKind::Step),
                    required: true,
                    description: "ID of the run step",
                },
            ],
        }
    }

    /// Builds the advertisable descriptor for this tool.
    pub fn descriptor(self) -> ToolDescriptor {
        ToolDescriptor {
            name: self.wire_name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::new(&self.params()),
        }
    }
}

/// The semantic type of one parameter, tied to the validation primitive
/// that applies.
#[derive(Debug, Clone, Copy)]
pub enum ParamKind {
    /// Free-form string; examples are included in failure messages
    String { examples: &'static [&'static str] },
    /// OpenAI resource ID of a particular kind
    Id(IdKind),
    /// Member of a closed value set, with an optional server-side default
    Enum {
        allowed: &'static [&'static str],
        default: Option<&'static str>,
    },
    /// Number within an inclusive range, with an optional default
    Number {
        min: f64,
        max: f64,
        default: Option<f64>,
    },
    /// JSON array
    Array,
    /// Key/value metadata object, size-capped
    Metadata,
    /// Array of assistant tool definitions
    Tools,
    /// tool_resources object, cross-checked against the tools array
    ToolResources,
}

impl ParamKind {
    /// The JSON Schema type string advertised for this kind.
    pub fn json_type(self) -> &'static str {
        match self {
            ParamKind::String { .. } | ParamKind::Id(_) | ParamKind::Enum { .. } => "string",
            ParamKind::Number { .. } => "number",
            ParamKind::Array | ParamKind::Tools => "array",
            ParamKind::Metadata | ParamKind::ToolResources => "object",
        }
    }
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Parameter name as it appears in `arguments`
    pub name: &'static str,
    /// Semantic type and validator
    pub kind: ParamKind,
    /// Whether the parameter must be supplied
    pub required: bool,
    /// Description advertised in the input schema
    pub description: &'static str,
}

impl ParamSpec {
    fn assistant_id() -> Self {
        ParamSpec {
            name: "assistant_id",
            kind: ParamKind::Id(IdKind::Assistant),
            required: true,
            description: "ID of the assistant",
        }
    }

    fn thread_id() -> Self {
        ParamSpec {
            name: "thread_id",
            kind: ParamKind::Id(IdKind::Thread),
            required: true,
            description: "ID of the thread",
        }
    }

    fn message_id() -> Self {
        ParamSpec {
            name: "message_id",
            kind: ParamKind::Id(IdKind::Message),
            required: true,
            description: "ID of the message",
        }
    }

    fn run_id() -> Self {
        ParamSpec {
            name: "run_id",
            kind: ParamKind::Id(IdKind::Run),
            required: true,
            description: "ID of the run",
        }
    }

    fn opt_id(name: &'static str, kind: IdKind, description: &'static str) -> Self {
        ParamSpec {
            name,
            kind: ParamKind::Id(kind),
            required: false,
            description,
        }
    }

    fn model(required: bool) -> Self {
        ParamSpec {
            name: "model",
            kind: ParamKind::String {
                examples: &["gpt-4", "gpt-4o", "gpt-3.5-turbo"],
            },
            required,
            description: "Model the assistant uses",
        }
    }

    fn opt_string(name: &'static str, description: &'static str) -> Self {
        ParamSpec {
            name,
            kind: ParamKind::String { examples: &[] },
            required: false,
            description,
        }
    }

    fn limit() -> Self {
        ParamSpec {
            name: "limit",
            kind: ParamKind::Number {
                min: 1.0,
                max: 100.0,
                default: Some(20.0),
            },
            required: false,
            description: "Page size, between 1 and 100",
        }
    }

    fn order() -> Self {
        ParamSpec {
            name: "order",
            kind: ParamKind::Enum {
                allowed: &["asc", "desc"],
                default: Some("desc"),
            },
            required: false,
            description: "Sort order by creation time",
        }
    }

    fn metadata() -> Self {
        ParamSpec {
            name: "metadata",
            kind: ParamKind::Metadata,
            required: false,
            description: "Up to 16 KB of key/value pairs attached to the object",
        }
    }

    fn tools() -> Self {
        ParamSpec {
            name: "tools",
            kind: ParamKind::Tools,
            required: false,
            description: "Tools the assistant may use (code_interpreter, file_search, function)",
        }
    }

    fn tool_resources() -> Self {
        ParamSpec {
            name: "tool_resources",
            kind: ParamKind::ToolResources,
            required: false,
            description: "Resources for the enabled tools, keyed by tool type",
        }
    }
}

/// Runs every declared validator for `tool` over `args`, in declared
/// order, stopping at the first failure.
///
/// Absent optional parameters are skipped except for enums and numbers,
/// whose primitives own the absent-with-default logic.
///
/// # Examples
///
/// ```
/// use assistants_mcp::schema::{validate_args, ToolId};
/// use serde_json::json;
///
/// let args = json!({"assistant_id": "asst_abc123def456ghi789jkl012"});
/// assert!(validate_args(ToolId::AssistantGet, args.as_object().unwrap()).is_ok());
///
/// // Missing required model: the single message names the parameter and an example.
/// let args = json!({"name": "Bot"});
/// let err = validate_args(ToolId::AssistantCreate, args.as_object().unwrap()).unwrap_err();
/// assert!(err.message.contains("model"));
/// assert!(err.message.contains("gpt-4"));
/// ```
pub fn validate_args(
    tool: ToolId,
    args: &serde_json::Map<String, Value>,
) -> Result<(), ValidationError> {
    for spec in tool.params() {
        let value = args.get(spec.name);
        let absent = matches!(value, None | Some(Value::Null));
        match spec.kind {
            ParamKind::String { examples } => {
                if absent && !spec.required {
                    continue;
                }
                validate::required_string(value, spec.name, examples)?;
            }
            ParamKind::Id(kind) => {
                if absent && !spec.required {
                    continue;
                }
                validate::openai_id(value, spec.name, kind)?;
            }
            ParamKind::Enum { allowed, default } => {
                validate::enum_member(value, spec.name, allowed, default)?;
            }
            ParamKind::Number { min, max, default } => {
                validate::numeric_range(value, spec.name, min, max, default)?;
            }
            ParamKind::Array => {
                validate::array(value, spec.name, spec.required)?;
            }
            ParamKind::Metadata => {
                validate::metadata(value, spec.name)?;
            }
            ParamKind::Tools => {
                validate::tools(value, spec.name)?;
            }
            ParamKind::ToolResources => {
                validate::tool_resources(value, args.get("tools"), spec.name)?;
            }
        }
    }
    Ok(())
}

/// The static, advertisable metadata for one tool.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolDescriptor {
    /// Unique kebab-case tool name
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema for the tool's arguments
    #[serde(rename = "inputSchema")]
    pub input_schema: InputSchema,
}

/// JSON Schema describing a tool's arguments.
///
/// Always an object schema; derived from the parameter table rather than
/// written by hand.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InputSchema {
    /// Always "object"
    pub r#type: String,
    /// Parameter name to schema fragment
    pub properties: serde_json::Map<String, Value>,
    /// Names of required parameters
    pub required: Vec<String>,
}

impl InputSchema {
    /// Builds the schema for an ordered parameter list.
    pub fn new(params: &[ParamSpec]) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();
        for spec in params {
            let mut fragment = serde_json::Map::new();
            fragment.insert("type".to_string(), spec.kind.json_type().into());
            fragment.insert("description".to_string(), spec.description.into());
            if let ParamKind::Enum { allowed, .. } = spec.kind {
                fragment.insert(
                    "enum".to_string(),
                    Value::Array(allowed.iter().map(|&v| v.into()).collect()),
                );
            }
            if spec.required {
                required.push(spec.name.to_string());
            }
            properties.insert(spec.name.to_string(), Value::Object(fragment));
        }
        InputSchema {
            r#type: "object".to_string(),
            properties,
            required,
        }
    }
}
