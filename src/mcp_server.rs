use std::sync::Arc;

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::{
    jsonrpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, Outgoing},
    tools::WikidataTools,
    WikidataError,
};

pub const PROTOCOL_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "Wikidata MCP";
pub const EXPLORE_WIKIDATA: &str = "explore_wikidata";

/// What to do with one incoming line.
#[derive(Debug)]
enum Dispatch {
    Reply(Outgoing),
    ToolCall {
        id: Value,
        name: String,
        arguments: Value,
    },
    Silent,
}

/// MCP server speaking newline-delimited JSON-RPC.
#[derive(Debug, Clone)]
pub struct McpServer {
    tools: Arc<WikidataTools>,
}

impl McpServer {
    pub fn new(tools: WikidataTools) -> Self {
        Self {
            tools: Arc::new(tools),
        }
    }

    pub fn tool_count(&self) -> usize {
        self.tools.definitions().len()
    }

    /// Reads requests from `reader` until EOF and writes responses to `writer`.
    /// Each tool call runs in its own task, so responses may come out of order.
    /// # Errors
    /// Returns an error if reading or writing fails.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<(), WikidataError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sender, receiver) = mpsc::unbounded_channel::<Outgoing>();
        let writer_task = tokio::spawn(write_messages(receiver, writer));
        let mut calls = JoinSet::new();
        let mut lines = reader.lines();
        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match self.dispatch(line) {
                Dispatch::Reply(message) => {
                    if sender.send(message).is_err() {
                        break;
                    }
                }
                Dispatch::ToolCall {
                    id,
                    name,
                    arguments,
                } => {
                    let tools = Arc::clone(&self.tools);
                    let sender = sender.clone();
                    calls.spawn(async move {
                        let message = call_tool(&tools, id, &name, &arguments).await;
                        if sender.send(message).is_err() {
                            warn!(tool = %name, "response dropped, writer is gone");
                        }
                    });
                }
                Dispatch::Silent => {}
            }
        }
        while let Some(joined) = calls.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "tool call task failed");
            }
        }
        drop(sender);
        writer_task.await.map_err(std::io::Error::other)??;
        Ok(())
    }

    fn dispatch(&self, line: &str) -> Dispatch {
        let j: Value = match serde_json::from_str(line) {
            Ok(j) => j,
            Err(e) => return Dispatch::Reply(JsonRpcError::parse_error(e.to_string()).into()),
        };
        let raw_id = j.get("id").cloned().unwrap_or(Value::Null);
        let request: JsonRpcRequest = match serde_json::from_value(j) {
            Ok(request) => request,
            Err(e) => {
                return Dispatch::Reply(JsonRpcError::invalid_request(raw_id, e.to_string()).into())
            }
        };
        if !request.is_valid() {
            return Dispatch::Reply(
                JsonRpcError::invalid_request(request.id(), "jsonrpc must be '2.0'").into(),
            );
        }
        debug!(method = %request.method, "request");
        if request.is_notification() {
            return Dispatch::Silent;
        }
        let id = request.id();
        let params = request.params.unwrap_or(Value::Null);
        let reply: Outgoing = match request.method.as_str() {
            "initialize" => self.initialize(id, &params),
            "ping" => JsonRpcResponse::new(id, json!({})).into(),
            "tools/list" => {
                JsonRpcResponse::new(id, json!({"tools": self.tools.definitions()})).into()
            }
            "tools/call" => return tool_call(id, &params),
            "prompts/list" => {
                JsonRpcResponse::new(id, json!({"prompts": [prompt_definition()]})).into()
            }
            "prompts/get" => prompts_get(id, &params),
            method => JsonRpcError::method_not_found(id, method).into(),
        };
        Dispatch::Reply(reply)
    }

    fn initialize(&self, id: Value, params: &Value) -> Outgoing {
        info!(
            client = params["clientInfo"]["name"].as_str().unwrap_or_default(),
            tools = self.tool_count(),
            "initialize"
        );
        JsonRpcResponse::new(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": {"listChanged": false},
                    "prompts": {"listChanged": false}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
        .into()
    }
}

async fn write_messages<W: AsyncWrite + Unpin>(
    mut receiver: UnboundedReceiver<Outgoing>,
    mut writer: W,
) -> Result<(), WikidataError> {
    while let Some(message) = receiver.recv().await {
        let mut line = serde_json::to_string(&message)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

fn tool_call(id: Value, params: &Value) -> Dispatch {
    let Some(name) = params["name"].as_str() else {
        return Dispatch::Reply(JsonRpcError::invalid_params(id, "Missing tool name").into());
    };
    let arguments = match params.get("arguments") {
        None | Some(Value::Null) => json!({}),
        Some(arguments) => arguments.to_owned(),
    };
    Dispatch::ToolCall {
        id,
        name: name.to_string(),
        arguments,
    }
}

async fn call_tool(tools: &WikidataTools, id: Value, name: &str, arguments: &Value) -> Outgoing {
    match tools.call(name, arguments).await {
        Ok(text) => JsonRpcResponse::new(
            id,
            json!({
                "content": [{"type": "text", "text": text}],
                "isError": false
            }),
        )
        .into(),
        Err(e) => {
            warn!(tool = name, error = %e, "rejected tool call");
            JsonRpcError::invalid_params(id, e.to_string()).into()
        }
    }
}

fn prompt_definition() -> Value {
    json!({
        "name": EXPLORE_WIKIDATA,
        "description": "Instruct the model to explore Wikidata without assumptions.",
        "arguments": [
            {"name": "query", "description": "The user's request.", "required": true}
        ]
    })
}

fn prompts_get(id: Value, params: &Value) -> Outgoing {
    let name = params["name"].as_str().unwrap_or_default();
    if name != EXPLORE_WIKIDATA {
        return JsonRpcError::invalid_params(id, format!("Unknown prompt: {name}")).into();
    }
    let Some(query) = params["arguments"]["query"].as_str() else {
        return JsonRpcError::invalid_params(id, "Missing prompt argument: query").into();
    };
    JsonRpcResponse::new(
        id,
        json!({
            "description": "Instruct the model to explore Wikidata without assumptions.",
            "messages": [{
                "role": "user",
                "content": {"type": "text", "text": explore_wikidata(query)}
            }]
        }),
    )
    .into()
}

/// The text of the `explore_wikidata` prompt.
pub fn explore_wikidata(query: &str) -> String {
    format!(
        "You are an assistant that explores Wikidata on behalf of the user.
The user's request is: '{query}'.

Do not rely on prior knowledge of Wikidata identifiers or schema. Retrieve information with the provided tools.

Follow this workflow:
1. Identify candidate items
    - If the request is a name or title, start with a keyword search (search_items).
    - If the request is a concept or description, start with a vector search if available.
    - Collect a few candidate QIDs and PIDs to examine.

2. Inspect entity structure
    - Retrieve the statements of several representative QIDs (get_statements).
    - Identify which PIDs represent the relationships you care about.
    - Look for patterns across items: which properties repeat and how values are modeled.

3. Refine with statement details
    - When qualifiers, deprecated values or references matter, use get_statement_values for one entity and property.
    - Use get_instance_and_subclass_hierarchy to see what kind of thing an entity is.
    - If the statements already answer the request, stop and present the results.

4. Write and test SPARQL
    - Construct and run a query with execute_sparql using the QIDs and PIDs you found.
    - Check the rows for missing values, unexpected types or empty columns.
    - Refine the query and repeat until the results are satisfactory.
"
    )
}
