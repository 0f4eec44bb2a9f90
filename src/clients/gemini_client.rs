use reqwest;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user_text(text: &str) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::text(text)],
        }
    }

    pub fn model_text(text: &str) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::text(text)],
        }
    }

    // Tool results travel back to the model as a function response part on a
    // model-role turn, wrapped in a {"result": ...} object.
    pub fn function_result(name: &str, result: &str) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part {
                function_response: Some(FunctionResponse {
                    name: name.to_string(),
                    response: json!({ "result": result }),
                }),
                ..Default::default()
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(rename = "functionCall", skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(rename = "functionResponse", skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    pub fn function_call(name: &str, args: Value) -> Self {
        Self {
            function_call: Some(FunctionCall {
                name: name.to_string(),
                args,
            }),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

// The fixed set of operations declared to the model on every request.
fn function_declarations() -> Value {
    json!([
        {
            "name": "add_event",
            "description": "Add a new event to the schedule. For recurring events, specify the recurring details.",
            "parameters": {
                "type": "object",
                "properties": {
                    "description": {"type": "string", "description": "Description of the event"},
                    "date": {"type": "string", "description": "Date of the event (for single events)"},
                    "time": {"type": "string", "description": "Time of the event"},
                    "recurring": {
                        "type": "object",
                        "description": "Details for recurring events",
                        "properties": {
                            "frequency": {"type": "string", "description": "e.g., weekly"},
                            "days": {"type": "array", "items": {"type": "string"}, "description": "List of days, e.g., ['monday', 'tuesday']"},
                            "count": {"type": "integer", "description": "Number of occurrences"}
                        }
                    }
                },
                "required": ["description"]
            }
        },
        {
            "name": "list_events",
            "description": "List all events in the schedule, optionally filtered by date",
            "parameters": {
                "type": "object",
                "properties": {
                    "date": {"type": "string", "description": "Optional date filter in YYYY-MM-DD format"}
                }
            }
        },
        {
            "name": "remove_event",
            "description": "Remove an event by index (0-based)",
            "parameters": {
                "type": "object",
                "properties": {"index": {"type": "integer", "description": "Index of the event to remove"}},
                "required": ["index"]
            }
        },
        {
            "name": "get_current_date",
            "description": "Get the current date in YYYY-MM-DD format",
            "parameters": {"type": "object", "properties": {}}
        },
        {
            "name": "update_user_profile",
            "description": "Update user profile with any information about the user (name, job, preferences, goals, interests, habits, personality, etc.). Provide updates as key-value pairs.",
            "parameters": {
                "type": "object",
                "properties": {"updates": {"type": "object", "description": "Key-value pairs to merge into the profile"}},
                "required": ["updates"]
            }
        },
        {
            "name": "get_user_profile",
            "description": "Get the current user profile information",
            "parameters": {"type": "object", "properties": {}}
        }
    ])
}

pub async fn generate_content(
    contents: Vec<Content>,
    api_key: &str,
    model: &str,
) -> Result<Vec<Part>, Box<dyn std::error::Error + Send + Sync>> {
    let request = GenerateContentRequest {
        contents,
        tools: vec![json!({ "functionDeclarations": function_declarations() })],
    };

    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/{}:generateContent", GEMINI_BASE_URL, model))
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let text = response.text().await?; // read the body once

    if !status.is_success() {
        // Non-2xx response — show raw body for debugging
        println!("Error {}: {}", status, text);
        return Err(format!("Request failed with status {}", status).into());
    }

    let parsed: GenerateContentResponse = serde_json::from_str(&text)
        .map_err(|e| format!("Failed to parse JSON: {}\nRaw body: {}", e, text))?;

    let parts = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .unwrap_or_default();
    Ok(parts)
}
