//! Google Generative Language API wire format types

use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

// -- Response types --

/// Google `generateContent` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleResponse {
    /// Response candidates; only the first is assembled
    #[serde(default)]
    pub candidates: Vec<GoogleCandidate>,
    /// Model version that produced the response
    #[serde(default)]
    pub model_version: Option<String>,
}

/// Single response candidate
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCandidate {
    /// Generated content
    #[serde(default)]
    pub content: Option<GoogleResponseContent>,
    /// Reason generation stopped
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Content of a response candidate
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleResponseContent {
    /// Role (always "model")
    #[serde(default)]
    pub role: Option<String>,
    /// Parts in emission order
    #[serde(default)]
    pub parts: Vec<GoogleResponsePart>,
}

/// Part of a response
///
/// Flat rather than untagged so `args` can stay a raw value and a
/// `thoughtSignature` can ride on any kind of part.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleResponsePart {
    /// Text, or a thought summary when `thought` is set
    #[serde(default)]
    pub text: Option<String>,
    /// Marks `text` as a thought summary
    #[serde(default)]
    pub thought: bool,
    /// Signature over the reasoning that led to this part
    #[serde(default)]
    pub thought_signature: Option<String>,
    /// Function call
    #[serde(default)]
    pub function_call: Option<GoogleResponseFunctionCall>,
}

/// Function call in a response part
#[derive(Debug, Clone, Deserialize)]
pub struct GoogleResponseFunctionCall {
    /// Call identifier, when the API supplies one
    #[serde(default)]
    pub id: Option<String>,
    /// Function name
    pub name: String,
    /// Arguments object, byte for byte
    #[serde(default)]
    pub args: Option<Box<RawValue>>,
}

// -- Request types --

/// History portion of a `generateContent` request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleRequestBody {
    /// Conversation contents
    pub contents: Vec<GoogleContent>,
    /// Generation settings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GoogleGenerationConfig>,
}

/// Content entry in a request
#[derive(Debug, Clone, Serialize)]
pub struct GoogleContent {
    /// Role ("user" or "model")
    pub role: String,
    /// Content parts
    pub parts: Vec<GooglePart>,
}

/// Part of a request content entry
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GooglePart {
    /// Text content
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Marks `text` as a thought summary
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub thought: bool,
    /// Signature replayed exactly as received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
    /// Function call made by the model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GoogleFunctionCall>,
    /// Function result supplied by the caller
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_response: Option<GoogleFunctionResponse>,
}

/// Function call in a request part
#[derive(Debug, Clone, Serialize)]
pub struct GoogleFunctionCall {
    /// Call identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name
    pub name: String,
    /// Arguments object
    pub args: Box<RawValue>,
}

/// Function response in a request part
#[derive(Debug, Clone, Serialize)]
pub struct GoogleFunctionResponse {
    /// Identifier of the call being answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name
    pub name: String,
    /// Response object
    pub response: Box<RawValue>,
}

/// Generation configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleGenerationConfig {
    /// Thinking settings
    pub thinking_config: GoogleThinkingConfig,
}

/// Thinking settings
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleThinkingConfig {
    /// Whether thought summaries are returned
    pub include_thoughts: bool,
}
