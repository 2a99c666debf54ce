//! Wire types for the chat service.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// REQUEST
// =============================================================================

/// Body of `POST {base}/chat`.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub user_prompt: &'a str,
}

// =============================================================================
// RESPONSE
// =============================================================================

/// Successful answer returned by the chat service.
///
/// References are kept exactly as received. Their shape varies by storage
/// kind and may carry extra fields, so they are never validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub answer: String,
    #[serde(default)]
    pub references: Vec<Value>,
    #[serde(default)]
    pub session_id: String,
}

impl ChatResponse {
    /// References that match the S3 shape. Anything else is skipped.
    #[must_use]
    pub fn s3_references(&self) -> Vec<Reference> {
        self.references
            .iter()
            .filter_map(|value| Reference::deserialize(value).ok())
            .filter(|reference| reference.location.kind == "S3")
            .collect()
    }
}

/// A supporting document chunk stored in S3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub content: ReferenceContent,
    pub location: ReferenceLocation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceContent {
    /// The chunk the knowledge base matched. It may resemble a structured
    /// manifest but is almost never valid JSON, so it is shown verbatim.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceLocation {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "s3Location")]
    pub s3_location: S3Location,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct S3Location {
    pub uri: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
