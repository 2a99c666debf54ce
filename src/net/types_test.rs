use super::*;
use serde_json::json;

fn s3_reference() -> Value {
    json!({
        "content": { "text": "{\"label\": \"Harbour map\"" },
        "location": { "type": "S3", "s3Location": { "uri": "s3://bucket/manifests/1.json" } }
    })
}

// =============================================================================
// ChatRequest
// =============================================================================

#[test]
fn chat_request_serializes_user_prompt() {
    let body = serde_json::to_value(ChatRequest { user_prompt: "Who painted this?" }).unwrap();
    assert_eq!(body, json!({ "user_prompt": "Who painted this?" }));
}

// =============================================================================
// ChatResponse
// =============================================================================

#[test]
fn chat_response_parses_references() {
    let raw = json!({
        "answer": "A map of the harbour.",
        "references": [s3_reference()],
        "session_id": "sess-9"
    });
    let resp: ChatResponse = serde_json::from_value(raw).unwrap();
    assert_eq!(resp.answer, "A map of the harbour.");
    assert_eq!(resp.session_id, "sess-9");
    assert_eq!(resp.references, vec![s3_reference()]);
}

#[test]
fn chat_response_missing_optional_fields_default() {
    let resp: ChatResponse = serde_json::from_value(json!({ "answer": "ok" })).unwrap();
    assert!(resp.references.is_empty());
    assert!(resp.session_id.is_empty());
}

#[test]
fn chat_response_requires_answer() {
    let result = serde_json::from_value::<ChatResponse>(json!({ "references": [], "session_id": "x" }));
    assert!(result.is_err());
}

#[test]
fn chat_response_keeps_extra_reference_fields() {
    let reference = json!({
        "content": { "text": "chunk" },
        "location": { "type": "S3", "s3Location": { "uri": "s3://b/k" } },
        "metadata": { "x-amz-bedrock-kb-source-uri": "s3://b/k", "score": 0.82 }
    });
    let resp: ChatResponse =
        serde_json::from_value(json!({ "answer": "a", "references": [reference.clone()] })).unwrap();
    assert_eq!(resp.references, vec![reference]);
}

#[test]
fn chat_response_accepts_non_s3_location() {
    let reference = json!({
        "content": { "text": "page text" },
        "location": { "type": "WEB", "webLocation": { "url": "https://example.test/page" } }
    });
    let resp: ChatResponse =
        serde_json::from_value(json!({ "answer": "a", "references": [reference.clone()] })).unwrap();
    assert_eq!(resp.references, vec![reference]);
}

#[test]
fn chat_response_accepts_reference_without_location() {
    let reference = json!({ "content": { "text": "orphan chunk" } });
    let resp: ChatResponse =
        serde_json::from_value(json!({ "answer": "a", "references": [reference.clone()] })).unwrap();
    assert_eq!(resp.references, vec![reference]);
}

// =============================================================================
// s3_references
// =============================================================================

#[test]
fn s3_references_skips_other_shapes() {
    let resp = ChatResponse {
        answer: "a".into(),
        references: vec![
            s3_reference(),
            json!({ "content": { "text": "t" }, "location": { "type": "WEB", "webLocation": {} } }),
            json!({ "content": { "text": "t" } }),
        ],
        session_id: String::new(),
    };
    let typed = resp.s3_references();
    assert_eq!(typed.len(), 1);
    assert_eq!(typed[0].content.text, "{\"label\": \"Harbour map\"");
    assert_eq!(typed[0].location.s3_location.uri, "s3://bucket/manifests/1.json");
}

#[test]
fn s3_reference_ignores_extra_fields() {
    let mut value = s3_reference();
    value["metadata"] = json!({ "score": 1 });
    let resp = ChatResponse { answer: "a".into(), references: vec![value], session_id: String::new() };
    assert_eq!(resp.s3_references().len(), 1);
}
