use crate::utils::AppError;
use mongodb::bson::{self, oid::ObjectId, Bson, Document};
use serde_json::Value;

/// Converte o id recebido na rota em ObjectId
pub fn parse_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::BadIdentifier(raw.to_string()))
}

/// Turns a JSON request body into a BSON document ready for storage.
///
/// Only objects are accepted. A client supplied `_id` is dropped: identifiers
/// always come from the store (or from the path, for upserts).
pub fn document_from_body(body: Value) -> Result<Document, AppError> {
    if !body.is_object() {
        return Err(AppError::InvalidBody("expected a JSON object".to_string()));
    }

    let mut document = bson::to_document(&body)?;
    document.remove("_id");
    Ok(document)
}

/// Renders a stored document as JSON, with `_id` as a plain hex string.
pub fn document_to_json(mut document: Document) -> Value {
    if let Ok(hex) = document.get_object_id("_id").map(|id| id.to_hex()) {
        document.insert("_id", hex);
    }
    Bson::Document(document).into_relaxed_extjson()
}

pub fn documents_to_json(documents: Vec<Document>) -> Vec<Value> {
    documents.into_iter().map(document_to_json).collect()
}

/// Looks up a string through a dotted path such as `user_info.email`.
pub fn string_at<'a>(document: &'a Document, path: &str) -> Option<&'a str> {
    let mut current = document;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        if segments.peek().is_none() {
            return current.get_str(segment).ok();
        }
        current = current.get_document(segment).ok()?;
    }
    None
}

/// Walks a dotted path and returns whatever sits at the end of it. When an
/// intermediate segment holds something other than a sub-document (an array,
/// a scalar) that value is returned instead, so callers can tell "absent"
/// apart from "present with another shape".
pub fn value_at<'a>(document: &'a Document, path: &str) -> Option<&'a Bson> {
    let mut current = document;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let value = current.get(segment)?;
        match value {
            Bson::Document(inner) if segments.peek().is_some() => current = inner,
            _ => return Some(value),
        }
    }
    None
}

/// Equality match on a dotted path the way MongoDB evaluates it: arrays met
/// along the way (or at the leaf) match when any element does.
pub fn matches_at(document: &Document, path: &str, expected: &str) -> bool {
    let segments: Vec<&str> = path.split('.').collect();
    match segments.split_first() {
        Some((head, rest)) => document
            .get(*head)
            .map(|value| path_matches(value, rest, expected))
            .unwrap_or(false),
        None => false,
    }
}

fn path_matches(value: &Bson, segments: &[&str], expected: &str) -> bool {
    match (value, segments.split_first()) {
        (Bson::Array(items), _) => items.iter().any(|item| path_matches(item, segments, expected)),
        (Bson::String(s), None) => s == expected,
        (Bson::Document(inner), Some((head, rest))) => inner
            .get(*head)
            .map(|next| path_matches(next, rest, expected))
            .unwrap_or(false),
        _ => false,
    }
}
