//! Structural classification of loaded board artifacts.
//!
//! # Invariants
//! - Classification inspects shape only; it never decodes entity fields.
//! - Every input maps to exactly one `LoadedShape` variant.

use serde_json::{Map, Value};

/// Loaded artifact classified by structure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoadedShape<'a> {
    /// Legacy flat list of `{id, text, completed, createdAt}` items.
    LegacyList(&'a [Value]),
    /// Column + task object where at least one task lacks `order`, or the
    /// `tasks` field is missing.
    Unordered(&'a Map<String, Value>),
    /// Column + task object where every task carries a numeric `order`.
    Current(&'a Map<String, Value>),
    /// Anything else; carries a short reason for diagnostics.
    Unrecognized(&'static str),
}

/// Shape label reported after migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    /// No prior artifact exists.
    Missing,
    LegacyList,
    Unordered,
    Current,
    Unrecognized,
}

impl ShapeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::LegacyList => "legacy_list",
            Self::Unordered => "unordered",
            Self::Current => "current",
            Self::Unrecognized => "unrecognized",
        }
    }
}

impl LoadedShape<'_> {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Self::LegacyList(_) => ShapeKind::LegacyList,
            Self::Unordered(_) => ShapeKind::Unordered,
            Self::Current(_) => ShapeKind::Current,
            Self::Unrecognized(_) => ShapeKind::Unrecognized,
        }
    }
}

/// Classifies a loaded JSON value into one recognized shape.
pub fn classify(value: &Value) -> LoadedShape<'_> {
    match value {
        Value::Array(items) => LoadedShape::LegacyList(items.as_slice()),
        Value::Object(object) => match object.get("columns") {
            Some(Value::Array(_)) => {
                if every_task_has_order(object) {
                    LoadedShape::Current(object)
                } else {
                    LoadedShape::Unordered(object)
                }
            }
            Some(_) => LoadedShape::Unrecognized("columns is not an array"),
            None => LoadedShape::Unrecognized("object without columns"),
        },
        Value::Null => LoadedShape::Unrecognized("null document"),
        _ => LoadedShape::Unrecognized("scalar document"),
    }
}

fn every_task_has_order(object: &Map<String, Value>) -> bool {
    match object.get("tasks") {
        Some(Value::Array(tasks)) => tasks
            .iter()
            .all(|task| task.get("order").is_some_and(Value::is_number)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{classify, ShapeKind};
    use serde_json::json;

    #[test]
    fn classifies_each_known_shape() {
        let legacy = json!([{ "id": "a", "text": "x", "completed": false, "createdAt": 1 }]);
        assert_eq!(classify(&legacy).kind(), ShapeKind::LegacyList);

        let unordered = json!({
            "columns": [{ "id": "new", "title": "New" }],
            "tasks": [{ "id": "t", "text": "x", "columnId": "new", "createdAt": 1 }]
        });
        assert_eq!(classify(&unordered).kind(), ShapeKind::Unordered);

        let no_tasks = json!({ "columns": [] });
        assert_eq!(classify(&no_tasks).kind(), ShapeKind::Unordered);

        let current = json!({
            "columns": [{ "id": "new", "title": "New" }],
            "tasks": [{ "id": "t", "text": "x", "columnId": "new", "createdAt": 1, "order": 0 }]
        });
        assert_eq!(classify(&current).kind(), ShapeKind::Current);
    }

    #[test]
    fn unknown_documents_are_unrecognized() {
        assert_eq!(classify(&json!(null)).kind(), ShapeKind::Unrecognized);
        assert_eq!(classify(&json!("board")).kind(), ShapeKind::Unrecognized);
        assert_eq!(classify(&json!({ "todos": [] })).kind(), ShapeKind::Unrecognized);
        assert_eq!(
            classify(&json!({ "columns": "new" })).kind(),
            ShapeKind::Unrecognized
        );
    }
}
