//! GraphQL document building.
//!
//! Mutation inputs are plain serde structs. They are rendered into the
//! document as GraphQL input literals by [`to_input_literal`], which escapes
//! strings the same way JSON does, so a value can never break out of its
//! literal.

use crate::errors::{GitHubError, GitHubResult};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

/// GraphQL request payload.
#[derive(Debug, Clone, Serialize)]
pub struct GraphQLRequest {
    /// The GraphQL query or mutation document.
    pub query: String,
}

impl GraphQLRequest {
    /// Wraps a document.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
        }
    }
}

/// Renders a JSON value as a GraphQL input literal.
///
/// Object keys are emitted bare (`{pattern: "main"}`); strings are quoted
/// with double quotes.
pub fn to_input_literal(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string_literal(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(to_input_literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(fields) => {
            let fields: Vec<String> = fields
                .iter()
                .map(|(key, value)| format!("{}: {}", key, to_input_literal(value)))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }
    }
}

/// Quotes a string as a GraphQL string literal.
pub fn string_literal(s: &str) -> String {
    // JSON string escaping is a subset of GraphQL's.
    Value::String(s.to_string()).to_string()
}

/// A single-field mutation: `mutation { name(input: {...}) { selection } }`.
#[derive(Debug, Clone)]
pub struct MutationDocument {
    name: &'static str,
    input: Value,
    selection: &'static str,
}

impl MutationDocument {
    /// Builds a mutation from a typed input.
    pub fn new<I: Serialize>(
        name: &'static str,
        input: &I,
        selection: &'static str,
    ) -> GitHubResult<Self> {
        let input = serde_json::to_value(input).map_err(|e| {
            GitHubError::new(
                crate::errors::GitHubErrorKind::InvalidParameter,
                format!("Failed to serialize {} input: {}", name, e),
            )
        })?;

        Ok(Self {
            name,
            input,
            selection,
        })
    }

    /// Gets the mutation field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Renders the document.
    pub fn render(&self) -> String {
        format!(
            "mutation {{ {}(input: {}) {{ {} }} }}",
            self.name,
            to_input_literal(&self.input),
            self.selection
        )
    }
}

/// Walks `path` inside a decoded GraphQL response and deserializes the leaf.
pub fn extract<T: DeserializeOwned>(mut value: Value, path: &[&str]) -> GitHubResult<T> {
    for (depth, key) in path.iter().enumerate() {
        value = match value {
            Value::Object(mut map) => map.remove(*key).unwrap_or(Value::Null),
            _ => Value::Null,
        };
        if value.is_null() {
            return Err(GitHubError::deserialization(format!(
                "GraphQL response has no {}",
                path[..=depth].join(".")
            )));
        }
    }

    serde_json::from_value(value).map_err(|e| {
        GitHubError::deserialization(format!(
            "Failed to deserialize GraphQL {}: {}",
            path.join("."),
            e
        ))
    })
}
