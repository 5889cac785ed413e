//! Declared response shapes and the parse-or-empty fallback.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldType {
    String,
    Number,
    Integer,
    Boolean,
    StringList,
}

impl FieldType {
    fn schema(&self) -> Value {
        match self {
            FieldType::String => json!({ "type": "STRING" }),
            FieldType::Number => json!({ "type": "NUMBER" }),
            FieldType::Integer => json!({ "type": "INTEGER" }),
            FieldType::Boolean => json!({ "type": "BOOLEAN" }),
            FieldType::StringList => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeField {
    pub name: &'static str,
    pub ty: FieldType,
}

/// Field names and primitive types the model is asked to honor.
/// Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseShape {
    pub fields: Vec<ShapeField>,
    /// Answer is an array of such objects rather than a single one.
    pub list: bool,
}

impl ResponseShape {
    pub fn object(fields: &[(&'static str, FieldType)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|&(name, ty)| ShapeField { name, ty })
                .collect(),
            list: false,
        }
    }

    pub fn list_of(fields: &[(&'static str, FieldType)]) -> Self {
        Self {
            list: true,
            ..Self::object(fields)
        }
    }

    /// OpenAPI-style schema in the dialect the Gemini API accepts.
    pub fn to_schema(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(field.name.to_string(), field.ty.schema());
        }
        let required: Vec<&str> = self.fields.iter().map(|f| f.name).collect();
        let object = json!({
            "type": "OBJECT",
            "properties": properties,
            "required": required,
        });
        if self.list {
            json!({ "type": "ARRAY", "items": object })
        } else {
            object
        }
    }
}

/// Parse a JSON array answer; anything unparseable yields an empty list.
pub fn parse_list<T: DeserializeOwned>(text: &str) -> Vec<T> {
    match serde_json::from_str::<Vec<T>>(strip_fences(text)) {
        Ok(items) => items,
        Err(err) => {
            debug!(error = %err, "structured response did not match shape, using empty result");
            Vec::new()
        }
    }
}

/// Models occasionally wrap JSON in a markdown fence.
fn strip_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
