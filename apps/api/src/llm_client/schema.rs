//! Response schemas in the Gemini OpenAPI subset, used to coerce model output shape.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    Object,
    Boolean,
    Integer,
    String,
    Array,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub kind: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Keeps the model emitting fields in declaration order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
}

impl Schema {
    fn scalar(kind: SchemaType) -> Self {
        Self {
            kind,
            items: None,
            properties: BTreeMap::new(),
            required: Vec::new(),
            property_ordering: Vec::new(),
        }
    }

    pub fn boolean() -> Self {
        Self::scalar(SchemaType::Boolean)
    }

    pub fn integer() -> Self {
        Self::scalar(SchemaType::Integer)
    }

    pub fn string() -> Self {
        Self::scalar(SchemaType::String)
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::scalar(SchemaType::Array)
        }
    }

    /// An object whose listed fields are all required.
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, Schema)>) -> Self {
        let mut schema = Self::scalar(SchemaType::Object);
        for (name, field) in fields {
            schema.required.push(name.to_string());
            schema.property_ordering.push(name.to_string());
            schema.properties.insert(name.to_string(), field);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_object_schema_marks_every_field_required() {
        let schema = Schema::object([
            ("score", Schema::integer()),
            ("missing_skills", Schema::array_of(Schema::string())),
        ]);

        assert_eq!(
            serde_json::to_value(&schema).unwrap(),
            json!({
                "type": "OBJECT",
                "properties": {
                    "score": {"type": "INTEGER"},
                    "missing_skills": {"type": "ARRAY", "items": {"type": "STRING"}}
                },
                "required": ["score", "missing_skills"],
                "propertyOrdering": ["score", "missing_skills"]
            })
        );
    }

    #[test]
    fn test_scalar_schema_omits_empty_fields() {
        assert_eq!(
            serde_json::to_value(Schema::boolean()).unwrap(),
            json!({"type": "BOOLEAN"})
        );
    }
}
