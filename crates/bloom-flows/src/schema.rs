//! Runtime schemas for flow inputs and outputs.
//!
//! A schema declares the exact set of fields a flow accepts or produces.
//! Field descriptions are part of the behavioral contract: they are forwarded
//! to the generative backend as steering context, so changing a description
//! changes model behavior, not just documentation.
//!
//! Validation is an explicit runtime check over an untyped
//! `serde_json::Value`: tagged success or a [`ValidationError`] enumerating
//! every violated constraint. Unknown fields in the candidate value are
//! ignored, never rejected — model replies routinely carry extra descriptive
//! fields.

use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use crate::error::{ValidationError, Violation};

/// Basic type of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// A JSON number.
    Number,
    /// An ordered sequence of strings, possibly empty.
    TextList,
}

impl FieldKind {
    /// JSON type name used in the descriptor sent to the backend.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text => "string",
            FieldKind::Number => "number",
            FieldKind::TextList => "array of strings",
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Number => value.is_number(),
            FieldKind::TextList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        }
    }
}

/// Semantic constraint checked on top of the basic type.
///
/// Constraints are used on input fields only. Output fields get basic
/// type/presence checks and nothing more: a numeric field described as 0-1
/// is not range-checked, matching the upstream contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Text must contain at least one non-whitespace character.
    NonEmpty,
    /// Text must parse as an ISO-8601 calendar date (YYYY-MM-DD).
    IsoDate,
}

impl Constraint {
    fn check(&self, value: &Value) -> Result<(), &'static str> {
        // Type mismatches are reported by the kind check; a constraint on a
        // non-string value is vacuously satisfied here.
        let Some(text) = value.as_str() else {
            return Ok(());
        };
        match self {
            Constraint::NonEmpty => {
                if text.trim().is_empty() {
                    return Err("must not be empty");
                }
            }
            Constraint::IsoDate => {
                if NaiveDate::parse_from_str(text, "%Y-%m-%d").is_err() {
                    return Err("must be an ISO date (YYYY-MM-DD)");
                }
            }
        }
        Ok(())
    }
}

/// A single declared field: name, basic type, steering description, and an
/// optional input constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as it appears on the wire.
    pub name: String,
    /// Basic type of the field.
    pub kind: FieldKind,
    /// Natural-language description forwarded to the backend.
    pub description: String,
    /// Optional semantic constraint, input fields only.
    pub constraint: Option<Constraint>,
}

impl FieldSpec {
    /// Declare a text field.
    pub fn text(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text, description)
    }

    /// Declare a numeric field.
    pub fn number(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number, description)
    }

    /// Declare an ordered list-of-strings field.
    pub fn text_list(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, FieldKind::TextList, description)
    }

    fn new(name: impl Into<String>, kind: FieldKind, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            description: description.into(),
            constraint: None,
        }
    }

    /// Attach a constraint and return self for chaining.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraint = Some(constraint);
        self
    }
}

/// An ordered set of declared fields, all required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    /// Create a schema from its field declarations.
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self { fields }
    }

    /// The declared fields, in declaration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Check a candidate value against every declared field, collecting all
    /// violations rather than stopping at the first.
    pub fn validate(&self, candidate: &Value) -> Result<(), ValidationError> {
        let Some(object) = candidate.as_object() else {
            return Err(ValidationError::new(vec![Violation::new(
                "$",
                "expected an object",
            )]));
        };

        let mut violations = Vec::new();
        for field in &self.fields {
            match object.get(&field.name) {
                None => {
                    violations.push(Violation::new(&field.name, "required field is missing"));
                }
                Some(value) => {
                    if !field.kind.matches(value) {
                        violations.push(Violation::new(
                            &field.name,
                            format!("expected {}", field.kind.type_name()),
                        ));
                    } else if let Some(constraint) = field.constraint {
                        if let Err(message) = constraint.check(value) {
                            violations.push(Violation::new(&field.name, message));
                        }
                    }
                }
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(violations))
        }
    }

    /// Keep only declared fields of a value that already passed validation.
    /// Extra fields a model tacked on are dropped, not surfaced.
    pub fn project(&self, value: &Value) -> Value {
        let Some(object) = value.as_object() else {
            return Value::Object(Map::new());
        };
        let mut projected = Map::new();
        for field in &self.fields {
            if let Some(v) = object.get(&field.name) {
                projected.insert(field.name.clone(), v.clone());
            }
        }
        Value::Object(projected)
    }

    /// The shape descriptor handed to the generative backend alongside the
    /// prompt. Carries the per-field descriptions that steer the model.
    pub fn descriptor(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(
                field.name.clone(),
                json!({
                    "type": field.kind.type_name(),
                    "description": field.description,
                }),
            );
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": self.fields.iter().map(|f| f.name.clone()).collect::<Vec<_>>(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            FieldSpec::text("location", "The location").with_constraint(Constraint::NonEmpty),
            FieldSpec::text("startDate", "Start date").with_constraint(Constraint::IsoDate),
        ])
    }

    #[test]
    fn test_collects_every_violation() {
        let schema = sample_schema();
        let err = schema
            .validate(&json!({ "location": "  ", "startDate": "March 1st" }))
            .unwrap_err();

        assert_eq!(err.violations().len(), 2);
        assert!(err.mentions("location"));
        assert!(err.mentions("startDate"));
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let schema = sample_schema();
        schema
            .validate(&json!({
                "location": "Kyoto, Japan",
                "startDate": "2024-03-01",
                "note": "models add commentary fields",
            }))
            .unwrap();
    }

    #[test]
    fn test_non_object_is_a_single_root_violation() {
        let schema = sample_schema();
        let err = schema.validate(&json!("just a string")).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert!(err.mentions("$"));
    }

    #[test]
    fn test_descriptor_carries_descriptions() {
        let descriptor = sample_schema().descriptor();
        assert_eq!(
            descriptor["properties"]["location"]["description"],
            "The location"
        );
        assert_eq!(descriptor["required"][1], "startDate");
    }

    #[test]
    fn test_empty_text_list_is_valid() {
        let schema = Schema::new(vec![FieldSpec::text_list("satelliteDataUsed", "Sources")]);
        schema
            .validate(&json!({ "satelliteDataUsed": [] }))
            .unwrap();
    }

    #[test]
    fn test_mixed_list_fails_basic_type_check() {
        let schema = Schema::new(vec![FieldSpec::text_list("satelliteDataUsed", "Sources")]);
        let err = schema
            .validate(&json!({ "satelliteDataUsed": ["MODIS", 7] }))
            .unwrap_err();
        assert!(err.mentions("satelliteDataUsed"));
    }
}
