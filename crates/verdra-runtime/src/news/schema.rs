//! JSON Schema validation for LLM extraction output.
//!
//! The extractor constrains the model to a fixed JSON shape; anything that
//! does not validate is treated as "no event", never as a failure.

use std::sync::OnceLock;
use thiserror::Error;

/// Embedded event schema (loaded at compile time).
const EVENT_SCHEMA_JSON: &str = include_str!("../../schemas/event.schema.json");

/// Compiled JSON Schema validator (initialized once, reused).
static COMPILED_SCHEMA: OnceLock<Result<jsonschema::Validator, String>> = OnceLock::new();

/// Errors from schema loading.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to load event schema: {0}")]
    LoadError(String),
}

fn get_validator() -> Result<&'static jsonschema::Validator, SchemaError> {
    let result = COMPILED_SCHEMA.get_or_init(|| {
        let schema_value: serde_json::Value = match serde_json::from_str(EVENT_SCHEMA_JSON) {
            Ok(v) => v,
            Err(e) => return Err(format!("Invalid schema JSON: {}", e)),
        };

        match jsonschema::options().build(&schema_value) {
            Ok(v) => Ok(v),
            Err(e) => Err(format!("Failed to compile schema: {}", e)),
        }
    });

    match result {
        Ok(v) => Ok(v),
        Err(e) => Err(SchemaError::LoadError(e.clone())),
    }
}

/// Validate an extracted event JSON value against the schema.
///
/// Returns `Ok(())` if valid, or the list of validation error messages.
pub fn validate_event_json(event_json: &serde_json::Value) -> Result<(), Vec<String>> {
    let validator = get_validator().map_err(|e| vec![e.to_string()])?;

    let errors: Vec<String> = validator
        .iter_errors(event_json)
        .map(|e| format!("{} at {}", e, e.instance_path))
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_event_passes_schema() {
        let value = serde_json::json!({
            "event_type": "fine",
            "description": "Regulators fined the company $5M",
            "date": "2023-06-15",
            "severity": "critical",
            "financial_impact": 5000000.0,
            "keywords": ["fine", "wastewater"],
            "confidence": 0.9
        });
        assert!(validate_event_json(&value).is_ok());
    }

    #[test]
    fn missing_required_field_fails() {
        let value = serde_json::json!({
            "event_type": "fine",
            "description": "Fined"
            // Missing: date, severity, confidence
        });
        let errors = validate_event_json(&value).unwrap_err();
        assert!(!errors.is_empty());
    }

    #[test]
    fn null_financial_impact_is_allowed() {
        let value = serde_json::json!({
            "event_type": "lawsuit",
            "description": "Class action filed",
            "date": "2023-03-01",
            "severity": "high",
            "financial_impact": null,
            "confidence": 0.7
        });
        assert!(validate_event_json(&value).is_ok());
    }

    #[test]
    fn empty_description_fails() {
        let value = serde_json::json!({
            "event_type": "fine",
            "description": "",
            "date": "2023-06-15",
            "severity": "low",
            "confidence": 0.6
        });
        assert!(validate_event_json(&value).is_err());
    }

    #[test]
    fn non_numeric_confidence_fails() {
        let value = serde_json::json!({
            "event_type": "fine",
            "description": "Fined",
            "date": "2023-06-15",
            "severity": "low",
            "confidence": "high"
        });
        assert!(validate_event_json(&value).is_err());
    }
}
