//! Configuration validation utilities for the review workflow.
//!
//! This module provides a small framework for validating TOML configuration
//! fragments before an implementation is constructed from them. It supports
//! nested schemas, custom validators, and detailed error reporting.

use thiserror::Error;

/// Errors that can occur during configuration validation.
#[derive(Debug, Error)]
pub enum ValidationError {
	/// Error that occurs when a required field is missing.
	#[error("Missing required field: {0}")]
	MissingField(String),
	/// Error that occurs when a field has an invalid value.
	#[error("Invalid value for field '{field}': {message}")]
	InvalidValue { field: String, message: String },
	/// Error that occurs when field type is incorrect.
	#[error("Type mismatch for field '{field}': expected {expected}, got {actual}")]
	TypeMismatch {
		field: String,
		expected: String,
		actual: String,
	},
	/// Error that occurs when deserialization fails.
	#[error("Failed to deserialize config: {0}")]
	DeserializationError(String),
}

/// Represents the type of a configuration field.
#[derive(Debug)]
pub enum FieldType {
	/// A string value.
	String,
	/// An integer value with optional inclusive bounds.
	Integer {
		min: Option<i64>,
		max: Option<i64>,
	},
	/// A boolean value.
	Boolean,
	/// A nested table with its own schema.
	Table(Schema),
}

/// Type alias for field validator functions.
///
/// Validators run after type checking and return an error message if the
/// value fails a constraint the type alone cannot express.
pub type FieldValidator = Box<dyn Fn(&toml::Value) -> Result<(), String> + Send + Sync>;

/// A named field in a configuration schema.
pub struct Field {
	pub name: String,
	pub field_type: FieldType,
	pub validator: Option<FieldValidator>,
}

impl std::fmt::Debug for Field {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Field")
			.field("name", &self.name)
			.field("field_type", &self.field_type)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl Field {
	/// Creates a new field with the given name and type.
	pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
		Self {
			name: name.into(),
			field_type,
			validator: None,
		}
	}

	/// Adds a custom validator to this field.
	pub fn with_validator<F>(mut self, validator: F) -> Self
	where
		F: Fn(&toml::Value) -> Result<(), String> + Send + Sync + 'static,
	{
		self.validator = Some(Box::new(validator));
		self
	}
}

/// Defines a validation schema for a TOML configuration fragment.
///
/// A schema consists of required fields that must be present and optional
/// fields that may be present. Schemas nest through `FieldType::Table`.
#[derive(Debug)]
pub struct Schema {
	pub required: Vec<Field>,
	pub optional: Vec<Field>,
}

impl Schema {
	/// Creates a new schema with required and optional fields.
	pub fn new(required: Vec<Field>, optional: Vec<Field>) -> Self {
		Self { required, optional }
	}

	/// Validates a TOML value against this schema.
	///
	/// Checks that required fields are present, that every present field
	/// has the expected type, and runs custom validators where defined.
	pub fn validate(&self, config: &toml::Value) -> Result<(), ValidationError> {
		let table = config
			.as_table()
			.ok_or_else(|| ValidationError::TypeMismatch {
				field: "root".to_string(),
				expected: "table".to_string(),
				actual: config.type_str().to_string(),
			})?;

		for field in &self.required {
			let value = table
				.get(&field.name)
				.ok_or_else(|| ValidationError::MissingField(field.name.clone()))?;
			check_field(field, value)?;
		}

		for field in &self.optional {
			if let Some(value) = table.get(&field.name) {
				check_field(field, value)?;
			}
		}

		Ok(())
	}
}

/// Type-checks one field and runs its custom validator if present.
fn check_field(field: &Field, value: &toml::Value) -> Result<(), ValidationError> {
	validate_field_type(&field.name, value, &field.field_type)?;

	if let Some(validator) = &field.validator {
		validator(value).map_err(|msg| ValidationError::InvalidValue {
			field: field.name.clone(),
			message: msg,
		})?;
	}

	Ok(())
}

/// Validates that a value matches the expected field type.
fn validate_field_type(
	field_name: &str,
	value: &toml::Value,
	expected_type: &FieldType,
) -> Result<(), ValidationError> {
	match expected_type {
		FieldType::String => {
			if !value.is_str() {
				return Err(ValidationError::TypeMismatch {
					field: field_name.to_string(),
					expected: "string".to_string(),
					actual: value.type_str().to_string(),
				});
			}
		},
		FieldType::Integer { min, max } => {
			let int_val = value
				.as_integer()
				.ok_or_else(|| ValidationError::TypeMismatch {
					field: field_name.to_string(),
					expected: "integer".to_string(),
					actual: value.type_str().to_string(),
				})?;

			if let Some(min_val) = min {
				if int_val < *min_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is less than minimum {}", int_val, min_val),
					});
				}
			}

			if let Some(max_val) = max {
				if int_val > *max_val {
					return Err(ValidationError::InvalidValue {
						field: field_name.to_string(),
						message: format!("Value {} is greater than maximum {}", int_val, max_val),
					});
				}
			}
		},
		FieldType::Boolean => {
			if !value.is_bool() {
				return Err(ValidationError::TypeMismatch {
					field: field_name.to_string(),
					expected: "boolean".to_string(),
					actual: value.type_str().to_string(),
				});
			}
		},
		FieldType::Table(schema) => {
			schema.validate(value).map_err(|e| match e {
				ValidationError::MissingField(f) => {
					ValidationError::MissingField(format!("{}.{}", field_name, f))
				},
				ValidationError::InvalidValue { field, message } => ValidationError::InvalidValue {
					field: format!("{}.{}", field_name, field),
					message,
				},
				ValidationError::TypeMismatch {
					field,
					expected,
					actual,
				} => ValidationError::TypeMismatch {
					field: format!("{}.{}", field_name, field),
					expected,
					actual,
				},
				other => other,
			})?;
		},
	}

	Ok(())
}

/// Trait defining a configuration schema that can validate TOML values.
///
/// Implementations use this to declare their configuration requirements so
/// a fragment can be checked before the implementation is constructed.
pub trait ConfigSchema: Send + Sync {
	/// Validates a TOML configuration value against this schema.
	fn validate(&self, config: &toml::Value) -> Result<(), ValidationError>;
}

#[cfg(test)]
mod tests {
	use super::*;

	fn schema() -> Schema {
		Schema::new(
			vec![Field::new("base_url", FieldType::String)],
			vec![Field::new(
				"timeout_seconds",
				FieldType::Integer {
					min: Some(1),
					max: Some(300),
				},
			)],
		)
	}

	#[test]
	fn missing_required_field_is_reported() {
		let config: toml::Value = toml::from_str("timeout_seconds = 5").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::MissingField(f) if f == "base_url"));
	}

	#[test]
	fn integer_bounds_are_enforced() {
		let config: toml::Value =
			toml::from_str("base_url = \"http://localhost\"\ntimeout_seconds = 0").unwrap();
		let err = schema().validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::InvalidValue { field, .. } if field == "timeout_seconds"));
	}

	#[test]
	fn custom_validator_runs_after_type_check() {
		let schema = Schema::new(
			vec![
				Field::new("base_url", FieldType::String).with_validator(|value| {
					let url = value.as_str().unwrap_or_default();
					if url.starts_with("http") {
						Ok(())
					} else {
						Err("must start with http".to_string())
					}
				}),
			],
			vec![],
		);

		let config: toml::Value = toml::from_str("base_url = \"ftp://example\"").unwrap();
		let err = schema.validate(&config).unwrap_err();
		assert!(matches!(err, ValidationError::InvalidValue { .. }));
	}
}
