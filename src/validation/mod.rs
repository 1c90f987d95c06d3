//! Declarative validation of JSON request arguments.
//!
//! A [`Schema`] lists the fields an endpoint accepts, whether each is required, and
//! which JSON kinds it may hold. [`Schema::check`] collects every problem at once and
//! returns the filtered [`Args`] on success.

use std::fmt;

use serde_json::{Map, Value};

use crate::errors::{ErrorReason, InputError};

/// JSON value kinds a field may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Str,
    /// Integral number. Floats and booleans do not match.
    Int,
    Null,
}

impl Kind {
    /// Check if `value` is of this kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Kind::Str => value.is_string(),
            Kind::Int => value.is_i64(),
            Kind::Null => value.is_null(),
        }
    }
}

/// Declaration of a single field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub kinds: Vec<Kind>,
    pub optional: bool,
}

/// Mistake in a schema declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Field accepts no kind at all.
    NoKinds(&'static str),
    /// Field declared more than once.
    Duplicate(&'static str),
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::NoKinds(name) => write!(f, "field `{name}` accepts no kinds"),
            SchemaError::Duplicate(name) => write!(f, "field `{name}` declared twice"),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<(&'static str, FieldSpec)>,
}

impl SchemaBuilder {
    /// Declare a required field.
    pub fn required(mut self, name: &'static str, kinds: &[Kind]) -> Self {
        self.fields.push((
            name,
            FieldSpec {
                kinds: kinds.to_vec(),
                optional: false,
            },
        ));
        self
    }

    /// Declare an optional field.
    pub fn optional(mut self, name: &'static str, kinds: &[Kind]) -> Self {
        self.fields.push((
            name,
            FieldSpec {
                kinds: kinds.to_vec(),
                optional: true,
            },
        ));
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        for (i, (name, spec)) in self.fields.iter().enumerate() {
            if spec.kinds.is_empty() {
                return Err(SchemaError::NoKinds(name));
            }
            if self.fields[..i].iter().any(|(other, _)| other == name) {
                return Err(SchemaError::Duplicate(name));
            }
        }
        Ok(Schema {
            fields: self.fields,
        })
    }
}

/// Declared shape of an endpoint's arguments.
#[derive(Debug, Clone)]
pub struct Schema {
    fields: Vec<(&'static str, FieldSpec)>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Validate `args` against the schema.
    ///
    /// Missing required fields yield `missing`, fields of an undeclared kind yield
    /// `bad_type`. All errors are reported together. Undeclared fields are dropped.
    pub fn check(&self, args: &Map<String, Value>) -> Result<Args, InputError> {
        let mut e = InputError::new();
        let mut filtered = Map::new();

        for (name, spec) in &self.fields {
            match args.get(*name) {
                None => {
                    if !spec.optional {
                        e.insert(name, ErrorReason::Missing);
                    }
                }
                Some(value) => {
                    if spec.kinds.iter().any(|kind| kind.matches(value)) {
                        filtered.insert((*name).to_string(), value.clone());
                    } else {
                        e.insert(name, ErrorReason::BadType);
                    }
                }
            }
        }
        e.into_result()?;

        Ok(Args(filtered))
    }
}

/// Arguments that passed a [`Schema`] check.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args(Map<String, Value>);

impl Args {
    /// String value of `name`, `None` if absent or not a string.
    pub fn str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// `None` if absent, `Some(None)` if null, `Some(Some(s))` for a string.
    pub fn nullable_str(&self, name: &str) -> Option<Option<&str>> {
        self.0.get(name).map(Value::as_str)
    }

    /// `None` if absent, `Some(None)` if null, `Some(Some(n))` for an integer.
    pub fn nullable_i64(&self, name: &str) -> Option<Option<i64>> {
        self.0.get(name).map(Value::as_i64)
    }

    #[cfg(test)]
    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}
