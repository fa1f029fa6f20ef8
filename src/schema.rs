//! Declarative configuration schemas.
//!
//! A [`Schema`] is an ordered list of recognized keys, each with a
//! requirement and a validator. A single generic routine,
//! [`Schema::validate`], interprets the schema against a raw TOML table:
//! it rejects unknown keys and bad values (naming the full dotted key
//! path), fills in defaults, and synthesizes generated identifiers. The
//! output is a normalized table; validating an already-normalized table
//! yields the identical table.

use crate::errors::{ConfigError, ConfigResult};
use toml::value::Table;
use toml::Value;

/// Conventional key for an object identifier inside a configuration block.
pub const CONF_ID: &str = "id";

/// Append `key` to a dotted key path.
pub fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

#[derive(Debug, Clone)]
pub enum Requirement {
    /// The key must be present.
    Required,
    /// The key may be absent; absence leaves it out of the output.
    Optional,
    /// The key may be absent; absence inserts the given default.
    Default(Value),
}

#[derive(Debug, Clone)]
pub enum Validator {
    Bool,
    Int,
    Str,
    /// Float; integer input is coerced to float in the output.
    Float,
    /// Float restricted to an inclusive range.
    FloatRange { min: f64, max: f64 },
    /// String restricted to a fixed set of choices.
    OneOf(&'static [&'static str]),
    /// A well-formed identifier naming an object of the given build-time
    /// type.
    Ident { object_type: &'static str },
    /// Like `Ident`, but when the key is absent a deterministic identifier
    /// is synthesized from the key path, so repeated validation is stable.
    GeneratedId { object_type: &'static str },
    /// A nested configuration block with its own schema.
    Block(Schema),
    /// A Material Design icon reference, e.g. `mdi:kettle`.
    Icon,
}

#[derive(Debug, Clone)]
pub struct SchemaEntry {
    pub key: &'static str,
    pub requirement: Requirement,
    pub validator: Validator,
}

#[derive(Debug, Clone, Default)]
pub struct Schema {
    entries: Vec<SchemaEntry>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: append one recognized key.
    pub fn entry(
        mut self,
        key: &'static str,
        requirement: Requirement,
        validator: Validator,
    ) -> Self {
        self.entries.push(SchemaEntry {
            key,
            requirement,
            validator,
        });
        self
    }

    /// Compose two schemas. Entries from `other` replace same-key entries
    /// of `self`; new keys are appended in order.
    pub fn extend(&self, other: &Schema) -> Schema {
        let mut entries = self.entries.clone();
        for entry in &other.entries {
            match entries.iter_mut().find(|e| e.key == entry.key) {
                Some(slot) => *slot = entry.clone(),
                None => entries.push(entry.clone()),
            }
        }
        Schema { entries }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.key)
    }

    /// Validate `raw` against this schema. `path` is the dotted location
    /// of `raw` in the overall configuration, used in error reports.
    ///
    /// Pure: no process state is touched, and the returned table is fully
    /// determined by the inputs.
    pub fn validate(&self, raw: &Table, path: &str) -> ConfigResult<Table> {
        for key in raw.keys() {
            if !self.entries.iter().any(|e| e.key == key.as_str()) {
                return Err(ConfigError::UnknownKey {
                    path: join_path(path, key),
                });
            }
        }

        let mut out = Table::new();
        for entry in &self.entries {
            let entry_path = join_path(path, entry.key);
            match raw.get(entry.key) {
                Some(value) => {
                    let checked = entry.validator.check(value, &entry_path)?;
                    out.insert(entry.key.to_string(), checked);
                }
                None => match (&entry.requirement, &entry.validator) {
                    (_, Validator::GeneratedId { object_type }) => {
                        out.insert(
                            entry.key.to_string(),
                            Value::String(synthesize_ident(object_type, &entry_path)),
                        );
                    }
                    (Requirement::Default(default), _) => {
                        out.insert(entry.key.to_string(), default.clone());
                    }
                    (Requirement::Required, _) => {
                        return Err(ConfigError::MissingKey { path: entry_path });
                    }
                    (Requirement::Optional, _) => {}
                },
            }
        }
        Ok(out)
    }
}

impl Validator {
    fn check(&self, value: &Value, path: &str) -> ConfigResult<Value> {
        match self {
            Validator::Bool => match value {
                Value::Boolean(_) => Ok(value.clone()),
                other => Err(invalid_type(path, "a boolean", other)),
            },
            Validator::Int => match value {
                Value::Integer(_) => Ok(value.clone()),
                other => Err(invalid_type(path, "an integer", other)),
            },
            Validator::Str => match value {
                Value::String(_) => Ok(value.clone()),
                other => Err(invalid_type(path, "a string", other)),
            },
            Validator::Float => Ok(Value::Float(as_float(value, path)?)),
            Validator::FloatRange { min, max } => {
                let v = as_float(value, path)?;
                if v < *min || v > *max {
                    return Err(ConfigError::InvalidValue {
                        path: path.to_string(),
                        reason: format!("{} is out of range {}..={}", v, min, max),
                    });
                }
                Ok(Value::Float(v))
            }
            Validator::OneOf(choices) => match value {
                Value::String(s) if choices.contains(&s.as_str()) => Ok(value.clone()),
                Value::String(s) => Err(ConfigError::InvalidValue {
                    path: path.to_string(),
                    reason: format!("'{}' is not one of {}", s, choices.join(", ")),
                }),
                other => Err(invalid_type(path, "a string", other)),
            },
            Validator::Ident { .. } | Validator::GeneratedId { .. } => match value {
                Value::String(s) => {
                    check_ident(s, path)?;
                    Ok(value.clone())
                }
                other => Err(invalid_type(path, "an identifier string", other)),
            },
            Validator::Block(schema) => match value {
                Value::Table(table) => Ok(Value::Table(schema.validate(table, path)?)),
                other => Err(invalid_type(path, "a table", other)),
            },
            Validator::Icon => match value {
                Value::String(s) => {
                    let slug = s.strip_prefix("mdi:").unwrap_or("");
                    if slug.is_empty() || !slug.bytes().all(|b| b.is_ascii_lowercase() || b == b'-')
                    {
                        return Err(ConfigError::InvalidValue {
                            path: path.to_string(),
                            reason: format!("'{}' is not a valid icon (expected mdi:<name>)", s),
                        });
                    }
                    Ok(value.clone())
                }
                other => Err(invalid_type(path, "an icon string", other)),
            },
        }
    }
}

fn invalid_type(path: &str, expected: &'static str, found: &Value) -> ConfigError {
    ConfigError::InvalidType {
        path: path.to_string(),
        expected,
        found: found.type_str(),
    }
}

fn as_float(value: &Value, path: &str) -> ConfigResult<f64> {
    match value {
        Value::Float(f) => Ok(*f),
        Value::Integer(i) => Ok(*i as f64),
        other => Err(invalid_type(path, "a number", other)),
    }
}

/// Identifiers follow the usual lower_snake_case shape.
fn check_ident(s: &str, path: &str) -> ConfigResult<()> {
    let mut bytes = s.bytes();
    let head_ok = matches!(bytes.next(), Some(b) if b.is_ascii_lowercase() || b == b'_');
    let tail_ok = bytes.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
    if head_ok && tail_ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            path: path.to_string(),
            reason: format!("'{}' is not a valid identifier", s),
        })
    }
}

/// Derive an identifier from the key path of the entry that lacked one.
/// The result depends only on the path, so validating twice produces the
/// same identifier.
fn synthesize_ident(object_type: &str, entry_path: &str) -> String {
    let base = entry_path
        .strip_suffix(&format!(".{}", CONF_ID))
        .unwrap_or(entry_path)
        .replace('.', "_");
    if base.is_empty() {
        object_type.to_string()
    } else {
        base
    }
}
