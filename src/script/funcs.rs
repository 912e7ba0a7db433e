//! Helper functions available inside SQL templates, bound to one request's parameters.
//!
//! Every value a template writes with `{{ ... }}` is recorded as a [`BindValue`] and written as
//! a bind marker. Only strings marked safe (markers produced by the helpers, or an explicit
//! `|safe` in the template) are written into the SQL text verbatim. [`FuncRegistry::finish`]
//! turns the markers into placeholders in the order they appear in the final text, so values
//! kept with `{% set %}` and written later, or written more than once, still line up.

use crate::config::PlaceholderStyle;
use crate::script::ParamSet;
use crate::sql::BindValue;
use minijinja::value::ValueKind;
use minijinja::{Environment, Error, ErrorKind, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Delimits bind markers in rendered text (ASCII SUB).
const MARK: char = '\u{1a}';

#[derive(Debug)]
struct Binder {
    style: PlaceholderStyle,
    values: Vec<BindValue>,
}

impl Binder {
    fn bind(&mut self, value: BindValue) -> String {
        self.values.push(value);
        format!("{MARK}{}{MARK}", self.values.len())
    }
}

/// Per-request helper registry. Never shared between requests.
#[derive(Clone, Debug)]
pub struct FuncRegistry {
    params: Arc<ParamSet>,
    binder: Arc<Mutex<Binder>>,
}

fn invalid(msg: impl Into<String>) -> Error {
    Error::new(ErrorKind::InvalidOperation, msg.into())
}

fn to_bind_value(value: &Value) -> BindValue {
    match value.kind() {
        ValueKind::Undefined | ValueKind::None => BindValue::Null,
        ValueKind::Bool => BindValue::Bool(value.is_true()),
        ValueKind::Number => {
            if let Ok(n) = i64::try_from(value.clone()) {
                BindValue::Int(n)
            } else if let Ok(f) = f64::try_from(value.clone()) {
                BindValue::Float(f)
            } else {
                BindValue::Text(value.to_string())
            }
        }
        _ => match value.as_str() {
            Some(s) => BindValue::Text(s.to_string()),
            None => BindValue::Text(value.to_string()),
        },
    }
}

fn positive_int(what: &str, value: &Value) -> Result<i64, Error> {
    let n = match value.as_str() {
        Some(s) => s.trim().parse::<i64>().ok(),
        None => i64::try_from(value.clone()).ok(),
    };
    match n {
        Some(n) if n > 0 => Ok(n),
        _ => Err(invalid(format!("{} must be a positive integer, got '{}'", what, value))),
    }
}

impl FuncRegistry {
    pub fn new(params: ParamSet, style: PlaceholderStyle) -> Self {
        FuncRegistry {
            params: Arc::new(params),
            binder: Arc::new(Mutex::new(Binder {
                style,
                values: Vec::new(),
            })),
        }
    }

    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Record a value and return its bind marker.
    pub fn bind(&self, value: BindValue) -> Result<String, Error> {
        let mut binder = self.binder.lock().map_err(|_| invalid("bind list poisoned"))?;
        Ok(binder.bind(value))
    }

    fn bind_safe(&self, value: BindValue) -> Result<Value, Error> {
        self.bind(value).map(Value::from_safe_string)
    }

    fn required(&self, name: &str) -> Result<&str, Error> {
        self.params
            .get(name)
            .ok_or_else(|| invalid(format!("parameter '{}' is not set", name)))
    }

    /// Replace the bind markers in `rendered` with placeholders in text order and return the
    /// values to bind. With `$n`, a marker written twice reuses its number; with `?`, every
    /// occurrence gets its own copy of the value. Values never written are dropped.
    pub fn finish(&self, rendered: &str) -> Result<(String, Vec<BindValue>), Error> {
        let binder = self.binder.lock().map_err(|_| invalid("bind list poisoned"))?;
        let mut sql = String::with_capacity(rendered.len());
        let mut values = Vec::new();
        let mut numbered: HashMap<usize, usize> = HashMap::new();
        let mut rest = rendered;
        while let Some(start) = rest.find(MARK) {
            sql.push_str(&rest[..start]);
            let after = &rest[start + MARK.len_utf8()..];
            let end = after.find(MARK).ok_or_else(|| invalid("unterminated bind marker"))?;
            let idx: usize = after[..end].parse().map_err(|_| invalid("malformed bind marker"))?;
            let value = idx
                .checked_sub(1)
                .and_then(|i| binder.values.get(i))
                .ok_or_else(|| invalid(format!("unknown bind marker {}", idx)))?;
            let n = match binder.style {
                PlaceholderStyle::Dollar => *numbered.entry(idx).or_insert_with(|| {
                    values.push(value.clone());
                    values.len()
                }),
                PlaceholderStyle::Question => {
                    values.push(value.clone());
                    values.len()
                }
            };
            sql.push_str(&binder.style.placeholder(n));
            rest = &after[end + MARK.len_utf8()..];
        }
        sql.push_str(rest);
        Ok((sql, values))
    }

    /// Install the helpers and the binding formatter on `env`.
    pub fn register(&self, env: &mut Environment<'_>) {
        let f = self.clone();
        env.set_formatter(move |out, _state, value| {
            let text = if value.is_safe() {
                value.to_string()
            } else {
                f.bind(to_bind_value(value))?
            };
            out.write_str(&text)
                .map_err(|_| Error::new(ErrorKind::WriteFailure, "could not write rendered sql"))
        });

        let f = self.clone();
        env.add_function("is_set", move |name: String| -> bool { f.params.is_set(&name) });

        let f = self.clone();
        env.add_function("param", move |name: String| -> Result<Value, Error> {
            let value = f.required(&name)?.to_string();
            f.bind_safe(BindValue::Text(value))
        });

        let f = self.clone();
        env.add_function(
            "default_or_value",
            move |name: String, default: Value| -> Result<Value, Error> {
                match f.params.get(&name) {
                    Some(v) => f.bind_safe(BindValue::Text(v.to_string())),
                    None => f.bind_safe(to_bind_value(&default)),
                }
            },
        );

        let f = self.clone();
        env.add_function("in_format", move |name: String| -> Result<Value, Error> {
            let raw = f.required(&name)?;
            let items: Vec<String> = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if items.is_empty() {
                return Err(invalid(format!("parameter '{}' has no values", name)));
            }
            let mut placeholders = Vec::with_capacity(items.len());
            for item in items {
                placeholders.push(f.bind(BindValue::Text(item))?);
            }
            Ok(Value::from_safe_string(format!("({})", placeholders.join(", "))))
        });

        let f = self.clone();
        env.add_function(
            "split",
            move |name: String, sep: Option<String>| -> Result<Vec<String>, Error> {
                let sep = sep.unwrap_or_else(|| ",".to_string());
                if sep.is_empty() {
                    return Err(invalid("split separator must not be empty"));
                }
                Ok(f.required(&name)?.split(sep.as_str()).map(str::to_string).collect())
            },
        );

        let f = self.clone();
        env.add_function(
            "limit_offset",
            move |page: Value, size: Value| -> Result<Value, Error> {
                let page = positive_int("page", &page)?;
                let size = positive_int("page size", &size)?;
                let offset = (page - 1)
                    .checked_mul(size)
                    .ok_or_else(|| invalid("page offset overflows"))?;
                let limit_ph = f.bind(BindValue::Int(size))?;
                let offset_ph = f.bind(BindValue::Int(offset))?;
                Ok(Value::from_safe_string(format!("LIMIT {} OFFSET {}", limit_ph, offset_ph)))
            },
        );
    }
}
