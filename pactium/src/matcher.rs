use crate::error::Error;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;

/// A structural predicate used in place of a literal expected value.
///
/// Matchers double as example generators: `unwrap_example` reduces any
/// matcher tree to a concrete JSON value that satisfies it, which is what
/// ends up in the persisted contract document.
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Requires deep equality with the given value.
    Literal(Value),
    /// Requires the same shape as the example; the value itself is free.
    TypeMatch(Value),
    /// An ordered sequence where every element must satisfy the inner
    /// matcher. An empty sequence trivially satisfies it.
    EachElement(Box<Matcher>),
    /// A keyed structure; keys not named here are ignored.
    Composite(HashMap<String, Matcher>),
    /// A string matching a regular expression, with an example for
    /// unwrapping.
    Term { pattern: Regex, example: String },
}

/// The structural kind of a JSON value, used for shape comparisons instead
/// of runtime type inspection.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

fn kind_of(value: &Value) -> ValueKind {
    match value {
        Value::Null => ValueKind::Null,
        Value::Bool(_) => ValueKind::Bool,
        Value::Number(_) => ValueKind::Number,
        Value::String(_) => ValueKind::String,
        Value::Array(_) => ValueKind::Array,
        Value::Object(_) => ValueKind::Object,
    }
}

/// Structural shape equality: same kind, and for composites the same field
/// set with recursively matching shapes. Arrays with a non-empty example
/// require every actual element to match the shape of the first example
/// element.
fn shapes_equal(example: &Value, actual: &Value) -> bool {
    if kind_of(example) != kind_of(actual) {
        return false;
    }

    match (example, actual) {
        (Value::Object(example_fields), Value::Object(actual_fields)) => {
            example_fields.len() == actual_fields.len()
                && example_fields.iter().all(|(key, example_value)| {
                    actual_fields
                        .get(key)
                        .map(|actual_value| shapes_equal(example_value, actual_value))
                        .unwrap_or(false)
                })
        }
        (Value::Array(example_elements), Value::Array(actual_elements)) => {
            match example_elements.first() {
                Some(element_shape) => actual_elements
                    .iter()
                    .all(|element| shapes_equal(element_shape, element)),
                None => true,
            }
        }
        _ => true,
    }
}

impl Matcher {
    /// Builds a `Composite` matcher from named field matchers.
    pub fn composite<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Matcher)>,
    {
        Matcher::Composite(
            fields
                .into_iter()
                .map(|(name, matcher)| (name.into(), matcher))
                .collect(),
        )
    }

    /// Evaluates this matcher against an actual value.
    pub fn evaluate(&self, actual: &Value) -> bool {
        match self {
            Matcher::Literal(expected) => expected == actual,
            Matcher::TypeMatch(example) => shapes_equal(example, actual),
            Matcher::EachElement(element_matcher) => match actual {
                Value::Array(elements) => elements
                    .iter()
                    .all(|element| element_matcher.evaluate(element)),
                _ => false,
            },
            Matcher::Composite(fields) => match actual {
                Value::Object(actual_fields) => fields.iter().all(|(name, matcher)| {
                    actual_fields
                        .get(name)
                        .map(|value| matcher.evaluate(value))
                        .unwrap_or(false)
                }),
                _ => false,
            },
            Matcher::Term { pattern, .. } => match actual {
                Value::String(s) => pattern.is_match(s),
                _ => false,
            },
        }
    }

    /// Reduces the matcher tree to a concrete value that satisfies it.
    pub fn unwrap_example(&self) -> Value {
        match self {
            Matcher::Literal(value) => value.clone(),
            Matcher::TypeMatch(example) => example.clone(),
            Matcher::EachElement(element_matcher) => {
                Value::Array(vec![element_matcher.unwrap_example()])
            }
            Matcher::Composite(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(name, matcher)| (name.clone(), matcher.unwrap_example()))
                    .collect(),
            ),
            Matcher::Term { example, .. } => Value::String(example.clone()),
        }
    }
}

impl From<Value> for Matcher {
    fn from(value: Value) -> Self {
        Matcher::Literal(value)
    }
}

impl From<&str> for Matcher {
    fn from(value: &str) -> Self {
        Matcher::Literal(Value::String(value.into()))
    }
}

impl From<String> for Matcher {
    fn from(value: String) -> Self {
        Matcher::Literal(Value::String(value))
    }
}

/// A matcher satisfied by any value of the same shape as `example`.
pub fn like(example: Value) -> Matcher {
    Matcher::TypeMatch(example)
}

/// A matcher satisfied by any ordered sequence whose elements all satisfy
/// `element`.
pub fn each_like<M: Into<Matcher>>(element: M) -> Matcher {
    Matcher::EachElement(Box::new(element.into()))
}

/// A matcher satisfied by any string matching `pattern`. The example must
/// itself match the pattern so that unwrapping always produces a
/// self-satisfying value.
pub fn term<S1: AsRef<str>, S2: Into<String>>(pattern: S1, example: S2) -> Result<Matcher, Error> {
    let example = example.into();
    let pattern = Regex::new(pattern.as_ref())?;

    if !pattern.is_match(&example) {
        return Err(Error::InvalidTermExample {
            pattern: pattern.as_str().into(),
            example,
        });
    }

    Ok(Matcher::Term { pattern, example })
}
