//! Declarative request validation: per-field rules grouped by request location.
//!
//! A [`RouteSchema`] lists the rules for one route. Every rule is evaluated, so a
//! rejected request reports all failing fields at once. Values that pass are
//! normalized (numeric strings become numbers) and unknown keys are dropped.

use crate::error::AppError;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use utoipa::ToSchema;

/// Where a field was read from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    Params,
    Query,
    Body,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    String,
    Number,
}

/// Rules for a single field.
#[derive(Clone, Debug)]
pub struct FieldRule {
    name: &'static str,
    kind: Kind,
    required: bool,
    integer: bool,
    min: Option<f64>,
    max: Option<f64>,
    max_length: Option<usize>,
    allow_empty: bool,
    patterns: Vec<&'static Regex>,
}

impl FieldRule {
    fn new(name: &'static str, kind: Kind) -> Self {
        FieldRule {
            name,
            kind,
            required: false,
            integer: false,
            min: None,
            max: None,
            max_length: None,
            allow_empty: false,
            patterns: Vec::new(),
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, Kind::String)
    }

    /// Accepts JSON numbers and numeric strings.
    pub fn number(name: &'static str) -> Self {
        Self::new(name, Kind::Number)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Maximum length in characters, not bytes.
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn allow_empty(mut self) -> Self {
        self.allow_empty = true;
        self
    }

    /// All patterns must match. Can be called more than once.
    pub fn pattern(mut self, re: &'static Regex) -> Self {
        self.patterns.push(re);
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    fn message(&self, text: impl std::fmt::Display) -> String {
        format!("\"{}\" {}", self.name, text)
    }

    /// Ok(None) when an optional field is absent.
    fn check(&self, value: Option<&Value>) -> Result<Option<Value>, Vec<String>> {
        let Some(value) = value else {
            if self.required {
                return Err(vec![self.message("is required")]);
            }
            return Ok(None);
        };
        match self.kind {
            Kind::String => self.check_string(value).map(Some),
            Kind::Number => self.check_number(value).map(Some),
        }
    }

    fn check_string(&self, value: &Value) -> Result<Value, Vec<String>> {
        let Some(s) = value.as_str() else {
            return Err(vec![self.message("must be a string")]);
        };
        if s.is_empty() {
            if self.allow_empty {
                return Ok(value.clone());
            }
            return Err(vec![self.message("is not allowed to be empty")]);
        }
        let mut messages = Vec::new();
        if let Some(max) = self.max_length {
            if s.chars().count() > max {
                messages.push(self.message(format!(
                    "length must be less than or equal to {} characters long",
                    max
                )));
            }
        }
        if self.patterns.iter().any(|re| !re.is_match(s)) {
            messages.push(self.message(format!(
                "with value \"{}\" fails to match the required pattern",
                s
            )));
        }
        if messages.is_empty() {
            Ok(value.clone())
        } else {
            Err(messages)
        }
    }

    fn check_number(&self, value: &Value) -> Result<Value, Vec<String>> {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(n) = parsed.filter(|n| n.is_finite()) else {
            return Err(vec![self.message("must be a number")]);
        };
        let mut messages = Vec::new();
        if self.integer && n.fract() != 0.0 {
            messages.push(self.message("must be an integer"));
        }
        if let Some(min) = self.min {
            if n < min {
                messages.push(self.message(format!("must be larger than or equal to {}", min)));
            }
        }
        if let Some(max) = self.max {
            if n > max {
                messages.push(self.message(format!("must be less than or equal to {}", max)));
            }
        }
        if !messages.is_empty() {
            return Err(messages);
        }
        if self.integer {
            return Ok(Value::from(n as i64));
        }
        Ok(Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null))
    }
}

/// One failing field and every message it produced.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub location: Location,
    pub messages: Vec<String>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, location: Location, message: String) -> Self {
        FieldError {
            field: field.into(),
            location,
            messages: vec![message],
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn field(&self, name: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == name)
    }
}

/// Raw request data, keyed by location.
#[derive(Clone, Debug, Default)]
pub struct RequestInput {
    params: Map<String, Value>,
    query: Map<String, Value>,
    body: Map<String, Value>,
}

impl RequestInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params
            .insert(name.to_string(), Value::String(value.into()));
        self
    }

    pub fn query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        self
    }

    pub fn body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    fn at(&self, location: Location) -> &Map<String, Value> {
        match location {
            Location::Params => &self.params,
            Location::Query => &self.query,
            Location::Body => &self.body,
        }
    }
}

/// Normalized values that passed a [`RouteSchema`]. Only declared fields survive.
#[derive(Clone, Debug, Default)]
pub struct Validated {
    params: Map<String, Value>,
    query: Map<String, Value>,
    body: Map<String, Value>,
}

impl Validated {
    fn at_mut(&mut self, location: Location) -> &mut Map<String, Value> {
        match location {
            Location::Params => &mut self.params,
            Location::Query => &mut self.query,
            Location::Body => &mut self.body,
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).and_then(Value::as_str)
    }

    pub fn query_as<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        decode(&self.query, Location::Query)
    }

    pub fn body_as<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        decode(&self.body, Location::Body)
    }
}

fn decode<T: DeserializeOwned>(map: &Map<String, Value>, location: Location) -> Result<T, AppError> {
    serde_json::from_value(Value::Object(map.clone()))
        .map_err(|e| AppError::BadRequest(format!("invalid {:?} input: {}", location, e)))
}

/// The rules of one route, evaluated in declaration order.
#[derive(Clone, Debug, Default)]
pub struct RouteSchema {
    rules: Vec<(Location, FieldRule)>,
}

impl RouteSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params(mut self, rule: FieldRule) -> Self {
        self.rules.push((Location::Params, rule));
        self
    }

    pub fn query(mut self, rule: FieldRule) -> Self {
        self.rules.push((Location::Query, rule));
        self
    }

    pub fn body(mut self, rule: FieldRule) -> Self {
        self.rules.push((Location::Body, rule));
        self
    }

    pub fn validate(&self, input: &RequestInput) -> Result<Validated, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let mut out = Validated::default();
        for (location, rule) in &self.rules {
            match rule.check(input.at(*location).get(rule.name())) {
                Ok(Some(value)) => {
                    out.at_mut(*location).insert(rule.name().to_string(), value);
                }
                Ok(None) => {}
                Err(messages) => errors.push(FieldError {
                    field: rule.name().to_string(),
                    location: *location,
                    messages,
                }),
            }
        }
        if errors.is_empty() {
            Ok(out)
        } else {
            Err(errors)
        }
    }
}
