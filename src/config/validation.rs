//! Field-level validation errors for the agent configuration

use std::borrow::Cow;
use std::fmt;

use tracing::warn;

/// Top-level fields in declaration order. Collected errors are reported in this order.
pub const FIELD_ORDER: [&str; 5] = [
    "environment",
    "scan_interval",
    "modules",
    "log_level",
    "targets",
];

/// Why a single field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Required key absent from the input mapping
    Missing,
    /// Value present but of the wrong JSON/YAML type
    WrongType,
    /// String did not name a known enumeration member
    InvalidEnum,
    /// Number outside its allowed range
    OutOfRange,
    /// String empty or whitespace-only
    Empty,
    /// Target entry is neither a `[host, port]` pair nor a `{host, port}` mapping
    MalformedTarget,
}

impl FieldErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorKind::Missing => "missing",
            FieldErrorKind::WrongType => "wrong_type",
            FieldErrorKind::InvalidEnum => "invalid_enum",
            FieldErrorKind::OutOfRange => "out_of_range",
            FieldErrorKind::Empty => "empty",
            FieldErrorKind::MalformedTarget => "malformed_target",
        }
    }

    /// Map a `validator` error code onto our taxonomy
    fn from_code(code: &str) -> Self {
        match code {
            "range" => FieldErrorKind::OutOfRange,
            "empty" | "length" => FieldErrorKind::Empty,
            "missing" => FieldErrorKind::Missing,
            "malformed_target" => FieldErrorKind::MalformedTarget,
            "invalid_enum" => FieldErrorKind::InvalidEnum,
            _ => FieldErrorKind::WrongType,
        }
    }
}

/// One rejected field, addressed by path (`scan_interval`, `targets[1].port`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind,
            message: message.into(),
        }
    }

    /// The top-level field this error belongs to (`targets` for `targets[1].port`)
    pub fn root_field(&self) -> &str {
        let end = self
            .field
            .find(|c| c == '.' || c == '[')
            .unwrap_or(self.field.len());
        &self.field[..end]
    }

    fn rank(&self) -> usize {
        let root = self.root_field();
        FIELD_ORDER
            .iter()
            .position(|f| *f == root)
            .unwrap_or(FIELD_ORDER.len())
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field that failed validation, collected in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new(errors: Vec<FieldError>) -> Self {
        let mut error = Self { errors };
        error.sort();
        error
    }

    pub fn single(field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self::new(vec![FieldError::new(field, kind, message)])
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Field paths that failed, in report order
    pub fn fields(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.field.as_str()).collect()
    }

    /// Whether any error is attached to `field` or one of its children
    pub fn names(&self, field: &str) -> bool {
        self.errors
            .iter()
            .any(|e| e.field == field || e.root_field() == field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    fn sort(&mut self) {
        // stable: errors within one field keep their discovery order
        self.errors.sort_by_key(FieldError::rank);
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration validation failed with {} error(s)",
            self.errors.len()
        )?;
        for error in &self.errors {
            write!(f, "\n  - {}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates field errors across a whole construction pass
#[derive(Debug, Default)]
pub struct ErrorCollector {
    errors: Vec<FieldError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, kind: FieldErrorKind, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, kind, message));
    }

    /// Absorb errors raised against a nested value, re-rooting their paths under `prefix`
    pub fn extend_prefixed(&mut self, prefix: &str, error: ValidationError) {
        for mut field_error in error.errors {
            field_error.field = if field_error.field.is_empty() {
                prefix.to_string()
            } else {
                format!("{}.{}", prefix, field_error.field)
            };
            self.errors.push(field_error);
        }
    }

    pub fn extend(&mut self, error: ValidationError) {
        self.errors.extend(error.errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(value)` when nothing was collected, otherwise every error at once
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            return Ok(value);
        }
        Err(self.into_error())
    }

    /// Every collected error as one `ValidationError`
    pub fn into_error(self) -> ValidationError {
        for error in &self.errors {
            warn!(field = %error.field, kind = error.kind.as_str(), "{}", error.message);
        }
        ValidationError::new(self.errors)
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut collected = Vec::new();
        let mut field_errors: Vec<_> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| (field.to_string(), errs))
            .collect();
        field_errors.sort_by(|a, b| a.0.cmp(&b.0));

        for (field, errs) in field_errors {
            for err in errs.iter() {
                let message = err
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| err.code.to_string());
                collected.push(FieldError::new(
                    field.clone(),
                    FieldErrorKind::from_code(&err.code),
                    message,
                ));
            }
        }

        ValidationError::new(collected)
    }
}

/// Build a `validator` error with our code and message
pub(crate) fn rule_violation(code: &'static str, message: impl Into<String>) -> validator::ValidationError {
    let message: String = message.into();
    let mut error = validator::ValidationError::new(code);
    error.message = Some(Cow::Owned(message));
    error
}
