//! Agent configuration: the validated record, its parts, and its encodings

pub mod agent;
pub mod format;
mod raw;
pub mod settings;
pub mod target;
pub mod types;
pub mod validation;

pub use agent::{AgentConfig, DEFAULT_SCAN_INTERVAL, MAX_SCAN_INTERVAL, MIN_SCAN_INTERVAL};
pub use format::ConfigFormat;
pub use target::Target;
pub use types::{Environment, LogLevel, UnknownVariant};
pub use validation::{FieldError, FieldErrorKind, ValidationError};
