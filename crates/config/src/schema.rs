//! Per-key schema descriptors.
//!
//! Responsibilities:
//! - Describe a declared key: its default, whether it is required, its
//!   validator chain and an optional per-key type-check override.
//! - Run the validator chain against a candidate value.
//!
//! Does NOT handle:
//! - Attaching section/key context to failures (done by the merge engine).
//!
//! Invariants:
//! - A required key has no default; a key with a default is never required.
//! - Validators run in declaration order and the first failure stops the chain.

use std::fmt;
use std::sync::Arc;

use crate::value::Value;

/// A failed validation, optionally carrying a user-facing message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invalid {
    message: Option<String>,
}

impl Invalid {
    /// A failure without a message; diagnostics fall back to the offending value.
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub(crate) fn into_message(self) -> Option<String> {
        self.message
    }
}

type ValidatorFn = dyn Fn(&Value) -> Result<(), Invalid> + Send + Sync;

/// A single validation rule for a key.
#[derive(Clone)]
pub struct Validator {
    name: Option<String>,
    check: Arc<ValidatorFn>,
}

impl Validator {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), Invalid> + Send + Sync + 'static,
    {
        Self {
            name: None,
            check: Arc::new(check),
        }
    }

    /// Like [`Validator::new`], with a name shown in debug output and logs.
    pub fn named<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), Invalid> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn check(&self, value: &Value) -> Result<(), Invalid> {
        (self.check)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("name", &self.name.as_deref().unwrap_or("<anonymous>"))
            .finish()
    }
}

/// Metadata for one declared key.
#[derive(Debug, Clone)]
pub struct Schema {
    default: Option<Value>,
    validators: Vec<Validator>,
    type_check: Option<bool>,
}

impl Schema {
    /// An optional key falling back to `default`.
    pub fn new(default: impl Into<Value>) -> Self {
        Self {
            default: Some(default.into()),
            validators: Vec::new(),
            type_check: None,
        }
    }

    /// A key that must be supplied by a file or the environment.
    pub fn required() -> Self {
        Self {
            default: None,
            validators: Vec::new(),
            type_check: None,
        }
    }

    /// Append a validator to the chain.
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Override the global type-check setting for this key.
    pub fn with_type_check(mut self, enabled: bool) -> Self {
        self.type_check = Some(enabled);
        self
    }

    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }

    pub fn type_check(&self) -> Option<bool> {
        self.type_check
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Run the validator chain against `value`.
    pub fn validate(&self, value: &Value) -> Result<(), Invalid> {
        for validator in &self.validators {
            if let Err(invalid) = validator.check(value) {
                tracing::debug!(
                    validator = validator.name().unwrap_or("<anonymous>"),
                    "validator rejected value"
                );
                return Err(invalid);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_required_schema_has_no_default() {
        let schema = Schema::required();
        assert!(schema.is_required());
        assert!(schema.default_value().is_none());

        let schema = Schema::new(10);
        assert!(!schema.is_required());
        assert_eq!(schema.default_value(), Some(&Value::Integer(10)));
    }

    #[test]
    fn test_validators_run_in_order_and_stop_at_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let first = calls.clone();
        let third = calls.clone();

        let schema = Schema::new(1)
            .with_validator(Validator::new(move |_| {
                first.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
            .with_validator(Validator::new(|_| Err(Invalid::with_message("nope"))))
            .with_validator(Validator::new(move |_| {
                third.fetch_add(100, Ordering::SeqCst);
                Ok(())
            }));

        let err = schema.validate(&Value::Integer(5)).unwrap_err();
        assert_eq!(err.message(), Some("nope"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_chain_accepts_anything() {
        assert!(Schema::new("x").validate(&Value::Null).is_ok());
    }

    #[test]
    fn test_type_check_override_is_recorded() {
        assert_eq!(Schema::new(1).type_check(), None);
        assert_eq!(Schema::new(1).with_type_check(false).type_check(), Some(false));
    }

    #[test]
    fn test_validator_debug_shows_name() {
        let v = Validator::named("port-range", |_| Ok(()));
        assert!(format!("{v:?}").contains("port-range"));
        assert!(format!("{:?}", Validator::new(|_| Ok(()))).contains("<anonymous>"));
    }
}
