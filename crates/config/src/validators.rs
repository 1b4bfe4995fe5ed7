//! Built-in validators.
//!
//! Each constructor returns a named [`Validator`] that can be chained onto a
//! [`Schema`](crate::Schema) with `with_validator`.

use crate::schema::{Invalid, Validator};
use crate::value::{Value, ValueKind};

/// Rejects empty strings, lists and maps, and null.
pub fn non_empty() -> Validator {
    Validator::named("non_empty", |value| {
        let empty = match value {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            Value::List(items) => items.is_empty(),
            Value::Map(map) => map.is_empty(),
            _ => false,
        };
        if empty {
            Err(Invalid::with_message("must not be empty"))
        } else {
            Ok(())
        }
    })
}

/// Accepts numbers within `min..=max`.
pub fn range(min: f64, max: f64) -> Validator {
    Validator::named(format!("range({min}..={max})"), move |value| {
        match value.as_f64() {
            Some(n) if (min..=max).contains(&n) => Ok(()),
            Some(n) => Err(Invalid::with_message(format!(
                "must be between {min} and {max} (got {n})"
            ))),
            None => Err(Invalid::with_message(format!(
                "must be a number between {min} and {max}"
            ))),
        }
    })
}

/// Accepts only values equal to one of `allowed`.
pub fn one_of<I, V>(allowed: I) -> Validator
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
    Validator::named("one_of", move |value| {
        if allowed.contains(value) {
            Ok(())
        } else {
            let choices = allowed
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            Err(Invalid::with_message(format!("must be one of: {choices}")))
        }
    })
}

/// Accepts only values of the given kind.
pub fn kind(expected: ValueKind) -> Validator {
    Validator::named(format!("kind({expected})"), move |value| {
        if value.kind() == expected {
            Ok(())
        } else {
            Err(Invalid::with_message(format!(
                "must be of type {expected} (got {})",
                value.kind()
            )))
        }
    })
}

/// Wraps a plain boolean check; `false` is a failure without a message.
pub fn predicate<F>(check: F) -> Validator
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    Validator::new(move |value| if check(value) { Ok(()) } else { Err(Invalid::new()) })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        let v = non_empty();
        assert!(v.check(&Value::from("x")).is_ok());
        assert!(v.check(&Value::from("  ")).is_err());
        assert!(v.check(&Value::List(vec![])).is_err());
        assert!(v.check(&Value::Null).is_err());
        assert!(v.check(&Value::Integer(0)).is_ok());
    }

    #[test]
    fn test_range_is_inclusive_and_rejects_non_numbers() {
        let v = range(1.0, 65535.0);
        assert!(v.check(&Value::Integer(1)).is_ok());
        assert!(v.check(&Value::Integer(65535)).is_ok());
        assert!(v.check(&Value::Float(0.5)).is_err());
        let err = v.check(&Value::from("80")).unwrap_err();
        assert!(err.message().unwrap().contains("must be a number"));
    }

    #[test]
    fn test_one_of_lists_choices() {
        let v = one_of(["debug", "info"]);
        assert!(v.check(&Value::from("info")).is_ok());
        let err = v.check(&Value::from("trace")).unwrap_err();
        assert_eq!(err.message(), Some("must be one of: \"debug\", \"info\""));
    }

    #[test]
    fn test_kind() {
        let v = kind(ValueKind::Bool);
        assert!(v.check(&Value::Bool(true)).is_ok());
        assert!(v.check(&Value::Integer(1)).is_err());
    }

    #[test]
    fn test_predicate_false_has_no_message() {
        let v = predicate(|value| value.as_i64().is_some_and(|n| n % 2 == 0));
        assert!(v.check(&Value::Integer(4)).is_ok());
        assert_eq!(v.check(&Value::Integer(3)).unwrap_err().message(), None);
    }
}
