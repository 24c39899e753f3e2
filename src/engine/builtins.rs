//! Built-in facility bound to the default namespace

use crate::engine::namespace::{Facility, check_arity};
use crate::error::FacilityError;
use crate::engine::value::{self, type_name};
use chrono::{Datelike, NaiveDate, Utc};
use serde_json::Value;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// String, collection and date helpers available as unqualified calls
///
/// | function | result |
/// |---|---|
/// | `len(x)`, `size(x)` | chars in a string, elements in an array/object, 0 for null |
/// | `empty(x)` | true for null, `""`, empty arrays and objects |
/// | `lower(s)`, `upper(s)`, `trim(s)` | transformed string (null passes through) |
/// | `isBlank(s)` | true for null or whitespace-only strings |
/// | `matches(s, pattern)` | whole-string regex match |
/// | `contains(collection, x)` | membership / substring / key test |
/// | `today()` | current UTC date as `YYYY-MM-DD` |
/// | `yearsBetween(from, to)` | whole years between two `YYYY-MM-DD` dates |
#[derive(Debug, Clone, Copy, Default)]
pub struct Builtins;

impl Builtins {
    /// Function names, in documentation order
    pub const FUNCTIONS: [&'static str; 11] = [
        "len",
        "size",
        "empty",
        "lower",
        "upper",
        "trim",
        "isBlank",
        "matches",
        "contains",
        "today",
        "yearsBetween",
    ];
}

impl Facility for Builtins {
    fn call(&self, function: &str, args: &[Value]) -> Result<Value, FacilityError> {
        match function {
            "len" | "size" => {
                check_arity(function, args, 1)?;
                value::size(function, &args[0]).map(Value::from)
            }
            "empty" => {
                check_arity(function, args, 1)?;
                Ok(Value::Bool(value::is_empty(&args[0])))
            }
            "lower" | "upper" | "trim" => {
                check_arity(function, args, 1)?;
                let Some(text) = optional_str(function, &args[0])? else {
                    return Ok(Value::Null);
                };
                Ok(Value::String(match function {
                    "lower" => text.to_lowercase(),
                    "upper" => text.to_uppercase(),
                    _ => text.trim().to_string(),
                }))
            }
            "isBlank" => {
                check_arity(function, args, 1)?;
                let text = optional_str(function, &args[0])?;
                Ok(Value::Bool(text.is_none_or(|t| t.trim().is_empty())))
            }
            "matches" => {
                check_arity(function, args, 2)?;
                let text = required_str(function, &args[0])?;
                let pattern = required_str(function, &args[1])?;
                value::regex_matches(function, text, pattern).map(Value::Bool)
            }
            "contains" => {
                check_arity(function, args, 2)?;
                value::contains(function, &args[0], &args[1]).map(Value::Bool)
            }
            "today" => {
                check_arity(function, args, 0)?;
                Ok(Value::String(
                    Utc::now().date_naive().format(DATE_FORMAT).to_string(),
                ))
            }
            "yearsBetween" => {
                check_arity(function, args, 2)?;
                let from = date_arg(function, &args[0])?;
                let to = date_arg(function, &args[1])?;
                Ok(Value::from(whole_years(from, to)))
            }
            other => Err(FacilityError::UnknownFunction(other.to_string())),
        }
    }

    fn arity(&self, function: &str) -> Option<usize> {
        match function {
            "today" => Some(0),
            "len" | "size" | "empty" | "lower" | "upper" | "trim" | "isBlank" => Some(1),
            "matches" | "contains" | "yearsBetween" => Some(2),
            _ => None,
        }
    }
}

fn optional_str<'a>(function: &str, arg: &'a Value) -> Result<Option<&'a str>, FacilityError> {
    match arg {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(FacilityError::InvalidArgument {
            function: function.to_string(),
            message: format!("expected a string, got {}", type_name(other)),
        }),
    }
}

fn required_str<'a>(function: &str, arg: &'a Value) -> Result<&'a str, FacilityError> {
    arg.as_str().ok_or_else(|| FacilityError::InvalidArgument {
        function: function.to_string(),
        message: format!("expected a string, got {}", type_name(arg)),
    })
}

fn date_arg(function: &str, arg: &Value) -> Result<NaiveDate, FacilityError> {
    let text = required_str(function, arg)?;
    NaiveDate::parse_from_str(text, DATE_FORMAT).map_err(|e| FacilityError::InvalidArgument {
        function: function.to_string(),
        message: format!("'{}' is not a YYYY-MM-DD date: {}", text, e),
    })
}

/// Completed years from `from` to `to`; negative when `to` is earlier
fn whole_years(from: NaiveDate, to: NaiveDate) -> i64 {
    if to < from {
        return -whole_years(to, from);
    }
    let mut years = i64::from(to.year() - from.year());
    if (to.month(), to.day()) < (from.month(), from.day()) {
        years -= 1;
    }
    years
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(function: &str, args: &[Value]) -> Result<Value, FacilityError> {
        Builtins.call(function, args)
    }

    #[test]
    fn test_string_functions() {
        assert_eq!(call("lower", &[json!("AbC")]).unwrap(), json!("abc"));
        assert_eq!(call("upper", &[json!("abc")]).unwrap(), json!("ABC"));
        assert_eq!(call("trim", &[json!("  a ")]).unwrap(), json!("a"));
        assert_eq!(call("upper", &[json!(null)]).unwrap(), json!(null));
        assert_eq!(call("len", &[json!("héllo")]).unwrap(), json!(5));
        assert_eq!(call("len", &[json!(null)]).unwrap(), json!(0));
        assert_eq!(call("size", &[json!([1, 2])]).unwrap(), json!(2));
    }

    #[test]
    fn test_empty() {
        assert_eq!(call("empty", &[json!(null)]).unwrap(), json!(true));
        assert_eq!(call("empty", &[json!({})]).unwrap(), json!(true));
        assert_eq!(call("empty", &[json!("x")]).unwrap(), json!(false));
        assert_eq!(call("empty", &[json!(0)]).unwrap(), json!(false));
    }

    #[test]
    fn test_is_blank() {
        assert_eq!(call("isBlank", &[json!(null)]).unwrap(), json!(true));
        assert_eq!(call("isBlank", &[json!("  \t")]).unwrap(), json!(true));
        assert_eq!(call("isBlank", &[json!(" x ")]).unwrap(), json!(false));
        assert!(call("isBlank", &[json!(1)]).is_err());
    }

    #[test]
    fn test_matches_and_contains() {
        assert_eq!(
            call("matches", &[json!("AB-12"), json!("[A-Z]+-\\d+")]).unwrap(),
            json!(true)
        );
        assert_eq!(
            call("contains", &[json!([1, 2, 3]), json!(2.0)]).unwrap(),
            json!(true)
        );
        assert!(matches!(
            call("matches", &[json!("x"), json!("(")]),
            Err(FacilityError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_years_between() {
        let years = |a: &str, b: &str| call("yearsBetween", &[json!(a), json!(b)]).unwrap();
        assert_eq!(years("2000-06-15", "2018-06-15"), json!(18));
        assert_eq!(years("2000-06-15", "2018-06-14"), json!(17));
        assert_eq!(years("2018-06-15", "2000-06-15"), json!(-18));
        assert!(matches!(
            call("yearsBetween", &[json!("15/06/2000"), json!("2018-06-15")]),
            Err(FacilityError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_today_is_an_iso_date() {
        let today = call("today", &[]).unwrap();
        let text = today.as_str().unwrap();
        assert!(NaiveDate::parse_from_str(text, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_arity_and_unknown() {
        assert!(matches!(
            call("lower", &[]),
            Err(FacilityError::Arity { expected: 1, actual: 0, .. })
        ));
        assert!(matches!(
            call("nope", &[]),
            Err(FacilityError::UnknownFunction(name)) if name == "nope"
        ));
        for function in Builtins::FUNCTIONS {
            assert!(
                !matches!(call(function, &[]), Err(FacilityError::UnknownFunction(_))),
                "{} should be known",
                function
            );
            assert!(Builtins.arity(function).is_some(), "{} should have an arity", function);
        }
    }
}
