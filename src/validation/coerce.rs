//! Best-effort cell coercion.
//!
//! [`coerce`] reports [`Coerced::Invalid`] when a non-empty cell cannot be represented as the
//! target type; the caller turns that into a [`Value::Null`] and records the cell.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::types::{TypeTag, Value};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y", "%d %b %Y", "%b %d, %Y"];

/// Outcome of coercing one cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Coerced {
    /// The cell now holds the declared type.
    Ok(Value),
    /// The cell was already empty.
    Empty,
    /// The cell held something that is not the declared type.
    Invalid,
}

/// Coerce `value` to `tag`.
pub(crate) fn coerce(value: &Value, tag: TypeTag) -> Coerced {
    match value {
        Value::Null => return Coerced::Empty,
        Value::Utf8(s) if s.trim().is_empty() => return Coerced::Empty,
        _ => {}
    }
    let out = match tag {
        TypeTag::DateTime => to_datetime(value).map(Value::DateTime),
        TypeTag::Float => to_float(value).map(Value::Float64),
        TypeTag::String => Some(Value::Utf8(value.to_string())),
    };
    out.map_or(Coerced::Invalid, Coerced::Ok)
}

fn to_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Utf8(s) => parse_datetime(s),
        // Bare numbers and booleans are not dates; spreadsheet date cells arrive as
        // `Value::DateTime` already.
        _ => None,
    }
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

fn to_float(value: &Value) -> Option<f64> {
    let v = match value {
        Value::Float64(f) => *f,
        Value::Int64(i) => *i as f64,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Utf8(s) => s.trim().parse::<f64>().ok()?,
        Value::DateTime(_) | Value::Null => return None,
    };
    // NaN and infinities cannot be stored as numbers.
    v.is_finite().then_some(v)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{coerce, Coerced};
    use crate::types::{TypeTag, Value};

    fn midnight(y: i32, m: u32, d: u32) -> Value {
        Value::DateTime(NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(0, 0, 0).unwrap())
    }

    #[test]
    fn datetime_accepts_common_layouts() {
        for raw in ["2024-01-31", "2024/01/31", "01/31/2024", "31.01.2024", "31 Jan 2024", " 2024-01-31 "] {
            assert_eq!(coerce(&Value::from(raw), TypeTag::DateTime), Coerced::Ok(midnight(2024, 1, 31)), "{raw}");
        }
        let with_time = coerce(&Value::from("2024-01-31T10:30:00Z"), TypeTag::DateTime);
        let expected = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(10, 30, 0).unwrap();
        assert_eq!(with_time, Coerced::Ok(Value::DateTime(expected)));
    }

    #[test]
    fn datetime_rejects_garbage_and_numbers() {
        assert_eq!(coerce(&Value::from("bad-date"), TypeTag::DateTime), Coerced::Invalid);
        assert_eq!(coerce(&Value::from("2024-02-30"), TypeTag::DateTime), Coerced::Invalid);
        assert_eq!(coerce(&Value::Float64(45000.0), TypeTag::DateTime), Coerced::Invalid);
        assert_eq!(coerce(&Value::Null, TypeTag::DateTime), Coerced::Empty);
    }

    #[test]
    fn float_widens_and_parses() {
        assert_eq!(coerce(&Value::from(" 100.5 "), TypeTag::Float), Coerced::Ok(Value::Float64(100.5)));
        assert_eq!(coerce(&Value::Int64(-5), TypeTag::Float), Coerced::Ok(Value::Float64(-5.0)));
        assert_eq!(coerce(&Value::Bool(true), TypeTag::Float), Coerced::Ok(Value::Float64(1.0)));
        assert_eq!(coerce(&Value::from("1e3"), TypeTag::Float), Coerced::Ok(Value::Float64(1000.0)));
    }

    #[test]
    fn float_rejects_text_and_nan() {
        assert_eq!(coerce(&Value::from("abc"), TypeTag::Float), Coerced::Invalid);
        assert_eq!(coerce(&Value::from("NaN"), TypeTag::Float), Coerced::Invalid);
        assert_eq!(coerce(&Value::Float64(f64::NAN), TypeTag::Float), Coerced::Invalid);
        assert_eq!(coerce(&midnight(2024, 1, 1), TypeTag::Float), Coerced::Invalid);
    }

    #[test]
    fn float_rejects_infinities() {
        for raw in ["1e400", "inf", "-infinity"] {
            assert_eq!(coerce(&Value::from(raw), TypeTag::Float), Coerced::Invalid, "{raw}");
        }
        assert_eq!(coerce(&Value::Float64(f64::INFINITY), TypeTag::Float), Coerced::Invalid);
        assert_eq!(coerce(&Value::Float64(f64::NEG_INFINITY), TypeTag::Float), Coerced::Invalid);
    }

    #[test]
    fn string_never_fails_and_keeps_nulls() {
        assert_eq!(coerce(&Value::Float64(2.5), TypeTag::String), Coerced::Ok(Value::from("2.5")));
        assert_eq!(coerce(&Value::Int64(7), TypeTag::String), Coerced::Ok(Value::from("7")));
        assert_eq!(coerce(&midnight(2024, 1, 1), TypeTag::String), Coerced::Ok(Value::from("2024-01-01 00:00:00")));
        assert_eq!(coerce(&Value::Null, TypeTag::String), Coerced::Empty);
    }

    #[test]
    fn blank_text_is_empty_not_invalid() {
        for tag in [TypeTag::DateTime, TypeTag::Float, TypeTag::String] {
            assert_eq!(coerce(&Value::from("   "), tag), Coerced::Empty, "{tag}");
        }
    }
}
