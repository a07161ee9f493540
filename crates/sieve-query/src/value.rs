use bson::Bson;

/// Result of coercing an offset/limit input into an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coerced {
    /// A usable integer.
    Int(i64),
    /// Numeric input with no usable value, e.g. `"abc"` or a NaN double.
    /// The slot it was meant for ends up empty.
    Unusable,
    /// Input of a type pagination does not look at. The slot keeps its
    /// previous value.
    Ignored,
}

/// Coerce an offset/limit input.
///
/// Integers pass through, finite doubles truncate toward zero and strings
/// are read with integer-prefix parsing (see [`parse_int_prefix`]).
///
/// Unlike the JavaScript query model, which stored a numeric offset/limit
/// unchanged, a fractional double is truncated here: `5.9` is stored as `5`.
/// Skip and limit only ever see whole numbers either way.
pub fn coerce_int(value: &Bson) -> Coerced {
    match value {
        Bson::Int32(n) => Coerced::Int(i64::from(*n)),
        Bson::Int64(n) => Coerced::Int(*n),
        Bson::Double(f) if f.is_finite() => Coerced::Int(f.trunc() as i64),
        Bson::Double(_) => Coerced::Unusable,
        Bson::String(s) => parse_int_prefix(s).map_or(Coerced::Unusable, Coerced::Int),
        _ => Coerced::Ignored,
    }
}

/// Base-10 integer-prefix parsing.
///
/// Leading whitespace is skipped, one optional sign is accepted, then the
/// longest run of ASCII digits is read. Anything after the first non-digit is
/// ignored: `"12abc"` is `12`, `"abc"` is `None`. Out-of-range values
/// saturate.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .bytes()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if end == 0 {
        return None;
    }

    let magnitude = rest[..end].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Truthiness of a dynamic value, as request handling has always judged it:
/// null, `false`, zero, NaN and the empty string are falsy, everything else
/// (including `"0"`, empty arrays and empty documents) is truthy.
pub fn is_truthy(value: &Bson) -> bool {
    match value {
        Bson::Null | Bson::Undefined => false,
        Bson::Boolean(b) => *b,
        Bson::Int32(n) => *n != 0,
        Bson::Int64(n) => *n != 0,
        Bson::Double(f) => *f != 0.0 && !f.is_nan(),
        Bson::String(s) => !s.is_empty(),
        _ => true,
    }
}

pub(crate) fn is_present_and_truthy(value: Option<&Bson>) -> bool {
    value.is_some_and(is_truthy)
}
