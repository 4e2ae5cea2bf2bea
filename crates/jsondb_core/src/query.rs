//! Read-only queries and aggregation over a collection.
//!
//! Every function here works on an already-swept slice of documents;
//! [`crate::Database`] runs the expiry sweep first.

use crate::document::Document;
use crate::error::{CoreError, CoreResult};
use serde_json::{Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl FromStr for SortOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(CoreError::invalid_operation(format!(
                "unknown sort order '{other}', expected 'asc' or 'desc'"
            ))),
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        })
    }
}

/// Reduction applied by [`aggregate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateOp {
    /// Sum of all values.
    Sum,
    /// Arithmetic mean.
    Avg,
    /// Smallest value.
    Min,
    /// Largest value.
    Max,
}

impl FromStr for AggregateOp {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "avg" => Ok(Self::Avg),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(CoreError::invalid_operation(format!(
                "unknown aggregate operation '{other}', expected sum, avg, min or max"
            ))),
        }
    }
}

impl fmt::Display for AggregateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sum => "sum",
            Self::Avg => "avg",
            Self::Min => "min",
            Self::Max => "max",
        })
    }
}

fn type_rank(value: Option<&Value>) -> u8 {
    match value {
        None => 0,
        Some(Value::Null) => 1,
        Some(Value::Bool(_)) => 2,
        Some(Value::Number(_)) => 3,
        Some(Value::String(_)) => 4,
        Some(Value::Array(_)) => 5,
        Some(Value::Object(_)) => 6,
    }
}

fn exact_integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

/// Compares an integer with a float without losing precision.
fn compare_integer_float(i: i128, f: f64) -> Ordering {
    // Rounding is monotone, so a strict result here is exact
    match (i as f64).partial_cmp(&f) {
        Some(Ordering::Equal) => i.cmp(&(f as i128)),
        Some(ord) => ord,
        None => Ordering::Equal,
    }
}

/// Numeric order. `25` and `25.0` are equal.
fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (exact_integer(a), exact_integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => compare_integer_float(x, b.as_f64().unwrap_or(f64::NAN)),
        (None, Some(y)) => compare_integer_float(y, a.as_f64().unwrap_or(f64::NAN)).reverse(),
        (None, None) => {
            let x = a.as_f64().unwrap_or(f64::NAN);
            let y = b.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
    }
}

/// JSON equality where numbers compare by value, at any depth.
#[must_use]
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y) == Ordering::Equal,
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| values_equal(l, r))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, l)| y.get(k).is_some_and(|r| values_equal(l, r)))
        }
        _ => a == b,
    }
}

/// Total order over optional JSON values used by [`sort`].
///
/// Values of the same type use their natural order (numbers numerically,
/// strings lexicographically, `false < true`, arrays element-wise).
/// Otherwise values order by type: missing, null, bool, number, string,
/// array, object. Two objects compare equal.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => compare_numbers(x, y),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Array(x)), Some(Value::Array(y))) => {
            for (l, r) in x.iter().zip(y) {
                let ord = compare_values(Some(l), Some(r));
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Returns the documents whose `key` field equals `value`.
///
/// Equality is strict on type except that numbers compare by value, so
/// `25` matches `25.0`. A document without the field never matches, not
/// even a `null` search.
#[must_use]
pub fn search(docs: &[Document], key: &str, value: &Value) -> Vec<Document> {
    docs.iter()
        .filter(|d| d.field(key).is_some_and(|v| values_equal(&v, value)))
        .cloned()
        .collect()
}

/// Returns a copy of `docs` ordered by the `key` field.
///
/// The sort is stable in both directions: documents with equal keys keep
/// their relative input order.
#[must_use]
pub fn sort(docs: &[Document], key: &str, order: SortOrder) -> Vec<Document> {
    let mut keyed: Vec<_> = docs.iter().map(|d| (d.field(key), d)).collect();
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = compare_values(a.as_deref(), b.as_deref());
        match order {
            SortOrder::Asc => ord,
            SortOrder::Desc => ord.reverse(),
        }
    });
    keyed.into_iter().map(|(_, d)| d.clone()).collect()
}

/// Returns page `page` (1-indexed) of `limit` documents.
///
/// Page 0, a zero limit, or a page past the end yields an empty result.
#[must_use]
pub fn paginate(docs: &[Document], page: usize, limit: usize) -> Vec<Document> {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(limit))
    else {
        return Vec::new();
    };
    docs.iter().skip(start).take(limit).cloned().collect()
}

/// Reduces the numeric values of the `key` field.
///
/// Non-numeric and missing values are ignored. Returns `None` when no
/// document carries a number in that field.
#[must_use]
pub fn aggregate(docs: &[Document], key: &str, op: AggregateOp) -> Option<f64> {
    let values: Vec<f64> = docs
        .iter()
        .filter_map(|d| d.field(key).and_then(|v| v.as_f64()))
        .collect();

    if values.is_empty() {
        return None;
    }

    let result = match op {
        AggregateOp::Sum => values.iter().sum(),
        AggregateOp::Avg => values.iter().sum::<f64>() / values.len() as f64,
        AggregateOp::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        AggregateOp::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
    };
    Some(result)
}
