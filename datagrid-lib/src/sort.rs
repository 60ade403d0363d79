//! Sort engine
//!
//! Stable, type-aware ordering of an in-memory row set. Descending order
//! inverts the comparator rather than reversing the sorted array, so rows
//! with equal keys keep their input order in both directions.

use std::cmp::Ordering;

use crate::error::SchemaError;
use crate::model::ColumnSpec;
use crate::model::Record;
use crate::model::SortType;
use crate::model::Value;
use crate::query::Direction;
use crate::query::SortSpec;

/// Orders rows by the given sort specification.
///
/// Rows are returned unchanged for [`SortSpec::Natural`]. Sorting by a field
/// that matches no column id fails with [`SchemaError::UnknownColumn`].
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{ColumnSpec, Record, SortType};
/// use datagrid_lib::query::SortSpec;
/// use datagrid_lib::sort::sort_rows;
///
/// let columns = vec![ColumnSpec::new("price", "Price").sortable(SortType::Number)];
/// let rows = vec![
///     Record::new().set("price", 20i64),
///     Record::new().set("price", 5i64),
/// ];
///
/// let rows = sort_rows(rows, &columns, &SortSpec::asc("price")).unwrap();
/// assert_eq!(rows[0].get_f64("price").unwrap(), Some(5.0));
/// ```
pub fn sort_rows(
    rows: Vec<Record>,
    columns: &[ColumnSpec],
    sort: &SortSpec,
) -> Result<Vec<Record>, SchemaError> {
    let SortSpec::By { field, direction } = sort else {
        return Ok(rows);
    };

    let column = columns
        .iter()
        .find(|column| column.id() == field.as_str())
        .ok_or_else(|| SchemaError::unknown_column(field.as_str()))?;

    let mut rows = rows;
    match column.sort_type() {
        SortType::Number => rows.sort_by(|a, b| {
            directed(
                numeric_key(a, field).total_cmp(&numeric_key(b, field)),
                *direction,
            )
        }),
        SortType::String => rows.sort_by(|a, b| {
            directed(collate(string_key(a, field), string_key(b, field)), *direction)
        }),
    }
    Ok(rows)
}

fn directed(ordering: Ordering, direction: Direction) -> Ordering {
    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}

/// Missing, null, non-numeric, and NaN cells all sort as negative infinity.
fn numeric_key(row: &Record, field: &str) -> f64 {
    row.get(field)
        .and_then(Value::as_f64)
        .filter(|n| !n.is_nan())
        .unwrap_or(f64::NEG_INFINITY)
}

/// Missing and non-string cells sort as the empty string.
fn string_key<'a>(row: &'a Record, field: &str) -> &'a str {
    row.get(field).and_then(Value::as_str).unwrap_or("")
}

/// Compares strings with uppercase letters ordered before lowercase ones.
///
/// At the first differing character, a cased difference decides the ordering
/// (upper first); characters of the same case compare by their Unicode
/// lowercased form, falling back to code point. This puts `"B"` before `"a"`
/// and `"Apple"` before `"apple"`. Unicode case folding covers the supported
/// locales (en/ru); other scripts get plain code-point order.
fn collate(a: &str, b: &str) -> Ordering {
    let mut left = a.chars();
    let mut right = b.chars();
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                if x == y {
                    continue;
                }
                let by_case = case_rank(x).cmp(&case_rank(y));
                if by_case != Ordering::Equal {
                    return by_case;
                }
                let folded = x.to_lowercase().cmp(y.to_lowercase());
                if folded != Ordering::Equal {
                    return folded;
                }
                return x.cmp(&y);
            }
        }
    }
}

/// Uncased characters (digits, punctuation) rank with uppercase.
fn case_rank(c: char) -> u8 {
    if c.is_lowercase() { 1 } else { 0 }
}
