//! Sort specification types

use serde::Deserialize;
use serde::Serialize;

/// Sort direction for ordering rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Ascending order (A-Z, 0-9).
    Asc,
    /// Descending order (Z-A, 9-0).
    Desc,
}

impl Direction {
    /// Returns the wire form of the direction (`"asc"` / `"desc"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }

    /// Returns the opposite direction.
    pub fn inverted(&self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Specifies how the view's rows are ordered.
///
/// `Natural` means no ordering is applied and rows keep their source order;
/// it is also what an empty sort field collapses to.
///
/// # Example
///
/// ```
/// use datagrid_lib::query::{Direction, SortSpec};
///
/// let sort = SortSpec::asc("title");
/// assert_eq!(sort.field(), Some("title"));
/// assert_eq!(sort.reversed().direction(), Some(Direction::Desc));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SortSpec {
    /// Unsorted: rows keep their natural (source) order.
    #[default]
    Natural,
    /// Sorted by a single column.
    By {
        /// Column id the rows are ordered by.
        field: String,
        /// Sort direction.
        direction: Direction,
    },
}

impl SortSpec {
    /// Creates an ascending sort on a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::by(field, Direction::Asc)
    }

    /// Creates a descending sort on a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::by(field, Direction::Desc)
    }

    /// Creates a sort on a field with an explicit direction.
    pub fn by(field: impl Into<String>, direction: Direction) -> Self {
        let field = field.into();
        if field.is_empty() {
            return SortSpec::Natural;
        }
        SortSpec::By { field, direction }
    }

    /// Returns `true` if no ordering is applied.
    pub fn is_natural(&self) -> bool {
        matches!(self, SortSpec::Natural)
    }

    /// Returns the sorted field, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            SortSpec::Natural => None,
            SortSpec::By { field, .. } => Some(field.as_str()),
        }
    }

    /// Returns the sort direction, if any.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            SortSpec::Natural => None,
            SortSpec::By { direction, .. } => Some(*direction),
        }
    }

    /// Returns the spec with its direction flipped.
    ///
    /// Used for repeated header clicks on the same column; a natural spec
    /// stays natural.
    pub fn reversed(&self) -> Self {
        match self {
            SortSpec::Natural => SortSpec::Natural,
            SortSpec::By { field, direction } => SortSpec::By {
                field: field.clone(),
                direction: direction.inverted(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_wire_form() {
        assert_eq!(Direction::Asc.as_str(), "asc");
        assert_eq!(Direction::Desc.as_str(), "desc");
        assert_eq!(Direction::Asc.inverted(), Direction::Desc);
    }

    #[test]
    fn test_empty_field_is_natural() {
        assert!(SortSpec::asc("").is_natural());
        assert_eq!(SortSpec::by("", Direction::Desc), SortSpec::Natural);
    }

    #[test]
    fn test_reversed() {
        let sort = SortSpec::asc("price");
        assert_eq!(sort.reversed(), SortSpec::desc("price"));
        assert_eq!(sort.reversed().reversed(), sort);
        assert!(SortSpec::Natural.reversed().is_natural());
    }
}
