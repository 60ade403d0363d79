//! Row window and merge types for incremental loading

use crate::model::Record;

/// Half-open index range `[start, end)` of rows materialized into the view.
///
/// `end - start` is the page size. Within a session the window only grows:
/// each successful incremental fetch advances it by the configured step,
/// regardless of how many rows that fetch actually returned (tracking "fewer
/// than step means end of data" is a separate concern, see
/// [`GridViewBuilder::stop_on_short_page`](crate::GridViewBuilder::stop_on_short_page)).
///
/// # Example
///
/// ```
/// use datagrid_lib::query::Window;
///
/// let window = Window::initial(30);
/// assert_eq!((window.start(), window.end()), (0, 30));
/// assert_eq!(window.advance(30).start(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    start: usize,
    end: usize,
}

impl Window {
    /// Creates a window covering `[start, end)`.
    ///
    /// # Panics
    ///
    /// Panics if `end <= start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end > start, "window end must exceed start");
        Self { start, end }
    }

    /// Creates the first window, `[0, step)`.
    pub fn initial(step: usize) -> Self {
        Self::new(0, step)
    }

    /// Returns the next window: `[end, end + step)`.
    pub fn advance(&self, step: usize) -> Self {
        Self::new(self.end, self.end + step)
    }

    /// Returns the inclusive lower bound.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the exclusive upper bound.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the window length (the page size).
    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// How freshly fetched rows combine with the rows already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeMode {
    /// Discard the existing rows; used after a sort change or initial load.
    Replace,
    /// Concatenate after the existing rows; used after a scroll-triggered
    /// fetch. No duplicate detection is performed, so the data source must
    /// supply a disjoint next page.
    Append,
}

/// Merges incoming rows into the existing row set.
pub fn merge_rows(existing: Vec<Record>, incoming: Vec<Record>, mode: MergeMode) -> Vec<Record> {
    match mode {
        MergeMode::Replace => incoming,
        MergeMode::Append => {
            let mut rows = existing;
            rows.extend(incoming);
            rows
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_chain() {
        let mut window = Window::initial(30);
        for expected in [(30, 60), (60, 90), (90, 120)] {
            window = window.advance(30);
            assert_eq!((window.start(), window.end()), expected);
        }
    }

    #[test]
    fn test_window_len() {
        assert_eq!(Window::initial(30).len(), 30);
        assert_eq!(Window::new(60, 90).len(), 30);
    }

    #[test]
    #[should_panic(expected = "window end must exceed start")]
    fn test_zero_length_window_rejected() {
        Window::new(30, 30);
    }

    #[test]
    fn test_merge_replace() {
        let existing = vec![Record::new().set("id", 1i64)];
        let incoming = vec![Record::new().set("id", 2i64)];
        let rows = merge_rows(existing, incoming.clone(), MergeMode::Replace);
        assert_eq!(rows, incoming);
    }

    #[test]
    fn test_merge_append_keeps_order() {
        let existing = vec![
            Record::new().set("id", 1i64),
            Record::new().set("id", 2i64),
        ];
        let incoming = vec![Record::new().set("id", 3i64)];
        let rows = merge_rows(existing, incoming, MergeMode::Append);
        let ids: Vec<_> = rows.iter().map(|r| r.get_f64("id").unwrap().unwrap()).collect();
        assert_eq!(ids, [1.0, 2.0, 3.0]);
    }
}
