//! Events emitted to the rendering collaborator

use crate::model::Record;
use crate::query::SortSpec;

/// Notification emitted by a [`GridView`](super::GridView) when its state
/// changes.
///
/// Delivered over the channel returned by
/// [`GridView::subscribe`](super::GridView::subscribe). Emission is
/// best-effort: with no subscriber, events are silently skipped.
#[derive(Debug, Clone)]
pub enum GridEvent {
    /// The row set was replaced (initial load or sort change); render from
    /// scratch.
    RowsReplaced(Vec<Record>),
    /// A page was appended after a scroll-triggered fetch; render only the
    /// new rows.
    RowsAppended(Vec<Record>),
    /// The loading flag toggled; show or hide the loading indicator.
    LoadingChanged(bool),
    /// The sort specification changed; update header markers.
    SortChanged(SortSpec),
}
