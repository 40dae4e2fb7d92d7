use crate::api::UserRecord;
use crate::app::AppState;

/// Case-insensitive substring filter over name and email.
///
/// The query matches against the space-joined "first last" name or the
/// email address. An empty query keeps every record, in order. The result
/// is a derived view; it holds no state of its own.
pub fn filter(records: &[UserRecord], query: &str) -> Vec<UserRecord> {
    let q = query.to_lowercase();
    if q.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| {
            r.full_name().to_lowercase().contains(&q) || r.email.to_lowercase().contains(&q)
        })
        .cloned()
        .collect()
}

/// Recompute the visible member list from the registry and current query,
/// clamping the selection into the new view. Called after every query edit
/// and after every registry mutation.
pub fn apply_search(app: &mut AppState) {
    app.visible = filter(app.registry.records(), &app.search_query);
    app.selected_index = app.selected_index.min(app.visible.len().saturating_sub(1));
}
