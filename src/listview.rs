//! Shared list-view filtering: every catalog page renders through the same
//! scope + search + facet pipeline, preserving catalog order.

/// A catalog record that the list views know how to search and facet.
pub trait ListEntity {
    /// Designated free-text fields; a query hit in any one of them counts.
    fn search_fields(&self) -> Vec<&str>;

    /// Value of a named facet, or `None` when the record does not carry it.
    fn facet(&self, name: &str) -> Option<String>;
}

/// Wildcard facet selection sent by the UI.
pub const FACET_ALL: &str = "all";

/// Filter `catalog` down to the entries visible under the current view state.
///
/// The result keeps catalog order and is the conjunction of:
/// - `scope(entity)` (tab membership),
/// - a case-insensitive substring match of `query` against the designated
///   search fields (empty query matches everything),
/// - equality on every facet whose selection is not [`FACET_ALL`]. A record
///   without a value for an active facet is excluded.
pub fn render<'a, T, S>(
    catalog: &'a [T],
    scope: S,
    query: &str,
    facets: &[(&str, &str)],
) -> Vec<&'a T>
where
    T: ListEntity,
    S: Fn(&T) -> bool,
{
    let needle = query.to_lowercase();

    catalog
        .iter()
        .filter(|entity| {
            if !scope(entity) {
                return false;
            }
            if !needle.is_empty() {
                let hit = entity
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
            facets.iter().all(|(name, selection)| {
                if *selection == FACET_ALL {
                    return true;
                }
                match entity.facet(name) {
                    Some(value) => value == *selection,
                    None => false,
                }
            })
        })
        .collect()
}
