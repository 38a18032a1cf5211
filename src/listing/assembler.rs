use crate::results::{ListingRecord, PartialRecord};
use std::collections::HashSet;

/// Fold partial records into the final, duplicate-free record list.
///
/// Records are keyed by trimmed href. The first record seen for a key wins
/// outright; later ones are dropped without merging, even when they carry
/// more fields. Output keeps first-seen order.
pub fn assemble<I>(partials: I) -> Vec<ListingRecord>
where
    I: IntoIterator<Item = PartialRecord>,
{
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for partial in partials {
        let identity = partial.identity();
        if identity.is_empty() {
            continue;
        }
        if !seen.insert(identity.to_string()) {
            ::log::trace!("Dropping duplicate listing {}", identity);
            continue;
        }
        records.push(ListingRecord::from_partial(partial));
    }

    records
}
