use std::collections::BTreeSet;

use crate::DateKey;

/// Sorted, duplicate free union of the given dates.
pub fn date_axis<'a, I>(dates: I) -> Vec<DateKey>
where
    I: IntoIterator<Item = &'a DateKey>,
{
    dates
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect()
}
