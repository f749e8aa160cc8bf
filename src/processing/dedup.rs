//! First-occurrence row deduplication.

use std::collections::BTreeSet;

use crate::error::EnrichmentResult;
use crate::types::DataSet;

use super::group::{require_column, require_row_widths, GroupKey};

/// Keep only the first row for each distinct value of `key`.
///
/// Row order is preserved. Null keys count as one value, so only the first null-keyed row is
/// kept.
pub fn drop_duplicates(dataset: &DataSet, key: &str) -> EnrichmentResult<DataSet> {
    require_row_widths(dataset)?;
    let key_idx = require_column(dataset, key)?;
    let mut seen: BTreeSet<GroupKey> = BTreeSet::new();

    Ok(dataset.filter_rows(|row| seen.insert(GroupKey(row[key_idx].clone()))))
}
