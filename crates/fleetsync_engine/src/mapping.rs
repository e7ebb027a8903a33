//! The fixed pairing between provider and consumer vehicle ids.

use crate::error::{SyncError, SyncResult};
use std::collections::HashSet;

/// An ordered 1:1 mapping from provider vehicle ids to consumer vehicle ids.
///
/// Built once at startup from two positionally paired id lists and fixed for
/// the process lifetime. Vehicles are processed in the order the pairs were
/// configured.
#[derive(Debug, Clone)]
pub struct VehicleMapping {
    pairs: Vec<(String, String)>,
}

impl VehicleMapping {
    /// Builds the mapping from two positionally paired id lists.
    ///
    /// Fails if the lists differ in length, are empty, or the provider list
    /// repeats an id.
    pub fn from_lists(
        provider_ids: Vec<String>,
        consumer_ids: Vec<String>,
    ) -> SyncResult<Self> {
        if provider_ids.len() != consumer_ids.len() {
            return Err(SyncError::configuration(format!(
                "provider and consumer vehicle id counts must match \
                 ({} provider ids, {} consumer ids)",
                provider_ids.len(),
                consumer_ids.len()
            )));
        }

        if provider_ids.is_empty() {
            return Err(SyncError::configuration(
                "at least one vehicle pair must be configured",
            ));
        }

        let mut seen = HashSet::new();
        for id in &provider_ids {
            if !seen.insert(id.as_str()) {
                return Err(SyncError::configuration(format!(
                    "duplicate provider vehicle id '{id}'"
                )));
            }
        }

        Ok(Self {
            pairs: provider_ids.into_iter().zip(consumer_ids).collect(),
        })
    }

    /// Number of mapped vehicles.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no vehicles are mapped.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates the (provider id, consumer id) pairs in configured order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(p, c)| (p.as_str(), c.as_str()))
    }

    /// Iterates the provider ids in configured order.
    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(p, _)| p.as_str())
    }
}
