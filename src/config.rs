use crate::utils::divup;
use crate::{RTreeError, RTreeResult};

/// Capacity parameters shared by every node of a tree.
///
/// `max_entries` is the node capacity `M`; `min_entries` is the minimum
/// fill `m` every non-root node keeps after an insert or delete.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RTreeConfig {
    pub max_entries: usize,
    pub min_entries: usize,
}

impl Default for RTreeConfig {
    fn default() -> Self {
        RTreeConfig {
            max_entries: 9,
            min_entries: 4,
        }
    }
}

impl RTreeConfig {
    pub fn new(max_entries: usize, min_entries: usize) -> RTreeResult<Self> {
        let config = RTreeConfig {
            max_entries,
            min_entries,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> RTreeResult<()> {
        if self.min_entries < 2 || self.min_entries > divup(self.max_entries, 2) {
            return Err(RTreeError::Configuration {
                max_entries: self.max_entries,
                min_entries: self.min_entries,
            });
        }
        Ok(())
    }
}
