use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RTreeError {
    /// Node capacity and minimum fill must satisfy `2 <= min <= ceil(max / 2)`.
    #[error("invalid configuration: max_entries={max_entries}, min_entries={min_entries} (need 2 <= min_entries <= ceil(max_entries / 2))")]
    Configuration {
        max_entries: usize,
        min_entries: usize,
    },

    #[error("WKT parse error: {0}")]
    Wkt(String),
}

pub type RTreeResult<T> = Result<T, RTreeError>;
