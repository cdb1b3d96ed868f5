mod config;
mod coordinate;
mod entry;
mod error;
pub mod from_wkt;
mod node;
mod rectangle;
mod rtree;
pub mod utils;

pub use config::RTreeConfig;
pub use coordinate::Coordinate;
pub use error::{RTreeError, RTreeResult};
pub use rectangle::{HasEnvelope, Rectangle};
pub use rtree::{Iter, RTree};
