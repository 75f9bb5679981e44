//! Library tree domain: the lazily-loaded directory/track tree, the listing
//! seam it loads through, and the on-demand metadata probe.
//!
//! The tree never touches storage directly; every listing goes through a
//! [`DirectoryLister`], which keeps the model synchronous, deterministic and
//! trivially fakeable in tests.

mod error;
mod listing;
mod model;
pub mod probe;
mod tree;

pub use error::*;
pub use listing::*;
pub use model::*;
pub use tree::*;
