pub mod episode;
pub mod error;
pub mod merge;
pub mod recorder;
pub mod snapshot_persistance;
pub mod stats;
pub mod store;

pub use episode::*;
pub use error::*;
pub use merge::*;
pub use recorder::*;
pub use snapshot_persistance::*;
pub use stats::*;
pub use store::*;
