pub mod addresses;
pub mod allocator;
pub mod config;
pub mod contacts;
pub mod diff;
pub mod discovery;
pub mod driver;
pub mod employment;
pub mod matcher;
pub mod normalize;

pub use allocator::ImportIdAllocator;
pub use config::{DEFAULT_COMMENT_LIMIT, DEFAULT_MATCH_THRESHOLD, MissingMonthRule, SyncOptions};
pub use discovery::{discover_links, run_discovery};
pub use driver::SyncRun;
pub use matcher::{best_match, similarity};
