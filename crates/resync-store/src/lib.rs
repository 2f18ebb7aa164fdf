pub mod cell;
pub mod csv_store;
pub mod error;
pub mod memory;
pub mod snapshot;

pub use cell::{clean, parse_flag, parse_int_lossy, slot_suffix};
pub use csv_store::{
    ADDRESSES_FILE, COUNTRY_MAPPING_FILE, CUSTOM_FIELDS_FILE, CsvSnapshotStore, LIVE_ALUMNI_FILE,
    ORG_ATTRIBUTES_FILE, ORG_RELATIONSHIPS_FILE, PHONE_LIST_FILE,
};
pub use error::{Result, StoreError};
pub use memory::{ContactRow, MemoryStore};
pub use snapshot::SnapshotStore;
