pub mod batch;
pub mod writer;

pub use batch::{
    ADDRESS_COLUMNS, ADDRESSES_FILE, CUSTOM_FIELD_COLUMNS, CUSTOM_FIELDS_FILE, NEW_LINKS_FILE,
    ORG_ATTRIBUTE_COLUMNS, ORG_ATTRIBUTES_FILE, ORGANIZATION_COLUMNS, ORGANIZATIONS_FILE,
    PHONE_COLUMNS, PHONES_FILE,
};
pub use writer::{ExportError, write_batches, write_new_links};
