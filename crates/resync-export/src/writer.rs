//! Quote-all, CRLF-terminated CSV output.
//!
//! The downstream ingestion tool consumes these files byte-for-byte: every
//! field quoted, `\r\n` line endings, a header row, no index column.

use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use thiserror::Error;
use tracing::info;

use resync_model::{CustomField, SyncBatches};

use crate::batch::{
    ADDRESS_COLUMNS, ADDRESSES_FILE, CUSTOM_FIELD_COLUMNS, CUSTOM_FIELDS_FILE, NEW_LINKS_FILE,
    ORG_ATTRIBUTE_COLUMNS, ORG_ATTRIBUTES_FILE, ORGANIZATION_COLUMNS, ORGANIZATIONS_FILE,
    PHONE_COLUMNS, PHONES_FILE, address_row, custom_field_row, org_attribute_row,
    organization_row, phone_row,
};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Write all five batches into `dir`; returns the written paths in batch
/// order.
pub fn write_batches(dir: &Path, batches: &SyncBatches) -> Result<Vec<PathBuf>> {
    let organizations = write_rows(
        &dir.join(ORGANIZATIONS_FILE),
        &ORGANIZATION_COLUMNS,
        batches.organizations.iter().map(organization_row),
    )?;
    let attributes = write_rows(
        &dir.join(ORG_ATTRIBUTES_FILE),
        &ORG_ATTRIBUTE_COLUMNS,
        batches.org_attributes.iter().map(org_attribute_row),
    )?;
    let phones = write_rows(
        &dir.join(PHONES_FILE),
        &PHONE_COLUMNS,
        batches.contacts.iter().map(phone_row),
    )?;
    let addresses = write_rows(
        &dir.join(ADDRESSES_FILE),
        &ADDRESS_COLUMNS,
        batches.addresses.iter().map(address_row),
    )?;
    let custom_fields = write_rows(
        &dir.join(CUSTOM_FIELDS_FILE),
        &CUSTOM_FIELD_COLUMNS,
        batches.custom_fields.iter().map(custom_field_row),
    )?;
    let paths = vec![organizations, attributes, phones, addresses, custom_fields];
    info!(dir = %dir.display(), files = paths.len(), "batches exported");
    Ok(paths)
}

/// Write a discovery batch (same schema as custom fields).
pub fn write_new_links(dir: &Path, links: &[CustomField]) -> Result<PathBuf> {
    write_rows(
        &dir.join(NEW_LINKS_FILE),
        &CUSTOM_FIELD_COLUMNS,
        links.iter().map(custom_field_row),
    )
}

fn write_rows<I>(path: &Path, header: &[&str], rows: I) -> Result<PathBuf>
where
    I: Iterator<Item = Vec<String>>,
{
    let build = || -> std::result::Result<(), csv::Error> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::CRLF)
            .from_path(path)?;
        writer.write_record(header)?;
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    };
    build().map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(path.to_path_buf())
}
