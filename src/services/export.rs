//! Spreadsheet export of customer listings.

use std::fs;
use std::path::Path;

use chrono::Utc;
use rust_xlsxwriter::{Format, Workbook, XlsxError};
use tempfile::NamedTempFile;

use crate::context::RequestContext;
use crate::domain::customer::Customer;
use crate::forms::filter::CustomerQueryFilter;
use crate::repository::CustomerReader;
use crate::services::customer::list_customers;
use crate::services::{ServiceError, ServiceResult};

pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Column titles, in column order.
pub const EXPORT_HEADERS: [&str; 6] = ["ID", "Username", "Email", "Phone", "Address", "Created At"];

const SHEET_NAME: &str = "Customers";
const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A written export held in a temporary file.
///
/// The file is removed when the artifact is dropped, whichever way the
/// request finishes.
#[derive(Debug)]
pub struct ExportArtifact {
    file: NamedTempFile,
    file_name: String,
}

impl ExportArtifact {
    /// Name offered to the client, `customers_<YYYYMMDDHHMMSS>.xlsx`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Reads the spreadsheet and removes the temporary file.
    pub fn into_bytes(self) -> ServiceResult<Vec<u8>> {
        let bytes = fs::read(self.file.path())
            .map_err(|err| ServiceError::Export(format!("failed to read export file: {err}")))?;
        self.file
            .close()
            .map_err(|err| ServiceError::Export(format!("failed to remove export file: {err}")))?;
        Ok(bytes)
    }
}

fn export_error(err: XlsxError) -> ServiceError {
    ServiceError::Export(err.to_string())
}

fn write_workbook(customers: &[Customer], path: &Path) -> Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, title) in (0u16..).zip(EXPORT_HEADERS) {
        sheet.write_string_with_format(0, col, title, &header)?;
    }
    for (row, customer) in (1u32..).zip(customers) {
        sheet.write_number(row, 0, customer.id.get())?;
        sheet.write_string(row, 1, customer.username.as_str())?;
        sheet.write_string(row, 2, customer.email.as_str())?;
        sheet.write_string(row, 3, customer.phone.as_str())?;
        sheet.write_string(row, 4, customer.address.as_str())?;
        sheet.write_string(
            row,
            5,
            customer.created_at.format(CREATED_AT_FORMAT).to_string(),
        )?;
    }

    workbook.save(path)
}

/// Writes the customers selected by `filter` to a new spreadsheet in `dir`.
///
/// Filter errors keep their own kind; failing to read the rows or to write
/// the file is an `EXPORT_ERROR`.
pub fn export_customers<R>(
    repo: &R,
    ctx: &RequestContext,
    filter: &CustomerQueryFilter,
    dir: &Path,
) -> ServiceResult<ExportArtifact>
where
    R: CustomerReader + ?Sized,
{
    let customers = match list_customers(repo, filter) {
        Ok(page) => page.customers,
        Err(ServiceError::Storage(message)) => {
            return Err(ServiceError::Export(format!("failed to load customers: {message}")));
        }
        Err(err) => return Err(err),
    };
    ctx.check_deadline()?;

    let file = tempfile::Builder::new()
        .prefix("customers_")
        .suffix(".xlsx")
        .tempfile_in(dir)
        .map_err(|err| ServiceError::Export(format!("failed to create export file: {err}")))?;

    // On failure `file` is dropped here, which removes it.
    write_workbook(&customers, file.path()).map_err(export_error)?;

    let file_name = format!("customers_{}.xlsx", Utc::now().format("%Y%m%d%H%M%S"));
    log::info!("Exported {} customers to {}", customers.len(), file.path().display());
    Ok(ExportArtifact { file, file_name })
}
