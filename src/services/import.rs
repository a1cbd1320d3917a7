//! Spreadsheet import of customers.

use std::io::{Cursor, Read};
use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto_from_rs};

use crate::context::RequestContext;
use crate::domain::customer::NewCustomer;
use crate::dto::customer::{ImportReport, RowFailure};
use crate::forms::customer::CreateCustomerRequest;
use crate::repository::CustomerWriter;
use crate::services::batch::persist_all;
use crate::services::{ServiceError, ServiceResult};

/// Accepted upload formats, detected from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    Xlsx,
    Xls,
}

impl SpreadsheetFormat {
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let extension = Path::new(file_name).extension()?.to_str()?;
        match extension.to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }
}

const REQUIRED_COLUMNS: [&str; 4] = ["username", "email", "phone", "address"];

/// Positions of the required columns within the header row.
struct ColumnMap([usize; 4]);

impl ColumnMap {
    fn from_header(header: &[Data]) -> ServiceResult<Self> {
        let titles: Vec<String> = header
            .iter()
            .map(|cell| cell_text(cell).to_ascii_lowercase())
            .collect();

        let mut positions = [0; 4];
        for (slot, column) in positions.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = titles
                .iter()
                .position(|title| title == column)
                .ok_or_else(|| ServiceError::Parse(format!("missing required column `{column}`")))?;
        }
        Ok(Self(positions))
    }

    fn request(&self, row: &[Data]) -> CreateCustomerRequest {
        let cell = |index: usize| row.get(index).map(cell_text).unwrap_or_default();
        let [username, email, phone, address] = self.0;
        CreateCustomerRequest {
            username: cell(username),
            email: cell(email),
            phone: cell(phone),
            address: cell(address),
        }
    }
}

/// Renders a cell as trimmed text. Whole numbers lose their fractional part
/// so phone numbers stored as numbers round-trip.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Float(value) if value.fract() == 0.0 => format!("{value:.0}"),
        other => other.to_string().trim().to_string(),
    }
}

fn is_blank(row: &[Data]) -> bool {
    row.iter().all(|cell| cell_text(cell).is_empty())
}

/// Imports customers from an uploaded spreadsheet.
///
/// The extension is checked before the upload is read. Rows are numbered
/// from 1, the header excluded; blank rows are skipped. Valid rows are
/// stored in order, invalid ones are reported in `failed`.
pub fn import_customers<R>(
    repo: &R,
    ctx: &RequestContext,
    file_name: &str,
    mut upload: impl Read,
) -> ServiceResult<ImportReport>
where
    R: CustomerWriter + ?Sized,
{
    let format = SpreadsheetFormat::from_file_name(file_name).ok_or_else(|| {
        ServiceError::InvalidFileType(format!(
            "unsupported file `{file_name}`, expected .xlsx or .xls"
        ))
    })?;
    log::debug!("Importing customers from {file_name} ({format:?})");

    let mut bytes = Vec::new();
    upload
        .read_to_end(&mut bytes)
        .map_err(|err| ServiceError::Internal(format!("failed to read upload: {err}")))?;
    ctx.check_deadline()?;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
        .map_err(|err| ServiceError::Parse(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ServiceError::Parse("workbook has no sheets".to_string()))?
        .map_err(|err| ServiceError::Parse(err.to_string()))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ServiceError::Parse("missing header row".to_string()))?;
    let columns = ColumnMap::from_header(header)?;

    let mut accepted: Vec<(usize, NewCustomer)> = Vec::new();
    let mut failed = Vec::new();
    for (row_number, row) in (1..).zip(rows) {
        if is_blank(row) {
            continue;
        }
        match columns.request(row).into_new_customer() {
            Ok(customer) => accepted.push((row_number, customer)),
            Err(errors) => failed.push(RowFailure {
                row: row_number,
                errors,
            }),
        }
    }

    let (row_numbers, customers): (Vec<usize>, Vec<NewCustomer>) = accepted.into_iter().unzip();
    let created = persist_all(repo, ctx, &customers, |index| {
        format!("row[{}]", row_numbers[index])
    })?;

    log::info!(
        "Imported {} customers from {file_name}, {} rows rejected",
        created.len(),
        failed.len()
    );
    Ok(ImportReport {
        imported: created.len(),
        failed,
    })
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use rust_xlsxwriter::Workbook;

    use super::*;
    use crate::repository::mock::MockRepository;
    use crate::services::customer::fixtures::stored;

    fn ctx() -> RequestContext {
        RequestContext::new(None, Duration::from_secs(30))
    }

    /// Builds an xlsx upload whose first row is `header`.
    fn spreadsheet(header: &[&str], rows: &[&[&str]]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, title) in (0u16..).zip(header) {
            sheet.write_string(0, col, *title).unwrap();
        }
        for (row, values) in (1u32..).zip(rows) {
            for (col, value) in (0u16..).zip(values.iter()) {
                if !value.is_empty() {
                    sheet.write_string(row, col, *value).unwrap();
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    struct Untouched;

    impl Read for Untouched {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            panic!("upload must not be read");
        }
    }

    #[test]
    fn format_is_detected_case_insensitively() {
        assert_eq!(SpreadsheetFormat::from_file_name("a.XLSX"), Some(SpreadsheetFormat::Xlsx));
        assert_eq!(SpreadsheetFormat::from_file_name("a.xls"), Some(SpreadsheetFormat::Xls));
        assert_eq!(SpreadsheetFormat::from_file_name("a.csv"), None);
        assert_eq!(SpreadsheetFormat::from_file_name("xlsx"), None);
    }

    #[test]
    fn csv_upload_is_rejected_before_reading() {
        let mut repo = MockRepository::new();
        repo.expect_create_customer().times(0);

        let err = import_customers(&repo, &ctx(), "customers.csv", Untouched).unwrap_err();

        assert_eq!(err.kind(), "INVALID_FILE_TYPE");
    }

    #[test]
    fn valid_rows_are_stored_and_invalid_rows_reported() {
        let upload = spreadsheet(
            &["Username", "Email", "Phone", "Address"],
            &[
                &["citra", "citra@example.com", "0813", "Surabaya"],
                &["dewi", "", "0814", "Malang"],
            ],
        );
        let mut repo = MockRepository::new();
        repo.expect_create_customer()
            .withf(|customer| customer.username.as_str() == "citra")
            .times(1)
            .returning(|customer| Ok(stored(1, customer)));

        let report = import_customers(&repo, &ctx(), "customers.xlsx", upload.as_slice()).unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].row, 2);
        assert_eq!(report.failed[0].errors.get("email"), Some("email is required"));
    }

    #[test]
    fn blank_rows_are_skipped_and_columns_matched_by_name() {
        let upload = spreadsheet(
            &["Notes", "ADDRESS", "phone", "Email", "username"],
            &[
                &["", "", "", "", ""],
                &["vip", "Depok", "0815", "eko@example.com", "eko"],
            ],
        );
        let mut repo = MockRepository::new();
        repo.expect_create_customer()
            .withf(|customer| {
                customer.username.as_str() == "eko" && customer.address.as_str() == "Depok"
            })
            .times(1)
            .returning(|customer| Ok(stored(1, customer)));

        let report = import_customers(&repo, &ctx(), "upload.xlsx", upload.as_slice()).unwrap();

        assert_eq!(report.imported, 1);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn missing_required_column_is_a_parse_error() {
        let upload = spreadsheet(&["Username", "Email", "Phone"], &[&["a", "a@example.com", "1"]]);
        let mut repo = MockRepository::new();
        repo.expect_create_customer().times(0);

        let err = import_customers(&repo, &ctx(), "upload.xlsx", upload.as_slice()).unwrap_err();

        assert_eq!(err.kind(), "PARSE_ERROR");
        assert!(err.to_string().contains("address"), "{err}");
    }

    #[test]
    fn corrupt_workbook_is_a_parse_error() {
        let repo = MockRepository::new();
        let err = import_customers(&repo, &ctx(), "upload.xlsx", &b"not a workbook"[..]).unwrap_err();
        assert_eq!(err.kind(), "PARSE_ERROR");
    }

    #[test]
    fn xls_upload_is_parsed_by_content() {
        let upload = spreadsheet(
            &["username", "email", "phone", "address"],
            &[&["eka", "eka@example.com", "0815", "Depok"]],
        );
        let mut repo = MockRepository::new();
        repo.expect_create_customer()
            .times(1)
            .returning(|customer| Ok(stored(1, customer)));

        let report = import_customers(&repo, &ctx(), "legacy.XLS", upload.as_slice()).unwrap();

        assert_eq!(report.imported, 1);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn corrupt_xls_upload_is_a_parse_error() {
        let mut repo = MockRepository::new();
        repo.expect_create_customer().times(0);
        let err = import_customers(&repo, &ctx(), "legacy.xls", &b"\xD0\xCF\x11\xE0 truncated"[..])
            .unwrap_err();
        assert_eq!(err.kind(), "PARSE_ERROR");
    }

    #[test]
    fn whole_number_cells_render_without_fraction() {
        assert_eq!(cell_text(&Data::Float(81234567.0)), "81234567");
        assert_eq!(cell_text(&Data::Float(1.5)), "1.5");
        assert_eq!(cell_text(&Data::String("  x ".to_string())), "x");
        assert_eq!(cell_text(&Data::Empty), "");
    }
}
