//! CSV and XLSX writers for the activity log export.
//!
//! Both writers take rows that are already fetched and joined; they do no
//! filtering of their own.

use csv::{QuoteStyle, Terminator, WriterBuilder};
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::activity_format::{format_activity_date, format_activity_day};
use crate::error::CoreError;
use crate::types::Timestamp;

/// Column headers, in export order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "Date",
    "Project",
    "User",
    "Group",
    "Type",
    "Details",
    "Changed Fields",
];

/// Header line of the CSV export. Written unquoted, unlike data rows.
pub const CSV_HEADER: &str = "Date,Project,User,Group,Type,Details,Changed Fields";

pub const ACTIVITY_SHEET_NAME: &str = "Activity Log";
pub const SUMMARY_SHEET_NAME: &str = "Summary";
pub const SUMMARY_TITLE: &str = "BIOME Activity Log";

/// Longest string Excel accepts in one cell.
pub const XLSX_MAX_CELL_CHARS: usize = 32_767;

/// Requested export file type. Defaults to CSV.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Csv,
    Xlsx,
}

impl ExportFormat {
    /// Parse the `format` query parameter. Absent means CSV.
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            None | Some("") | Some("csv") => Ok(Self::Csv),
            Some("xlsx") => Ok(Self::Xlsx),
            Some(other) => Err(CoreError::Validation(format!(
                "Unsupported export format '{other}' (expected csv or xlsx)"
            ))),
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            Self::Csv => "text/csv; charset=utf-8",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Csv => "project_activities.csv",
            Self::Xlsx => "project_activities.xlsx",
        }
    }
}

/// One flattened activity, ready to be written.
///
/// Missing joined names are empty strings. `changed_fields` holds the
/// display lines already joined with `"; "`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRow {
    pub activity_date: Timestamp,
    pub project_name: String,
    pub user_name: String,
    pub group_name: String,
    pub activity_type: String,
    pub details: String,
    pub changed_fields: String,
}

impl ExportRow {
    /// Cell values in [`EXPORT_COLUMNS`] order.
    pub fn cells(&self) -> [String; 7] {
        [
            format_activity_date(&self.activity_date),
            self.project_name.clone(),
            self.user_name.clone(),
            self.group_name.clone(),
            self.activity_type.clone(),
            self.details.clone(),
            self.changed_fields.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Write the CSV export: fixed header, then every data field quoted with
/// embedded quotes doubled, one `\n`-terminated line per row.
pub fn write_csv(rows: &[ExportRow]) -> Result<Vec<u8>, CoreError> {
    let mut buf = Vec::with_capacity(CSV_HEADER.len() + rows.len() * 96);
    buf.extend_from_slice(CSV_HEADER.as_bytes());
    buf.push(b'\n');

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buf);

    for row in rows {
        writer
            .write_record(row.cells())
            .map_err(|e| CoreError::Internal(format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .into_inner()
        .map_err(|e| CoreError::Internal(format!("Failed to flush CSV export: {e}")))
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// Write the XLSX export: an activity sheet with the same columns as the
/// CSV, plus a summary sheet. `rows` are expected newest first.
pub fn write_xlsx(rows: &[ExportRow], generated_at: &Timestamp) -> Result<Vec<u8>, CoreError> {
    build_workbook(rows, generated_at)
        .and_then(|mut workbook| workbook.save_to_buffer())
        .map_err(|e| CoreError::Internal(format!("Failed to generate XLSX: {e}")))
}

fn build_workbook(rows: &[ExportRow], generated_at: &Timestamp) -> Result<Workbook, XlsxError> {
    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(ACTIVITY_SHEET_NAME)?;
    for (col, header) in EXPORT_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *header, &bold)?;
    }
    for (idx, row) in rows.iter().enumerate() {
        let row_idx = (idx + 1) as u32;
        for (col, value) in row.cells().iter().enumerate() {
            sheet.write_string(row_idx, col as u16, clip_cell(value))?;
        }
    }
    sheet.set_column_width(0, 20)?;
    sheet.set_column_width(5, 40)?;
    sheet.set_column_width(6, 60)?;

    let summary = workbook.add_worksheet();
    summary.set_name(SUMMARY_SHEET_NAME)?;
    summary.write_string_with_format(0, 0, SUMMARY_TITLE, &bold)?;
    summary.write_string(1, 0, "Generated on")?;
    summary.write_string(1, 1, format_activity_date(generated_at))?;
    summary.write_string(2, 0, "Total activities")?;
    summary.write_number(2, 1, rows.len() as f64)?;
    summary.write_string(3, 0, "Period covered")?;
    summary.write_string(3, 1, period_covered(rows))?;
    summary.set_column_width(0, 20)?;
    summary.set_column_width(1, 30)?;

    Ok(workbook)
}

/// Cut a value to [`XLSX_MAX_CELL_CHARS`] characters on a char boundary.
fn clip_cell(value: &str) -> &str {
    match value.char_indices().nth(XLSX_MAX_CELL_CHARS) {
        Some((end, _)) => &value[..end],
        None => value,
    }
}

/// `"{oldest} to {newest}"` for newest-first rows, or `"No data"`.
pub fn period_covered(rows: &[ExportRow]) -> String {
    match (rows.last(), rows.first()) {
        (Some(oldest), Some(newest)) => format!(
            "{} to {}",
            format_activity_day(&oldest.activity_date),
            format_activity_day(&newest.activity_date)
        ),
        _ => "No data".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
