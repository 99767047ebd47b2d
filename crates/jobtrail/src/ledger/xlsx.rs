//! Spreadsheet persistence for the ledger.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::{NaiveDateTime, SubsecRound};
use log::{debug, info};
use rust_xlsxwriter::{Color, ConditionalFormatFormula, Format, Workbook, Worksheet, XlsxError};

use crate::error::LedgerError;

use super::{parse_timestamp, ApplicationEvent, Ledger, LedgerStore, COLUMNS};

const STATUS_COLUMN: u16 = 5;
const HIGHLIGHT_COLOR: u32 = 0xFFEB9C;

/// Ledger stored as an `.xlsx` workbook at a fixed path.
#[derive(Debug, Clone)]
pub struct XlsxLedgerStore {
    path: PathBuf,
    sheet_name: String,
}

impl XlsxLedgerStore {
    pub fn new<P: AsRef<Path>>(path: P, sheet_name: impl Into<String>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_err(&self) -> impl Fn(XlsxError) -> LedgerError + '_ {
        move |e| LedgerError::Write {
            path: self.path.clone(),
            source: e,
        }
    }

    fn write_sheet(&self, worksheet: &mut Worksheet, ledger: &Ledger) -> Result<(), XlsxError> {
        worksheet.set_name(&self.sheet_name)?;

        let header = Format::new().set_bold();
        for (col, name) in COLUMNS.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *name, &header)?;
        }

        for (index, event) in ledger.rows().iter().enumerate() {
            let row = index as u32 + 1;
            worksheet.write_string(row, 0, event.date_received_str())?;
            worksheet.write_string(row, 1, &event.sender_name)?;
            worksheet.write_string(row, 2, &event.sender_email)?;
            worksheet.write_string(row, 3, &event.subject)?;
            worksheet.write_boolean(row, 4, event.has_attachments)?;
            worksheet.write_string(row, STATUS_COLUMN, &event.status)?;
            worksheet.write_string(row, 6, event.last_updated_str())?;
        }

        if !ledger.is_empty() {
            // Highlight every row whose Status cell is filled in.
            let last_row = ledger.len() as u32;
            let highlight = Format::new().set_background_color(Color::RGB(HIGHLIGHT_COLOR));
            let rule = ConditionalFormatFormula::new()
                .set_rule("=LEN(TRIM($F2))>0")
                .set_format(&highlight);
            worksheet.add_conditional_format(1, 0, last_row, COLUMNS.len() as u16 - 1, &rule)?;
        }

        worksheet.set_freeze_panes(1, 0)?;
        worksheet.autofit();

        Ok(())
    }

    fn read_rows(&self, rows: &[&[Data]]) -> Result<Vec<ApplicationEvent>, LedgerError> {
        let Some((header, body)) = rows.split_first() else {
            return Ok(Vec::new());
        };

        let mut positions = [0usize; COLUMNS.len()];
        for (slot, column) in positions.iter_mut().zip(COLUMNS) {
            *slot = header
                .iter()
                .position(|cell| cell_text(Some(cell)) == column)
                .ok_or_else(|| LedgerError::MissingColumn {
                    path: self.path.clone(),
                    column: column.to_string(),
                })?;
        }

        let mut events = Vec::with_capacity(body.len());
        for (index, row) in body.iter().enumerate() {
            // Spreadsheet row number, header is row 1.
            let row_number = index + 2;
            if row.iter().all(is_blank) {
                continue;
            }

            let invalid = |reason: String| LedgerError::InvalidRow {
                row: row_number,
                reason,
            };

            let date_received = cell_timestamp(field(row, &positions, 0)).ok_or_else(|| {
                invalid(format!(
                    "unreadable Date Received '{}'",
                    cell_text(field(row, &positions, 0))
                ))
            })?;
            let last_updated = cell_timestamp(field(row, &positions, 6)).ok_or_else(|| {
                invalid(format!(
                    "unreadable Last Updated '{}'",
                    cell_text(field(row, &positions, 6))
                ))
            })?;
            let has_attachments = cell_bool(field(row, &positions, 4)).map_err(invalid)?;

            events.push(ApplicationEvent {
                date_received,
                sender_name: cell_text(field(row, &positions, 1)),
                sender_email: cell_text(field(row, &positions, 2)),
                subject: cell_text(field(row, &positions, 3)),
                has_attachments,
                status: cell_text(field(row, &positions, 5)),
                last_updated,
            });
        }

        Ok(events)
    }
}

impl LedgerStore for XlsxLedgerStore {
    fn load(&self) -> Result<Option<Ledger>, LedgerError> {
        if !self.path.exists() {
            debug!("No ledger at {}, starting fresh", self.path.display());
            return Ok(None);
        }

        let open_err = |e| LedgerError::Open {
            path: self.path.clone(),
            source: e,
        };

        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(open_err)?;

        let sheet_names = workbook.sheet_names();
        let sheet = sheet_names
            .iter()
            .find(|name| **name == self.sheet_name)
            .or_else(|| sheet_names.first())
            .cloned()
            .ok_or_else(|| LedgerError::NoWorksheet {
                path: self.path.clone(),
            })?;

        let range = workbook.worksheet_range(&sheet).map_err(open_err)?;
        let rows: Vec<&[Data]> = range.rows().collect();
        let events = self.read_rows(&rows)?;

        info!(
            "Loaded {} ledger rows from {} (sheet '{}')",
            events.len(),
            self.path.display(),
            sheet
        );

        Ok(Some(Ledger::from_rows(events)))
    }

    fn save(&self, ledger: &Ledger) -> Result<(), LedgerError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LedgerError::CreateDirectory {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.write_sheet(worksheet, ledger).map_err(self.write_err())?;
        workbook.save(&self.path).map_err(self.write_err())?;

        info!("Wrote {} ledger rows to {}", ledger.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn field<'a>(row: &'a [Data], positions: &[usize], column: usize) -> Option<&'a Data> {
    row.get(positions[column])
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) if f.fract() == 0.0 => format!("{}", *f as i64),
        Some(other) => other.to_string(),
    }
}

fn cell_timestamp(cell: Option<&Data>) -> Option<NaiveDateTime> {
    match cell? {
        // Serial day fractions drift below a second; snap to whole seconds.
        Data::DateTime(dt) => dt.as_datetime().map(|t| t.round_subsecs(0)),
        Data::DateTimeIso(s) | Data::String(s) => parse_timestamp(s),
        _ => None,
    }
}

fn cell_bool(cell: Option<&Data>) -> Result<bool, String> {
    match cell {
        None | Some(Data::Empty) => Ok(false),
        Some(Data::Bool(b)) => Ok(*b),
        Some(Data::Int(i)) => Ok(*i != 0),
        Some(Data::Float(f)) => Ok(*f != 0.0),
        Some(Data::String(s)) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" | "" => Ok(false),
            other => Err(format!("unreadable Has Attachments '{}'", other)),
        },
        Some(other) => Err(format!("unreadable Has Attachments '{}'", other)),
    }
}
