//! Multi-sheet workbook export: a dashboard with one status pie per record
//! kind, followed by a raw data sheet per non-empty kind.

use rust_xlsxwriter::{Chart, ChartType, Format, Workbook, Worksheet};
use tracing::debug;

use super::distribution::StatusDistribution;
use super::error::ReportError;
use super::models::{AggregationBundle, RecordKind};
use super::normalizer::{Cell, Table, normalize};

pub const DASHBOARD_SHEET: &str = "Dashboard";
pub const DASHBOARD_TITLE: &str = "OpsNexus Report Dashboard";
pub const XLSX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const XLSX_FILENAME: &str = "OpsNexus_Report.xlsx";

const SECTION_LABEL_ROW: u32 = 2;
const FIRST_STATUS_ROW: u32 = 3;
const CHART_ROW: u32 = 9;
const ALERT_SECTION_COLUMN: u16 = 0;
const TICKET_SECTION_COLUMN: u16 = 4;
const DASHBOARD_COLUMNS: u16 = 26;
const DASHBOARD_COLUMN_WIDTH: f64 = 20.0;
const TIMESTAMP_FORMAT: &str = "yyyy-mm-dd hh:mm:ss";

/// A cell range as `(first_row, first_col, last_row, last_col)`, zero-based.
pub type CellRange = (u32, u16, u32, u16);

/// One status summary on the dashboard: a label, the status/count cells
/// beneath it, and a pie chart over exactly those cells.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSection {
    kind: RecordKind,
    column: u16,
    distribution: StatusDistribution,
}

impl DashboardSection {
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn distribution(&self) -> &StatusDistribution {
        &self.distribution
    }

    pub fn label(&self) -> String {
        format!("{} Status Distribution", self.kind)
    }

    pub fn chart_title(&self) -> String {
        format!("{} Status", self.kind)
    }

    pub fn category_range(&self) -> CellRange {
        (FIRST_STATUS_ROW, self.column, self.last_status_row(), self.column)
    }

    pub fn value_range(&self) -> CellRange {
        (FIRST_STATUS_ROW, self.column + 1, self.last_status_row(), self.column + 1)
    }

    pub fn chart_anchor(&self) -> (u32, u16) {
        (CHART_ROW, self.column)
    }

    // Sections are only built for non-empty tables, so there is at least one status.
    fn last_status_row(&self) -> u32 {
        FIRST_STATUS_ROW + self.distribution.len() as u32 - 1
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataSheet {
    name: String,
    table: Table,
}

impl DataSheet {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &Table {
        &self.table
    }
}

/// Everything the workbook will contain, computed before any bytes are written.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookPlan {
    sections: Vec<DashboardSection>,
    data_sheets: Vec<DataSheet>,
}

impl WorkbookPlan {
    pub fn sections(&self) -> &[DashboardSection] {
        &self.sections
    }

    pub fn data_sheets(&self) -> &[DataSheet] {
        &self.data_sheets
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ReportError> {
        let mut workbook = Workbook::new();
        workbook.push_worksheet(self.build_dashboard()?);
        for sheet in &self.data_sheets {
            workbook.push_worksheet(build_data_sheet(sheet)?);
        }
        let bytes = workbook.save_to_buffer()?;
        debug!(
            bytes = bytes.len(),
            sections = self.sections.len(),
            data_sheets = self.data_sheets.len(),
            "Workbook serialized."
        );
        Ok(bytes)
    }

    fn build_dashboard(&self) -> Result<Worksheet, ReportError> {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(DASHBOARD_SHEET)?;
        for column in 0..DASHBOARD_COLUMNS {
            worksheet.set_column_width(column, DASHBOARD_COLUMN_WIDTH)?;
        }

        let title_format = Format::new().set_bold().set_font_size(14);
        worksheet.write_string_with_format(0, 0, DASHBOARD_TITLE, &title_format)?;

        for section in &self.sections {
            worksheet.write_string(SECTION_LABEL_ROW, section.column, section.label())?;
            for (offset, (status, count)) in section.distribution.entries().iter().enumerate() {
                let row = FIRST_STATUS_ROW + offset as u32;
                worksheet.write_string(row, section.column, status.as_str())?;
                worksheet.write_number(row, section.column + 1, *count as f64)?;
            }

            let mut chart = Chart::new(ChartType::Pie);
            chart
                .add_series()
                .set_name(section.kind.plural())
                .set_categories(with_sheet(section.category_range()))
                .set_values(with_sheet(section.value_range()));
            let title = section.chart_title();
            chart.title().set_name(title.as_str());

            let (row, column) = section.chart_anchor();
            worksheet.insert_chart(row, column, &chart)?;
        }

        Ok(worksheet)
    }
}

fn with_sheet(range: CellRange) -> (&'static str, u32, u16, u32, u16) {
    (DASHBOARD_SHEET, range.0, range.1, range.2, range.3)
}

// Spreadsheet numbers are doubles; larger ids are written as text.
const MAX_EXACT_INTEGER: u64 = 1 << 53;

fn build_data_sheet(sheet: &DataSheet) -> Result<Worksheet, ReportError> {
    let mut worksheet = Worksheet::new();
    worksheet.set_name(sheet.name.as_str())?;

    let header_format = Format::new().set_bold();
    let timestamp_format = Format::new().set_num_format(TIMESTAMP_FORMAT);

    for (col, name) in sheet.table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
    }
    if let Some(first) = sheet.table.rows().first() {
        for (col, cell) in first.iter().enumerate() {
            if matches!(cell, Cell::Timestamp(_)) {
                worksheet.set_column_width(col as u16, DASHBOARD_COLUMN_WIDTH)?;
            }
        }
    }

    for (index, row) in sheet.table.rows().iter().enumerate() {
        let row_num = index as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Integer(value) if value.unsigned_abs() <= MAX_EXACT_INTEGER => {
                    worksheet.write_number(row_num, col, *value as f64)?;
                }
                Cell::Integer(value) => {
                    worksheet.write_string(row_num, col, value.to_string())?;
                }
                Cell::Timestamp(value) => {
                    worksheet.write_datetime_with_format(row_num, col, value, &timestamp_format)?;
                }
                Cell::Text(value) => {
                    worksheet.write_string(row_num, col, value.as_str())?;
                }
            }
        }
    }

    Ok(worksheet)
}

/// Lays out the workbook for a bundle. Empty record kinds get neither a
/// dashboard section nor a data sheet.
pub fn plan_workbook(bundle: &AggregationBundle) -> Result<WorkbookPlan, ReportError> {
    if bundle.is_empty() {
        debug!("No records in range, dashboard carries the title only.");
    }
    let (alerts, tickets) = normalize(bundle);
    let mut sections = Vec::new();
    let mut data_sheets = Vec::new();

    for (table, column) in [(alerts, ALERT_SECTION_COLUMN), (tickets, TICKET_SECTION_COLUMN)] {
        if table.is_empty() {
            continue;
        }
        let distribution = StatusDistribution::from_table(&table)?;
        debug!(
            kind = %table.kind(),
            statuses = distribution.len(),
            records = distribution.total(),
            "Planned dashboard section."
        );
        sections.push(DashboardSection {
            kind: table.kind(),
            column,
            distribution,
        });
        data_sheets.push(DataSheet {
            name: format!("{} Data", table.kind().plural()),
            table,
        });
    }

    Ok(WorkbookPlan {
        sections,
        data_sheets,
    })
}

pub fn render_workbook(bundle: &AggregationBundle) -> Result<Vec<u8>, ReportError> {
    plan_workbook(bundle)?.to_bytes()
}
