//! Reports module - CSV and PDF expense exports.

mod csv_export;
mod pdf_export;
mod reports_model;
mod reports_service;

pub use csv_export::{render_csv, CSV_HEADERS};
pub use pdf_export::render_pdf;
pub use reports_model::{ExpenseReportRow, ReportFile, ReportFormat, ReportHeader};
pub use reports_service::{ReportService, ReportServiceTrait};
