use std::collections::BTreeMap;

use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfLayerReference};
use rust_decimal::Decimal;

use super::reports_model::{ExpenseReportRow, ReportHeader};
use crate::errors::Result;
use crate::Error;

// A4 landscape
const PAGE_WIDTH: f32 = 297.0;
const PAGE_HEIGHT: f32 = 210.0;
const MARGIN: f32 = 12.0;
const ROW_HEIGHT: f32 = 6.0;
const BODY_SIZE: f32 = 8.0;
const HEADER_SIZE: f32 = 8.5;
const TITLE_SIZE: f32 = 16.0;

/// Column title, x offset from the left margin and maximum characters.
const COLUMNS: [(&str, f32, usize); 10] = [
    ("Date", 0.0, 10),
    ("Employee", 20.0, 18),
    ("Department", 52.0, 14),
    ("Category", 78.0, 15),
    ("Vendor", 106.0, 18),
    ("Description", 138.0, 30),
    ("Amount", 190.0, 14),
    ("Cur.", 214.0, 4),
    ("Status", 226.0, 9),
    ("Violations", 244.0, 20),
];

fn pdf_error(e: printpdf::Error) -> Error {
    Error::Report(format!("Failed to render PDF: {}", e))
}

/// Builtin PDF fonts only cover Latin-1; anything else is replaced.
fn printable(text: &str, max_chars: usize) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| if (c as u32) < 0x20 || (c as u32) > 0xFF { '?' } else { c })
        .collect();
    if cleaned.chars().count() <= max_chars {
        return cleaned;
    }
    let mut truncated: String = cleaned.chars().take(max_chars.saturating_sub(1)).collect();
    truncated.push('~');
    truncated
}

fn row_cells(row: &ExpenseReportRow) -> [String; 10] {
    [
        row.date.to_string(),
        row.employee.clone(),
        row.department.clone(),
        row.category.clone(),
        row.vendor.clone(),
        row.description.clone(),
        format!("{:.2}", row.amount),
        row.currency.clone(),
        row.status.clone(),
        row.violations.join(", "),
    ]
}

struct PageWriter<'a> {
    layer: PdfLayerReference,
    regular: &'a IndirectFontRef,
    bold: &'a IndirectFontRef,
    cursor: f32,
}

impl PageWriter<'_> {
    fn text(&self, text: &str, size: f32, x: f32, bold: bool) {
        let font = if bold { self.bold } else { self.regular };
        self.layer
            .use_text(text, size, Mm(MARGIN + x), Mm(self.cursor), font);
    }

    fn column_headers(&mut self) {
        for (title, x, _) in COLUMNS {
            self.text(title, HEADER_SIZE, x, true);
        }
        self.cursor -= ROW_HEIGHT;
    }

    fn row(&mut self, cells: &[String; 10]) {
        for ((_, x, max_chars), cell) in COLUMNS.iter().zip(cells.iter()) {
            self.text(&printable(cell, *max_chars), BODY_SIZE, *x, false);
        }
        self.cursor -= ROW_HEIGHT;
    }

    fn has_room(&self, rows: usize) -> bool {
        self.cursor - ROW_HEIGHT * rows as f32 >= MARGIN
    }
}

/// Renders the expense report as a paginated A4 landscape table followed by
/// per-currency totals.
pub fn render_pdf(header: &ReportHeader, rows: &[ExpenseReportRow]) -> Result<Vec<u8>> {
    let title = format!("Expense Report - {}", header.company_name);
    let (doc, first_page, first_layer) =
        PdfDocument::new(title.as_str(), Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
    let regular = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;

    let mut page = PageWriter {
        layer: doc.get_page(first_page).get_layer(first_layer),
        regular: &regular,
        bold: &bold,
        cursor: PAGE_HEIGHT - MARGIN - 4.0,
    };
    page.text(&printable(&title, 90), TITLE_SIZE, 0.0, true);
    page.cursor -= 8.0;
    page.text(
        &format!(
            "Period: {}    Generated: {}    Expenses: {}",
            header.period_label(),
            header.generated_at.format("%Y-%m-%d %H:%M UTC"),
            rows.len()
        ),
        BODY_SIZE + 1.0,
        0.0,
        false,
    );
    page.cursor -= ROW_HEIGHT * 1.5;
    page.column_headers();

    let mut totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    let mut page_number = 1;
    for row in rows {
        if !page.has_room(1) {
            page_number += 1;
            let (next_page, next_layer) = doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Page {}", page_number),
            );
            page.layer = doc.get_page(next_page).get_layer(next_layer);
            page.cursor = PAGE_HEIGHT - MARGIN - 4.0;
            page.column_headers();
        }
        page.row(&row_cells(row));
        *totals.entry(row.currency.as_str()).or_insert(Decimal::ZERO) += row.amount;
    }

    if totals.is_empty() {
        totals.insert("", Decimal::ZERO);
    }
    page.cursor -= ROW_HEIGHT / 2.0;
    for (currency, total) in totals {
        if !page.has_room(1) {
            page_number += 1;
            let (next_page, next_layer) = doc.add_page(
                Mm(PAGE_WIDTH),
                Mm(PAGE_HEIGHT),
                format!("Page {}", page_number),
            );
            page.layer = doc.get_page(next_page).get_layer(next_layer);
            page.cursor = PAGE_HEIGHT - MARGIN - 4.0;
        }
        let label = if currency.is_empty() {
            "Total".to_string()
        } else {
            format!("Total ({})", currency)
        };
        page.text(&label, HEADER_SIZE, COLUMNS[5].1, true);
        page.text(&format!("{:.2}", total), HEADER_SIZE, COLUMNS[6].1, true);
        page.cursor -= ROW_HEIGHT;
    }

    doc.save_to_bytes().map_err(pdf_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn header() -> ReportHeader {
        ReportHeader {
            company_name: "Acme".to_string(),
            from: NaiveDate::from_ymd_opt(2024, 1, 1),
            to: None,
            generated_at: NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    fn row(i: usize) -> ExpenseReportRow {
        ExpenseReportRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            employee: format!("Employee {}", i),
            department: "Sales".to_string(),
            category: "Travel".to_string(),
            vendor: "Airline".to_string(),
            description: "A rather long description that will not fit in its column".to_string(),
            amount: dec!(120.5),
            currency: "USD".to_string(),
            status: "approved".to_string(),
            violations: Vec::new(),
        }
    }

    #[test]
    fn renders_a_pdf_document() {
        let bytes = render_pdf(&header(), &[row(1), row(2)]).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn long_reports_paginate() {
        let rows: Vec<_> = (0..120).map(row).collect();
        let short = render_pdf(&header(), &rows[..2]).unwrap();
        let long = render_pdf(&header(), &rows).unwrap();
        assert!(long.len() > short.len());
    }

    #[test]
    fn printable_truncates_and_replaces() {
        assert_eq!(printable("abcdef", 4), "abc~");
        assert_eq!(printable("ok", 4), "ok");
        assert_eq!(printable("日本", 4), "??");
    }

    #[test]
    fn period_label_variants() {
        assert_eq!(header().period_label(), "From 2024-01-01");
    }
}
