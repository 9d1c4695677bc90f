use super::reports_model::ExpenseReportRow;
use crate::errors::Result;
use crate::Error;

pub const CSV_HEADERS: [&str; 10] = [
    "Date",
    "Employee",
    "Department",
    "Category",
    "Vendor",
    "Description",
    "Amount",
    "Currency",
    "Status",
    "Violations",
];

/// Renders report rows as CSV with a header line. Violations are joined
/// with `; `.
pub fn render_csv(rows: &[ExpenseReportRow]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADERS)?;
    for row in rows {
        writer.write_record([
            row.date.to_string(),
            row.employee.clone(),
            row.department.clone(),
            row.category.clone(),
            row.vendor.clone(),
            row.description.clone(),
            format!("{:.2}", row.amount),
            row.currency.clone(),
            row.status.clone(),
            row.violations.join("; "),
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| Error::Report(format!("Failed to finish CSV export: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn row() -> ExpenseReportRow {
        ExpenseReportRow {
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            employee: "Ada Lovelace".to_string(),
            department: "Sales".to_string(),
            category: "Meals".to_string(),
            vendor: "Cafe, Inc".to_string(),
            description: "Client \"lunch\"".to_string(),
            amount: dec!(80),
            currency: "USD".to_string(),
            status: "flagged".to_string(),
            violations: vec![
                "Receipt Required".to_string(),
                "Meal Limit Exceeded".to_string(),
            ],
        }
    }

    #[test]
    fn csv_has_header_and_quoted_fields() {
        let bytes = render_csv(&[row()]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,Employee,Department,Category,Vendor,Description,Amount,Currency,Status,Violations"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-09,Ada Lovelace,Sales,Meals,\"Cafe, Inc\",\"Client \"\"lunch\"\"\",80.00,USD,flagged,Receipt Required; Meal Limit Exceeded"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn empty_report_is_only_the_header() {
        let text = String::from_utf8(render_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
