use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use log::info;

use super::csv_export::render_csv;
use super::pdf_export::render_pdf;
use super::reports_model::{ExpenseReportRow, ReportFile, ReportFormat, ReportHeader};
use crate::companies::CompanyRepositoryTrait;
use crate::errors::Result;
use crate::expenses::{ExpenseFilter, ExpenseServiceTrait};
use crate::users::{Actor, UserRepositoryTrait};

/// Trait for report export operations
pub trait ReportServiceTrait: Send + Sync {
    /// Exports the expenses visible to `actor` that match `filter`.
    fn export_expenses(
        &self,
        actor: &Actor,
        filter: ExpenseFilter,
        format: ReportFormat,
    ) -> Result<ReportFile>;
}

pub struct ReportService {
    expense_service: Arc<dyn ExpenseServiceTrait>,
    user_repository: Arc<dyn UserRepositoryTrait>,
    company_repository: Arc<dyn CompanyRepositoryTrait>,
}

impl ReportService {
    pub fn new(
        expense_service: Arc<dyn ExpenseServiceTrait>,
        user_repository: Arc<dyn UserRepositoryTrait>,
        company_repository: Arc<dyn CompanyRepositoryTrait>,
    ) -> Self {
        Self {
            expense_service,
            user_repository,
            company_repository,
        }
    }
}

impl ReportServiceTrait for ReportService {
    fn export_expenses(
        &self,
        actor: &Actor,
        filter: ExpenseFilter,
        format: ReportFormat,
    ) -> Result<ReportFile> {
        let company = self.company_repository.get_by_id(&actor.company_id)?;
        let (from, to) = (filter.from, filter.to);
        let mut expenses = self.expense_service.list_expenses(actor, filter)?;
        expenses.sort_by(|a, b| {
            a.expense_date
                .cmp(&b.expense_date)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });

        let users = self.user_repository.list(&actor.company_id, None)?;
        let names: HashMap<&str, &str> = users
            .iter()
            .map(|u| (u.id.as_str(), u.name.as_str()))
            .collect();
        let rows: Vec<ExpenseReportRow> = expenses
            .iter()
            .map(|e| {
                let employee = names
                    .get(e.employee_id.as_str())
                    .copied()
                    .unwrap_or(e.employee_id.as_str());
                ExpenseReportRow::from_expense(e, employee)
            })
            .collect();

        let generated_at = Utc::now().naive_utc();
        let bytes = match format {
            ReportFormat::Csv => render_csv(&rows)?,
            ReportFormat::Pdf => render_pdf(
                &ReportHeader {
                    company_name: company.name.clone(),
                    from,
                    to,
                    generated_at,
                },
                &rows,
            )?,
        };
        info!(
            "Exported {} expense(s) as {} for {}",
            rows.len(),
            format,
            actor.user_id
        );

        Ok(ReportFile {
            filename: format!(
                "expenses-{}.{}",
                generated_at.format("%Y%m%d-%H%M%S"),
                format.extension()
            ),
            content_type: format.content_type(),
            bytes,
        })
    }
}
