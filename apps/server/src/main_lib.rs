use std::sync::Arc;

use crate::{
    auth::{decode_secret_key, random_secret_key, AuthConfig, AuthManager},
    config::Config,
    domain_events::WebhookEventSink,
    receipts::ReceiptStore,
};
use spendwise_core::{
    analytics::{AnalyticsService, AnalyticsServiceTrait},
    budgets::{BudgetService, BudgetServiceTrait},
    companies::{CompanyService, CompanyServiceTrait},
    events::{DomainEventSink, NoOpDomainEventSink},
    expenses::{ExpenseService, ExpenseServiceTrait},
    policies::{PolicyService, PolicyServiceTrait},
    reports::{ReportService, ReportServiceTrait},
    users::{UserService, UserServiceTrait},
    vendors::{VendorService, VendorServiceTrait},
};
use spendwise_storage_sqlite::{
    db::{self, spawn_writer},
    BudgetRepository, CompanyRepository, DbPool, ExpenseRepository, PolicyRepository,
    UserRepository, VendorRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub pool: Arc<DbPool>,
    pub auth: Arc<AuthManager>,
    pub receipts: Arc<ReceiptStore>,
    pub user_service: Arc<dyn UserServiceTrait>,
    pub company_service: Arc<dyn CompanyServiceTrait>,
    pub policy_service: Arc<dyn PolicyServiceTrait>,
    pub expense_service: Arc<dyn ExpenseServiceTrait>,
    pub budget_service: Arc<dyn BudgetServiceTrait>,
    pub vendor_service: Arc<dyn VendorServiceTrait>,
    pub analytics_service: Arc<dyn AnalyticsServiceTrait>,
    pub report_service: Arc<dyn ReportServiceTrait>,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

fn jwt_secret(config: &Config) -> anyhow::Result<Vec<u8>> {
    match config.jwt_secret.as_deref() {
        Some(raw) => decode_secret_key(raw),
        None => {
            tracing::warn!(
                "SPENDWISE_JWT_SECRET is not set; using a random key, tokens will not survive a restart"
            );
            Ok(random_secret_key())
        }
    }
}

fn event_sink(config: &Config) -> anyhow::Result<Arc<dyn DomainEventSink>> {
    Ok(match config.webhook_url.clone() {
        Some(url) => Arc::new(WebhookEventSink::start(url, config.webhook_timeout)?),
        None => {
            tracing::info!("SPENDWISE_WEBHOOK_URL is not set; domain events stay in-process");
            Arc::new(NoOpDomainEventSink)
        }
    })
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = spawn_writer((*pool).clone());

    let company_repository = Arc::new(CompanyRepository::new(pool.clone(), writer.clone()));
    let user_repository = Arc::new(UserRepository::new(pool.clone(), writer.clone()));
    let policy_repository = Arc::new(PolicyRepository::new(pool.clone(), writer.clone()));
    let expense_repository = Arc::new(ExpenseRepository::new(pool.clone(), writer.clone()));
    let budget_repository = Arc::new(BudgetRepository::new(pool.clone(), writer.clone()));
    let vendor_repository = Arc::new(VendorRepository::new(pool.clone(), writer));

    let user_service: Arc<dyn UserServiceTrait> = Arc::new(UserService::new(
        user_repository.clone(),
        company_repository.clone(),
    ));
    let company_service: Arc<dyn CompanyServiceTrait> =
        Arc::new(CompanyService::new(company_repository.clone()));
    let policy_service: Arc<dyn PolicyServiceTrait> =
        Arc::new(PolicyService::new(policy_repository));
    let budget_service: Arc<dyn BudgetServiceTrait> =
        Arc::new(BudgetService::new(budget_repository));
    let vendor_service: Arc<dyn VendorServiceTrait> = Arc::new(VendorService::new(
        vendor_repository,
        expense_repository.clone(),
    ));
    let expense_service: Arc<dyn ExpenseServiceTrait> = Arc::new(ExpenseService::new(
        expense_repository.clone(),
        company_repository.clone(),
        policy_service.clone(),
        budget_service.clone(),
        vendor_service.clone(),
        event_sink(config)?,
    ));
    let analytics_service: Arc<dyn AnalyticsServiceTrait> = Arc::new(AnalyticsService::new(
        expense_repository,
        user_repository.clone(),
        budget_service.clone(),
        vendor_service.clone(),
    ));
    let report_service: Arc<dyn ReportServiceTrait> = Arc::new(ReportService::new(
        expense_service.clone(),
        user_repository,
        company_repository,
    ));

    let auth = Arc::new(AuthManager::new(&AuthConfig {
        jwt_secret: jwt_secret(config)?,
        access_token_ttl: config.token_ttl,
    }));
    let receipts = Arc::new(ReceiptStore::new(
        config.upload_dir.clone(),
        config.max_upload_bytes,
    ));

    Ok(Arc::new(AppState {
        pool,
        auth,
        receipts,
        user_service,
        company_service,
        policy_service,
        expense_service,
        budget_service,
        vendor_service,
        analytics_service,
        report_service,
    }))
}
