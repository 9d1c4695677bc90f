use rust_decimal::Decimal;

/// Auto-approve limit applied when a department has no active policy.
pub const FALLBACK_AUTO_APPROVE_LIMIT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// Default budget alert threshold, in percent of the cap.
pub const DEFAULT_ALERT_THRESHOLD: i32 = 80;

/// Default currency for new companies.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Number of months shown in trend charts.
pub const TREND_MONTHS: u32 = 12;

/// Number of entries shown in "top N" dashboard widgets.
pub const TOP_N: usize = 5;

/// Number of recent expenses shown on the employee dashboard.
pub const RECENT_EXPENSES: usize = 5;

/// Comment stored on approvals the policy engine grants by itself.
pub const AUTO_APPROVAL_COMMENT: &str = "Auto-approved by policy";
