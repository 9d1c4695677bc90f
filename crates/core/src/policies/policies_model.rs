//! Policy domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::Error;

/// Spending rules for one department of one company.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    pub id: String,
    pub company_id: String,
    pub department: String,
    pub meal_limit_per_day: Decimal,
    pub hotel_limit_per_night: Decimal,
    pub receipt_required_over: Decimal,
    pub auto_approve_limit: Decimal,
    pub blacklisted_vendors: Vec<String>,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Policy {
    /// Case-insensitive, whitespace-insensitive blacklist lookup.
    pub fn is_blacklisted(&self, vendor: &str) -> bool {
        let vendor = vendor.trim();
        !vendor.is_empty()
            && self
                .blacklisted_vendors
                .iter()
                .any(|v| v.trim().eq_ignore_ascii_case(vendor))
    }
}

fn default_meal_limit() -> Decimal {
    Decimal::new(75, 0)
}

fn default_hotel_limit() -> Decimal {
    Decimal::new(250, 0)
}

fn default_receipt_threshold() -> Decimal {
    Decimal::new(25, 0)
}

fn default_auto_approve_limit() -> Decimal {
    Decimal::new(100, 0)
}

fn default_true() -> bool {
    true
}

/// Input model for creating a policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPolicy {
    pub department: String,
    #[serde(default = "default_meal_limit")]
    pub meal_limit_per_day: Decimal,
    #[serde(default = "default_hotel_limit")]
    pub hotel_limit_per_night: Decimal,
    #[serde(default = "default_receipt_threshold")]
    pub receipt_required_over: Decimal,
    #[serde(default = "default_auto_approve_limit")]
    pub auto_approve_limit: Decimal,
    #[serde(default)]
    pub blacklisted_vendors: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Input model for updating a policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyUpdate {
    pub meal_limit_per_day: Option<Decimal>,
    pub hotel_limit_per_night: Option<Decimal>,
    pub receipt_required_over: Option<Decimal>,
    pub auto_approve_limit: Option<Decimal>,
    pub blacklisted_vendors: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

impl NewPolicy {
    /// Trims names, drops empty and duplicate blacklist entries and checks
    /// that every threshold is non-negative.
    pub fn normalized(mut self) -> Result<Self> {
        self.department = self.department.trim().to_string();
        if self.department.is_empty() {
            return Err(Error::missing_field("department"));
        }
        check_thresholds(&[
            ("mealLimitPerDay", self.meal_limit_per_day),
            ("hotelLimitPerNight", self.hotel_limit_per_night),
            ("receiptRequiredOver", self.receipt_required_over),
            ("autoApproveLimit", self.auto_approve_limit),
        ])?;
        self.blacklisted_vendors = normalize_vendor_list(self.blacklisted_vendors);
        Ok(self)
    }
}

impl PolicyUpdate {
    pub fn normalized(mut self) -> Result<Self> {
        let thresholds: Vec<(&str, Decimal)> = [
            ("mealLimitPerDay", self.meal_limit_per_day),
            ("hotelLimitPerNight", self.hotel_limit_per_night),
            ("receiptRequiredOver", self.receipt_required_over),
            ("autoApproveLimit", self.auto_approve_limit),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name, v)))
        .collect();
        check_thresholds(&thresholds)?;
        self.blacklisted_vendors = self.blacklisted_vendors.map(normalize_vendor_list);
        Ok(self)
    }

    /// Applies the update on top of an existing policy.
    pub fn apply_to(self, policy: &mut Policy) {
        if let Some(v) = self.meal_limit_per_day {
            policy.meal_limit_per_day = v;
        }
        if let Some(v) = self.hotel_limit_per_night {
            policy.hotel_limit_per_night = v;
        }
        if let Some(v) = self.receipt_required_over {
            policy.receipt_required_over = v;
        }
        if let Some(v) = self.auto_approve_limit {
            policy.auto_approve_limit = v;
        }
        if let Some(v) = self.blacklisted_vendors {
            policy.blacklisted_vendors = v;
        }
        if let Some(v) = self.is_active {
            policy.is_active = v;
        }
    }
}

fn check_thresholds(values: &[(&str, Decimal)]) -> Result<()> {
    for (name, value) in values {
        if *value < Decimal::ZERO {
            return Err(Error::invalid_input(format!("{} cannot be negative", name)));
        }
    }
    Ok(())
}

fn normalize_vendor_list(vendors: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(vendors.len());
    for vendor in vendors {
        let vendor = vendor.trim();
        if vendor.is_empty() || result.iter().any(|v| v.eq_ignore_ascii_case(vendor)) {
            continue;
        }
        result.push(vendor.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_policy_defaults_fill_missing_thresholds() {
        let policy: NewPolicy =
            serde_json::from_str(r#"{ "department": "Sales", "blacklistedVendors": [] }"#)
                .unwrap();
        assert_eq!(policy.meal_limit_per_day, dec!(75));
        assert_eq!(policy.hotel_limit_per_night, dec!(250));
        assert_eq!(policy.receipt_required_over, dec!(25));
        assert_eq!(policy.auto_approve_limit, dec!(100));
        assert!(policy.is_active);
    }

    #[test]
    fn normalized_dedups_blacklist_case_insensitively() {
        let policy = NewPolicy {
            department: "  Sales ".to_string(),
            meal_limit_per_day: dec!(50),
            hotel_limit_per_night: dec!(200),
            receipt_required_over: dec!(25),
            auto_approve_limit: dec!(75),
            blacklisted_vendors: vec![
                " Shady Inc ".to_string(),
                "shady inc".to_string(),
                "".to_string(),
                "Casino Royale".to_string(),
            ],
            is_active: true,
        }
        .normalized()
        .unwrap();

        assert_eq!(policy.department, "Sales");
        assert_eq!(policy.blacklisted_vendors, vec!["Shady Inc", "Casino Royale"]);
    }

    #[test]
    fn negative_threshold_is_rejected() {
        let update = PolicyUpdate {
            auto_approve_limit: Some(dec!(-1)),
            ..Default::default()
        };
        assert!(matches!(update.normalized(), Err(Error::Validation(_))));
    }
}
