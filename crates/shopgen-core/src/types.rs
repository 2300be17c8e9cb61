use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// A synthetic shopping-cart event.
///
/// The simulator does not assign identifiers; whoever persists or prints the
/// order attaches one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Order {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Time between creation and completion, if the order completed.
    pub fn completion_latency(&self) -> Option<Duration> {
        self.completed_at.map(|c| c - self.created_at)
    }
}

// ---------------------------------------------------------------------------
// Weekdays
// ---------------------------------------------------------------------------

/// Weekday names indexed 0 = Monday … 6 = Sunday.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

pub const SATURDAY: usize = 5;
pub const SUNDAY: usize = 6;

/// ISO-style weekday index of `date`: 0 = Monday … 6 = Sunday.
pub fn weekday_index(date: NaiveDate) -> usize {
    date.weekday().num_days_from_monday() as usize
}

// ---------------------------------------------------------------------------
// PolicyVariant
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PolicyVariant {
    /// Sunday band plus one band for every other day.
    #[default]
    Simple,
    /// Adds a dedicated Saturday band.
    Rich,
}

impl PolicyVariant {
    pub fn all() -> &'static [PolicyVariant] {
        &[PolicyVariant::Simple, PolicyVariant::Rich]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PolicyVariant::Simple => "simple",
            PolicyVariant::Rich => "rich",
        }
    }
}

impl fmt::Display for PolicyVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PolicyVariant {
    type Err = crate::error::ShopGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(PolicyVariant::Simple),
            "rich" => Ok(PolicyVariant::Rich),
            other => Err(crate::error::ShopGenError::InvalidPolicy(format!(
                "unknown variant '{other}'; valid: simple, rich"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Tables of the shop schema, in insertion (dependency) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Customers,
    Products,
    ShoppingCarts,
    ShoppingCartItems,
    SupportAgents,
    SupportRequests,
}

impl Table {
    pub fn all() -> &'static [Table] {
        &[
            Table::Customers,
            Table::Products,
            Table::ShoppingCarts,
            Table::ShoppingCartItems,
            Table::SupportAgents,
            Table::SupportRequests,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Table::Customers => "customers",
            Table::Products => "products",
            Table::ShoppingCarts => "shopping_carts",
            Table::ShoppingCartItems => "shopping_cart_items",
            Table::SupportAgents => "support_agents",
            Table::SupportRequests => "support_requests",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn weekday_index_is_monday_based() {
        // 2024-06-03 was a Monday, 2024-06-09 a Sunday.
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let saturday = NaiveDate::from_ymd_opt(2024, 6, 8).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2024, 6, 9).unwrap();
        assert_eq!(weekday_index(monday), 0);
        assert_eq!(weekday_index(saturday), SATURDAY);
        assert_eq!(weekday_index(sunday), SUNDAY);
        assert_eq!(WEEKDAY_NAMES[weekday_index(sunday)], "sunday");
    }

    #[test]
    fn variant_parse_and_display() {
        for v in PolicyVariant::all() {
            let parsed: PolicyVariant = v.as_str().parse().unwrap();
            assert_eq!(parsed, *v);
        }
        assert!("weekly".parse::<PolicyVariant>().is_err());
    }

    #[test]
    fn order_latency() {
        let created = Utc.with_ymd_and_hms(2024, 6, 9, 10, 0, 0).unwrap();
        let order = Order {
            created_at: created,
            completed_at: Some(created + Duration::minutes(7)),
        };
        assert!(order.is_completed());
        assert_eq!(order.completion_latency(), Some(Duration::minutes(7)));

        let open = Order {
            created_at: created,
            completed_at: None,
        };
        assert!(open.completion_latency().is_none());
    }
}
