//! Stock Model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Stock entry (ingredient or product inventory)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Stock {
    pub id: i64,
    pub establishment_id: i64,
    pub product_id: Option<i64>,
    pub name: String,
    pub quantity: f64,
    /// kg, l, pcs, ...
    pub unit: String,
    pub alert_threshold: Option<f64>,
    #[serde(default)]
    pub deleted: bool,
    pub updated_at: i64,
}

impl Stock {
    /// Quantity at or below the alert threshold
    pub fn is_low(&self) -> bool {
        self.alert_threshold
            .is_some_and(|threshold| self.quantity <= threshold)
    }
}

/// Create stock payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct StockCreate {
    pub product_id: Option<i64>,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub quantity: f64,
    #[validate(length(min = 1, max = 20))]
    pub unit: String,
    #[validate(range(min = 0.0))]
    pub alert_threshold: Option<f64>,
}

/// Update stock payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockUpdate {
    pub product_id: Option<i64>,
    pub name: Option<String>,
    pub quantity: Option<f64>,
    pub unit: Option<String>,
    pub alert_threshold: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_low() {
        let mut stock = Stock {
            id: 1,
            establishment_id: 1,
            product_id: None,
            name: "Farine".into(),
            quantity: 2.0,
            unit: "kg".into(),
            alert_threshold: Some(5.0),
            deleted: false,
            updated_at: 0,
        };
        assert!(stock.is_low());

        stock.quantity = 5.5;
        assert!(!stock.is_low());

        stock.alert_threshold = None;
        assert!(!stock.is_low());
    }
}
