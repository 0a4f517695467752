//! Tradable products and read-only reference data.

pub mod reference;

pub use reference::{ReferenceData, ReferenceDataError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A tradable product identified by a unique product id. The product id is
/// the join key every stage uses across the pipeline.
pub trait Product: Clone + Send + Sync + 'static {
    fn product_id(&self) -> &str;
}

/// Identifier scheme for a bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BondIdType {
    Cusip,
    Isin,
}

/// A fixed-income product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bond {
    pub product_id: String,
    pub id_type: BondIdType,
    pub ticker: String,
    pub coupon: f64,
    pub maturity: NaiveDate,
}

impl Bond {
    pub fn new(
        product_id: impl Into<String>,
        id_type: BondIdType,
        ticker: impl Into<String>,
        coupon: f64,
        maturity: NaiveDate,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            id_type,
            ticker: ticker.into(),
            coupon,
            maturity,
        }
    }
}

impl Product for Bond {
    fn product_id(&self) -> &str {
        &self.product_id
    }
}

impl fmt::Display for Bond {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {:.3}% {}",
            self.product_id,
            self.ticker,
            self.coupon * 100.0,
            self.maturity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bond_product_id() {
        let bond = Bond::new(
            "OTRUSTR_10Y",
            BondIdType::Cusip,
            "USB10Y",
            0.03125,
            NaiveDate::from_ymd_opt(2032, 12, 31).unwrap(),
        );
        assert_eq!(bond.product_id(), "OTRUSTR_10Y");
        assert_eq!(bond.ticker, "USB10Y");
    }

    #[test]
    fn test_bond_display() {
        let bond = Bond::new(
            "OTRUSTR_02Y",
            BondIdType::Cusip,
            "USB02Y",
            0.00375,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        );
        assert_eq!(bond.to_string(), "OTRUSTR_02Y USB02Y 0.375% 2024-12-31");
    }
}
