use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use tracing::info;

use crate::products::{Bond, BondIdType, Product};

/// Static attributes of one product in the reference universe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub ticker: String,
    pub coupon: f64,
    pub maturity: NaiveDate,
    pub pv01: f64,
}

/// Read-only product reference data: ticker, coupon, maturity, and PV01 by
/// product id. Loaded once at startup and passed by reference to whichever
/// collaborator needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceData {
    records: HashMap<String, ProductRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceDataError {
    /// The reference data payload could not be parsed
    Parse(String),

    /// A requested product id is not in the universe
    UnknownProduct(String),
}

impl fmt::Display for ReferenceDataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceDataError::Parse(msg) => write!(f, "Reference data parse error: {}", msg),
            ReferenceDataError::UnknownProduct(id) => write!(f, "Unknown product: {}", id),
        }
    }
}

impl std::error::Error for ReferenceDataError {}

impl ReferenceData {
    /// Parse reference data from a JSON map of product id to record.
    pub fn from_json(json: &str) -> Result<Self, ReferenceDataError> {
        let records: HashMap<String, ProductRecord> =
            serde_json::from_str(json).map_err(|e| ReferenceDataError::Parse(e.to_string()))?;
        info!("Loaded reference data for {} products", records.len());
        Ok(Self { records })
    }

    /// Built-in universe: the seven on-the-run US Treasury benchmarks.
    pub fn us_treasury() -> Self {
        fn record(ticker: &str, coupon: f64, maturity: (i32, u32, u32), pv01: f64) -> ProductRecord {
            ProductRecord {
                ticker: ticker.to_string(),
                coupon,
                maturity: NaiveDate::from_ymd_opt(maturity.0, maturity.1, maturity.2)
                    .expect("valid maturity date"),
                pv01,
            }
        }

        let records = HashMap::from([
            ("OTRUSTR_02Y".to_string(), record("USB02Y", 0.00375, (2024, 12, 31), 0.019851)),
            ("OTRUSTR_03Y".to_string(), record("USB03Y", 0.00625, (2025, 12, 31), 0.029309)),
            ("OTRUSTR_05Y".to_string(), record("USB05Y", 0.01500, (2027, 12, 31), 0.048643)),
            ("OTRUSTR_07Y".to_string(), record("USB07Y", 0.02250, (2029, 12, 31), 0.065843)),
            ("OTRUSTR_10Y".to_string(), record("USB10Y", 0.03125, (2032, 12, 31), 0.087939)),
            ("OTRUSTR_20Y".to_string(), record("USB20Y", 0.03750, (2042, 12, 31), 0.123655)),
            ("OTRUSTR_30Y".to_string(), record("USB30Y", 0.04375, (2052, 12, 31), 0.184696)),
        ]);
        Self { records }
    }

    /// Product ids in the universe, sorted for deterministic iteration.
    pub fn product_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.records.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, product_id: &str) -> Option<&ProductRecord> {
        self.records.get(product_id)
    }

    /// PV01 risk factor for a product, if it is in the universe.
    pub fn pv01(&self, product_id: &str) -> Option<f64> {
        self.records.get(product_id).map(|r| r.pv01)
    }

    /// Build the full [`Bond`] product for a product id.
    pub fn bond(&self, product_id: &str) -> Result<Bond, ReferenceDataError> {
        let record = self
            .records
            .get(product_id)
            .ok_or_else(|| ReferenceDataError::UnknownProduct(product_id.to_string()))?;
        Ok(Bond::new(
            product_id,
            BondIdType::Cusip,
            record.ticker.clone(),
            record.coupon,
            record.maturity,
        ))
    }
}
