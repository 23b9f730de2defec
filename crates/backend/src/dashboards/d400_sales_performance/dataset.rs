use chrono::{Days, NaiveDate};
use contracts::dashboards::d400_sales_performance::{Category, Region};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use thiserror::Error;

/// Number of distinct products in the catalogue (`Product_1` .. `Product_50`)
pub const PRODUCT_COUNT: u32 = 50;

/// Days in 2023-01-01 ..= 2024-12-31
const DATE_SPAN_DAYS: u64 = 731;

/// Total price is recomputed exactly at build time, so any drift past this
/// means the row was altered
const TOTAL_EPSILON: f64 = 1e-9;

/// One order line of the sales dataset
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    pub order_id: u64,
    pub date: NaiveDate,
    pub region: Region,
    pub category: Category,
    pub product: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub customer_id: u32,
    total_price: f64,
}

impl OrderRecord {
    pub fn new(
        order_id: u64,
        date: NaiveDate,
        region: Region,
        category: Category,
        product: String,
        quantity: u32,
        unit_price: f64,
        customer_id: u32,
    ) -> Self {
        Self {
            order_id,
            date,
            region,
            category,
            product,
            quantity,
            unit_price,
            customer_id,
            total_price: quantity as f64 * unit_price,
        }
    }

    /// quantity × unit price, fixed when the record was built
    pub fn total_price(&self) -> f64 {
        self.total_price
    }
}

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("dataset has no rows")]
    Empty,
    #[error("order {order_id}: {reason}")]
    InvalidRecord { order_id: u64, reason: String },
    #[error("order {order_id}: total price {total} differs from quantity x unit price {expected}")]
    TotalMismatch {
        order_id: u64,
        total: f64,
        expected: f64,
    },
    #[error("duplicate order id {0}")]
    DuplicateOrderId(u64),
}

/// Parameters of the synthetic generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub seed: u64,
    pub rows: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: 42,
            rows: 1000,
        }
    }
}

/// Immutable table of orders, built once at startup and shared by reference
#[derive(Debug)]
pub struct SalesDataset {
    records: Vec<OrderRecord>,
    regions: Vec<Region>,
    categories: Vec<Category>,
}

impl SalesDataset {
    /// Build and validate a dataset from ready records
    pub fn from_records(records: Vec<OrderRecord>) -> Result<Self, DatasetError> {
        validate(&records)?;

        let mut regions = Vec::new();
        let mut categories = Vec::new();
        for record in &records {
            if !regions.contains(&record.region) {
                regions.push(record.region);
            }
            if !categories.contains(&record.category) {
                categories.push(record.category);
            }
        }

        Ok(Self {
            records,
            regions,
            categories,
        })
    }

    /// Generate the synthetic dataset. Same settings, same rows.
    pub fn generate(settings: GeneratorSettings) -> Result<Self, DatasetError> {
        let mut rng = StdRng::seed_from_u64(settings.seed);
        let start = NaiveDate::from_ymd_opt(2023, 1, 1).ok_or_else(|| DatasetError::InvalidRecord {
            order_id: 0,
            reason: "invalid start date".to_string(),
        })?;

        let mut records = Vec::with_capacity(settings.rows);
        for i in 0..settings.rows {
            let order_id = i as u64 + 1;
            let offset = rng.gen_range(0..DATE_SPAN_DAYS);
            let date = start
                .checked_add_days(Days::new(offset))
                .ok_or_else(|| DatasetError::InvalidRecord {
                    order_id,
                    reason: format!("date offset {} out of range", offset),
                })?;
            let region = Region::ALL[rng.gen_range(0..Region::ALL.len())];
            let category = Category::ALL[rng.gen_range(0..Category::ALL.len())];
            let product = format!("Product_{}", rng.gen_range(1..=PRODUCT_COUNT));
            let quantity = rng.gen_range(1..10u32);
            let unit_price = rng.gen_range(10.0..100.0);
            let customer_id = rng.gen_range(100..500u32);

            records.push(OrderRecord::new(
                order_id,
                date,
                region,
                category,
                product,
                quantity,
                unit_price,
                customer_id,
            ));
        }

        Self::from_records(records)
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Regions present in the dataset, by first appearance
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Categories present in the dataset, by first appearance
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}

fn validate(records: &[OrderRecord]) -> Result<(), DatasetError> {
    if records.is_empty() {
        return Err(DatasetError::Empty);
    }

    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.order_id) {
            return Err(DatasetError::DuplicateOrderId(record.order_id));
        }
        if record.quantity == 0 {
            return Err(DatasetError::InvalidRecord {
                order_id: record.order_id,
                reason: "quantity must be positive".to_string(),
            });
        }
        if !record.unit_price.is_finite() || record.unit_price <= 0.0 {
            return Err(DatasetError::InvalidRecord {
                order_id: record.order_id,
                reason: format!("unit price {} must be a positive number", record.unit_price),
            });
        }
        let expected = record.quantity as f64 * record.unit_price;
        if (record.total_price - expected).abs() > TOTAL_EPSILON {
            return Err(DatasetError::TotalMismatch {
                order_id: record.order_id,
                total: record.total_price,
                expected,
            });
        }
    }

    Ok(())
}
