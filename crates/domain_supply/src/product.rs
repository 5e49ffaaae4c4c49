//! Product document and its business rules
//!
//! The product moves through a strictly forward lifecycle with no back
//! edges; `expired` is terminal. Distribution records and quality checks
//! are owned by the product document and never addressed independently.
//!
//! # State machine
//!
//! ```text
//! manufactured -> in-transit -> delivered -> expired
//!      \______________\___________________/^
//! ```

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use ledger_kernel::EngineError;

use crate::quality::{quality_check_id, QualityCheck, QualityStatus};

/// Minimum spacing between recorded quality checks
pub const QUALITY_CHECK_INTERVAL_HOURS: i64 = 24;

/// Product lifecycle states (kebab-case on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProductStatus {
    Manufactured,
    InTransit,
    Delivered,
    Expired,
}

impl ProductStatus {
    /// The complete set of permitted outgoing edges from this status
    pub fn permitted_transitions(self) -> &'static [ProductStatus] {
        match self {
            ProductStatus::Manufactured => &[ProductStatus::InTransit, ProductStatus::Expired],
            ProductStatus::InTransit => &[ProductStatus::Delivered, ProductStatus::Expired],
            ProductStatus::Delivered => &[ProductStatus::Expired],
            ProductStatus::Expired => &[],
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProductStatus::Manufactured => "manufactured",
            ProductStatus::InTransit => "in-transit",
            ProductStatus::Delivered => "delivered",
            ProductStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// Storage condition classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageCondition {
    RoomTemperature,
    Refrigerated,
    Frozen,
}

/// Temperature and humidity bounds the product must be kept within
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageRequirement {
    pub condition: StorageCondition,
    pub min_temp: f64,
    pub max_temp: f64,
    pub min_humidity: f64,
    pub max_humidity: f64,
}

/// A distribution record embedded in the product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub distributor_id: String,
    pub name: String,
    pub received_date: DateTime<Utc>,
    pub shipped_date: DateTime<Utc>,
    pub status: ProductStatus,
    pub location: String,
}

/// Caller payload for creating a product
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub product_id: String,
    pub product_name: String,
    pub manufacturer: String,
    pub manufacture_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub batch_number: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub storage: StorageRequirement,
}

/// The stored product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub product_name: String,
    pub manufacturer: String,
    pub manufacture_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub batch_number: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub status: ProductStatus,
    pub distribution: Vec<Distribution>,
    pub quality: Vec<QualityCheck>,
    pub storage: StorageRequirement,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl Product {
    /// Validates a draft and produces the initial product document
    ///
    /// Products always start as `manufactured`.
    ///
    /// # Errors
    ///
    /// `Validation` when identity fields are empty, quantity or price are
    /// not positive, the expiry date precedes manufacture, or the storage
    /// bounds are inverted.
    pub fn new(draft: ProductDraft) -> Result<Self, EngineError> {
        require_non_empty("productId", &draft.product_id)?;
        require_non_empty("productName", &draft.product_name)?;
        require_non_empty("manufacturer", &draft.manufacturer)?;

        if draft.quantity == 0 {
            return Err(EngineError::validation("quantity", "must be positive"));
        }
        if draft.unit_price <= Decimal::ZERO {
            return Err(EngineError::validation("unitPrice", "must be positive"));
        }
        if draft.expiry_date <= draft.manufacture_date {
            return Err(EngineError::validation(
                "expiryDate",
                "must be after manufacture date",
            ));
        }
        if draft.storage.min_temp >= draft.storage.max_temp {
            return Err(EngineError::validation(
                "storage",
                "invalid temperature range",
            ));
        }
        if draft.storage.min_humidity >= draft.storage.max_humidity {
            return Err(EngineError::validation("storage", "invalid humidity range"));
        }

        let now = Utc::now();
        Ok(Self {
            product_id: draft.product_id,
            product_name: draft.product_name,
            manufacturer: draft.manufacturer,
            manufacture_date: draft.manufacture_date,
            expiry_date: draft.expiry_date,
            batch_number: draft.batch_number,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            status: ProductStatus::Manufactured,
            distribution: Vec::new(),
            quality: Vec::new(),
            storage: draft.storage,
            created_at: now,
            last_updated: now,
        })
    }

    /// Moves the product to a new status through the transition table
    ///
    /// # Errors
    ///
    /// `InvalidTransition` for any edge not in the table, including every
    /// self-loop.
    pub fn update_status(&mut self, new_status: ProductStatus) -> Result<(), EngineError> {
        if !self.status.permitted_transitions().contains(&new_status) {
            return Err(EngineError::invalid_transition(self.status, new_status));
        }
        self.status = new_status;
        self.touch();
        Ok(())
    }

    /// Records a distributor and drives the product to in-transit
    ///
    /// The status change goes through the same transition guard as a direct
    /// `update_status` call; this operation both records data and drives the
    /// state machine.
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the product is still `manufactured`.
    pub fn add_distributor(
        &mut self,
        distributor_id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<(), EngineError> {
        if self.status != ProductStatus::Manufactured {
            return Err(EngineError::invalid_state(
                "can only add distributor to manufactured products",
            ));
        }

        let now = Utc::now();
        self.distribution.push(Distribution {
            distributor_id: distributor_id.into(),
            name: name.into(),
            received_date: now,
            shipped_date: now,
            status: ProductStatus::InTransit,
            location: location.into(),
        });
        self.update_status(ProductStatus::InTransit)
    }

    /// Appends a quality check with a derived pass/fail outcome
    ///
    /// The outcome equals `is_storage_compliant(temperature, humidity)`;
    /// failing checks are retained as history, not rejected.
    ///
    /// # Errors
    ///
    /// `RateLimited` when less than 24 hours have elapsed since the most
    /// recent recorded check.
    pub fn add_quality_check(
        &mut self,
        inspector: impl Into<String>,
        temperature: f64,
        humidity: f64,
        notes: Vec<String>,
    ) -> Result<String, EngineError> {
        let now = Utc::now();

        if let Some(last) = self.quality.last() {
            let elapsed = now - last.check_date;
            if elapsed < Duration::hours(QUALITY_CHECK_INTERVAL_HOURS) {
                return Err(EngineError::RateLimited {
                    hours_since_last: elapsed.num_hours(),
                });
            }
        }

        let status = if self.is_storage_compliant(temperature, humidity) {
            QualityStatus::Passed
        } else {
            QualityStatus::Failed
        };

        let id = quality_check_id(now);
        self.quality.push(QualityCheck {
            quality_check_id: id.clone(),
            check_date: now,
            status,
            temperature,
            humidity,
            inspector: inspector.into(),
            notes,
        });
        self.touch();
        Ok(id)
    }

    /// Inclusive boundary test against the product's storage requirement
    pub fn is_storage_compliant(&self, temperature: f64, humidity: f64) -> bool {
        temperature >= self.storage.min_temp
            && temperature <= self.storage.max_temp
            && humidity >= self.storage.min_humidity
            && humidity <= self.storage.max_humidity
    }

    /// Quantity times unit price
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_price
    }

    /// Whole days since manufacture
    pub fn product_age_days(&self) -> i64 {
        (Utc::now() - self.manufacture_date).num_days().max(0)
    }

    /// True once the expiry date has passed
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiry_date
    }

    fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<(), EngineError> {
    if value.trim().is_empty() {
        return Err(EngineError::validation(field, "missing required field"));
    }
    Ok(())
}
