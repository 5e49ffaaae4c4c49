//! Supply Chain Domain
//!
//! Product lifecycle tracking over the external ledger: manufacture,
//! distribution, storage compliance, and expiry.
//!
//! # Product lifecycle
//!
//! ```text
//! manufactured -> in-transit -> delivered -> expired
//! ```
//!
//! Every edge points forward; `expired` is reachable from every live state
//! and terminal. `add_distributor` drives manufactured -> in-transit through
//! the same guard as a direct status update.

pub mod product;
pub mod quality;
pub mod service;

pub use product::{
    Distribution, Product, ProductDraft, ProductStatus, StorageCondition, StorageRequirement,
    QUALITY_CHECK_INTERVAL_HOURS,
};
pub use quality::{QualityCheck, QualityStatus};
pub use service::ProductService;
