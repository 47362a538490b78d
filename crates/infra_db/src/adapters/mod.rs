//! Domain Adapters
//!
//! Implementations of the domain ports on top of the repository layer.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::adapters::PostgresEstimationStore;
//! use domain_estimation::EstimationService;
//!
//! let store = PostgresEstimationStore::new(pool);
//! let service = EstimationService::new(Arc::new(store));
//! ```

pub mod estimation;

pub use estimation::{PostgresEstimationStore, PostgresTransaction};
