//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the estimation domain, built on SQLx.
//!
//! # Architecture
//!
//! - `repositories`: SQL per aggregate, written against a borrowed
//!   connection so the caller owns the transaction
//! - `adapters`: `PostgresEstimationStore`, the `EstimationStore` port
//!   implementation, with one database transaction per use case
//! - `pool`: pool configuration and the embedded migrations
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresEstimationStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/estimation")).await?;
//! run_migrations(&pool).await?;
//! let store = PostgresEstimationStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, create_pool_from_url, run_migrations, DatabaseConfig, DatabasePool, MIGRATOR};
pub use error::DatabaseError;
pub use adapters::{PostgresEstimationStore, PostgresTransaction};
