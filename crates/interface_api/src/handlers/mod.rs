//! Request handlers, one module per resource

pub mod plan;
pub mod baseline;
pub mod cost;
pub mod effort;
pub mod portfolio;
pub mod health;
