//! Infrastructure layer - Files, services and observability

pub mod artifact;
pub mod dataset;
pub mod logging;
pub mod observability;
pub mod services;
