//! Book catalogue service with a generic record validator.

pub mod config;
pub mod models;
pub mod observability;
pub mod service;
pub mod validation;

pub use config::AppConfig;
pub use service::BookService;
pub use validation::{validate, UsageFault, ValidationReport, Validator};
