//! Core business logic abstractions

pub mod classify;
pub mod config;
pub mod currency;
pub mod fees;
pub mod log;
pub mod portfolio;
pub mod resolver;
pub mod store;
pub mod trends;

// Re-export main types for cleaner imports
pub use currency::{CurrencyRateProvider, LookupError};
pub use resolver::{RateOrigin, RateResolver, Resolution};
pub use store::{RateSample, RateStore};
