//! Portfolio module - risk-matched selection from a market snapshot.

mod portfolio_model;
mod portfolio_service;
mod portfolio_traits;

pub use portfolio_model::{Portfolio, SelectorConfig, DEFAULT_MAX_PER_KIND};
pub use portfolio_service::{expected_return_pct, PortfolioSelector};
pub use portfolio_traits::DraftStoreTrait;
