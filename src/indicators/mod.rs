pub mod correlation;
pub mod engine;

pub mod momentum;
pub mod structure;
pub mod trend;
pub mod volume;

pub use correlation::calculate_btc_correlation;
pub use engine::IndicatorEngine;
