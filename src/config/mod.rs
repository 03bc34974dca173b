//! Application configuration: environment settings and named constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
