//! Built-in rules shipped with the validator and their registration.

mod currency_amount;
mod foreign_key;
mod route_color_contrast;
mod stop_time_times;

pub use currency_amount::CurrencyAmountValidator;
pub use foreign_key::ForeignKeyValidator;
pub use route_color_contrast::RouteColorContrastValidator;
pub use stop_time_times::StopTimeTimesValidator;

use crate::validator::ValidatorRegistry;

/// Registry with every built-in rule registered.
pub fn default_registry() -> ValidatorRegistry {
    let mut registry = ValidatorRegistry::new();
    registry.register_file(CurrencyAmountValidator);
    registry.register_file(RouteColorContrastValidator);
    registry.register_file(StopTimeTimesValidator);
    registry.register_cross(ForeignKeyValidator);
    registry
}
