pub mod alerts;
pub mod cached_prices;
pub mod catalog;
pub mod content;
pub mod custom_prices;
pub mod customers;
pub mod enums;
pub mod price_normalization;
pub mod price_sources;
pub mod qr_codes;
pub mod slugs;
