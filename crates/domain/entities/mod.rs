pub mod articles;
pub mod cached_prices;
pub mod campaigns;
pub mod categories;
pub mod custom_prices;
pub mod customers;
pub mod point_transactions;
pub mod price_alerts;
pub mod price_sources;
pub mod qr_codes;
pub mod settings;
