pub mod admin_auth;
pub mod alerts;
pub mod articles;
pub mod campaigns;
pub mod categories;
pub mod custom_prices;
pub mod customers;
pub mod prices;
pub mod qr_codes;
pub mod settings;
