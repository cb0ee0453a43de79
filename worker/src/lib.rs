pub mod axum_http;
pub mod config;
pub mod price_polling;
pub mod qr_expiry;
pub mod usecases;
