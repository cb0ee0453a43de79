pub mod expire_qr_codes;
pub mod refresh_prices;
