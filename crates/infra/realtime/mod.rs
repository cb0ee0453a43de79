pub mod price_hub;
