pub mod alert_conditions;
pub mod point_transaction_kinds;
pub mod price_directions;
pub mod price_fields;
pub mod price_source_kinds;
pub mod qr_kinds;
pub mod qr_origins;
pub mod qr_statuses;
