pub mod db;
pub mod price_feeds;
pub mod realtime;
