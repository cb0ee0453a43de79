pub mod price_socket;
