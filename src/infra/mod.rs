// Infrastructure adapters behind the application ports

pub mod csv_output_adapter;
pub mod http_client;
pub mod politeness;
