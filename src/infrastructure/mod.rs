// Infrastructure layer - External dependencies and adapters
pub mod catalog_file;
pub mod config;
pub mod http_sink;
pub mod jsonl_sink;
