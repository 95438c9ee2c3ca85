pub mod codec;
pub mod config_reader;
pub mod core_api;
pub mod field;
pub mod matcher;
pub mod merger;
pub mod network;
pub mod patcher;
pub mod script;
pub mod variant;
