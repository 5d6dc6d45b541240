pub mod app_config;
pub mod model;

pub use app_config::{AppConfig, load_file_config, parse_headers};
pub use model::{ConnectionSpec, FileConfig};
