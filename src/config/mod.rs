pub mod analysis;
pub mod data;
pub mod manager;
pub mod traits;

pub use analysis::AnalysisConfig;
pub use data::DataConfig;
pub use manager::{AppConfig, ConfigManager};
pub use traits::ConfigSection;
