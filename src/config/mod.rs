pub mod manager;
pub mod sampling;
pub mod selection;
pub mod traits;

pub use manager::{ConfigManager, SearchConfig};
pub use sampling::SamplingConfig;
pub use selection::SelectionConfig;
pub use traits::ConfigSection;
