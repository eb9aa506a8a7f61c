pub mod capabilities;
pub mod config;
pub mod limits;
pub mod types;

pub use capabilities::{CapabilityDefinition, CapabilityError};
pub use config::{ConfigError, EndpointConfig, GridConfig};
pub use limits::Limits;
pub use types::*;
