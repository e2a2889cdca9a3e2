pub mod algo;
pub mod error;
pub mod ops;

#[cfg(feature = "mcp")]
pub mod mcp;

#[cfg(feature = "plugin")]
pub mod commands;

pub use error::{InstacheckError, Result};

#[cfg(feature = "plugin")]
use nu_plugin::{Plugin, PluginCommand};

#[cfg(feature = "plugin")]
pub struct InstacheckPlugin;

#[cfg(feature = "plugin")]
impl Plugin for InstacheckPlugin {
    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").into()
    }

    fn commands(&self) -> Vec<Box<dyn PluginCommand<Plugin = Self>>> {
        vec![
            Box::new(commands::Analyze),
            Box::new(commands::HandleCmd),
            Box::new(commands::Export),
        ]
    }
}
