mod analyze;
mod export;
mod handle;
mod util;

pub use analyze::Analyze;
pub use export::Export;
pub use handle::HandleCmd;
