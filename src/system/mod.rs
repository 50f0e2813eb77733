//! System-level modules
//!
//! Process-wide concerns that sit outside the registry:
//! - Logging initialization

pub mod logging;

pub use logging::init_logging;
