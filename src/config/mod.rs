//! Configuration management
//!
//! Static configuration is loaded once at startup (TOML file + `TL__*`
//! environment overrides) and passed explicitly to the components that
//! need it. Nothing below the binary reads the process environment.

mod structs;

pub use structs::*;
