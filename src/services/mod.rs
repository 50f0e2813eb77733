//! Service layer for business logic
//!
//! The registry is shared by the redirect route, the legacy `/new` endpoint
//! and the admin API.

pub mod code_generator;
mod registry;

pub use code_generator::CodeGenerator;
pub use registry::*;
