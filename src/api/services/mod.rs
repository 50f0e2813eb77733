pub mod admin;
pub mod legacy;
pub mod redirect;

pub use admin::routes::admin_routes;
pub use legacy::legacy_routes;
pub use redirect::{RedirectService, redirect_routes};
