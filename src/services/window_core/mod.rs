//! WindowCore: the boundary to the window manager core.
//!
//! The bridge never talks to the display server itself. Geometry updates,
//! mapping, focus redraws and tree queries are delegated through this trait;
//! implementations may re-enter the core and mutate the client registry, so
//! callers must not hold registry locks across these calls.

mod dry_run;
mod r#trait;

pub use self::dry_run::DryRunCore;
pub use self::r#trait::WindowCore;
