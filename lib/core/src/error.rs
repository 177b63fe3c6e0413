//! Result alias over rootcause reports.
//!
//! Crates keep their own error enums (see `amber_lantern_authz::error`) and
//! surface them as `Report<E>` through this alias.

use rootcause::Report;

/// Result whose error side is a rootcause [`Report`] carrying context `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;
