//! Decision core of the school e-voting admin console.
//!
//! Two questions every screen keeps asking are answered here: may the
//! signed-in account do this, and where does the election stand in its
//! lifecycle? The [`model::access`] module resolves the first from the
//! account's role and permission table; [`model::election`] resolves the
//! second from the election record and an explicit instant. The optional
//! [`monitor`] module keeps a live status feed running on top of both
//! cadences the console uses.

#[macro_use]
extern crate log;

pub mod config;
pub mod error;
pub mod model;
#[cfg(feature = "monitor")]
pub mod monitor;

pub use config::Config;
pub use error::{Error, Result};
