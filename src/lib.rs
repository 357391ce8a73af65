//! Backend for the Aakkai team portal.
//!
//! [`auth`] resolves identity-provider sessions into roles, [`api`] serves
//! the HTTP routes, and [`db`] / [`models`] re-export the record store from
//! `aakkai-core`.

pub mod api;
pub mod auth;
pub mod config;
pub mod seed;

pub use aakkai_core::{db, models};
