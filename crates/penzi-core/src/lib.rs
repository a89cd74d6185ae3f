//! Core types and trait definitions for the Penzi matchmaking service.
//!
//! Holds the domain records, registration [`phase::Phase`] inference and the
//! storage traits. No HTTP or database code lives here.

pub mod error;
pub mod matching;
pub mod message;
pub mod phase;
pub mod store;
pub mod user;

pub use error::{Error, Result};
