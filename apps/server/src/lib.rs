//! Library surface of the Stockpulse server, shared by the binary and the
//! integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod main_lib;

pub use main_lib::{build_state, init_tracing, AppState};
