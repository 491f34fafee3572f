//! Common test infrastructure for updraft tests
//!
//! In a test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! - `constants`: version strings, platform identifiers, test data
//! - `builders`: fluent builders for Release and ReleaseAsset
//! - `mock_server`: wiremock setup helpers for the release API
//! - `swap_helpers`: fake binaries and scripts for swap testing

// Not every test file exercises every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod mock_server;
pub mod swap_helpers;

pub use builders::*;
pub use constants::*;
pub use mock_server::*;
pub use swap_helpers::*;
