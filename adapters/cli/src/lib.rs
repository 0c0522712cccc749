#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Path Defence experience.
//!
//! The binary is a thin shell around this library: configuration loading,
//! scene population and the scripted headless run all live here so they can
//! be exercised by integration tests.

pub mod config;
pub mod headless;
pub mod input;
pub mod scene;
