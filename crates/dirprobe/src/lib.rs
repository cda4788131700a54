//! Business-directory UI suite: page objects, the scenario catalog and the
//! command-line front end that runs one scenario per invocation.

pub mod cli;
pub mod pages;
pub mod scenarios;

/// Fixture directory shipped with the crate.
pub const DEFAULT_FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");
