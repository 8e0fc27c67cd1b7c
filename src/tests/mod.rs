//! Test suites for the block composer
//!
//! Tests are grouped by the component they exercise. Unit tests for
//! individual types live next to the code they cover.

#[cfg(test)]
mod integration;
