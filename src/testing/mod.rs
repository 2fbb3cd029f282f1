//! Test doubles for the browsing layer.
//!
//! `FakeBrowser` serves canned pages keyed by URL and records every
//! navigation and context it sees; `fixtures` builds pages that follow the
//! real Naukri locator contract.

pub mod fake;
pub mod fixtures;

pub use fake::{FakeBrowser, FakeElement, FakePage};
