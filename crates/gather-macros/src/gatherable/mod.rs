//! Implementation of the `#[derive(Gatherable)]` macro.
//!
//! Generates the member lookup that lets gather resolve attribute paths on a
//! struct, plus member name constants.

mod attrs;
mod derive;

pub use derive::gatherable_derive_impl;
