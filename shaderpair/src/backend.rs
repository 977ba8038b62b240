//! Backend interfacing.
//!
//! Backends implement the traits of this module in order to be usable by the rest of the crate.
//! Those traits are `unsafe` to implement: the public API relies on the backend honoring the
//! documented contracts (a destroyed program is never used again, detaching removes every stage
//! the program had attached, etc.).

pub mod shader;
