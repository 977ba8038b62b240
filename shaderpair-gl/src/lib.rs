//! OpenGL backends.
//!
//! This crate exports [OpenGL](https://www.khronos.org/opengl/) backends for
//! [shaderpair](https://crates.io/crates/shaderpair). Pick a _backend type_ (only [`GL33`] so far),
//! create it once the OpenGL context is current on your thread, and use it as the graphics
//! context of your stages and programs.

#[cfg(feature = "gl33")]
pub mod gl33;

#[cfg(feature = "gl33")]
pub use gl33::GL33;
