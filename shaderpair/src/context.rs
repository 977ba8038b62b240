//! Graphics context.
//!
//! A graphics context is an object that abstracts all the low-level operations that happen on a
//! graphics device. It gives access to a backend, which is the type actually issuing the native
//! calls (see [`crate::backend`]).
//!
//! This crate doesn’t provide you with creating such contexts. Instead, you must do it yourself
//! or rely on crates doing it for you.
//!
//! # On context and threads
//!
//! An object which type implements `GraphicsContext` must be `!Send` and `!Sync`: native program
//! objects belong to the thread the graphics context is current on, and every operation of this
//! crate assumes exclusive access to them.

/// Class of graphics context.
///
/// Such a context must not be Send nor Sync, which means that you cannot share it between
/// threads in any way (move / borrow).
pub unsafe trait GraphicsContext {
  /// Backend issuing the native calls.
  type Backend: ?Sized;

  /// Access the backend.
  fn backend(&mut self) -> &mut Self::Backend;
}
