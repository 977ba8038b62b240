//! Graphics state.

use gl::types::*;
use log::debug;
use std::cell::RefCell;
use std::error;
use std::ffi::CStr;
use std::fmt;
use std::marker::PhantomData;

// TLS synchronization barrier for `GLState`.
thread_local!(static TLS_ACQUIRE_GFX_STATE: RefCell<Option<()>> = RefCell::new(Some(())));

/// The graphics state.
///
/// This type represents the current state of a given graphics context: the limits the backend
/// checks its calls against, queried once when the state is acquired.
#[derive(Debug)]
pub struct GLState {
  _a: PhantomData<*const ()>, // !Send and !Sync

  // vertex attributes
  max_vertex_attribs: GLuint,

  // shading language
  shading_language_version: String,
}

impl GLState {
  /// Create a new `GLState`.
  ///
  /// > Note: keep in mind you can create only one per thread.
  pub(crate) fn new() -> Result<Self, StateQueryError> {
    TLS_ACQUIRE_GFX_STATE.with(|rc| {
      let mut inner = rc.borrow_mut();

      match *inner {
        Some(_) => {
          inner.take();
          Self::get_from_context()
        }

        None => Err(StateQueryError::UnavailableGLState),
      }
    })
  }

  /// Get a `GLState` from the current OpenGL context.
  fn get_from_context() -> Result<Self, StateQueryError> {
    unsafe {
      let max_vertex_attribs = get_ctx_max_vertex_attribs()?;
      let shading_language_version = get_ctx_shading_language_version()?;

      debug!(
        "acquired OpenGL state (GLSL {}, {} vertex attributes)",
        shading_language_version, max_vertex_attribs
      );

      Ok(GLState {
        _a: PhantomData,
        max_vertex_attribs,
        shading_language_version,
      })
    }
  }

  /// Number of vertex attribute slots available.
  pub fn max_vertex_attribs(&self) -> GLuint {
    self.max_vertex_attribs
  }

  /// Shading language version reported by the driver.
  pub fn shading_language_version(&self) -> &str {
    &self.shading_language_version
  }
}

/// An error that might happen when the context is queried.
#[non_exhaustive]
#[derive(Debug)]
pub enum StateQueryError {
  /// The [`GLState`] object is unavailable.
  ///
  /// That might occur if the current thread doesn’t support allocating a new graphics state. It
  /// might happen if you try to have more than one state on the same thread, for instance.
  UnavailableGLState,
  /// Corrupted vertex attribute limit.
  UnknownMaxVertexAttribs(GLint),
  /// The driver didn’t report a shading language version.
  UnknownShadingLanguageVersion,
}

impl fmt::Display for StateQueryError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StateQueryError::UnavailableGLState => write!(f, "unavailable graphics state"),
      StateQueryError::UnknownMaxVertexAttribs(ref n) => {
        write!(f, "unknown maximum vertex attribute count: {}", n)
      }
      StateQueryError::UnknownShadingLanguageVersion => {
        write!(f, "unknown shading language version")
      }
    }
  }
}

impl error::Error for StateQueryError {}

unsafe fn get_ctx_max_vertex_attribs() -> Result<GLuint, StateQueryError> {
  let mut max = 0;
  gl::GetIntegerv(gl::MAX_VERTEX_ATTRIBS, &mut max);

  if max > 0 {
    Ok(max as GLuint)
  } else {
    Err(StateQueryError::UnknownMaxVertexAttribs(max))
  }
}

unsafe fn get_ctx_shading_language_version() -> Result<String, StateQueryError> {
  let version = gl::GetString(gl::SHADING_LANGUAGE_VERSION);

  if version.is_null() {
    Err(StateQueryError::UnknownShadingLanguageVersion)
  } else {
    Ok(
      CStr::from_ptr(version as *const _)
        .to_string_lossy()
        .into_owned(),
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn state_query_error_display() {
    assert_eq!(
      StateQueryError::UnavailableGLState.to_string(),
      "unavailable graphics state"
    );
    assert_eq!(
      StateQueryError::UnknownMaxVertexAttribs(-1).to_string(),
      "unknown maximum vertex attribute count: -1"
    );
  }
}
