//! OpenGL 3.3 backend.

mod shader;
mod state;

pub use self::shader::{Program, Stage};
pub use self::state::GLState;
pub use self::state::StateQueryError;
use shaderpair::context::GraphicsContext;
use std::cell::RefCell;
use std::rc::Rc;

/// An OpenGL 3.3 backend.
///
/// This type is to be used as a shaderpair backend type. It implements the whole public API.
#[derive(Debug)]
pub struct GL33 {
  pub(crate) state: Rc<RefCell<GLState>>,
}

impl GL33 {
  /// Create a new OpenGL 3.3 backend.
  ///
  /// The OpenGL context must be current on the calling thread and its function pointers loaded
  /// (see [`gl::load_with`]). Only one backend can be created per thread.
  pub fn new() -> Result<Self, StateQueryError> {
    GLState::new().map(|state| GL33 {
      state: Rc::new(RefCell::new(state)),
    })
  }

  /// Internal access to the backend state.
  ///
  /// # Unsafety
  ///
  /// This method is **highly unsafe** as it exposes the internals of the backend. Playing with it should be done with
  /// extreme caution.
  pub unsafe fn state(&self) -> &Rc<RefCell<GLState>> {
    &self.state
  }
}

unsafe impl GraphicsContext for GL33 {
  type Backend = GL33;

  fn backend(&mut self) -> &mut Self::Backend {
    self
  }
}
