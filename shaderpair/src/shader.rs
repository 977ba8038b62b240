//! Shader stages, programs and bindings.
//!
//! A shader [`Program`] is made of two [`Stage`]s: a vertex stage and a fragment stage. Stages
//! are compiled on their own and shared between programs with [`Rc`]. When a stage gets
//! recompiled, it announces it to the programs using it, which relink to pick the new compiled
//! object up.
//!
//! A program hands out [`Binding`]s, which gather the named textures, cubemaps and local
//! parameters a renderer applies when drawing with that program.
//!
//! [`Program`]: crate::shader::program::Program
//! [`Stage`]: crate::shader::stage::Stage
//! [`Binding`]: crate::shader::binding::Binding
//! [`Rc`]: std::rc::Rc

pub mod binding;
pub mod param;
pub mod program;
pub mod stage;

use std::error;
use std::fmt;

pub use self::binding::Binding;
pub use self::param::{LocalParam, ParamData, ParamType, ParamValue};
pub use self::program::{LinkConfig, LinkState, Program, ProgramId};
pub use self::stage::{Stage, StageEvent, StageId};

/// A shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Errors that shader stages can emit.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum StageError {
  /// Occurs when a shader fails to compile.
  CompilationFailed(StageType, String),
  /// Occurs when you try to create a shader which type is not supported on the current hardware.
  UnsupportedType(StageType),
}

impl StageError {
  /// Occurs when a shader fails to compile.
  pub fn compilation_failed(ty: StageType, reason: impl Into<String>) -> Self {
    StageError::CompilationFailed(ty, reason.into())
  }

  /// Occurs when you try to create a shader which type is not supported on the current hardware.
  pub fn unsupported_type(ty: StageType) -> Self {
    StageError::UnsupportedType(ty)
  }
}

impl fmt::Display for StageError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageError::CompilationFailed(ref ty, ref r) => write!(f, "{} compilation error: {}", ty, r),

      StageError::UnsupportedType(ty) => write!(f, "unsupported {}", ty),
    }
  }
}

impl error::Error for StageError {}

/// Errors that a [`Program`] can generate.
///
/// [`Program`]: crate::shader::program::Program
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// The platform refused to create a program object.
  CreationFailed(String),
  /// Program link failed. You can inspect the reason by looking at the contained [`String`].
  LinkFailed(String),
  /// A shader stage failed to compile or validate its state.
  StageError(StageError),
}

impl ProgramError {
  /// The platform refused to create a program object.
  pub fn creation_failed(reason: impl Into<String>) -> Self {
    ProgramError::CreationFailed(reason.into())
  }

  /// Program link failed.
  pub fn link_failed(reason: impl Into<String>) -> Self {
    ProgramError::LinkFailed(reason.into())
  }
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::CreationFailed(ref s) => {
        write!(f, "shader program failed to be created: {}", s)
      }

      ProgramError::LinkFailed(ref s) => write!(f, "shader program failed to link: {}", s),

      ProgramError::StageError(ref e) => write!(f, "shader program has stage error: {}", e),
    }
  }
}

impl error::Error for ProgramError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      ProgramError::StageError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<StageError> for ProgramError {
  fn from(e: StageError) -> Self {
    ProgramError::StageError(e)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stage_error_display() {
    let e = StageError::compilation_failed(StageType::FragmentShader, "syntax error");
    assert_eq!(
      e.to_string(),
      "fragment shader compilation error: syntax error"
    );
  }

  #[test]
  fn program_error_wraps_stage_error() {
    let e: ProgramError = StageError::unsupported_type(StageType::VertexShader).into();

    assert_eq!(
      e.to_string(),
      "shader program has stage error: unsupported vertex shader"
    );
    assert!(error::Error::source(&e).is_some());
  }

  #[test]
  fn link_failed_display() {
    let e = ProgramError::link_failed("vTangent: attribute slot taken");
    assert_eq!(
      e.to_string(),
      "shader program failed to link: vTangent: attribute slot taken"
    );
  }
}
