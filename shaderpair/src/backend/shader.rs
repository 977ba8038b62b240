//! Shader backend interface.
//!
//! This interface defines the low-level API shader stages and programs must implement to be
//! usable. It is the capability a [`Program`] is built on: creation, attachment, attribute
//! binding, link and destruction of native program objects.
//!
//! Destruction and detachment are associated functions (no `self`) so that they can run from
//! [`Drop`] implementations, where no graphics context is at hand.
//!
//! [`Program`]: crate::shader::program::Program

use crate::shader::{ProgramError, StageError, StageType};

/// Native name of a stage or program, as handed out by the backend.
pub type NativeHandle = u32;

/// Shader stages and programs.
pub unsafe trait Shader {
  /// Backend representation of a compiled shader stage.
  type StageRepr;

  /// Backend representation of a shader program.
  type ProgramRepr;

  /// Compile a new shader stage of type `ty` out of its source code.
  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError>;

  /// Destroy a shader stage.
  ///
  /// If the stage is still attached to a program, the backend must keep the attachment usable
  /// until the program detaches it.
  unsafe fn destroy_stage(stage: &mut Self::StageRepr);

  /// Create a new, empty program object.
  ///
  /// Fails with [`ProgramError::CreationFailed`] if the platform doesn’t hand out a program.
  unsafe fn new_program(&mut self) -> Result<Self::ProgramRepr, ProgramError>;

  /// Attach a compiled stage to a program.
  unsafe fn attach_stage(&mut self, program: &mut Self::ProgramRepr, stage: &Self::StageRepr);

  /// Bind the vertex attribute called `name` to the slot `index`.
  ///
  /// This must happen before [`Shader::link_program`] to be taken into account.
  unsafe fn bind_attrib_location(
    &mut self,
    program: &mut Self::ProgramRepr,
    index: u32,
    name: &str,
  );

  /// Link a program with all its attached stages.
  unsafe fn link_program(&mut self, program: &mut Self::ProgramRepr) -> Result<(), ProgramError>;

  /// Detach every stage currently attached to a program.
  unsafe fn detach_stages(program: &mut Self::ProgramRepr);

  /// Destroy a program.
  unsafe fn destroy_program(program: &mut Self::ProgramRepr);

  /// Native handle of a compiled stage.
  unsafe fn stage_handle(stage: &Self::StageRepr) -> NativeHandle;

  /// Native handle of a program.
  unsafe fn program_handle(program: &Self::ProgramRepr) -> NativeHandle;
}
