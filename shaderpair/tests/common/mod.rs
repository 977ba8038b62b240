//! Recording backend used by the integration tests.
//!
//! Stage sources drive failures: a source containing `@compile-error` fails to compile, and a
//! program with an attached stage whose source contains `@link-error` fails to link.

#![allow(dead_code)]

use shaderpair::backend::shader::{NativeHandle, Shader};
use shaderpair::context::GraphicsContext;
use shaderpair::shader::{ProgramError, Stage, StageError, StageType};
use std::cell::RefCell;
use std::rc::Rc;

pub fn init_logger() {
  let _ = env_logger::builder().is_test(true).try_init();
}

/// Everything the mock saw.
#[derive(Debug, Default)]
pub struct Journal {
  next_handle: NativeHandle,
  pub programs_created: Vec<NativeHandle>,
  pub programs_deleted: Vec<NativeHandle>,
  pub stages_destroyed: Vec<NativeHandle>,
  pub attached: Vec<(NativeHandle, NativeHandle)>,
  pub detached: Vec<(NativeHandle, NativeHandle)>,
  pub attribs: Vec<(NativeHandle, u32, String)>,
  pub links: usize,
}

impl Journal {
  fn next_handle(&mut self) -> NativeHandle {
    self.next_handle += 1;
    self.next_handle
  }
}

#[derive(Debug)]
pub struct MockStage {
  pub handle: NativeHandle,
  breaks_link: bool,
  journal: Rc<RefCell<Journal>>,
}

#[derive(Debug)]
pub struct MockProgram {
  pub handle: NativeHandle,
  attached: Vec<(NativeHandle, bool)>,
  journal: Rc<RefCell<Journal>>,
}

#[derive(Debug, Default)]
pub struct Mock {
  pub journal: Rc<RefCell<Journal>>,
  pub fail_creation: bool,
}

impl Mock {
  pub fn new() -> Self {
    init_logger();
    Mock::default()
  }

  pub fn stage(&mut self, ty: StageType, src: &str) -> Rc<Stage<Mock>> {
    Rc::new(Stage::new(self, ty, src).expect("mock stage"))
  }

  pub fn vertex(&mut self) -> Rc<Stage<Mock>> {
    self.stage(StageType::VertexShader, "void main() { gl_Position = vec4(0.); }")
  }

  pub fn fragment(&mut self) -> Rc<Stage<Mock>> {
    self.stage(StageType::FragmentShader, "void main() { frag = vec4(1.); }")
  }
}

unsafe impl GraphicsContext for Mock {
  type Backend = Mock;

  fn backend(&mut self) -> &mut Self::Backend {
    self
  }
}

unsafe impl Shader for Mock {
  type StageRepr = MockStage;

  type ProgramRepr = MockProgram;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    if src.contains("@compile-error") {
      return Err(StageError::compilation_failed(ty, "0:1: syntax error"));
    }

    let handle = self.journal.borrow_mut().next_handle();

    Ok(MockStage {
      handle,
      breaks_link: src.contains("@link-error"),
      journal: self.journal.clone(),
    })
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    stage.journal.borrow_mut().stages_destroyed.push(stage.handle);
  }

  unsafe fn new_program(&mut self) -> Result<Self::ProgramRepr, ProgramError> {
    if self.fail_creation {
      return Err(ProgramError::creation_failed("no program for you"));
    }

    let mut journal = self.journal.borrow_mut();
    let handle = journal.next_handle();
    journal.programs_created.push(handle);

    Ok(MockProgram {
      handle,
      attached: Vec::new(),
      journal: self.journal.clone(),
    })
  }

  unsafe fn attach_stage(&mut self, program: &mut Self::ProgramRepr, stage: &Self::StageRepr) {
    program.attached.push((stage.handle, stage.breaks_link));
    self
      .journal
      .borrow_mut()
      .attached
      .push((program.handle, stage.handle));
  }

  unsafe fn bind_attrib_location(
    &mut self,
    program: &mut Self::ProgramRepr,
    index: u32,
    name: &str,
  ) {
    self
      .journal
      .borrow_mut()
      .attribs
      .push((program.handle, index, name.to_owned()));
  }

  unsafe fn link_program(&mut self, program: &mut Self::ProgramRepr) -> Result<(), ProgramError> {
    self.journal.borrow_mut().links += 1;

    if program.attached.iter().any(|&(_, breaks)| breaks) {
      Err(ProgramError::link_failed("unresolved varying"))
    } else {
      Ok(())
    }
  }

  unsafe fn detach_stages(program: &mut Self::ProgramRepr) {
    let mut journal = program.journal.borrow_mut();

    for (stage, _) in program.attached.drain(..) {
      journal.detached.push((program.handle, stage));
    }
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    program
      .journal
      .borrow_mut()
      .programs_deleted
      .push(program.handle);
  }

  unsafe fn stage_handle(stage: &Self::StageRepr) -> NativeHandle {
    stage.handle
  }

  unsafe fn program_handle(program: &Self::ProgramRepr) -> NativeHandle {
    program.handle
  }
}
