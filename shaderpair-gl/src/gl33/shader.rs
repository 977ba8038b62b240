use crate::gl33::GL33;
use gl::{self, types::*};
use log::warn;
use shaderpair::{
  backend::shader::{NativeHandle, Shader},
  shader::{ProgramError, StageError, StageType},
};
use std::{ffi::CString, ptr::null};

/// Compiled OpenGL shader object.
#[derive(Debug)]
pub struct Stage {
  handle: GLuint,
  ty: StageType,
}

/// OpenGL program object and the shader objects attached to it.
#[derive(Debug)]
pub struct Program {
  handle: GLuint,
  attached: Vec<GLuint>,
}

unsafe impl Shader for GL33 {
  type StageRepr = Stage;

  type ProgramRepr = Program;

  unsafe fn new_stage(&mut self, ty: StageType, src: &str) -> Result<Self::StageRepr, StageError> {
    let c_src = CString::new(src.as_bytes())
      .map_err(|_| StageError::compilation_failed(ty, "shader source contains a nul byte"))?;

    let handle = gl::CreateShader(opengl_shader_type(ty));

    if handle == 0 {
      return Err(StageError::compilation_failed(
        ty,
        "unable to create shader stage",
      ));
    }

    gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
    gl::CompileShader(handle);

    let mut compiled: GLint = gl::FALSE.into();
    gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

    if compiled == gl::TRUE.into() {
      Ok(Stage { handle, ty })
    } else {
      let log = shader_info_log(handle);
      gl::DeleteShader(handle);

      Err(StageError::compilation_failed(ty, log))
    }
  }

  unsafe fn destroy_stage(stage: &mut Self::StageRepr) {
    gl::DeleteShader(stage.handle);
  }

  unsafe fn new_program(&mut self) -> Result<Self::ProgramRepr, ProgramError> {
    let handle = gl::CreateProgram();

    if handle == 0 {
      Err(ProgramError::creation_failed("glCreateProgram returned 0"))
    } else {
      Ok(Program {
        handle,
        attached: Vec::new(),
      })
    }
  }

  unsafe fn attach_stage(&mut self, program: &mut Self::ProgramRepr, stage: &Self::StageRepr) {
    gl::AttachShader(program.handle, stage.handle);
    program.attached.push(stage.handle);
  }

  unsafe fn bind_attrib_location(
    &mut self,
    program: &mut Self::ProgramRepr,
    index: u32,
    name: &str,
  ) {
    let max = self.state.borrow().max_vertex_attribs();
    if index >= max {
      warn!(
        "vertex attribute {} bound to slot {} but only {} slots are available",
        name, index, max
      );
    }

    match CString::new(name.as_bytes()) {
      Ok(c_name) => gl::BindAttribLocation(program.handle, index, c_name.as_ptr() as *const GLchar),
      Err(_) => warn!("cannot bind vertex attribute {:?}: name contains a nul byte", name),
    }
  }

  unsafe fn link_program(&mut self, program: &mut Self::ProgramRepr) -> Result<(), ProgramError> {
    let handle = program.handle;

    gl::LinkProgram(handle);

    let mut linked: GLint = gl::FALSE.into();
    gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

    if linked == gl::TRUE.into() {
      Ok(())
    } else {
      Err(ProgramError::link_failed(program_info_log(handle)))
    }
  }

  unsafe fn detach_stages(program: &mut Self::ProgramRepr) {
    for stage in program.attached.drain(..) {
      gl::DetachShader(program.handle, stage);
    }
  }

  unsafe fn destroy_program(program: &mut Self::ProgramRepr) {
    gl::DeleteProgram(program.handle);
  }

  unsafe fn stage_handle(stage: &Self::StageRepr) -> NativeHandle {
    stage.handle
  }

  unsafe fn program_handle(program: &Self::ProgramRepr) -> NativeHandle {
    program.handle
  }
}

impl Stage {
  /// Type of the stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

unsafe fn shader_info_log(handle: GLuint) -> String {
  let mut log_len: GLint = 0;
  gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

  let mut log = vec![0u8; log_len.max(0) as usize];
  let mut written: GLsizei = 0;
  gl::GetShaderInfoLog(
    handle,
    log_len,
    &mut written,
    log.as_mut_ptr() as *mut GLchar,
  );

  decode_info_log(log, written)
}

unsafe fn program_info_log(handle: GLuint) -> String {
  let mut log_len: GLint = 0;
  gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

  let mut log = vec![0u8; log_len.max(0) as usize];
  let mut written: GLsizei = 0;
  gl::GetProgramInfoLog(
    handle,
    log_len,
    &mut written,
    log.as_mut_ptr() as *mut GLchar,
  );

  decode_info_log(log, written)
}

// drivers are free to put garbage in logs; never fail on them
fn decode_info_log(mut log: Vec<u8>, written: GLsizei) -> String {
  log.truncate(written.max(0) as usize);

  String::from_utf8_lossy(&log).trim_end().to_owned()
}
