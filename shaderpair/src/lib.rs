//! # Reload-aware vertex/fragment program pairs
//!
//! shaderpair binds an engine-side shader object to the program-object lifecycle of a graphics
//! API: a [`Program`] is built out of a vertex [`Stage`] and a fragment [`Stage`], linked through
//! a backend, and relinked transparently whenever one of its stages announces it got recompiled.
//!
//! Next to the program lives the [`Binding`], a small store of named textures, cubemaps and local
//! parameters a renderer consults when drawing with the program.
//!
//! # Backends and contexts
//!
//! Nothing in this crate talks to a GPU directly. Every native call goes through the
//! [`backend::shader::Shader`] trait, reached via a [`GraphicsContext`]. The OpenGL 3.3
//! implementation lives in the `shaderpair-gl` crate; tests plug a recording mock instead.
//!
//! # Reloading
//!
//! Stages are shared (`Rc<Stage<_>>`) and can be recompiled at any time with [`Stage::reload`].
//! A reload is announced to every program listening on the stage by sending a [`StageEvent`] on
//! a channel. Programs pick those announcements up when you call [`Program::process_events`],
//! which means a relink never happens in the middle of another link or unlink.
//!
//! [`Program`]: crate::shader::program::Program
//! [`Program::process_events`]: crate::shader::program::Program::process_events
//! [`Stage`]: crate::shader::stage::Stage
//! [`Stage::reload`]: crate::shader::stage::Stage::reload
//! [`StageEvent`]: crate::shader::stage::StageEvent
//! [`Binding`]: crate::shader::binding::Binding
//! [`GraphicsContext`]: crate::context::GraphicsContext

#![deny(missing_docs)]

pub mod backend;
pub mod context;
pub mod shader;
