//! Shader stages.
//!
//! A [`Stage`] is a single compiled shader stage (vertex or fragment). Stages are meant to be
//! shared between programs via [`Rc`] and can be recompiled in place with [`Stage::reload`].
//!
//! Every program using a stage registers itself as a listener on that stage. When the stage is
//! recompiled, it sends a [`StageEvent::Reloaded`] to each listener. Listeners whose receiving
//! end is gone are forgotten on the next announcement.
//!
//! [`Rc`]: std::rc::Rc

use crossbeam::channel::Sender;
use log::debug;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::shader::{NativeHandle, Shader};
use crate::context::GraphicsContext;
use crate::shader::program::ProgramId;
use crate::shader::{StageError, StageType};

static NEXT_STAGE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identifier of a [`Stage`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct StageId(u64);

impl StageId {
  fn next() -> Self {
    StageId(NEXT_STAGE_ID.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Display for StageId {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    write!(f, "stage#{}", self.0)
  }
}

/// Announcements sent by a stage to its listeners.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageEvent {
  /// The stage got a new compiled object; programs using it must relink.
  Reloaded(StageId),
}

impl StageEvent {
  /// Stage the event originates from.
  pub fn stage(&self) -> StageId {
    match *self {
      StageEvent::Reloaded(id) => id,
    }
  }
}

struct Listener {
  id: ProgramId,
  sender: Sender<StageEvent>,
}

/// A compiled shader stage.
pub struct Stage<S>
where
  S: ?Sized + Shader,
{
  id: StageId,
  ty: StageType,
  repr: RefCell<S::StageRepr>,
  listeners: RefCell<Vec<Listener>>,
}

impl<S> Stage<S>
where
  S: ?Sized + Shader,
{
  /// Compile a new shader stage.
  pub fn new<C, R>(ctx: &mut C, ty: StageType, src: R) -> Result<Self, StageError>
  where
    C: GraphicsContext<Backend = S>,
    R: AsRef<str>,
  {
    let repr = unsafe { ctx.backend().new_stage(ty, src.as_ref())? };
    let id = StageId::next();

    debug!("compiled {} {}", ty, id);

    Ok(Stage {
      id,
      ty,
      repr: RefCell::new(repr),
      listeners: RefCell::new(Vec::new()),
    })
  }

  /// Identifier of this stage.
  pub fn id(&self) -> StageId {
    self.id
  }

  /// Type of this stage.
  pub fn ty(&self) -> StageType {
    self.ty
  }

  /// Native handle of the current compiled object.
  ///
  /// The handle changes every time the stage is successfully reloaded.
  pub fn handle(&self) -> NativeHandle {
    unsafe { S::stage_handle(&self.repr.borrow()) }
  }

  pub(crate) fn repr(&self) -> Ref<S::StageRepr> {
    self.repr.borrow()
  }

  /// Recompile this stage from new source code.
  ///
  /// On success, the previous compiled object is destroyed and every listener is told about the
  /// reload. On failure, the previous compiled object stays in place and nobody is notified.
  pub fn reload<C, R>(&self, ctx: &mut C, src: R) -> Result<(), StageError>
  where
    C: GraphicsContext<Backend = S>,
    R: AsRef<str>,
  {
    let repr = unsafe { ctx.backend().new_stage(self.ty, src.as_ref())? };
    let mut previous = self.repr.replace(repr);

    unsafe { S::destroy_stage(&mut previous) };

    debug!("recompiled {} {}", self.ty, self.id);

    self.announce_reload();
    Ok(())
  }

  /// Tell every listener this stage was reloaded, without recompiling anything.
  ///
  /// Returns the number of listeners reached.
  pub fn announce_reload(&self) -> usize {
    let event = StageEvent::Reloaded(self.id);
    let mut listeners = self.listeners.borrow_mut();

    listeners.retain(|listener| listener.sender.send(event).is_ok());
    listeners.len()
  }

  /// Register `listener` to receive this stage’s announcements on `sender`.
  pub fn add_listener(&self, listener: ProgramId, sender: Sender<StageEvent>) {
    self.listeners.borrow_mut().push(Listener {
      id: listener,
      sender,
    });
  }

  /// Remove every registration made by `listener`.
  ///
  /// Returns how many registrations were removed.
  pub fn remove_listener(&self, listener: ProgramId) -> usize {
    let mut listeners = self.listeners.borrow_mut();
    let before = listeners.len();

    listeners.retain(|l| l.id != listener);
    before - listeners.len()
  }

  /// Number of registrations currently held by this stage.
  pub fn listener_count(&self) -> usize {
    self.listeners.borrow().len()
  }

  /// Whether `listener` is registered on this stage.
  pub fn has_listener(&self, listener: ProgramId) -> bool {
    self.listeners.borrow().iter().any(|l| l.id == listener)
  }
}

impl<S> fmt::Debug for Stage<S>
where
  S: ?Sized + Shader,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.debug_struct("Stage")
      .field("id", &self.id)
      .field("ty", &self.ty)
      .field("listeners", &self.listener_count())
      .finish()
  }
}

impl<S> Drop for Stage<S>
where
  S: ?Sized + Shader,
{
  fn drop(&mut self) {
    unsafe { S::destroy_stage(self.repr.get_mut()) }
  }
}
