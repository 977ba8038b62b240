//! Shader programs.
//!
//! A [`Program`] links a vertex [`Stage`] and a fragment [`Stage`] into a native program object
//! and keeps that object in sync with its stages. It lives in one of two states (see
//! [`LinkState`]):
//!
//! - _Linked_: a native program exists and reflects the current vertex/fragment pair.
//! - _Unlinked_: no native program exists.
//!
//! Swapping a stage, calling [`Program::reload`] or receiving a reload announcement from one of
//! the stages all go through an unlink followed by a link. A program always unregisters from its
//! stages before relinking, so a stage never holds more than one registration per program and a
//! stage that was swapped out can’t trigger a relink anymore.
//!
//! Announcements are queued on a channel owned by the program and only acted upon when you call
//! [`Program::process_events`] (or hand an event to [`Program::handle_event`] yourself).

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{debug, info, warn};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::shader::{NativeHandle, Shader};
use crate::context::GraphicsContext;
use crate::shader::binding::Binding;
use crate::shader::stage::{Stage, StageEvent, StageId};
use crate::shader::ProgramError;

/// Attribute slot reserved for tangent vectors.
pub const TANGENT_ATTRIB_INDEX: u32 = 6;

/// Name of the tangent vertex attribute bound to [`TANGENT_ATTRIB_INDEX`].
pub const TANGENT_ATTRIB_NAME: &str = "vTangent";

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identifier of a [`Program`].
///
/// It is also the identity a program registers with on its stages.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ProgramId(u64);

impl ProgramId {
  pub(crate) fn next() -> Self {
    ProgramId(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Display for ProgramId {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    write!(f, "program#{}", self.0)
  }
}

/// Link-time settings of a [`Program`].
///
/// The default configuration binds [`TANGENT_ATTRIB_NAME`] to [`TANGENT_ATTRIB_INDEX`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkConfig {
  attrib_bindings: Vec<(u32, String)>,
}

impl LinkConfig {
  /// A configuration binding no attribute at all.
  pub fn empty() -> Self {
    LinkConfig {
      attrib_bindings: Vec::new(),
    }
  }

  /// Bind the vertex attribute `name` to `index` at link time.
  pub fn with_attrib(mut self, index: u32, name: impl Into<String>) -> Self {
    self.attrib_bindings.push((index, name.into()));
    self
  }

  /// Attribute bindings, in the order they’re issued.
  pub fn attrib_bindings(&self) -> &[(u32, String)] {
    &self.attrib_bindings
  }
}

impl Default for LinkConfig {
  fn default() -> Self {
    LinkConfig::empty().with_attrib(TANGENT_ATTRIB_INDEX, TANGENT_ATTRIB_NAME)
  }
}

/// Whether a [`Program`] currently owns a linked native program.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum LinkState {
  /// No native program.
  Unlinked,
  /// A native program reflecting the current stage pair.
  Linked,
}

/// A shader program built out of a vertex and a fragment stage.
pub struct Program<S>
where
  S: ?Sized + Shader,
{
  id: ProgramId,
  vertex: Rc<Stage<S>>,
  fragment: Rc<Stage<S>>,
  config: LinkConfig,
  repr: Option<S::ProgramRepr>,
  subscribed: bool,
  events: Sender<StageEvent>,
  mailbox: Receiver<StageEvent>,
}

impl<S> Program<S>
where
  S: ?Sized + Shader,
{
  /// Create and link a program with the default [`LinkConfig`].
  pub fn new<C>(
    ctx: &mut C,
    vertex: Rc<Stage<S>>,
    fragment: Rc<Stage<S>>,
  ) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    Self::with_config(ctx, vertex, fragment, LinkConfig::default())
  }

  /// Create and link a program with a given [`LinkConfig`].
  pub fn with_config<C>(
    ctx: &mut C,
    vertex: Rc<Stage<S>>,
    fragment: Rc<Stage<S>>,
    config: LinkConfig,
  ) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    let (events, mailbox) = unbounded();
    let mut program = Program {
      id: ProgramId::next(),
      vertex,
      fragment,
      config,
      repr: None,
      subscribed: false,
      events,
      mailbox,
    };

    program.link(ctx)?;
    Ok(program)
  }

  /// Identifier of this program.
  pub fn id(&self) -> ProgramId {
    self.id
  }

  /// Current link state.
  pub fn state(&self) -> LinkState {
    if self.repr.is_some() {
      LinkState::Linked
    } else {
      LinkState::Unlinked
    }
  }

  /// Whether a native program is currently linked.
  pub fn is_linked(&self) -> bool {
    self.repr.is_some()
  }

  /// Native handle of the linked program, if any.
  pub fn handle(&self) -> Option<NativeHandle> {
    self
      .repr
      .as_ref()
      .map(|repr| unsafe { S::program_handle(repr) })
  }

  /// Vertex stage currently in use.
  pub fn vertex_stage(&self) -> &Rc<Stage<S>> {
    &self.vertex
  }

  /// Fragment stage currently in use.
  pub fn fragment_stage(&self) -> &Rc<Stage<S>> {
    &self.fragment
  }

  /// Link-time settings.
  pub fn config(&self) -> &LinkConfig {
    &self.config
  }

  /// Link the program.
  ///
  /// Creates a native program, attaches both stages, binds the configured attributes, links and
  /// registers on both stages for reload announcements. Does nothing if already linked.
  ///
  /// If linking fails, the native program is destroyed and the program stays unlinked but keeps
  /// listening on its stages, so that a reload of a fixed stage gives linking another try.
  pub fn link<C>(&mut self, ctx: &mut C) -> Result<(), ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    if self.repr.is_some() {
      return Ok(());
    }

    self.subscribe();

    let backend = ctx.backend();
    let mut repr = unsafe { backend.new_program()? };

    unsafe {
      backend.attach_stage(&mut repr, &self.fragment.repr());
      backend.attach_stage(&mut repr, &self.vertex.repr());

      for (index, name) in &self.config.attrib_bindings {
        backend.bind_attrib_location(&mut repr, *index, name);
      }

      if let Err(e) = backend.link_program(&mut repr) {
        S::detach_stages(&mut repr);
        S::destroy_program(&mut repr);

        warn!("{} failed to link: {}", self.id, e);
        return Err(e);
      }
    }

    debug!(
      "linked {} ({} + {}, handle {})",
      self.id,
      self.vertex.id(),
      self.fragment.id(),
      unsafe { S::program_handle(&repr) }
    );

    self.repr = Some(repr);
    Ok(())
  }

  /// Unlink the program.
  ///
  /// Unregisters from both stages, drops the announcements still queued, detaches the stages
  /// and destroys the native program.
  pub fn unlink(&mut self) {
    self.unsubscribe();

    if let Some(mut repr) = self.repr.take() {
      unsafe {
        S::detach_stages(&mut repr);
        S::destroy_program(&mut repr);
      }

      debug!("unlinked {}", self.id);
    }
  }

  /// Destroy the native program and link a new one.
  pub fn reload<C>(&mut self, ctx: &mut C) -> Result<(), ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    self.unlink();
    self.link(ctx)
  }

  /// Replace the vertex stage and relink.
  pub fn set_vertex_stage<C>(
    &mut self,
    ctx: &mut C,
    stage: Rc<Stage<S>>,
  ) -> Result<(), ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    self.unlink();
    self.vertex = stage;
    self.link(ctx)
  }

  /// Replace the fragment stage and relink.
  pub fn set_fragment_stage<C>(
    &mut self,
    ctx: &mut C,
    stage: Rc<Stage<S>>,
  ) -> Result<(), ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    self.unlink();
    self.fragment = stage;
    self.link(ctx)
  }

  /// React to a stage announcement.
  ///
  /// Relinks if the event comes from the current vertex or fragment stage and ignores it
  /// otherwise. A program that was explicitly unlinked ignores every announcement until it gets
  /// linked again. Returns whether a relink happened.
  pub fn handle_event<C>(&mut self, ctx: &mut C, event: StageEvent) -> Result<bool, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    if !self.subscribed {
      debug!("{} is not listening, ignoring reload of {}", self.id, event.stage());
      return Ok(false);
    }

    match event {
      StageEvent::Reloaded(stage) if self.uses_stage(stage) => {
        info!("{} reloaded, relinking {}", stage, self.id);
        self.reload(ctx)?;
        Ok(true)
      }

      StageEvent::Reloaded(stage) => {
        debug!("{} ignores reload of unrelated {}", self.id, stage);
        Ok(false)
      }
    }
  }

  /// Process every pending stage announcement.
  ///
  /// All announcements coming from the current stages are coalesced into a single relink; the
  /// other ones are dropped. Returns whether a relink happened.
  pub fn process_events<C>(&mut self, ctx: &mut C) -> Result<bool, ProgramError>
  where
    C: GraphicsContext<Backend = S>,
  {
    let mut relink = None;

    for event in self.mailbox.try_iter() {
      if self.uses_stage(event.stage()) {
        relink.get_or_insert(event);
      } else {
        debug!("{} drops stale announcement from {}", self.id, event.stage());
      }
    }

    match relink {
      Some(event) => self.handle_event(ctx, event),
      None => Ok(false),
    }
  }

  /// Create an empty [`Binding`] for this program.
  pub fn create_binding<'a, T, U>(&self) -> Binding<'a, T, U>
  where
    T: ?Sized,
    U: ?Sized,
  {
    Binding::new(self.id)
  }

  fn uses_stage(&self, stage: StageId) -> bool {
    self.vertex.id() == stage || self.fragment.id() == stage
  }

  fn subscribe(&mut self) {
    if !self.subscribed {
      self.vertex.add_listener(self.id, self.events.clone());

      // a stage used on both ends announces once
      if !Rc::ptr_eq(&self.vertex, &self.fragment) {
        self.fragment.add_listener(self.id, self.events.clone());
      }

      self.subscribed = true;
    }
  }

  fn unsubscribe(&mut self) {
    if self.subscribed {
      self.vertex.remove_listener(self.id);
      self.fragment.remove_listener(self.id);
      self.subscribed = false;
    }

    // announcements queued so far refer to a link that no longer exists
    let dropped = self.mailbox.try_iter().count();
    if dropped > 0 {
      debug!("{} drops {} pending announcement(s)", self.id, dropped);
    }
  }
}

impl<S> fmt::Debug for Program<S>
where
  S: ?Sized + Shader,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.debug_struct("Program")
      .field("id", &self.id)
      .field("state", &self.state())
      .field("handle", &self.handle())
      .field("vertex", &self.vertex.id())
      .field("fragment", &self.fragment.id())
      .finish()
  }
}

impl<S> Drop for Program<S>
where
  S: ?Sized + Shader,
{
  fn drop(&mut self) {
    self.unlink();
  }
}
