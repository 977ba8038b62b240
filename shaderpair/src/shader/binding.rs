//! Per-program resource bindings.
//!
//! A [`Binding`] gathers the textures, cubemaps and local parameters a renderer applies when
//! drawing with a given program. Textures and cubemaps are borrowed; parameters are owned.
//!
//! Names are not deduplicated: adding a second texture under an existing name appends another
//! record, and lookups keep returning the first one until it gets cleared.

use std::fmt;

use crate::shader::param::{create_param_data, LocalParam, ParamType};
use crate::shader::program::ProgramId;

struct Named<'a, T>
where
  T: ?Sized,
{
  name: String,
  resource: &'a T,
}

/// Named resources and parameters of a single program.
///
/// `T` is the texture type and `C` the cubemap type; both are opaque to this crate.
pub struct Binding<'a, T, C>
where
  T: ?Sized,
  C: ?Sized,
{
  program: ProgramId,
  textures: Vec<Named<'a, T>>,
  cubemaps: Vec<Named<'a, C>>,
  params: Vec<LocalParam>,
}

impl<'a, T, C> Binding<'a, T, C>
where
  T: ?Sized,
  C: ?Sized,
{
  pub(crate) fn new(program: ProgramId) -> Self {
    Binding {
      program,
      textures: Vec::new(),
      cubemaps: Vec::new(),
      params: Vec::new(),
    }
  }

  /// Program this binding belongs to.
  pub fn program(&self) -> ProgramId {
    self.program
  }

  /// First texture bound under `name`.
  pub fn texture(&self, name: &str) -> Option<&'a T> {
    find(&self.textures, name)
  }

  /// Bind a texture under `name`.
  pub fn add_texture(&mut self, name: impl Into<String>, texture: &'a T) {
    self.textures.push(Named {
      name: name.into(),
      resource: texture,
    });
  }

  /// Remove the first texture bound under `name`, if any.
  pub fn clear_texture(&mut self, name: &str) {
    remove_first(&mut self.textures, name);
  }

  /// Textures in insertion order.
  pub fn textures(&self) -> impl Iterator<Item = (&str, &'a T)> + '_ {
    self.textures.iter().map(|t| (t.name.as_str(), t.resource))
  }

  /// First cubemap bound under `name`.
  pub fn cubemap(&self, name: &str) -> Option<&'a C> {
    find(&self.cubemaps, name)
  }

  /// Bind a cubemap under `name`.
  pub fn add_cubemap(&mut self, name: impl Into<String>, cubemap: &'a C) {
    self.cubemaps.push(Named {
      name: name.into(),
      resource: cubemap,
    });
  }

  /// Remove the first cubemap bound under `name`, if any.
  pub fn clear_cubemap(&mut self, name: &str) {
    remove_first(&mut self.cubemaps, name);
  }

  /// Cubemaps in insertion order.
  pub fn cubemaps(&self) -> impl Iterator<Item = (&str, &'a C)> + '_ {
    self.cubemaps.iter().map(|c| (c.name.as_str(), c.resource))
  }

  /// Declare a local parameter from its type tag and literal value.
  ///
  /// The value goes through [`create_param_data`] and is stored as is, whatever it parsed to.
  pub fn add_param(&mut self, ty: ParamType, name: impl Into<String>, value: &str) {
    let data = create_param_data(ty, value, "", "");
    self.params.push(LocalParam::new(name, ty, data));
  }

  /// First parameter declared under `name`.
  pub fn param(&self, name: &str) -> Option<&LocalParam> {
    self.params.iter().find(|p| p.name() == name)
  }

  /// Remove the first parameter declared under `name`, if any.
  pub fn clear_param(&mut self, name: &str) {
    if let Some(index) = self.params.iter().position(|p| p.name() == name) {
      self.params.remove(index);
    }
  }

  /// Parameters in declaration order.
  pub fn params(&self) -> &[LocalParam] {
    &self.params
  }
}

impl<'a, T, C> fmt::Debug for Binding<'a, T, C>
where
  T: ?Sized,
  C: ?Sized,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.debug_struct("Binding")
      .field("program", &self.program)
      .field(
        "textures",
        &self.textures.iter().map(|t| &t.name).collect::<Vec<_>>(),
      )
      .field(
        "cubemaps",
        &self.cubemaps.iter().map(|c| &c.name).collect::<Vec<_>>(),
      )
      .field("params", &self.params)
      .finish()
  }
}

fn find<'a, R>(entries: &[Named<'a, R>], name: &str) -> Option<&'a R>
where
  R: ?Sized,
{
  entries
    .iter()
    .find(|entry| entry.name == name)
    .map(|entry| entry.resource)
}

fn remove_first<R>(entries: &mut Vec<Named<R>>, name: &str)
where
  R: ?Sized,
{
  if let Some(index) = entries.iter().position(|entry| entry.name == name) {
    entries.remove(index);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::shader::param::ParamValue;

  #[derive(Debug, PartialEq)]
  struct Texture(u32);

  #[derive(Debug, PartialEq)]
  struct Cubemap(u32);

  fn binding<'a>() -> Binding<'a, Texture, Cubemap> {
    Binding::new(ProgramId::next())
  }

  #[test]
  fn missing_texture() {
    let binding = binding();
    assert_eq!(binding.texture("diffuse"), None);
  }

  #[test]
  fn duplicate_names_shadow() {
    let (t1, t2) = (Texture(1), Texture(2));
    let mut binding = binding();

    binding.add_texture("diffuse", &t1);
    binding.add_texture("diffuse", &t2);
    assert_eq!(binding.texture("diffuse"), Some(&t1));

    binding.clear_texture("diffuse");
    assert_eq!(binding.texture("diffuse"), Some(&t2));

    binding.clear_texture("diffuse");
    assert_eq!(binding.texture("diffuse"), None);

    binding.clear_texture("diffuse");
    assert_eq!(binding.textures().count(), 0);
  }

  #[test]
  fn cubemaps_are_separate_from_textures() {
    let t = Texture(1);
    let c = Cubemap(7);
    let mut binding = binding();

    binding.add_texture("env", &t);
    binding.add_cubemap("env", &c);

    assert_eq!(binding.texture("env"), Some(&t));
    assert_eq!(binding.cubemap("env"), Some(&c));

    binding.clear_texture("env");
    assert_eq!(binding.cubemap("env"), Some(&c));

    binding.clear_cubemap("env");
    assert_eq!(binding.cubemap("env"), None);
  }

  #[test]
  fn params_store_factory_output() {
    let mut binding = binding();

    binding.add_param(ParamType::Color, "tint", "1 0 0 1");
    binding.add_param(ParamType::Unknown, "mystery", "42");
    binding.add_param(ParamType::Vector2, "offset", "1");

    let tint = binding.param("tint").unwrap();
    assert_eq!(tint.ty(), ParamType::Color);
    assert_eq!(tint.default_value(), Some(&ParamValue::Color([1., 0., 0., 1.])));
    assert_eq!(tint.min(), None);

    assert_eq!(binding.param("mystery").unwrap().default_value(), None);
    assert_eq!(
      binding.param("offset").unwrap().default_value(),
      Some(&ParamValue::Vector2([0., 0.]))
    );

    binding.clear_param("tint");
    assert!(binding.param("tint").is_none());
    assert_eq!(binding.params().len(), 2);
  }
}
