//! Local shader parameters.
//!
//! Parameters are declared with a type tag and literal strings, the way material files spell
//! them: `Number` takes a single number, `Vector2` and `Vector3` take two and three
//! whitespace-separated numbers and `Color` takes four (RGBA).
//!
//! Parsing never fails. A number that doesn’t parse reads as `0`, and a vector or color with the
//! wrong number of components falls back to its neutral value (zero vector, opaque white).
//! Unknown type tags produce no value at all.

use log::warn;
use std::fmt;

/// Type tag of a local parameter.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParamType {
  /// Unrecognized type; carries no value.
  Unknown,
  /// A single scalar.
  Number,
  /// Two components.
  Vector2,
  /// Three components.
  Vector3,
  /// RGBA color.
  Color,
}

impl ParamType {
  /// Map a type name (`"Number"`, `"Vector2"`, `"Vector3"`, `"Color"`) to its tag.
  pub fn from_name(name: &str) -> Self {
    match name {
      "Number" => ParamType::Number,
      "Vector2" => ParamType::Vector2,
      "Vector3" => ParamType::Vector3,
      "Color" => ParamType::Color,
      _ => ParamType::Unknown,
    }
  }

  /// Type name of this tag.
  pub fn name(self) -> &'static str {
    match self {
      ParamType::Unknown => "Unknown",
      ParamType::Number => "Number",
      ParamType::Vector2 => "Vector2",
      ParamType::Vector3 => "Vector3",
      ParamType::Color => "Color",
    }
  }
}

impl<'a> From<&'a str> for ParamType {
  fn from(name: &'a str) -> Self {
    ParamType::from_name(name)
  }
}

impl fmt::Display for ParamType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.write_str(self.name())
  }
}

/// Value of a local parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
  /// A single scalar.
  Number(f32),
  /// Two components.
  Vector2([f32; 2]),
  /// Three components.
  Vector3([f32; 3]),
  /// RGBA color.
  Color([f32; 4]),
}

impl ParamValue {
  /// Parse a literal according to a type tag.
  ///
  /// Returns [`None`] only for [`ParamType::Unknown`].
  pub fn parse(ty: ParamType, literal: &str) -> Option<Self> {
    match ty {
      ParamType::Unknown => None,
      ParamType::Number => Some(ParamValue::Number(parse_number(literal))),
      ParamType::Vector2 => Some(ParamValue::Vector2(parse_components(ty, literal, [0.; 2]))),
      ParamType::Vector3 => Some(ParamValue::Vector3(parse_components(ty, literal, [0.; 3]))),
      ParamType::Color => Some(ParamValue::Color(parse_components(ty, literal, [1.; 4]))),
    }
  }

  /// Type tag of this value.
  pub fn ty(&self) -> ParamType {
    match *self {
      ParamValue::Number(_) => ParamType::Number,
      ParamValue::Vector2(_) => ParamType::Vector2,
      ParamValue::Vector3(_) => ParamType::Vector3,
      ParamValue::Color(_) => ParamType::Color,
    }
  }
}

/// Default, minimum and maximum values produced for a parameter declaration.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamData {
  /// Default value.
  pub default: Option<ParamValue>,
  /// Lower bound, only ever set for [`ParamType::Number`].
  pub min: Option<ParamValue>,
  /// Upper bound, only ever set for [`ParamType::Number`].
  pub max: Option<ParamValue>,
}

/// Turn a parameter declaration into owned values.
///
/// `min` and `max` are ignored for every type but [`ParamType::Number`], and are left unset when
/// given as empty literals.
pub fn create_param_data(ty: ParamType, value: &str, min: &str, max: &str) -> ParamData {
  let bound = |literal: &str| {
    if ty == ParamType::Number && !literal.trim().is_empty() {
      ParamValue::parse(ty, literal)
    } else {
      None
    }
  };

  ParamData {
    default: ParamValue::parse(ty, value),
    min: bound(min),
    max: bound(max),
  }
}

/// A named parameter stored in a [`Binding`].
///
/// [`Binding`]: crate::shader::binding::Binding
#[derive(Clone, Debug, PartialEq)]
pub struct LocalParam {
  name: String,
  ty: ParamType,
  data: ParamData,
}

impl LocalParam {
  /// Create a parameter out of already produced values.
  pub fn new(name: impl Into<String>, ty: ParamType, data: ParamData) -> Self {
    LocalParam {
      name: name.into(),
      ty,
      data,
    }
  }

  /// Name of the parameter.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Declared type tag.
  pub fn ty(&self) -> ParamType {
    self.ty
  }

  /// Default value, if the type tag produced one.
  pub fn default_value(&self) -> Option<&ParamValue> {
    self.data.default.as_ref()
  }

  /// Lower bound.
  pub fn min(&self) -> Option<&ParamValue> {
    self.data.min.as_ref()
  }

  /// Upper bound.
  pub fn max(&self) -> Option<&ParamValue> {
    self.data.max.as_ref()
  }

  /// All the values at once.
  pub fn data(&self) -> &ParamData {
    &self.data
  }
}

fn parse_number(literal: &str) -> f32 {
  literal.trim().parse().unwrap_or_else(|_| {
    warn!("cannot parse {:?} as a number, using 0", literal);
    0.
  })
}

fn parse_components<const N: usize>(ty: ParamType, literal: &str, fallback: [f32; N]) -> [f32; N] {
  let parts: Vec<&str> = literal.split_whitespace().collect();

  if parts.len() != N {
    warn!(
      "a {} must have {} values ({} provided)",
      ty,
      N,
      parts.len()
    );
    return fallback;
  }

  let mut components = [0.; N];
  for (component, part) in components.iter_mut().zip(parts) {
    *component = parse_number(part);
  }

  components
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn type_names() {
    assert_eq!(ParamType::from_name("Vector3"), ParamType::Vector3);
    assert_eq!(ParamType::from("Color"), ParamType::Color);
    assert_eq!(ParamType::from_name("vector3"), ParamType::Unknown);
    assert_eq!(ParamType::Number.to_string(), "Number");
  }

  #[test]
  fn parse_numbers() {
    assert_eq!(
      ParamValue::parse(ParamType::Number, " 0.25 "),
      Some(ParamValue::Number(0.25))
    );
    assert_eq!(
      ParamValue::parse(ParamType::Number, "shiny"),
      Some(ParamValue::Number(0.))
    );
  }

  #[test]
  fn parse_vectors() {
    assert_eq!(
      ParamValue::parse(ParamType::Vector2, "1 2"),
      Some(ParamValue::Vector2([1., 2.]))
    );
    assert_eq!(
      ParamValue::parse(ParamType::Vector3, "1\t2   3"),
      Some(ParamValue::Vector3([1., 2., 3.]))
    );
  }

  #[test]
  fn wrong_component_count_falls_back() {
    assert_eq!(
      ParamValue::parse(ParamType::Vector3, "1 2"),
      Some(ParamValue::Vector3([0.; 3]))
    );
    assert_eq!(
      ParamValue::parse(ParamType::Color, "0.5 0.5 0.5"),
      Some(ParamValue::Color([1.; 4]))
    );
  }

  #[test]
  fn unknown_type_has_no_value() {
    assert_eq!(ParamValue::parse(ParamType::Unknown, "1"), None);
    assert_eq!(
      create_param_data(ParamType::Unknown, "1", "0", "2"),
      ParamData::default()
    );
  }

  #[test]
  fn bounds_only_for_numbers() {
    let data = create_param_data(ParamType::Number, "0.5", "0", "1");
    assert_eq!(data.default, Some(ParamValue::Number(0.5)));
    assert_eq!(data.min, Some(ParamValue::Number(0.)));
    assert_eq!(data.max, Some(ParamValue::Number(1.)));

    let data = create_param_data(ParamType::Number, "0.5", "", "");
    assert_eq!(data.min, None);
    assert_eq!(data.max, None);

    let data = create_param_data(ParamType::Vector2, "1 1", "0 0", "2 2");
    assert_eq!(data.min, None);
    assert_eq!(data.max, None);
  }
}
