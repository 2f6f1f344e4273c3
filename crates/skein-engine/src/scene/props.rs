use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::coords::Vec2;
use crate::path::PathData;

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f32),
    Bool(bool),
    Str(String),
    Point(Vec2),
    Numbers(Vec<f32>),
    Strings(Vec<String>),
    /// Caller-owned path geometry; renderers only borrow it.
    Path(Arc<PathData>),
}

impl PropValue {
    pub fn kind(&self) -> &'static str {
        match self {
            PropValue::Number(_) => "number",
            PropValue::Bool(_) => "bool",
            PropValue::Str(_) => "string",
            PropValue::Point(_) => "point",
            PropValue::Numbers(_) => "number list",
            PropValue::Strings(_) => "string list",
            PropValue::Path(_) => "path",
        }
    }
}

impl From<f32> for PropValue {
    fn from(v: f32) -> Self {
        PropValue::Number(v)
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        PropValue::Number(v as f32)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        PropValue::Number(v as f32)
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        PropValue::Bool(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        PropValue::Str(v.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        PropValue::Str(v)
    }
}

impl From<Vec2> for PropValue {
    fn from(v: Vec2) -> Self {
        PropValue::Point(v)
    }
}

impl From<Vec<f32>> for PropValue {
    fn from(v: Vec<f32>) -> Self {
        PropValue::Numbers(v)
    }
}

impl<const N: usize> From<[f32; N]> for PropValue {
    fn from(v: [f32; N]) -> Self {
        PropValue::Numbers(v.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for PropValue {
    fn from(v: [f64; N]) -> Self {
        PropValue::Numbers(v.iter().map(|n| *n as f32).collect())
    }
}

impl From<Vec<String>> for PropValue {
    fn from(v: Vec<String>) -> Self {
        PropValue::Strings(v)
    }
}

impl From<Vec<&str>> for PropValue {
    fn from(v: Vec<&str>) -> Self {
        PropValue::Strings(v.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PropValue {
    fn from(v: [&str; N]) -> Self {
        PropValue::Strings(v.iter().map(|s| (*s).to_owned()).collect())
    }
}

impl From<Arc<PathData>> for PropValue {
    fn from(v: Arc<PathData>) -> Self {
        PropValue::Path(v)
    }
}

impl From<PathData> for PropValue {
    fn from(v: PathData) -> Self {
        PropValue::Path(Arc::new(v))
    }
}

/// What is wrong with a property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropErrorKind {
    Missing,
    WrongType { expected: &'static str, found: &'static str },
}

impl fmt::Display for PropErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropErrorKind::Missing => f.write_str("is required"),
            PropErrorKind::WrongType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
        }
    }
}

/// Missing or mistyped property on a tagged node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("<{tag}> prop `{key}` {kind}")]
pub struct PropError {
    pub tag: String,
    pub key: String,
    pub kind: PropErrorKind,
}

/// Ordered property bag of a scene node.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: BTreeMap<String, PropValue>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.set(key, value);
        self
    }

    #[inline]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.values.get(key)
    }

    #[inline]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Typed view used by renderers; errors carry `tag`.
    #[inline]
    pub fn reader<'a>(&'a self, tag: &'a str) -> PropReader<'a> {
        PropReader { tag, props: self }
    }
}

/// Typed, tag-aware accessors over [`Props`].
///
/// `*_or` accessors treat a missing key as the default, but a present key of
/// the wrong type is still an error.
#[derive(Debug, Copy, Clone)]
pub struct PropReader<'a> {
    tag: &'a str,
    props: &'a Props,
}

impl<'a> PropReader<'a> {
    fn error(&self, key: &str, kind: PropErrorKind) -> PropError {
        PropError {
            tag: self.tag.to_owned(),
            key: key.to_owned(),
            kind,
        }
    }

    fn wrong(&self, key: &str, expected: &'static str, found: &PropValue) -> PropError {
        self.error(key, PropErrorKind::WrongType { expected, found: found.kind() })
    }

    pub fn number(&self, key: &str) -> Result<f32, PropError> {
        self.opt_number(key)?
            .ok_or_else(|| self.error(key, PropErrorKind::Missing))
    }

    pub fn opt_number(&self, key: &str) -> Result<Option<f32>, PropError> {
        match self.props.get(key) {
            None => Ok(None),
            Some(PropValue::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(self.wrong(key, "number", other)),
        }
    }

    pub fn number_or(&self, key: &str, default: f32) -> Result<f32, PropError> {
        Ok(self.opt_number(key)?.unwrap_or(default))
    }

    pub fn str(&self, key: &str) -> Result<&'a str, PropError> {
        self.opt_str(key)?
            .ok_or_else(|| self.error(key, PropErrorKind::Missing))
    }

    pub fn opt_str(&self, key: &str) -> Result<Option<&'a str>, PropError> {
        match self.props.get(key) {
            None => Ok(None),
            Some(PropValue::Str(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(self.wrong(key, "string", other)),
        }
    }

    pub fn str_or(&self, key: &str, default: &'a str) -> Result<&'a str, PropError> {
        Ok(self.opt_str(key)?.unwrap_or(default))
    }

    pub fn point(&self, key: &str) -> Result<Vec2, PropError> {
        match self.props.get(key) {
            None => Err(self.error(key, PropErrorKind::Missing)),
            Some(PropValue::Point(p)) => Ok(*p),
            Some(PropValue::Numbers(v)) if v.len() == 2 => Ok(Vec2::new(v[0], v[1])),
            Some(other) => Err(self.wrong(key, "point", other)),
        }
    }

    pub fn opt_numbers(&self, key: &str) -> Result<Option<&'a [f32]>, PropError> {
        match self.props.get(key) {
            None => Ok(None),
            Some(PropValue::Numbers(v)) => Ok(Some(v.as_slice())),
            Some(other) => Err(self.wrong(key, "number list", other)),
        }
    }

    pub fn numbers(&self, key: &str) -> Result<&'a [f32], PropError> {
        self.opt_numbers(key)?
            .ok_or_else(|| self.error(key, PropErrorKind::Missing))
    }

    pub fn strings(&self, key: &str) -> Result<&'a [String], PropError> {
        match self.props.get(key) {
            None => Err(self.error(key, PropErrorKind::Missing)),
            Some(PropValue::Strings(v)) => Ok(v.as_slice()),
            Some(other) => Err(self.wrong(key, "string list", other)),
        }
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, PropError> {
        match self.props.get(key) {
            None => Ok(default),
            Some(PropValue::Bool(b)) => Ok(*b),
            Some(other) => Err(self.wrong(key, "bool", other)),
        }
    }

    /// Raw access for props with more than one accepted shape (e.g. `path`).
    #[inline]
    pub fn raw(&self, key: &str) -> Option<&'a PropValue> {
        self.props.get(key)
    }

    pub fn missing(&self, key: &str) -> PropError {
        self.error(key, PropErrorKind::Missing)
    }

    pub fn mistyped(&self, key: &str, expected: &'static str, found: &PropValue) -> PropError {
        self.wrong(key, expected, found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> Props {
        Props::new()
            .with("x", 10.0)
            .with("color", "#ff0000")
            .with("start", Vec2::new(1.0, 2.0))
            .with("pair", [3.0, 4.0])
            .with("colors", ["red", "blue"])
    }

    #[test]
    fn typed_reads() {
        let p = props();
        let r = p.reader("rect");
        assert_eq!(r.number("x"), Ok(10.0));
        assert_eq!(r.str("color"), Ok("#ff0000"));
        assert_eq!(r.point("start"), Ok(Vec2::new(1.0, 2.0)));
        assert_eq!(r.point("pair"), Ok(Vec2::new(3.0, 4.0)));
        assert_eq!(r.strings("colors").map(|c| c.len()), Ok(2));
    }

    #[test]
    fn defaults_apply_only_when_missing() {
        let p = props();
        let r = p.reader("rect");
        assert_eq!(r.number_or("opacity", 1.0), Ok(1.0));
        assert_eq!(r.str_or("style", "fill"), Ok("fill"));

        let err = r.number_or("color", 1.0).unwrap_err();
        assert_eq!(
            err.kind,
            PropErrorKind::WrongType { expected: "number", found: "string" }
        );
    }

    #[test]
    fn missing_required_prop_names_tag_and_key() {
        let p = Props::new();
        let err = p.reader("circle").number("r").unwrap_err();
        assert_eq!(err.tag, "circle");
        assert_eq!(err.key, "r");
        assert_eq!(err.to_string(), "<circle> prop `r` is required");
    }
}
