//! Backend-neutral path geometry.
//!
//! Paths reach the renderer either as SVG path strings (parsed per draw) or as
//! pre-built [`PathData`] shared through the scene props. Backends convert
//! `PathData` into their native path type.

mod data;
mod svg;

pub use data::{PathData, PathVerb};
pub use svg::PathParseError;
