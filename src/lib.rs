//! Symbolic center of mass positions for a two-link arm.
//!
//! The arm has a shoulder joint with full orientation, given as a unit quaternion, and an
//! elbow joint that only pitches about the y axis. The crate derives closed form expressions
//! for the center of mass of each link in the base frame, with link geometry and joint
//! coordinates kept symbolic, and writes them into a text file for use in a dynamics model.
//!
//! # Features
//!
//! - Rotation matrix from the quaternion and pitch rotation matrix from the angle.
//! - Chaining of both rotations with the link lengths and center of mass offsets.
//! - All kinematics is written against the [`algebra::Algebra`] trait. The symbolic backend
//!   builds [`expression::Expr`] trees, the numeric backend computes `f64` values and
//!   serves for checking.
//! - Rendered expressions can be parsed back ([`expression_parser`]).
//! - Names of all symbols and the output file are configurable, optionally from YAML.
//!
//! # Example
//!
//! ```
//! use rs_com_kinematics::chain::derive_symbolic;
//! use rs_com_kinematics::derivation_config::SymbolNames;
//!
//! let positions = derive_symbolic(&SymbolNames::default()).unwrap();
//! assert!(positions.link1[0].depends_on("lg1"));
//! assert!(positions.link2[2].depends_on("theta2"));
//! ```
//!
//! The quaternion is never checked for unit length. The link 2 center of mass offset is
//! rotated by the elbow pitch alone (not by the composed shoulder and elbow rotation);
//! see [`chain`].

pub mod kinematics_error;
pub mod expression;
pub mod expression_parser;
pub mod algebra;
pub mod rotation;
pub mod chain;
pub mod derivation_config;
pub mod report;

#[cfg(feature = "allow_filesystem")]
pub mod config_from_file;

#[cfg(test)]
mod tests;
