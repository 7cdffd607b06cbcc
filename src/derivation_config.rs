//! Names of the symbols and the location of the output file

use std::collections::HashSet;
use std::path::PathBuf;

use crate::kinematics_error::KinematicsError;

/// Default location of the derived center of mass positions, relative to the working directory.
pub const DEFAULT_OUTPUT: &str = "center_of_mass_positions.txt";

/// Names under which the parameters and generalized coordinates appear in the derived
/// expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolNames {
    /// Time variable all generalized coordinates depend on.
    pub time: String,

    /// Length of link 1
    pub link1_length: String,

    /// Center of mass offset of link 1
    pub link1_com_offset: String,

    /// Center of mass offset of link 2
    pub link2_com_offset: String,

    /// Shoulder orientation quaternion components, in (w, x, y, z) order. Kept as a list
    /// as this is how it comes from the configuration file; the length is checked when
    /// the coordinates are declared.
    pub shoulder_quaternion: Vec<String>,

    /// Elbow pitch angle
    pub elbow_pitch: String,
}

impl Default for SymbolNames {
    fn default() -> Self {
        Self {
            time: "t".to_string(),
            link1_length: "l1".to_string(),
            link1_com_offset: "lg1".to_string(),
            link2_com_offset: "lg2".to_string(),
            shoulder_quaternion: ["q1w", "q1x", "q1y", "q1z"].iter().map(|s| s.to_string()).collect(),
            elbow_pitch: "theta2".to_string(),
        }
    }
}

impl SymbolNames {
    /// All names, in declaration order.
    pub fn all(&self) -> Vec<&str> {
        let mut names = vec![
            self.time.as_str(),
            self.link1_length.as_str(),
            self.link1_com_offset.as_str(),
            self.link2_com_offset.as_str(),
        ];
        names.extend(self.shoulder_quaternion.iter().map(|s| s.as_str()));
        names.push(self.elbow_pitch.as_str());
        names
    }

    /// Checks that the quaternion has four components, that every name is an identifier
    /// that would survive rendering and parsing back, and that no name is used twice.
    pub fn validate(&self) -> Result<(), KinematicsError> {
        if self.shoulder_quaternion.len() != 4 {
            return Err(KinematicsError::MalformedInput {
                expected: 4,
                found: self.shoulder_quaternion.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in self.all() {
            if !is_identifier(name) {
                return Err(KinematicsError::ConfigError(format!(
                    "'{}' is not a valid symbol name", name
                )));
            }
            if is_reserved(name) {
                return Err(KinematicsError::ConfigError(format!(
                    "'{}' is reserved and cannot be used as a symbol name", name
                )));
            }
            if !seen.insert(name) {
                return Err(KinematicsError::ConfigError(format!(
                    "symbol name '{}' is used more than once", name
                )));
            }
        }
        Ok(())
    }
}

/// Checks if the name starts with a letter or underscore and has only alphanumeric
/// characters or underscores after.
pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Function names of the expression syntax.
pub(crate) fn is_reserved(name: &str) -> bool {
    matches!(name, "sin" | "cos" | "Matrix")
}

/// Complete configuration of one derivation run.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivationConfig {
    /// Where the text report is written
    pub output: PathBuf,
    pub names: SymbolNames,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            names: SymbolNames::default(),
        }
    }
}
