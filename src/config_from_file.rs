//! Supports reading the derivation configuration from YAML file (optional)

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::derivation_config::DerivationConfig;
use crate::kinematics_error::KinematicsError;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Symbols {
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub link1_length: Option<String>,
    #[serde(default)]
    pub link1_com_offset: Option<String>,
    #[serde(default)]
    pub link2_com_offset: Option<String>,
    #[serde(default)]
    pub shoulder_quaternion: Option<Vec<String>>,
    #[serde(default)]
    pub elbow_pitch: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Root {
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub symbols: Option<Symbols>,
}

impl DerivationConfig {
    /// Read the derivation configuration from YAML file. YAML file like this is supported:
    /// ```yaml
    /// output: center_of_mass_positions.txt
    /// symbols:
    ///   time: t
    ///   link1_length: l1
    ///   link1_com_offset: lg1
    ///   link2_com_offset: lg2
    ///   shoulder_quaternion: [q1w, q1x, q1y, q1z]
    ///   elbow_pitch: theta2
    /// ```
    /// Every key is optional, missing values take defaults. Unknown keys are rejected so
    /// that a misspelled name does not silently fall back to the default.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, KinematicsError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, KinematicsError> {
        let mut config = DerivationConfig::default();
        if contents.trim().is_empty() {
            return Ok(config);
        }
        // Null document (only comments or `~`) also means all defaults
        let root: Option<Root> = serde_saphyr::from_str(contents)
            .map_err(|e| KinematicsError::ParseError(format!("{}", e)))?;
        let Some(root) = root else {
            return Ok(config);
        };

        if let Some(output) = root.output {
            config.output = output;
        }
        if let Some(symbols) = root.symbols {
            let names = &mut config.names;
            if let Some(name) = symbols.time {
                names.time = name;
            }
            if let Some(name) = symbols.link1_length {
                names.link1_length = name;
            }
            if let Some(name) = symbols.link1_com_offset {
                names.link1_com_offset = name;
            }
            if let Some(name) = symbols.link2_com_offset {
                names.link2_com_offset = name;
            }
            if let Some(components) = symbols.shoulder_quaternion {
                names.shoulder_quaternion = components;
            }
            if let Some(name) = symbols.elbow_pitch {
                names.elbow_pitch = name;
            }
        }

        config.names.validate()?;
        Ok(config)
    }
}
