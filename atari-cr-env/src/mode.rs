//! Interpretation of sensory actions.
use atari_cr_core::error::CrError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// How the sensory action of a foveal environment moves the fovea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum SensoryActionMode {
    /// The sensory action is the new location of the fovea.
    Absolute,

    /// The sensory action is a displacement of the fovea from its current location.
    Relative,
}

impl SensoryActionMode {
    /// Parses a mode, ignoring case.
    ///
    /// Only `"absolute"` and `"relative"` are accepted. The input is not trimmed.
    pub fn from_string(s: &str) -> Result<Self, CrError> {
        match s.to_lowercase().as_str() {
            "absolute" => Ok(Self::Absolute),
            "relative" => Ok(Self::Relative),
            _ => Err(CrError::InvalidConfiguration(format!(
                "Invalid sensory action mode: {:?}",
                s
            ))),
        }
    }

    /// Canonical name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Absolute => "absolute",
            Self::Relative => "relative",
        }
    }
}

impl fmt::Display for SensoryActionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensoryActionMode {
    type Err = CrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for SensoryActionMode {
    type Error = CrError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_string(&s)
    }
}

impl From<SensoryActionMode> for String {
    fn from(mode: SensoryActionMode) -> Self {
        mode.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ignores_case_and_renders_lowercase() {
        for s in ["absolute", "ABSOLUTE", "Absolute", "aBsOlUtE"] {
            let mode = SensoryActionMode::from_string(s).unwrap();
            assert_eq!(mode, SensoryActionMode::Absolute);
            assert_eq!(mode.to_string(), s.to_lowercase());
        }
        for s in ["relative", "RELATIVE", "Relative"] {
            let mode: SensoryActionMode = s.parse().unwrap();
            assert_eq!(mode, SensoryActionMode::Relative);
            assert_eq!(mode.to_string(), s.to_lowercase());
        }
    }

    #[test]
    fn test_round_trip() {
        for mode in [SensoryActionMode::Absolute, SensoryActionMode::Relative] {
            assert_eq!(SensoryActionMode::from_string(&mode.to_string()), Ok(mode));
        }
    }

    #[test]
    fn test_rejects_unknown_modes() {
        for s in ["", "ABS", "1", "relatives", " absolute", "absolute ", "\t"] {
            match SensoryActionMode::from_string(s) {
                Err(CrError::InvalidConfiguration(_)) => {}
                other => panic!("{:?} was not rejected: {:?}", s, other),
            }
        }
    }

    #[test]
    fn test_serde_uses_canonical_names() {
        let yaml = serde_yaml::to_string(&SensoryActionMode::Relative).unwrap();
        assert!(yaml.contains("relative"));
        let mode: SensoryActionMode = serde_yaml::from_str("Absolute").unwrap();
        assert_eq!(mode, SensoryActionMode::Absolute);
        assert!(serde_yaml::from_str::<SensoryActionMode>("abs").is_err());
    }
}
