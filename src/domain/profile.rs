//! Scan profile definitions

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A scan profile pairs a path pattern with the extractor that understands
/// the manifests it finds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Argo CD ApplicationSet manifests carrying addon chart coordinates
    ApplicationSet,
    /// Crossplane provider values files
    Crossplane,
}

impl Profile {
    /// Returns the default recursive glob for this profile
    pub fn default_pattern(&self) -> &'static str {
        match self {
            Profile::ApplicationSet => "**/*.yaml",
            Profile::Crossplane => "crossplane/**/values.yaml",
        }
    }

    /// Returns the top-level `kind` a document must declare, if any
    pub fn required_kind(&self) -> Option<&'static str> {
        match self {
            Profile::ApplicationSet => Some("ApplicationSet"),
            Profile::Crossplane => None,
        }
    }

    /// Returns the display name for this profile
    pub fn display_name(&self) -> &'static str {
        match self {
            Profile::ApplicationSet => "ApplicationSet",
            Profile::Crossplane => "Crossplane",
        }
    }

    /// Returns all profiles in the order they run
    pub fn all() -> &'static [Profile] {
        &[Profile::ApplicationSet, Profile::Crossplane]
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "applicationset" | "application-set" | "appset" => Ok(Profile::ApplicationSet),
            "crossplane" => Ok(Profile::Crossplane),
            _ => Err(ConfigError::InvalidProfile {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        assert_eq!(Profile::ApplicationSet.default_pattern(), "**/*.yaml");
        assert_eq!(
            Profile::Crossplane.default_pattern(),
            "crossplane/**/values.yaml"
        );
    }

    #[test]
    fn test_required_kind() {
        assert_eq!(
            Profile::ApplicationSet.required_kind(),
            Some("ApplicationSet")
        );
        assert_eq!(Profile::Crossplane.required_kind(), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            "applicationset".parse::<Profile>().unwrap(),
            Profile::ApplicationSet
        );
        assert_eq!("AppSet".parse::<Profile>().unwrap(), Profile::ApplicationSet);
        assert_eq!("crossplane".parse::<Profile>().unwrap(), Profile::Crossplane);
        assert!("helmfile".parse::<Profile>().is_err());
    }

    #[test]
    fn test_all_order() {
        assert_eq!(
            Profile::all(),
            &[Profile::ApplicationSet, Profile::Crossplane]
        );
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Profile::ApplicationSet).unwrap();
        assert_eq!(json, "\"applicationset\"");
    }
}
