use jsonschema::Draft;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Format version family declared by a document's `openapi` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiVersion {
    V30x,
    V31x,
}

impl FromStr for OpenApiVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let in_family = |family: &str| {
            s.strip_prefix(family)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
        };
        if in_family("3.1") {
            Ok(OpenApiVersion::V31x)
        } else if in_family("3.0") {
            Ok(OpenApiVersion::V30x)
        } else {
            Err(VersionError::unsupported_version(s))
        }
    }
}

impl OpenApiVersion {
    /// JSON Schema dialect used by schema objects of this version.
    pub(crate) fn get_draft(&self) -> Draft {
        match self {
            OpenApiVersion::V30x => Draft::Draft4,
            OpenApiVersion::V31x => Draft::Draft202012,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, OpenApiVersion::V31x)
    }
}

#[derive(Debug)]
pub enum VersionError {
    UnsupportedVersion(String),
}

impl VersionError {
    pub(crate) fn unsupported_version<T>(version: &T) -> Self
    where
        T: ToString + ?Sized,
    {
        VersionError::UnsupportedVersion(version.to_string())
    }
}

impl Display for VersionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VersionError::UnsupportedVersion(version) => {
                write!(f, "Unsupported version: {}", version)
            }
        }
    }
}

impl std::error::Error for VersionError {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_version_families() {
        assert_eq!(OpenApiVersion::from_str("3.1.1").unwrap(), OpenApiVersion::V31x);
        assert_eq!(OpenApiVersion::from_str("3.0.3").unwrap(), OpenApiVersion::V30x);
        assert!(OpenApiVersion::from_str("2.0").is_err());
        assert_eq!(OpenApiVersion::from_str("3.1").unwrap(), OpenApiVersion::V31x);
    }

    #[test]
    fn test_minor_version_must_match_exactly() {
        assert!(OpenApiVersion::from_str("3.10.0").is_err());
        assert!(OpenApiVersion::from_str("3.15").is_err());
        assert!(OpenApiVersion::from_str("3.01.0").is_err());
    }

    #[test]
    fn test_only_31x_is_editable() {
        assert!(OpenApiVersion::V31x.is_editable());
        assert!(!OpenApiVersion::V30x.is_editable());
        assert!(matches!(
            OpenApiVersion::V31x.get_draft(),
            Draft::Draft202012
        ));
    }
}
