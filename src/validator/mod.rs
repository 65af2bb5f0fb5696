//! Structural checks over an exported document.
//!
//! Every check runs independently and reports into a shared list; nothing stops
//! at the first finding. Only a document that is not a mapping at all makes
//! [`validate`] fail.

mod info;
mod paths;
mod security;
mod servers;

use crate::error::EditorError;
use crate::types::json_path::JsonPath;
use crate::types::serde_get_type;
use crate::validator::info::{InfoCheck, VersionCheck};
use crate::validator::paths::PathsCheck;
use crate::validator::security::{GlobalSecurityCheck, SecuritySchemesCheck};
use crate::validator::servers::ServersCheck;
use serde::Serialize;
use serde_json::{Map, Value};

/// One finding: where it is and what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// JSON pointer into the validated document.
    pub pointer: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    /// Findings located at or below `pointer`.
    pub fn violations_at<'a>(
        &'a self,
        pointer: &'a str,
    ) -> impl Iterator<Item = &'a Violation> {
        self.violations
            .iter()
            .filter(move |violation| violation.pointer.starts_with(pointer))
    }
}

#[derive(Default)]
pub(crate) struct Violations(Vec<Violation>);

impl Violations {
    pub(crate) fn push(&mut self, path: &JsonPath, message: impl Into<String>) {
        self.0.push(Violation {
            pointer: path.format_path(),
            message: message.into(),
        });
    }
}

/// A single rule family applied to the whole document.
pub(crate) trait Check {
    fn check(&self, document: &Map<String, Value>, violations: &mut Violations);
}

const CHECKS: [&dyn Check; 6] = [
    &VersionCheck,
    &InfoCheck,
    &PathsCheck,
    &ServersCheck,
    &SecuritySchemesCheck,
    &GlobalSecurityCheck,
];

/// Runs every check against `document`.
///
/// The document is never modified. Findings are data, so a document full of
/// problems still yields `Ok`.
pub fn validate(document: &Value) -> Result<ValidationReport, EditorError> {
    let Some(document) = document.as_object() else {
        return Err(EditorError::unparseable(&format!(
            "expected an object, found {}",
            serde_get_type(document)
        )));
    };

    let mut violations = Violations::default();
    for check in CHECKS {
        check.check(document, &mut violations);
    }

    let violations = violations.0;
    log::debug!("Validation produced {} violation(s)", violations.len());
    Ok(ValidationReport {
        valid: violations.is_empty(),
        violations,
    })
}
