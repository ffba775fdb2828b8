//! Non-fatal diagnostics.
//!
//! The documentation is known to contain inconsistencies; each one degrades to
//! a best-effort declaration and is reported here (and logged) instead of
//! aborting the run.

use std::fmt;

use tracing::{debug, warn};

/// A recoverable documentation problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A type name is neither builtin nor documented; `any` was used.
    UnresolvedType { name: String, source_type: String },
    /// A parent class is not documented; the `extends` clause was omitted.
    UnresolvedParent { class: String, parent: String },
    /// The parent link closed an inheritance cycle and was cleared; the
    /// `extends` clause was omitted.
    InheritanceCycle { class: String, parent: String },
    /// Enumerations are backed by each other in a loop; `any` was used.
    /// `chain` starts and ends with the same enumeration.
    EnumCycle { chain: Vec<String> },
    /// A parameter name is documented twice; the second one was dropped.
    DuplicateParameter {
        class: String,
        member: String,
        param: String,
    },
    /// A property shares its name with a method; the property was dropped.
    PropertyShadowedByMethod { class: String, member: String },
    /// A config shares its name with a property or method; only the latter was emitted.
    ConfigShadowed { class: String, member: String },
    /// The same member is documented twice; the repeat was dropped.
    DuplicateMember {
        class: String,
        member: String,
        kind: &'static str,
    },
}

impl Diagnostic {
    /// Log the diagnostic at the appropriate level.
    pub fn log(&self) {
        match self {
            Diagnostic::ConfigShadowed { .. } => debug!("{self}"),
            _ => warn!("{self}"),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedType { name, source_type } => write!(
                f,
                "unable to find class, using \"any\" instead: \"{name}\" (documented type \"{source_type}\")"
            ),
            Diagnostic::UnresolvedParent { class, parent } => write!(
                f,
                "unable to find parent class \"{parent}\" of {class}, omitting extends clause"
            ),
            Diagnostic::InheritanceCycle { class, parent } => write!(
                f,
                "parent class \"{parent}\" of {class} closes an inheritance cycle, omitting extends clause"
            ),
            Diagnostic::EnumCycle { chain } => write!(
                f,
                "enum backing types form a cycle, using \"any\" instead: {}",
                chain.join(" -> ")
            ),
            Diagnostic::DuplicateParameter {
                class,
                member,
                param,
            } => write!(f, "skipping duplicate parameter {class}.{member}#{param}"),
            Diagnostic::PropertyShadowedByMethod { class, member } => write!(
                f,
                "omitting property that also exists as a method: {class}.{member}"
            ),
            Diagnostic::ConfigShadowed { class, member } => write!(
                f,
                "config {class}.{member} is declared through its property or method instead"
            ),
            Diagnostic::DuplicateMember {
                class,
                member,
                kind,
            } => write!(f, "skipping duplicate {kind} {class}.{member}"),
        }
    }
}
