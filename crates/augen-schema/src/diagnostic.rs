use proc_macro2::TokenStream;
use quote::quote;
use serde::Serialize;
use std::fmt;

///
/// DiagnosticId
///
/// Stable identifiers for every synthesis-time failure. Codes are part of
/// the public surface: tests and downstream tooling match on them, so a
/// variant's code never changes once released.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[remain::sorted]
pub enum DiagnosticId {
    AmbiguousKeyMember,
    ConflictingFlags,
    DuplicateDiscriminator,
    DuplicateEnumKey,
    DuplicateMember,
    EmptyMemberList,
    InvalidIdent,
    MarkerArgs,
    MissingInvalidItem,
    NonConcreteVariant,
    PlanMismatch,
    RecursiveDescriptor,
    UnionTooDeep,
    UnknownMemberType,
    UnsupportedEnumKey,
    UnsupportedOperator,
    UnsupportedSkeleton,
}

impl DiagnosticId {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnsupportedSkeleton => "AUG001",
            Self::MarkerArgs => "AUG002",
            Self::InvalidIdent => "AUG003",
            Self::DuplicateMember => "AUG004",
            Self::EmptyMemberList => "AUG005",
            Self::AmbiguousKeyMember => "AUG006",
            Self::UnknownMemberType => "AUG007",
            Self::UnsupportedOperator => "AUG008",
            Self::ConflictingFlags => "AUG009",
            Self::DuplicateEnumKey => "AUG010",
            Self::UnsupportedEnumKey => "AUG011",
            Self::MissingInvalidItem => "AUG012",
            Self::DuplicateDiscriminator => "AUG013",
            Self::NonConcreteVariant => "AUG014",
            Self::UnionTooDeep => "AUG015",
            Self::RecursiveDescriptor => "AUG016",
            Self::PlanMismatch => "AUG017",
        }
    }
}

///
/// Severity
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

///
/// Diagnostic
///
/// One structured synthesis-time failure. Never thrown; collected and
/// surfaced at analysis time.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Diagnostic {
    pub id: DiagnosticId,
    pub severity: Severity,
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    pub fn error(id: DiagnosticId, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            severity: Severity::Error,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn warning(id: DiagnosticId, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id,
            severity: Severity::Warning,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.id.code(), self.message, self.path)
    }
}

///
/// Diagnostics
///
/// Aggregate of diagnostics for one declaration. Failure is isolated per
/// descriptor: a non-empty aggregate aborts synthesis for that declaration
/// only.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn error(&mut self, id: DiagnosticId, path: impl Into<String>, message: impl Into<String>) {
        self.add(Diagnostic::error(id, path, message));
    }

    pub fn merge(&mut self, other: Self) {
        self.items.extend(other.items);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Consume the aggregate, succeeding only when no errors were recorded.
    pub fn result(self) -> Result<(), Self> {
        if self.has_errors() { Err(self) } else { Ok(()) }
    }

    /// Render every diagnostic as a `compile_error!` invocation so a macro
    /// front end can surface the whole aggregate at once.
    #[must_use]
    pub fn to_compile_errors(&self) -> TokenStream {
        let errors = self.items.iter().map(|d| {
            let text = d.to_string();
            quote!(::core::compile_error!(#text);)
        });

        quote!(#(#errors)*)
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{item}")?;
        }

        Ok(())
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_stable() {
        let ids = [
            DiagnosticId::UnsupportedSkeleton,
            DiagnosticId::MarkerArgs,
            DiagnosticId::InvalidIdent,
            DiagnosticId::DuplicateMember,
            DiagnosticId::EmptyMemberList,
            DiagnosticId::AmbiguousKeyMember,
            DiagnosticId::UnknownMemberType,
            DiagnosticId::UnsupportedOperator,
            DiagnosticId::ConflictingFlags,
            DiagnosticId::DuplicateEnumKey,
            DiagnosticId::UnsupportedEnumKey,
            DiagnosticId::MissingInvalidItem,
            DiagnosticId::DuplicateDiscriminator,
            DiagnosticId::NonConcreteVariant,
            DiagnosticId::UnionTooDeep,
            DiagnosticId::RecursiveDescriptor,
            DiagnosticId::PlanMismatch,
        ];

        let mut codes: Vec<&str> = ids.iter().map(|id| id.code()).collect();
        codes.sort_unstable();
        codes.dedup();

        assert_eq!(codes.len(), ids.len());
        assert_eq!(DiagnosticId::MarkerArgs.code(), "AUG002");
    }

    #[test]
    fn warnings_do_not_fail_the_aggregate() {
        let mut diags = Diagnostics::new();
        diags.add(Diagnostic::warning(
            DiagnosticId::ConflictingFlags,
            "demo::Amount",
            "redundant flag",
        ));

        assert!(!diags.has_errors());
        assert!(diags.result().is_ok());
    }

    #[test]
    fn errors_fail_the_aggregate() {
        let mut diags = Diagnostics::new();
        diags.error(DiagnosticId::DuplicateMember, "demo::Range", "duplicate 'lower'");

        assert!(diags.has_errors());
        assert!(diags.result().is_err());
    }
}
