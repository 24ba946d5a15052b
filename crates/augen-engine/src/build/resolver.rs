use std::{collections::BTreeMap, sync::Arc};

use crate::{build::symbols::SymbolTable, prelude::*, scan::Candidate};

///
/// ResolvePolicy
///
/// How unknown member types resolve. The whole-unit pipeline is strict; a
/// per-declaration front end that cannot see the surrounding unit assumes
/// unknown members are themselves synthesized and lets the host compiler
/// enforce the resulting trait obligations.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ResolvePolicy {
    #[default]
    Strict,
    AssumeSynthesized,
}

///
/// TypeResolver
///
/// Memoizing resolver for cross-descriptor references, keyed by type path.
/// A member whose type is itself a synthesis candidate resolves through
/// here, which gives union trees their parent-before-child ordering as a
/// plain data dependency. Self-referential configurations are rejected
/// with a diagnostic instead of looping.
///

pub struct TypeResolver<'a> {
    symbols: &'a SymbolTable,
    candidates: &'a BTreeMap<String, Candidate>,
    policy: ResolvePolicy,
    resolved: BTreeMap<String, Arc<TypeDescriptor>>,
    stack: Vec<String>,
}

impl<'a> TypeResolver<'a> {
    #[must_use]
    pub fn new(symbols: &'a SymbolTable, candidates: &'a BTreeMap<String, Candidate>) -> Self {
        Self::with_policy(symbols, candidates, ResolvePolicy::Strict)
    }

    #[must_use]
    pub fn with_policy(
        symbols: &'a SymbolTable,
        candidates: &'a BTreeMap<String, Candidate>,
        policy: ResolvePolicy,
    ) -> Self {
        Self {
            symbols,
            candidates,
            policy,
            resolved: BTreeMap::new(),
            stack: Vec::new(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> ResolvePolicy {
        self.policy
    }

    #[must_use]
    pub const fn symbols(&self) -> &'a SymbolTable {
        self.symbols
    }

    #[must_use]
    pub fn candidate(&self, path: &str) -> Option<&Candidate> {
        self.candidates.get(path)
    }

    /// Resolve a candidate path to its descriptor, memoized.
    pub fn resolve(&mut self, path: &str) -> Result<Arc<TypeDescriptor>, Diagnostics> {
        if let Some(found) = self.resolved.get(path) {
            return Ok(found.clone());
        }

        if self.stack.iter().any(|entry| entry == path) {
            let mut diags = Diagnostics::new();
            diags.error(
                DiagnosticId::RecursiveDescriptor,
                path,
                format!(
                    "descriptor cycle: {} -> {path}",
                    self.stack.join(" -> ")
                ),
            );
            return Err(diags);
        }

        let Some(candidate) = self.candidates.get(path).cloned() else {
            let mut diags = Diagnostics::new();
            diags.error(
                DiagnosticId::UnknownMemberType,
                path,
                format!("'{path}' is not a synthesis candidate"),
            );
            return Err(diags);
        };

        self.stack.push(path.to_string());
        let built = crate::build::build_descriptor(&candidate, self);
        self.stack.pop();

        let descriptor = Arc::new(built?);
        self.resolved.insert(path.to_string(), descriptor.clone());

        Ok(descriptor)
    }
}
