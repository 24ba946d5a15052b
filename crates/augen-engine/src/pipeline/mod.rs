//! Incremental orchestrator.
//!
//! Wires scan → build → plan → emit into a cached pipeline. Cache keys are
//! the structural value of each stage's output, never object identity:
//! candidate fingerprints key descriptor resolution, descriptor
//! fingerprints key planning + emission. Independent candidates run
//! concurrently; a union's parent/child ordering is enforced purely by the
//! resolver's data dependency.

mod cache;
mod cancel;

pub use cache::OnceCache;
pub use cancel::CancelToken;

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error as ThisError;

use crate::{
    build::{SymbolTable, TypeResolver, build_descriptor},
    emit::{SourceFragment, emit_descriptor},
    prelude::*,
    scan::{Candidate, scan_unit},
};

///
/// PipelineError
///

#[derive(Debug, ThisError)]
pub enum PipelineError {
    #[error("unparsable compilation unit: {0}")]
    Parse(#[from] syn::Error),

    #[error("synthesis cancelled")]
    Cancelled,
}

///
/// UnitOutput
///
/// Fragments for every successful declaration plus the diagnostics of the
/// failed ones. Failure is isolated per descriptor; one bad declaration
/// never blocks its unit.
///

#[derive(Clone, Debug, Default)]
pub struct UnitOutput {
    pub fragments: Vec<Arc<SourceFragment>>,
    pub diagnostics: Diagnostics,
}

type DescriptorStage = Result<Arc<TypeDescriptor>, Diagnostics>;
type EmitStage = Result<Arc<SourceFragment>, Diagnostics>;

///
/// Pipeline
///

#[derive(Default)]
pub struct Pipeline {
    descriptors: OnceCache<Fingerprint, DescriptorStage>,
    outputs: OnceCache<Fingerprint, EmitStage>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor resolutions actually computed (cache misses).
    #[must_use]
    pub fn descriptor_computations(&self) -> u64 {
        self.descriptors.computations()
    }

    /// Plan + emission runs actually computed (cache misses).
    #[must_use]
    pub fn emit_computations(&self) -> u64 {
        self.outputs.computations()
    }

    /// Synthesize a whole compilation unit.
    pub fn synthesize_unit(
        &self,
        source: &str,
        cancel: &CancelToken,
    ) -> Result<UnitOutput, PipelineError> {
        let file = syn::parse_file(source)?;

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let symbols = SymbolTable::from_file(&file);
        let candidates = scan_unit(&file);
        let by_path: BTreeMap<String, Candidate> = candidates
            .iter()
            .map(|candidate| (candidate.path(), candidate.clone()))
            .collect();

        // Each candidate's chain is stateless and independent; fan out and
        // reassemble in declaration order so output stays deterministic.
        let mut stages: Vec<Option<EmitStage>> = Vec::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = candidates
                .iter()
                .map(|candidate| {
                    let symbols = &symbols;
                    let by_path = &by_path;
                    scope.spawn(move || self.synthesize_candidate(candidate, symbols, by_path, cancel))
                })
                .collect();

            stages = handles
                .into_iter()
                .map(|handle| handle.join().expect("candidate worker panicked"))
                .collect();
        });

        if cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }

        let mut output = UnitOutput::default();
        for stage in stages.into_iter().flatten() {
            match stage {
                Ok(fragment) => output.fragments.push(fragment),
                Err(diags) => output.diagnostics.merge(diags),
            }
        }

        Ok(output)
    }

    /// One candidate's scan → build → plan → emit chain, cached at both
    /// structural boundaries. Returns `None` when cancelled mid-chain.
    fn synthesize_candidate(
        &self,
        candidate: &Candidate,
        symbols: &SymbolTable,
        by_path: &BTreeMap<String, Candidate>,
        cancel: &CancelToken,
    ) -> Option<EmitStage> {
        if cancel.is_cancelled() {
            return None;
        }

        let descriptor_stage = self.descriptors.get_or_init(&candidate.fingerprint, || {
            let mut resolver = TypeResolver::new(symbols, by_path);
            build_descriptor(candidate, &mut resolver).map(Arc::new)
        });

        if cancel.is_cancelled() {
            return None;
        }

        let descriptor = match descriptor_stage {
            Ok(descriptor) => descriptor,
            Err(diags) => return Some(Err(diags)),
        };

        let fingerprint = descriptor.fingerprint();
        let stage = self.outputs.get_or_init(&fingerprint, || {
            let planned = crate::plan::plan(&descriptor)?;

            match emit_descriptor(&planned, &descriptor) {
                Ok(tokens) => Ok(Arc::new(SourceFragment {
                    path: descriptor.path(),
                    fingerprint,
                    tokens,
                })),
                Err(emit_err) => {
                    let mut diags = Diagnostics::new();
                    diags.add(emit_err.into_diagnostic());
                    Err(diags)
                }
            }
        });

        Some(stage)
    }
}
