//! Determinism and cache-correctness properties of the pipeline.

use augen_engine::pipeline::{CancelToken, Pipeline};
use proptest::prelude::*;

fn synthesize(source: &str) -> Vec<(String, String)> {
    let pipeline = Pipeline::new();
    let cancel = CancelToken::new();
    let output = pipeline
        .synthesize_unit(source, &cancel)
        .expect("unit parses");

    assert!(
        !output.diagnostics.has_errors(),
        "expected a clean unit: {}",
        output.diagnostics
    );

    output
        .fragments
        .iter()
        .map(|fragment| (fragment.path.clone(), fragment.text()))
        .collect()
}

fn keyed_source(key: &str, family: &str, ordering: &str) -> String {
    format!(
        r#"
        #[value_object(key = "{key}", arithmetic(mode = "{family}"), ordering = "{ordering}")]
        pub struct Sample({ty});
        "#,
        ty = match key {
            "decimal" => "Decimal",
            other => other,
        }
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    // For all descriptors D, synthesizing from D twice yields
    // byte-identical output.
    #[test]
    fn synthesis_is_deterministic(
        key in prop::sample::select(vec!["i8", "i16", "i32", "u16", "u64", "f64", "decimal"]),
        family in prop::sample::select(vec!["none", "default", "default_with_key_overloads"]),
        ordering in prop::sample::select(vec!["none", "default", "default_with_key_overloads"]),
    ) {
        let source = keyed_source(key, family, ordering);

        let first = synthesize(&source);
        let second = synthesize(&source);

        prop_assert_eq!(first, second);
    }

    // Structurally equal descriptors from distinct candidates share one
    // computation and one cached result.
    #[test]
    fn structural_twins_emit_once(
        key in prop::sample::select(vec!["i16", "u16", "i64", "decimal"]),
    ) {
        let ty = if key == "decimal" { "Decimal" } else { key };
        let source = format!(
            r#"
            mod first {{
                #[value_object(key = "{key}", arithmetic(mode = "default"))]
                pub struct Twin({ty});
            }}

            mod second {{
                #[value_object(key = "{key}", arithmetic(mode = "default"))]
                pub struct Twin({ty});
            }}
            "#
        );

        let pipeline = Pipeline::new();
        let cancel = CancelToken::new();
        let output = pipeline.synthesize_unit(&source, &cancel).expect("unit parses");

        prop_assert!(!output.diagnostics.has_errors());
        prop_assert_eq!(output.fragments.len(), 2);

        // Module paths differ, so the candidates (and descriptors) differ;
        // but re-running the identical unit must hit both caches.
        let before_desc = pipeline.descriptor_computations();
        let before_emit = pipeline.emit_computations();

        pipeline.synthesize_unit(&source, &cancel).expect("unit parses");

        prop_assert_eq!(pipeline.descriptor_computations(), before_desc);
        prop_assert_eq!(pipeline.emit_computations(), before_emit);
    }
}

#[test]
fn equal_descriptors_across_candidates_share_the_emit_cache() {
    // Same module path and shape in two runs through one pipeline: the
    // second run's descriptor is structurally identical, so planning and
    // emission must not run again even though the raw source differs.
    let pipeline = Pipeline::new();
    let cancel = CancelToken::new();

    let a = r#"
        #[value_object(key = "i64")]
        pub struct Amount(i64);
    "#;
    // An inert extra attribute changes the candidate's tokens (new
    // scanner fingerprint) without changing the resolved descriptor.
    let b = r#"
        #[value_object(key = "i64")]
        #[allow(dead_code)]
        pub struct Amount(i64);
    "#;

    pipeline.synthesize_unit(a, &cancel).expect("clean");
    let desc_after_a = pipeline.descriptor_computations();
    let emit_after_a = pipeline.emit_computations();

    pipeline.synthesize_unit(b, &cancel).expect("clean");

    assert_eq!(pipeline.descriptor_computations(), desc_after_a + 1);
    assert_eq!(
        pipeline.emit_computations(),
        emit_after_a,
        "structurally equal descriptors must share one emission"
    );
}
