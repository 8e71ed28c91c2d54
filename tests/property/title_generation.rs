//! Property-based tests for sanitization and status guarantees

use autotitle::sanitize::{sanitize_title, MAX_TITLE_LENGTH};
use autotitle::{
    BundleConfig, ConfiguredBundles, EntityRecord, ProcessingContext, TitleGenerator,
    TitleStatus,
};
use proptest::prelude::*;
use std::sync::Arc;

fn engine_with(status: TitleStatus, pattern: &str) -> TitleGenerator {
    let bundles =
        ConfiguredBundles::new().with("node", "article", BundleConfig::new(status, pattern));
    TitleGenerator::builder(Arc::new(bundles)).build()
}

/// Sanitized titles never exceed the limit and never carry control characters.
#[test]
fn test_sanitized_title_bounded_and_clean() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&any::<String>(), |input| {
            let (title, truncated) = sanitize_title(&input);
            prop_assert!(title.chars().count() <= MAX_TITLE_LENGTH);
            prop_assert!(!title
                .chars()
                .any(|c| matches!(c, '\t' | '\n' | '\r' | '\0' | '\x0B')));
            if !truncated {
                prop_assert!(input.chars().count() >= title.chars().count());
            }
            Ok(())
        })
        .unwrap();
}

/// Sanitizing is idempotent on already clean, short text.
#[test]
fn test_plain_text_passes_through() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&"[a-zA-Z0-9 .,:-]{0,255}", |input| {
            let (title, truncated) = sanitize_title(&input);
            prop_assert_eq!(title, input);
            prop_assert!(!truncated);
            Ok(())
        })
        .unwrap();
}

/// Disabled bundles never need generation, whatever the title.
#[test]
fn test_disabled_never_needs_generation() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let engine = engine_with(TitleStatus::Disabled, "[node:id]");
    let ctx = ProcessingContext::new();

    runner
        .run(&(any::<u64>(), ".{0,40}"), |(id, title)| {
            let record = EntityRecord::new("node", "article")
                .with_id(id)
                .with_title(title);
            prop_assert!(!engine.needs_generation(&ctx, &record).unwrap());
            Ok(())
        })
        .unwrap();
}

/// Optional bundles need generation exactly when the title is empty.
#[test]
fn test_optional_needs_generation_iff_empty() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let engine = engine_with(TitleStatus::Optional, "[node:id]");
    let ctx = ProcessingContext::new();

    runner
        .run(&".{0,20}", |title| {
            let record = EntityRecord::new("node", "article").with_title(title.clone());
            prop_assert_eq!(
                engine.needs_generation(&ctx, &record).unwrap(),
                title.is_empty()
            );
            Ok(())
        })
        .unwrap();
}

/// Enabled bundles generate once per pass and the stored title is always bounded.
#[test]
fn test_enabled_generates_once_with_bounded_title() {
    let mut runner = proptest::test_runner::TestRunner::default();
    let engine = engine_with(TitleStatus::Enabled, "[node:body]");

    runner
        .run(&any::<String>(), |body| {
            let mut ctx = ProcessingContext::new();
            let mut record = EntityRecord::new("node", "article").with_field("body", body);

            prop_assert!(engine.needs_generation(&ctx, &record).unwrap());
            engine.generate(&mut ctx, &mut record).unwrap();
            prop_assert!(record.title.chars().count() <= MAX_TITLE_LENGTH);
            prop_assert!(!engine.needs_generation(&ctx, &record).unwrap());
            Ok(())
        })
        .unwrap();
}
