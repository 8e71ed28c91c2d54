//! End-to-end engine behavior over configured bundles

use autotitle::{
    AutoTitleConfig, BundleConfig, ConfigLoader, ConfiguredBundles, EntityRecord,
    EvaluationError, EvaluationFailurePolicy, FnEvaluator, ProcessingContext, TitleError,
    TitleGenerator, TitleRecord, TitleSource, TitleStatus,
};
use std::sync::Arc;

use super::test_utils::ARTICLE_CONFIG;

fn engine() -> TitleGenerator {
    let config: AutoTitleConfig = ConfigLoader::from_toml_str(ARTICLE_CONFIG).unwrap();
    TitleGenerator::from_config(&config)
}

#[test]
fn test_enabled_bundle_generated_once_per_pass() {
    let engine = engine();
    let mut ctx = ProcessingContext::new();
    let mut record = EntityRecord::new("node", "article").with_id(42u64);

    assert!(engine.needs_generation(&ctx, &record).unwrap());
    let generated = engine.generate(&mut ctx, &mut record).unwrap();
    assert_eq!(generated.title, "Article 42");
    assert_eq!(generated.source, TitleSource::Pattern);
    assert_eq!(record.title(), "Article 42");
    assert!(!engine.needs_generation(&ctx, &record).unwrap());

    let next_pass = ProcessingContext::new();
    assert!(engine.needs_generation(&next_pass, &record).unwrap());
}

#[test]
fn test_optional_bundle_respects_user_title() {
    let engine = engine();
    let ctx = ProcessingContext::new();

    let given = EntityRecord::new("node", "page").with_id(3u64).with_title("Mine");
    assert!(!engine.needs_generation(&ctx, &given).unwrap());

    let empty = EntityRecord::new("node", "page").with_id(3u64);
    assert!(engine.needs_generation(&ctx, &empty).unwrap());
}

#[test]
fn test_optional_bundle_without_pattern_uses_label() {
    let engine = engine();
    let mut ctx = ProcessingContext::new();

    let mut saved = EntityRecord::new("node", "page").with_id(7u64);
    let result = engine.process(&mut ctx, &mut saved).unwrap().unwrap();
    assert_eq!(result.title, "Basic page 7");
    assert_eq!(result.source, TitleSource::Fallback);

    let mut unsaved = EntityRecord::new("node", "page");
    engine.process(&mut ctx, &mut unsaved).unwrap();
    assert_eq!(unsaved.title, "Basic page");
}

#[test]
fn test_disabled_and_unconfigured_bundles_untouched() {
    let engine = engine();
    let mut ctx = ProcessingContext::new();

    let mut event = EntityRecord::new("node", "event").with_id(1u64);
    assert_eq!(engine.process(&mut ctx, &mut event).unwrap(), None);
    assert_eq!(event.title, "");

    let mut unknown = EntityRecord::new("taxonomy_term", "tags").with_id(1u64);
    assert_eq!(engine.status("taxonomy_term", "tags").unwrap(), TitleStatus::Disabled);
    assert_eq!(engine.process(&mut ctx, &mut unknown).unwrap(), None);
}

#[test]
fn test_pre_save_then_bulk_in_same_pass_generates_once() {
    let bundles = ConfiguredBundles::new().with(
        "node",
        "article",
        BundleConfig::new(TitleStatus::Enabled, "[node:headline]"),
    );
    let engine = TitleGenerator::builder(Arc::new(bundles)).build();
    let mut ctx = ProcessingContext::new();
    let mut record = EntityRecord::new("node", "article")
        .with_id(5u64)
        .with_field("headline", "First");

    engine.process(&mut ctx, &mut record).unwrap();
    assert_eq!(record.title, "First");

    record.fields.insert("headline".to_string(), "Second".to_string());
    let mut saves = 0;
    let mut saver = |_: &EntityRecord| -> Result<(), TitleError> {
        saves += 1;
        Ok(())
    };
    let report = autotitle::RegenerateTitles::new(&engine)
        .execute(&mut ctx, std::iter::once(&mut record), &mut saver)
        .unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(saves, 0);
    assert_eq!(record.title, "First");
}

#[test]
fn test_long_expansion_truncated_to_255_characters() {
    let bundles = ConfiguredBundles::new().with(
        "node",
        "article",
        BundleConfig::new(TitleStatus::Enabled, "[node:body]"),
    );
    let engine = TitleGenerator::builder(Arc::new(bundles)).build();
    let mut ctx = ProcessingContext::new();
    let mut record = EntityRecord::new("node", "article")
        .with_id(1u64)
        .with_field("body", "é".repeat(300));

    let generated = engine.generate(&mut ctx, &mut record).unwrap();
    assert!(generated.truncated);
    assert_eq!(record.title.chars().count(), 255);
}

#[test]
fn test_markup_and_control_characters_removed() {
    let bundles = ConfiguredBundles::new().with(
        "node",
        "article",
        BundleConfig::new(TitleStatus::Enabled, "<b>Bold</b>\tText"),
    );
    let engine = TitleGenerator::builder(Arc::new(bundles)).build();
    let record = EntityRecord::new("node", "article");
    assert_eq!(engine.preview(&record).unwrap().title, "BoldText");
}

#[test]
fn test_code_without_dynamic_flag_is_literal() {
    let bundles = ConfiguredBundles::new().with(
        "node",
        "article",
        BundleConfig::new(TitleStatus::Enabled, "return strtoupper('x');"),
    );
    let engine = TitleGenerator::builder(Arc::new(bundles))
        .evaluator(Arc::new(FnEvaluator::new(|_: &str, _: &dyn TitleRecord| {
            Ok("evaluated".to_string())
        })))
        .build();
    let record = EntityRecord::new("node", "article");
    assert_eq!(engine.preview(&record).unwrap().title, "return strtoupper('x');");
}

#[test]
fn test_dynamic_code_with_host_evaluator() {
    let bundles = ConfiguredBundles::new().with(
        "node",
        "article",
        BundleConfig::new(TitleStatus::Enabled, "upper:[node:headline]").with_dynamic_code(true),
    );
    let evaluator = FnEvaluator::new(|code: &str, _: &dyn TitleRecord| {
        code.strip_prefix("upper:")
            .map(str::to_uppercase)
            .ok_or_else(|| EvaluationError::Malformed(code.to_string()))
    });
    let engine = TitleGenerator::builder(Arc::new(bundles))
        .evaluator(Arc::new(evaluator))
        .build();

    let mut ctx = ProcessingContext::new();
    let mut record = EntityRecord::new("node", "article").with_field("headline", "news");
    let generated = engine.generate(&mut ctx, &mut record).unwrap();
    assert_eq!(generated.source, TitleSource::Evaluated);
    assert_eq!(record.title, "NEWS");
}

#[test]
fn test_dynamic_code_without_evaluator_follows_policy() {
    let bundles = Arc::new(ConfiguredBundles::new().with(
        "node",
        "article",
        BundleConfig::new(TitleStatus::Enabled, "Fallback text").with_dynamic_code(true),
    ));

    let strict = TitleGenerator::builder(bundles.clone()).build();
    let mut ctx = ProcessingContext::new();
    let mut record = EntityRecord::new("node", "article").with_id(1u64);
    let err = strict.generate(&mut ctx, &mut record).unwrap_err();
    assert!(matches!(
        err,
        TitleError::DynamicEvaluation {
            source: EvaluationError::Disabled,
            ..
        }
    ));
    assert_eq!(record.title, "");
    assert!(strict.needs_generation(&ctx, &record).unwrap());

    let lenient = TitleGenerator::builder(bundles)
        .evaluation_failure(EvaluationFailurePolicy::KeepExpanded)
        .build();
    let generated = lenient.generate(&mut ctx, &mut record).unwrap();
    assert_eq!(generated.title, "Fallback text");
}

#[test]
fn test_record_without_title_attribute_rejected() {
    let engine = engine();
    let mut ctx = ProcessingContext::new();
    let mut record = EntityRecord::new("node", "article")
        .with_id(1u64)
        .with_title_attribute(None);
    let err = engine.generate(&mut ctx, &mut record).unwrap_err();
    assert!(matches!(err, TitleError::UnsupportedEntity { ref entity_type } if entity_type == "node"));
    assert_eq!(ctx.applied_count(), 0);
}
