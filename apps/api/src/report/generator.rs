//! Section pipeline: one chapter per request.
//!
//! Flow: prepare subjects → resolve instruction bundle → compose prompts →
//!       one generation call → chapter text or typed error.
//!
//! Every input problem is rejected before the generation call is issued.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::chart::calendar::YearPillar;
use crate::chart::{prepare_subject, PreparedSubject};
use crate::errors::AppError;
use crate::instructions::language::Language;
use crate::instructions::{ConfigurationResolver, InstructionBundle, ReportOptions};
use crate::llm_client::TextGenerator;
use crate::report::chapter::Chapter;
use crate::report::compatibility::{CompatibilityScoreBreakdown, EXPECTED_DIMENSIONS};
use crate::report::composer::{compose, ChapterInput, Subjects};

/// Years accepted for forecast chapters.
const FORECAST_YEAR_RANGE: std::ops::RangeInclusive<i32> = 1900..=2200;

/// Request body for one chapter. Field aliases match the original front end.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SectionRequest {
    #[serde(alias = "section_type")]
    pub chapter: Option<String>,
    #[serde(alias = "bazi_data")]
    pub subject: Option<Value>,
    pub subjects: Option<Vec<Value>>,
    pub scores: Option<CompatibilityScoreBreakdown>,
    pub options: ReportOptions,
    pub forecast_year: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct SectionOutput {
    pub chapter: Chapter,
    pub content: String,
    pub context_degraded: bool,
}

pub async fn generate_section(
    generator: &dyn TextGenerator,
    resolver: &ConfigurationResolver,
    request: SectionRequest,
) -> Result<SectionOutput, AppError> {
    let chapter_id = request
        .chapter
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::Validation("chapter is required".to_string()))?;

    let prepared = prepare_subjects(request.subject, request.subjects)?;
    let bundle = resolve_bundle(resolver, &request.options, &prepared)?;

    let forecast_year = match request.forecast_year {
        Some(year) if !FORECAST_YEAR_RANGE.contains(&year) => {
            return Err(AppError::Validation(format!(
                "forecastYear {year} is outside {}..={}",
                FORECAST_YEAR_RANGE.start(),
                FORECAST_YEAR_RANGE.end()
            )))
        }
        Some(year) => YearPillar::for_year(year),
        None => YearPillar::current(),
    };

    if let Some(scores) = &request.scores {
        if scores.dimensions.len() != EXPECTED_DIMENSIONS {
            tracing::warn!(
                "Score breakdown has {} dimensions, expected {EXPECTED_DIMENSIONS}",
                scores.dimensions.len()
            );
        }
    }

    let subjects = as_subjects(&prepared)
        .ok_or_else(|| AppError::Validation("expected one or two subjects".to_string()))?;
    let input = ChapterInput {
        subjects,
        scores: request.scores.as_ref(),
        forecast_year,
    };
    let prompts = compose(chapter_id, &bundle, &input)?;
    let context_degraded = prepared.iter().any(|s| s.context.is_degraded());

    if prompts.chapter.is_forecast() {
        debug!(year = forecast_year.year, gan_zhi = %forecast_year.gan_zhi(), "Forecast target year");
    }
    info!(
        chapter = %prompts.chapter,
        language = %bundle.language_name,
        tone = bundle.tone.as_str(),
        gender_path = ?bundle.gender_path,
        context_degraded,
        "Generating chapter"
    );

    let content = generator.generate(&prompts.system, &prompts.user).await?;

    info!(chapter = %prompts.chapter, chars = content.chars().count(), "Chapter generated");

    Ok(SectionOutput {
        chapter: prompts.chapter,
        content,
        context_degraded,
    })
}

/// Accepts `subject` (one chart) or `subjects` (one or two charts).
pub fn prepare_subjects(
    subject: Option<Value>,
    subjects: Option<Vec<Value>>,
) -> Result<Vec<PreparedSubject>, AppError> {
    let raw = match (subject, subjects) {
        (Some(_), Some(_)) => {
            return Err(AppError::Validation(
                "send either subject or subjects, not both".to_string(),
            ))
        }
        (Some(one), None) => vec![one],
        (None, Some(many)) => many,
        (None, None) => {
            return Err(AppError::Validation("subject data is required".to_string()))
        }
    };

    match raw.len() {
        1 | 2 => Ok(raw.iter().map(prepare_subject).collect()),
        n => Err(AppError::Validation(format!(
            "expected one or two subjects, got {n}"
        ))),
    }
}

/// Single subject: an explicit gender option overrides the chart's tag.
/// Pairs: each chart's own tag is used and the stricter path wins.
pub fn resolve_bundle(
    resolver: &ConfigurationResolver,
    options: &ReportOptions,
    prepared: &[PreparedSubject],
) -> Result<InstructionBundle, AppError> {
    let tone = options.tone()?;
    let custom_name = options.custom_language_name.as_deref().or_else(|| {
        prepared
            .iter()
            .find_map(|s| s.chart.identity.custom_language_name.as_deref())
    });
    let language = Language::from_request(options.language.as_deref(), custom_name);

    match prepared {
        [single] => {
            let gender = options
                .gender_override()
                .unwrap_or(single.chart.identity.gender);
            Ok(resolver.resolve(&language, gender, tone))
        }
        [a, b] => Ok(resolver.resolve_pair(
            &language,
            [
                (a.chart.name(), a.chart.identity.gender),
                (b.chart.name(), b.chart.identity.gender),
            ],
            tone,
        )),
        _ => Err(AppError::Validation(
            "expected one or two subjects".to_string(),
        )),
    }
}

pub fn as_subjects(prepared: &[PreparedSubject]) -> Option<Subjects<'_>> {
    match prepared {
        [a] => Some(Subjects::Single(a)),
        [a, b] => Some(Subjects::Pair(a, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::fixtures::{partner_subject, sample_chart_value, sample_scores_value};
    use crate::instructions::gender::GenderPath;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::llm_client::GenerationError;
    use serde_json::json;

    fn request(chapter: &str, subject: Value) -> SectionRequest {
        SectionRequest {
            chapter: Some(chapter.to_string()),
            subject: Some(subject),
            options: ReportOptions {
                language: Some("en".into()),
                ..Default::default()
            },
            forecast_year: Some(2026),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_generates_chapter_text() {
        let generator = ScriptedGenerator::new(vec![Ok("Chapter body".to_string())]);
        let out = generate_section(
            &generator,
            &ConfigurationResolver::new(),
            request("core", sample_chart_value("male")),
        )
        .await
        .unwrap();
        assert_eq!(out.chapter, Chapter::Core);
        assert_eq!(out.content, "Chapter body");
        assert!(!out.context_degraded);
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_unknown_chapter_never_calls_generator() {
        let generator = ScriptedGenerator::always(Ok("unused".to_string()));
        let err = generate_section(
            &generator,
            &ConfigurationResolver::new(),
            request("nonexistent", sample_chart_value("male")),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("nonexistent")));
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_generation_errors_propagate_typed() {
        let generator = ScriptedGenerator::new(vec![Err(GenerationError::UpstreamHttp {
            status: 429,
            body: "rate limited".into(),
        })]);
        let err = generate_section(
            &generator,
            &ConfigurationResolver::new(),
            request("wealth", sample_chart_value("female")),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::Generation(GenerationError::UpstreamHttp { status: 429, ref body }) if body == "rate limited"
        ));
    }

    #[tokio::test]
    async fn test_degraded_chart_still_generates() {
        let generator = ScriptedGenerator::new(vec![Ok("text".to_string())]);
        let out = generate_section(
            &generator,
            &ConfigurationResolver::new(),
            request("core", json!({"luckCycles": "broken"})),
        )
        .await
        .unwrap();
        assert!(out.context_degraded);
        let (_, user) = generator.prompts().remove(0);
        assert!(user.contains("[Chart data unavailable"));
    }

    #[tokio::test]
    async fn test_invalid_tone_and_year_are_rejected() {
        let generator = ScriptedGenerator::always(Ok("unused".to_string()));
        let resolver = ConfigurationResolver::new();

        let mut bad_tone = request("core", sample_chart_value("male"));
        bad_tone.options.tone = Some("harsh".into());
        assert!(matches!(
            generate_section(&generator, &resolver, bad_tone).await,
            Err(AppError::Validation(_))
        ));

        let mut bad_year = request("forecast", sample_chart_value("male"));
        bad_year.forecast_year = Some(99_999);
        assert!(matches!(
            generate_section(&generator, &resolver, bad_year).await,
            Err(AppError::Validation(_))
        ));
        assert_eq!(generator.calls(), 0);
    }

    #[test]
    fn test_prepare_subjects_arity() {
        assert!(prepare_subjects(None, None).is_err());
        assert!(prepare_subjects(Some(json!({})), Some(vec![json!({})])).is_err());
        assert!(prepare_subjects(None, Some(vec![])).is_err());
        assert!(prepare_subjects(None, Some(vec![json!({}); 3])).is_err());
        assert_eq!(prepare_subjects(None, Some(vec![json!({}), json!({})])).unwrap().len(), 2);
    }

    #[test]
    fn test_gender_override_applies_to_single_subject() {
        let prepared = prepare_subjects(Some(sample_chart_value("male")), None).unwrap();
        let options = ReportOptions {
            gender: Some("non-binary".into()),
            ..Default::default()
        };
        let bundle = resolve_bundle(&ConfigurationResolver::new(), &options, &prepared).unwrap();
        assert_eq!(bundle.gender_path, GenderPath::DualInterpretation);
    }

    #[test]
    fn test_custom_language_name_falls_back_to_chart_identity() {
        let mut value = sample_chart_value("female");
        value["identity"]["customLanguageName"] = json!("Tagalog");
        let prepared = prepare_subjects(Some(value), None).unwrap();
        let options = ReportOptions {
            language: Some("custom".into()),
            ..Default::default()
        };
        let bundle = resolve_bundle(&ConfigurationResolver::new(), &options, &prepared).unwrap();
        assert_eq!(bundle.language_name, "Tagalog");
    }

    #[tokio::test]
    async fn test_pair_compatibility_chapter() {
        let generator = ScriptedGenerator::new(vec![Ok("Pair text".to_string())]);
        let partner = serde_json::to_value(&partner_subject("non-binary").chart).unwrap();
        let request = SectionRequest {
            chapter: Some("compatibility".into()),
            subjects: Some(vec![sample_chart_value("male"), partner]),
            scores: Some(serde_json::from_value(sample_scores_value()).unwrap()),
            ..Default::default()
        };
        let out = generate_section(&generator, &ConfigurationResolver::new(), request)
            .await
            .unwrap();
        assert_eq!(out.chapter, Chapter::PairCompatibility);
        let (system, user) = generator.prompts().remove(0);
        assert!(system.contains("PAIRING REMINDER"));
        assert!(user.contains("Day Master Harmony: 18 / 20"));
    }
}
