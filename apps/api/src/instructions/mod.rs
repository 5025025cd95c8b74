//! Configuration Resolver: reconciles language, gender and tone into one
//! non-contradictory `InstructionBundle` per request.
//!
//! The lookup tables are built once at startup and shared read-only. Each axis is
//! resolved independently: changing the tone never touches the language literals,
//! and changing the language never touches the tone blocks.

pub mod gender;
pub mod language;
pub mod terms;
pub mod tone;

use std::collections::HashMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::chart::GenderIdentity;
use crate::instructions::gender::{relational_rule, GenderPath};
use crate::instructions::language::{
    base_gendered_terms, builtin_profiles, Language, LanguageCode, LanguageProfile, LengthUnit,
    DEFAULT_LANGUAGE,
};
use crate::instructions::tone::{tone_profile, Tone, ToneProfile};

/// Raw configuration options as they arrive on a request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportOptions {
    pub language: Option<String>,
    pub custom_language_name: Option<String>,
    /// Overrides the chart's own identity tag (single-subject reports only).
    pub gender: Option<String>,
    pub tone: Option<String>,
}

#[derive(Debug, Error, PartialEq)]
pub enum OptionsError {
    #[error("unsupported tone '{0}' (expected 'gentle' or 'authentic')")]
    UnknownTone(String),
}

impl ReportOptions {
    /// Absent tone defaults to gentle; an unknown value is a client error.
    pub fn tone(&self) -> Result<Tone, OptionsError> {
        match self.tone.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            None => Ok(Tone::default()),
            Some(raw) => raw.parse().map_err(OptionsError::UnknownTone),
        }
    }

    pub fn gender_override(&self) -> Option<GenderIdentity> {
        self.gender
            .as_deref()
            .and_then(|g| g.parse::<GenderIdentity>().ok())
    }
}

/// Fully resolved instruction strings for one request. Read-only once built.
#[derive(Debug, Clone)]
pub struct InstructionBundle {
    pub language_name: String,
    pub language_rule: String,
    pub opening: String,
    pub closing: String,
    pub addressing_rule: String,
    pub style_rule: String,
    pub ethics_block: String,
    pub gender_rule: String,
    pub gender_path: GenderPath,
    /// Set for pairings where at least one person takes the dual path.
    pub pair_neutral_reminder: bool,
    /// Empty on the binary path; non-empty on the dual path.
    pub prohibited_terms: Vec<&'static str>,
    pub length_unit: LengthUnit,
    pub tone: Tone,
    generic_name: String,
    fallback_message: String,
}

impl InstructionBundle {
    /// How to name a reader whose chart carries no name.
    pub fn generic_name(&self) -> &str {
        &self.generic_name
    }

    /// Deterministic customer message used when the summary call fails.
    pub fn fallback_message(&self, name: Option<&str>) -> String {
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty() && *n != crate::chart::models::MISSING)
            .unwrap_or(&self.generic_name);
        self.fallback_message.replace("{name}", name)
    }
}

/// Language fields after the fixed/custom split is settled.
struct ResolvedLanguage {
    name: String,
    rule: String,
    opening: String,
    closing: String,
    addressing: String,
    male: String,
    female: String,
    neutral: String,
    extra_terms: &'static [&'static str],
    length_unit: LengthUnit,
    generic_name: String,
    fallback_message: String,
}

/// Immutable lookup tables, constructed once and shared via `AppState`.
pub struct ConfigurationResolver {
    languages: HashMap<LanguageCode, LanguageProfile>,
    tones: HashMap<Tone, ToneProfile>,
}

impl Default for ConfigurationResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigurationResolver {
    pub fn new() -> Self {
        Self {
            languages: builtin_profiles()
                .into_iter()
                .map(|p| (p.code, p))
                .collect(),
            tones: Tone::ALL.into_iter().map(|t| (t, tone_profile(t))).collect(),
        }
    }

    /// Bundle for a single-subject report.
    pub fn resolve(&self, language: &Language, gender: GenderIdentity, tone: Tone) -> InstructionBundle {
        let lang = self.resolve_language(language);
        let path = GenderPath::for_identity(gender);
        let third_person = match gender {
            GenderIdentity::Male => &lang.male,
            GenderIdentity::Female => &lang.female,
            GenderIdentity::NonBinary | GenderIdentity::Unspecified => &lang.neutral,
        };
        let addressing_rule = format!(
            "{} When a third-person reference is unavoidable, use {}.",
            lang.addressing, third_person
        );
        self.assemble(lang, path, false, addressing_rule, relational_rule(gender).to_string(), tone)
    }

    /// Bundle for a two-person report. The stricter gender path governs the whole report.
    pub fn resolve_pair(
        &self,
        language: &Language,
        people: [(&str, GenderIdentity); 2],
        tone: Tone,
    ) -> InstructionBundle {
        let lang = self.resolve_language(language);
        let path = GenderPath::strictest(&[people[0].1, people[1].1]);

        let third_person = match path {
            GenderPath::DualInterpretation => format!(
                "{} for both people, including the one whose chart is binary-gendered",
                lang.neutral
            ),
            GenderPath::Binary => format!(
                "each person's own forms ({} for a male chart, {} for a female chart)",
                lang.male, lang.female
            ),
        };
        let addressing_rule = format!(
            "This report is written to both people together. {} For third-person references use {}.",
            lang.addressing, third_person
        );

        let gender_rule = ["Person A", "Person B"]
            .iter()
            .zip(people.iter())
            .map(|(label, (name, gender))| format!("{label} ({name}):\n{}", relational_rule(*gender)))
            .collect::<Vec<_>>()
            .join("\n\n");

        self.assemble(
            lang,
            path,
            path == GenderPath::DualInterpretation,
            addressing_rule,
            gender_rule,
            tone,
        )
    }

    fn assemble(
        &self,
        lang: ResolvedLanguage,
        path: GenderPath,
        pair_neutral_reminder: bool,
        addressing_rule: String,
        gender_rule: String,
        tone: Tone,
    ) -> InstructionBundle {
        let tone_profile = self
            .tones
            .get(&tone)
            .cloned()
            .unwrap_or_else(|| tone_profile(tone));

        let prohibited_terms = match path {
            GenderPath::Binary => Vec::new(),
            GenderPath::DualInterpretation => {
                let mut terms = base_gendered_terms();
                terms.extend(lang.extra_terms.iter().copied());
                terms
            }
        };

        InstructionBundle {
            language_name: lang.name,
            language_rule: lang.rule,
            opening: lang.opening,
            closing: lang.closing,
            addressing_rule,
            style_rule: tone_profile.style_rule(),
            ethics_block: tone_profile.ethics.to_string(),
            gender_rule,
            gender_path: path,
            pair_neutral_reminder,
            prohibited_terms,
            length_unit: lang.length_unit,
            tone,
            generic_name: lang.generic_name,
            fallback_message: lang.fallback_message,
        }
    }

    fn resolve_language(&self, language: &Language) -> ResolvedLanguage {
        match language {
            Language::Fixed(code) => {
                let profile = self
                    .languages
                    .get(code)
                    .or_else(|| self.languages.get(&DEFAULT_LANGUAGE));
                match profile {
                    Some(p) => from_profile(p),
                    None => custom_language("English"),
                }
            }
            Language::Custom(name) => {
                debug!("Synthesizing instruction bundle for custom language '{name}'");
                custom_language(name)
            }
        }
    }
}

fn from_profile(p: &LanguageProfile) -> ResolvedLanguage {
    ResolvedLanguage {
        name: p.display_name.to_string(),
        rule: format!(
            "Write the entire report in {}. Keep Chinese metaphysics terms (stems, branches, \
             ten gods, star names) in their original characters, followed by a short explanation \
             in {} where the reader may not know them.",
            p.display_name, p.display_name
        ),
        opening: p.opening.to_string(),
        closing: p.closing.to_string(),
        addressing: p.addressing.to_string(),
        male: p.pronouns.male.to_string(),
        female: p.pronouns.female.to_string(),
        neutral: p.pronouns.neutral.to_string(),
        extra_terms: p.extra_gendered_terms,
        length_unit: p.length_unit,
        generic_name: p.generic_name.to_string(),
        fallback_message: p.fallback_message.to_string(),
    }
}

fn custom_language(name: &str) -> ResolvedLanguage {
    ResolvedLanguage {
        name: name.to_string(),
        rule: format!(
            "Write the entire report in {name}. The opening and closing lines below are fixed \
             literals: reproduce them exactly as given, untranslated. Everything else must be in \
             {name}. Keep Chinese metaphysics terms in their original characters, followed by a \
             short explanation in {name}."
        ),
        opening: format!("Dear friend, welcome to your personal destiny reading in {name}."),
        closing: "May this reading light the path ahead of you.".to_string(),
        addressing: format!(
            "Address the reader directly in the second person, using the most respectful \
             register {name} offers."
        ),
        male: format!("the masculine third-person forms of {name}"),
        female: format!("the feminine third-person forms of {name}"),
        neutral: format!("gender-neutral forms of {name}, or the person's name"),
        extra_terms: &[],
        length_unit: LengthUnit::Words,
        generic_name: "friend".to_string(),
        fallback_message: "Dear {name}, your complete reading is ready. Take your time with each \
            chapter, and come back to it whenever you want clarity about the road ahead."
            .to_string(),
    }
}
