//! Tone calibration: maps the requested interpretive stance to ethics, style and vocabulary.
//!
//! CRITICAL: the authentic tone trades hedging for directness, never for fatalism.
//! Its ethics block always requires a mitigating action and a timing window for every
//! negative claim. This is a hard contract levied on the generator.

use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Tone {
    #[default]
    Gentle,
    Authentic,
}

impl Tone {
    pub const ALL: [Tone; 2] = [Tone::Gentle, Tone::Authentic];

    pub fn as_str(self) -> &'static str {
        match self {
            Tone::Gentle => "gentle",
            Tone::Authentic => "authentic",
        }
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "gentle" | "soft" => Ok(Tone::Gentle),
            "authentic" | "direct" => Ok(Tone::Authentic),
            other => Err(other.to_string()),
        }
    }
}

/// Ethics, style and vocabulary calibrated to one tone.
#[derive(Debug, Clone)]
pub struct ToneProfile {
    pub ethics: &'static str,
    pub style: &'static str,
    pub preferred_vocabulary: Vec<&'static str>,
    pub avoid_vocabulary: Vec<&'static str>,
}

impl ToneProfile {
    /// Style text with the vocabulary constraints spelled out.
    pub fn style_rule(&self) -> String {
        format!(
            "{}\nFavour wording such as: {}.\nAvoid wording such as: {}.",
            self.style,
            self.preferred_vocabulary.join(", "),
            self.avoid_vocabulary.join(", ")
        )
    }
}

pub fn tone_profile(tone: Tone) -> ToneProfile {
    match tone {
        Tone::Gentle => ToneProfile {
            ethics: "ETHICS (gentle tone): The reader may be anxious about what the chart says. \
                Frame every difficulty as a tendency that can be worked with, never as a fixed fate. \
                Never present death, serious illness, bankruptcy or the end of a relationship as \
                certain. Point health, legal and financial questions to qualified professionals.",
            style: "STYLE (gentle tone): Warm, encouraging and patient. Lead with strengths, \
                then discuss challenges as areas of growth.",
            preferred_vocabulary: vec![
                "may",
                "tends to",
                "has the potential to",
                "an opportunity to",
                "could benefit from",
                "a season for",
            ],
            avoid_vocabulary: vec![
                "doomed",
                "destined to fail",
                "inevitable",
                "disaster",
                "curse",
                "never will",
            ],
        },
        Tone::Authentic => ToneProfile {
            ethics: "ETHICS (authentic tone): The reader asked for a direct reading. Name \
                unfavourable configurations plainly instead of softening them into vagueness. \
                Every negative claim MUST be paired with at least one concrete mitigating action \
                AND a timing window (a year, a month or a luck cycle) in which it applies or eases. \
                A negative claim that carries neither a mitigating action nor a timing window is a \
                contract violation. Directness is not fatalism: never declare an outcome \
                unavoidable, and never diagnose medical or legal conditions.",
            style: "STYLE (authentic tone): Clear, concrete and confident. Prefer specific years, \
                months and cycles over generalities, and state conclusions before explaining them.",
            preferred_vocabulary: vec![
                "will",
                "clearly",
                "the chart shows",
                "in the year",
                "during the cycle",
                "to counter this",
            ],
            avoid_vocabulary: vec![
                "perhaps maybe",
                "it could possibly be",
                "some people might feel",
                "in some way",
                "hopefully",
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentic_requires_remedy_and_timing() {
        let t = tone_profile(Tone::Authentic);
        assert!(t.ethics.contains("mitigating action"));
        assert!(t.ethics.contains("timing window"));
        assert!(t.ethics.contains("MUST"));
    }

    #[test]
    fn test_gentle_avoids_fatalistic_vocabulary() {
        let t = tone_profile(Tone::Gentle);
        assert!(t.avoid_vocabulary.contains(&"doomed"));
        assert!(t.preferred_vocabulary.contains(&"has the potential to"));
    }

    #[test]
    fn test_tones_do_not_share_preferred_vocabulary() {
        let gentle = tone_profile(Tone::Gentle);
        let authentic = tone_profile(Tone::Authentic);
        assert!(gentle
            .preferred_vocabulary
            .iter()
            .all(|w| !authentic.preferred_vocabulary.contains(w)));
    }

    #[test]
    fn test_style_rule_lists_vocabulary() {
        let rule = tone_profile(Tone::Authentic).style_rule();
        assert!(rule.contains("to counter this"));
        assert!(rule.contains("hopefully"));
    }

    #[test]
    fn test_tone_parsing() {
        assert_eq!("Gentle".parse::<Tone>(), Ok(Tone::Gentle));
        assert_eq!("direct".parse::<Tone>(), Ok(Tone::Authentic));
        assert!("brutal".parse::<Tone>().is_err());
    }
}
