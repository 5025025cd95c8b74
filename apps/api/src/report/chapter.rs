//! Chapter identifiers: the closed vocabulary of report sections.

use std::fmt;

/// One report section. Four single-subject chapters and six pairing chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Chapter {
    Core,
    Wealth,
    Love,
    Forecast,
    PairOverview,
    PairCompatibility,
    PairCommunication,
    PairWealthCareer,
    PairLoveMarriage,
    PairForecast,
}

/// How a chapter identifier failed to resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterLookup {
    Unknown,
    /// The identifier exists, but for the other number of subjects.
    WrongArity { expects_pair: bool },
}

impl Chapter {
    pub const SINGLE: [Chapter; 4] = [
        Chapter::Core,
        Chapter::Wealth,
        Chapter::Love,
        Chapter::Forecast,
    ];

    pub const PAIR: [Chapter; 6] = [
        Chapter::PairOverview,
        Chapter::PairCompatibility,
        Chapter::PairCommunication,
        Chapter::PairWealthCareer,
        Chapter::PairLoveMarriage,
        Chapter::PairForecast,
    ];

    /// Resolves a wire identifier. `forecast` names a chapter in both sets, so
    /// the number of subjects decides which one.
    pub fn resolve(id: &str, pair: bool) -> Result<Chapter, ChapterLookup> {
        let id = id.trim().to_lowercase().replace('-', "_");
        let single = match id.as_str() {
            "core" => Some(Chapter::Core),
            "wealth" => Some(Chapter::Wealth),
            "love" => Some(Chapter::Love),
            "forecast" | "2026_forecast" | "annual_forecast" => Some(Chapter::Forecast),
            _ => None,
        };
        let paired = match id.as_str() {
            "overview" => Some(Chapter::PairOverview),
            "compatibility" => Some(Chapter::PairCompatibility),
            "communication" => Some(Chapter::PairCommunication),
            "wealth_career" => Some(Chapter::PairWealthCareer),
            "love_marriage" => Some(Chapter::PairLoveMarriage),
            "forecast" | "2026_forecast" | "annual_forecast" => Some(Chapter::PairForecast),
            _ => None,
        };

        match (pair, single, paired) {
            (false, Some(chapter), _) | (true, _, Some(chapter)) => Ok(chapter),
            (false, None, Some(_)) => Err(ChapterLookup::WrongArity { expects_pair: true }),
            (true, Some(_), None) => Err(ChapterLookup::WrongArity { expects_pair: false }),
            _ => Err(ChapterLookup::Unknown),
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Chapter::Core => "core",
            Chapter::Wealth => "wealth",
            Chapter::Love => "love",
            Chapter::Forecast | Chapter::PairForecast => "forecast",
            Chapter::PairOverview => "overview",
            Chapter::PairCompatibility => "compatibility",
            Chapter::PairCommunication => "communication",
            Chapter::PairWealthCareer => "wealth_career",
            Chapter::PairLoveMarriage => "love_marriage",
        }
    }

    pub fn is_pair(self) -> bool {
        Chapter::PAIR.contains(&self)
    }

    pub fn is_forecast(self) -> bool {
        matches!(self, Chapter::Forecast | Chapter::PairForecast)
    }

    pub fn title(self) -> &'static str {
        match self {
            Chapter::Core => "Core Destiny Analysis",
            Chapter::Wealth => "Wealth and Career",
            Chapter::Love => "Love and Relationships",
            Chapter::Forecast => "Annual Forecast",
            Chapter::PairOverview => "Pairing Overview",
            Chapter::PairCompatibility => "Compatibility Scores Explained",
            Chapter::PairCommunication => "Communication and Conflict",
            Chapter::PairWealthCareer => "Shared Wealth and Career",
            Chapter::PairLoveMarriage => "Love and Long-Term Partnership",
            Chapter::PairForecast => "Annual Forecast for the Pairing",
        }
    }

    /// Minimum length in the language's length unit.
    pub fn min_length(self) -> u32 {
        if self.is_pair() {
            1500
        } else {
            2000
        }
    }
}

impl fmt::Display for Chapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_and_pair_ids_resolve() {
        for chapter in Chapter::SINGLE {
            assert_eq!(Chapter::resolve(chapter.id(), false), Ok(chapter));
        }
        for chapter in Chapter::PAIR {
            assert_eq!(Chapter::resolve(chapter.id(), true), Ok(chapter));
        }
    }

    #[test]
    fn test_forecast_depends_on_arity() {
        assert_eq!(Chapter::resolve("forecast", false), Ok(Chapter::Forecast));
        assert_eq!(Chapter::resolve("forecast", true), Ok(Chapter::PairForecast));
        assert_eq!(Chapter::resolve("2026_forecast", false), Ok(Chapter::Forecast));
    }

    #[test]
    fn test_wrong_arity_is_distinguished_from_unknown() {
        assert_eq!(
            Chapter::resolve("love_marriage", false),
            Err(ChapterLookup::WrongArity { expects_pair: true })
        );
        assert_eq!(
            Chapter::resolve("core", true),
            Err(ChapterLookup::WrongArity { expects_pair: false })
        );
        assert_eq!(Chapter::resolve("nonexistent", false), Err(ChapterLookup::Unknown));
        assert_eq!(Chapter::resolve("", true), Err(ChapterLookup::Unknown));
    }

    #[test]
    fn test_ids_are_case_insensitive() {
        assert_eq!(Chapter::resolve(" Wealth-Career ", true), Ok(Chapter::PairWealthCareer));
    }

    #[test]
    fn test_pair_chapters_have_lower_minimum() {
        assert_eq!(Chapter::Core.min_length(), 2000);
        assert_eq!(Chapter::PairOverview.min_length(), 1500);
    }
}
