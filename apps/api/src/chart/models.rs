//! SubjectChart: the upstream chart calculator's output, consumed as opaque data.
//!
//! Every field is optional: a chart with any subset of fields (including `{}`)
//! deserializes. Field names from the original front end (`gan`, `zhi`,
//! `shishen`, `wuxing`, `dayun`, `shenSha`, ...) are accepted as aliases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder rendered for any absent textual value.
pub const MISSING: &str = "N/A";

/// Gender-identity tag carried on the chart's identity block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenderIdentity {
    Male,
    Female,
    NonBinary,
    #[default]
    Unspecified,
}

impl GenderIdentity {
    pub const ALL: [GenderIdentity; 4] = [
        GenderIdentity::Male,
        GenderIdentity::Female,
        GenderIdentity::NonBinary,
        GenderIdentity::Unspecified,
    ];

    /// Non-binary and unspecified share the inclusive interpretation path.
    pub fn is_neutral(self) -> bool {
        matches!(self, GenderIdentity::NonBinary | GenderIdentity::Unspecified)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GenderIdentity::Male => "male",
            GenderIdentity::Female => "female",
            GenderIdentity::NonBinary => "non-binary",
            GenderIdentity::Unspecified => "unspecified",
        }
    }
}

impl fmt::Display for GenderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenderIdentity {
    type Err = std::convert::Infallible;

    /// Lenient: anything unrecognised is `Unspecified`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        Ok(match normalized.as_str() {
            "male" | "m" | "man" | "男" => GenderIdentity::Male,
            "female" | "f" | "woman" | "女" => GenderIdentity::Female,
            "non-binary" | "nonbinary" | "nb" | "enby" => GenderIdentity::NonBinary,
            _ => GenderIdentity::Unspecified,
        })
    }
}

impl<'de> Deserialize<'de> for GenderIdentity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .map(|s| s.parse().unwrap_or_default())
            .unwrap_or_default())
    }
}

/// The five elements in canonical generating order. Max/min ties resolve to
/// the earliest element in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    pub const CANONICAL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Element::Wood => "Wood (木)",
            Element::Fire => "Fire (火)",
            Element::Earth => "Earth (土)",
            Element::Metal => "Metal (金)",
            Element::Water => "Water (水)",
        }
    }
}

/// Hidden stems arrive either as one string (`"癸辛己"`) or as a list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    pub fn render(&self) -> String {
        match self {
            TextOrList::Text(s) if !s.trim().is_empty() => s.clone(),
            TextOrList::List(items) if !items.is_empty() => items.join(", "),
            _ => MISSING.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Identity {
    pub name: Option<String>,
    pub gender: GenderIdentity,
    pub custom_language_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pillar {
    #[serde(alias = "gan")]
    pub stem: Option<String>,
    #[serde(alias = "zhi")]
    pub branch: Option<String>,
    #[serde(alias = "wuxing")]
    pub element: Option<String>,
    pub nayin: Option<String>,
    #[serde(alias = "hidden")]
    pub hidden_stems: Option<TextOrList>,
    #[serde(alias = "shishen")]
    pub ten_god: Option<String>,
    #[serde(alias = "changsheng")]
    pub life_stage: Option<String>,
    #[serde(alias = "kongwang")]
    pub is_void: Option<bool>,
}

impl Pillar {
    /// Stem and branch joined, e.g. `甲子`.
    pub fn gan_zhi(&self) -> String {
        match (self.stem.as_deref(), self.branch.as_deref()) {
            (None, None) => MISSING.to_string(),
            (stem, branch) => format!("{}{}", stem.unwrap_or("?"), branch.unwrap_or("?")),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementCounts {
    pub wood: Option<f64>,
    pub fire: Option<f64>,
    pub earth: Option<f64>,
    pub metal: Option<f64>,
    pub water: Option<f64>,
}

impl ElementCounts {
    /// Absent counts read as zero.
    pub fn count(&self, element: Element) -> f64 {
        match element {
            Element::Wood => self.wood,
            Element::Fire => self.fire,
            Element::Earth => self.earth,
            Element::Metal => self.metal,
            Element::Water => self.water,
        }
        .unwrap_or(0.0)
    }

    pub fn strongest(&self) -> (Element, f64) {
        self.pick(|candidate, best| candidate > best)
    }

    pub fn weakest(&self) -> (Element, f64) {
        self.pick(|candidate, best| candidate < best)
    }

    // Strict comparison keeps the first-encountered element on ties.
    fn pick(&self, better: impl Fn(f64, f64) -> bool) -> (Element, f64) {
        let mut best = (Element::CANONICAL[0], self.count(Element::CANONICAL[0]));
        for element in Element::CANONICAL.into_iter().skip(1) {
            let value = self.count(element);
            if better(value, best.1) {
                best = (element, value);
            }
        }
        best
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StrengthTally {
    pub same: Option<f64>,
    pub diff: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Palaces {
    #[serde(alias = "minggong")]
    pub life_palace: Option<String>,
    #[serde(alias = "shengong")]
    pub body_palace: Option<String>,
    #[serde(alias = "taiyuan")]
    pub conception_palace: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LuckCycle {
    pub index: Option<u32>,
    pub gan_zhi: Option<String>,
    pub start_age: Option<u32>,
    pub end_age: Option<u32>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    #[serde(alias = "current")]
    pub is_current: bool,
}

impl LuckCycle {
    /// `乙丑 (ages 13-22, years 2003-2012)`
    pub fn describe(&self) -> String {
        format!(
            "{} (ages {}, years {})",
            self.gan_zhi.as_deref().unwrap_or(MISSING),
            span(self.start_age, self.end_age),
            span(self.start_year, self.end_year),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnnualCycle {
    pub year: Option<i32>,
    pub gan_zhi: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StarLists {
    pub auspicious: Vec<String>,
    pub inauspicious: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubjectChart {
    pub identity: Identity,
    pub year: Option<Pillar>,
    pub month: Option<Pillar>,
    pub day: Option<Pillar>,
    pub hour: Option<Pillar>,
    pub day_master: Option<String>,
    pub day_master_status: Option<String>,
    pub strength: Option<StrengthTally>,
    #[serde(alias = "wuxing")]
    pub five_elements: Option<ElementCounts>,
    pub palaces: Option<Palaces>,
    #[serde(alias = "zodiac")]
    pub zodiac_animals: Vec<String>,
    pub luck_cycles: Vec<LuckCycle>,
    /// The original payload carried only the running cycle under `dayun`.
    #[serde(alias = "dayun")]
    pub current_luck_cycle: Option<LuckCycle>,
    #[serde(alias = "liunian")]
    pub annual_cycle: Option<AnnualCycle>,
    pub stars: StarLists,
    #[serde(alias = "shenSha")]
    pub shen_sha: Vec<String>,
}

/// Which of the four pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

impl PillarPosition {
    pub const ALL: [PillarPosition; 4] = [
        PillarPosition::Year,
        PillarPosition::Month,
        PillarPosition::Day,
        PillarPosition::Hour,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PillarPosition::Year => "Year Pillar (年柱, ancestry and roots)",
            PillarPosition::Month => "Month Pillar (月柱, parents and structure)",
            PillarPosition::Day => "Day Pillar (日柱, self and partnership palace)",
            PillarPosition::Hour => "Hour Pillar (时柱, offspring and later life)",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            PillarPosition::Year => "Year",
            PillarPosition::Month => "Month",
            PillarPosition::Day => "Day",
            PillarPosition::Hour => "Hour",
        }
    }
}

impl SubjectChart {
    pub fn pillar(&self, position: PillarPosition) -> Option<&Pillar> {
        match position {
            PillarPosition::Year => self.year.as_ref(),
            PillarPosition::Month => self.month.as_ref(),
            PillarPosition::Day => self.day.as_ref(),
            PillarPosition::Hour => self.hour.as_ref(),
        }
    }

    pub fn name(&self) -> &str {
        self.identity
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(MISSING)
    }

    /// Falls back to the day pillar's stem when no explicit day master is given.
    pub fn day_master(&self) -> &str {
        self.day_master
            .as_deref()
            .or_else(|| self.day.as_ref().and_then(|p| p.stem.as_deref()))
            .unwrap_or(MISSING)
    }

    pub fn branch(&self, position: PillarPosition) -> &str {
        self.pillar(position)
            .and_then(|p| p.branch.as_deref())
            .unwrap_or(MISSING)
    }

    pub fn nayin(&self, position: PillarPosition) -> &str {
        self.pillar(position)
            .and_then(|p| p.nayin.as_deref())
            .unwrap_or(MISSING)
    }

    pub fn hidden_stems(&self, position: PillarPosition) -> String {
        self.pillar(position)
            .and_then(|p| p.hidden_stems.as_ref())
            .map(TextOrList::render)
            .unwrap_or_else(|| MISSING.to_string())
    }

    /// Star names from every star list, in chart order.
    pub fn star_names(&self) -> impl Iterator<Item = &str> {
        self.stars
            .auspicious
            .iter()
            .chain(&self.stars.inauspicious)
            .chain(&self.shen_sha)
            .map(String::as_str)
    }

    pub fn ten_god(&self, position: PillarPosition) -> &str {
        self.pillar(position)
            .and_then(|p| p.ten_god.as_deref())
            .unwrap_or(MISSING)
    }

    /// The flagged entry of the cycle list, else the standalone current cycle.
    pub fn current_cycle(&self) -> Option<&LuckCycle> {
        self.luck_cycles
            .iter()
            .find(|c| c.is_current)
            .or(self.current_luck_cycle.as_ref())
    }

    pub fn current_cycle_label(&self) -> String {
        self.current_cycle()
            .map(LuckCycle::describe)
            .unwrap_or_else(|| MISSING.to_string())
    }

    /// Every ten-god label on the four pillars, hidden stems excluded.
    pub fn ten_gods(&self) -> impl Iterator<Item = &str> {
        PillarPosition::ALL
            .into_iter()
            .filter_map(|p| self.pillar(p))
            .filter_map(|p| p.ten_god.as_deref())
    }
}

/// Renders an inclusive range with `?` for a missing bound.
pub fn span<T: fmt::Display>(start: Option<T>, end: Option<T>) -> String {
    match (start, end) {
        (None, None) => MISSING.to_string(),
        (start, end) => format!(
            "{}-{}",
            start.map(|v| v.to_string()).unwrap_or_else(|| "?".into()),
            end.map(|v| v.to_string()).unwrap_or_else(|| "?".into())
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_deserializes() {
        let chart: SubjectChart = serde_json::from_value(json!({})).unwrap();
        assert_eq!(chart.day_master(), MISSING);
        assert_eq!(chart.identity.gender, GenderIdentity::Unspecified);
        assert!(chart.current_cycle().is_none());
    }

    #[test]
    fn test_original_field_names_are_accepted() {
        let chart: SubjectChart = serde_json::from_value(json!({
            "year": {"gan": "甲", "zhi": "子", "nayin": "海中金", "shishen": "比肩", "hidden": "癸"},
            "wuxing": {"metal": 2, "wood": 3},
            "dayun": {"ganZhi": "丙寅", "startYear": 2020},
            "shenSha": ["桃花"]
        }))
        .unwrap();
        let year = chart.year.as_ref().unwrap();
        assert_eq!(year.gan_zhi(), "甲子");
        assert_eq!(year.hidden_stems, Some(TextOrList::Text("癸".into())));
        assert_eq!(chart.five_elements.as_ref().unwrap().count(Element::Wood), 3.0);
        assert_eq!(chart.current_cycle().unwrap().gan_zhi.as_deref(), Some("丙寅"));
        assert_eq!(chart.shen_sha, vec!["桃花".to_string()]);
    }

    #[test]
    fn test_gender_parsing_is_lenient() {
        assert_eq!("Male".parse::<GenderIdentity>().unwrap(), GenderIdentity::Male);
        assert_eq!("女".parse::<GenderIdentity>().unwrap(), GenderIdentity::Female);
        assert_eq!("non_binary".parse::<GenderIdentity>().unwrap(), GenderIdentity::NonBinary);
        assert_eq!("?".parse::<GenderIdentity>().unwrap(), GenderIdentity::Unspecified);
        let id: Identity = serde_json::from_value(json!({"gender": null})).unwrap();
        assert_eq!(id.gender, GenderIdentity::Unspecified);
    }

    #[test]
    fn test_strongest_and_weakest_tie_break_on_canonical_order() {
        let counts = ElementCounts {
            wood: Some(1.0),
            fire: Some(3.0),
            earth: Some(3.0),
            metal: Some(1.0),
            water: None,
        };
        assert_eq!(counts.strongest(), (Element::Fire, 3.0));
        assert_eq!(counts.weakest(), (Element::Water, 0.0));

        let flat = ElementCounts::default();
        assert_eq!(flat.strongest().0, Element::Wood);
        assert_eq!(flat.weakest().0, Element::Wood);
    }

    #[test]
    fn test_flagged_cycle_wins_over_standalone_current() {
        let chart = SubjectChart {
            luck_cycles: vec![
                LuckCycle {
                    gan_zhi: Some("甲子".into()),
                    ..Default::default()
                },
                LuckCycle {
                    gan_zhi: Some("乙丑".into()),
                    is_current: true,
                    ..Default::default()
                },
            ],
            current_luck_cycle: Some(LuckCycle {
                gan_zhi: Some("丙寅".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(chart.current_cycle().unwrap().gan_zhi.as_deref(), Some("乙丑"));
    }

    #[test]
    fn test_span_placeholders() {
        assert_eq!(span::<u32>(None, None), MISSING);
        assert_eq!(span(Some(3), None), "3-?");
        assert_eq!(span(Some(3), Some(12)), "3-12");
    }
}
