//! Gender axis: relational-star interpretation rules.
//!
//! Male and female charts follow the classical single mapping. Non-binary and
//! unspecified charts take the dual-interpretation path. Rule text here never contains
//! third-person pronouns; pronoun guidance is part of the addressing rule.

use crate::chart::GenderIdentity;

/// Which interpretation path a chart (or pairing) takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenderPath {
    Binary,
    DualInterpretation,
}

impl GenderPath {
    pub fn for_identity(gender: GenderIdentity) -> Self {
        if gender.is_neutral() {
            GenderPath::DualInterpretation
        } else {
            GenderPath::Binary
        }
    }

    /// The stricter path wins across a pairing.
    pub fn strictest(genders: &[GenderIdentity]) -> Self {
        if genders.iter().any(|g| g.is_neutral()) {
            GenderPath::DualInterpretation
        } else {
            GenderPath::Binary
        }
    }
}

pub const MALE_RELATIONAL_RULE: &str = "\
RELATIONAL STARS (male chart): Read the Wealth Stars (正财 Direct Wealth, 偏财 Indirect Wealth) \
as the partner star, and the Officer Stars (正官 Direct Officer, 七杀 Seven Killings) as career \
authority and offspring. The Day Branch is the partnership palace; judge romantic timing by the \
years and cycles that activate the Wealth Stars or combine with the Day Branch.";

pub const FEMALE_RELATIONAL_RULE: &str = "\
RELATIONAL STARS (female chart): Read the Officer Stars (正官 Direct Officer, 七杀 Seven Killings) \
as the partner star, and the Output Stars (食神 Eating God, 伤官 Hurting Officer) as offspring. \
The Day Branch is the partnership palace; judge romantic timing by the years and cycles that \
activate the Officer Stars or combine with the Day Branch.";

pub const DUAL_RELATIONAL_RULE: &str = "\
RELATIONAL STARS (dual interpretation): This chart's gender identity is non-binary or \
unspecified, so no single classical mapping applies. For every relationship analysis run two \
labelled passes side by side:
- Wealth-Star lens: read 正财 / 偏财 as the partner star.
- Officer-Star lens: read 正官 / 七杀 as the partner star.
Present both passes in parallel, then state which lens the chart structure supports more \
strongly and cite the stems, branches or star counts that decide it. Never collapse the two \
passes into a single gender-determined reading. The Day Branch remains the partnership palace \
under both lenses.";

pub fn relational_rule(gender: GenderIdentity) -> &'static str {
    match gender {
        GenderIdentity::Male => MALE_RELATIONAL_RULE,
        GenderIdentity::Female => FEMALE_RELATIONAL_RULE,
        GenderIdentity::NonBinary | GenderIdentity::Unspecified => DUAL_RELATIONAL_RULE,
    }
}
