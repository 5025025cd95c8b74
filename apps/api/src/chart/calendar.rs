//! Sexagenary year helper for forecast chapters, plus the fixed branch and stem
//! relations the chapter templates quote as data.

use chrono::{Datelike, Utc};

const STEMS: [&str; 10] = ["甲", "乙", "丙", "丁", "戊", "己", "庚", "辛", "壬", "癸"];
const BRANCHES: [&str; 12] = [
    "子", "丑", "寅", "卯", "辰", "巳", "午", "未", "申", "酉", "戌", "亥",
];
/// Six-harmony partner for each branch index (子丑, 寅亥, 卯戌, 辰酉, 巳申, 午未).
const HARMONY: [usize; 12] = [1, 0, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2];
/// Six-harm partner for each branch index (子未, 丑午, 寅巳, 卯辰, 申亥, 酉戌).
const HARM: [usize; 12] = [7, 6, 5, 4, 3, 2, 1, 0, 11, 10, 9, 8];
/// Punishing pairs other than self-punishment: 寅巳申, 丑戌未 and 子卯.
const PUNISHMENT: [(usize, usize); 7] = [(2, 5), (5, 8), (8, 2), (1, 10), (10, 7), (7, 1), (0, 3)];
/// 辰, 午, 酉 and 亥 punish themselves.
const SELF_PUNISHING: [usize; 4] = [4, 6, 9, 11];
/// Element of each three-harmony frame, indexed by `branch % 4`.
const TRIAD_ELEMENT: [&str; 4] = ["Water (水)", "Metal (金)", "Fire (火)", "Wood (木)"];

/// Branches eligible as wealth vaults (财库).
pub const VAULT_BRANCHES: [&str; 4] = ["辰", "戌", "丑", "未"];

pub fn branch_index(branch: &str) -> Option<usize> {
    BRANCHES.iter().position(|b| *b == branch.trim())
}

/// A fixed relation between two earthly branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRelation {
    Clash,
    SixHarmony,
    Harm,
    Punishment,
    SelfPunishment,
    ThreeHarmony,
}

impl BranchRelation {
    pub fn label(self) -> &'static str {
        match self {
            BranchRelation::Clash => "clash (冲)",
            BranchRelation::SixHarmony => "six harmony (六合)",
            BranchRelation::Harm => "harm (害)",
            BranchRelation::Punishment => "punishment (刑)",
            BranchRelation::SelfPunishment => "self-punishment (自刑)",
            BranchRelation::ThreeHarmony => "three-harmony partner (三合)",
        }
    }
}

/// Every relation between `a` and `b`. Empty when either is not a branch.
pub fn branch_relations(a: &str, b: &str) -> Vec<BranchRelation> {
    let (Some(i), Some(j)) = (branch_index(a), branch_index(b)) else {
        return Vec::new();
    };
    if i == j {
        return if SELF_PUNISHING.contains(&i) {
            vec![BranchRelation::SelfPunishment]
        } else {
            Vec::new()
        };
    }
    let mut relations = Vec::new();
    if (i + 6) % 12 == j {
        relations.push(BranchRelation::Clash);
    }
    if HARMONY[i] == j {
        relations.push(BranchRelation::SixHarmony);
    }
    if HARM[i] == j {
        relations.push(BranchRelation::Harm);
    }
    if PUNISHMENT.iter().any(|&(x, y)| (x, y) == (i, j) || (x, y) == (j, i)) {
        relations.push(BranchRelation::Punishment);
    }
    if i % 4 == j % 4 {
        relations.push(BranchRelation::ThreeHarmony);
    }
    relations
}

/// `branch_relations` rendered for a prompt.
pub fn describe_relations(a: &str, b: &str) -> String {
    let relations = branch_relations(a, b);
    if relations.is_empty() {
        "no clash, combination, harm or punishment".to_string()
    } else {
        relations
            .iter()
            .map(|r| r.label())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// The ten god `stem` plays for a Day Master, e.g. 丙 for 甲 is 食神.
pub fn ten_god_of(day_master: &str, stem: &str) -> Option<&'static str> {
    let dm = STEMS.iter().position(|s| *s == day_master.trim())?;
    let other = STEMS.iter().position(|s| *s == stem.trim())?;
    let same_polarity = dm % 2 == other % 2;
    // Elements advance in generating order: wood, fire, earth, metal, water.
    let god = match ((other / 2 + 5 - dm / 2) % 5, same_polarity) {
        (0, true) => "比肩",
        (0, false) => "劫财",
        (1, true) => "食神",
        (1, false) => "伤官",
        (2, true) => "偏财",
        (2, false) => "正财",
        (3, true) => "七杀",
        (3, false) => "正官",
        (4, true) => "偏印",
        _ => "正印",
    };
    Some(god)
}

/// The stem and branch governing a calendar year (by the solar new year).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearPillar {
    pub year: i32,
    stem: usize,
    branch: usize,
}

impl YearPillar {
    pub fn for_year(year: i32) -> Self {
        // 4 CE was a 甲子 year.
        let offset = year - 4;
        Self {
            year,
            stem: offset.rem_euclid(10) as usize,
            branch: offset.rem_euclid(12) as usize,
        }
    }

    pub fn current() -> Self {
        Self::for_year(Utc::now().year())
    }

    pub fn stem(&self) -> &'static str {
        STEMS[self.stem]
    }

    pub fn branch(&self) -> &'static str {
        BRANCHES[self.branch]
    }

    pub fn gan_zhi(&self) -> String {
        format!("{}{}", self.stem(), self.branch())
    }

    /// The branch directly opposite the year branch.
    pub fn clash_branch(&self) -> &'static str {
        BRANCHES[(self.branch + 6) % 12]
    }

    pub fn harmony_branch(&self) -> &'static str {
        BRANCHES[HARMONY[self.branch]]
    }

    pub fn harm_branch(&self) -> &'static str {
        BRANCHES[HARM[self.branch]]
    }

    pub fn is_self_punishing(&self) -> bool {
        SELF_PUNISHING.contains(&self.branch)
    }

    /// The two branches completing the year branch's three-harmony frame.
    pub fn triad_partners(&self) -> [&'static str; 2] {
        let base = self.branch % 4;
        let mut partners = [0, 4, 8]
            .into_iter()
            .map(|k| base + k)
            .filter(|&i| i != self.branch)
            .map(|i| BRANCHES[i]);
        [
            partners.next().unwrap_or(MISSING_BRANCH),
            partners.next().unwrap_or(MISSING_BRANCH),
        ]
    }

    pub fn triad_element(&self) -> &'static str {
        TRIAD_ELEMENT[self.branch % 4]
    }
}

const MISSING_BRANCH: &str = "N/A";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2026_is_bing_wu() {
        let p = YearPillar::for_year(2026);
        assert_eq!(p.gan_zhi(), "丙午");
        assert_eq!(p.clash_branch(), "子");
        assert_eq!(p.harmony_branch(), "未");
        assert_eq!(p.harm_branch(), "丑");
        assert!(p.is_self_punishing());
        assert_eq!(p.triad_partners(), ["寅", "戌"]);
        assert_eq!(p.triad_element(), "Fire (火)");
    }

    #[test]
    fn test_known_years() {
        assert_eq!(YearPillar::for_year(1984).gan_zhi(), "甲子");
        assert_eq!(YearPillar::for_year(2024).gan_zhi(), "甲辰");
        assert_eq!(YearPillar::for_year(2025).gan_zhi(), "乙巳");
        assert!(!YearPillar::for_year(2025).is_self_punishing());
        assert_eq!(YearPillar::for_year(2025).triad_partners(), ["丑", "酉"]);
    }

    #[test]
    fn test_harmony_and_harm_are_symmetric() {
        for i in 0..12 {
            assert_eq!(HARMONY[HARMONY[i]], i);
            assert_eq!(HARM[HARM[i]], i);
        }
    }

    #[test]
    fn test_branch_relations() {
        assert_eq!(branch_relations("子", "午"), vec![BranchRelation::Clash]);
        assert_eq!(branch_relations("午", "丑"), vec![BranchRelation::Harm]);
        assert_eq!(branch_relations("午", "午"), vec![BranchRelation::SelfPunishment]);
        assert_eq!(branch_relations("寅", "寅"), vec![]);
        assert_eq!(branch_relations("寅", "午"), vec![BranchRelation::ThreeHarmony]);
        assert_eq!(
            branch_relations("寅", "巳"),
            vec![BranchRelation::Harm, BranchRelation::Punishment]
        );
        assert_eq!(branch_relations("子", "卯"), vec![BranchRelation::Punishment]);
        assert_eq!(branch_relations("N/A", "午"), vec![]);
        assert_eq!(describe_relations("午", "未"), "six harmony (六合)");
        assert_eq!(describe_relations("午", "卯"), "no clash, combination, harm or punishment");
    }

    #[test]
    fn test_ten_god_of() {
        assert_eq!(ten_god_of("甲", "丙"), Some("食神"));
        assert_eq!(ten_god_of("壬", "丙"), Some("偏财"));
        assert_eq!(ten_god_of("壬", "丁"), Some("正财"));
        assert_eq!(ten_god_of("丙", "壬"), Some("七杀"));
        assert_eq!(ten_god_of("乙", "壬"), Some("正印"));
        assert_eq!(ten_god_of("庚", "辛"), Some("劫财"));
        assert_eq!(ten_god_of("N/A", "丙"), None);
    }
}
