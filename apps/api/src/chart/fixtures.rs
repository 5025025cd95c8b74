//! Chart payloads shared by tests across modules.

use serde_json::{json, Value};

use crate::chart::formatter::{prepare_subject, PreparedSubject};

/// A complete chart as the upstream calculator would send it.
pub fn sample_chart_value(gender: &str) -> Value {
    json!({
        "identity": {"name": "Alex Chen", "gender": gender},
        "year": {"stem": "甲", "branch": "子", "element": "Wood", "nayin": "海中金",
                 "hiddenStems": "癸", "tenGod": "正财", "lifeStage": "沐浴", "isVoid": false},
        "month": {"stem": "丙", "branch": "寅", "element": "Fire", "nayin": "炉中火",
                  "hiddenStems": ["甲", "丙", "戊"], "tenGod": "食神", "lifeStage": "病", "isVoid": false},
        "day": {"stem": "壬", "branch": "午", "element": "Water", "nayin": "杨柳木",
                "hiddenStems": ["丁", "己"], "tenGod": "日主", "lifeStage": "胎", "isVoid": false},
        "hour": {"stem": "庚", "branch": "戌", "element": "Metal", "nayin": "钗钏金",
                 "hiddenStems": ["戊", "辛", "丁"], "tenGod": "七杀", "lifeStage": "冠带", "isVoid": true},
        "dayMaster": "壬",
        "dayMasterStatus": "balanced",
        "strength": {"same": 4, "diff": 5},
        "fiveElements": {"wood": 2, "fire": 2, "earth": 1, "metal": 1, "water": 3},
        "palaces": {"lifePalace": "丁未", "bodyPalace": "己酉", "conceptionPalace": "丁巳"},
        "zodiacAnimals": ["Rat (鼠)"],
        "luckCycles": [
            {"index": 1, "ganZhi": "甲戌", "startAge": 8, "endAge": 17, "startYear": 2006, "endYear": 2015},
            {"index": 2, "ganZhi": "乙亥", "startAge": 18, "endAge": 27, "startYear": 2016, "endYear": 2025, "isCurrent": true},
            {"index": 3, "ganZhi": "丙子", "startAge": 28, "endAge": 37, "startYear": 2026, "endYear": 2035}
        ],
        "annualCycle": {"year": 2026, "ganZhi": "丙午"},
        "stars": {"auspicious": ["天乙贵人", "文昌"], "inauspicious": ["孤辰"]},
        "shenSha": ["桃花"]
    })
}

pub fn sample_subject(gender: &str) -> PreparedSubject {
    prepare_subject(&sample_chart_value(gender))
}

/// Second person for pairing tests.
pub fn partner_subject(gender: &str) -> PreparedSubject {
    let mut value = sample_chart_value(gender);
    value["identity"]["name"] = json!("Sam Lee");
    value["dayMaster"] = json!("丁");
    value["day"] = json!({"stem": "丁", "branch": "卯", "nayin": "炉中火", "tenGod": "日主"});
    value["month"]["tenGod"] = json!("正官");
    prepare_subject(&value)
}

/// A six-dimension pairing score table as the upstream scorer sends it.
pub fn sample_scores_value() -> Value {
    json!({
        "dimensions": [
            {"key": "dayMaster", "label": "Day Master Harmony", "score": 18, "max": 20, "description": "壬 and 丁 combine"},
            {"key": "elements", "label": "Element Balance", "score": 12.5, "max": 20, "description": "Water meets Fire"},
            {"key": "branches", "label": "Day Branch Relation", "score": 8, "max": 15, "description": "午 and 卯 break"},
            {"key": "zodiac", "label": "Zodiac Affinity", "score": 10, "max": 15, "description": ""},
            {"key": "stars", "label": "Relational Stars", "score": 11, "max": 15, "description": "mutual support"},
            {"key": "cycles", "label": "Luck Cycle Timing", "score": 7.25, "max": 15, "description": "cycles overlap"}
        ],
        "total": 66.75,
        "maxTotal": 100,
        "level": "Good Match"
    })
}
