//! Output-language axis: the closed table of supported languages plus the free-text custom case.

use crate::instructions::terms::{
    CHINESE_GENDERED_TERMS, JAPANESE_GENDERED_TERMS, KOREAN_GENDERED_TERMS,
    SPANISH_GENDERED_TERMS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageCode {
    En,
    ZhHans,
    ZhHant,
    Ja,
    Ko,
    Es,
}

/// Used when the request names no language, an unknown code, or `custom` without a name.
pub const DEFAULT_LANGUAGE: LanguageCode = LanguageCode::ZhHans;

impl LanguageCode {
    pub const ALL: [LanguageCode; 6] = [
        LanguageCode::En,
        LanguageCode::ZhHans,
        LanguageCode::ZhHant,
        LanguageCode::Ja,
        LanguageCode::Ko,
        LanguageCode::Es,
    ];

    pub fn code(self) -> &'static str {
        match self {
            LanguageCode::En => "en",
            LanguageCode::ZhHans => "zh-CN",
            LanguageCode::ZhHant => "zh-TW",
            LanguageCode::Ja => "ja",
            LanguageCode::Ko => "ko",
            LanguageCode::Es => "es",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" | "en-gb" | "english" => Some(LanguageCode::En),
            "zh" | "zh-cn" | "zh-hans" | "zh-sg" => Some(LanguageCode::ZhHans),
            "zh-tw" | "zh-hant" | "zh-hk" => Some(LanguageCode::ZhHant),
            "ja" | "ja-jp" => Some(LanguageCode::Ja),
            "ko" | "ko-kr" => Some(LanguageCode::Ko),
            "es" | "es-es" | "es-mx" => Some(LanguageCode::Es),
            _ => None,
        }
    }
}

/// A request's language choice. `Custom` carries a validated, non-empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Language {
    Fixed(LanguageCode),
    Custom(String),
}

impl Language {
    /// Total over all inputs: anything unusable resolves to `DEFAULT_LANGUAGE`.
    pub fn from_request(code: Option<&str>, custom_name: Option<&str>) -> Self {
        let code = code.map(str::trim).unwrap_or_default();
        if code.eq_ignore_ascii_case("custom") {
            return match custom_name.map(str::trim).filter(|n| !n.is_empty()) {
                Some(name) => Language::Custom(name.to_string()),
                None => Language::Fixed(DEFAULT_LANGUAGE),
            };
        }
        Language::Fixed(LanguageCode::parse(code).unwrap_or(DEFAULT_LANGUAGE))
    }
}

/// How the minimum chapter length is counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Words,
    Characters,
}

impl LengthUnit {
    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::Words => "words",
            LengthUnit::Characters => "characters",
        }
    }
}

/// Third-person reference guidance, per gender path.
#[derive(Debug, Clone, Copy)]
pub struct PronounSet {
    pub male: &'static str,
    pub female: &'static str,
    pub neutral: &'static str,
}

/// One row of the fixed language table.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    pub code: LanguageCode,
    pub display_name: &'static str,
    pub opening: &'static str,
    pub closing: &'static str,
    pub addressing: &'static str,
    pub pronouns: PronounSet,
    /// Gendered vocabulary specific to this language, on top of English and Chinese.
    pub extra_gendered_terms: &'static [&'static str],
    pub length_unit: LengthUnit,
    pub generic_name: &'static str,
    /// `{name}` is replaced with the reader's name.
    pub fallback_message: &'static str,
}

pub fn builtin_profiles() -> Vec<LanguageProfile> {
    vec![
        LanguageProfile {
            code: LanguageCode::En,
            display_name: "English",
            opening: "Dear friend, welcome to your personal destiny reading.",
            closing: "May this reading light the path ahead of you.",
            addressing: "Address the reader directly as \"you\" throughout.",
            pronouns: PronounSet {
                male: "he / him",
                female: "she / her",
                neutral: "they / them, or the person's name",
            },
            extra_gendered_terms: &[],
            length_unit: LengthUnit::Words,
            generic_name: "friend",
            fallback_message: "Dear {name}, your complete reading is ready. Take your time with each chapter, and come back to it whenever you want clarity about the road ahead.",
        },
        LanguageProfile {
            code: LanguageCode::ZhHans,
            display_name: "Simplified Chinese (简体中文)",
            opening: "亲爱的朋友，您好！欢迎阅读您的专属命理解读。",
            closing: "愿这份解读照亮您前行的路。",
            addressing: "Address the reader with the respectful 您 throughout; never use the casual 你.",
            pronouns: PronounSet {
                male: "他",
                female: "她",
                neutral: "TA, 命主, or the person's name",
            },
            extra_gendered_terms: &[],
            length_unit: LengthUnit::Characters,
            generic_name: "朋友",
            fallback_message: "亲爱的{name}，您的完整命理报告已经生成。请慢慢阅读每一章，在需要方向时随时回来翻阅。",
        },
        LanguageProfile {
            code: LanguageCode::ZhHant,
            display_name: "Traditional Chinese (繁體中文)",
            opening: "親愛的朋友，您好！歡迎閱讀您的專屬命理解讀。",
            closing: "願這份解讀照亮您前行的路。",
            addressing: "Address the reader with the respectful 您 throughout; never use the casual 你.",
            pronouns: PronounSet {
                male: "他",
                female: "她",
                neutral: "TA, 命主, or the person's name",
            },
            extra_gendered_terms: &[],
            length_unit: LengthUnit::Characters,
            generic_name: "朋友",
            fallback_message: "親愛的{name}，您的完整命理報告已經生成。請慢慢閱讀每一章，在需要方向時隨時回來翻閱。",
        },
        LanguageProfile {
            code: LanguageCode::Ja,
            display_name: "Japanese (日本語)",
            opening: "親愛なるあなたへ。あなただけの命理鑑定書をお届けします。",
            closing: "この鑑定が、これからの道を照らす灯となりますように。",
            addressing: "Address the reader as あなた or by name with さん, in polite です/ます style.",
            pronouns: PronounSet {
                male: "彼",
                female: "彼女",
                neutral: "この方, or the person's name with さん",
            },
            extra_gendered_terms: JAPANESE_GENDERED_TERMS,
            length_unit: LengthUnit::Characters,
            generic_name: "お客様",
            fallback_message: "{name}様、鑑定書がすべて完成いたしました。各章をゆっくりとお読みいただき、道に迷ったときはいつでも読み返してください。",
        },
        LanguageProfile {
            code: LanguageCode::Ko,
            display_name: "Korean (한국어)",
            opening: "친애하는 당신께, 당신만을 위한 명리 해석을 전해 드립니다.",
            closing: "이 해석이 앞으로의 길을 밝혀 주기를 바랍니다.",
            addressing: "Address the reader as 당신 or by name with 님, in polite 합니다 style.",
            pronouns: PronounSet {
                male: "그",
                female: "그녀",
                neutral: "이분, or the person's name with 님",
            },
            extra_gendered_terms: KOREAN_GENDERED_TERMS,
            length_unit: LengthUnit::Characters,
            generic_name: "고객",
            fallback_message: "{name}님, 전체 명리 보고서가 완성되었습니다. 각 장을 천천히 읽어 보시고, 방향이 필요할 때마다 다시 펼쳐 보세요.",
        },
        LanguageProfile {
            code: LanguageCode::Es,
            display_name: "Spanish (Español)",
            opening: "Le damos la bienvenida a su lectura personal del destino.",
            closing: "Que esta lectura ilumine el camino que tiene por delante.",
            addressing: "Address the reader with the formal usted throughout.",
            pronouns: PronounSet {
                male: "masculine third-person forms",
                female: "feminine third-person forms",
                neutral: "the person's name or \"la persona\"",
            },
            extra_gendered_terms: SPANISH_GENDERED_TERMS,
            length_unit: LengthUnit::Words,
            generic_name: "amistad",
            fallback_message: "Estimada persona lectora ({name}): su lectura completa ya está lista. Tómese su tiempo con cada capítulo y vuelva a leerla cuando necesite claridad sobre el camino.",
        },
    ]
}

/// Always-present vocabulary for the neutral path: English plus Chinese.
pub fn base_gendered_terms() -> Vec<&'static str> {
    crate::instructions::terms::ENGLISH_GENDERED_TERMS
        .iter()
        .chain(CHINESE_GENDERED_TERMS)
        .copied()
        .collect()
}
