//! Term scanning shared by the composer's tests and the Response Validator's contract checks.
//!
//! Prompts describe forbidden dividers and gendered vocabulary by category and never spell
//! them out, so these lists can be applied to prompts and generated text alike.

/// Divider glyph runs the generated report must never contain.
pub const FORBIDDEN_DIVIDERS: &[&str] = &[
    "---", "***", "___", "===", "~~~", "———", "──", "━━", "＝＝", "- - -", "* * *",
];

pub const ENGLISH_GENDERED_TERMS: &[&str] = &[
    "he", "him", "his", "himself", "she", "her", "hers", "herself", "husband", "wife",
    "boyfriend", "girlfriend",
];

/// Covers both simplified and traditional script.
pub const CHINESE_GENDERED_TERMS: &[&str] = &["他", "她", "丈夫", "妻子", "老公", "老婆"];

/// Everyday words in which 他 means "other" rather than "he". Masked before scanning.
/// Japanese never uses 他 as a pronoun, so its common compounds are listed too.
const NEUTRAL_COMPOUNDS: &[&str] = &[
    "其他", "他人", "他乡", "他鄉", "他国", "他國", "他处", "他處", "他日", "他者", "他方",
    "吉他", "利他", "排他", "その他", "他の",
];

pub const JAPANESE_GENDERED_TERMS: &[&str] = &["彼女", "彼氏", "旦那", "奥さん"];

pub const KOREAN_GENDERED_TERMS: &[&str] = &["그녀", "남편", "아내"];

pub const SPANISH_GENDERED_TERMS: &[&str] =
    &["él", "ella", "esposo", "esposa", "marido", "novio", "novia"];

/// Divider patterns present in `text`, in list order.
pub fn find_dividers(text: &str) -> Vec<&'static str> {
    FORBIDDEN_DIVIDERS
        .iter()
        .copied()
        .filter(|d| text.contains(d))
        .collect()
}

/// Prohibited terms present in `text`.
///
/// Latin-script terms match case-insensitively on word boundaries (`he` does not match
/// `the`); other scripts match as substrings once neutral compounds such as 其他 are masked.
pub fn find_prohibited_terms<'a>(text: &str, terms: &[&'a str]) -> Vec<&'a str> {
    let lowered = NEUTRAL_COMPOUNDS
        .iter()
        .fold(text.to_lowercase(), |acc, compound| acc.replace(compound, " "));
    terms
        .iter()
        .copied()
        .filter(|term| {
            let term_lower = term.to_lowercase();
            if is_latin_word(term) {
                contains_word(&lowered, &term_lower)
            } else {
                lowered.contains(&term_lower)
            }
        })
        .collect()
}

/// As `find_prohibited_terms`, ignoring occurrences of the subjects' own names:
/// a subject called "He Wei" is not a gendered pronoun.
pub fn find_prohibited_terms_outside_names<'a>(
    text: &str,
    terms: &[&'a str],
    names: &[&str],
) -> Vec<&'a str> {
    let masked = names
        .iter()
        .map(|n| n.trim().to_lowercase())
        .filter(|n| !n.is_empty())
        .fold(text.to_lowercase(), |acc, name| acc.replace(&name, " "));
    find_prohibited_terms(&masked, terms)
}

fn is_latin_word(term: &str) -> bool {
    !term.is_empty()
        && term
            .chars()
            .all(|c| c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c))
}

fn contains_word(haystack: &str, word: &str) -> bool {
    haystack.match_indices(word).any(|(i, m)| {
        let before = haystack[..i].chars().next_back();
        let after = haystack[i + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

/// Longest run of consecutive blank lines.
pub fn max_blank_run(text: &str) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for line in text.lines() {
        if line.trim().is_empty() {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}
