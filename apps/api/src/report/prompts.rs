// Prompt text for chapter generation, verdict checks and customer summaries.
// Cross-stage fragments live in llm_client::prompts.
//
// Forbidden dividers and gendered vocabulary are described here by category only.
// The literal lists live in instructions::terms and are applied to composed prompts in tests.

/// First layer of every chapter system prompt.
pub const PERSONA: &str = "You are a senior BaZi (Four Pillars of Destiny, 八字) consultant \
    with decades of practice, writing one chapter of a premium personalised destiny report. \
    The pillars, element counts, luck cycles and scores were computed by a calculator and are \
    supplied as data. Interpret them; never recalculate or correct them.";

pub const FORMAT_CONTRACT: &str = "\
FORMATTING CONTRACT (hard rules):
1. Never draw horizontal rules or separator lines. A line made only of repeated dashes, \
asterisks, underscores, equals signs, tildes or box-drawing characters is forbidden, and so is \
any spaced-out version of such a line.
2. Use Markdown level-3 headings (### Heading) for major sections and level-4 headings \
(#### Heading) for sub-sections. Never use level-1 or level-2 headings.
3. Put each key judgement in bold (**like this**). Never combine bold with italics.
4. Separate paragraphs, headings and lists with exactly one blank line.
5. Never leave more than two consecutive blank lines anywhere in the chapter.";

pub const NEUTRAL_MANDATE: &str = "\
NEUTRAL LANGUAGE MANDATE: The gender identity in this reading is non-binary or unspecified. \
Do not use any gendered third-person pronoun, and do not use any gendered relationship or \
kinship noun, in any language, anywhere in the chapter. Refer to people by name, in the second \
person, or with neutral nouns such as partner, spouse, significant other, 伴侣, 配偶 or 另一半. \
Relationship analysis follows the dual-interpretation rule below.";

pub const PAIR_NEUTRAL_REMINDER: &str = "\
PAIRING REMINDER: At least one person in this pairing takes the neutral-language path. The \
neutral-language mandate therefore governs the whole chapter, including every sentence about a \
binary-gendered person. Refer to both people by name or with neutral nouns.";

/// Closing layer of every chapter system prompt.
/// Replace: {opening}, {closing}, {min_length}, {unit}, {language}
pub const STRUCTURAL_MANDATE_TEMPLATE: &str = "\
STRUCTURAL MANDATE:
- The chapter MUST begin with this exact line, reproduced character for character and untranslated:
{opening}
- The chapter MUST end with this exact line, reproduced character for character and untranslated:
{closing}
- Minimum length: {min_length} {unit} of {language} text, excluding the opening and closing lines.
- Final reminder: no separator lines of any kind. Sections are separated only by ### headings \
and single blank lines.";

// ────────────────────────────────────────────────────────────────────────────
// Chapter templates (user prompt)
// ────────────────────────────────────────────────────────────────────────────

/// Replace: {title}, {name}, {anchor}, {day_master}, {day_master_status}, {month_branch},
///          {strongest}, {weakest}, {hidden_stems}, {year_nayin}, {month_nayin},
///          {month_ten_god}, {current_cycle}, {context}
pub const CORE_TEMPLATE: &str = r#"Write the chapter "{title}" for {name}.

{anchor}

Quote and build on these chart facts:
- Day Master: {day_master} (status: {day_master_status})
- Month Branch, the seasonal command: {month_branch}
- Strongest and weakest element: {strongest} / {weakest}
- Hidden stems: {hidden_stems}
- NaYin of the Year and Month Pillars: {year_nayin} / {month_nayin}
- Month Pillar ten god: {month_ten_god}
- Current luck cycle: {current_cycle}

Work through these steps in order:
1. Day Master origin. Compare the Day Master with the Month Branch: a supporting month puts the
   Day Master in season, any other month leaves it out of season. Weigh this with the element
   counts, then portray the person through a nature image drawn from the Day Master and season.
2. Hidden personality. Heavenly stems show the outward face and hidden stems the inner self.
   Where the Day Branch hidden stems differ from the visible stems, describe the gap between
   surface and inner nature, including latent talents.
3. Roots and family. The Year Pillar stands for ancestry and the Month Pillar for parents and
   upbringing. Read the two NaYin together: a generating relation suggests a harmonious early
   home, a controlling one suggests leaving home early.
4. Chart structure. Name the structure (格局) from the Month Pillar ten god, for example the
   Seven Killings structure (七杀格) or the Thriving Official structure (建禄格), and assess its quality.

Close with core strengths, blind spots, and how the current luck cycle colours this decade.

CHART DATA:
{context}"#;

/// Replace: {title}, {name}, {anchor}, {day_master}, {wealth_stars}, {vaults}, {output_stars},
///          {officer_stars}, {weakest}, {month_ten_god}, {current_cycle}, {context}
pub const WEALTH_TEMPLATE: &str = r#"Write the chapter "{title}" for {name}.

{anchor}

Quote and build on these chart facts:
- Day Master: {day_master}
- Wealth Stars on the four pillars: {wealth_stars}
- Wealth vault branches (辰, 戌, 丑, 未) on the four pillars: {vaults}
- Output stars (食神, 伤官): {output_stars}
- Officer stars (正官, 七杀): {officer_stars}
- Weakest element, the first candidate for the useful element: {weakest}
- Month Pillar ten god, the career structure: {month_ten_god}
- Current luck cycle: {current_cycle}

Work through these steps in order:
1. Wealth stars and vaults. A Wealth Star on a heavenly stem means visible money and a concern
   for appearances; one held in a branch means savings. A vault branch stores wealth. Decide
   whether the chart favours Direct Wealth (salaried, steady) or Indirect Wealth (investing, business).
2. Career element. From the Day Master's strength, settle the useful element, then name exactly
   3 concrete modern industries that belong to that element.
3. Working style. Output stars point to creative or technical work, officer stars to management
   and authority. Judge whether a specialist, management or independent path suits this chart.
4. Luck cycle trend. Judge whether the current luck cycle supports or drains the Day Master and
   whether this decade accumulates or spends wealth.

Close with risks to money and concrete actions for each period.

CHART DATA:
{context}"#;

/// Replace: {title}, {name}, {anchor}, {day_master}, {day_branch}, {month_branch},
///          {hour_branch}, {day_month_relation}, {day_hour_relation}, {romance_stars},
///          {current_cycle}, {relational_hint}, {context}
pub const LOVE_TEMPLATE: &str = r#"Write the chapter "{title}" for {name}.

{anchor}

Quote and build on these chart facts:
- Day Master: {day_master}
- Day Branch, the partnership palace: {day_branch}
- Day Branch against the Month Branch {month_branch}: {day_month_relation}
- Day Branch against the Hour Branch {hour_branch}: {day_hour_relation}
- Relationship stars: {romance_stars}
- Current luck cycle: {current_cycle}
{relational_hint}
Work through these steps in order:
1. Partnership palace. Judge whether the Day Branch element supports or pressures the Day
   Master, and portray the partner this suggests: temperament and capability.
2. Clashes and combinations. A clash on the partnership palace signals an unsettled partnership;
   advise later commitment or time apart handled deliberately. A combination signals attraction
   and cohesion. A harm or punishment signals friction to manage.
3. Relationship stars. 桃花 (Peach Blossom) means strong attraction and popularity, 红艳 (Red
   Romance) charm and passion, 孤辰 or 寡宿 (the solitary stars) an inner solitude to address.
4. Timing. Name the coming years whose branch combines with the partnership palace as the
   likeliest years to meet a partner or to commit.

Close with practical ways to nurture a lasting partnership.

CHART DATA:
{context}"#;

/// Replace: {title}, {name}, {anchor}, {forecast_year}, {year_gan_zhi}, {year_stem},
///          {year_ten_god}, {clash_branch}, {harmony_branch}, {harm_branch},
///          {self_punishment}, {triad}, {natal_hits}, {day_master}, {day_branch},
///          {current_cycle}, {context}
pub const FORECAST_TEMPLATE: &str = r#"Write the chapter "{title}" for {name}, covering the year {forecast_year}.

{anchor}

Quote and build on these chart facts:
- The year {forecast_year} is a {year_gan_zhi} year. Its branch clashes with {clash_branch}, combines with {harmony_branch} and harms {harm_branch}.
- Self-punishment: {self_punishment}
- Three-harmony frame: {triad}
- Natal branches touched by the year branch: {natal_hits}
- The year stem {year_stem} is the {year_ten_god} of the Day Master {day_master}.
- Day Branch: {day_branch}
- Current luck cycle: {current_cycle}

Work through these steps in order:
1. Core clashes and combinations. Open the chapter by naming the main risk or opportunity of
   {forecast_year}, based on the natal branches the year branch clashes, harms, punishes or
   joins in a three-harmony frame.
2. Ten-god theme. From the ten god of the year stem, define the year as an output year
   (creation and enjoyment), an officer year (pressure and career), a wealth year, a resource
   year or a peer year.
3. Month by month. Write one #### section for every lunar month in order, from the first month
   (正月) through the twelfth month (十二月). For each month relate its pillar to the chart and
   give concrete advice for career, wealth, relationships and health.

Close with the most favourable and most demanding months and concrete actions with their timing.

CHART DATA:
{context}"#;

/// Replace: {title}, {name_a}, {name_b}, {anchor}, {day_master_a}, {day_master_b},
///          {day_branch_a}, {day_branch_b}, {zodiac_a}, {zodiac_b}, {context}
pub const PAIR_OVERVIEW_TEMPLATE: &str = r#"Write the chapter "{title}" for {name_a} and {name_b}.

{anchor}

Quote and build on these chart facts:
- Day Masters: {name_a} {day_master_a}, {name_b} {day_master_b}
- Day Branches: {name_a} {day_branch_a}, {name_b} {day_branch_b}
- Zodiac: {name_a} {zodiac_a}, {name_b} {zodiac_b}

Cover the essential character of each person, how the two Day Masters interact, the overall
dynamic of the pairing, and its main strengths and growth areas.

{context}"#;

/// Replace: {title}, {name_a}, {name_b}, {anchor}, {day_master_a}, {day_master_b},
///          {scores}, {context}
pub const PAIR_COMPATIBILITY_TEMPLATE: &str = r#"Write the chapter "{title}" for {name_a} and {name_b}.

{anchor}

Quote and build on these chart facts:
- Day Masters: {name_a} {day_master_a}, {name_b} {day_master_b}

{scores}

Give each dimension its own section. Close with what the total and level mean in daily life.

{context}"#;

/// Replace: {title}, {name_a}, {name_b}, {anchor}, {month_ten_god_a}, {month_ten_god_b},
///          {strongest_a}, {strongest_b}, {context}
pub const PAIR_COMMUNICATION_TEMPLATE: &str = r#"Write the chapter "{title}" for {name_a} and {name_b}.

{anchor}

Quote and build on these chart facts:
- Month Pillar ten gods: {name_a} {month_ten_god_a}, {name_b} {month_ten_god_b}
- Strongest elements: {name_a} {strongest_a}, {name_b} {strongest_b}

Cover how each person expresses needs and handles stress, where misunderstandings arise, how
conflicts typically escalate, and concrete habits that keep communication open.

{context}"#;

/// Replace: {title}, {name_a}, {name_b}, {anchor}, {wealth_stars_a}, {wealth_stars_b},
///          {current_cycle_a}, {current_cycle_b}, {context}
pub const PAIR_WEALTH_CAREER_TEMPLATE: &str = r#"Write the chapter "{title}" for {name_a} and {name_b}.

{anchor}

Quote and build on these chart facts:
- Wealth Stars: {name_a} {wealth_stars_a}; {name_b} {wealth_stars_b}
- Current luck cycles: {name_a} {current_cycle_a}; {name_b} {current_cycle_b}

Cover how the two approach money and work, whether joint ventures suit them, how to divide
financial roles, and the periods that favour or strain shared finances.

{context}"#;

/// Replace: {title}, {name_a}, {name_b}, {anchor}, {day_branch_a}, {day_branch_b},
///          {day_branch_relation}, {current_cycle_a}, {current_cycle_b}, {relational_hint},
///          {context}
pub const PAIR_LOVE_MARRIAGE_TEMPLATE: &str = r#"Write the chapter "{title}" for {name_a} and {name_b}.

{anchor}

Quote and build on these chart facts:
- Partnership palaces (Day Branches): {name_a} {day_branch_a}, {name_b} {day_branch_b}
- Relation between the two partnership palaces: {day_branch_relation}
- Current luck cycles: {name_a} {current_cycle_a}; {name_b} {current_cycle_b}
{relational_hint}
Cover emotional needs, intimacy and commitment, the long-term outlook of the partnership, the
years most favourable for major commitments, and the care each person can offer the other.

{context}"#;

/// Replace: {title}, {name_a}, {name_b}, {anchor}, {forecast_year}, {year_gan_zhi},
///          {year_stem}, {clash_branch}, {harmony_branch}, {harm_branch}, {self_punishment},
///          {triad}, {day_branch_a}, {day_branch_b}, {natal_hits_a}, {natal_hits_b},
///          {day_master_a}, {day_master_b}, {year_ten_god_a}, {year_ten_god_b}, {context}
pub const PAIR_FORECAST_TEMPLATE: &str = r#"Write the chapter "{title}" for {name_a} and {name_b}, covering the year {forecast_year}.

{anchor}

Quote and build on these chart facts:
- The year {forecast_year} is a {year_gan_zhi} year. Its branch clashes with {clash_branch}, combines with {harmony_branch} and harms {harm_branch}.
- Self-punishment: {self_punishment}
- Three-harmony frame: {triad}
- Day Branches: {name_a} {day_branch_a}, {name_b} {day_branch_b}
- Natal branches touched by the year branch: {name_a} {natal_hits_a}; {name_b} {natal_hits_b}
- The year stem {year_stem} is the {year_ten_god_a} of {name_a}'s Day Master {day_master_a} and the {year_ten_god_b} of {name_b}'s Day Master {day_master_b}.

Cover the shared theme of {forecast_year}, how the year affects each person and the pairing,
and the most favourable and most demanding months together, going through the lunar months in
order from the first month (正月) to the twelfth month (十二月). Close with joint actions and
their timing.

{context}"#;

// ────────────────────────────────────────────────────────────────────────────
// Response Validator
// ────────────────────────────────────────────────────────────────────────────

pub const VALIDATION_SYSTEM: &str = "You are a meticulous quality reviewer for BaZi destiny \
    reports. You check a generated report against the chart facts it was written from and \
    against the report's writing contract.";

/// Replace: {facts}, {language}, {tone}, {excerpt_note}, {excerpt}
pub const VALIDATION_PROMPT_TEMPLATE: &str = r#"Review the report below.

Return a JSON object with this EXACT schema (no extra fields):
{
  "status": "PASS",
  "confidence": 85,
  "summary": "One or two sentences on overall quality.",
  "issues": [
    {"severity": "high", "description": "What is wrong and where."}
  ],
  "recommendation": "What the operator should do before delivery."
}

STATUS: "PASS" when no high-severity issue exists, otherwise "NEEDS_REVIEW".
CONFIDENCE: an integer from 0 to 100.
SEVERITY: "high" for factual contradictions of the chart data or harmful claims, "medium" for
contract violations, "low" for style problems.

Check that:
- Day Master, pillars and luck cycles quoted in the report match the chart facts.
- The report does not contradict itself across chapters.
- The report is written in {language}.
- The tone is {tone}; no outcome is presented as unavoidable fate.
- Every negative claim carries a mitigating action or a timing window.

CHART FACTS:
{facts}

REPORT{excerpt_note}:
{excerpt}"#;

// ────────────────────────────────────────────────────────────────────────────
// Report Finalizer
// ────────────────────────────────────────────────────────────────────────────

pub const SUMMARY_SYSTEM: &str = "You are the client-care voice of a BaZi consultancy. You \
    write a short, warm message to a customer who has just received a complete destiny report. \
    Plain text only: no headings, no lists and no separator lines.";

/// Replace: {names}, {language}, {addressing_rule}, {excerpt}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Write a message of 80 to 150 words in {language} to {names}.

{addressing_rule}

Mention 3 to 5 concrete highlights from the report below: for example a core strength, a
favourable period or a practical suggestion. Invite the reader to return to the report when
decisions come up. Output only the message text.

REPORT:
{excerpt}"#;
