//! Fixed vocabulary of the assessment: competencies, levels, pronoun sets and tiers.

use std::fmt;

use serde::Serialize;

// ────────────────────────────────────────────────────────────────────────────
// Competency
// ────────────────────────────────────────────────────────────────────────────

/// One of the eight scored leadership dimensions.
///
/// Variant order IS the declaration order used for every tie-break.
/// Do not reorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Competency {
    OverallLeadership,
    ReasoningProblemSolving,
    DrivesResults,
    DevelopsTalent,
    ManagesStakeholders,
    ThinksStrategically,
    SolvesChallenges,
    SteersChange,
}

/// Which interpretation table a competency draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetencyGroup {
    /// Opening sentence and optional strength/development material.
    Overall,
    /// Body paragraph; text varies by `Level`.
    LevelSpecific,
}

impl Competency {
    /// All eight competencies in declaration order.
    pub const ALL: [Competency; 8] = [
        Competency::OverallLeadership,
        Competency::ReasoningProblemSolving,
        Competency::DrivesResults,
        Competency::DevelopsTalent,
        Competency::ManagesStakeholders,
        Competency::ThinksStrategically,
        Competency::SolvesChallenges,
        Competency::SteersChange,
    ];

    pub const OVERALL: [Competency; 2] = [
        Competency::OverallLeadership,
        Competency::ReasoningProblemSolving,
    ];

    pub const LEVEL_SPECIFIC: [Competency; 6] = [
        Competency::DrivesResults,
        Competency::DevelopsTalent,
        Competency::ManagesStakeholders,
        Competency::ThinksStrategically,
        Competency::SolvesChallenges,
        Competency::SteersChange,
    ];

    /// Column header / display name as it appears in the input table.
    pub fn name(self) -> &'static str {
        match self {
            Competency::OverallLeadership => "Overall Leadership",
            Competency::ReasoningProblemSolving => "Reasoning & Problem Solving",
            Competency::DrivesResults => "Drives Results",
            Competency::DevelopsTalent => "Develops Talent",
            Competency::ManagesStakeholders => "Manages Stakeholders",
            Competency::ThinksStrategically => "Thinks Strategically",
            Competency::SolvesChallenges => "Solves Challenges",
            Competency::SteersChange => "Steers Change",
        }
    }

    pub fn group(self) -> CompetencyGroup {
        match self {
            Competency::OverallLeadership | Competency::ReasoningProblemSolving => {
                CompetencyGroup::Overall
            }
            _ => CompetencyGroup::LevelSpecific,
        }
    }

    /// Position in declaration order (0-based).
    pub fn priority(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Level
// ────────────────────────────────────────────────────────────────────────────

/// Career-stage context selecting which level-specific table applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Apply,
    Shape,
    Guide,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Apply, Level::Shape, Level::Guide];

    /// Case-insensitive parse of `Apply|Shape|Guide`. Returns `None` for anything else.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "apply" => Some(Level::Apply),
            "shape" => Some(Level::Shape),
            "guide" => Some(Level::Guide),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Level::Apply => "Apply",
            Level::Shape => "Shape",
            Level::Guide => "Guide",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pronoun set
// ────────────────────────────────────────────────────────────────────────────

/// Pronouns the generated text must agree with. Passed through untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PronounSet {
    #[serde(rename = "he/him")]
    HeHim,
    #[serde(rename = "she/her")]
    SheHer,
    #[serde(rename = "they/them")]
    TheyThem,
}

impl PronounSet {
    /// Normalizes a free-form gender/pronoun cell.
    ///
    /// Accepts pronoun pairs ("She/Her", "he / him"), single pronouns and
    /// common gender words. Case and inner whitespace are ignored.
    pub fn normalize(value: &str) -> Option<Self> {
        let compact: String = value
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        match compact.as_str() {
            "he/him" | "he" | "him" | "male" | "m" | "man" => Some(PronounSet::HeHim),
            "she/her" | "she" | "her" | "female" | "f" | "woman" => Some(PronounSet::SheHer),
            "they/them" | "they" | "them" | "non-binary" | "nonbinary" | "nb" | "x" => {
                Some(PronounSet::TheyThem)
            }
            _ => None,
        }
    }

    /// Label used in the prompt's candidate block.
    pub fn label(self) -> &'static str {
        match self {
            PronounSet::HeHim => "He/Him",
            PronounSet::SheHer => "She/Her",
            PronounSet::TheyThem => "They/Them",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tier
// ────────────────────────────────────────────────────────────────────────────

/// Qualitative bucket derived from a score.
///
/// `ModerateHigh` / `ModerateLow` exist only for Overall Leadership;
/// every other competency uses `High` / `Moderate` / `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tier {
    High,
    ModerateHigh,
    Moderate,
    ModerateLow,
    Low,
}

impl Tier {
    pub fn label(self) -> &'static str {
        match self {
            Tier::High => "High",
            Tier::ModerateHigh => "Moderate-High",
            Tier::Moderate => "Moderate",
            Tier::ModerateLow => "Moderate-Low",
            Tier::Low => "Low",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_forms_used_in_plans() {
        assert_eq!(serde_json::to_value(Level::Shape).unwrap(), "SHAPE");
        assert_eq!(serde_json::to_value(PronounSet::TheyThem).unwrap(), "they/them");
        assert_eq!(serde_json::to_value(Tier::ModerateHigh).unwrap(), "ModerateHigh");
        assert_eq!(
            serde_json::to_value(Competency::DevelopsTalent).unwrap(),
            "DevelopsTalent"
        );
    }

    #[test]
    fn test_declaration_order_matches_all() {
        for (idx, c) in Competency::ALL.iter().enumerate() {
            assert_eq!(c.priority(), idx);
        }
    }

    #[test]
    fn test_groups_partition_all_competencies() {
        let overall = Competency::ALL
            .iter()
            .filter(|c| c.group() == CompetencyGroup::Overall)
            .count();
        assert_eq!(overall, Competency::OVERALL.len());
        assert_eq!(
            Competency::ALL.len() - overall,
            Competency::LEVEL_SPECIFIC.len()
        );
    }

    #[test]
    fn test_level_parse_is_case_insensitive() {
        assert_eq!(Level::parse("apply"), Some(Level::Apply));
        assert_eq!(Level::parse(" SHAPE "), Some(Level::Shape));
        assert_eq!(Level::parse("Guide"), Some(Level::Guide));
        assert_eq!(Level::parse("Lead"), None);
        assert_eq!(Level::parse(""), None);
    }

    #[test]
    fn test_pronoun_normalization() {
        assert_eq!(PronounSet::normalize("She/Her"), Some(PronounSet::SheHer));
        assert_eq!(PronounSet::normalize("he / him"), Some(PronounSet::HeHim));
        assert_eq!(PronounSet::normalize("Male"), Some(PronounSet::HeHim));
        assert_eq!(PronounSet::normalize("They/Them"), Some(PronounSet::TheyThem));
        assert_eq!(PronounSet::normalize("Non-binary"), Some(PronounSet::TheyThem));
        assert_eq!(PronounSet::normalize("unknown"), None);
        assert_eq!(PronounSet::normalize(""), None);
    }

    #[test]
    fn test_tier_labels() {
        assert_eq!(Tier::ModerateHigh.to_string(), "Moderate-High");
        assert_eq!(Tier::Low.to_string(), "Low");
    }
}
