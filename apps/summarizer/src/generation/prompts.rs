//! Prompt assembly for summary generation.
//!
//! The static preamble (persona, competency context, interpretation rules,
//! structure rules, exemplars) is rendered once per process; each candidate
//! only appends its selection plan and task block.

use std::fmt::Write;

use crate::generation::composer::{SelectedFragment, SummaryPlan};
use crate::models::candidate::CandidateRecord;
use crate::models::competency::{Competency, CompetencyGroup, Level};
use crate::scoring::bucketer::{thresholds_for, MAX_SCORE};
use crate::scoring::interpretations::{FragmentError, InterpretationTable};

/// Output keys the model must return, in order.
pub const OUTPUT_KEYS: [&str; 3] = ["summary_200", "summary_150", "summary_100"];

pub const PERSONA: &str = r#"<persona>
You are an expert Assessment Analyst and professional writer for a leading leadership development firm. Your writing style is insightful, constructive, neutral, and professional, using American English. You write exclusively in the third person and present tense. You are a master at translating quantitative competency scores into a personalized, qualitative summary that is both encouraging and clear. Your primary goal is to create a seamless, flowing narrative, closely following the style and tone of the provided exemplars. You must avoid jargon, robotic phrasing, and repetitive sentence structures. You will rigorously adhere to the gender-specific pronouns provided in the candidate data.
</persona>"#;

pub const STRUCTURE_RULES: &str = r#"**PART C: SUMMARY STRUCTURE AND EXECUTION**
1.  **Opening Sentence:** Your summary MUST begin with the opening sentence given in the selection plan, verbatim.
2.  **Main Body Paragraph:** Following the opening, weave the body material from the selection plan into a natural paragraph, in the order given (highest score first), mirroring the style of the exemplars. DO NOT name the competencies.
3.  **Bullet Points:** Provide exactly two strengths and two development areas, derived from the strength and development material in the selection plan. The bullet points MUST NOT repeat sentences from the main summary. They must be complementary, behavioral statements derived from the interpretation text, as shown in the exemplars.
4.  **Length Variants:** Write the same summary at approximately 200, 150 and 100 words. Only the compression of the prose differs; every variant keeps the opening sentence, a body paragraph, and both bullet lists with two bullets each."#;

const EXEMPLARS: &str = r##"
<exemplars>
Here are four golden standard examples. Study them carefully to understand the expected narrative style, tone, and structure, and how to adapt the summary for different lengths.

**--- EXAMPLE 1 ---**
<candidate_data>
* Name: Sub 1
* Gender (for pronouns): She/Her
* Level: Apply
* Scores:
    * Overall Leadership: 4
    * Reasoning & Problem Solving: 4
    * Drives Results: 4
    * Develops Talent: 3
    * Manages Stakeholder: 4
    * Thinks Strategically: 4
    * Solves Challenges: 5
    * Steers Change: 4
</candidate_data>
<sme_written_output>
{
  "summary_200": "Sub 1 demonstrates high potential for growth and success in a more complex role. She demonstrates high motivation to exceed expectations and strong drive to achieve goals. She shows a strong capability to lead and inspire others, building relationships with ease and enjoying social interactions. She has strong focus on the bigger picture, thrives in change and complexity, and consistently addresses problems with confidence and resilience. While she focuses on personal and professional growth and engages in learning activities, she may not do so consistently and may need guidance to work through conflicts.\n\n**Strengths:**\n* Takes a diligent, practical, and solution-focused approach to solving issues.\n* Will likely remain composed in the face of setbacks and approach problems with a positive attitude.\n\n**Development Areas:**\n* Could benefit from developing a greater openness to learning and unlearning.\n* May benefit from ensuring conflicts are addressed when they arise.",
  "summary_150": "Sub 1 demonstrates high potential for growth and success. With high motivation and a strong drive for results, she capably leads and inspires others while building relationships with ease. She maintains a strong focus on the bigger picture, thrives in complexity, and addresses challenges with confidence. Her main area for development is to apply that same consistency to her personal growth and in proactively resolving team conflicts.\n\n**Strengths:**\n* Takes a diligent, practical, and solution-focused approach to solving issues.\n* Remains composed in the face of setbacks and approaches problems with a positive attitude.\n\n**Development Areas:**\n* Could benefit from developing a greater openness to learning and unlearning.\n* May benefit from ensuring conflicts are addressed when they arise."
}
</sme_written_output>

**--- EXAMPLE 2 ---**
<candidate_data>
* Name: John Doe
* Gender (for pronouns): He/Him
* Level: Apply
* Scores:
    * Overall Leadership: 3
    * Reasoning & Problem Solving: 3
    * Drives Results: 2
    * Develops Talent: 2
    * Manages Stakeholder: 3
    * Thinks Strategically: 3
    * Solves Challenges: 3
    * Steers Change: 3
</candidate_data>
<sme_written_output>
{
  "summary_200": "John Doe demonstrates moderate potential for growth and success in a more complex role. He may not show a consistent drive to exceed expectations. Engagement in learning is limited and he may resist feedback or change. He displays some ability to build relationships, and address problems, though he may need support or time to build confidence. While he demonstrates awareness of the bigger picture, he may need occasional guidance. He generally copes with change and can adapt when needed.\n\n**Strengths:**\n* Works to build long-term relationships and shows some understanding of stakeholder needs.\n* Operates with a degree of comfort when facts are not fully available and supports change initiatives.\n\n**Development Areas:**\n* Could benefit from developing greater perseverance when faced with setbacks and a stronger focus on tracking outcomes against goals.\n* Could focus on working more collaboratively with team members and proactively contributing to resolving conflicts.",
  "summary_150": "John Doe demonstrates moderate potential for growth and success. While he can adapt to change and shows an awareness of the bigger picture, he may require guidance. He displays some ability to build relationships and address problems but would benefit from building more confidence. His key development areas are increasing his consistent drive to exceed expectations and being more proactive in his engagement with learning and feedback.\n\n**Strengths:**\n* Works to build long-term relationships with some understanding of stakeholder needs.\n* Operates with a degree of comfort when facts are not fully available.\n\n**Development Areas:**\n* Could benefit from greater perseverance and a stronger focus on tracking outcomes against goals.\n* Could focus on working more collaboratively and proactively resolving conflicts."
}
</sme_written_output>

**--- EXAMPLE 3 ---**
<candidate_data>
* Name: Ayesha Obaid Al Mheiri
* Gender (for pronouns): She/Her
* Level: Shape
* Scores:
    * Overall Leadership: 2.97
    * Reasoning & Problem Solving: 3
    * Drives Results: 2.97
    * Develops Talent: 3.15
    * Manages Stakeholder: 2.92
    * Thinks Strategically: 3.38
    * Solves Challenges: 3.92
    * Steers Change: 2.89
</candidate_data>
<sme_written_output>
{
  "summary_200": "Ayesha Obaid Al Mheiri demonstrates moderate potential for growth and success in a more complex role. She occasionally takes initiatives and demonstrates motivation. She focuses on personal and professional growth but may not do so consistently. Ayesha displays the ability to lead and inspire others and build and maintain relationships. She shows awareness of the bigger picture but may need occasional guidance to translate broader goals into action. She addresses problems with confidence, applies a practical and solution-focused approach, and handles ambiguity well. She generally adapts to change when needed, though may require support to remain flexible or decisive in uncertain situations.\n\n**Strengths:**\n* Consistently addresses problems and challenges with confidence and resilience.\n* Occasionally translates organisational goals into meaningful actions.\n\n**Development Areas:**\n* May need support to remain flexible or decisive in uncertain situations.\n* May show empathy and focus on people inconsistently.",
  "summary_150": "Ayesha Obaid Al Mheiri demonstrates moderate potential for growth. She shows awareness of the bigger picture and confidently addresses problems with a solution-focused approach. She can lead and adapt to change, though may need support to remain decisive in uncertain situations. Her development would be enhanced by a more consistent focus on her personal growth and in demonstrating empathy when managing stakeholder relationships.\n\n**Strengths:**\n* Consistently addresses problems and challenges with confidence and resilience.\n* Occasionally translates organizational goals into meaningful actions.\n\n**Development Areas:**\n* May need support to remain flexible or decisive in uncertain situations.\n* May show empathy and focus on people inconsistently."
}
</sme_written_output>

**--- EXAMPLE 4 ---**
<candidate_data>
* Name: Ali Salem Al Suwaidi
* Gender (for pronouns): He/Him
* Level: Apply
* Scores:
    * Overall Leadership: 2.55
    * Reasoning & Problem Solving: 3
    * Drives Results: 2.22
    * Develops Talent: 2.55
    * Manages Stakeholder: 2.36
    * Thinks Strategically: 2.47
    * Solves Challenges: 5
    * Steers Change: 1.43
</candidate_data>
<sme_written_output>
{
  "summary_200": "Ali Salem Al Suwaidi demonstrates moderate potential for growth and success in a more complex role. He may meet expectations but has limited drive to exceed them. Fulfillment from work or a desire to make an impact is limited. He focuses on personal and professional growth but may not do so consistently. He demonstrates limited capability to lead and inspire others and struggles to build relationships. His focus tends to be on immediate tasks, he struggles to address problems, may not take a solution-oriented approach and may rely heavily on others. However, he generally copes with change and can adapt when needed.\n\n**Strengths:**\n* Supports change initiatives and operate with comfort during uncertainty.\n* Focuses on personal and professional growth and engages in learning activities, though this may be inconsistent.\n\n**Development Areas:**\n* Enhance independent problem-solving and decision-making confidence.\n* Increase motivation, initiative, and perseverance in setbacks.",
  "summary_150": "Ali Salem Al Suwaidi demonstrates moderate potential for growth. While he can cope with change when needed, his focus tends to remain on immediate tasks. He may meet expectations but shows a limited drive to exceed them and struggles to build relationships. He would benefit from developing more confidence and taking a more solution-oriented approach when addressing problems. His focus on personal growth is a good foundation to build upon.\n\n**Strengths:**\n* Supports change initiatives and can operate with comfort during uncertainty.\n* Focuses on personal and professional growth, though this may be inconsistent.\n\n**Development Areas:**\n* Enhance independent problem-solving and decision-making confidence.\n* Increase motivation, initiative, and perseverance in setbacks."
}
</sme_written_output>
</exemplars>"##;

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

/// Assembles per-candidate prompts on top of a preamble rendered once from the table.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    preamble: String,
}

impl PromptBuilder {
    /// Renders the static preamble. Fails only if the table is incomplete.
    pub fn new(table: &InterpretationTable) -> Result<Self, FragmentError> {
        let rules = render_interpretation_rules(table)?;
        let preamble = format!(
            "# PROMPT: Generate Expert Candidate Assessment Summary\n\n\
             {PERSONA}\n\n{context}\n\n<interpretation_rules>\n\
             You must follow these rules with absolute precision.\n\n\
             {rules}\n{STRUCTURE_RULES}\n</interpretation_rules>\n\n{exemplars}",
            context = render_context(),
            exemplars = EXEMPLARS.trim(),
        );
        Ok(Self { preamble })
    }

    /// Full prompt for one candidate.
    pub fn build(&self, record: &CandidateRecord, plan: &SummaryPlan) -> String {
        format!(
            "{}\n\n{}\n\n{}",
            self.preamble,
            render_selection_plan(plan),
            render_task(record)
        )
    }
}

fn render_context() -> String {
    let list = |group: &[Competency]| {
        group
            .iter()
            .map(|c| format!("    * {}", c.name()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "<context>\n\
         This report summarizes a candidate's performance on a leadership assessment. \
         The assessment measures 8 core competencies grouped as follows. \
         You must never refer to these competency names in your final output.\n\n\
         **Competency Groups:**\n\
         * **Overall Leadership Group (Determines the opening sentence and potential strengths):**\n\
         {}\n\
         * **Level-Specific Group (Forms the main body of the summary):**\n\
         {}\n\
         </context>",
        list(&Competency::OVERALL),
        list(&Competency::LEVEL_SPECIFIC),
    )
}

/// Renders Parts A and B of the rules straight from the table, highest tier first.
pub fn render_interpretation_rules(table: &InterpretationTable) -> Result<String, FragmentError> {
    let mut out = String::new();

    out.push_str("**PART A: OVERALL LEADERSHIP GROUP INTERPRETATIONS**\n");
    out.push_str(
        "This text is used for the opening sentence and for potential strengths/development areas in the bullet points.\n\n",
    );
    for competency in Competency::OVERALL {
        render_competency_rules(&mut out, table, competency, Level::Apply)?;
    }

    out.push_str("\n**PART B: LEVEL-SPECIFIC GROUP INTERPRETATIONS**\n");
    out.push_str(
        "Use the text corresponding to the candidate's assigned Level: APPLY, SHAPE, or GUIDE.\n",
    );
    for level in Level::ALL {
        let _ = write!(out, "\n---\n***LEVEL: {}***\n---\n", level.label().to_uppercase());
        for competency in Competency::LEVEL_SPECIFIC {
            render_competency_rules(&mut out, table, competency, level)?;
        }
    }

    Ok(out)
}

fn render_competency_rules(
    out: &mut String,
    table: &InterpretationTable,
    competency: Competency,
    level: Level,
) -> Result<(), FragmentError> {
    debug_assert!(
        competency.group() == CompetencyGroup::LevelSpecific || level == Level::Apply,
        "overall competencies are rendered once"
    );

    let thresholds = thresholds_for(competency);
    let _ = writeln!(out, "* **Competency: {}**", competency.name());

    for (idx, (lower, tier)) in thresholds.iter().enumerate().rev() {
        let upper = thresholds
            .get(idx + 1)
            .map_or(MAX_SCORE, |(next, _)| next - 0.01);
        let text = table.fragment_for(competency, level, *tier)?;
        let _ = writeln!(
            out,
            "    * *{} ({lower:.2}-{upper:.2}):* \"{text}\"",
            tier.label()
        );
    }
    Ok(())
}

/// Deterministic selection for this candidate. Lists fragments only, never
/// competency names, so the model has nothing to echo.
pub fn render_selection_plan(plan: &SummaryPlan) -> String {
    let numbered = |fragments: &[SelectedFragment]| {
        fragments
            .iter()
            .enumerate()
            .map(|(i, f)| format!("{}. \"{}\"", i + 1, f.text))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "<selection_plan>\n\
         The fragments below were selected from the interpretation rules using the candidate's scores. \
         Follow this plan exactly; do not substitute other interpretation text.\n\n\
         **Opening sentence (use verbatim):** \"{}\"\n\n\
         **Body material (in this order, highest score first):**\n{}\n\n\
         **Strength material (highest scores):**\n{}\n\n\
         **Development material (lowest scores):**\n{}\n\
         </selection_plan>",
        plan.opening_sentence,
        numbered(&plan.body),
        numbered(&plan.strengths),
        numbered(&plan.development_areas),
    )
}

/// Candidate block plus output instructions.
pub fn render_task(record: &CandidateRecord) -> String {
    let scores = record
        .scores()
        .map(|(competency, score)| format!("    * {}: {}", competency.name(), score))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<task>\n\
         Analyze the following candidate data. Based on all the rules, context, selection plan, and exemplars provided, \
         generate a personalized assessment summary.\n\n\
         **Candidate Data:**\n\
         * **Name:** {}\n\
         * **Gender (for pronouns):** {}\n\
         * **Level:** {}\n\
         * **Scores:**\n{}\n\n\
         Your final output must be a single, raw JSON object with three keys: \"{}\", \"{}\", and \"{}\". \
         The value for each key will be the complete summary (paragraph and bullet points) at that approximate word count. \
         Do not include any other text, explanation, or markdown formatting like ```json outside of this JSON object.\n\
         </task>",
        record.name,
        record.pronoun_set.label(),
        record.level.label(),
        scores,
        OUTPUT_KEYS[0],
        OUTPUT_KEYS[1],
        OUTPUT_KEYS[2],
    )
}
