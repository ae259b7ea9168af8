//! The canonical resume analysis schema.
//!
//! Field names and enum values are the wire contract with the model and the
//! front ends. They are case-sensitive and must not be renamed.

use std::sync::LazyLock;

use crate::schema::node::{array, enumeration, integer, object, string, SchemaNode};

pub const MARKET_DEMAND_LEVELS: &[&str] = &["High", "Medium", "Low"];
pub const RECRUITER_DECISIONS: &[&str] = &["Shortlisted", "Rejected", "Maybe"];
pub const LEARNING_PLAN_MONTHS: usize = 6;

pub const TOP_LEVEL_SECTIONS: &[&str] = &[
    "candidate_info",
    "ats_analysis",
    "market_intel",
    "advanced_insights",
    "recruiter_review",
    "resume_tailoring",
    "skill_gap_analysis",
    "interview_prep",
    "career_roadmap",
];

static ANALYSIS_SCHEMA: LazyLock<SchemaNode> = LazyLock::new(build_analysis_schema);

/// Root node of the analysis schema. Built on first access, shared read-only afterwards.
pub fn analysis_schema() -> &'static SchemaNode {
    &ANALYSIS_SCHEMA
}

fn build_analysis_schema() -> SchemaNode {
    object()
        .required("candidate_info", candidate_info())
        .required("ats_analysis", ats_analysis())
        .required("market_intel", market_intel())
        .required("advanced_insights", advanced_insights())
        .required("recruiter_review", recruiter_review())
        .required("resume_tailoring", resume_tailoring())
        .required("skill_gap_analysis", skill_gap_analysis())
        .required("interview_prep", interview_prep())
        .required("career_roadmap", career_roadmap())
        .into()
}

fn string_list() -> SchemaNode {
    array(string()).into()
}

fn candidate_info() -> SchemaNode {
    object()
        .required("name", string())
        .required("title", string())
        .required(
            "career_persona",
            string().describe("A memorable archetype for the candidate, e.g. 'The Pragmatic Scaler'."),
        )
        .required("readiness_score", integer())
        .into()
}

fn ats_analysis() -> SchemaNode {
    let section_scores = object()
        .required("quantification", integer())
        .required("experience", integer())
        .required("tech_stack", integer())
        .required("education", integer());

    let breakdown = object()
        .required("skill_match", integer())
        .required("keyword_match", integer())
        .required("experience_relevance", integer())
        .required("formatting_quality", integer());

    let explanation = object()
        .required(
            "executive_summary",
            string()
                .min_words(100)
                .no_bold()
                .describe("Overall fit summary for the target role."),
        )
        .required(
            "keyword_parity",
            string()
                .min_words(75)
                .no_bold()
                .describe("Where resume keywords align with or miss the job description."),
        )
        .required(
            "quantification_review",
            string()
                .min_words(75)
                .no_bold()
                .describe("Audit of metrics and measurable impact in the resume."),
        )
        .required(
            "structural_feedback",
            string()
                .min_words(50)
                .no_bold()
                .describe("Critique of formatting, ordering and layout."),
        );

    object()
        .required("overall_score", integer())
        .required("section_scores", section_scores)
        .required("breakdown", breakdown)
        .required("explanation", explanation)
        .into()
}

fn market_intel() -> SchemaNode {
    object()
        .required("salary_range_usd", string())
        .required("salary_range_inr", string())
        .required("market_demand", enumeration(MARKET_DEMAND_LEVELS))
        .required("top_competencies", string_list())
        .into()
}

fn advanced_insights() -> SchemaNode {
    let skill_radar = object()
        .required("Technical", integer())
        .required("Leadership", integer())
        .required("Communication", integer())
        .required("Problem Solving", integer())
        .required("Innovation", integer());

    let gap_point = object()
        .required("skill", string())
        .required("required", integer())
        .required("possessed", integer());

    object()
        .required(
            "technical_depth_scouter",
            string()
                .min_words(150)
                .describe("Technical evaluation of stack maturity and architectural depth."),
        )
        .required(
            "culture_fit_predictor",
            string()
                .min_words(150)
                .describe("Placement likelihood from soft skills and stated company values."),
        )
        .required(
            "faang_matchmaker",
            string()
                .min_words(150)
                .describe("Which large tech employers fit the candidate, and why."),
        )
        .required("skill_radar", skill_radar)
        .required("skills_gap_chart", array(gap_point))
        .into()
}

fn recruiter_review() -> SchemaNode {
    object()
        .required("decision", enumeration(RECRUITER_DECISIONS))
        .required(
            "honest_feedback",
            string()
                .min_words(200)
                .no_bold()
                .describe("Blunt recruiter feedback on the application."),
        )
        .required("critical_fail_points", string_list())
        .required("key_strengths", string_list())
        .into()
}

fn resume_tailoring() -> SchemaNode {
    let bullet = object()
        .required("original", string())
        .required(
            "improved",
            string()
                .no_bold()
                .describe("Rewritten with the X-Y-Z formula: accomplished X, measured by Y, by doing Z."),
        )
        .required("impact", string().no_bold());

    object()
        .required("new_summary", string())
        .required("optimized_skills", string_list())
        .required("enhanced_bullets", array(bullet))
        .required("linkedin_tips", array(string().no_bold()))
        .required(
            "cover_letter",
            string().no_bold().describe(
                "Formal business letter: header, date, salutation, three body paragraphs, sign-off. Markdown spacing allowed.",
            ),
        )
        .into()
}

fn skill_gap_analysis() -> SchemaNode {
    let project = object()
        .required("title", string())
        .required(
            "description",
            string()
                .min_words(100)
                .describe("Portfolio-grade project design addressing the gaps."),
        )
        .required("tech_stack", string_list());

    object()
        .required("missing_technical_skills", string_list())
        .required("missing_soft_skills", string_list())
        .required("recommended_projects", array(project))
        .required("certifications", string_list())
        .into()
}

fn interview_prep() -> SchemaNode {
    object()
        .required("technical_questions", string_list())
        .required("behavioral_questions", string_list())
        .into()
}

fn career_roadmap() -> SchemaNode {
    let month = object()
        .required("month", integer())
        .required("focus", string());

    object()
        .required(
            "learning_plan_6_months",
            array(month).exact_len(LEARNING_PLAN_MONTHS),
        )
        .required(
            "final_advice",
            string().min_words(150).no_bold(),
        )
        .into()
}
