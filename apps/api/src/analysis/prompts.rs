// Resume analysis prompt templates.
// The structure comes from the response schema; the prompt only shapes reasoning quality.

pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"You are a panel of three career reviewers reaching one verdict:
1. AN ATS SCANNER: scores keyword density and how well the document parses.
2. A SENIOR HIRING BAR-RAISER: has no patience for filler and enforces the X-Y-Z bullet formula.
3. A CAREER MENTOR: looks for adjacent skills the candidate can realistically grow into.

TODAY: {today}

CANDIDATE RESUME:
{resume_text}

TARGET JOB DESCRIPTION:
{job_description}

TASK:
Assess how well this candidate fits this specific role, in detail.

RULES:
1. Stay relevant: only recommend skills the job description actually calls for.
2. Reward measurable impact: a resume without numbers must score noticeably lower.
3. Weigh the scanner's and the mentor's views against each other before settling on scores.
4. Minimum length for long-form fields (words):
{word_floors}
5. Recommended projects must be portfolio-grade system designs.
6. The cover letter is a formal business letter: header, today's date, salutation, an opening
   tied to the role, two body paragraphs linking resume experience to the role's needs, and a
   call to action with sign-off.
7. Salary figures must reflect market benchmarks for {quarter}.
8. Never use bold markers (**) anywhere in the text; the interface applies its own styling.
9. Structure long fields with markdown lists and sub-headings instead of dense paragraphs.
10. The learning plan has exactly 6 entries, one per month.

Fill in every field of the provided JSON schema."#;
