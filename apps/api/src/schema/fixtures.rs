//! Test fixtures: a model response that satisfies every constraint of the analysis schema.

use serde_json::{json, Value};

/// `n` whitespace-separated words.
pub fn words(n: usize) -> String {
    vec!["insight"; n].join(" ")
}

pub fn valid_analysis() -> Value {
    json!({
        "candidate_info": {
            "name": "Ada Lovelace",
            "title": "Senior Backend Engineer",
            "career_persona": "The Analytical Engine",
            "readiness_score": 82
        },
        "ats_analysis": {
            "overall_score": 78,
            "section_scores": {
                "quantification": 70,
                "experience": 85,
                "tech_stack": 80,
                "education": 75
            },
            "breakdown": {
                "skill_match": 80,
                "keyword_match": 72,
                "experience_relevance": 84,
                "formatting_quality": 76
            },
            "explanation": {
                "executive_summary": words(100),
                "keyword_parity": words(75),
                "quantification_review": words(75),
                "structural_feedback": words(50)
            }
        },
        "market_intel": {
            "salary_range_usd": "$150k - $185k",
            "salary_range_inr": "₹40L - ₹55L",
            "market_demand": "High",
            "top_competencies": ["Rust", "Distributed systems"]
        },
        "advanced_insights": {
            "technical_depth_scouter": words(150),
            "culture_fit_predictor": words(150),
            "faang_matchmaker": words(150),
            "skill_radar": {
                "Technical": 85,
                "Leadership": 60,
                "Communication": 70,
                "Problem Solving": 88,
                "Innovation": 75
            },
            "skills_gap_chart": [
                { "skill": "Kubernetes", "required": 80, "possessed": 40 }
            ]
        },
        "recruiter_review": {
            "decision": "Shortlisted",
            "honest_feedback": words(200),
            "critical_fail_points": ["No public portfolio"],
            "key_strengths": ["Production Rust experience"]
        },
        "resume_tailoring": {
            "new_summary": "Backend engineer focused on reliable distributed services.",
            "optimized_skills": ["Rust", "Tokio", "PostgreSQL"],
            "enhanced_bullets": [
                {
                    "original": "Worked on the payments service",
                    "improved": "Cut payment latency 40% as measured by p99 by rewriting the ledger in Rust",
                    "impact": "Faster checkout for 2M users"
                }
            ],
            "linkedin_tips": ["Lead the headline with the target role"],
            "cover_letter": "Dear Hiring Manager,\n\nI am writing to apply.\n\nSincerely,\nAda"
        },
        "skill_gap_analysis": {
            "missing_technical_skills": ["Kubernetes"],
            "missing_soft_skills": ["Public speaking"],
            "recommended_projects": [
                {
                    "title": "Multi-region job scheduler",
                    "description": words(100),
                    "tech_stack": ["Rust", "Raft"]
                }
            ],
            "certifications": ["CKA"]
        },
        "interview_prep": {
            "technical_questions": ["How would you shard a ledger?"],
            "behavioral_questions": ["Describe a production incident you owned."]
        },
        "career_roadmap": {
            "learning_plan_6_months": (1..=6)
                .map(|m| json!({ "month": m, "focus": format!("Focus area {m}") }))
                .collect::<Vec<_>>(),
            "final_advice": words(150)
        }
    })
}
