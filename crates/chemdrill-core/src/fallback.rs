//! Built-in questions served when a provider response cannot be used.

use crate::model::{Mode, Question};

/// The fixed default question for `mode`, tagged with `difficulty`.
pub fn fallback_question(mode: Mode, difficulty: u32) -> Question {
    match mode {
        Mode::Acid => Question {
            prompt: "Name HCl (aqueous)".into(),
            canonical_answer: "hydrochloric acid".into(),
            accepted_answers: vec![
                "hydrochloric acid".into(),
                "hydrogen chloride (aqueous)".into(),
            ],
            explanation: "HCl in water is hydrochloric acid (binary acid).".into(),
            remediation: "Remember binary acids: hydro- + base name of anion + -ic acid.".into(),
            difficulty,
        },
        Mode::Skeleton => Question {
            prompt: "Write a skeleton: sodium metal reacts with water".into(),
            canonical_answer: "2 Na(s) + 2 H2O(l) -> 2 NaOH(aq) + H2(g)".into(),
            accepted_answers: vec![
                "na + h2o -> naoh + h2".into(),
                "2 na(s) + 2 h2o -> 2 naoh + h2".into(),
            ],
            explanation: "Sodium reacts with water to form sodium hydroxide and hydrogen gas."
                .into(),
            remediation: "Metals above hydrogen produce H2 gas when reacting with acids/water."
                .into(),
            difficulty,
        },
    }
}
