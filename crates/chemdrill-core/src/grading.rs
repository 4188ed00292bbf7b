//! Correctness decision for a learner's answer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::Question;
use crate::normalize::normalize_answer;

/// Outcome of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub correct: bool,
    /// The learner's answer after normalization.
    pub normalized_answer: String,
    /// The canonical answer as the provider wrote it.
    pub expected: String,
}

/// Returns `true` if `answer` matches the canonical answer or any accepted
/// synonym after normalization.
pub fn is_correct(answer: &str, question: &Question) -> bool {
    grade(answer, question).correct
}

/// Grade `answer` against `question`.
pub fn grade(answer: &str, question: &Question) -> Grade {
    let normalized_answer = normalize_answer(answer);
    let canonical = normalize_answer(&question.canonical_answer);
    let accepted: HashSet<String> = question
        .accepted_answers
        .iter()
        .map(|a| normalize_answer(a))
        .collect();

    let correct = normalized_answer == canonical || accepted.contains(&normalized_answer);

    Grade {
        correct,
        normalized_answer,
        expected: question.canonical_answer.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(canonical: &str, accepted: &[&str]) -> Question {
        Question {
            prompt: "prompt".into(),
            canonical_answer: canonical.into(),
            accepted_answers: accepted.iter().map(|s| s.to_string()).collect(),
            explanation: String::new(),
            remediation: String::new(),
            difficulty: 6,
        }
    }

    #[test]
    fn forgives_case_whitespace_and_punctuation() {
        let q = question("hydrochloric acid", &[]);
        assert!(is_correct("Hydrochloric Acid.", &q));
        assert!(is_correct("  hydrochloric    acid ", &q));
    }

    #[test]
    fn formula_characters_must_match() {
        let q = question("h₂o", &[]);
        assert!(!is_correct("h2o", &q));
        assert!(is_correct("H₂O", &q));
    }

    #[test]
    fn accepted_answers_are_normalized() {
        let q = question(
            "hydrochloric acid",
            &["Hydrogen Chloride (aqueous)", "HCl(aq)"],
        );
        assert!(is_correct("hydrogen chloride aqueous", &q));
        assert!(is_correct("hclaq", &q));
        assert!(is_correct("HCl(aq).", &q));
        // Parentheses vanish without leaving a space behind.
        assert!(!is_correct("hcl aq", &q));
        assert!(!is_correct("chloric acid", &q));
    }

    #[test]
    fn no_partial_credit() {
        let q = question("sulfuric acid", &["h2so4"]);
        assert!(!is_correct("sulfuric", &q));
        assert!(!is_correct("sulfuric acids", &q));
        assert!(!is_correct("", &q));
    }

    #[test]
    fn empty_accepted_list_uses_canonical_only() {
        let q = question("nitric acid", &[]);
        let graded = grade("Nitric acid", &q);
        assert!(graded.correct);
        assert_eq!(graded.normalized_answer, "nitric acid");
        assert_eq!(graded.expected, "nitric acid");
    }

    #[test]
    fn blank_answer_matches_blank_canonical() {
        let q = question("  ", &[]);
        assert!(is_correct("", &q));
    }
}
