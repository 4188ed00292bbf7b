//! The `chemdrill grade` command.

use anyhow::Result;

use chemdrill_core::grading::grade;
use chemdrill_core::model::Question;
use chemdrill_core::normalize::normalize_answer;

pub fn execute(answer: String, canonical: String, accepted: Vec<String>) -> Result<()> {
    let question = Question {
        prompt: String::new(),
        canonical_answer: canonical,
        accepted_answers: accepted,
        explanation: String::new(),
        remediation: String::new(),
        difficulty: 0,
    };
    let graded = grade(&answer, &question);

    println!(
        "verdict: {}",
        if graded.correct { "correct" } else { "incorrect" }
    );
    println!("answer:    {:?}", graded.normalized_answer);
    println!("canonical: {:?}", normalize_answer(&question.canonical_answer));
    for synonym in &question.accepted_answers {
        println!("accepted:  {:?}", normalize_answer(synonym));
    }
    Ok(())
}
