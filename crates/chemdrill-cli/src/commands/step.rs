//! The `chemdrill step` command.

use anyhow::Result;

use chemdrill_core::adaptive::{decide_next_state, AdaptivePolicy, SessionState};

pub fn execute(
    difficulty: u32,
    streak: u32,
    correct: bool,
    wrong: bool,
    up_threshold: u32,
    min_grade: u32,
    max_grade: u32,
) -> Result<()> {
    anyhow::ensure!(correct || wrong, "pass either --correct or --wrong");

    let policy = AdaptivePolicy {
        up_threshold,
        min_grade,
        max_grade,
    };
    policy.validate()?;
    anyhow::ensure!(
        (min_grade..=max_grade).contains(&difficulty),
        "difficulty {difficulty} is outside [{min_grade}, {max_grade}]"
    );

    let next = decide_next_state(SessionState::new(difficulty, streak), correct, &policy);
    println!("difficulty={} streak={}", next.difficulty, next.streak);
    Ok(())
}
