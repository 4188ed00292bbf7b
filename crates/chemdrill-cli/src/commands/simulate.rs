//! The `chemdrill simulate` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use chemdrill_core::adaptive::{decide_next_state, AdaptivePolicy, SessionState};

fn parse_outcome(token: &str) -> Result<bool> {
    match token.trim().to_lowercase().as_str() {
        "c" | "correct" | "y" | "1" | "true" => Ok(true),
        "w" | "wrong" | "n" | "0" | "false" => Ok(false),
        other => anyhow::bail!("invalid outcome: '{other}' (use c or w)"),
    }
}

pub fn execute(outcomes: &str, difficulty: u32, streak: u32) -> Result<()> {
    let outcomes: Vec<bool> = outcomes
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_outcome)
        .collect::<Result<_>>()?;
    anyhow::ensure!(!outcomes.is_empty(), "outcomes must have at least one value");

    let policy = AdaptivePolicy::default();
    let mut state = SessionState::new(policy.clamp(difficulty), streak);

    let mut table = Table::new();
    table.set_header(vec!["#", "Outcome", "Difficulty", "Streak"]);
    for (i, &correct) in outcomes.iter().enumerate() {
        state = decide_next_state(state, correct, &policy);
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(if correct { "correct" } else { "wrong" }),
            Cell::new(state.difficulty),
            Cell::new(state.streak),
        ]);
    }

    println!("{table}");
    println!(
        "final: difficulty={} streak={}",
        state.difficulty, state.streak
    );
    Ok(())
}
