//! The `chemdrill play` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use tokio::io::{AsyncBufReadExt, BufReader};

use chemdrill_core::model::Mode;
use chemdrill_core::session::{Feedback, QuestionSlot, QuizSession};
use chemdrill_providers::config::load_config_from;
use chemdrill_providers::{create_backend, ProviderConfig};

/// A `:`-prefixed line typed instead of an answer.
#[derive(Debug, PartialEq, Eq)]
enum Control {
    Quit,
    Help,
    Reset,
    Retry,
    History,
    Mode(Mode),
    Invalid(String),
}

fn parse_control(input: &str) -> Option<Control> {
    let command = input.strip_prefix(':')?;
    let mut parts = command.split_whitespace();
    let control = match (parts.next(), parts.next()) {
        (Some("quit" | "q"), None) => Control::Quit,
        (Some("help" | "h"), None) => Control::Help,
        (Some("reset"), None) => Control::Reset,
        (Some("retry"), None) => Control::Retry,
        (Some("history"), None) => Control::History,
        (Some("mode"), Some(mode)) => match mode.parse::<Mode>() {
            Ok(mode) => Control::Mode(mode),
            Err(e) => Control::Invalid(e),
        },
        _ => Control::Invalid(format!("unknown command: {input}")),
    };
    Some(control)
}

pub async fn execute(
    mode: Option<String>,
    difficulty: Option<u32>,
    offline: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = load_config_from(config_path.as_deref())?;
    if offline {
        config.provider = ProviderConfig::Offline;
    }

    let mode = match mode {
        Some(m) => m.parse::<Mode>().map_err(anyhow::Error::msg)?,
        None => config.default_mode,
    };

    let backend = create_backend(&config.provider, config.request_timeout())?;
    let provider_name = backend.provider.name().to_string();
    let mut session = QuizSession::new(backend.provider, backend.sink, mode, config.adaptive)
        .with_start_difficulty(difficulty.unwrap_or(config.start_difficulty));

    tracing::info!(provider = %provider_name, %mode, "starting session");
    println!(
        "chemdrill: {} practice via {provider_name}. Type :help for controls.",
        mode.describe()
    );
    session.load_question().await;
    print_slot(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match parse_control(input) {
            Some(Control::Quit) => break,
            Some(Control::Help) => print_help(),
            Some(Control::History) => print_history(&session),
            Some(Control::Reset) => {
                session.reset().await;
                print_slot(&session);
            }
            Some(Control::Retry) => {
                session.retry().await;
                print_slot(&session);
            }
            Some(Control::Mode(mode)) => {
                session.set_mode(mode).await;
                println!("Switched to {} practice.", mode.describe());
                print_slot(&session);
            }
            Some(Control::Invalid(message)) => println!("{message}. Type :help for controls."),
            None => match session.submit(input).await {
                Ok(feedback) => {
                    print_feedback(&feedback);
                    print_slot(&session);
                }
                Err(e) => println!("{e}"),
            },
        }
    }

    let state = session.state();
    println!(
        "Finished after {} attempts at grade {} (streak {}).",
        session.history().len(),
        state.difficulty,
        state.streak
    );
    Ok(())
}

fn print_slot(session: &QuizSession) {
    let state = session.state();
    match session.slot() {
        QuestionSlot::Ready(question) => println!(
            "\n[Grade {} | Streak {}] {}",
            state.difficulty, state.streak, question.prompt
        ),
        QuestionSlot::Unavailable(message) => {
            println!("\n{message}. Type :retry to try again.")
        }
        QuestionSlot::Empty => println!("\nNo question loaded. Type :retry to load one."),
    }
}

fn print_feedback(feedback: &Feedback) {
    println!(
        "{}",
        if feedback.correct {
            "Correct"
        } else {
            "Not quite"
        }
    );
    println!("  Expected: {}", feedback.expected);
    if !feedback.explanation.is_empty() {
        println!("  Explanation: {}", feedback.explanation);
    }
    if !feedback.remediation.is_empty() {
        println!("  Try this: {}", feedback.remediation);
    }
}

fn print_history(session: &QuizSession) {
    if session.history().is_empty() {
        println!("No attempts yet.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["Question", "You", "Result", "Expected"]);
    for attempt in session.history().iter() {
        table.add_row(vec![
            Cell::new(&attempt.prompt),
            Cell::new(&attempt.answer),
            Cell::new(if attempt.correct { "correct" } else { "wrong" }),
            Cell::new(&attempt.expected),
        ]);
    }
    println!("{table}");
}

fn print_help() {
    println!("Type an answer and press Enter, or one of:");
    println!("  :mode <acid|skeleton>  switch practice mode");
    println!("  :reset                 back to the starting grade");
    println!("  :retry                 reload after a failed question load");
    println!("  :history               show recent attempts");
    println!("  :quit                  stop");
}
