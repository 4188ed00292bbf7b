//! The `chemdrill init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("chemdrill.toml").exists() {
        println!("chemdrill.toml already exists, skipping.");
    } else {
        std::fs::write("chemdrill.toml", SAMPLE_CONFIG)?;
        println!("Created chemdrill.toml");
    }

    println!("\nNext steps:");
    println!("  1. Pick a provider in chemdrill.toml (offline works without keys)");
    println!("  2. Run: chemdrill play");
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# chemdrill configuration

default_mode = "acid"
start_difficulty = 6
request_timeout_secs = 30

[provider]
type = "offline"

# Generate questions with an OpenAI-compatible API:
# [provider]
# type = "openai"
# api_key = "${OPENAI_API_KEY}"
# model = "gpt-4o-mini"

# Or use a deployed quiz service (also receives attempts):
# [provider]
# type = "remote"
# base_url = "https://quiz.example.com"
# token = "${CHEMDRILL_TOKEN}"

[adaptive]
up_threshold = 2
min_grade = 6
max_grade = 12
"#;
