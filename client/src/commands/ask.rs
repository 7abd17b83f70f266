use crate::core::api::{Answer, ApiClient};
use crate::core::config::load_config;
use crate::core::questions::ingredients_question;
use anyhow::Result;
use colored::*;
use std::time::Duration;

pub async fn run(words: &[String], ingredients: bool, json: bool) -> Result<()> {
    let config = load_config()?;
    let client = ApiClient::new(&config.backend_url);

    let text = words.join(" ");
    let question = if ingredients {
        match ingredients_question(&text) {
            Some(q) => q,
            None => anyhow::bail!("Please enter at least one ingredient."),
        }
    } else {
        text
    };

    let (answer, elapsed) = client.ask(&question).await?;

    if json {
        let output = serde_json::json!({
            "conversation_id": answer.conversation_id,
            "question": question,
            "answer": answer.answer,
            "response_time_secs": elapsed.as_secs_f64(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_answer(1, &question, &answer, elapsed);
    Ok(())
}

pub fn print_answer(n: usize, question: &str, answer: &Answer, elapsed: Duration) {
    println!("{} {}", format!("Q{}:", n).bold(), question);
    println!("{} {}", format!("A{}:", n).bold().green(), answer.answer);
    println!(
        "{}",
        format!(
            "conversation {} ({:.2}s)",
            answer.conversation_id,
            elapsed.as_secs_f64()
        )
        .dimmed()
    );
    println!();
}
