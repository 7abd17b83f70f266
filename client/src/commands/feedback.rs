use crate::core::api::ApiClient;
use crate::core::config::load_config;
use crate::core::session::Feedback;
use anyhow::Result;
use colored::*;

pub async fn run(conversation_id: &str, feedback: Feedback) -> Result<()> {
    let Some(value) = feedback.value() else {
        println!("{}", "Feedback skipped.".yellow());
        return Ok(());
    };

    let config = load_config()?;
    let client = ApiClient::new(&config.backend_url);
    let status = client.send_feedback(conversation_id, value).await?;

    if (200..300).contains(&status) {
        println!("{} (status {})", "Feedback sent!".green(), status);
    } else {
        println!("{} (status {})", "Feedback rejected".red(), status);
    }
    Ok(())
}
