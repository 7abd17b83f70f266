use crate::commands::ask::print_answer;
use crate::core::api::ApiClient;
use crate::core::config::load_config;
use crate::core::questions::{ingredients_question, random_question};
use crate::core::session::{Feedback, Session};
use anyhow::Result;
use colored::*;
use log::{debug, warn};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};

/// One line typed at the chat prompt
#[derive(Debug, PartialEq)]
enum Input {
    Ingredients(String),
    Random,
    Feedback(Feedback),
    Stats,
    Clear,
    Help,
    Quit,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "/random" => Input::Random,
        "/good" | "/+1" => Input::Feedback(Feedback::Positive),
        "/bad" | "/-1" => Input::Feedback(Feedback::Negative),
        "/skip" => Input::Feedback(Feedback::Skip),
        "/stats" => Input::Stats,
        "/clear" => Input::Clear,
        "/help" => Input::Help,
        "/quit" | "/exit" => Input::Quit,
        other => Input::Ingredients(other.to_string()),
    }
}

fn print_help() {
    println!("Enter ingredients in your fridge (comma separated) to find recipes.");
    println!("  /random   ask a random question from the dataset");
    println!("  /good     the last answer was relevant (+1)");
    println!("  /bad      the last answer was not relevant (-1)");
    println!("  /skip     skip feedback for the last answer");
    println!("  /stats    show session stats");
    println!("  /clear    clear the conversation");
    println!("  /quit     exit");
}

fn print_stats(session: &Session) {
    let stats = &session.stats;
    println!("{}", "Stats".bold());
    println!("  Total questions: {}", stats.questions);
    println!("  Relevant (+1): {}", stats.relevant);
    println!("  Non-relevant (-1): {}", stats.non_relevant);
    println!("  Skipped: {}", stats.skipped);
    if let Some(avg) = stats.avg_response_time() {
        println!("  Avg response time: {:.2}s", avg);
    }
}

async fn ask(client: &ApiClient, session: &mut Session, question: String) {
    match client.ask(&question).await {
        Ok((answer, elapsed)) => {
            print_answer(session.stats.questions + 1, &question, &answer, elapsed);
            session.record_answer(
                question,
                answer.answer,
                answer.conversation_id,
                elapsed,
            );
        }
        Err(e) => println!("{} {}", "[ERROR]".red(), e),
    }
}

async fn give_feedback(client: &ApiClient, session: &mut Session, feedback: Feedback) {
    let Some(conversation_id) = session.conversation_id.clone() else {
        println!("{}", "Ask a question first.".yellow());
        return;
    };

    match feedback.value() {
        Some(value) => match client.send_feedback(&conversation_id, value).await {
            Ok(status) => {
                session.record_feedback(feedback);
                println!("{} (status {})", "Feedback sent!".green(), status);
            }
            Err(e) => println!("{} {}", "[ERROR]".red(), e),
        },
        None => {
            session.record_feedback(feedback);
            println!("{}", "Feedback skipped.".blue());
        }
    }
}

pub async fn run() -> Result<()> {
    let config = load_config()?;
    let client = ApiClient::new(&config.backend_url);
    if !client.health_check().await {
        warn!("Backend at {} is not responding", config.backend_url);
    }

    println!("{}", "Fridge Chef - What's Cooking?".bold().green());
    println!("Tell me what's in your fridge, and I'll suggest a vegetarian/vegan dish you can make!");
    println!("{}", "Type /help for commands.".dimmed());

    let mut session = Session::new();
    let mut rng = rand::thread_rng();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("{} ", ">".cyan());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Ingredients(text) => match ingredients_question(&text) {
                Some(question) => ask(&client, &mut session, question).await,
                None => println!("{}", "Please enter at least one ingredient.".yellow()),
            },
            Input::Random => {
                let question = random_question(Path::new(&config.ground_truth_path), &mut rng);
                match question {
                    Ok(question) => {
                        debug!("Random question: {}", question);
                        ask(&client, &mut session, question).await;
                    }
                    Err(e) => println!("{} {}", "[ERROR]".red(), e),
                }
            }
            Input::Feedback(feedback) => give_feedback(&client, &mut session, feedback).await,
            Input::Stats => print_stats(&session),
            Input::Clear => {
                session.clear();
                println!("{}", "Conversation cleared!".green());
            }
            Input::Help => print_help(),
            Input::Quit => break,
        }
    }

    print_stats(&session);
    Ok(())
}
