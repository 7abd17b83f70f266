mod commands;
mod core;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use commands::{ask, chat, feedback};
use crate::core::session::Feedback;

#[derive(Parser)]
#[command(name = "fridgechef")]
#[command(about = "Fridge Chef - tell it what's in your fridge, get a recipe", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive session with feedback and stats
    Chat,

    /// Ask a single question
    Ask {
        /// Question text
        #[arg(required = true)]
        question: Vec<String>,

        /// Treat the text as a list of ingredients
        #[arg(short, long, default_value_t = false)]
        ingredients: bool,

        /// Output as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Rate an answer
    Feedback {
        /// Conversation ID returned with the answer
        conversation_id: String,

        #[arg(value_enum)]
        rating: Rating,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Rating {
    Good,
    Bad,
    Skip,
}

impl From<Rating> for Feedback {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Good => Feedback::Positive,
            Rating::Bad => Feedback::Negative,
            Rating::Skip => Feedback::Skip,
        }
    }
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Print the config file location
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Chat => {
            chat::run().await?;
        }
        Commands::Ask {
            question,
            ingredients,
            json,
        } => {
            ask::run(question, *ingredients, *json).await?;
        }
        Commands::Feedback {
            conversation_id,
            rating,
        } => {
            feedback::run(conversation_id, (*rating).into()).await?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                let c = crate::core::config::load_config()?;
                println!("{:#?}", c);
            }
            ConfigAction::Path => println!("{}", crate::core::config::config_path().display()),
        },
    }

    Ok(())
}
