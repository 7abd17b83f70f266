use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fridgechef_engine::evaluate::{evaluate, load_ground_truth, split_validation, GroundTruth};
use fridgechef_engine::judge::{judge_all, JudgeSummary, JudgedAnswer};
use fridgechef_engine::llm::OpenAiChat;
use fridgechef_engine::optimize::{default_param_ranges, simple_optimize};
use fridgechef_engine::recipe::{load_recipes, DEFAULT_DATA_URL};
use fridgechef_engine::search::EVALUATION_LIMIT;
use fridgechef_engine::{Boosts, FridgeChef, IndexConfig, RecipeIndex, SearchConfig};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Offline evaluation for the Fridge Chef retrieval pipeline
#[derive(Parser)]
#[command(name = "fridgechef-eval")]
#[command(about = "Retrieval and answer evaluation for Fridge Chef")]
struct Cli {
    /// Recipe dataset path or URL
    #[arg(long, env = "FRIDGECHEF_DATA_URL", default_value = DEFAULT_DATA_URL, global = true)]
    data: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the index
    Search {
        /// Search query
        #[arg(short, long)]
        query: String,
        /// Maximum results
        #[arg(short = 'k', long, default_value_t = EVALUATION_LIMIT)]
        top_k: usize,
        /// Use the tuned boost profile
        #[arg(long)]
        tuned: bool,
    },
    /// Hit-rate and MRR over a ground-truth question set
    Evaluate {
        /// CSV with `id` and `question` columns
        #[arg(short, long)]
        ground_truth: PathBuf,
        /// Results per question
        #[arg(short = 'k', long, default_value_t = EVALUATION_LIMIT)]
        top_k: usize,
        /// Use the tuned boost profile
        #[arg(long)]
        tuned: bool,
    },
    /// Random search over boost weights
    Optimize {
        /// CSV with `id` and `question` columns
        #[arg(short, long)]
        ground_truth: PathBuf,
        /// Number of leading questions used for validation
        #[arg(long, default_value_t = 100)]
        validation: usize,
        /// Number of random trials
        #[arg(long, default_value_t = 20)]
        trials: usize,
        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Grade RAG answers with an LLM judge
    Judge {
        /// CSV with `id` and `question` columns
        #[arg(short, long)]
        ground_truth: PathBuf,
        /// Only grade the first N questions
        #[arg(long)]
        limit: Option<usize>,
        /// Write per-question verdicts to this CSV
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Model that generates the answers, if different from the judge's
        #[arg(long)]
        model: Option<String>,
    },
    /// Get index statistics
    Stats,
}

/// Search result
#[derive(Debug, Serialize)]
struct SearchResult {
    dish_name: String,
    score: f32,
    rank: usize,
}

/// Index statistics
#[derive(Debug, Serialize)]
struct IndexStats {
    num_docs: usize,
    text_fields: Vec<String>,
    keyword_fields: Vec<String>,
}

async fn build_index(data: &str) -> Result<RecipeIndex> {
    let recipes = load_recipes(data)
        .await
        .with_context(|| format!("Failed to load recipes from {}", data))?;
    Ok(RecipeIndex::fit(recipes, IndexConfig::default()))
}

fn boosts_for(tuned: bool) -> Boosts {
    if tuned {
        Boosts::tuned()
    } else {
        Boosts::new()
    }
}

fn search_index(index: &RecipeIndex, query: String, top_k: usize, tuned: bool) -> Result<()> {
    let config = SearchConfig::evaluation()
        .with_limit(top_k)
        .with_boosts(boosts_for(tuned));

    let results: Vec<SearchResult> = index
        .search(&query, &config)
        .iter()
        .enumerate()
        .map(|(i, hit)| SearchResult {
            dish_name: hit.recipe.dish_name.clone(),
            score: hit.score,
            rank: i + 1,
        })
        .collect();

    let output = serde_json::json!({
        "results": results,
        "total": results.len(),
        "query": query,
    });
    println!("{}", serde_json::to_string(&output)?);

    Ok(())
}

fn run_evaluate(index: &RecipeIndex, ground_truth: &Path, top_k: usize, tuned: bool) -> Result<()> {
    let records = load_ground_truth(ground_truth).context("Failed to read ground truth")?;
    let config = SearchConfig::evaluation()
        .with_limit(top_k)
        .with_boosts(boosts_for(tuned));

    let metrics = evaluate(&records, |q| {
        index
            .search(&q.question, &config)
            .into_iter()
            .map(|hit| hit.recipe)
            .collect()
    });

    println!("{}", serde_json::to_string(&metrics)?);
    Ok(())
}

fn run_optimize(
    index: &RecipeIndex,
    ground_truth: &Path,
    validation: usize,
    trials: usize,
    seed: Option<u64>,
) -> Result<()> {
    let records = load_ground_truth(ground_truth).context("Failed to read ground truth")?;
    let (validation_set, test_set) = split_validation(&records, validation);
    tracing::info!(
        "Optimizing over {} validation questions ({} held out)",
        validation_set.len(),
        test_set.len()
    );

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let score_with = |set: &[GroundTruth], boosts: &Boosts| {
        let config = SearchConfig::evaluation().with_boosts(boosts.clone());
        evaluate(set, |q| {
            index
                .search(&q.question, &config)
                .into_iter()
                .map(|hit| hit.recipe)
                .collect()
        })
    };

    let best = simple_optimize(
        &default_param_ranges(),
        |boosts| score_with(validation_set, boosts).mrr,
        trials,
        &mut rng,
    )
    .context("No trials were run")?;

    let test_metrics = score_with(test_set, &best.boosts);

    let output = serde_json::json!({
        "boosts": best.boosts,
        "validation_mrr": best.score,
        "test": test_metrics,
        "trials": trials,
    });
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}

fn write_verdicts(path: &Path, judged: &[JudgedAnswer]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for item in judged {
        writer.serialize(item)?;
    }
    writer.flush()?;
    Ok(())
}

async fn run_judge(
    index: RecipeIndex,
    ground_truth: &Path,
    limit: Option<usize>,
    output: Option<PathBuf>,
    model: Option<String>,
) -> Result<()> {
    let mut records = load_ground_truth(ground_truth).context("Failed to read ground truth")?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }

    let judge = OpenAiChat::from_env()?;
    let mut answerer = OpenAiChat::from_env()?;
    if let Some(model) = model {
        answerer = answerer.with_model(model);
    }
    let chef = FridgeChef::new(Arc::new(index), Arc::new(answerer));

    let judged = judge_all(&chef, &judge, &records).await?;

    if let Some(path) = output {
        write_verdicts(&path, &judged)?;
        tracing::info!("Wrote {} verdicts to {}", judged.len(), path.display());
    }

    let summary = JudgeSummary::from_judged(&judged);
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn get_stats(index: &RecipeIndex) -> Result<()> {
    let stats = IndexStats {
        num_docs: index.len(),
        text_fields: index.text_fields().iter().map(|f| f.to_string()).collect(),
        keyword_fields: index.keyword_fields().iter().map(|f| f.to_string()).collect(),
    };

    println!("{}", serde_json::to_string(&stats)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays one JSON document
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let index = build_index(&cli.data).await?;

    match cli.command {
        Commands::Search {
            query,
            top_k,
            tuned,
        } => {
            search_index(&index, query, top_k, tuned)?;
        }
        Commands::Evaluate {
            ground_truth,
            top_k,
            tuned,
        } => {
            run_evaluate(&index, &ground_truth, top_k, tuned)?;
        }
        Commands::Optimize {
            ground_truth,
            validation,
            trials,
            seed,
        } => {
            run_optimize(&index, &ground_truth, validation, trials, seed)?;
        }
        Commands::Judge {
            ground_truth,
            limit,
            output,
            model,
        } => {
            run_judge(index, &ground_truth, limit, output, model).await?;
        }
        Commands::Stats => {
            get_stats(&index)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fridgechef_engine::judge::Relevance;

    #[test]
    fn test_write_verdicts_columns() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("verdicts.csv");
        let judged = vec![JudgedAnswer {
            id: "Spinach Dal".to_string(),
            question: "What can I cook with lentils?".to_string(),
            answer: "Try the dal, it uses lentils, spinach".to_string(),
            relevance: Relevance::PartlyRelevant,
            explanation: "Mentions one dish".to_string(),
        }];

        write_verdicts(&path, &judged).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["id", "question", "answer", "relevance", "explanation"]
        );
        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[2], "Try the dal, it uses lentils, spinach");
        assert_eq!(&row[3], "PARTLY_RELEVANT");
    }
}
