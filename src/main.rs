use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use feedthread::config::log_dir_from_env;
use feedthread::models::PostUnit;
use feedthread::notify::{self, PullRequestNotice};
use feedthread::{
    BlueskyClient, BlueskyCredentials, CapPolicy, Config, Curator, FeedCollector, GeminiProvider,
    HttpContentFetcher, HttpFeedSource, PipelineConfig, PublishPipeline, RunOutcome, SeenStore,
    ThreadPublisher,
};

#[derive(Parser, Debug)]
#[command(name = "feedthread")]
#[command(version = "0.1.0")]
#[command(about = "Rank new RSS items with Gemini and post them as a Bluesky thread")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the configured feeds and publish one digest thread
    Run(RunArgs),
    /// Announce the pull request described by a GitHub Actions event
    NotifyPr {
        /// Path to the event payload
        #[arg(long, env = "GITHUB_EVENT_PATH")]
        event_path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Database path for the seen-URL store (overrides DATABASE_PATH)
    #[arg(long)]
    database: Option<String>,

    /// Number of top-ranked items that get a summary reply
    #[arg(long)]
    max_summaries: Option<usize>,

    /// Cap on new items per run
    #[arg(long)]
    max_items: Option<usize>,

    /// Which items survive the cap (oldest, newest)
    #[arg(long)]
    cap_policy: Option<CapPolicy>,

    /// Summarize the article page instead of the feed teaser
    #[arg(long)]
    fetch_full_content: bool,

    /// Inline links instead of attaching link cards
    #[arg(long)]
    no_link_cards: bool,

    /// Compose the thread and print it without posting or recording
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging; the guard flushes the log file on exit
    let _guard = feedthread::logging::init(log_dir_from_env())?;

    match cli.command {
        Command::Run(args) => run(args).await,
        Command::NotifyPr { event_path } => notify_pr(event_path).await,
    }
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize storage
    let database = args.database.as_deref().unwrap_or(&config.database_path);
    let storage = SeenStore::open(database)?;

    // Initialize clients
    let mut collector = FeedCollector::new(Arc::new(HttpFeedSource::new()?));
    if args.fetch_full_content || config.fetch_full_content {
        collector = collector.with_content_fetcher(Arc::new(HttpContentFetcher::new()?));
    }

    let llm = GeminiProvider::new(
        config.gemini_api_key.clone(),
        Some(config.gemini_model.clone()),
    )?;
    let bluesky = BlueskyClient::new(Some(&config.bluesky.service))?;
    let publisher = ThreadPublisher::new(Arc::new(bluesky), config.bluesky.clone());

    // Create pipeline
    let mut pipeline_config = PipelineConfig::from(&config);
    if let Some(max_summaries) = args.max_summaries {
        pipeline_config.max_summaries = max_summaries;
    }
    if args.max_items.is_some() {
        pipeline_config.max_items = args.max_items;
    }
    if let Some(cap_policy) = args.cap_policy {
        pipeline_config.cap_policy = cap_policy;
    }
    if args.no_link_cards {
        pipeline_config.link_cards = false;
    }
    pipeline_config.dry_run = args.dry_run;

    let mut pipeline = PublishPipeline::new(
        collector,
        Curator::new(Arc::new(llm)),
        publisher,
        storage,
        pipeline_config,
    );

    // Run
    tracing::info!("Starting run with model {}", config.gemini_model);
    let outcome = pipeline.run().await?;
    report(outcome)
}

/// Prints the outcome. An aborted run becomes an error so `main` returns
/// normally and the log guard flushes before the process exits non-zero.
fn report(outcome: RunOutcome) -> anyhow::Result<()> {
    match outcome {
        RunOutcome::NoNewItems => println!("No new items to publish."),
        RunOutcome::Published { thread, recorded } => {
            println!(
                "Published thread {} ({} post(s), {} URL(s) recorded)",
                thread.root.uri,
                thread.len(),
                recorded
            );
        }
        RunOutcome::DryRun { posts } => print_posts(&posts),
        RunOutcome::Aborted { stage, reason } => {
            tracing::error!("Run aborted at stage {}: {}", stage, reason);
            anyhow::bail!("run aborted at stage: {}: {}", stage, reason);
        }
    }

    Ok(())
}

async fn notify_pr(event_path: Option<PathBuf>) -> anyhow::Result<()> {
    let event_path = event_path.ok_or_else(|| {
        feedthread::Error::Config("GITHUB_EVENT_PATH environment variable not set".to_string())
    })?;

    let credentials = BlueskyCredentials::from_env()?;
    let notice = PullRequestNotice::from_event_file(&event_path)?;

    let bluesky = BlueskyClient::new(Some(&credentials.service))?;
    let publisher = ThreadPublisher::new(Arc::new(bluesky), credentials);

    let thread = notify::announce(&publisher, &notice).await?;
    println!("Announced pull request as {}", thread.root.uri);

    Ok(())
}

fn print_posts(posts: &[PostUnit]) {
    for (i, post) in posts.iter().enumerate() {
        let label = if i == 0 { "root".to_string() } else { format!("reply {}", i) };
        println!("--- {} ---\n{}", label, post.text);
        if let Some(ref card) = post.embed {
            println!("[card] {}", card.uri);
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedthread::Stage;

    #[test]
    fn test_aborted_run_is_an_error() {
        let result = report(RunOutcome::Aborted {
            stage: Stage::Publishing,
            reason: "createRecord failed".to_string(),
        });

        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "run aborted at stage: publishing: createRecord failed"
        );
    }

    #[test]
    fn test_completed_outcomes_succeed() {
        assert!(report(RunOutcome::NoNewItems).is_ok());
        assert!(report(RunOutcome::DryRun { posts: vec![PostUnit::text("root")] }).is_ok());
    }
}
