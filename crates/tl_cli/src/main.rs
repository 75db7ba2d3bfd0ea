use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tl_pipeline::windows::partition_into_windows;
use tl_pipeline::service::DEFAULT_MAX_ARTICLES;
use tl_pipeline::{
    create_summarizer, JunkPolicy, MinSamples, Pipeline, PipelineConfig, ServiceConfig,
    TimelineService,
};
use tl_storage::{write_timeline, InMemoryCache, JsonFileSource};
use tracing::{error, info};

mod logging;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Build news timelines from embedded articles",
    long_about = None
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Cluster articles into a timeline of events
    Build {
        /// JSON array of embedded articles
        #[arg(long)]
        input: PathBuf,
        /// Only use articles whose title or snippet contains this text.
        /// Repeat for several timelines.
        #[arg(long = "query")]
        queries: Vec<String>,
        #[command(flatten)]
        pipeline: PipelineArgs,
        #[command(flatten)]
        service: ServiceArgs,
        /// Attach an extractive summary to every event
        #[arg(long)]
        summarize: bool,
        /// Word limit for summaries
        #[arg(long, requires = "summarize")]
        summary_words: Option<usize>,
        /// Write each timeline to <dir>/<query>.json instead of stdout
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Show the windows articles would be clustered in
    Windows {
        #[arg(long)]
        input: PathBuf,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(clap::Args, Debug, Clone, Default)]
struct PipelineArgs {
    /// JSON pipeline configuration; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,
    /// Window radius in days
    #[arg(long)]
    window_delta: Option<u32>,
    /// Days between window centers
    #[arg(long)]
    step: Option<u32>,
    /// OPTICS steepness threshold
    #[arg(long)]
    xi: Option<f64>,
    /// Fixed min_samples (default: 2 below 200 articles, 3 otherwise)
    #[arg(long)]
    min_samples: Option<usize>,
    #[arg(long, value_enum)]
    junk_policy: Option<JunkPolicyArg>,
    /// Largest cluster kept by the threshold junk policy
    #[arg(long)]
    max_cluster_articles: Option<usize>,
}

#[derive(clap::Args, Debug, Clone)]
struct ServiceArgs {
    /// Only use articles published within this many days
    #[arg(long, default_value_t = 14)]
    lookback_days: u32,
    /// Ignore publication dates when selecting articles
    #[arg(long, conflicts_with = "lookback_days")]
    all_dates: bool,
    /// Most articles clustered per query
    #[arg(long, default_value_t = DEFAULT_MAX_ARTICLES)]
    max_articles: usize,
    /// Cluster every matching article
    #[arg(long, conflicts_with = "max_articles")]
    all_articles: bool,
}

impl ServiceArgs {
    fn to_config(&self) -> anyhow::Result<ServiceConfig> {
        let lookback = if self.all_dates {
            None
        } else {
            Some(
                chrono::Duration::try_days(i64::from(self.lookback_days)).ok_or_else(|| {
                    anyhow!("--lookback-days {} is out of range", self.lookback_days)
                })?,
            )
        };
        if !self.all_articles && self.max_articles == 0 {
            return Err(anyhow!("--max-articles must be at least 1"));
        }
        Ok(ServiceConfig {
            lookback,
            max_articles: (!self.all_articles).then_some(self.max_articles),
            ..Default::default()
        })
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum JunkPolicyArg {
    /// Drop the largest cluster of each window
    Largest,
    /// Drop clusters above --max-cluster-articles
    Threshold,
    /// Keep every cluster
    #[value(name = "none")]
    Keep,
}

impl PipelineArgs {
    fn to_config(&self) -> anyhow::Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::from_json_file(path)
                .with_context(|| format!("Failed to load pipeline config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(window_delta) = self.window_delta {
            config.window_delta = window_delta;
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        if let Some(xi) = self.xi {
            config.xi = xi;
        }
        if let Some(min_samples) = self.min_samples {
            config.min_samples = MinSamples::Fixed(min_samples);
        }
        if let Some(policy) = self.junk_policy {
            config.junk_policy = match policy {
                JunkPolicyArg::Largest => JunkPolicy::RemoveLargest,
                JunkPolicyArg::Threshold => JunkPolicy::RemoveByThreshold {
                    max_articles: self.max_cluster_articles.ok_or_else(|| {
                        anyhow!("--junk-policy threshold requires --max-cluster-articles")
                    })?,
                },
                JunkPolicyArg::Keep => JunkPolicy::None,
            };
        }

        config.validate()?;
        Ok(config)
    }
}

async fn build(
    input: PathBuf,
    queries: Vec<String>,
    pipeline: &PipelineArgs,
    service: &ServiceArgs,
    summarize: bool,
    summary_words: Option<usize>,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(pipeline.to_config()?)?;
    info!("⚙️ Pipeline configuration: {:?}", pipeline.config());

    let service_config = service.to_config()?;
    let mut service = TimelineService::new(Arc::new(JsonFileSource::new(&input)), pipeline)
        .with_config(service_config)
        .with_cache(Arc::new(InMemoryCache::new()));
    if summarize {
        let summarizer = create_summarizer("lead", summary_words)?;
        info!("🧠 Summarizing events with {}", summarizer.name());
        service = service.with_summarizer(summarizer);
    }

    let queries = if queries.is_empty() { vec![String::new()] } else { queries };
    let mut printed = serde_json::Map::new();
    for query in &queries {
        let timeline = match service.get_timeline(query).await {
            Ok(timeline) => timeline,
            Err(e) if e.is_clustering_failure() => {
                error!("❌ Clustering failed for '{}', no timeline produced", query);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        info!("📅 '{}': {} events", query, timeline.len());

        match &output_dir {
            Some(dir) => {
                let path = write_timeline(dir, query, &timeline).await?;
                info!("💾 Timeline written to {}", path.display());
            }
            None => {
                printed.insert(query.clone(), serde_json::to_value(&timeline)?);
            }
        }
    }

    if output_dir.is_none() {
        let json = if queries.len() == 1 {
            serde_json::to_string_pretty(&printed[&queries[0]])?
        } else {
            serde_json::to_string_pretty(&printed)?
        };
        println!("{}", json);
    }
    Ok(())
}

async fn show_windows(input: PathBuf, pipeline: &PipelineArgs) -> anyhow::Result<()> {
    let config = pipeline.to_config()?;
    let articles = JsonFileSource::new(&input)
        .load()
        .await
        .with_context(|| format!("Failed to read articles from {}", input.display()))?;
    let min_samples = config.min_samples.resolve(articles.len());
    let windows = partition_into_windows(&articles, config.window_delta, config.step)?;

    info!(
        "🪟 {} windows over {} articles (min_samples={})",
        windows.len(),
        articles.len(),
        min_samples
    );
    for window in &windows {
        let note = if window.len() < min_samples { "  skipped" } else { "" };
        println!(
            "{}  [{} .. {}]  {:>4} articles{}",
            window.center,
            window.start,
            window.end,
            window.len(),
            note
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(logging::level_for(cli.verbose, cli.quiet));

    match cli.command {
        Commands::Build {
            input,
            queries,
            pipeline,
            service,
            summarize,
            summary_words,
            output_dir,
        } => {
            build(
                input,
                queries,
                &pipeline,
                &service,
                summarize,
                summary_words,
                output_dir,
            )
            .await
        }
        Commands::Windows { input, pipeline } => show_windows(input, &pipeline).await,
    }
}
