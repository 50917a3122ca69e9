mod api;
mod server;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use channel_trends::config::AnalysisConfig;
use channel_trends::synthetic::{generate_batch, DEFAULT_BATCH_LEN};
use channel_trends::{
    analyze_with_config, format_float, format_number, format_percent, AnalysisRequest,
    AnalysisResult,
};

#[derive(Parser)]
#[command(name = "channel-trends", about = "Channel trend and health analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a batch document read from a file or stdin.
    Analyze(AnalyzeArgs),
    /// Analyze a seeded synthetic channel.
    Demo(DemoArgs),
    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    Serve(ServeArgs),
}

#[derive(Args, Debug, Clone)]
struct AnalyzeArgs {
    /// Path to the batch document, or `-` for stdin.
    #[arg(long, short)]
    input: Option<String>,
    /// Freeze the analysis clock (RFC 3339).
    #[arg(long)]
    now: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug, Clone)]
struct DemoArgs {
    #[arg(long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = DEFAULT_BATCH_LEN)]
    count: usize,
    #[arg(long)]
    now: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    json: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            seed: 42,
            count: DEFAULT_BATCH_LEN,
            now: None,
            config: None,
            json: false,
        }
    }
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the effective configuration as TOML.
    Init {
        #[arg(long, default_value = "config/trends.toml")]
        path: PathBuf,
        #[arg(long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    #[arg(long, default_value_t = 8787)]
    port: u16,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Demo(DemoArgs::default()));

    match command {
        Command::Analyze(args) => run_analyze(args),
        Command::Demo(args) => run_demo(args),
        Command::Config {
            command: ConfigCommand::Init { path, force },
        } => run_config_init(&path, force),
        Command::Serve(args) => server::serve(args).await,
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<(), String> {
    let (config, _) = AnalysisConfig::load(args.config)?;
    let raw = read_input(args.input.as_deref())?;
    let document: serde_json::Value =
        serde_json::from_str(&raw).map_err(|err| format!("invalid JSON input: {}", err))?;

    let mut request = AnalysisRequest::from_value(&document).map_err(|err| err.to_string())?;
    if let Some(now) = args.now.as_deref() {
        request.now = Some(parse_now(now)?);
    }

    let result = request.analyze(&config);
    emit(&result, args.json)
}

fn run_demo(args: DemoArgs) -> Result<(), String> {
    let (config, _) = AnalysisConfig::load(args.config)?;
    let now = match args.now.as_deref() {
        Some(now) => parse_now(now)?,
        None => Utc::now(),
    };
    let (items, aggregates) = generate_batch(args.seed, args.count, now);
    let result = analyze_with_config(&items, &aggregates, None, Some(now), &config);
    emit(&result, args.json)
}

fn run_config_init(path: &Path, force: bool) -> Result<(), String> {
    if path.exists() && !force {
        return Err(format!(
            "{} already exists; pass --force to overwrite",
            path.display()
        ));
    }
    let (config, _) = AnalysisConfig::load(None)?;
    config.write(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn emit(result: &AnalysisResult, json: bool) -> Result<(), String> {
    if json {
        let payload = serde_json::to_string_pretty(result)
            .map_err(|err| format!("failed to serialize result: {}", err))?;
        println!("{}", payload);
    } else {
        print_report(result);
    }
    Ok(())
}

fn print_report(result: &AnalysisResult) {
    let health = &result.channel_health_score;
    println!("Channel health: {}/100", health.overall);
    println!(
        "  engagement {} | consistency {} | growth {} | market alignment {} | content quality {}",
        health.breakdown.engagement,
        health.breakdown.consistency,
        health.breakdown.growth,
        health.breakdown.market_alignment,
        health.breakdown.content_quality
    );

    println!("\nRising content ({}):", result.rising_content.len());
    for item in &result.rising_content {
        println!(
            "  #{} [{}] {} (score {}, {} views/h, {} engagement, peak ~{} views)",
            item.rank,
            item.classification.label(),
            item.title,
            format_float(item.performance_score, 0),
            format_number(item.metrics.view_velocity),
            format_percent(item.metrics.engagement_rate),
            format_number(item.projection.estimated_peak_views as f64)
        );
    }

    let reasons = &result.trending_reasons;
    if !reasons.top_reasons.is_empty() {
        println!("\nWhy content is trending:");
        for reason in &reasons.top_reasons {
            println!("  - {} ({})", reason.name, reason.frequency);
        }
    }
    if !reasons.trending_topics.is_empty() {
        println!("\nTrending topics:");
        for topic in &reasons.trending_topics {
            println!("  - {} ({})", topic.name, topic.frequency);
        }
    }
    println!("\nOverall pattern: {}", reasons.overall_pattern);
    for insight in &reasons.market_insights {
        println!("  * {}", insight);
    }

    if !result.content_opportunities.is_empty() {
        println!("\nContent opportunities:");
        for opportunity in &result.content_opportunities {
            println!(
                "  - [{:?}] {}: {}",
                opportunity.priority, opportunity.theme, opportunity.suggestion
            );
        }
    }

    if !result.viral_potential.is_empty() {
        println!("\nViral potential:");
        for candidate in &result.viral_potential {
            println!(
                "  - {} (score {}, share {:?}, {}% confidence)",
                candidate.title,
                format_float(candidate.viral_score, 0),
                candidate.share_projection,
                candidate.projection.confidence
            );
        }
    }

    if !result.guaranteed_topics.is_empty() {
        println!("\nGuaranteed topics:");
        for topic in &result.guaranteed_topics {
            println!(
                "  - {} ({}%, {})",
                topic.topic, topic.confidence, topic.expected_views_range
            );
            println!("    {}", topic.reasoning);
        }
    }

    println!("\nRecommendations:");
    for recommendation in &health.recommendations {
        println!("- {}", recommendation);
    }
}

fn read_input(path: Option<&str>) -> Result<String, String> {
    match path {
        Some(path) if path != "-" => std::fs::read_to_string(path)
            .map_err(|err| format!("failed reading {}: {}", path, err)),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|err| format!("failed reading stdin: {}", err))?;
            if buffer.trim().is_empty() {
                return Err("missing batch document: pass --input or pipe stdin".to_string());
            }
            Ok(buffer)
        }
    }
}

fn parse_now(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(|err| format!("invalid --now timestamp {}: {}", value, err))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}
