use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use rjmm_core::config_file::{self, ConfigFile};
use rjmm_core::{AuthorLookup, DisabledLookup, HttpAuthorLookup};
use rjmm_ingest::{ExtractionContext, IngestError, Ingestor, Source};
use rjmm_parsing::PageText;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

mod output;
mod settings;

use output::ColorMode;
use settings::{EnvOverrides, LookupSettings};

/// RJMM metadata extractor - Read title, authors, affiliations and dates from
/// the first page of Romanian Journal of Military Medicine articles
#[derive(Parser, Debug)]
#[command(name = "rjmm", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract metadata from one or more articles
    Parse {
        /// PDF paths, extracted-text (.txt) paths or http(s) URLs
        #[arg(required = true)]
        inputs: Vec<Source>,

        /// Known article title; replaces title detection when found on the page
        #[arg(long)]
        title_override: Option<String>,

        /// Issue designation, e.g. "No.5 / 2025, Vol. CXXVIII, September"
        #[arg(long)]
        issue: Option<String>,

        /// Skip the author-profile lookup (every author reports exists=false)
        #[arg(long)]
        no_lookup: bool,

        /// Author-profile URL template containing {slug}
        #[arg(long)]
        lookup_url: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of inputs processed concurrently
        #[arg(long, default_value_t = 4)]
        jobs: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the detected layout of each input
    Classify {
        /// PDF paths, extracted-text (.txt) paths or http(s) URLs
        #[arg(required = true)]
        inputs: Vec<Source>,

        /// Number of inputs processed concurrently
        #[arg(long, default_value_t = 4)]
        jobs: usize,
    },

    /// Print the extracted page text with line numbers
    DumpText {
        /// PDF path, extracted-text (.txt) path or http(s) URL
        input: Source,

        /// Number of leading pages to extract
        #[arg(long, default_value_t = 1)]
        pages: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config_file::load_config();

    match cli.command {
        Command::Parse {
            inputs,
            title_override,
            issue,
            no_lookup,
            lookup_url,
            format,
            output,
            jobs,
            no_color,
        } => {
            let lookup = settings::resolve_lookup(no_lookup, lookup_url, &EnvOverrides::from_env(), &config);
            let request = ParseRequest {
                title_override,
                issue,
                format,
                output,
                jobs,
                no_color,
            };
            parse(inputs, request, lookup, &config).await
        }
        Command::Classify { inputs, jobs } => classify(inputs, jobs, &config).await,
        Command::DumpText {
            input,
            pages,
            no_color,
        } => dump_text(input, pages, no_color, &config).await,
    }
}

struct ParseRequest {
    title_override: Option<String>,
    issue: Option<String>,
    format: OutputFormat,
    output: Option<PathBuf>,
    jobs: usize,
    no_color: bool,
}

/// Build the blocking HTTP clients off the async threads.
async fn build_ingestor(config: &ConfigFile) -> anyhow::Result<Arc<Ingestor>> {
    let fetch = settings::fetch_settings(config);
    let ingestor = tokio::task::spawn_blocking(move || Ingestor::new(fetch)).await??;
    Ok(Arc::new(ingestor))
}

async fn build_lookup(settings: LookupSettings) -> anyhow::Result<Arc<dyn AuthorLookup>> {
    if !settings.enabled {
        return Ok(Arc::new(DisabledLookup));
    }
    let lookup = tokio::task::spawn_blocking(move || {
        HttpAuthorLookup::with_settings(&settings.url_template, settings.timeout)
    })
    .await??;
    Ok(Arc::new(lookup))
}

fn progress_bar(total: usize) -> ProgressBar {
    if total < 2 {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} [{bar:40.cyan/dim}] {pos}/{len} {msg}") {
        bar.set_style(style);
    }
    bar
}

/// Run `work` over every input on the blocking pool, at most `jobs` at a
/// time, in input order. Ctrl-C stops scheduling; inputs already running
/// complete. Returns the processed inputs only.
async fn run_all<T, F>(
    inputs: Vec<Source>,
    jobs: usize,
    progress: &ProgressBar,
    work: F,
) -> anyhow::Result<Vec<(Source, Result<T, IngestError>)>>
where
    T: Send + 'static,
    F: Fn(&Source) -> Result<T, IngestError> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));

    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_clone.cancel();
        }
    });

    let mut handles = Vec::with_capacity(inputs.len());
    for source in inputs {
        let permit = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::warn!("interrupted, not scheduling remaining inputs");
                break;
            }
            permit = Arc::clone(&semaphore).acquire_owned() => permit?,
        };
        let work = Arc::clone(&work);
        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let result = work(&source);
            (source, result)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let (source, result) = handle.await?;
        progress.set_message(source.to_string());
        progress.inc(1);
        results.push((source, result));
    }
    progress.finish_and_clear();
    Ok(results)
}

/// Report failed inputs on stderr and keep the successful ones.
fn finish<T>(
    total: usize,
    results: Vec<(Source, Result<T, IngestError>)>,
    color: ColorMode,
) -> anyhow::Result<Vec<(Source, T)>> {
    let processed = results.len();
    let mut stderr = std::io::stderr();
    let mut ok = Vec::with_capacity(processed);
    for (source, result) in results {
        match result {
            Ok(value) => ok.push((source, value)),
            Err(err) => {
                tracing::debug!(input = %source, error = ?err, "input failed");
                output::print_failure(&mut stderr, &source.to_string(), &err, color)?;
            }
        }
    }
    tracing::info!(total, processed, succeeded = ok.len(), "run finished");
    Ok(ok)
}

fn open_writer(output: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match output {
        Some(path) => Box::new(std::fs::File::create(path)?),
        None => Box::new(std::io::stdout()),
    })
}

fn exit_status(total: usize, succeeded: usize) -> anyhow::Result<()> {
    if succeeded < total {
        anyhow::bail!("{} of {} inputs failed or were not processed", total - succeeded, total);
    }
    Ok(())
}

async fn parse(
    inputs: Vec<Source>,
    request: ParseRequest,
    lookup: LookupSettings,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    let total = inputs.len();
    let color = ColorMode(!request.no_color && request.output.is_none());
    let ingestor = build_ingestor(config).await?;
    let lookup = build_lookup(lookup).await?;

    let title_override = request.title_override.clone();
    let issue = request.issue.clone();
    let progress = progress_bar(total);
    let results = run_all(inputs, request.jobs, &progress, move |source| {
        let ctx = ExtractionContext {
            issue: issue.clone(),
            title_override: title_override.clone(),
            ..ExtractionContext::new(source.to_string())
        };
        ingestor.extract(source, &ctx, lookup.as_ref())
    })
    .await?;

    let records: Vec<_> = finish(total, results, color)?
        .into_iter()
        .map(|(_, record)| record)
        .collect();

    let mut writer = open_writer(request.output.as_ref())?;
    match request.format {
        OutputFormat::Json => output::print_json(&mut writer, &records)?,
        OutputFormat::Text => {
            for record in &records {
                output::print_record_text(&mut writer, record, color)?;
            }
        }
    }
    writer.flush()?;

    exit_status(total, records.len())
}

async fn classify(inputs: Vec<Source>, jobs: usize, config: &ConfigFile) -> anyhow::Result<()> {
    let total = inputs.len();
    let ingestor = build_ingestor(config).await?;
    let progress = progress_bar(total);
    let results = run_all(inputs, jobs, &progress, move |source| ingestor.classify(source)).await?;

    let tags = finish(total, results, ColorMode(false))?;
    let mut stdout = std::io::stdout();
    for (source, tag) in &tags {
        output::print_classification(&mut stdout, *tag, &source.to_string())?;
    }
    exit_status(total, tags.len())
}

async fn dump_text(
    input: Source,
    pages: usize,
    no_color: bool,
    config: &ConfigFile,
) -> anyhow::Result<()> {
    let ingestor = build_ingestor(config).await?;
    let text = tokio::task::spawn_blocking(move || ingestor.page_text(&input, pages.max(1))).await??;
    let page = PageText::new(&text);
    output::print_numbered_lines(&mut std::io::stdout(), &page, ColorMode(!no_color))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flags() {
        let cli = Cli::try_parse_from([
            "rjmm",
            "parse",
            "a.pdf",
            "https://revistamedicinamilitara.ro/b.pdf",
            "--issue",
            "No.5 / 2025, Vol. CXXVIII",
            "--no-lookup",
            "--format",
            "text",
            "--jobs",
            "2",
        ])
        .unwrap();
        let Command::Parse {
            inputs,
            issue,
            no_lookup,
            format,
            jobs,
            ..
        } = cli.command
        else {
            panic!("expected parse");
        };
        assert_eq!(
            inputs,
            vec![
                Source::Path("a.pdf".into()),
                Source::Url("https://revistamedicinamilitara.ro/b.pdf".into())
            ]
        );
        assert_eq!(issue.as_deref(), Some("No.5 / 2025, Vol. CXXVIII"));
        assert!(no_lookup);
        assert_eq!(format, OutputFormat::Text);
        assert_eq!(jobs, 2);
    }

    #[test]
    fn inputs_are_required() {
        assert!(Cli::try_parse_from(["rjmm", "parse"]).is_err());
        assert!(Cli::try_parse_from(["rjmm", "classify"]).is_err());
    }

    #[test]
    fn dump_text_defaults_to_one_page() {
        let cli = Cli::try_parse_from(["rjmm", "dump-text", "page.txt"]).unwrap();
        assert!(matches!(cli.command, Command::DumpText { pages: 1, .. }));
    }

    #[test]
    fn exit_status_reflects_failures() {
        assert!(exit_status(2, 2).is_ok());
        assert!(exit_status(2, 1).is_err());
    }
}
