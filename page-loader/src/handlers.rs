use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use page_loader_core::{
    MirrorConfig, MirrorError, MirrorEvent, MirrorResult, PageMirror, ProgressCallback,
};
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::MakeWriter;

const PROGRESS_TEMPLATE: &str = "{msg} |{bar:40}| {percent}% (eta: {eta})";

/// How the result of a download is printed on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Everything a download needs, pulled out of the parsed command line
#[derive(Debug, Clone)]
pub struct DownloadArgs {
    pub url: String,
    pub output_dir: PathBuf,
    pub config: MirrorConfig,
    pub format: OutputFormat,
    pub quiet: bool,
    pub verbose: u8,
}

impl DownloadArgs {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let url = matches.get_one::<String>("URL").context("a URL is required")?;
        let output = matches
            .get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or(".");
        let connect_timeout = *matches
            .get_one::<u64>("connect-timeout")
            .context("missing --connect-timeout")?;
        let read_timeout = *matches
            .get_one::<u64>("timeout")
            .context("missing --timeout")?;
        let format = matches
            .get_one::<String>("format")
            .map(String::as_str)
            .unwrap_or("text");
        let format = OutputFormat::from_str(format)
            .with_context(|| format!("unsupported output format '{}'", format))?;

        Ok(Self {
            url: url.clone(),
            output_dir: expand_output_dir(output),
            config: MirrorConfig::with_timeouts(connect_timeout, read_timeout),
            format,
            quiet: matches.get_flag("quiet"),
            verbose: matches.get_count("verbose"),
        })
    }
}

/// Expand a leading `~` in the output directory argument
pub fn expand_output_dir(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).as_ref())
}

/// Log level used when `RUST_LOG` is not set
pub fn default_log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Writes log lines to stderr without tearing an active progress bar.
#[derive(Clone)]
struct ProgressBarWriter {
    bar: ProgressBar,
}

impl Write for ProgressBarWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bar.suspend(|| io::stderr().lock().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().lock().flush()
    }
}

impl<'a> MakeWriter<'a> for ProgressBarWriter {
    type Writer = ProgressBarWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

pub fn init_tracing(default_level: &str, bar: ProgressBar) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(ProgressBarWriter { bar })
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}

/// A bar that stays hidden until there are assets to count
pub fn download_progress_bar() -> ProgressBar {
    let style = ProgressStyle::with_template(PROGRESS_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");

    let bar = ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::hidden());
    bar.set_style(style);
    bar.set_message("Downloading:");
    bar
}

pub fn progress_callback(bar: ProgressBar, show: bool) -> ProgressCallback {
    Arc::new(move |event: &MirrorEvent| match event {
        MirrorEvent::AssetsFound { total } if show && *total > 0 => {
            bar.set_length(*total as u64);
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        MirrorEvent::AssetSaved { .. } => bar.inc(1),
        MirrorEvent::Finished { .. } => bar.finish_and_clear(),
        _ => {}
    })
}

pub async fn run_download(
    args: &DownloadArgs,
    bar: ProgressBar,
) -> std::result::Result<MirrorResult, MirrorError> {
    let mirror = PageMirror::with_config(&args.config)?
        .with_progress_callback(progress_callback(bar, !args.quiet));

    mirror.download(&args.url, &args.output_dir).await
}

pub fn render_result(result: &MirrorResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format!(
            "Page was downloaded as '{}'",
            result.html_file_path.display()
        )),
        OutputFormat::Json => {
            serde_json::to_string_pretty(result).context("failed to serialize the result")
        }
    }
}

fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", "Error:".red().bold(), message);
    std::process::exit(1);
}

pub async fn handle_download(matches: &ArgMatches) {
    let args = match DownloadArgs::from_matches(matches) {
        Ok(args) => args,
        Err(e) => exit_with_error(e),
    };

    let bar = download_progress_bar();
    init_tracing(default_log_level(args.quiet, args.verbose), bar.clone());
    debug!(?args, "CLI arguments parsed");

    match run_download(&args, bar.clone()).await {
        Ok(result) => match render_result(&result, args.format) {
            Ok(output) => println!("{}", output),
            Err(e) => exit_with_error(e),
        },
        Err(e) => {
            bar.finish_and_clear();
            debug!(error = ?e, "Download failed");
            exit_with_error(e);
        }
    }
}
