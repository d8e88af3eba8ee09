// - In the default output mode, stdout carries only rendered reports.
// - In --json mode, stdout must be valid JSONL, one report per line.
// Logs and prompts go to stderr.
#![deny(clippy::print_stdout)]

mod cli;
mod render;

pub use cli::ChartArg;
pub use cli::Cli;
pub use cli::Color;
pub use render::RenderOptions;
pub use render::write_human;
pub use render::write_json;

use std::io::IsTerminal;
use std::io::Write;

use anyhow::Context;
use radar_core::Analyzer;
use radar_core::Report;
use radar_core::config::Config;
use radar_core::config::ConfigOverrides;
use supports_color::Stream;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Typed at the interactive prompt to leave the loop.
const QUIT_COMMAND: &str = ":quit";

enum OutputMode {
    Human(RenderOptions),
    Json,
}

pub async fn run_main(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        name,
        provider,
        model,
        base_url,
        chart,
        json: json_mode,
        color,
        no_cache,
    } = cli;

    let (stdout_with_ansi, stderr_with_ansi) = match color {
        Color::Always => (true, true),
        Color::Never => (false, false),
        Color::Auto => (
            supports_color::on_cached(Stream::Stdout).is_some(),
            supports_color::on_cached(Stream::Stderr).is_some(),
        ),
    };

    let default_level = "error";
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(stderr_with_ansi)
        .with_writer(std::io::stderr)
        .with_filter(env_filter);
    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();

    let overrides = ConfigOverrides {
        model_provider: provider,
        model,
        base_url,
        chart: chart.map(Into::into),
        disable_cache: no_cache,
    };
    let config = Config::load_with_overrides(overrides).context("failed to load configuration")?;
    debug!(
        provider = %config.model_provider_id,
        model = %config.model,
        "configuration loaded"
    );

    let analyzer = Analyzer::from_config(&config)?;
    let output = if json_mode {
        OutputMode::Json
    } else {
        OutputMode::Human(RenderOptions::new(config.chart, stdout_with_ansi))
    };

    if !name.is_empty() {
        let report = analyzer.analyze(&name.join(" ")).await?;
        return emit(&report, &output);
    }

    let interactive = std::io::stdin().is_terminal();
    let mut line = String::new();
    loop {
        if interactive {
            prompt()?;
        }
        line.clear();
        let read = std::io::stdin()
            .read_line(&mut line)
            .context("failed to read a name from stdin")?;
        if read == 0 {
            break;
        }

        let name = line.trim();
        if name == QUIT_COMMAND {
            break;
        }
        if name.is_empty() {
            continue;
        }
        let report = analyzer.analyze(name).await?;
        emit(&report, &output)?;
    }

    Ok(())
}

#[allow(clippy::print_stderr)]
fn prompt() -> anyhow::Result<()> {
    eprint!("name (or {QUIT_COMMAND})> ");
    std::io::stderr().flush()?;
    Ok(())
}

fn emit(report: &Report, output: &OutputMode) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    match output {
        OutputMode::Human(options) => write_human(report, options, &mut stdout)?,
        OutputMode::Json => write_json(report, &mut stdout)?,
    }
    stdout.flush()?;
    Ok(())
}
