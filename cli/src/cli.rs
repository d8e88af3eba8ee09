use clap::Parser;
use clap::ValueEnum;
use radar_core::config::ChartKind;

#[derive(Parser, Debug)]
#[command(version, about = "Screen a name for known legal or problematic issues.")]
pub struct Cli {
    /// Name to analyze; multiple words are joined with spaces. When omitted,
    /// names are read from stdin one per line until EOF or `:quit`.
    #[arg(value_name = "NAME")]
    pub name: Vec<String>,

    /// Model provider id from the built-ins or `config.toml`.
    #[arg(long = "provider", value_name = "ID")]
    pub provider: Option<String>,

    /// Model the provider should use.
    #[arg(long, short = 'm')]
    pub model: Option<String>,

    /// Override the provider's base URL.
    #[arg(long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Timeline chart style.
    #[arg(long, value_enum)]
    pub chart: Option<ChartArg>,

    /// Print one JSON report per line instead of the human summary.
    #[arg(long = "json", default_value_t = false)]
    pub json: bool,

    /// Specifies color settings for use in the output.
    #[arg(long = "color", value_enum, default_value_t = Color::Auto)]
    pub color: Color,

    /// Always ask the provider, even for a name analyzed moments ago.
    #[arg(long = "no-cache", default_value_t = false)]
    pub no_cache: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum Color {
    Always,
    Never,
    #[default]
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum ChartArg {
    Bar,
    Scatter,
    Line,
}

impl From<ChartArg> for ChartKind {
    fn from(value: ChartArg) -> Self {
        match value {
            ChartArg::Bar => ChartKind::Bar,
            ChartArg::Scatter => ChartKind::Scatter,
            ChartArg::Line => ChartKind::Line,
        }
    }
}
