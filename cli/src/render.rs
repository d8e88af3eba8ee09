use std::io::Write;

use owo_colors::OwoColorize;
use radar_core::Report;
use radar_core::ReportStatus;
use radar_core::RiskLevel;
use radar_core::Severity;
use radar_core::Timeline;
use radar_core::TimelinePoint;
use radar_core::config::ChartKind;
use textwrap::Options as WrapOptions;
use textwrap::wrap;

const DEFAULT_WIDTH: usize = 80;
const PLOT_WIDTH: usize = 24;
const BAR_UNIT: &str = "████";
const POINT_MARKER: char = '●';
const LINE_STROKE: char = '─';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub chart: ChartKind,
    pub color: bool,
    /// Total line width descriptions are wrapped to.
    pub width: usize,
}

impl RenderOptions {
    pub fn new(chart: ChartKind, color: bool) -> Self {
        Self {
            chart,
            color,
            width: DEFAULT_WIDTH,
        }
    }
}

pub fn write_json<W: Write>(report: &Report, writer: &mut W) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_human<W: Write>(
    report: &Report,
    options: &RenderOptions,
    writer: &mut W,
) -> anyhow::Result<()> {
    if options.color {
        writeln!(writer, "{}", report.subject.bold())?;
    } else {
        writeln!(writer, "{}", report.subject)?;
    }

    let mut notes = Vec::new();
    if report.undated_issues > 0 {
        notes.push(format!("{} undated", report.undated_issues));
    }
    if !report.quarantined.is_empty() {
        notes.push(format!("{} unreadable entries skipped", report.quarantined.len()));
    }
    if report.cached {
        notes.push("cached".to_string());
    }
    if notes.is_empty() {
        writeln!(writer, "Total issues: {}", report.total_issues)?;
    } else {
        writeln!(
            writer,
            "Total issues: {} ({})",
            report.total_issues,
            notes.join(", ")
        )?;
    }

    writeln!(
        writer,
        "{} {}",
        badge(report.rating.level, options.color),
        report.rating.message
    )?;

    match &report.status {
        ReportStatus::Completed => {}
        ReportStatus::Uninterpretable { detail } => {
            writeln!(writer, "note: could not interpret the model's answer: {detail}")?;
        }
        ReportStatus::FetchFailed { detail } => {
            writeln!(writer, "note: issue lookup failed: {detail}")?;
        }
    }

    let points = report.timeline.points();
    if points.is_empty() {
        writeln!(writer, "Timeline: no dated issues")?;
    } else {
        writeln!(writer, "Timeline:")?;
        let graphics = chart_graphics(&report.timeline, options.chart);
        for (point, graphic) in points.iter().zip(graphics) {
            write_row(writer, point, &graphic, options)?;
        }
    }
    writeln!(writer)?;

    Ok(())
}

fn badge(level: RiskLevel, color: bool) -> String {
    let label = format!("[{}]", level.as_str().to_uppercase());
    if !color {
        return label;
    }
    match level {
        RiskLevel::None => label.green().bold().to_string(),
        RiskLevel::Caution => label.yellow().bold().to_string(),
        RiskLevel::High => label.red().bold().to_string(),
    }
}

fn paint(text: &str, severity: Severity, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match severity {
        Severity::High => text.red().to_string(),
        Severity::Medium => text.yellow().to_string(),
        Severity::Low => text.green().to_string(),
        Severity::Unknown => text.dimmed().to_string(),
    }
}

fn severity_units(severity: Severity) -> usize {
    match severity {
        Severity::High => 3,
        Severity::Medium => 2,
        Severity::Low | Severity::Unknown => 1,
    }
}

/// One uncolored graphic per point, each `PLOT_WIDTH` columns wide.
fn chart_graphics(timeline: &Timeline, chart: ChartKind) -> Vec<String> {
    let points = timeline.points();
    let graphics: Vec<String> = match chart {
        ChartKind::Bar => points
            .iter()
            .map(|point| BAR_UNIT.repeat(severity_units(point.severity)))
            .collect(),
        ChartKind::Scatter => {
            let Some((first, last)) = timeline.span() else {
                return Vec::new();
            };
            let span_days = last.signed_duration_since(first).num_days();
            points
                .iter()
                .map(|point| {
                    let offset = point.date.signed_duration_since(first).num_days();
                    let column = if span_days == 0 {
                        0
                    } else {
                        usize::try_from(offset * (PLOT_WIDTH as i64 - 1) / span_days)
                            .unwrap_or(0)
                    };
                    format!("{}{POINT_MARKER}", " ".repeat(column))
                })
                .collect()
        }
        ChartKind::Line => {
            let total = points.len();
            (1..=total)
                .map(|running| {
                    let column = running * (PLOT_WIDTH - 1) / total;
                    format!("{}{POINT_MARKER}", LINE_STROKE.to_string().repeat(column))
                })
                .collect()
        }
    };
    graphics
        .into_iter()
        .map(|graphic| format!("{graphic:<PLOT_WIDTH$}"))
        .collect()
}

fn write_row<W: Write>(
    writer: &mut W,
    point: &TimelinePoint,
    graphic: &str,
    options: &RenderOptions,
) -> anyhow::Result<()> {
    let severity = format!("{:<7}", point.severity.as_str());
    // "  " + date + "  " + graphic + "  " + severity + " "
    let indent = 2 + 10 + 2 + PLOT_WIDTH + 2 + severity.len() + 1;
    let description_width = options.width.saturating_sub(indent).max(20);
    let lines = wrap(&point.description, WrapOptions::new(description_width));

    let first = lines.first().map(ToString::to_string).unwrap_or_default();
    writeln!(
        writer,
        "  {}  {}  {} {first}",
        point.date,
        paint(graphic, point.severity, options.color),
        paint(&severity, point.severity, options.color),
    )?;
    for line in lines.iter().skip(1) {
        writeln!(writer, "{}{line}", " ".repeat(indent))?;
    }
    Ok(())
}
