mod cli;
mod color;
mod config;
mod decode;
mod metrics;
mod model;
mod render;
mod resources;
mod status;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliArgs;
use color::StatusColor;
use k8s_openapi::jiff::Timestamp;
use model::PodUsage;
use std::collections::HashMap;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(&args.log_filter)?;

    let defaults = match config::load() {
        Ok(defaults) => defaults,
        Err(error) => {
            warn!("ignoring unusable config: {error:#}");
            config::RenderDefaults::default()
        }
    };
    if let Some(source) = defaults.source.as_deref() {
        debug!("loaded render defaults from {source}");
    }

    let wide = args.wide || defaults.wide;
    let colorize = args.color || defaults.color;
    let anchor = resolve_age_anchor(args.age_from.as_deref())?;

    let raw = read_document(&args.snapshot)?;
    let items = decode::parse_items(&raw)
        .with_context(|| format!("failed to parse pod snapshot {}", args.snapshot))?;

    let usage_index = match args.metrics.as_deref() {
        Some(path) => load_usage_index(path)?,
        None => HashMap::new(),
    };
    let metrics_enabled = args.metrics.is_some();

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for item in items {
        match decode::pod_snapshot(item) {
            Ok(pod) => {
                if let Some(namespace) = args.namespace.as_deref()
                    && pod.namespace != namespace
                {
                    continue;
                }
                let usage = usage_index.get(&format!("{}/{}", pod.namespace, pod.name));
                rows.push(render::row_fields(&pod, usage, anchor));
            }
            Err(error) => {
                warn!("skipping pod row: {error}");
                skipped += 1;
            }
        }
    }

    rows.sort_by(|left, right| left[..2].cmp(&right[..2]));

    print_table(&rows, wide, metrics_enabled, colorize, args.no_headers);

    if skipped > 0 {
        warn!("skipped {skipped} pod rows that failed to decode");
    }

    Ok(())
}

fn init_tracing(level_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_new(level_filter)
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();

    Ok(())
}

fn read_document(target: &str) -> Result<String> {
    if target == "-" {
        return std::io::read_to_string(std::io::stdin())
            .context("failed to read snapshot from stdin");
    }

    std::fs::read_to_string(target).with_context(|| format!("failed to read snapshot {target}"))
}

fn load_usage_index(path: &str) -> Result<HashMap<String, PodUsage>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read metrics snapshot {path}"))?;
    let items = decode::parse_items(&raw)
        .with_context(|| format!("failed to parse metrics snapshot {path}"))?;

    let mut index = HashMap::new();
    for item in items {
        match decode::pod_usage(item) {
            Ok((key, usage)) => {
                index.insert(key, usage);
            }
            Err(error) => warn!("skipping metrics row: {error}"),
        }
    }

    Ok(index)
}

fn resolve_age_anchor(age_from: Option<&str>) -> Result<Timestamp> {
    let Some(raw) = age_from else {
        return Ok(Timestamp::now());
    };

    let instant = chrono::DateTime::parse_from_rfc3339(raw)
        .with_context(|| format!("--age-from is not a valid RFC3339 instant: {raw}"))?;
    Timestamp::from_second(instant.timestamp())
        .with_context(|| format!("--age-from is out of range: {raw}"))
}

fn print_table(
    rows: &[Vec<String>],
    wide: bool,
    metrics_enabled: bool,
    colorize: bool,
    no_headers: bool,
) {
    let columns = render::header();
    let visible = columns
        .iter()
        .enumerate()
        .filter(|(_, column)| (wide || !column.wide) && (metrics_enabled || !column.mx))
        .map(|(index, column)| (index, *column))
        .collect::<Vec<_>>();

    let mut widths = visible
        .iter()
        .map(|(_, column)| {
            if no_headers {
                0
            } else {
                column.name.chars().count()
            }
        })
        .collect::<Vec<_>>();
    for row in rows {
        for (slot, (index, _)) in visible.iter().enumerate() {
            widths[slot] = widths[slot].max(row[*index].chars().count());
        }
    }

    if !no_headers {
        let line = visible
            .iter()
            .enumerate()
            .map(|(slot, (_, column))| pad(column.name, widths[slot], column.align_right))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }

    for row in rows {
        let happy = render::is_happy(&row[render::READY_COLUMN]);
        let line = visible
            .iter()
            .enumerate()
            .map(|(slot, (index, column))| {
                let cell = pad(&row[*index], widths[slot], column.align_right);
                if colorize && *index == render::STATUS_COLUMN {
                    paint(&cell, color::color_for(&row[*index], happy))
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }
}

fn pad(value: &str, width: usize, align_right: bool) -> String {
    let padding = " ".repeat(width.saturating_sub(value.chars().count()));
    if align_right {
        format!("{padding}{value}")
    } else {
        format!("{value}{padding}")
    }
}

fn paint(cell: &str, color: StatusColor) -> String {
    let code = match color {
        StatusColor::Pending => "33",
        StatusColor::Creating => "36",
        StatusColor::Highlight => "34",
        StatusColor::Completed => "32",
        StatusColor::Kill => "35",
        StatusColor::Error => "31",
        StatusColor::Standard => return cell.to_string(),
    };

    format!("\x1b[{code}m{cell}\x1b[0m")
}
