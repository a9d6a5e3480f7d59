//! blockwatch - one-shot generator for the intraday market page.
//!
//! Each invocation is a full, independent run: acquire the current report
//! (with bounded retries), resolve which quarter-hour block represents
//! "now", render the page, publish it atomically, exit. Scheduling is
//! external - a cron entry at quarter-hour boundaries is the expected
//! driver - so no state survives between runs.
//!
//! Degraded data never fails the run; the page is always produced and the
//! resolver's diagnostic explains what is being shown. Only structural
//! problems (unreadable config, a report whose header lost a required
//! column, an unwritable output path) exit non-zero.

mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use blockwatch_core::{Resolution, acquire_with_retry, next_quarter_hour, resolve};
use blockwatch_fetch::ReportSource;
use blockwatch_render::{PageModel, render_page, write_page};
use blockwatch_types::Table;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = Config::load(config_path.as_deref())?;
    let timezone = config.market_timezone()?;

    let mut source =
        ReportSource::new(config.fetch_config()?).context("building report source")?;
    let table = acquire_with_retry(&mut source, config.retry_policy())
        .await
        .unwrap_or_else(|| {
            warn!("acquisition exhausted its retry budget; continuing without data");
            Table::default()
        });

    let now = Utc::now().with_timezone(&timezone);
    let resolution = resolve(
        &table,
        now.time(),
        &config.interval_column,
        &config.payload_columns,
    )
    .context("resolving current time block")?;

    if resolution.is_degraded() {
        warn!(diagnostic = %resolution.diagnostic, "showing fallback data");
    }

    let model = page_model(&config, &table, &resolution, now);
    write_page(&config.output_path, &render_page(&model))
        .with_context(|| format!("writing {}", config.output_path.display()))?;

    info!(
        path = %config.output_path.display(),
        block = model.interval_label.as_deref().unwrap_or("none"),
        next_update = %model.next_update,
        "page generated"
    );
    Ok(())
}

/// Assemble the render model from a resolution at `now`.
fn page_model(
    config: &Config,
    table: &Table,
    resolution: &Resolution<'_>,
    now: DateTime<Tz>,
) -> PageModel {
    let interval_index = table.column_index(&config.interval_column);

    let interval_label = resolution.selected.and_then(|selection| {
        let cell = interval_index.and_then(|index| selection.row.get(index))?;
        Some(cell.to_string().trim().to_string())
    });

    let fields = resolution
        .selected
        .map(|selection| {
            config
                .payload_columns
                .iter()
                .filter_map(|name| {
                    let value = table
                        .column_index(name)
                        .and_then(|index| selection.row.get(index))?;
                    let display = if value.is_blank() {
                        "n/a".to_string()
                    } else {
                        value.to_string()
                    };
                    Some((name.clone(), display))
                })
                .collect()
        })
        .unwrap_or_default();

    PageModel {
        generated_at: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        timezone: config.timezone.clone(),
        interval_label,
        fields,
        diagnostic: resolution.diagnostic.clone(),
        next_update: next_quarter_hour(now.naive_local())
            .format("%H:%M")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use blockwatch_types::{Row, Value};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    fn test_config() -> Config {
        Config {
            interval_column: "interval".to_string(),
            payload_columns: vec!["volume".to_string(), "price".to_string()],
            timezone: "Europe/Prague".to_string(),
            ..Config::default()
        }
    }

    fn test_table() -> Table {
        Table::new(
            vec![
                "interval".to_string(),
                "volume".to_string(),
                "price".to_string(),
            ],
            vec![Row::new(vec![
                " 14:00-14:15 ".into(),
                Value::Number(12.5),
                Value::Empty,
            ])],
        )
    }

    fn prague_afternoon() -> DateTime<Tz> {
        chrono_tz::Europe::Prague
            .with_ymd_and_hms(2026, 8, 4, 14, 3, 22)
            .unwrap()
    }

    #[test]
    fn model_carries_the_selected_row() {
        let config = test_config();
        let table = test_table();
        let resolution = resolve(
            &table,
            prague_afternoon().time(),
            &config.interval_column,
            &config.payload_columns,
        )
        .unwrap();

        let model = page_model(&config, &table, &resolution, prague_afternoon());
        assert_eq!(model.interval_label.as_deref(), Some("14:00-14:15"));
        assert_eq!(
            model.fields,
            vec![
                ("volume".to_string(), "12.5".to_string()),
                ("price".to_string(), "n/a".to_string()),
            ]
        );
        assert_eq!(model.generated_at, "2026-08-04 14:03:22");
        assert_eq!(model.next_update, "14:15");
        assert_eq!(model.diagnostic, "");
    }

    #[test]
    fn model_survives_an_empty_table() {
        let config = test_config();
        let table = Table::default();
        let resolution = resolve(
            &table,
            prague_afternoon().time(),
            &config.interval_column,
            &config.payload_columns,
        )
        .unwrap();

        let model = page_model(&config, &table, &resolution, prague_afternoon());
        assert_eq!(model.interval_label, None);
        assert!(model.fields.is_empty());
        assert_eq!(model.diagnostic, "no data at all");
    }
}
