use crate::output::print_table;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use shopgen_core::config::Config;
use shopgen_core::daterange::{Clock, DateRange, SystemClock};
use shopgen_core::random::RngSource;
use shopgen_core::simulator::OrderSimulator;
use shopgen_core::sink::{JsonLinesSink, OrderSink};
use shopgen_core::types::{weekday_index, Order, PolicyVariant, WEEKDAY_NAMES};
use std::path::Path;
use tracing::debug;

/// Which dates to simulate.
pub enum Window {
    /// The N days before today; `None` takes `generation.days` from config.
    LastDays(Option<u32>),
    /// `[from, to)`.
    Between(NaiveDate, NaiveDate),
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub fn run(
    config_path: &Path,
    window: Window,
    seed: Option<u64>,
    variant: Option<PolicyVariant>,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = Config::load_or_default(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    if let Some(variant) = variant {
        config.simulation.variant = variant;
        config.simulation.volume = None;
    }

    let simulator =
        OrderSimulator::new(config.simulation.policy()).context("invalid simulation policy")?;
    let range = match window {
        Window::Between(from, to) => DateRange::new(from, to)?,
        Window::LastDays(days) => DateRange::last_days(
            SystemClock.today(),
            days.unwrap_or(config.generation.days),
        )?,
    };
    let seed = seed.or(config.generation.seed);
    debug!(start = %range.start(), end = %range.end(), ?seed, "simulating orders");
    let mut source = RngSource::from_seed_opt(seed);

    if json {
        let stdout = std::io::stdout();
        let mut sink = JsonLinesSink::new(stdout.lock());
        simulator
            .run(range, &mut source, &mut sink)
            .context("failed to write orders")?;
        return Ok(());
    }

    let mut rows = OrderRows::default();
    let total = simulator.run(range, &mut source, &mut rows)?;
    print_table(
        &["DAY", "WEEKDAY", "CREATED_AT", "COMPLETED_AT", "LATENCY"],
        rows.0,
    );
    println!("\n{total} orders over {} days", range.num_days());
    Ok(())
}

// ---------------------------------------------------------------------------
// Table rows
// ---------------------------------------------------------------------------

#[derive(Default)]
struct OrderRows(Vec<Vec<String>>);

fn timestamp(t: &DateTime<Utc>) -> String {
    t.format("%Y-%m-%d %H:%M:%S").to_string()
}

impl OrderSink for OrderRows {
    fn accept(&mut self, day: NaiveDate, orders: &[Order]) -> shopgen_core::Result<()> {
        let weekday = WEEKDAY_NAMES[weekday_index(day)];
        for order in orders {
            self.0.push(vec![
                day.to_string(),
                weekday.to_string(),
                timestamp(&order.created_at),
                order
                    .completed_at
                    .as_ref()
                    .map(timestamp)
                    .unwrap_or_else(|| "-".to_string()),
                order
                    .completion_latency()
                    .map(|d| format!("{}m", d.num_minutes()))
                    .unwrap_or_else(|| "-".to_string()),
            ]);
        }
        Ok(())
    }
}
