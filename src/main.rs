//! Clock Widget - headless demo
//!
//! Mounts the widget on an in-memory render tree and logs the hand
//! angles for a bounded number of ticks. This is a development harness;
//! the widget itself is embedded through the library API.

use std::sync::{Arc, Mutex};

use chrono::NaiveDateTime;
use clap::Parser;
use tracing::info;

use clock_widget::{geometry, ClockOptions, ClockWidget, MemoryTree, SizeSpec};

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "clock-widget")]
#[command(about = "Headless demo of the embeddable analog clock widget")]
#[command(version = "0.1.0")]
struct DemoArgs {
    /// Ticks per second multiplier
    #[arg(short, long, default_value = "1.0")]
    speed: f64,

    /// Face size: small, medium, large, or a pixel number
    #[arg(long, default_value = "medium")]
    size: String,

    /// Run the simulated time backwards
    #[arg(long)]
    countdown: bool,

    /// Oscillate the simulated time forward and back each tick
    #[arg(long)]
    low_battery: bool,

    /// Start date-time, e.g. 2000-01-01T03:24:00
    #[arg(long)]
    date: Option<NaiveDateTime>,

    /// Number of ticks to run before exiting
    #[arg(short, long, default_value = "10")]
    ticks: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl DemoArgs {
    fn size_spec(&self) -> SizeSpec {
        match self.size.as_str() {
            "small" => SizeSpec::Small,
            "medium" => SizeSpec::Medium,
            "large" => SizeSpec::Large,
            other => other.parse().map(SizeSpec::Pixels).unwrap_or(SizeSpec::Medium),
        }
    }

    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = DemoArgs::parse();

    tracing_subscriber::fmt()
        .with_env_filter(format!("clock_widget={}", args.log_level()))
        .init();

    info!("Starting clock-widget demo");

    let options = ClockOptions {
        countdown: args.countdown,
        low_battery: args.low_battery,
        size: args.size_spec(),
        speed: args.speed,
        date: args.date,
        ..Default::default()
    };

    let tree = Arc::new(Mutex::new(MemoryTree::new()));
    let widget = ClockWidget::mount(Arc::clone(&tree), options);
    let period = widget.options().tick_period();

    for _ in 0..args.ticks {
        tokio::time::sleep(period).await;
        let time = widget.simulated_time();
        let angles = geometry::hand_angles(&time);
        info!(
            "{} -> hour {:.1} deg, minute {:.1} deg, second {:.1} deg",
            time, angles.hour, angles.minute, angles.second
        );
    }

    info!("Demo complete");
    Ok(())
}
