use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use dashboard::{
    CountdownDriver, LoadingDriver, MergeMode, aggregate, fetch_rows, parse_rows,
    render::{BAR_WIDTH, render_chart, render_summary, render_table},
};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::signal::ctrl_c;

const DEFAULT_URL: &str = "http://127.0.0.1:4000/api/sweepstakes";
const DEFAULT_END: &str = "2025-07-17T22:00:00-07:00";

#[derive(Parser, Debug)]
#[command(author, version, about = "Live terminal view of sweepstakes entries")]
struct Args {
    /// Backend endpoint returning the entry rows
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// When the sweepstakes closes (RFC 3339)
    #[arg(long, default_value = DEFAULT_END)]
    ends_at: DateTime<FixedOffset>,

    #[arg(long, default_value = "Flow Rewards Sweepstakes")]
    title: String,

    /// Sum tickets per wallet instead of listing every row
    #[arg(long)]
    merge_wallets: bool,

    /// Print once and exit instead of keeping the countdown running
    #[arg(long)]
    once: bool,
}

fn spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(120));

    spinner
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let target = args.ends_at.with_timezone(&Utc);
    let countdown = CountdownDriver::start(target);

    println!("{}\n", args.title);

    let loading = spinner();
    let phrases = loading.clone();
    let fetched = LoadingDriver::default()
        .run(fetch_rows(&args.url), move |phrase| phrases.set_message(phrase))
        .await;
    loading.finish_and_clear();

    let rows = match fetched {
        Ok(rows) => rows,
        Err(e) => {
            eprintln!("{e}");
            return Err(e.into());
        }
    };

    let parsed = parse_rows(&rows);
    let mode = if args.merge_wallets {
        MergeMode::PerWallet
    } else {
        MergeMode::PerRow
    };
    let dashboard = aggregate(&parsed.rows, mode);

    println!("{}\n", render_summary(&dashboard, &countdown.current()));
    println!("{}", render_chart(&dashboard, BAR_WIDTH));
    println!("All Entries\n{}", render_table(&dashboard));

    for rejected in &parsed.rejected {
        eprintln!("Skipped row {}: {}", rejected.index + 1, rejected.reason);
    }

    if args.once {
        return Ok(());
    }

    let ticker = ProgressBar::new_spinner();
    ticker.set_style(
        ProgressStyle::with_template("Time Left: {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    ticker.set_message(countdown.current().to_string());

    let mut updates = countdown.subscribe();
    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let remaining = *updates.borrow_and_update();
                ticker.set_message(remaining.to_string());
            }
            _ = ctrl_c() => break,
        }
    }

    countdown.stop();
    ticker.finish();

    Ok(())
}
