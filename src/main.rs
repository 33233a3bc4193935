use std::sync::Arc;

use anyhow::Result;
use broadcast_guide::{
    api::GuideService,
    client::{HttpGuideClient, LocalGuideClient, ScheduleClient},
    config::{env_log_filter, ViewerCli},
    resolver::{location_label, resolve_schedule, ResolvedGame},
    session::{FileLocationStore, LocationSession},
};
use clap::Parser;
use tracing::info;

fn print_schedule(label: &str, rows: &[ResolvedGame]) {
    println!("============================================================");
    println!("  WHERE TO WATCH    {}", label);
    println!("============================================================");
    println!(
        "{:<14} {:<30} {:<22} {}",
        "TIME", "MATCHUP", "NATIONAL", "LOCAL"
    );
    println!("{}", "-".repeat(92));
    for row in rows {
        let marker = if row.is_regional { "*" } else { "" };
        println!(
            "{:<14} {:<30} {:<22} {}{}",
            row.scheduled_time, row.matchup, row.national_channels, row.local_channel, marker
        );
    }
    println!();
    println!("* regional feed for your ZIP");
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ViewerCli::parse();
    // stdout carries the schedule table
    tracing_subscriber::fmt()
        .with_env_filter(env_log_filter())
        .with_writer(std::io::stderr)
        .init();

    let mut session = LocationSession::load(FileLocationStore::new(&cli.state_file));
    if let Some(zip) = cli.zip.as_deref() {
        match session.update(zip) {
            Ok(key) => info!("location set to {}", key),
            Err(e) => eprintln!("{}", e),
        }
    }
    let location = session.current().cloned();

    let client: Box<dyn ScheduleClient> = match cli.server.as_deref() {
        Some(url) => Box::new(HttpGuideClient::new(url)?),
        None => Box::new(LocalGuideClient::new(Arc::new(GuideService::with_sample_data()))),
    };

    let games = client.fetch_schedule(location.as_ref()).await?;
    let rows = resolve_schedule(&games, location.as_ref())?;
    print_schedule(&location_label(location.as_ref()), &rows);

    Ok(())
}
