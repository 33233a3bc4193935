use anyhow::{bail, Result};
use broadcast_guide::{
    config::{env_log_filter, ImportCli},
    rules::{read_rule_csv, RuleTable},
};
use clap::Parser;
use std::fs::File;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(env_log_filter())
        .init();

    let cli = ImportCli::parse();

    info!("Reading CSV from {:?}", cli.csv);
    let (rules, skipped) = read_rule_csv(File::open(&cli.csv)?);
    info!("Parsed {} rules ({} rows skipped)", rules.len(), skipped);
    if rules.is_empty() {
        bail!("no usable rules in {:?}", cli.csv);
    }

    let mut table = if cli.merge && cli.out.exists() {
        RuleTable::load_json(&cli.out)?
    } else {
        RuleTable::new()
    };

    let mut inserted = 0;
    let mut updated = 0;
    for rule in rules {
        if table.upsert_rule(rule)?.inserted {
            inserted += 1;
        } else {
            updated += 1;
        }
    }

    table.save_json(&cli.out)?;
    info!(
        "Wrote {} rules to {:?} ({} inserted, {} updated)",
        table.len(),
        cli.out,
        inserted,
        updated
    );

    Ok(())
}
