//! REST API server for the broadcast guide
//!
//! Usage:
//!   ./target/release/api_server [--host HOST] [--port PORT] [--rules FILE]
//!
//! REST endpoints:
//!   GET    /api/health                         - Health check
//!   GET    /api/stats                          - Game and rule counts
//!   GET    /api/schedule?zip=Z                 - Resolved schedule for a ZIP
//!   GET    /api/games?zip=Z                    - Games with overrides for a ZIP
//!   GET    /api/admin/unvalidated              - Review queue
//!   POST   /api/admin/unvalidated/:id/approve  - Approve/map a game
//!   GET    /api/admin/dma-map                  - DMA rules
//!   POST   /api/admin/dma-map                  - Create a rule
//!   POST   /api/admin/map                      - Upsert a rule by DMA/team/sport
//!   GET    /api/admin/dma-map/:id              - One rule
//!   PUT    /api/admin/dma-map/:id              - Patch a rule
//!   DELETE /api/admin/dma-map/:id              - Delete a rule

use anyhow::Result;
use broadcast_guide::{
    api::{router, GuideService},
    config::{env_log_filter, ServerCli},
    rules::RuleTable,
};
use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_banner(addr: &SocketAddr, rules: usize) {
    println!("============================================================");
    println!("             BROADCAST GUIDE API SERVER");
    println!("============================================================");
    println!();
    println!("  Listening: http://{}/api/", addr);
    println!("  Rules:     {}", rules);
    println!();
    println!("Endpoints:");
    println!("  GET    /api/schedule?zip=Z            Viewer schedule");
    println!("  GET    /api/games?zip=Z               Raw games");
    println!("  GET    /api/admin/unvalidated         Review queue");
    println!("  POST   /api/admin/unvalidated/:id/approve");
    println!("  GET    /api/admin/dma-map             DMA rules");
    println!("  POST   /api/admin/map                 Save rule");
    println!("  PUT    /api/admin/dma-map/:id         Edit rule");
    println!("  DELETE /api/admin/dma-map/:id         Delete rule");
    println!();
    println!("============================================================");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(env_log_filter())
        .init();

    let cli = ServerCli::parse();

    let service = match &cli.rules {
        Some(path) => {
            let rules = RuleTable::load_json(path)?;
            tracing::info!("Loaded {} rules from {:?}", rules.len(), path);
            GuideService::with_rules(rules)
        }
        None => {
            tracing::info!("No rule file given, using sample rules");
            GuideService::with_sample_data()
        }
    };
    let service = Arc::new(service);

    let addr: SocketAddr = format!("{}:{}", cli.host, cli.port).parse()?;
    print_banner(&addr, service.stats().await.rules);

    let app = router(service);
    tracing::info!("Starting REST server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
