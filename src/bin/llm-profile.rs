#[path = "llm-profile/app/mod.rs"]
mod app;
#[path = "llm-profile/args.rs"]
mod args;
#[path = "llm-profile/config/mod.rs"]
mod config;
#[path = "llm-profile/logging.rs"]
mod logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
