use anyhow::Result;
use planner_core::PlannerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = PlannerConfig::from_env().snapshot();
    let app = planner_server::build(&config)?;

    let addr = app.settings.addr();
    tracing::info!("soccer session planner api on http://{addr}");

    app.listen(addr).await?;

    Ok(())
}
