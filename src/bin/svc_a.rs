use anyhow::Result;
use correlation_chain::{
    app::Application,
    config::Config,
    role::Role,
    telemetry::{init_subscribers, Metrics},
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let role = Role::Worker;
    let _guard = init_subscribers(role.service_name())?;

    let configuration = Config::build()?;
    let metrics = Metrics::build()?;
    let application = Application::build(configuration, role, metrics).await?;

    application.run_until_stopped().await?;

    Ok(())
}
