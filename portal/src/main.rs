use clap::Parser;
use portal::cli::{self, Cli};
use portal::conf::Conf;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let conf = Conf::derive()?;

    let subscriber = telemetry::TracingSubscriber::new("portal")
        .env_filter("warn")
        .pretty(conf.log.pretty)
        .build(std::io::stderr);
    telemetry::init_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to install the tracing subscriber: {}", e))?;

    tracing::debug!("PORTAL_ENV={}", conf.env);

    cli::run(cli, conf).await
}
