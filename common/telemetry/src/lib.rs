use tracing::{subscriber::set_global_default, Subscriber};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{
    filter,
    fmt::MakeWriter,
    layer::{Layer, SubscriberExt},
    EnvFilter, Registry,
};

static PORTAL_CRATE_NAME: &str = "portal";

pub struct TracingSubscriber {
    name: String,
    env_filter: String,
    pretty: bool,
}

impl TracingSubscriber {
    pub fn new<T>(name: T) -> Self
    where
        T: AsRef<str>,
    {
        Self {
            name: name.as_ref().to_string(),
            env_filter: "info".into(),
            pretty: false,
        }
    }

    /// Fallback filter used when `RUST_LOG` is unset.
    pub fn env_filter(mut self, value: impl AsRef<str>) -> Self {
        self.env_filter = value.as_ref().into();
        self
    }

    pub fn pretty(mut self, value: bool) -> Self {
        self.pretty = value;
        self
    }

    /// Creates a [`tracing::Subscriber`] formatting logs with [`Bunyan`],
    /// or with the human readable `fmt` layer when `pretty` is set.
    ///
    /// [`Bunyan`]: https://docs.rs/tracing-bunyan-formatter/latest/tracing_bunyan_formatter/
    pub fn build<Sink>(self, sink: Sink) -> Box<dyn Subscriber + Sync + Send>
    where
        Sink: for<'a> MakeWriter<'a> + Sync + Send + 'static,
    {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.env_filter));

        let target_filter = filter::Targets::new()
            .with_default(tracing::Level::INFO)
            .with_target(PORTAL_CRATE_NAME, tracing::Level::DEBUG)
            .with_target("hyper", tracing::Level::INFO)
            .with_target("reqwest", tracing::Level::INFO)
            .with_target("mio::poll", filter::LevelFilter::OFF);

        if self.pretty {
            Box::new(
                Registry::default().with(
                    tracing_subscriber::fmt::layer()
                        .pretty()
                        .with_writer(sink)
                        .with_filter(target_filter)
                        .with_filter(env_filter),
                ),
            )
        } else {
            let skip_fields = ["file", "line"];

            let formatting_layer = BunyanFormattingLayer::new(self.name.clone(), sink)
                .skip_fields(skip_fields.into_iter().map(|s| s.to_owned()))
                .expect("unable to build the bunyan formatting layer");

            Box::new(
                Registry::default().with(JsonStorageLayer).with(
                    formatting_layer
                        .with_filter(target_filter)
                        .with_filter(env_filter),
                ),
            )
        }
    }
}

/// Sets `subscriber` as the global default [`tracing::Subscriber`].
///
/// Fails if a global subscriber or logger is already installed.
pub fn init_global_default(
    subscriber: impl Subscriber + Sync + Send + 'static,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    LogTracer::init()?;
    set_global_default(subscriber)?;
    Ok(())
}
