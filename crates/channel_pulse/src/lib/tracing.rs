use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Installs the global subscriber.
///
/// Filtering follows `RUST_LOG` (default `info`). `LOG_FORMAT=json` switches
/// the human readable output to bunyan JSON on stdout. Events are also
/// forwarded to sentry, which is a no-op unless a DSN was configured.
pub fn init_tracing_subscriber() -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let json_output = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let (bunyan_layer, fmt_layer) = if json_output {
        let bunyan = JsonStorageLayer.and_then(BunyanFormattingLayer::new(
            env!("CARGO_PKG_NAME").into(),
            std::io::stdout,
        ));
        (Some(bunyan), None)
    } else {
        let fmt = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr);
        (None, Some(fmt))
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(sentry_tracing::layer())
        .with(bunyan_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
