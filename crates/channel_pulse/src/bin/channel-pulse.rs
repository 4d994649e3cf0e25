use std::{path::PathBuf, time::Duration};

use channel_pulse::{
    config::{self, Config, ExtractStrategy, FetchMode},
    fetch::http::HttpFetcher,
    parser::extractor_from_config,
    tracing::init_tracing_subscriber,
    ChannelPlaylistProcessorBuilder, M3uFileStore, RunReport,
};
use channel_store::DEFAULT_EPG_URL;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "channel-pulse",
    about = "Scrape the multicast channel listing into an M3U playlist"
)]
struct Cli {
    /// Channel listing page to scrape
    #[arg(long, env = "CHANNEL_PULSE_URL", default_value = config::TARGET_URL)]
    url: String,

    /// Playlist file to (over)write
    #[arg(short, long, env = "CHANNEL_PULSE_OUTPUT", default_value = config::OUTPUT_PATH)]
    output: PathBuf,

    /// Base URL prefixed to relative logo paths
    #[arg(long, env = "CHANNEL_PULSE_LOGO_BASE", default_value = config::LOGO_BASE_URL)]
    logo_base: String,

    /// EPG feed advertised in the playlist header
    #[arg(long, env = "CHANNEL_PULSE_EPG_URL", default_value = DEFAULT_EPG_URL)]
    epg_url: String,

    /// How the page is fetched
    #[arg(long, value_enum, env = "CHANNEL_PULSE_FETCH", default_value_t = FetchMode::default())]
    fetch: FetchMode,

    /// Which page layout heuristic to apply
    #[arg(long, value_enum, env = "CHANNEL_PULSE_STRATEGY", default_value_t = ExtractStrategy::Anchor)]
    strategy: ExtractStrategy,

    /// Save the fetched html here for inspection
    #[arg(long, env = "CHANNEL_PULSE_DEBUG_HTML", default_value = config::DEBUG_HTML_PATH)]
    debug_html: PathBuf,

    /// Skip saving the fetched html
    #[arg(long)]
    no_debug_html: bool,

    /// Request / navigation timeout in seconds
    #[arg(long, default_value = "60")]
    timeout: u64,

    /// Seconds to let client-side rendering settle in browser mode
    #[arg(long, default_value = "3")]
    settle: u64,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Config {
            target_url: cli.url,
            logo_base_url: cli.logo_base,
            epg_url: cli.epg_url,
            output_path: cli.output,
            request_timeout: Duration::from_secs(cli.timeout),
            settle_delay: Duration::from_secs(cli.settle),
            debug_html_path: (!cli.no_debug_html).then_some(cli.debug_html),
            fetch_mode: cli.fetch,
            strategy: cli.strategy,
            ..Default::default()
        }
    }
}

async fn run_pipeline(config: &Config) -> anyhow::Result<RunReport> {
    let store = M3uFileStore::new(&config.output_path).with_epg_url(&config.epg_url);
    let extractor = extractor_from_config(config);

    let builder = ChannelPlaylistProcessorBuilder::new()
        .target_url(&config.target_url)
        .debug_html(config.debug_html_path.clone())
        .extractor(extractor)
        .store(store);

    let report = match config.fetch_mode {
        FetchMode::Http => {
            let fetcher = HttpFetcher::from_config(config)?;
            builder.fetcher(fetcher).build().run().await?
        }
        #[cfg(feature = "browser")]
        FetchMode::Browser => {
            let fetcher = channel_pulse::fetch::browser::BrowserFetcher::from_config(config);
            builder.fetcher(fetcher).build().run().await?
        }
        #[cfg(not(feature = "browser"))]
        FetchMode::Browser => {
            anyhow::bail!("browser fetching requires building with `--features browser`")
        }
    };

    Ok(report)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = Config::from(cli);
    tracing::info!(
        url = %config.target_url,
        fetch = ?config.fetch_mode,
        strategy = ?config.strategy,
        "Running channel scrape..."
    );

    let report = run_pipeline(&config).await.inspect_err(|e| {
        let kind = e
            .downcast_ref::<channel_pulse::Error>()
            .map(|e| e.kind().to_string())
            .unwrap_or_else(|| "setup".to_string());
        tracing::error!(error = %e, %kind, "Run failed");
    })?;

    tracing::info!(
        count = report.channels.len(),
        path = %config.output_path.display(),
        "Done"
    );

    Ok(())
}
