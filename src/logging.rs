// ABOUTME: tracing subscriber setup for the CLI
// ABOUTME: Plain-text logs to stderr; RUST_LOG overrides the default filter

use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn default_filter(debug: bool) -> &'static str {
    if debug {
        "info,qiita_export=debug"
    } else {
        "info"
    }
}

fn subscriber<W>(debug: bool, writer: W) -> impl Subscriber + Send + Sync + 'static
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .finish()
}

pub fn init_logging(debug: bool) {
    subscriber(debug, std::io::stderr).init();
}
