//! Common logging initializer
//!
//! Output is the compact format on stderr, `time LEVEL target: message`, with an optional
//! hierarchical view of the spans and an optional rolling log file.
//!

use eyre::Result;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use tracing_tree::HierarchicalLayer;

/// Default filter when `RUST_LOG` is not set
const DEF_FILTER: &str = "info";

#[tracing::instrument]
pub fn init_logging(name: &'static str, use_tree: bool, use_file: Option<String>) -> Result<()> {
    // Load filters from environment
    //
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEF_FILTER));

    // Do we want hierarchical output?
    //
    let (tree, plain) = if use_tree {
        (
            Some(
                HierarchicalLayer::new(2)
                    .with_ansi(true)
                    .with_span_retrace(true)
                    .with_span_modes(true)
                    .with_targets(true)
                    .with_verbose_entry(true)
                    .with_verbose_exit(true)
                    .with_bracketed_fields(true),
            ),
            None,
        )
    } else {
        (
            None,
            Some(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .compact(),
            ),
        )
    };

    // Log to file?
    //
    let file = use_file.map(|dir| {
        // Basic append-only rolling file for all traces.
        //
        let file_appender = tracing_appender::rolling::daily(dir, name);
        fmt::layer().with_ansi(false).with_writer(file_appender)
    });

    // Combine filters & exporters
    //
    tracing_subscriber::registry()
        .with(filter)
        .with(tree)
        .with(plain)
        .with(file)
        .try_init()?;

    Ok(())
}
