use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the log subscriber.
///
/// Does nothing unless `BYTELANG_LOG` or `RUST_LOG` is set, for example
/// `BYTELANG_LOG=bytelang_sema=debug`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = if let Ok(filter) = EnvFilter::try_from_env("BYTELANG_LOG") {
            filter
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .with(filter)
            .init();
    });
}
