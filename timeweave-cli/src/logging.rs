use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LOG_DIRECTIVES: &str = "warn,timeweave_core=info,timeweave_cli=info";
const DEBUG_LOG_DIRECTIVES: &str = "info,timeweave_core=debug,timeweave_cli=debug";

/// Log to stderr so stdout carries only JSON results.
///
/// `TIMEWEAVE_LOG` takes `EnvFilter` directives and wins over `--debug`.
pub fn init_logging(debug: bool) -> Result<()> {
    let fallback = if debug {
        DEBUG_LOG_DIRECTIVES
    } else {
        DEFAULT_LOG_DIRECTIVES
    };
    let env_filter = EnvFilter::try_from_env("TIMEWEAVE_LOG")
        .or_else(|_| EnvFilter::try_new(fallback))
        .map_err(|err| anyhow::anyhow!("parse log directives: {err}"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .map_err(|err| anyhow::anyhow!("logging already initialised: {err}"))?;
    Ok(())
}
