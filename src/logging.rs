use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

pub const DEFAULT_FILTER: &str = "holdem_rs=info";

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `filter`, which wins over [`DEFAULT_FILTER`]. Returns
/// `false` if a subscriber was already installed; the existing one is kept.
pub fn init_logging<W>(filter: Option<&str>, writer: W) -> bool
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter.unwrap_or(DEFAULT_FILTER)))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_tolerated() {
        let _ = init_logging(Some("holdem_rs=debug"), std::io::sink);
        assert!(!init_logging(None, std::io::sink));
    }
}
