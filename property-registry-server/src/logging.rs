use tracing_subscriber::EnvFilter;

use crate::config::Environment;

/// Installs the global tracing subscriber: pretty output locally, flattened JSON elsewhere
pub fn init(environment: Environment) -> anyhow::Result<()> {
    let result = match environment {
        Environment::Local => tracing_subscriber::fmt()
            .with_ansi(true)
            .with_env_filter(EnvFilter::from_default_env())
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init(),
        Environment::Production | Environment::Develop => tracing_subscriber::fmt()
            .with_ansi(false)
            .with_env_filter(EnvFilter::from_default_env())
            .with_file(true)
            .with_line_number(true)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .flatten_event(true)
            .try_init(),
    };

    result.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
