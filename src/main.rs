// Entrypoint for the CLI application.
// - Keeps `main` small: load config, log in, then hand the client to the
//   menu loop.
// - Returns `anyhow::Result` so the fatal cases (missing credentials,
//   failed login, broken terminal) exit non-zero.

use anyhow::{bail, Context};
use desk_cli::{flow, ApiClient, Config, ConsoleTerminal, Desk, HttpTransport};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is the operator's screen.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("desk_cli=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut term = ConsoleTerminal::new();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            flow::report_config_error(&mut term, &e)?;
            return Err(e.into());
        }
    };

    let transport = HttpTransport::new(&config.base_url).context("Failed to build HTTP client")?;
    let mut api = ApiClient::new(transport);

    if !flow::login(&mut api, &config, &mut term)? {
        bail!("authentication failed");
    }

    // Blocks until the operator exits.
    Desk::new(&api, &mut term).run()?;
    Ok(())
}
