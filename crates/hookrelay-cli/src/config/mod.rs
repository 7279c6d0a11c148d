//! Command-line configuration.

mod middleware;
mod server;
mod service;

use clap::Parser;

pub use middleware::MiddlewareConfig;
pub use server::ServerConfig;
pub use service::ServiceArgs;

/// The hookrelay webhook delivery service.
#[derive(Debug, Parser)]
#[command(name = "hookrelay", version, about)]
pub struct Cli {
    /// HTTP server options.
    #[command(flatten)]
    pub server: ServerConfig,

    /// Service and pipeline options.
    #[command(flatten)]
    pub service: ServiceArgs,

    /// Middleware options.
    #[command(flatten)]
    pub middleware: MiddlewareConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_with_defaults() {
        let cli = Cli::try_parse_from(["hookrelay"]).unwrap();
        assert_eq!(cli.server.port, 8080);
        assert_eq!(cli.service.delivery_workers, 4);
    }

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "hookrelay",
            "--port",
            "9000",
            "--delivery-workers",
            "8",
            "--retry-max-attempts",
            "3",
        ])
        .unwrap();

        assert_eq!(cli.server.port, 9000);
        assert_eq!(cli.service.delivery_workers, 8);
        assert_eq!(cli.service.retry_max_attempts, 3);
    }
}
