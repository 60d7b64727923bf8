// Application configuration, loaded from environment variables and CLI flags.

/// Default Discord REST API base.
pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot token used for REST calls (sending and editing messages).
    pub bot_token: Option<String>,
    /// Hex-encoded Ed25519 application public key for interaction signatures.
    pub public_key: Option<String>,
    /// Discord REST API base URL.
    pub api_base: String,
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Bearer token other bot processes present to hand over page sets.
    /// When unset, the pagination endpoint refuses every request.
    pub relay_secret: Option<String>,
}

impl Config {
    /// Load configuration from environment variables and CLI arguments.
    ///
    /// Environment variables:
    /// - `BOT_TOKEN` - Discord bot token
    /// - `DISCORD_PUBLIC_KEY` - application public key (hex)
    /// - `DISCORD_API_BASE` - REST base (default: `https://discord.com/api/v10`)
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `RELAY_SECRET` - bearer token for `POST /api/paginations`
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Self {
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |key| std::env::var(key).ok())
    }

    fn from_sources(args: &[String], env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = Self::parse_cli_value(args, "--port")
            .and_then(|v| v.parse().ok())
            .or_else(|| env("PORT").and_then(|v| v.parse().ok()))
            .unwrap_or(3000);

        let api_base = non_empty("DISCORD_API_BASE")
            .map(|v| v.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        Config {
            bot_token: non_empty("BOT_TOKEN"),
            public_key: non_empty("DISCORD_PUBLIC_KEY"),
            api_base,
            port,
            relay_secret: non_empty("RELAY_SECRET"),
        }
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}
