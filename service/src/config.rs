use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use std::path::PathBuf;

/// Redirect URI used when none is configured.
pub const DEFAULT_REDIRECT_URI: &str = "https://localhost:4000/oauth2";

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 4000)]
    pub port: u16,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Public URL providers redirect back to after consent. Every `PROVIDER` in it is
    /// replaced by the provider id.
    #[arg(short, long, env, default_value = DEFAULT_REDIRECT_URI)]
    redirect_uri: String,

    /// Provider ids that are never offered to users.
    #[arg(long, env, value_delimiter = ',', use_value_delimiter = true)]
    disabled_providers: Vec<String>,

    /// JSON file holding the consumer credentials of each provider.
    #[arg(short, long, env)]
    consumers_file: Option<PathBuf>,

    /// Keep providers enabled even when the redirect URI is not served over https.
    #[arg(long, env, default_value_t = false)]
    pub allow_insecure_redirect_uri: bool,

    /// Inactivity expiry of the flow session cookie, in seconds
    #[arg(long, env, default_value_t = 3600)]
    pub session_expiry_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    /// Disabled provider ids, blanks removed.
    pub fn disabled_providers(&self) -> Vec<String> {
        self.disabled_providers
            .iter()
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .collect()
    }

    pub fn consumers_file(&self) -> Option<&PathBuf> {
        self.consumers_file.as_ref()
    }
}
