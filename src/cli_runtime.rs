use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use vfbrowse::model::{BrowserConfig, LogicalPath};
use vfbrowse::remote::{AuthIdentity, RemoteClient, SharedCredentials};

#[derive(Args, Debug)]
pub(crate) struct GlobalArgs {
    /// JSON config file
    #[arg(long, global = true, env = "VFBROWSE_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base URL of the store's REST API
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    /// Address prefix that maps to the store root
    #[arg(long, global = true)]
    prefix: Option<String>,

    #[arg(long, global = true)]
    user: Option<String>,

    /// Bearer token for USER
    #[arg(long, global = true, env = "VFBROWSE_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Write logs here while the interactive browser runs
    #[arg(long, global = true, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

/// Config file merged with command-line overrides.
pub(crate) struct Settings {
    pub(crate) config: BrowserConfig,
    pub(crate) credentials: SharedCredentials,
    log_file: Option<PathBuf>,
}

impl Settings {
    pub(crate) fn resolve(args: &GlobalArgs) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => BrowserConfig::load(path)?,
            None => BrowserConfig::default(),
        };
        if let Some(url) = &args.url {
            config.base_url = url.clone();
        }
        if let Some(prefix) = &args.prefix {
            config.url_prefix = prefix.clone();
        }
        if let Some(user) = &args.user {
            config.user = Some(user.clone());
        }
        if let Some(token) = &args.token {
            config.token = Some(token.clone());
        }
        config.validate()?;

        let identity = match (&config.user, &config.token) {
            (Some(user), Some(token)) => Some(AuthIdentity::new(user, token)?),
            _ => None,
        };
        Ok(Self {
            config,
            credentials: SharedCredentials::new(identity),
            log_file: args.log_file.clone(),
        })
    }

    pub(crate) fn client(&self) -> Result<RemoteClient> {
        RemoteClient::new(&self.config.base_url, Arc::new(self.credentials.clone()))
    }
}

pub(crate) fn browse(settings: Settings, location: Option<String>) -> Result<()> {
    vfbrowse::logging::init_for_tui(settings.log_file.as_deref())?;
    vfbrowse::tui::run_with_options(vfbrowse::tui::TuiRunOptions {
        config: settings.config,
        location,
        credentials: settings.credentials,
    })
}

/// Accepts `./docs/a.txt`, `docs/a.txt` or `/docs/a.txt`.
pub(crate) fn parse_path(raw: &str) -> Result<LogicalPath> {
    let rooted = if raw == "." || raw.starts_with("./") {
        raw.to_string()
    } else {
        let rest = raw.trim_start_matches('/');
        if rest.is_empty() {
            ".".to_string()
        } else {
            format!("./{}", rest)
        }
    };
    LogicalPath::parse(&rooted).with_context(|| format!("invalid path {:?}", raw))
}
