use anyhow::Result;

use crate::model::BrowserConfig;
use crate::remote::SharedCredentials;

#[derive(Clone, Debug, Default)]
pub struct TuiRunOptions {
    pub config: BrowserConfig,
    /// Address-bar location to start at; defaults to the configured prefix.
    pub location: Option<String>,
    pub credentials: SharedCredentials,
}

pub fn run_with_options(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run(opts)
}
