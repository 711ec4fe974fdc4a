use anyhow::Result;

mod app;
mod commands;
mod input;
mod view;

use commands::CommandDef;
use view::render_view_chrome;

pub(crate) fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
