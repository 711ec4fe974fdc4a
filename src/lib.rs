pub mod browser;
pub mod dispatch;
pub mod fmt;
pub mod logging;
pub mod model;
pub mod remote;
pub mod tui;

mod tui_shell;
