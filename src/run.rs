mod cli;
mod tui;

pub(crate) use cli::{as_cli, as_config, Cli, Commands};
pub(crate) use tui::as_tui;
