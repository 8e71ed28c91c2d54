//! CLI domain: parse, route, output, and presentation only.
//! No title logic here; the route table dispatches to the engine and bulk action.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{
    format_bulk_report_text, format_preview_text, format_status_text, PreviewRow, StatusRow,
};
pub use route::RunContext;
