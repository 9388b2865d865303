//! Line-oriented shell over the app context: interactive with rustyline, or
//! fed from stdin when `CARTERA_CLI_SCRIPT` is set.

mod args;
mod commands;
pub mod context;
pub mod errors;
mod help;
mod io;
pub mod output;
pub mod registry;
mod shell;

pub use context::{CliMode, ShellContext};
pub use errors::{CliError, CommandError, CommandResult};
pub use shell::{run_cli, SCRIPT_ENV};
