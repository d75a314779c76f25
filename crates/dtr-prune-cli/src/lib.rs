pub mod cli;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, render_report};
