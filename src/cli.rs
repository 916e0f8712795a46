use clap::Parser;
use std::path::PathBuf;

const ABOUT: &str = "Run a command and report its failure to Sentry";
const LONG_ABOUT: &str = concat!(
    "raven-sh v",
    env!("CARGO_PKG_VERSION"),
    "\n\n",
    "Executes a command, captures its stdout/stderr and, if it exits with a\n",
    "non-zero code, sends a message to Sentry. Quiet unless misconfigured,\n",
    "which makes it a good fit for cron jobs:\n",
    "\n",
    "    SENTRY_DSN='https://key@sentry.example.com/1'\n",
    "    */30 * * * *  raven-sh -- bash -c 'echo hello world; exit 1'\n",
    "\n",
    "Everything the command prints is kept in memory. Do not wrap commands\n",
    "producing a lot of output.",
);

#[derive(Debug, Parser)]
#[command(name = "raven-sh", version, about = ABOUT, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Sentry DSN. Alternatively setup SENTRY_DSN environment variable
    #[arg(long)]
    pub dsn: Option<String>,

    /// Extra data to save (as JSON object)
    #[arg(long, value_name = "JSON")]
    pub extra: Option<String>,

    /// Tags to save with message (as JSON object)
    #[arg(long, value_name = "JSON")]
    pub tags: Option<String>,

    /// Don't send anything to remote server. Just print the payload
    #[arg(long)]
    pub debug: bool,

    /// Message string to send to Sentry
    #[arg(long)]
    pub message: Option<String>,

    /// Settings file (defaults to <config dir>/raven-sh/config.*)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log wrapper internals to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute, with its arguments
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}
