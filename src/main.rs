use std::ffi::OsString;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::debug;

use crate::config::Config;
use crate::error::{CheckError, CheckResult};
use crate::probe::check_target;
use crate::target::Target;

mod config;
#[macro_use]
mod error;
mod probe;
mod target;
mod telemetry;

/// Set `CHECK_VERSION` when building to stamp a release version into the binary.
const VERSION: &str = match option_env!("CHECK_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

const EXAMPLES: &str = "\
Examples:
  check tcp://example.com:2222
  check udp://example.com:53
  check http://example.com:8080/health
  check https://example.com:8443

HTTPS certificates are NOT verified: check tests reachability, not trust.
Exits with 0 when the target is reachable, 1 otherwise.";

#[derive(Parser, Debug)]
#[command(
    name = "check",
    version = VERSION,
    about = "Check that a single HTTP, HTTPS, TCP or UDP target is reachable",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true,
    after_help = EXAMPLES
)]
struct Args {
    /// Show this help
    #[arg(short, long)]
    help: bool,

    /// Print the version
    #[arg(short = 'v', long)]
    version: bool,

    #[command(flatten)]
    config: Config,

    /// Target URL, scheme is one of http, https, tcp or udp
    #[arg(value_name = "URL")]
    targets: Vec<String>,
}

#[derive(Debug)]
enum Invocation {
    Help,
    Version,
    Check { target: String, config: Config },
}

fn main() -> Result<()> {
    let args: Vec<OsString> = std::env::args_os().collect();

    match run(args) {
        Ok(()) => Ok(()),
        Err(err) => {
            if err.is_usage() {
                eprintln!("{}", help_text());
            }
            Err(err.into())
        }
    }
}

fn run(args: Vec<OsString>) -> CheckResult {
    let (target, config) = match parse_args(args)? {
        Invocation::Help => {
            println!("{}", help_text());
            return Ok(());
        }
        Invocation::Version => {
            print!("{}", Args::command().render_version());
            return Ok(());
        }
        Invocation::Check { target, config } => (target, config),
    };

    telemetry::init_telemetry(&config.log_level);

    let target = Target::parse(&target)?;
    debug!(%target, timeout = ?config.timeout(), "checking target");
    check_target(&target, &config)
}

/// Help and version flags win over everything else on the command line.
fn parse_args<I, T>(raw: I) -> CheckResult<Invocation>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let raw: Vec<OsString> = raw.into_iter().map(Into::into).collect();

    let flags: Vec<&str> = raw
        .iter()
        .skip(1)
        .take_while(|arg| *arg != "--")
        .filter_map(|arg| arg.to_str())
        .collect();
    if flags.iter().any(|arg| matches!(*arg, "-h" | "--help")) {
        return Ok(Invocation::Help);
    }
    if flags.iter().any(|arg| matches!(*arg, "-v" | "--version")) {
        return Ok(Invocation::Version);
    }

    let args = Args::try_parse_from(&raw).map_err(|err| {
        let rendered = err.to_string();
        let first_line = rendered.lines().next().unwrap_or_default();
        CheckError::Usage(first_line.trim_start_matches("error: ").to_string())
    })?;

    // Bundled short flags such as `-hv` only show up once clap has split them
    if args.help {
        return Ok(Invocation::Help);
    }
    if args.version {
        return Ok(Invocation::Version);
    }

    let mut targets = args.targets.into_iter();
    match (targets.next(), targets.next()) {
        (None, _) => bail_usage!("no target specified"),
        (Some(target), None) => Ok(Invocation::Check {
            target,
            config: args.config,
        }),
        (Some(first), Some(second)) => {
            let all: Vec<String> = [first, second].into_iter().chain(targets).collect();
            bail_usage!("multiple targets specified: {}", all.join(", "))
        }
    }
}

fn help_text() -> String {
    Args::command().render_long_help().to_string()
}
