use std::time::Duration;

use clap::Args;

/// One day; larger values overflow the HTTP client deadline.
pub(crate) const MAX_TIMEOUT_SECS: u64 = 86_400;

#[derive(Args, Debug, Clone)]
pub struct Config {
    /// Seconds to wait for the probe before giving up, at most one day
    #[arg(short, long, value_name = "SECONDS", default_value = "30", value_parser = clap::value_parser!(u64).range(1..=MAX_TIMEOUT_SECS))]
    pub(crate) timeout: u64,

    /// Diagnostic log filter written to stderr, e.g. debug
    #[arg(short, long, value_name = "FILTER", default_value = "warn")]
    pub(crate) log_level: String,
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

#[cfg(test)]
impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: 30,
            log_level: "warn".into(),
        }
    }
}
