use std::fmt::Display;
use std::str::FromStr;

use url::Url;

use crate::error::{CheckError, CheckResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
    Tcp,
    Udp,
}

impl FromStr for Scheme {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Scheme::Http),
            "https" => Ok(Scheme::Https),
            "tcp" => Ok(Scheme::Tcp),
            "udp" => Ok(Scheme::Udp),
            _ => Err(CheckError::InvalidCheckType(s.to_string())),
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
            Scheme::Tcp => "tcp",
            Scheme::Udp => "udp",
        };
        write!(f, "{}", name)
    }
}

/// What a single invocation probes.
///
/// For HTTP and HTTPS the address is the whole URL, for TCP and UDP it is `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: Scheme,
    pub address: String,
}

impl Target {
    pub fn parse(raw: &str) -> CheckResult<Target> {
        let url = Url::parse(raw).map_err(|err| parse_error(raw, err.to_string()))?;
        let scheme: Scheme = url.scheme().parse()?;

        let address = match scheme {
            Scheme::Http | Scheme::Https => String::from(url),
            Scheme::Tcp | Scheme::Udp => socket_address(raw, &url)?,
        };
        Ok(Target { scheme, address })
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.scheme {
            Scheme::Http | Scheme::Https => write!(f, "{}", self.address),
            Scheme::Tcp | Scheme::Udp => write!(f, "{}://{}", self.scheme, self.address),
        }
    }
}

fn socket_address(raw: &str, url: &Url) -> CheckResult<String> {
    let host = url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(|| parse_error(raw, "missing host"))?;
    let port = url.port().ok_or_else(|| parse_error(raw, "missing port"))?;
    Ok(format!("{}:{}", host, port))
}

fn parse_error(raw: &str, reason: impl Into<String>) -> CheckError {
    CheckError::Parse {
        target: raw.to_string(),
        reason: reason.into(),
    }
}
