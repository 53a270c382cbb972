use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    /// Bad flags, missing or surplus targets
    #[error("{0}")]
    Usage(String),

    #[error("invalid check type \"{0}\", expected one of http, https, tcp, udp")]
    InvalidCheckType(String),

    #[error("invalid target \"{target}\": {reason}")]
    Parse { target: String, reason: String },

    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not connect to {address}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not resolve {address}")]
    Resolve { address: String },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },
}

impl CheckError {
    /// Errors the user can fix by changing the invocation; these are reported with the help text.
    pub fn is_usage(&self) -> bool {
        matches!(self, CheckError::Usage(_) | CheckError::InvalidCheckType(_))
    }
}

pub type CheckResult<T = (), E = CheckError> = Result<T, E>;

macro_rules! bail_usage {
    ($message:expr) => {
        return Err($crate::error::CheckError::Usage(String::from($message)))
    };
    ($fmt:expr $(, $arg:expr)*) => {
        return Err($crate::error::CheckError::Usage(format!($fmt $(, $arg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usage_errors_are_classified() {
        assert!(CheckError::Usage("no target specified".into()).is_usage());
        assert!(CheckError::InvalidCheckType("ftp".into()).is_usage());
        assert!(!CheckError::Resolve {
            address: "nowhere:1".into()
        }
        .is_usage());
    }

    #[test]
    fn status_error_names_the_code() {
        let err = CheckError::Status {
            url: "http://localhost/".into(),
            status: StatusCode::NOT_FOUND,
        };
        assert_eq!(
            err.to_string(),
            "http://localhost/ answered with status 404 Not Found"
        );
    }

    #[test]
    fn connect_error_keeps_its_cause() {
        let err = CheckError::Connect {
            address: "127.0.0.1:1".into(),
            source: std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
        };
        let report = format!("{:#}", anyhow::Error::from(err));
        assert!(report.starts_with("could not connect to 127.0.0.1:1: "));
    }
}
