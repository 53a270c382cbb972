use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use tracing::{debug, info_span};

use crate::config::Config;
use crate::error::{CheckError, CheckResult};
use crate::target::{Scheme, Target};

/// Runs exactly one probe against the target. Nothing is retried.
pub fn check_target(target: &Target, config: &Config) -> CheckResult {
    let _span = info_span!("probe", scheme = %target.scheme, address = %target.address).entered();

    match target.scheme {
        Scheme::Http => http_probe(&target.address, config.timeout(), false),
        // Reachability only, the certificate chain is never verified
        Scheme::Https => http_probe(&target.address, config.timeout(), true),
        Scheme::Tcp => tcp_probe(&target.address, config.timeout()),
        Scheme::Udp => udp_probe(&target.address),
    }
}

pub fn http_probe(url: &str, timeout: Duration, accept_invalid_certs: bool) -> CheckResult {
    let http_error = |source| CheckError::Http {
        url: url.to_string(),
        source,
    };

    let client = Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(http_error)?;

    let response = client.get(url).send().map_err(http_error)?;
    let status = response.status();
    debug!(%status, "received response");

    if status != StatusCode::OK {
        return Err(CheckError::Status {
            url: url.to_string(),
            status,
        });
    }
    Ok(())
}

/// Connects to every resolved address in turn until one accepts.
pub fn tcp_probe(address: &str, timeout: Duration) -> CheckResult {
    let mut last_error = None;

    for addr in resolve(address)? {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_stream) => {
                debug!(%addr, "tcp connect OK");
                return Ok(());
            }
            Err(err) => {
                debug!(%addr, error = %err, "tcp connect failed");
                last_error = Some(err);
            }
        }
    }

    Err(match last_error {
        Some(source) => CheckError::Connect {
            address: address.to_string(),
            source,
        },
        None => CheckError::Resolve {
            address: address.to_string(),
        },
    })
}

/// UDP has no handshake, so a connected socket is all that can be checked.
pub fn udp_probe(address: &str) -> CheckResult {
    let addr = resolve(address)?
        .into_iter()
        .next()
        .ok_or_else(|| CheckError::Resolve {
            address: address.to_string(),
        })?;

    let unspecified = match addr {
        SocketAddr::V4(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        SocketAddr::V6(_) => IpAddr::V6(Ipv6Addr::UNSPECIFIED),
    };
    let local = SocketAddr::new(unspecified, 0);

    let connect = || -> io::Result<()> {
        let socket = UdpSocket::bind(local)?;
        socket.connect(addr)?;
        debug!(%addr, local = ?socket.local_addr().ok(), "udp socket connected");
        Ok(())
    };

    connect().map_err(|source| CheckError::Connect {
        address: address.to_string(),
        source,
    })
}

fn resolve(address: &str) -> CheckResult<Vec<SocketAddr>> {
    let addrs: Vec<SocketAddr> = address
        .to_socket_addrs()
        .map_err(|source| CheckError::Connect {
            address: address.to_string(),
            source,
        })?
        .collect();
    debug!(?addrs, "resolved address");
    Ok(addrs)
}
