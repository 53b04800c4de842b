use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use crate::error::CollectError;

// -----------------------------------------------------------------------------
// HostAndPort

/// A host name or address with an optional port.
///
/// No validation is done on the host part; IPv6 literals are accepted bare
/// (`::1`) or bracketed (`[::1]:80`).
///
/// # Examples
///
/// ```
/// use vc_collections::HostAndPort;
///
/// let addr: HostAndPort = "[::1]:8080".parse().unwrap();
/// assert_eq!(addr.host(), "::1");
/// assert_eq!(addr.port(), Some(8080));
/// assert_eq!(addr.to_string(), "[::1]:8080");
///
/// let bare: HostAndPort = "example.com".parse().unwrap();
/// assert_eq!(bare.port_or_default(443), 443);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HostAndPort {
    host: String,
    port: Option<u16>,
}

impl HostAndPort {
    #[inline]
    pub fn from_host(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
        }
    }

    #[inline]
    pub fn from_parts(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port: Some(port),
        }
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    #[inline]
    pub fn has_port(&self) -> bool {
        self.port.is_some()
    }

    #[inline]
    pub fn port_or_default(&self, default: u16) -> u16 {
        self.port.unwrap_or(default)
    }

    /// Returns a copy using `port` when none is set.
    pub fn with_default_port(&self, port: u16) -> Self {
        Self {
            host: self.host.clone(),
            port: Some(self.port.unwrap_or(port)),
        }
    }
}

fn invalid(input: &str, reason: &'static str) -> CollectError {
    CollectError::InvalidHostAndPort {
        input: input.to_string(),
        reason,
    }
}

impl FromStr for HostAndPort {
    type Err = CollectError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let (host, port) = if let Some(rest) = input.strip_prefix('[') {
            let Some((host, tail)) = rest.split_once(']') else {
                return Err(invalid(input, "missing closing `]`"));
            };
            match tail {
                "" => (host, None),
                _ => match tail.strip_prefix(':') {
                    Some(port) => (host, Some(port)),
                    None => return Err(invalid(input, "only a port may follow `]`")),
                },
            }
        } else {
            match input.split_once(':') {
                Some((host, port)) if !port.contains(':') => (host, Some(port)),
                // Several colons without brackets: a bare IPv6 literal.
                Some(_) | None => (input, None),
            }
        };

        let port = match port {
            None => None,
            Some(text) => {
                if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid(input, "port must be a decimal number"));
                }
                match text.parse::<u16>() {
                    Ok(port) => Some(port),
                    Err(_) => return Err(invalid(input, "port out of range")),
                }
            }
        };

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for HostAndPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bracket = self.host.contains(':');
        match (bracket, self.port) {
            (true, Some(port)) => write!(f, "[{}]:{port}", self.host),
            (true, None) => write!(f, "[{}]", self.host),
            (false, Some(port)) => write!(f, "{}:{port}", self.host),
            (false, None) => f.write_str(&self.host),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HostAndPort;

    #[test]
    fn parses_common_forms() {
        let a: HostAndPort = "localhost:80".parse().unwrap();
        assert_eq!((a.host(), a.port()), ("localhost", Some(80)));

        let b: HostAndPort = "2001:db8::1".parse().unwrap();
        assert_eq!((b.host(), b.port()), ("2001:db8::1", None));

        let c: HostAndPort = "[2001:db8::1]".parse().unwrap();
        assert_eq!(c.host(), "2001:db8::1");
        assert!(!c.has_port());
    }

    #[test]
    fn rejects_bad_ports() {
        assert!("host:".parse::<HostAndPort>().is_err());
        assert!("host:+80".parse::<HostAndPort>().is_err());
        assert!("host:70000".parse::<HostAndPort>().is_err());
        assert!("[::1]x".parse::<HostAndPort>().is_err());
        assert!("[::1".parse::<HostAndPort>().is_err());
    }

    #[test]
    fn default_port_only_fills_missing() {
        let a = HostAndPort::from_host("db").with_default_port(5432);
        assert_eq!(a.port(), Some(5432));
        let b = HostAndPort::from_parts("db", 1).with_default_port(5432);
        assert_eq!(b.port(), Some(1));
    }
}
