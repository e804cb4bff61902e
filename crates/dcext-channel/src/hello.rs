use std::fmt;
use std::time::Duration;

use crate::error::{ChannelError, Result};
use crate::message::Envelope;

const MAX_PROTOCOL_LEN: usize = 32;
const MAX_VERSION_LEN: usize = 16;

/// Protocol name spoken by extensions and hosts.
pub const PROTOCOL_NAME: &str = "dc-extensions";

/// Local protocol version.
pub const PROTOCOL_VERSION: &str = "1.0";

/// Configuration for the connect/connected hello exchange.
#[derive(Clone, PartialEq, Eq)]
pub struct HelloConfig {
    /// How long to wait for an acceptable `connected` reply.
    pub timeout: Duration,
    /// Expected protocol name.
    pub protocol_name: String,
    /// Local protocol version.
    pub protocol_version: String,
}

impl Default for HelloConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(1000),
            protocol_name: PROTOCOL_NAME.to_string(),
            protocol_version: PROTOCOL_VERSION.to_string(),
        }
    }
}

impl fmt::Debug for HelloConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HelloConfig")
            .field("timeout", &self.timeout)
            .field("protocol", &format_args!("{}/{}", self.protocol_name, self.protocol_version))
            .finish()
    }
}

/// Outcome of a validated `connected` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    /// Protocol name the host answered with.
    pub protocol: String,
    /// Host protocol version.
    pub version: String,
}

impl HelloConfig {
    /// Build the `connect` envelope for this configuration.
    pub fn connect_envelope(&self) -> Result<Envelope> {
        validate_protocol_name(&self.protocol_name)?;
        validate_version(&self.protocol_version)?;
        Ok(Envelope::Connect {
            protocol: self.protocol_name.clone(),
            version: self.protocol_version.clone(),
        })
    }

    /// Check the host's `connected` reply against this configuration.
    pub fn accept(&self, protocol: &str, version: &str) -> Result<Hello> {
        validate_protocol_name(protocol)?;
        validate_version(version)?;

        if protocol != self.protocol_name {
            return Err(ChannelError::InvalidHello(format!(
                "unknown protocol '{}' (expected '{}')",
                protocol, self.protocol_name
            )));
        }

        if !is_version_compatible(&self.protocol_version, version)? {
            return Err(ChannelError::InvalidHello(format!(
                "incompatible version '{}' (local '{}')",
                version, self.protocol_version
            )));
        }

        Ok(Hello {
            protocol: protocol.to_string(),
            version: version.to_string(),
        })
    }
}

fn validate_protocol_name(protocol: &str) -> Result<()> {
    if protocol.is_empty() || protocol.len() > MAX_PROTOCOL_LEN {
        return Err(ChannelError::InvalidHello(format!(
            "invalid protocol name length: {}",
            protocol.len()
        )));
    }
    Ok(())
}

fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() || version.len() > MAX_VERSION_LEN {
        return Err(ChannelError::InvalidHello(format!(
            "invalid protocol version length: {}",
            version.len()
        )));
    }
    let _ = parse_version(version)?;
    Ok(())
}

/// The host may be older in minor version, never newer, and majors must match.
fn is_version_compatible(local_version: &str, host_version: &str) -> Result<bool> {
    let (local_major, local_minor) = parse_version(local_version)?;
    let (host_major, host_minor) = parse_version(host_version)?;

    Ok(local_major == host_major && local_minor >= host_minor)
}

fn parse_version(version: &str) -> Result<(u16, u16)> {
    let invalid = |why: &str| ChannelError::InvalidHello(format!("invalid version '{version}': {why}"));

    let mut parts = version.split('.');
    let major = parts.next().ok_or_else(|| invalid("missing major"))?;
    let minor = parts.next().ok_or_else(|| invalid("missing minor"))?;
    if parts.next().is_some() {
        return Err(invalid("expected '<major>.<minor>'"));
    }

    let major = major.parse::<u16>().map_err(|_| invalid("non-numeric major"))?;
    let minor = minor.parse::<u16>().map_err(|_| invalid("non-numeric minor"))?;

    Ok((major, minor))
}
