use alloc::string::String;
use core::fmt;

use serde_core::Deserializer;
use serde_core::de::{Error, MapAccess, Visitor};
use vc_collections::HostAndPort;

use super::{Children, ContainerStrategy};
use crate::Value;
use crate::de::ValueDeserializer;
use crate::family::{Family, WrapperKind};

/// The shared host-and-port strategy; it holds no state.
pub static HOST_AND_PORT: HostAndPortStrategy = HostAndPortStrategy;

// -----------------------------------------------------------------------------
// HostAndPortStrategy

/// Reads a host with an optional port.
///
/// Accepts `"host:port"`, `"[v6]:port"`, a bare host or IPv6 literal, or an
/// object with `host` (or `hostText`) and `port`. An empty string reads as
/// [`Value::Null`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HostAndPortStrategy;

struct HostAndPortVisitor;

impl<'de> Visitor<'de> for HostAndPortVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a `host:port` string or a host and port object")
    }

    fn visit_unit<E: Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Value, E> {
        if v.is_empty() {
            return Ok(Value::Null);
        }
        v.parse::<HostAndPort>()
            .map(Value::HostAndPort)
            .map_err(E::custom)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut host: Option<String> = None;
        let mut port: Option<u16> = None;

        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "host" | "hostText" => {
                    if host.is_some() {
                        return Err(A::Error::duplicate_field("host"));
                    }
                    host = Some(map.next_value()?);
                }
                "port" => {
                    if port.is_some() {
                        return Err(A::Error::duplicate_field("port"));
                    }
                    port = map.next_value()?;
                }
                other => return Err(A::Error::unknown_field(other, &["host", "hostText", "port"])),
            }
        }

        let Some(host) = host else {
            return Err(A::Error::missing_field("host"));
        };
        let value = match port {
            Some(port) => HostAndPort::from_parts(host, port),
            None => HostAndPort::from_host(host),
        };
        Ok(Value::HostAndPort(value))
    }
}

impl ValueDeserializer for HostAndPortStrategy {
    fn deserialize<'de>(
        &self,
        deserializer: &mut dyn erased_serde::Deserializer<'de>,
    ) -> Result<Value, erased_serde::Error> {
        deserializer.deserialize_any(HostAndPortVisitor)
    }
}

impl ContainerStrategy for HostAndPortStrategy {
    #[inline]
    fn family(&self) -> Family {
        Family::ScalarWrapper(WrapperKind::HostAndPort)
    }

    fn children(&self) -> Children {
        Children::default()
    }
}
