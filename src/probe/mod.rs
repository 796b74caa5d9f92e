//! DNS Probe Module
//!
//! Sends a single recursive A query to a resolver and reports whether a
//! well-formed reply came back before the deadline. The answer itself is not
//! inspected: NXDOMAIN and other negative responses still prove the resolver
//! is reachable.

mod error;
#[cfg(test)]
mod tests;

pub use error::ProbeError;

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RecordType};
use tokio::net::UdpSocket;

use crate::core::config::DEFAULT_TIMEOUT_MS;

/// Port used when the server is given without one
pub const DEFAULT_DNS_PORT: u16 = 53;

/// Largest reply accepted over UDP
const MAX_REPLY_SIZE: usize = 4096;

/// Summary of a reply that counted as success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReply {
    pub response_code: ResponseCode,
    pub answers: usize,
}

/// Stateless DNS reachability check
#[derive(Debug, Clone)]
pub struct DnsProbe {
    timeout: Duration,
}

impl Default for DnsProbe {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_TIMEOUT_MS))
    }
}

impl DnsProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Query `server` for the A record of `lookup`.
    ///
    /// The whole exchange, including resolving a server hostname, is bounded
    /// by the probe timeout.
    pub async fn probe(&self, server: &str, lookup: &str) -> Result<ProbeReply, ProbeError> {
        if lookup.is_empty() {
            return Err(ProbeError::MissingLookup);
        }

        let server = normalize_server(server);
        let lookup = normalize_lookup(lookup);
        let name = Name::from_ascii(&lookup).map_err(|e| ProbeError::InvalidName {
            name: lookup.clone(),
            reason: e.to_string(),
        })?;

        let id: u16 = rand::random();
        let query = build_query(id, name)?;

        let bytes = match tokio::time::timeout(self.timeout, exchange(&server, &query)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(ProbeError::Timeout {
                    timeout_ms: self.timeout.as_millis() as u64,
                })
            }
        };

        let reply = parse_reply(id, &bytes)?;
        tracing::trace!(
            server = %server,
            lookup = %lookup,
            rcode = %reply.response_code,
            answers = reply.answers,
            "DNS reply received"
        );
        Ok(reply)
    }
}

/// Append the default port unless `server` already names one.
pub fn normalize_server(server: &str) -> String {
    if server.parse::<SocketAddr>().is_ok() {
        return server.to_string();
    }

    if let Ok(ip) = server.parse::<IpAddr>() {
        return SocketAddr::new(ip, DEFAULT_DNS_PORT).to_string();
    }

    // Bracketed IPv6 literal without a port
    if server.starts_with('[') && server.ends_with(']') {
        return format!("{}:{}", server, DEFAULT_DNS_PORT);
    }

    if server.contains(':') {
        server.to_string()
    } else {
        format!("{}:{}", server, DEFAULT_DNS_PORT)
    }
}

/// Make `lookup` fully qualified by appending the root label.
pub fn normalize_lookup(lookup: &str) -> String {
    if lookup.ends_with('.') {
        lookup.to_string()
    } else {
        format!("{}.", lookup)
    }
}

fn build_query(id: u16, name: Name) -> Result<Vec<u8>, ProbeError> {
    let mut message = Message::new();
    message
        .set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, RecordType::A));

    message.to_vec().map_err(|e| ProbeError::Encode {
        reason: e.to_string(),
    })
}

async fn exchange(server: &str, query: &[u8]) -> Result<Vec<u8>, ProbeError> {
    let addr = tokio::net::lookup_host(server)
        .await
        .map_err(|e| ProbeError::Resolve {
            server: server.to_string(),
            reason: e.to_string(),
        })?
        .next()
        .ok_or_else(|| ProbeError::Resolve {
            server: server.to_string(),
            reason: "no addresses".to_string(),
        })?;

    let local: SocketAddr = if addr.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local).await?;
    socket.connect(addr).await?;
    socket.send(query).await?;

    let mut buf = vec![0u8; MAX_REPLY_SIZE];
    let len = socket.recv(&mut buf).await?;
    buf.truncate(len);
    Ok(buf)
}

fn parse_reply(id: u16, bytes: &[u8]) -> Result<ProbeReply, ProbeError> {
    let message = Message::from_vec(bytes).map_err(|e| ProbeError::Malformed {
        reason: e.to_string(),
    })?;

    if message.message_type() != MessageType::Response {
        return Err(ProbeError::Malformed {
            reason: "reply is not a response".to_string(),
        });
    }

    if message.id() != id {
        return Err(ProbeError::IdMismatch {
            expected: id,
            actual: message.id(),
        });
    }

    Ok(ProbeReply {
        response_code: message.response_code(),
        answers: message.answers().len(),
    })
}
