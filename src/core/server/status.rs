// ─── Server Status ───
// Server List Ping over raw TCP: handshake (next state = status), status
// request, then one status response packet carrying the server's JSON.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use super::varint::{read_varint, varint_len, write_varint};
use crate::core::error::{ApiError, ApiResult};
use crate::core::json::lenient;

pub const DEFAULT_PORT: u16 = 25565;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const HANDSHAKE_PACKET_ID: i32 = 0x00;
const STATUS_REQUEST_PACKET_ID: i32 = 0x00;
const STATUS_RESPONSE_PACKET_ID: i32 = 0x00;
/// Protocol version sent in the handshake; servers answer status for any value.
const ANY_PROTOCOL_VERSION: i32 = -1;
const NEXT_STATE_STATUS: i32 = 1;
/// Upper bound on the status JSON we are willing to buffer.
const MAX_STATUS_PAYLOAD: usize = 2 * 1024 * 1024;

// ─── Target address ───

/// Validated probe target. The hostname is sent with a one-byte length
/// prefix, so it must be ASCII and at most 255 bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerAddress {
    host: String,
    port: u16,
}

impl ServerAddress {
    pub fn new(host: &str, port: i64) -> ApiResult<Self> {
        let port = u16::try_from(port).map_err(|_| {
            ApiError::InvalidArgument(format!(
                "Port {} is out of range (must be between {} and {})",
                port,
                u16::MIN,
                u16::MAX
            ))
        })?;

        let host = host.trim();
        if host.is_empty() {
            return Err(ApiError::InvalidArgument("Server address is empty".into()));
        }
        if !host.is_ascii() {
            return Err(ApiError::InvalidArgument(format!(
                "Server address must be ASCII: {}",
                host
            )));
        }
        if host.len() > usize::from(u8::MAX) {
            return Err(ApiError::InvalidArgument(format!(
                "Server address is longer than {} bytes",
                u8::MAX
            )));
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl std::fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

// ─── Status payload ───

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusVersion {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub protocol: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPlayers {
    #[serde(default, deserialize_with = "lenient")]
    pub max: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub online: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub sample: Vec<StatusPlayer>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusPlayer {
    #[serde(default, deserialize_with = "lenient")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient")]
    pub id: String,
}

/// The JSON document a server returns for a status request.
///
/// Fields the server adds beyond the vanilla set (`forgeData`, `modinfo`,
/// `preventsChatReports`, ...) are kept in `extra`. Known fields of the
/// wrong type decay to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerStatus {
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<StatusVersion>,
    #[serde(default, deserialize_with = "lenient")]
    pub players: Option<StatusPlayers>,
    /// Either a plain string or a chat component.
    #[serde(default)]
    pub description: serde_json::Value,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub favicon: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub enforces_secure_chat: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ServerStatus {
    /// MOTD as plain text, with chat component `extra` children flattened.
    pub fn motd(&self) -> String {
        let mut out = String::new();
        collect_chat_text(&self.description, &mut out);
        out
    }
}

fn collect_chat_text(component: &serde_json::Value, out: &mut String) {
    match component {
        serde_json::Value::String(s) => out.push_str(s),
        serde_json::Value::Array(parts) => parts.iter().for_each(|p| collect_chat_text(p, out)),
        serde_json::Value::Object(map) => {
            if let Some(text) = map.get("text") {
                collect_chat_text(text, out);
            }
            if let Some(extra) = map.get("extra") {
                collect_chat_text(extra, out);
            }
        }
        _ => {}
    }
}

/// Returned when the server answers with a packet that is not a status
/// response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnknownStatus {
    pub status: &'static str,
    pub ip: String,
    pub name: &'static str,
}

impl UnknownStatus {
    fn for_host(host: &str) -> Self {
        Self {
            status: "Unknown",
            ip: host.to_string(),
            name: "Unknown response",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ServerStatusResult {
    Online(ServerStatus),
    /// Valid JSON that is not a status object, passed through untouched.
    Raw(serde_json::Value),
    Unknown(UnknownStatus),
}

impl ServerStatusResult {
    pub fn is_unknown(&self) -> bool {
        matches!(self, ServerStatusResult::Unknown(_))
    }
}

// ─── Transport ───

/// Opens the duplex byte stream a probe runs over.
#[async_trait]
pub trait Connector: Send + Sync {
    type Stream: AsyncRead + AsyncWrite + Unpin + Send;

    async fn connect(&self, host: &str, port: u16) -> std::io::Result<Self::Stream>;
}

/// Plain TCP, resolving `host` through the system resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, host: &str, port: u16) -> std::io::Result<TcpStream> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

// ─── Client ───

/// Probes Minecraft servers for their status.
///
/// Each call owns its connection: opened, handshaked, queried and dropped
/// inside [`ServerStatusClient::probe`], whatever the outcome.
pub struct ServerStatusClient<C = TcpConnector> {
    connector: C,
    connect_timeout: Duration,
    read_timeout: Option<Duration>,
}

impl ServerStatusClient<TcpConnector> {
    pub fn new() -> Self {
        Self::with_connector(TcpConnector)
    }
}

impl Default for ServerStatusClient<TcpConnector> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Connector> ServerStatusClient<C> {
    pub fn with_connector(connector: C) -> Self {
        Self {
            connector,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: None,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Bound on the whole request/response exchange after connecting.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Single attempt: connect, handshake, request status, parse the reply.
    pub async fn probe(&self, address: &ServerAddress) -> ApiResult<ServerStatusResult> {
        debug!("Connecting to {}", address);

        let connect = self.connector.connect(address.host(), address.port());
        let mut stream = match tokio::time::timeout(self.connect_timeout, connect).await {
            Ok(Ok(stream)) => stream,
            // Refused or unresolvable counts as unreachable, same as a stall.
            Ok(Err(e)) => {
                debug!("Connection to {} failed: {}", address, e);
                return Err(ApiError::Timeout {
                    host: address.host().to_string(),
                    port: address.port(),
                    after: self.connect_timeout,
                });
            }
            Err(_) => {
                warn!("Connection to {} timed out", address);
                return Err(ApiError::Timeout {
                    host: address.host().to_string(),
                    port: address.port(),
                    after: self.connect_timeout,
                });
            }
        };

        let exchange = exchange_status(&mut stream, address);
        let result = match self.read_timeout {
            Some(limit) => match tokio::time::timeout(limit, exchange).await {
                Ok(result) => result,
                Err(_) => Err(ApiError::Timeout {
                    host: address.host().to_string(),
                    port: address.port(),
                    after: limit,
                }),
            },
            None => exchange.await,
        };

        // Dropping the stream closes the socket on every path.
        drop(stream);

        if let Ok(ServerStatusResult::Online(status)) = &result {
            info!(
                "Status from {}: {} ({} online)",
                address,
                status.version.as_ref().map(|v| v.name.as_str()).unwrap_or("?"),
                status.players.as_ref().map(|p| p.online).unwrap_or(0)
            );
        }

        result
    }
}

async fn exchange_status<S>(stream: &mut S, address: &ServerAddress) -> ApiResult<ServerStatusResult>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    stream
        .write_all(&handshake_packet(address.host(), address.port()))
        .await?;
    stream.write_all(&status_request_packet()).await?;
    stream.flush().await?;
    debug!("Handshake and status request sent to {}", address);

    read_status_response(stream, address.host()).await
}

/// `length | id | body`, with length covering id and body.
fn frame_packet(packet_id: i32, body: &[u8]) -> Vec<u8> {
    let length = varint_len(packet_id) + body.len();
    let mut packet = Vec::with_capacity(varint_len(length as i32) + length);
    write_varint(&mut packet, length as i32);
    write_varint(&mut packet, packet_id);
    packet.extend_from_slice(body);
    packet
}

pub(crate) fn handshake_packet(host: &str, port: u16) -> Vec<u8> {
    let mut body = Vec::with_capacity(host.len() + 9);
    write_varint(&mut body, ANY_PROTOCOL_VERSION);
    body.push(host.len() as u8);
    body.extend_from_slice(host.as_bytes());
    body.extend_from_slice(&port.to_be_bytes());
    write_varint(&mut body, NEXT_STATE_STATUS);
    frame_packet(HANDSHAKE_PACKET_ID, &body)
}

pub(crate) fn status_request_packet() -> Vec<u8> {
    frame_packet(STATUS_REQUEST_PACKET_ID, &[])
}

pub(crate) async fn read_status_response<R>(reader: &mut R, host: &str) -> ApiResult<ServerStatusResult>
where
    R: AsyncRead + Unpin,
{
    // Frame length is not checked against the bytes that follow.
    let _frame_length = read_varint(reader).await?;
    let packet_id = read_varint(reader).await?;
    if packet_id != STATUS_RESPONSE_PACKET_ID {
        warn!("Unexpected packet id {:#04x} from {}", packet_id, host);
        return Ok(ServerStatusResult::Unknown(UnknownStatus::for_host(host)));
    }

    let declared = read_varint(reader).await?;
    let payload_length = usize::try_from(declared)
        .map_err(|_| ApiError::Protocol(format!("Negative status payload length {}", declared)))?;
    if payload_length > MAX_STATUS_PAYLOAD {
        return Err(ApiError::Protocol(format!(
            "Status payload of {} bytes exceeds {} bytes",
            payload_length, MAX_STATUS_PAYLOAD
        )));
    }

    let mut payload = vec![0u8; payload_length];
    reader.read_exact(&mut payload).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            ApiError::Protocol(format!(
                "Status payload truncated (expected {} bytes)",
                payload_length
            ))
        } else {
            e.into()
        }
    })?;

    let text = String::from_utf8(payload)
        .map_err(|e| ApiError::MalformedResponse(format!("Status payload is not UTF-8: {}", e)))?;
    let text = normalize_line_endings(&text);

    let value: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| ApiError::MalformedResponse(format!("Status payload is not JSON: {}", e)))?;
    match value {
        serde_json::Value::Null => Ok(ServerStatusResult::Unknown(UnknownStatus::for_host(host))),
        serde_json::Value::Object(_) => match ServerStatus::deserialize(&value) {
            Ok(status) => Ok(ServerStatusResult::Online(status)),
            Err(e) => {
                debug!("Status from {} kept as raw JSON: {}", host, e);
                Ok(ServerStatusResult::Raw(value))
            }
        },
        other => {
            debug!("Non-object status document from {}", host);
            Ok(ServerStatusResult::Raw(other))
        }
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}
