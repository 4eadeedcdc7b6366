//! Framed TCP push protocol for writing values into the store.
//!
//! Wire format, both directions: 4-byte magic `ZBXD`, one flag byte with
//! the JSON bit set, payload length as u64 little-endian, then the JSON
//! payload. A push carries `{"request": "sender data", "data": [{host,
//! key, value}, ...]}` and the store answers with a success/failure
//! envelope in the same framing.

use super::StoreError;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

pub const FRAME_MAGIC: [u8; 4] = *b"ZBXD";
pub const FRAME_FLAG_JSON: u8 = 0x01;
pub const HEADER_LEN: usize = 13;

// Replies are small; anything bigger than this is a framing bug, not data.
const MAX_FRAME_PAYLOAD: usize = 1 << 24;

/// One value write: which host identity, which item key, what value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushValue {
    pub host: String,
    pub key: String,
    pub value: String,
}

#[derive(Serialize, Deserialize)]
struct PushEnvelope {
    request: String,
    data: Vec<PushValue>,
}

#[derive(Debug, Deserialize)]
struct PushReply {
    response: String,
    #[serde(default)]
    info: String,
}

/// Wraps a JSON payload in the protocol framing.
pub fn encode_frame(payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(HEADER_LEN + payload.len());
    frame.extend_from_slice(&FRAME_MAGIC);
    frame.push(FRAME_FLAG_JSON);
    frame.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    frame.extend_from_slice(payload);
    frame
}

/// Validates a frame header and returns the payload length it announces.
pub fn frame_payload_len(header: &[u8; HEADER_LEN]) -> Result<usize, StoreError> {
    if header[..4] != FRAME_MAGIC {
        return Err(StoreError::Protocol("bad frame magic".into()));
    }
    if header[4] & FRAME_FLAG_JSON == 0 {
        return Err(StoreError::Protocol("unsupported frame flags".into()));
    }
    let mut len_bytes = [0u8; 8];
    len_bytes.copy_from_slice(&header[5..13]);
    let len = u64::from_le_bytes(len_bytes) as usize;
    if len > MAX_FRAME_PAYLOAD {
        return Err(StoreError::Protocol(format!(
            "frame announces {len} payload bytes"
        )));
    }
    Ok(len)
}

/// Push-side store client. One short-lived connection per batch, matching
/// how the store's trapper port expects senders to behave.
pub struct Sender {
    addr: String,
}

impl Sender {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into() }
    }

    pub async fn send_value(&self, host: &str, key: &str, value: &str) -> Result<(), StoreError> {
        self.send_values(vec![PushValue {
            host: host.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }])
        .await
    }

    pub async fn send_values(&self, values: Vec<PushValue>) -> Result<(), StoreError> {
        let envelope = PushEnvelope {
            request: "sender data".to_string(),
            data: values,
        };
        let payload = serde_json::to_vec(&envelope)?;

        let mut stream = TcpStream::connect(&self.addr).await?;
        stream.write_all(&encode_frame(&payload)).await?;

        let mut header = [0u8; HEADER_LEN];
        stream.read_exact(&mut header).await?;
        let len = frame_payload_len(&header)?;
        let mut body = vec![0u8; len];
        stream.read_exact(&mut body).await?;

        let reply: PushReply = serde_json::from_slice(&body)?;
        if reply.response != "success" {
            return Err(StoreError::Rejected(reply.info));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_round_trip() {
        let payload = br#"{"request":"sender data","data":[]}"#;
        let frame = encode_frame(payload);
        assert_eq!(frame.len(), HEADER_LEN + payload.len());
        assert_eq!(&frame[..4], b"ZBXD");
        assert_eq!(frame[4], FRAME_FLAG_JSON);

        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&frame[..HEADER_LEN]);
        assert_eq!(frame_payload_len(&header).unwrap(), payload.len());
        assert_eq!(&frame[HEADER_LEN..], payload);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut header = [0u8; HEADER_LEN];
        header[..4].copy_from_slice(b"HTTP");
        header[4] = FRAME_FLAG_JSON;
        assert!(matches!(
            frame_payload_len(&header),
            Err(StoreError::Protocol(_))
        ));
    }

    #[test]
    fn missing_json_flag_is_rejected() {
        let frame = encode_frame(b"{}");
        let mut header = [0u8; HEADER_LEN];
        header.copy_from_slice(&frame[..HEADER_LEN]);
        header[4] = 0x00;
        assert!(matches!(
            frame_payload_len(&header),
            Err(StoreError::Protocol(_))
        ));
    }

    #[test]
    fn oversized_frame_is_rejected() {
        let mut header = [0u8; HEADER_LEN];
        header[..4].copy_from_slice(&FRAME_MAGIC);
        header[4] = FRAME_FLAG_JSON;
        header[5..13].copy_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(
            frame_payload_len(&header),
            Err(StoreError::Protocol(_))
        ));
    }

    #[test]
    fn push_envelope_serializes_as_sender_data() {
        let envelope = PushEnvelope {
            request: "sender data".to_string(),
            data: vec![PushValue {
                host: "Player 1".to_string(),
                key: "player.score".to_string(),
                value: "Z _ B B _ _".to_string(),
            }],
        };
        let json = serde_json::to_value(&envelope).unwrap();
        assert_eq!(json["request"], "sender data");
        assert_eq!(json["data"][0]["host"], "Player 1");
        assert_eq!(json["data"][0]["value"], "Z _ B B _ _");
    }
}
