//! iFlytek online TTS (`wss://tts-api.xfyun.cn/v2/tts`).
//!
//! One WebSocket per request: the signed URL carries an HMAC-SHA256
//! authorization over `host`, `date` and the request line; a single text
//! frame is sent; base64 audio chunks are collected until the frame with
//! `data.status == 2` arrives. Any nonzero `code` aborts the session.

use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use futures::{SinkExt, StreamExt};
use hmac::{Hmac, Mac};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error};

use crate::config::{IflytekCredentials, TtsConfig};

use super::TtsError;

type HmacSha256 = Hmac<Sha256>;

pub const DEFAULT_ENDPOINT: &str = "wss://tts-api.xfyun.cn/v2/tts";

/// `data.status` value marking the final frame.
const STATUS_LAST: i64 = 2;

#[derive(Debug, Clone)]
pub struct IflytekTts {
    creds: IflytekCredentials,
    endpoint: String,
    voice: String,
    speed: u8,
    volume: u8,
    pitch: u8,
    timeout: Duration,
}

impl IflytekTts {
    pub fn new(creds: IflytekCredentials, config: &TtsConfig) -> Self {
        Self {
            creds,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            voice: config.voice.clone(),
            speed: config.speed,
            volume: config.volume,
            pitch: config.pitch,
            timeout: Duration::from_secs(config.timeout_seconds),
        }
    }

    /// Point the client at another endpoint (a local stand-in in tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Run one synthesis session and return the raw PCM bytes.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        tokio::time::timeout(self.timeout, self.run_session(text))
            .await
            .map_err(|_| TtsError::Timeout)?
    }

    /// Build the authenticated WebSocket URL for the given RFC 1123 date.
    pub fn signed_url(&self, date: &str) -> Result<String, TtsError> {
        let endpoint = Url::parse(&self.endpoint)
            .map_err(|e| TtsError::Signing(format!("invalid endpoint {}: {e}", self.endpoint)))?;
        let host = endpoint
            .host_str()
            .ok_or_else(|| TtsError::Signing(format!("endpoint {} has no host", self.endpoint)))?
            .to_string();

        let origin = format!("host: {host}\ndate: {date}\nGET {} HTTP/1.1", endpoint.path());
        let mut mac = HmacSha256::new_from_slice(self.creds.api_secret.as_bytes())
            .map_err(|e| TtsError::Signing(e.to_string()))?;
        mac.update(origin.as_bytes());
        let signature = STANDARD.encode(mac.finalize().into_bytes());

        let authorization = format!(
            "api_key=\"{}\", algorithm=\"hmac-sha256\", headers=\"host date request-line\", signature=\"{signature}\"",
            self.creds.api_key
        );

        let mut url = endpoint;
        url.query_pairs_mut()
            .append_pair("authorization", &STANDARD.encode(authorization))
            .append_pair("date", date)
            .append_pair("host", &host);
        // Form encoding writes spaces as '+'; the gateway expects %20 in `date`.
        // Literal '+' in the values is already escaped as %2B at this point.
        let query = url.query().unwrap_or_default().replace('+', "%20");
        url.set_query(Some(&query));
        Ok(url.to_string())
    }

    fn request_frame(&self, text: &str) -> Result<String, TtsError> {
        let frame = RequestFrame {
            common: Common { app_id: &self.creds.app_id },
            business: Business {
                aue: "raw",
                vcn: &self.voice,
                tte: "UTF8",
                speed: self.speed,
                volume: self.volume,
                pitch: self.pitch,
            },
            data: RequestData {
                status: STATUS_LAST,
                text: STANDARD.encode(text),
            },
        };
        serde_json::to_string(&frame).map_err(|e| TtsError::Signing(format!("encode frame: {e}")))
    }

    async fn run_session(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        let url = self.signed_url(&rfc1123_now())?;
        let (mut ws, _) = connect_async(url.as_str()).await.map_err(|e| {
            error!(error = %e, "TTS websocket connect failed");
            TtsError::Connection(e.to_string())
        })?;

        ws.send(Message::Text(self.request_frame(text)?))
            .await
            .map_err(|e| TtsError::Connection(format!("send frame: {e}")))?;

        let mut audio = Vec::new();
        let outcome = loop {
            let Some(msg) = ws.next().await else {
                break Err(TtsError::Connection("socket closed before final audio frame".into()));
            };
            let frame = match msg {
                Ok(Message::Text(t)) => parse_frame(t.as_bytes()),
                Ok(Message::Binary(b)) => parse_frame(&b),
                Ok(Message::Close(_)) => {
                    break Err(TtsError::Connection("vendor closed the session early".into()));
                }
                Ok(_) => continue,
                Err(e) => break Err(TtsError::Connection(e.to_string())),
            };
            match frame {
                Ok(chunk) => {
                    audio.extend_from_slice(&chunk.audio);
                    if chunk.last {
                        break Ok(());
                    }
                }
                Err(e) => break Err(e),
            }
        };

        let _ = ws.close(None).await;

        match outcome {
            Ok(()) => {
                debug!(bytes = audio.len(), "TTS audio received");
                Ok(audio)
            }
            Err(e) => {
                error!(error = %e, "TTS session failed");
                Err(e)
            }
        }
    }
}

/// `Thu, 01 Jan 2026 00:00:00 GMT`
fn rfc1123_now() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RequestFrame<'a> {
    common: Common<'a>,
    business: Business<'a>,
    data: RequestData,
}

#[derive(Serialize)]
struct Common<'a> {
    app_id: &'a str,
}

#[derive(Serialize)]
struct Business<'a> {
    aue: &'a str,
    vcn: &'a str,
    tte: &'a str,
    speed: u8,
    volume: u8,
    pitch: u8,
}

#[derive(Serialize)]
struct RequestData {
    status: i64,
    text: String,
}

#[derive(Deserialize)]
struct ResponseFrame {
    code: i64,
    #[serde(default)]
    message: String,
    #[serde(default)]
    data: Option<ResponseData>,
}

#[derive(Deserialize)]
struct ResponseData {
    #[serde(default)]
    audio: Option<String>,
    #[serde(default)]
    status: Option<i64>,
}

#[derive(Debug, PartialEq, Eq)]
struct AudioChunk {
    audio: Vec<u8>,
    last: bool,
}

fn parse_frame(raw: &[u8]) -> Result<AudioChunk, TtsError> {
    let frame: ResponseFrame = serde_json::from_slice(raw)
        .map_err(|e| TtsError::Connection(format!("malformed vendor frame: {e}")))?;

    if frame.code != 0 {
        return Err(TtsError::Vendor { code: frame.code, message: frame.message });
    }

    let Some(data) = frame.data else {
        return Ok(AudioChunk { audio: Vec::new(), last: false });
    };
    let audio = match data.audio.as_deref() {
        Some(b64) if !b64.is_empty() => STANDARD
            .decode(b64)
            .map_err(|e| TtsError::Connection(format!("invalid audio payload: {e}")))?,
        _ => Vec::new(),
    };
    Ok(AudioChunk { audio, last: data.status == Some(STATUS_LAST) })
}
