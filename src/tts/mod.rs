//! Text-to-speech.
//!
//! `TtsProvider` is an enum over backends, built once at startup from
//! [`TtsConfig`]. Without vendor credentials the provider is
//! [`TtsProvider::Unconfigured`] and every request fails with
//! [`TtsError::NotConfigured`]: callers never receive partial audio.

#[cfg(feature = "tts-iflytek")]
pub mod iflytek;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::TtsConfig;

/// Largest UTF-8 text accepted in one synthesis request (vendor frame limit).
pub const MAX_TEXT_BYTES: usize = 8000;

/// PCM format of iFlytek `aue = "raw"` output.
pub const SAMPLE_RATE: u32 = 16_000;
const CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

#[derive(Debug, Error)]
pub enum TtsError {
    #[error("TTS service not configured")]
    NotConfigured,
    #[error("text must be 1..={MAX_TEXT_BYTES} bytes, got {0}")]
    InvalidText(usize),
    #[error("TTS request signing failed: {0}")]
    Signing(String),
    #[error("TTS service connection error: {0}")]
    Connection(String),
    #[error("TTS service error {code}: {message}")]
    Vendor { code: i64, message: String },
    #[error("TTS service timed out")]
    Timeout,
}

#[derive(Debug, Clone)]
pub enum TtsProvider {
    #[cfg(feature = "tts-iflytek")]
    Iflytek(iflytek::IflytekTts),
    Unconfigured,
}

impl TtsProvider {
    pub fn build(config: &TtsConfig) -> Self {
        match &config.credentials {
            #[cfg(feature = "tts-iflytek")]
            Some(creds) => {
                info!(voice = %config.voice, "iFlytek TTS enabled");
                TtsProvider::Iflytek(iflytek::IflytekTts::new(creds.clone(), config))
            }
            #[cfg(not(feature = "tts-iflytek"))]
            Some(_) => {
                warn!("IFLYTEK_* credentials set but built without `tts-iflytek`: TTS disabled");
                TtsProvider::Unconfigured
            }
            None => {
                warn!("IFLYTEK_* credentials missing: TTS disabled");
                TtsProvider::Unconfigured
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        !matches!(self, TtsProvider::Unconfigured)
    }

    /// Synthesize `text` and return a complete WAV file.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, TtsError> {
        match self {
            #[cfg(feature = "tts-iflytek")]
            TtsProvider::Iflytek(p) => {
                validate_text(text)?;
                let pcm = p.synthesize(text).await?;
                Ok(wav_from_pcm(&pcm))
            }
            TtsProvider::Unconfigured => Err(TtsError::NotConfigured),
        }
    }
}

fn validate_text(text: &str) -> Result<(), TtsError> {
    let len = text.len();
    if text.trim().is_empty() || len > MAX_TEXT_BYTES {
        return Err(TtsError::InvalidText(len));
    }
    Ok(())
}

/// Prefix 16 kHz mono 16-bit PCM with a canonical 44-byte RIFF header.
pub fn wav_from_pcm(pcm: &[u8]) -> Vec<u8> {
    let data_len = pcm.len() as u32;
    let byte_rate = SAMPLE_RATE * u32::from(CHANNELS) * u32::from(BITS_PER_SAMPLE) / 8;
    let block_align = CHANNELS * BITS_PER_SAMPLE / 8;

    let mut out = Vec::with_capacity(44 + pcm.len());
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVE");
    out.extend_from_slice(b"fmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&CHANNELS.to_le_bytes());
    out.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    out.extend_from_slice(&byte_rate.to_le_bytes());
    out.extend_from_slice(&block_align.to_le_bytes());
    out.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(pcm);
    out
}
