//! Audio playback seam
//!
//! Playback is a side effect, not part of the synthesis result, and lives
//! behind a trait so tests run without an audio device.

use std::io::Cursor;

use crate::SpeechError;

/// Renders encoded audio to an output device. Blocking.
pub trait Playback: Send + Sync {
    /// Play the encoded audio to completion.
    fn play(&self, audio: &[u8]) -> Result<(), SpeechError>;
}

/// Default-output-device playback via rodio.
#[derive(Debug, Default)]
pub struct RodioPlayback;

impl RodioPlayback {
    pub fn new() -> Self {
        Self
    }
}

impl Playback for RodioPlayback {
    fn play(&self, audio: &[u8]) -> Result<(), SpeechError> {
        let (_stream, handle) = rodio::OutputStream::try_default()
            .map_err(|e| SpeechError::Playback(format!("no output device: {}", e)))?;
        let sink = rodio::Sink::try_new(&handle)
            .map_err(|e| SpeechError::Playback(e.to_string()))?;
        let source = rodio::Decoder::new(Cursor::new(audio.to_vec()))
            .map_err(|e| SpeechError::Playback(format!("undecodable audio: {}", e)))?;

        sink.append(source);
        sink.sleep_until_end();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rodio_playback_rejects_garbage_bytes() {
        // Either the device is missing (CI) or the bytes are undecodable;
        // both must surface as a Playback error, never a panic.
        let playback = RodioPlayback::new();
        let result = playback.play(&[0u8; 16]);
        assert!(matches!(result, Err(SpeechError::Playback(_))));
    }
}
