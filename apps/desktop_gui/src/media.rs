//! Opening theme playback. Without the `audio` feature, or without an output
//! device, the mute toggle still tracks state and playback is a no-op.

#[cfg(feature = "audio")]
use anyhow::Context;

#[cfg(feature = "audio")]
struct Output {
    // Dropping the stream stops the sink.
    _stream: rodio::OutputStream,
    sink: rodio::Sink,
}

pub struct ThemeAudio {
    enabled: bool,
    muted: bool,
    #[cfg(feature = "audio")]
    output: Option<Output>,
}

impl ThemeAudio {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            muted: false,
            #[cfg(feature = "audio")]
            output: None,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        #[cfg(feature = "audio")]
        {
            self.output.as_ref().is_some_and(|out| !out.sink.empty())
        }
        #[cfg(not(feature = "audio"))]
        {
            false
        }
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
        tracing::debug!(muted = self.muted, "theme audio mute toggled");
        #[cfg(feature = "audio")]
        if let Some(out) = &self.output {
            out.sink.set_volume(self.volume());
        }
    }

    #[cfg(feature = "audio")]
    fn volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            1.0
        }
    }

    /// Starts playing an encoded track, replacing anything already queued.
    #[cfg(feature = "audio")]
    pub fn play(&mut self, bytes: Vec<u8>) -> anyhow::Result<()> {
        if !self.enabled {
            tracing::debug!("theme audio disabled; ignoring {} bytes", bytes.len());
            return Ok(());
        }
        let decoder = rodio::Decoder::new(std::io::Cursor::new(bytes))
            .context("failed to decode theme audio")?;
        let stream = rodio::OutputStreamBuilder::open_default_stream()
            .context("no audio output device available")?;
        let sink = rodio::Sink::connect_new(stream.mixer());
        sink.append(decoder);
        sink.set_volume(self.volume());
        sink.play();
        self.output = Some(Output {
            _stream: stream,
            sink,
        });
        tracing::info!(muted = self.muted, "theme audio playing");
        Ok(())
    }

    #[cfg(not(feature = "audio"))]
    pub fn play(&mut self, bytes: Vec<u8>) -> anyhow::Result<()> {
        tracing::debug!(
            enabled = self.enabled,
            "built without audio support; ignoring {} bytes",
            bytes.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mute_toggles_without_a_device() {
        let mut audio = ThemeAudio::new(false);
        assert!(!audio.is_muted());
        audio.toggle_mute();
        assert!(audio.is_muted());
        audio.toggle_mute();
        assert!(!audio.is_muted());
    }

    #[test]
    fn disabled_player_ignores_tracks() {
        let mut audio = ThemeAudio::new(false);
        audio.play(vec![0xFF, 0xFB, 0x90, 0x00]).expect("disabled playback is a no-op");
        assert!(!audio.is_playing());
    }
}
