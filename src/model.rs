use std::path::PathBuf;

use bytes::Bytes;

fn default_primary_voice() -> String {
    "filipp".to_string()
}

fn default_secondary_voice() -> String {
    "alyona".to_string()
}

fn default_lang() -> String {
    "ru-RU".to_string()
}

/// Named voices offered by the synthesis service. Only `primary` is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    primary: String,
    secondary: String,
}

impl VoiceSelection {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
        }
    }

    pub fn primary(&self) -> &str {
        &self.primary
    }

    pub fn secondary(&self) -> &str {
        &self.secondary
    }
}

impl Default for VoiceSelection {
    fn default() -> Self {
        Self::new(default_primary_voice(), default_secondary_voice())
    }
}

/// Playback speed multiplier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechRate {
    rate: f32,
}

impl SpeechRate {
    pub fn new(rate: f32) -> Self {
        Self { rate }
    }

    pub fn rate(self) -> f32 {
        self.rate
    }
}

#[derive(Debug, Clone)]
pub struct SynthesisRequest {
    pub voice: VoiceSelection,
    pub rate: SpeechRate,
    pub output_path: PathBuf,
    pub folder_id: String,
    pub iam_token: String,
    pub lang: String,
    pub text: String,
}

impl SynthesisRequest {
    /// Request with the default voices and language tag.
    pub fn new(
        text: impl Into<String>,
        rate: SpeechRate,
        output_path: impl Into<PathBuf>,
        folder_id: impl Into<String>,
        iam_token: impl Into<String>,
    ) -> Self {
        Self {
            voice: VoiceSelection::default(),
            rate,
            output_path: output_path.into(),
            folder_id: folder_id.into(),
            iam_token: iam_token.into(),
            lang: default_lang(),
            text: text.into(),
        }
    }

    #[must_use]
    pub fn with_voice(mut self, voice: VoiceSelection) -> Self {
        self.voice = voice;
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// Raw audio returned by a successful synthesis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioPayload {
    pub content: Bytes,
}

impl AudioPayload {
    pub fn new(content: impl Into<Bytes>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
