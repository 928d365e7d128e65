use std::path::PathBuf;

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use serde::Deserialize;

use crate::model::{SpeechRate, SynthesisRequest, VoiceSelection};

const ENV_PREFIX: &str = "TXT2VOICE_";

static CONFIG: OnceCell<Config> = OnceCell::new();

#[derive(Deserialize, Debug)]
pub struct Config {
    #[serde(default = "default_url")]
    pub url: String,

    pub folder_id: String,
    pub iam_token: String,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_voice")]
    pub voice: String,

    #[serde(default = "default_secondary_voice")]
    pub secondary_voice: String,

    #[serde(default = "default_speed")]
    pub speed: f32,

    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    pub mp3_path: Option<PathBuf>,
}

fn default_url() -> String {
    crate::speechkit::DEFAULT_URL.to_string()
}

fn default_lang() -> String {
    "ru-RU".to_string()
}

fn default_voice() -> String {
    "filipp".to_string()
}

fn default_secondary_voice() -> String {
    "alyona".to_string()
}

fn default_speed() -> f32 {
    1.0
}

fn default_output_path() -> PathBuf {
    PathBuf::from("speech.ogg")
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(envy::prefixed(ENV_PREFIX).from_env()?)
    }

    pub fn from_vars<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Ok(envy::prefixed(ENV_PREFIX).from_iter(iter)?)
    }

    pub fn request(&self, text: impl Into<String>) -> SynthesisRequest {
        SynthesisRequest::new(
            text,
            SpeechRate::new(self.speed),
            self.output_path.clone(),
            self.folder_id.clone(),
            self.iam_token.clone(),
        )
        .with_voice(VoiceSelection::new(
            self.voice.clone(),
            self.secondary_voice.clone(),
        ))
        .with_lang(self.lang.clone())
    }
}

pub fn init() -> Result<()> {
    if CONFIG.set(Config::from_env()?).is_err() {
        return Err(anyhow!("Failed to set CONFIG"));
    }

    Ok(())
}

pub fn get() -> &'static Config {
    CONFIG.get().expect("config::init was not called")
}
