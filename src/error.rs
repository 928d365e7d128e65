use reqwest::StatusCode;
use thiserror::Error;

use crate::transcode::TranscodeError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error occurred during the request. Status: {status}.")]
    RequestFailed { status: StatusCode },

    #[error("Audio content is empty.")]
    EmptyAudioContent,

    #[error("Failed to reach synthesis endpoint")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to write audio file")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
