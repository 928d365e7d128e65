use std::sync::Arc;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::model::{AudioPayload, SynthesisRequest};

mod api;

pub const DEFAULT_URL: &str = "https://tts.api.cloud.yandex.net/speech/v1/tts:synthesize";

/// Anything that can turn a [`SynthesisRequest`] into audio.
///
/// `Ok(None)` means a response arrived but its body could not be read;
/// the failure has already been logged. Status errors are `Err`.
#[async_trait]
pub trait AudioSource: Send + Sync {
    async fn fetch_audio(&self, request: &SynthesisRequest) -> Result<Option<AudioPayload>>;
}

#[derive(Debug)]
struct SpeechKitInner {
    url: String,
}

/// Client for the SpeechKit `tts:synthesize` endpoint.
///
/// Every call opens its own HTTP session with certificate verification
/// turned off, so self-signed endpoints work. Nothing is shared between
/// calls apart from the endpoint.
#[derive(Clone, Debug)]
pub struct SpeechKit {
    inner: Arc<SpeechKitInner>,
}

impl SpeechKit {
    pub fn new(url: impl Into<String>) -> Self {
        SpeechKit {
            inner: Arc::new(SpeechKitInner { url: url.into() }),
        }
    }

    fn session() -> Result<reqwest::Client> {
        let client = reqwest::ClientBuilder::new()
            .danger_accept_invalid_certs(true)
            .user_agent(concat!("txt2voice/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(client)
    }
}

#[async_trait]
impl AudioSource for SpeechKit {
    async fn fetch_audio(&self, request: &SynthesisRequest) -> Result<Option<AudioPayload>> {
        let form = api::SynthesisForm::from(request);

        debug!(
            url = %self.inner.url,
            lang = %form.lang,
            voice = %form.voice,
            speed = form.speed,
            "Requesting synthesis"
        );

        // Dropped on return, which closes the session.
        let session = Self::session()?;

        let response = session
            .post(&self.inner.url)
            .bearer_auth(&request.iam_token)
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::RequestFailed { status });
        }

        match response.bytes().await {
            Ok(content) => Ok(Some(AudioPayload::new(content))),
            Err(why) => {
                warn!(status = status.as_u16(), "Invalid response received: {why}");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::model::{SpeechRate, VoiceSelection};

    fn request(text: &str, rate: f32) -> SynthesisRequest {
        SynthesisRequest::new(
            text,
            SpeechRate::new(rate),
            "fake-file.ogg",
            "fake-folder-id",
            "fake-iam-token",
        )
        .with_voice(VoiceSelection::new("filipp", "alyona"))
        .with_lang("ru-RU")
    }

    #[tokio::test]
    async fn test_fetch_audio_ok() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/speech/v1/tts:synthesize"))
            .and(header("authorization", "Bearer fake-iam-token"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("text=hello"))
            .and(body_string_contains("lang=ru-RU"))
            .and(body_string_contains("voice=filipp"))
            .and(body_string_contains("folderId=fake-folder-id"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio_chunk".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let api = SpeechKit::new(format!("{}/speech/v1/tts:synthesize", server.uri()));
        let payload = api.fetch_audio(&request("hello", 1.0)).await.unwrap();

        assert_eq!(payload.unwrap().content.as_ref(), b"audio_chunk");
    }

    #[tokio::test]
    async fn test_fetch_audio_sends_speed() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("speed=1.5"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"audio_chunk".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let api = SpeechKit::new(server.uri());
        let payload = api.fetch_audio(&request("hello", 1.5)).await.unwrap();

        assert!(payload.is_some());
    }

    #[tokio::test]
    async fn test_fetch_audio_bad_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_bytes(b"audio_chunk".to_vec()))
            .expect(1)
            .mount(&server)
            .await;

        let api = SpeechKit::new(server.uri());
        let err = api.fetch_audio(&request("привет", 1.0)).await.unwrap_err();

        assert!(matches!(
            err,
            Error::RequestFailed { status } if status == StatusCode::BAD_REQUEST
        ));
    }

    #[tokio::test]
    async fn test_fetch_audio_non_200_success_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let api = SpeechKit::new(server.uri());
        let err = api.fetch_audio(&request("hello", 1.0)).await.unwrap_err();

        assert!(matches!(
            err,
            Error::RequestFailed { status } if status == StatusCode::NO_CONTENT
        ));
    }

    #[tokio::test]
    async fn test_fetch_audio_truncated_body_is_swallowed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            read_request(&mut socket).await;

            socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 100\r\n\r\naudio")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let api = SpeechKit::new(format!("http://{addr}/"));
        let payload = api.fetch_audio(&request("hello", 1.0)).await.unwrap();

        assert!(payload.is_none());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_audio_connect_error_is_raised() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = SpeechKit::new(format!("http://{addr}/"));
        let err = api.fetch_audio(&request("hello", 1.0)).await.unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];

        let head_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending headers");
            buf.extend_from_slice(&chunk[..n]);

            if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
        let body_len: usize = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .map_or(0, |v| v.trim().parse().unwrap());

        while buf.len() < head_end + body_len {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "client closed before sending body");
            buf.extend_from_slice(&chunk[..n]);
        }
    }
}
