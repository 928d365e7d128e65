use serde::Serialize;

use crate::model::SynthesisRequest;

#[derive(Debug, Clone, Serialize)]
pub struct SynthesisForm<'a> {
    pub text: &'a str,
    pub lang: &'a str,
    pub voice: &'a str,
    #[serde(rename = "folderId")]
    pub folder_id: &'a str,
    pub speed: f32,
}

impl<'a> From<&'a SynthesisRequest> for SynthesisForm<'a> {
    fn from(request: &'a SynthesisRequest) -> Self {
        SynthesisForm {
            text: &request.text,
            lang: &request.lang,
            voice: request.voice.primary(),
            folder_id: &request.folder_id,
            speed: request.rate.rate(),
        }
    }
}
