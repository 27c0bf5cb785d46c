//! Stability AI text-to-image provider.
//!
//! Posts a JSON generation request, decodes the first base64 PNG artifact
//! in the response, and writes it to a kept temp file with a `.png`
//! suffix. Deleting that file is the caller's job (the artifact registry).

use std::io::Write;
use std::path::PathBuf;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};

use chefbot_core::image::provider::ImageProvider;
use chefbot_observe::genai_attrs;
use chefbot_types::config::ImageSettings;
use chefbot_types::image::{GeneratedImage, ImageError, ImageRequest};

const CREDENTIAL_NAME: &str = "STABILITY_KEY";

#[derive(Debug, Serialize)]
struct TextPrompt<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationBody<'a> {
    text_prompts: Vec<TextPrompt<'a>>,
    cfg_scale: f32,
    steps: u32,
    width: u32,
    height: u32,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    #[serde(default)]
    artifacts: Vec<Artifact>,
}

#[derive(Debug, Deserialize)]
struct Artifact {
    base64: String,
}

/// Image provider backed by the Stability AI REST API.
///
/// Does not derive Debug: holds the API key.
pub struct StabilityImageProvider {
    http: reqwest::Client,
    api_key: Option<SecretString>,
    settings: ImageSettings,
    output_dir: Option<PathBuf>,
}

impl StabilityImageProvider {
    /// `api_key = None` is allowed: every request then fails with
    /// [`ImageError::MissingCredential`] instead of panicking at startup.
    pub fn new(api_key: Option<SecretString>, settings: ImageSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            settings,
            output_dir: None,
        }
    }

    /// Write images into `dir` instead of the system temp directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    fn body<'a>(&self, prompt: &'a str) -> GenerationBody<'a> {
        GenerationBody {
            text_prompts: vec![TextPrompt { text: prompt }],
            cfg_scale: self.settings.cfg_scale,
            steps: self.settings.steps,
            width: self.settings.width,
            height: self.settings.height,
        }
    }

    async fn request_png(&self, api_key: &SecretString, prompt: &str) -> Result<Vec<u8>, ImageError> {
        let response = self
            .http
            .post(&self.settings.api_url)
            .bearer_auth(api_key.expose_secret())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&self.body(prompt))
            .send()
            .await
            .map_err(|e| ImageError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ImageError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ImageError::Request(e.to_string()))?;
        decode_first_artifact(&bytes)
    }

    fn persist(&self, png: &[u8]) -> Result<PathBuf, ImageError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("chefbot-").suffix(".png");
        let file = match &self.output_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(|e| ImageError::Storage(e.to_string()))?;

        let (mut file, path) = file
            .keep()
            .map_err(|e| ImageError::Storage(e.to_string()))?;
        if let Err(e) = file.write_all(png).and_then(|()| file.flush()) {
            let _ = std::fs::remove_file(&path);
            return Err(ImageError::Storage(e.to_string()));
        }
        Ok(path)
    }
}

/// Decode the first artifact of a generation response into PNG bytes.
fn decode_first_artifact(body: &[u8]) -> Result<Vec<u8>, ImageError> {
    let parsed: GenerationResponse =
        serde_json::from_slice(body).map_err(|e| ImageError::Decode(e.to_string()))?;
    let artifact = parsed
        .artifacts
        .into_iter()
        .next()
        .ok_or(ImageError::EmptyResponse)?;
    STANDARD
        .decode(artifact.base64.as_bytes())
        .map_err(|e| ImageError::Decode(e.to_string()))
}

impl ImageProvider for StabilityImageProvider {
    fn name(&self) -> &str {
        genai_attrs::PROVIDER_STABILITY
    }

    async fn generate(&self, request: &ImageRequest) -> Result<GeneratedImage, ImageError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| ImageError::MissingCredential(CREDENTIAL_NAME.to_string()))?;
        let prompt = self.settings.render_prompt(&request.prompt);

        let span = info_span!(
            "gen_ai.generate_image",
            gen_ai.operation.name = genai_attrs::OP_GENERATE_IMAGE,
            gen_ai.provider.name = genai_attrs::PROVIDER_STABILITY,
            steps = self.settings.steps,
            width = self.settings.width,
            height = self.settings.height,
        );

        async {
            let png = self.request_png(api_key, &prompt).await?;
            let path = self.persist(&png)?;
            debug!(path = %path.display(), bytes = png.len(), "image written");
            Ok(GeneratedImage { path })
        }
        .instrument(span)
        .await
    }
}
