//! Async client over `gloo-net`

use crate::{ApiConfig, ApiError, Endpoint, decode};
use gloo_net::http::{Request, RequestBuilder, Response};
use krishi_core::{
    ChatHistory, ChatId, CompleteAnalysisRequest, CreateChatRequest, CreateChatResponse,
    DeleteChatResponse, DistrictPayload, ImageReply, Language, NearestDistrict, SoilAnalysis,
    TextReply, TextRequest, VoiceReply,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsValue;
use web_sys::{Blob, FormData};

// ============================================================================
// CLIENT
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct ApiClient {
    config: ApiConfig,
}

impl ApiClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ApiConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn get(&self, endpoint: &Endpoint) -> RequestBuilder {
        self.cache_headers(Request::get(&self.config.url(endpoint)))
    }

    fn post(&self, endpoint: &Endpoint) -> RequestBuilder {
        self.cache_headers(Request::post(&self.config.url(endpoint)))
    }

    fn cache_headers(&self, builder: RequestBuilder) -> RequestBuilder {
        if self.config.no_cache {
            builder.header("Cache-Control", "no-cache")
        } else {
            builder
        }
    }

    // ------------------------------------------------------------------------
    // Mandi
    // ------------------------------------------------------------------------

    pub async fn nearest_districts(&self) -> Result<Vec<NearestDistrict>, ApiError> {
        let response = self.get(&Endpoint::NearestDistricts).send().await?;
        read(response).await
    }

    /// `filters` are `(name, value)` pairs; empty values are sent as-is
    pub async fn district_data<'a>(
        &self,
        filters: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<DistrictPayload, ApiError> {
        let response = self
            .get(&Endpoint::DistrictData)
            .query(filters)
            .send()
            .await?;
        read(response).await
    }

    // ------------------------------------------------------------------------
    // Chat
    // ------------------------------------------------------------------------

    /// New chat id; a success body without one is a server failure
    pub async fn create_chat(&self, language: Language) -> Result<ChatId, ApiError> {
        let response = self
            .post(&Endpoint::CreateChat)
            .json(&CreateChatRequest { language })?
            .send()
            .await?;
        let created: CreateChatResponse = read(response).await?;
        created
            .chat_id
            .ok_or_else(|| ApiError::Server("Failed to create new chat".into()))
    }

    pub async fn chat_history(&self) -> Result<ChatHistory, ApiError> {
        let response = self.get(&Endpoint::ChatHistory).send().await?;
        read(response).await
    }

    pub async fn delete_chat(&self, chat_id: &ChatId) -> Result<(), ApiError> {
        let response = self
            .post(&Endpoint::DeleteChat(chat_id.to_string()))
            .header("Content-Type", "application/json")
            .send()
            .await?;
        let deleted: DeleteChatResponse = read(response).await?;
        if deleted.success {
            Ok(())
        } else {
            Err(ApiError::Server(
                deleted.error.unwrap_or_else(|| "Failed to delete chat".into()),
            ))
        }
    }

    pub async fn process_text(&self, request: &TextRequest) -> Result<TextReply, ApiError> {
        let response = self
            .post(&Endpoint::ProcessText)
            .json(request)?
            .send()
            .await?;
        read(response).await
    }

    pub async fn process_voice(
        &self,
        audio: &Blob,
        language: Language,
        chat_id: &ChatId,
    ) -> Result<VoiceReply, ApiError> {
        let form = form()?;
        form.append_with_blob("audio", audio).map_err(js_error)?;
        form.append_with_str("language", language.as_str())
            .map_err(js_error)?;
        form.append_with_str("chat_id", chat_id.as_str())
            .map_err(js_error)?;

        tracing::debug!(size = audio.size(), "uploading voice message");
        let response = self.post(&Endpoint::ProcessVoice).body(form)?.send().await?;
        read(response).await
    }

    pub async fn process_image(
        &self,
        image: &Blob,
        file_name: &str,
        language: Language,
        need_audio: bool,
        chat_id: &ChatId,
    ) -> Result<ImageReply, ApiError> {
        let form = form()?;
        form.append_with_blob_and_filename("image", image, file_name)
            .map_err(js_error)?;
        form.append_with_str("language", language.as_str())
            .map_err(js_error)?;
        form.append_with_str("need_audio", if need_audio { "true" } else { "false" })
            .map_err(js_error)?;
        form.append_with_str("chat_id", chat_id.as_str())
            .map_err(js_error)?;

        let response = self.post(&Endpoint::ProcessImage).body(form)?.send().await?;
        read(response).await
    }

    // ------------------------------------------------------------------------
    // Soil report
    // ------------------------------------------------------------------------

    /// Upload a report; empty district/state let the server extract them
    pub async fn analyze_soil_report(
        &self,
        report: &Blob,
        file_name: &str,
        district: &str,
        state: &str,
        language: Language,
    ) -> Result<SoilAnalysis, ApiError> {
        let form = form()?;
        form.append_with_blob_and_filename("soil_report", report, file_name)
            .map_err(js_error)?;
        form.append_with_str("district", district).map_err(js_error)?;
        form.append_with_str("state", state).map_err(js_error)?;
        form.append_with_str("language", language.as_str())
            .map_err(js_error)?;

        tracing::info!(file_name, "uploading soil report");
        let response = self
            .post(&Endpoint::AnalyzeSoilReport)
            .body(form)?
            .send()
            .await?;
        read(response).await
    }

    pub async fn complete_soil_analysis(
        &self,
        request: &CompleteAnalysisRequest,
    ) -> Result<SoilAnalysis, ApiError> {
        let response = self
            .post(&Endpoint::CompleteSoilAnalysis)
            .json(request)?
            .send()
            .await?;
        read(response).await
    }
}

// ============================================================================
// HELPERS
// ============================================================================

async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let ok = response.ok();
    let body = response.text().await?;

    if !ok {
        let error = ApiError::from_status(status, &body);
        tracing::warn!(status, url = %response.url(), "request failed: {}", error);
        return Err(error);
    }

    decode(&body).inspect_err(|e| tracing::error!(url = %response.url(), "{}", e))
}

fn form() -> Result<FormData, ApiError> {
    FormData::new().map_err(js_error)
}

fn js_error(e: JsValue) -> ApiError {
    ApiError::Request(format!("{:?}", e))
}
