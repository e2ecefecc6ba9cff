//! Gemini Extractor - InvoiceExtractor backed by the Gemini vision API.
//!
//! Sends the encoded fiscal document together with a fixed Portuguese
//! extraction prompt and asks for a JSON answer, then parses that answer
//! into [`ExtractedFacts`] with the standard per-field fallbacks.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-3-flash-preview")
//!     .with_timeout(Duration::from_secs(45));
//!
//! let extractor = GeminiExtractor::new(config);
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{
    DocumentPayload, ExtractedFacts, ExtractionError, ExtractorInfo, InvoiceExtractor,
};

/// Prompt instructing the model which fields to extract from the
/// document image. The answer must be a single JSON object.
const EXTRACTION_PROMPT: &str = "\
Você é um assistente especialista em automação de contabilidade, analisando \
documentos fiscais brasileiros. Sua tarefa é extrair informações específicas \
da imagem fornecida.

Analise a imagem e extraia os seguintes campos:
1.  \"razaoSocial\": O nome completo da empresa (Fornecedor).
2.  \"cnpj\": O CNPJ do fornecedor. Formate-o como XX.XXX.XXX/XXXX-XX.
3.  \"numeroNF\": O número da nota fiscal.
4.  \"optanteSimples\": Verifique se a empresa é optante pelo Simples Nacional. Retorne \"SIM\" ou \"NÃO\".
5.  \"isMei\": Verifique se a empresa é MEI (Microempreendedor Individual). Retorne \"SIM\" ou \"NÃO\".
6.  \"localServico\": O local da prestação do serviço.
7.  \"municipioIncidencia\": O município onde o imposto (ISS) incide.
8.  \"valorBruto\": O valor bruto total do serviço. Extraia como um número, usando ponto como separador decimal (ex: 1234.56).
9.  \"aliquotaIR\": A alíquota de I.R. em porcentagem. Retorne apenas o número (ex: para 1,5%, retorne 1.5).
10. \"aliquotaISS\": A alíquota de ISS em porcentagem. Retorne apenas o número (ex: para 3,29%, retorne 3.29).
11. \"documentoTipo\": Classifique o documento. Se contiver termos como \"DANFE\", \"venda\", \"produto\" ou similar, retorne \"PRODUTO\". Se for uma nota fiscal de serviço, retorne \"SERVICO\". Se não for claro, retorne \"INDEFINIDO\".
12. \"codigoReinf\": O código do serviço (natureza do rendimento). Extraia apenas o número de 5 dígitos (ex: 17032). Se não encontrar, retorne \"\".
13. \"valorINSS\": O valor da retenção de INSS. Extraia como um número.
14. \"baseCalculoINSS\": A base de cálculo para o INSS. Extraia como um número.
15. \"aliquotaINSS\": A alíquota de INSS em porcentagem. Retorne apenas o número.

Se algum campo não for encontrado, retorne um valor padrão apropriado \
(string vazia \"\" ou 0 para números).

O resultado deve ser um único objeto JSON.";

/// Configuration for the Gemini extractor.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gemini-3-flash-preview".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            timeout: Duration::from_secs(60),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Exposes the API key (for making requests).
    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini-backed implementation of the extraction port.
pub struct GeminiExtractor {
    config: GeminiConfig,
    client: Client,
}

impl GeminiExtractor {
    /// Creates a new extractor with the given configuration.
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, self.config.model
        )
    }

    fn to_request(&self, document: &DocumentPayload) -> GeminiRequest {
        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![
                    GeminiPart::Text {
                        text: EXTRACTION_PROMPT.to_string(),
                    },
                    GeminiPart::Inline {
                        inline_data: InlineData {
                            mime_type: document.mime_type.clone(),
                            data: document.data.clone(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        }
    }
}

#[async_trait]
impl InvoiceExtractor for GeminiExtractor {
    async fn extract(
        &self,
        document: &DocumentPayload,
    ) -> Result<ExtractedFacts, ExtractionError> {
        tracing::debug!(label = %document.label, model = %self.config.model, "requesting extraction");

        let response = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&self.to_request(document))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ExtractionError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    ExtractionError::network(format!("Connection failed: {}", e))
                } else {
                    ExtractionError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_failure(status.as_u16(), &body));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| ExtractionError::parse(e.to_string()))?;

        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(ExtractionError::EmptyResponse)?;

        let facts: ExtractedFacts = serde_json::from_str(&text)
            .map_err(|e| ExtractionError::parse(format!("unexpected answer shape: {}", e)))?;

        Ok(facts.with_fallbacks())
    }

    fn extractor_info(&self) -> ExtractorInfo {
        ExtractorInfo::new("gemini", &self.config.model)
    }
}

/// Maps a non-success HTTP status (plus the error body) onto the port's
/// error taxonomy. Key rejections hide behind both 400 and 403 answers,
/// so the body is sniffed for the canonical wording.
fn classify_failure(status: u16, body: &str) -> ExtractionError {
    if body.contains("API key not valid") || body.contains("API_KEY_INVALID") {
        return ExtractionError::AuthenticationFailed;
    }

    match status {
        401 => ExtractionError::AuthenticationFailed,
        403 => ExtractionError::PermissionDenied,
        429 => ExtractionError::unavailable("rate limited by the extraction service"),
        500..=599 => ExtractionError::unavailable(format!("service error (HTTP {})", status)),
        _ => ExtractionError::unavailable(format!("unexpected HTTP {}: {}", status, body)),
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}
