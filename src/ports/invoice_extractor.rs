//! Invoice Extractor Port - interface for the document-to-facts service.
//!
//! The extraction collaborator receives an opaque encoded document and
//! returns a partially-populated, loosely-typed set of invoice facts.
//! Adapters translate between the concrete service (an LLM vision API in
//! production, a scripted mock in tests) and this contract.
//!
//! Extracted values are deliberately raw: numbers may arrive as JSON
//! numbers or as text, regime flags arrive as "SIM"/"NÃO" strings, and
//! any field may be missing. [`ExtractedFacts::to_invoice_facts`] is the
//! single place where that rawness is validated into domain facts.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Rate, ValidationError};
use crate::domain::invoice::{DocumentKind, InvoiceFacts};

/// Port for the asynchronous extraction collaborator.
#[async_trait]
pub trait InvoiceExtractor: Send + Sync {
    /// Extracts raw invoice facts from one encoded document.
    async fn extract(&self, document: &DocumentPayload)
        -> Result<ExtractedFacts, ExtractionError>;

    /// Identifies the backing extraction service.
    fn extractor_info(&self) -> ExtractorInfo;
}

/// An opaque encoded source document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPayload {
    /// Display name used to identify the document in errors and progress.
    pub label: String,
    /// MIME type of the encoded content.
    pub mime_type: String,
    /// Base64-encoded document bytes.
    pub data: String,
}

impl DocumentPayload {
    /// Creates a payload from already-separated parts.
    pub fn new(
        label: impl Into<String>,
        mime_type: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Creates a payload from a `data:` URL as produced by browser file
    /// readers (`data:<mime>;base64,<payload>`).
    pub fn from_data_url(label: impl Into<String>, url: &str) -> Result<Self, ExtractionError> {
        let (header, data) = url
            .split_once(";base64,")
            .ok_or_else(|| ExtractionError::invalid_payload("not a base64 data URL"))?;
        let mime_type = header
            .strip_prefix("data:")
            .filter(|m| !m.is_empty())
            .ok_or_else(|| ExtractionError::invalid_payload("data URL missing MIME type"))?;

        Ok(Self::new(label, mime_type, data))
    }
}

/// Information about the extraction service behind the port.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorInfo {
    /// Service name (e.g. "gemini", "mock").
    pub name: String,
    /// Model or backend identifier.
    pub model: String,
}

impl ExtractorInfo {
    /// Creates new extractor info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// A numeric field as the extraction service returned it: either an
/// actual JSON number or free text that may or may not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Numeric(Decimal),
    Text(String),
}

impl RawNumber {
    /// The parsed decimal value, if there is one.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            RawNumber::Numeric(value) => Some(*value),
            RawNumber::Text(raw) => raw.trim().parse().ok(),
        }
    }

    /// The raw representation, for error messages.
    pub fn raw_text(&self) -> String {
        match self {
            RawNumber::Numeric(value) => value.to_string(),
            RawNumber::Text(raw) => raw.clone(),
        }
    }
}

/// Default REINF classification code ("Demais serviços") applied when the
/// document carries none.
pub const DEFAULT_REINF_CODE: &str = "17099";

/// Raw, partially-populated invoice facts as returned by the extraction
/// collaborator. Field names match the service's JSON contract.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExtractedFacts {
    pub razao_social: String,
    pub cnpj: String,
    #[serde(rename = "numeroNF")]
    pub numero_nf: String,
    pub valor_bruto: Option<RawNumber>,
    /// "SIM" / "NÃO" / free text.
    pub optante_simples: String,
    /// "SIM" / "NÃO" / free text.
    pub is_mei: String,
    pub local_servico: String,
    pub municipio_incidencia: String,
    pub documento_tipo: String,
    pub codigo_reinf: String,
    #[serde(rename = "aliquotaIR")]
    pub aliquota_ir: Option<RawNumber>,
    #[serde(rename = "aliquotaISS")]
    pub aliquota_iss: Option<RawNumber>,
    #[serde(rename = "valorINSS")]
    pub valor_inss: Option<RawNumber>,
    #[serde(rename = "baseCalculoINSS")]
    pub base_calculo_inss: Option<RawNumber>,
    #[serde(rename = "aliquotaINSS")]
    pub aliquota_inss: Option<RawNumber>,
}

impl ExtractedFacts {
    /// Applies the per-field fallback defaults for anything the service
    /// left empty, so downstream display always has something to show.
    pub fn with_fallbacks(mut self) -> Self {
        fn fallback(value: &mut String, default: &str) {
            if value.trim().is_empty() {
                *value = default.to_string();
            }
        }

        fallback(&mut self.numero_nf, "Não encontrado");
        fallback(&mut self.optante_simples, "Não informado");
        fallback(&mut self.is_mei, "Não informado");
        fallback(&mut self.local_servico, "Não encontrado");
        fallback(&mut self.municipio_incidencia, "Não encontrado");
        fallback(&mut self.documento_tipo, "INDEFINIDO");
        fallback(&mut self.codigo_reinf, DEFAULT_REINF_CODE);
        self
    }

    /// Validates the raw facts into domain [`InvoiceFacts`].
    ///
    /// Rejects a missing, non-numeric or negative gross amount - the only
    /// error the pipeline recognizes before the engine runs. Every other
    /// field degrades gracefully: unparseable rates become zero, unknown
    /// regime answers mean "not in the regime", and an absent
    /// classification code falls back to `default_reinf`.
    pub fn to_invoice_facts(&self, default_reinf: &str) -> Result<InvoiceFacts, ValidationError> {
        let valor_bruto = match &self.valor_bruto {
            None => return Err(ValidationError::missing_field("valorBruto")),
            Some(raw) => raw
                .to_decimal()
                .ok_or_else(|| ValidationError::not_a_number("valorBruto", raw.raw_text()))?,
        };
        if valor_bruto < Decimal::ZERO {
            return Err(ValidationError::negative_amount(
                "valorBruto",
                valor_bruto.to_string(),
            ));
        }

        let codigo_reinf = if self.codigo_reinf.trim().is_empty() {
            default_reinf.to_string()
        } else {
            self.codigo_reinf.trim().to_string()
        };

        Ok(InvoiceFacts {
            razao_social: self.razao_social.clone(),
            cnpj: self.cnpj.clone(),
            numero_nf: self.numero_nf.clone(),
            valor_bruto,
            optante_simples: is_sim(&self.optante_simples),
            is_mei: is_sim(&self.is_mei),
            documento_tipo: DocumentKind::parse(&self.documento_tipo),
            local_servico: self.local_servico.clone(),
            municipio_incidencia: self.municipio_incidencia.clone(),
            codigo_reinf,
            aliquota_ir: rate_or_zero(&self.aliquota_ir),
            aliquota_iss: rate_or_zero(&self.aliquota_iss),
            base_calculo_inss: amount_or_zero(&self.base_calculo_inss),
            aliquota_inss: rate_or_zero(&self.aliquota_inss),
            valor_inss: amount_or_zero(&self.valor_inss),
        })
    }
}

fn is_sim(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("sim")
}

fn rate_or_zero(raw: &Option<RawNumber>) -> Rate {
    raw.as_ref()
        .and_then(RawNumber::to_decimal)
        .map(Rate::new)
        .unwrap_or(Rate::ZERO)
}

fn amount_or_zero(raw: &Option<RawNumber>) -> Decimal {
    raw.as_ref()
        .and_then(RawNumber::to_decimal)
        .unwrap_or(Decimal::ZERO)
        .max(Decimal::ZERO)
}

/// Extraction collaborator errors.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// API key rejected; triggers the credential-reset flow upstream.
    #[error("authentication failed: the extraction API key was rejected")]
    AuthenticationFailed,

    /// The key is valid but lacks permission for the requested model.
    #[error("access denied by the extraction service")]
    PermissionDenied,

    /// Service is temporarily unavailable (overloaded, 5xx).
    #[error("extraction service unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Network failure while reaching the service.
    #[error("network error: {0}")]
    Network(String),

    /// The service answered with something that is not parseable facts.
    #[error("failed to parse extraction response: {0}")]
    Parse(String),

    /// The submitted document payload is malformed.
    #[error("invalid document payload: {0}")]
    InvalidPayload(String),

    /// The request exceeded the adapter's configured timeout.
    #[error("extraction timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },

    /// The service returned no content at all.
    #[error("the extraction service returned an empty response")]
    EmptyResponse,
}

impl ExtractionError {
    /// Creates an unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// True for the credential failure that the (out-of-scope) key-reset
    /// flow reacts to.
    pub fn is_authentication(&self) -> bool {
        matches!(self, ExtractionError::AuthenticationFailed)
    }

    /// True when retrying the same document could succeed. The batch
    /// pipeline never retries; callers may.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExtractionError::Unavailable { .. }
                | ExtractionError::Network(_)
                | ExtractionError::Timeout { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn data_url_splits_into_mime_and_payload() {
        let payload =
            DocumentPayload::from_data_url("nota.png", "data:image/png;base64,aGVsbG8=").unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, "aGVsbG8=");
        assert_eq!(payload.label, "nota.png");
    }

    #[test]
    fn malformed_data_url_is_rejected() {
        assert!(DocumentPayload::from_data_url("x", "plain text").is_err());
        assert!(DocumentPayload::from_data_url("x", ";base64,aGVsbG8=").is_err());
    }

    #[test]
    fn raw_number_parses_numbers_and_text() {
        assert_eq!(
            RawNumber::Numeric(dec!(1234.56)).to_decimal(),
            Some(dec!(1234.56))
        );
        assert_eq!(
            RawNumber::Text(" 1234.56 ".to_string()).to_decimal(),
            Some(dec!(1234.56))
        );
        assert_eq!(RawNumber::Text("abc".to_string()).to_decimal(), None);
    }

    #[test]
    fn fallbacks_fill_empty_fields_only() {
        let facts = ExtractedFacts {
            numero_nf: "123".to_string(),
            ..ExtractedFacts::default()
        }
        .with_fallbacks();

        assert_eq!(facts.numero_nf, "123");
        assert_eq!(facts.optante_simples, "Não informado");
        assert_eq!(facts.municipio_incidencia, "Não encontrado");
        assert_eq!(facts.documento_tipo, "INDEFINIDO");
        assert_eq!(facts.codigo_reinf, DEFAULT_REINF_CODE);
    }

    #[test]
    fn missing_gross_amount_is_invalid_input() {
        let err = ExtractedFacts::default()
            .to_invoice_facts(DEFAULT_REINF_CODE)
            .unwrap_err();
        assert_eq!(err, ValidationError::missing_field("valorBruto"));
    }

    #[test]
    fn non_numeric_gross_amount_is_invalid_input() {
        let facts = ExtractedFacts {
            valor_bruto: Some(RawNumber::Text("mil reais".to_string())),
            ..ExtractedFacts::default()
        };
        let err = facts.to_invoice_facts(DEFAULT_REINF_CODE).unwrap_err();
        assert!(matches!(err, ValidationError::NotANumber { .. }));
    }

    #[test]
    fn negative_gross_amount_is_invalid_input() {
        let facts = ExtractedFacts {
            valor_bruto: Some(RawNumber::Numeric(dec!(-1.00))),
            ..ExtractedFacts::default()
        };
        let err = facts.to_invoice_facts(DEFAULT_REINF_CODE).unwrap_err();
        assert!(matches!(err, ValidationError::NegativeAmount { .. }));
    }

    #[test]
    fn regime_flags_parse_sim_case_insensitively() {
        let facts = ExtractedFacts {
            valor_bruto: Some(RawNumber::Numeric(dec!(100))),
            optante_simples: "sim".to_string(),
            is_mei: "NÃO".to_string(),
            ..ExtractedFacts::default()
        };
        let converted = facts.to_invoice_facts(DEFAULT_REINF_CODE).unwrap();
        assert!(converted.optante_simples);
        assert!(!converted.is_mei);
    }

    #[test]
    fn unparseable_rates_become_zero() {
        let facts = ExtractedFacts {
            valor_bruto: Some(RawNumber::Numeric(dec!(100))),
            aliquota_ir: Some(RawNumber::Text("isento".to_string())),
            aliquota_iss: None,
            ..ExtractedFacts::default()
        };
        let converted = facts.to_invoice_facts(DEFAULT_REINF_CODE).unwrap();
        assert!(converted.aliquota_ir.is_zero());
        assert!(converted.aliquota_iss.is_zero());
    }

    #[test]
    fn empty_reinf_code_falls_back_to_default() {
        let facts = ExtractedFacts {
            valor_bruto: Some(RawNumber::Numeric(dec!(100))),
            ..ExtractedFacts::default()
        };
        let converted = facts.to_invoice_facts(DEFAULT_REINF_CODE).unwrap();
        assert_eq!(converted.codigo_reinf, "17099");
    }

    #[test]
    fn extracted_facts_deserialize_from_service_json() {
        let json = r#"{
            "razaoSocial": "Fornecedora Ltda",
            "cnpj": "12.345.678/0001-90",
            "numeroNF": "42",
            "valorBruto": 1234.56,
            "optanteSimples": "NÃO",
            "isMei": "NÃO",
            "localServico": "Senador Canedo",
            "municipioIncidencia": "Senador Canedo",
            "documentoTipo": "SERVICO",
            "codigoReinf": "17032",
            "aliquotaIR": "1.5",
            "aliquotaISS": 3.29,
            "valorINSS": 0,
            "baseCalculoINSS": 0,
            "aliquotaINSS": 0
        }"#;

        let facts: ExtractedFacts = serde_json::from_str(json).unwrap();
        assert_eq!(facts.razao_social, "Fornecedora Ltda");
        assert_eq!(
            facts.valor_bruto.as_ref().unwrap().to_decimal(),
            Some(dec!(1234.56))
        );
        assert_eq!(
            facts.aliquota_ir.as_ref().unwrap().to_decimal(),
            Some(dec!(1.5))
        );
        assert_eq!(
            facts.aliquota_iss.as_ref().unwrap().to_decimal(),
            Some(dec!(3.29))
        );
    }

    #[test]
    fn authentication_classification() {
        assert!(ExtractionError::AuthenticationFailed.is_authentication());
        assert!(!ExtractionError::PermissionDenied.is_authentication());
        assert!(!ExtractionError::EmptyResponse.is_authentication());
    }

    #[test]
    fn retryable_classification() {
        assert!(ExtractionError::unavailable("overloaded").is_retryable());
        assert!(ExtractionError::network("reset").is_retryable());
        assert!(ExtractionError::Timeout { timeout_secs: 30 }.is_retryable());

        assert!(!ExtractionError::AuthenticationFailed.is_retryable());
        assert!(!ExtractionError::parse("bad json").is_retryable());
        assert!(!ExtractionError::invalid_payload("no mime").is_retryable());
    }
}
