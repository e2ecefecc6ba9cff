//! Invoice facts - the validated input to the withholding engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::Rate;

/// Classification of the source fiscal document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentKind {
    /// Service invoice (NFS-e).
    Servico,
    /// Sale of goods (DANFE).
    Produto,
    /// Could not be classified.
    #[default]
    Indefinido,
}

impl DocumentKind {
    /// Parses the extractor's free-text classification.
    ///
    /// Anything that is not recognizably a sale or a service maps to
    /// `Indefinido`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            "PRODUTO" => DocumentKind::Produto,
            "SERVICO" | "SERVIÇO" => DocumentKind::Servico,
            _ => DocumentKind::Indefinido,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentKind::Servico => "SERVICO",
            DocumentKind::Produto => "PRODUTO",
            DocumentKind::Indefinido => "INDEFINIDO",
        };
        write!(f, "{}", s)
    }
}

/// Validated, immutable snapshot of everything the withholding engine
/// needs to know about one supplier invoice.
///
/// A facts value always satisfies `valor_bruto >= 0`; the conversion from
/// raw extracted data rejects a missing, non-numeric or negative gross
/// amount before the engine ever runs. Edits never mutate a facts value -
/// they copy it with exactly one field changed and recompute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceFacts {
    pub razao_social: String,
    pub cnpj: String,
    pub numero_nf: String,
    pub valor_bruto: Decimal,
    pub optante_simples: bool,
    pub is_mei: bool,
    pub documento_tipo: DocumentKind,
    pub local_servico: String,
    pub municipio_incidencia: String,
    pub codigo_reinf: String,
    pub aliquota_ir: Rate,
    pub aliquota_iss: Rate,
    pub base_calculo_inss: Decimal,
    pub aliquota_inss: Rate,
    pub valor_inss: Decimal,
}

impl InvoiceFacts {
    /// True when the supplier's regime statutorily exempts federal
    /// withholding (Simples Nacional or MEI).
    pub fn is_exempt(&self) -> bool {
        self.is_mei || self.optante_simples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_produto_classification() {
        assert_eq!(DocumentKind::parse("PRODUTO"), DocumentKind::Produto);
        assert_eq!(DocumentKind::parse("  produto "), DocumentKind::Produto);
    }

    #[test]
    fn parses_servico_with_and_without_cedilla() {
        assert_eq!(DocumentKind::parse("SERVICO"), DocumentKind::Servico);
        assert_eq!(DocumentKind::parse("Serviço"), DocumentKind::Servico);
    }

    #[test]
    fn unknown_classification_is_indefinido() {
        assert_eq!(DocumentKind::parse(""), DocumentKind::Indefinido);
        assert_eq!(DocumentKind::parse("RECIBO"), DocumentKind::Indefinido);
    }

    #[test]
    fn document_kind_serializes_uppercase() {
        let json = serde_json::to_string(&DocumentKind::Produto).unwrap();
        assert_eq!(json, "\"PRODUTO\"");
    }
}
