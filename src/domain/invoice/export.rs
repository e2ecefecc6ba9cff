//! Structured export projection of a calculated record.
//!
//! Downstream consumers (spreadsheet integrations, the print view) depend
//! on this exact shape; fields are only ever added, never renamed or
//! removed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::invoice::{CalculatedRecord, DocumentKind};
use crate::domain::withholding::{InssWithholding, WithholdingLine};

/// One exported withholding line: rate, value, optional observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    pub aliquota: Decimal,
    pub valor: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacao: Option<String>,
}

impl From<&WithholdingLine> for StatementLine {
    fn from(line: &WithholdingLine) -> Self {
        Self {
            aliquota: line.rate.value(),
            valor: line.value,
            observacao: line.observation.clone(),
        }
    }
}

impl From<&InssWithholding> for StatementLine {
    fn from(line: &InssWithholding) -> Self {
        Self {
            aliquota: line.rate.value(),
            valor: line.value,
            observacao: line.observation.clone(),
        }
    }
}

/// Grouping of the per-tax lines inside the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retencoes {
    pub irrf: StatementLine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf: Option<StatementLine>,
    pub iss: StatementLine,
    pub inss: StatementLine,
}

/// Field-stable data projection of a [`CalculatedRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithholdingStatement {
    pub razao_social: String,
    pub cnpj: String,
    pub numero_nf: String,
    pub documento_tipo: DocumentKind,
    pub codigo_reinf: String,
    pub optante_simples: bool,
    pub is_mei: bool,
    pub local_servico: String,
    pub municipio_incidencia: String,
    pub valor_bruto: Decimal,
    pub retencoes: Retencoes,
    pub valor_liquido: Decimal,
}

impl WithholdingStatement {
    /// Projects a record into the export shape.
    pub fn from_record(record: &CalculatedRecord) -> Self {
        let assessment = record.assessment();
        Self {
            razao_social: record.razao_social().to_string(),
            cnpj: record.cnpj().to_string(),
            numero_nf: record.numero_nf().to_string(),
            documento_tipo: record.documento_tipo(),
            codigo_reinf: record.codigo_reinf().to_string(),
            optante_simples: record.optante_simples(),
            is_mei: record.is_mei(),
            local_servico: record.local_servico().to_string(),
            municipio_incidencia: assessment.municipio_incidencia.clone(),
            valor_bruto: assessment.valor_bruto,
            retencoes: Retencoes {
                irrf: StatementLine::from(&assessment.irrf),
                csrf: assessment.csrf.as_ref().map(StatementLine::from),
                iss: StatementLine::from(&assessment.iss),
                inss: StatementLine::from(&assessment.inss),
            },
            valor_liquido: assessment.valor_liquido,
        }
    }
}
