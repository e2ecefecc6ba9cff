//! Calculated withholding records.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RecordId, Timestamp};
use crate::domain::invoice::{DocumentKind, InvoiceFacts};
use crate::domain::withholding::WithholdingAssessment;

/// One supplier invoice together with its computed withholdings.
///
/// Identity (`id` and `created_at`) is assigned once at creation and kept
/// by every later revision: [`CalculatedRecord::replaced`] swaps the
/// content under the same identity, which is how live recalculation works
/// without any change tracking. History stores clones, so revisions never
/// reach back into committed entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculatedRecord {
    id: RecordId,
    created_at: Timestamp,
    razao_social: String,
    cnpj: String,
    numero_nf: String,
    optante_simples: bool,
    is_mei: bool,
    local_servico: String,
    documento_tipo: DocumentKind,
    codigo_reinf: String,
    assessment: WithholdingAssessment,
}

impl CalculatedRecord {
    /// Creates a record with a fresh identity.
    pub fn create(facts: &InvoiceFacts, assessment: WithholdingAssessment) -> Self {
        Self {
            id: RecordId::new(),
            created_at: Timestamp::now(),
            razao_social: facts.razao_social.clone(),
            cnpj: facts.cnpj.clone(),
            numero_nf: facts.numero_nf.clone(),
            optante_simples: facts.optante_simples,
            is_mei: facts.is_mei,
            local_servico: facts.local_servico.clone(),
            documento_tipo: facts.documento_tipo,
            codigo_reinf: facts.codigo_reinf.clone(),
            assessment,
        }
    }

    /// Produces the replacement revision of this record: same identity,
    /// new content.
    pub fn replaced(&self, facts: &InvoiceFacts, assessment: WithholdingAssessment) -> Self {
        Self {
            id: self.id,
            created_at: self.created_at,
            razao_social: facts.razao_social.clone(),
            cnpj: facts.cnpj.clone(),
            numero_nf: facts.numero_nf.clone(),
            optante_simples: facts.optante_simples,
            is_mei: facts.is_mei,
            local_servico: facts.local_servico.clone(),
            documento_tipo: facts.documento_tipo,
            codigo_reinf: facts.codigo_reinf.clone(),
            assessment,
        }
    }

    /// Flattens the nested line rates and values back into the flat input
    /// shape, ready for a single-field edit and recomputation.
    ///
    /// The jurisdiction comes from the assessment (it may have been forced
    /// to the home municipality), and the INSS inputs come back out of the
    /// INSS line, so recomputing unedited facts reproduces this record's
    /// assessment exactly.
    pub fn to_facts(&self) -> InvoiceFacts {
        InvoiceFacts {
            razao_social: self.razao_social.clone(),
            cnpj: self.cnpj.clone(),
            numero_nf: self.numero_nf.clone(),
            valor_bruto: self.assessment.valor_bruto,
            optante_simples: self.optante_simples,
            is_mei: self.is_mei,
            documento_tipo: self.documento_tipo,
            local_servico: self.local_servico.clone(),
            municipio_incidencia: self.assessment.municipio_incidencia.clone(),
            codigo_reinf: self.codigo_reinf.clone(),
            aliquota_ir: self.assessment.irrf.rate,
            aliquota_iss: self.assessment.iss.rate,
            base_calculo_inss: self.assessment.inss.base,
            aliquota_inss: self.assessment.inss.rate,
            valor_inss: self.assessment.inss.value,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn razao_social(&self) -> &str {
        &self.razao_social
    }

    pub fn cnpj(&self) -> &str {
        &self.cnpj
    }

    pub fn numero_nf(&self) -> &str {
        &self.numero_nf
    }

    pub fn optante_simples(&self) -> bool {
        self.optante_simples
    }

    pub fn is_mei(&self) -> bool {
        self.is_mei
    }

    pub fn local_servico(&self) -> &str {
        &self.local_servico
    }

    pub fn documento_tipo(&self) -> DocumentKind {
        self.documento_tipo
    }

    pub fn codigo_reinf(&self) -> &str {
        &self.codigo_reinf
    }

    pub fn assessment(&self) -> &WithholdingAssessment {
        &self.assessment
    }

    pub fn valor_bruto(&self) -> Decimal {
        self.assessment.valor_bruto
    }

    pub fn valor_liquido(&self) -> Decimal {
        self.assessment.valor_liquido
    }

    pub fn municipio_incidencia(&self) -> &str {
        &self.assessment.municipio_incidencia
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::withholding::WithholdingEngine;
    use rust_decimal_macros::dec;

    use crate::domain::foundation::Rate;

    fn facts() -> InvoiceFacts {
        InvoiceFacts {
            razao_social: "Serviços Beta ME".to_string(),
            cnpj: "98.765.432/0001-10".to_string(),
            numero_nf: "77".to_string(),
            valor_bruto: dec!(1500.00),
            optante_simples: false,
            is_mei: false,
            documento_tipo: DocumentKind::Servico,
            local_servico: "Senador Canedo".to_string(),
            municipio_incidencia: "Senador Canedo".to_string(),
            codigo_reinf: "17032".to_string(),
            aliquota_ir: Rate::new(dec!(1.5)),
            aliquota_iss: Rate::new(dec!(3.29)),
            base_calculo_inss: dec!(1000.00),
            aliquota_inss: Rate::new(dec!(11)),
            valor_inss: dec!(0),
        }
    }

    fn record() -> CalculatedRecord {
        let facts = facts();
        let assessment = WithholdingEngine::new("Senador Canedo", false).compute(&facts);
        CalculatedRecord::create(&facts, assessment)
    }

    #[test]
    fn create_assigns_a_fresh_identity() {
        let first = record();
        let second = record();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn replaced_preserves_identity_and_swaps_content() {
        let original = record();
        let mut edited = original.to_facts();
        edited.optante_simples = true;

        let assessment = WithholdingEngine::new("Senador Canedo", false).compute(&edited);
        let revised = original.replaced(&edited, assessment);

        assert_eq!(revised.id(), original.id());
        assert_eq!(revised.created_at(), original.created_at());
        assert!(revised.optante_simples());
        assert_eq!(revised.assessment().irrf.value, dec!(0));
    }

    #[test]
    fn to_facts_flattens_line_rates_and_inss_inputs() {
        let record = record();
        let flattened = record.to_facts();

        assert_eq!(flattened.aliquota_ir.value(), dec!(1.5));
        assert_eq!(flattened.aliquota_iss.value(), dec!(3.29));
        assert_eq!(flattened.base_calculo_inss, dec!(1000.00));
        assert_eq!(flattened.aliquota_inss.value(), dec!(11));
        assert_eq!(flattened.valor_inss, record.assessment().inss.value);
        assert_eq!(flattened.municipio_incidencia, "Senador Canedo");
    }

    #[test]
    fn recomputing_unedited_facts_reproduces_the_assessment() {
        let engine = WithholdingEngine::new("Senador Canedo", false);
        let record = record();
        let recomputed = engine.compute(&record.to_facts());
        assert_eq!(&recomputed, record.assessment());
    }

    #[test]
    fn record_roundtrips_through_json() {
        let record = record();
        let json = serde_json::to_string(&record).unwrap();
        let back: CalculatedRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
