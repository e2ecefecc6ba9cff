//! RecalculateHandler - live recomputation after a single-field edit.
//!
//! The handler flattens the displayed record back into flat invoice
//! facts, applies exactly one change, re-runs the engine and returns the
//! replacement record under the same identity. Because it is synchronous,
//! edits are fully sequential: a new edit can only be applied to the
//! record the previous recomputation produced.

use rust_decimal::Decimal;

use crate::domain::foundation::Rate;
use crate::domain::invoice::{CalculatedRecord, InvoiceFacts};
use crate::domain::withholding::WithholdingEngine;

/// One operator edit to a displayed record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    /// Flip the Simples Nacional flag.
    ToggleOptanteSimples,
    /// Flip the MEI flag.
    ToggleMei,
    /// Replace the REINF classification code.
    SetCodigoReinf(String),
    /// Replace the income-tax rate.
    SetAliquotaIr(Rate),
    /// Replace the service-tax rate.
    SetAliquotaIss(Rate),
    /// Replace the INSS calculation base.
    SetBaseCalculoInss(Decimal),
    /// Replace the INSS rate.
    SetAliquotaInss(Rate),
}

impl FieldEdit {
    fn apply(self, facts: &mut InvoiceFacts) {
        match self {
            FieldEdit::ToggleOptanteSimples => facts.optante_simples = !facts.optante_simples,
            FieldEdit::ToggleMei => facts.is_mei = !facts.is_mei,
            FieldEdit::SetCodigoReinf(code) => facts.codigo_reinf = code,
            FieldEdit::SetAliquotaIr(rate) => facts.aliquota_ir = rate,
            FieldEdit::SetAliquotaIss(rate) => facts.aliquota_iss = rate,
            FieldEdit::SetBaseCalculoInss(base) => {
                facts.base_calculo_inss = base.max(Decimal::ZERO)
            }
            FieldEdit::SetAliquotaInss(rate) => facts.aliquota_inss = rate,
        }
    }
}

/// Handler recomputing a record after an edit.
pub struct RecalculateHandler {
    engine: WithholdingEngine,
}

impl RecalculateHandler {
    pub fn new(engine: WithholdingEngine) -> Self {
        Self { engine }
    }

    /// Applies one edit and returns the replacement record.
    ///
    /// Idempotent: recomputing from the same facts yields an identical
    /// assessment. The input record is untouched, so entries already
    /// committed to the history never change.
    pub fn handle(&self, record: &CalculatedRecord, edit: FieldEdit) -> CalculatedRecord {
        let mut facts = record.to_facts();
        edit.apply(&mut facts);

        let assessment = self.engine.compute(&facts);
        let revised = record.replaced(&facts, assessment);
        tracing::debug!(record_id = %record.id(), "record recomputed");
        revised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::invoice::DocumentKind;
    use rust_decimal_macros::dec;

    fn engine() -> WithholdingEngine {
        WithholdingEngine::new("Senador Canedo", false)
    }

    fn record() -> CalculatedRecord {
        let facts = InvoiceFacts {
            razao_social: "Serviços Beta ME".to_string(),
            cnpj: "98.765.432/0001-10".to_string(),
            numero_nf: "1010".to_string(),
            valor_bruto: dec!(2000.00),
            optante_simples: false,
            is_mei: false,
            documento_tipo: DocumentKind::Servico,
            local_servico: "Senador Canedo".to_string(),
            municipio_incidencia: "Senador Canedo".to_string(),
            codigo_reinf: "17099".to_string(),
            aliquota_ir: Rate::new(dec!(1.2)),
            aliquota_iss: Rate::new(dec!(3)),
            base_calculo_inss: dec!(0),
            aliquota_inss: Rate::ZERO,
            valor_inss: dec!(0),
        };
        let assessment = engine().compute(&facts);
        CalculatedRecord::create(&facts, assessment)
    }

    #[test]
    fn toggling_simples_zeroes_irrf_and_keeps_identity() {
        let original = record();
        assert_eq!(original.assessment().irrf.value, dec!(24.00));

        let handler = RecalculateHandler::new(engine());
        let revised = handler.handle(&original, FieldEdit::ToggleOptanteSimples);

        assert_eq!(revised.id(), original.id());
        assert_eq!(revised.created_at(), original.created_at());
        assert!(revised.optante_simples());
        assert_eq!(revised.assessment().irrf.value, dec!(0));
        // The displayed rate survives so the toggle can be undone.
        assert_eq!(revised.assessment().irrf.rate.value(), dec!(1.2));
    }

    #[test]
    fn toggling_simples_back_restores_the_original_figures() {
        let original = record();
        let handler = RecalculateHandler::new(engine());

        let flipped = handler.handle(&original, FieldEdit::ToggleOptanteSimples);
        let restored = handler.handle(&flipped, FieldEdit::ToggleOptanteSimples);

        assert_eq!(restored.assessment(), original.assessment());
        assert_eq!(restored.id(), original.id());
    }

    #[test]
    fn editing_the_ir_rate_recomputes_the_line() {
        let original = record();
        let handler = RecalculateHandler::new(engine());

        let revised = handler.handle(&original, FieldEdit::SetAliquotaIr(Rate::new(dec!(2.5))));

        assert_eq!(revised.assessment().irrf.rate.value(), dec!(2.5));
        assert_eq!(revised.assessment().irrf.value, dec!(50.00));
        assert_eq!(
            revised.valor_liquido(),
            revised.valor_bruto()
                - revised.assessment().irrf.value
                - revised.assessment().iss.value
                - revised.assessment().inss.value
        );
    }

    #[test]
    fn lowering_the_ir_rate_below_the_minimum_waives_the_line() {
        let original = record();
        let handler = RecalculateHandler::new(engine());

        // 2000 * 0.4% = 8.00, under the statutory minimum.
        let revised = handler.handle(&original, FieldEdit::SetAliquotaIr(Rate::new(dec!(0.4))));

        assert_eq!(revised.assessment().irrf.value, dec!(0));
        assert!(revised.assessment().irrf.observation.is_some());
    }

    #[test]
    fn editing_the_reinf_code_does_not_change_amounts() {
        let original = record();
        let handler = RecalculateHandler::new(engine());

        let revised = handler.handle(
            &original,
            FieldEdit::SetCodigoReinf("17032".to_string()),
        );

        assert_eq!(revised.codigo_reinf(), "17032");
        assert_eq!(revised.assessment(), original.assessment());
    }

    #[test]
    fn editing_the_inss_base_recomputes_from_base_and_rate() {
        let original = record();
        let handler = RecalculateHandler::new(engine());

        let with_rate =
            handler.handle(&original, FieldEdit::SetAliquotaInss(Rate::new(dec!(11))));
        let revised = handler.handle(
            &with_rate,
            FieldEdit::SetBaseCalculoInss(dec!(1500.00)),
        );

        assert_eq!(revised.assessment().inss.base, dec!(1500.00));
        assert_eq!(revised.assessment().inss.value, dec!(165.00));
    }

    #[test]
    fn toggling_mei_cannot_be_overridden_by_rates() {
        let original = record();
        let handler = RecalculateHandler::new(engine());

        let mei = handler.handle(&original, FieldEdit::ToggleMei);
        assert_eq!(mei.assessment().irrf.value, dec!(0));
        assert_eq!(mei.assessment().iss.value, dec!(0));
        assert_eq!(mei.assessment().inss.value, dec!(0));

        // Raising a rate while MEI is set still withholds nothing.
        let bumped = handler.handle(&mei, FieldEdit::SetAliquotaIr(Rate::new(dec!(15))));
        assert_eq!(bumped.assessment().irrf.value, dec!(0));
        assert_eq!(bumped.valor_liquido(), bumped.valor_bruto());
    }

    #[test]
    fn recalculation_is_idempotent() {
        let original = record();
        let handler = RecalculateHandler::new(engine());

        let once = handler.handle(&original, FieldEdit::SetAliquotaIss(Rate::new(dec!(5))));
        let twice = handler.handle(&once, FieldEdit::SetAliquotaIss(Rate::new(dec!(5))));

        assert_eq!(once.assessment(), twice.assessment());
        assert_eq!(once.id(), twice.id());
    }

    #[test]
    fn the_input_record_is_never_mutated() {
        let original = record();
        let snapshot = original.clone();
        let handler = RecalculateHandler::new(engine());

        let _ = handler.handle(&original, FieldEdit::ToggleMei);

        assert_eq!(original, snapshot);
    }
}
