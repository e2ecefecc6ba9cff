//! The source-withholding rule engine.
//!
//! Pure and deterministic: identical facts always produce an identical
//! assessment, and no business branch is an error. Exemptions, statutory
//! minimums and out-of-jurisdiction outcomes all resolve to a concrete
//! value plus an observation the operator can read.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::assessment::{InssWithholding, WithholdingAssessment, WithholdingLine};
use super::jurisdiction;
use crate::domain::foundation::{round2, Rate};
use crate::domain::invoice::{DocumentKind, InvoiceFacts};

/// Statutory minimum below which IRRF/CSRF withholding is waived.
pub const DE_MINIMIS: Decimal = dec!(10.00);

/// Combined PIS/COFINS/CSLL rate applied when the CSRF line is enabled.
pub const CSRF_COMBINED_RATE: Decimal = dec!(4.65);

const IRRF_EXEMPTION_NOTE: &str =
    "IR não retido. Fornecedor é Optante pelo Simples Nacional ou MEI.";
const IRRF_DE_MINIMIS_NOTE: &str = "Dispensa de retenção. Valor do IR inferior a R$ 10,00.";
const CSRF_EXEMPTION_NOTE: &str =
    "CSRF não retido. Fornecedor é Optante pelo Simples Nacional ou MEI.";
const CSRF_DE_MINIMIS_NOTE: &str = "Dispensa de retenção. Valor da CSRF inferior a R$ 10,00.";
const ISS_SALE_NOTE: &str = "Operação de venda (DANFE/Produto). Sem retenção de ISS.";
const ISS_MEI_NOTE: &str = "ISS não retido. Fornecedor é MEI.";
const ISS_SIMPLES_NOTE: &str =
    "ISS retido conforme legislação municipal para Optantes do Simples.";
const INSS_MEI_NOTE: &str = "INSS não retido. Fornecedor é MEI.";

/// Fallback wording for an invoice that names no jurisdiction.
const UNKNOWN_MUNICIPALITY: &str = "local não informado";

/// Computes withholdings for supplier invoices of one municipality.
///
/// Constructed once from configuration (home municipality, whether the
/// combined CSRF line is assessed) and reused for every invoice; given the
/// same construction parameters, `compute` is a pure function of the
/// facts.
#[derive(Debug, Clone)]
pub struct WithholdingEngine {
    home_municipality: String,
    enable_csrf: bool,
}

impl WithholdingEngine {
    /// Creates an engine for the given home municipality.
    pub fn new(home_municipality: impl Into<String>, enable_csrf: bool) -> Self {
        Self {
            home_municipality: home_municipality.into(),
            enable_csrf,
        }
    }

    /// The municipality this engine withholds for.
    pub fn home_municipality(&self) -> &str {
        &self.home_municipality
    }

    /// Assesses one invoice.
    ///
    /// Never fails: gross-amount validation happens when the facts are
    /// constructed, and every business rule resolves to a value.
    pub fn compute(&self, facts: &InvoiceFacts) -> WithholdingAssessment {
        let irrf = federal_line(
            facts,
            facts.aliquota_ir,
            IRRF_EXEMPTION_NOTE,
            IRRF_DE_MINIMIS_NOTE,
        );

        let csrf = self.enable_csrf.then(|| {
            federal_line(
                facts,
                Rate::new(CSRF_COMBINED_RATE),
                CSRF_EXEMPTION_NOTE,
                CSRF_DE_MINIMIS_NOTE,
            )
        });

        let (iss, municipio_incidencia) = self.iss_line(facts);
        let inss = inss_line(facts);

        let csrf_value = csrf.as_ref().map(|l| l.value).unwrap_or(Decimal::ZERO);
        let valor_liquido =
            facts.valor_bruto - irrf.value - csrf_value - iss.value - inss.value;

        WithholdingAssessment {
            valor_bruto: facts.valor_bruto,
            irrf,
            csrf,
            iss,
            inss,
            municipio_incidencia,
            valor_liquido,
        }
    }

    /// ISS: zero for sales of goods (jurisdiction forced home), zero for
    /// MEI suppliers, withheld when the service is sourced in the home
    /// municipality, otherwise zero with the jurisdiction named.
    fn iss_line(&self, facts: &InvoiceFacts) -> (WithholdingLine, String) {
        let rate = facts.aliquota_iss;

        if facts.documento_tipo == DocumentKind::Produto {
            return (
                WithholdingLine::waived(rate, ISS_SALE_NOTE),
                self.home_municipality.clone(),
            );
        }

        let municipio = facts.municipio_incidencia.clone();

        if facts.is_mei {
            return (WithholdingLine::waived(rate, ISS_MEI_NOTE), municipio);
        }

        if jurisdiction::is_within(&facts.municipio_incidencia, &self.home_municipality) {
            let note = if facts.optante_simples {
                ISS_SIMPLES_NOTE.to_string()
            } else {
                format!("ISS retido normalmente em {}.", self.home_municipality)
            };
            let raw = facts.valor_bruto * rate.as_fraction();
            let line = WithholdingLine::withheld(rate, round2(raw)).with_observation(note);
            return (line, municipio);
        }

        let place = if facts.municipio_incidencia.trim().is_empty() {
            UNKNOWN_MUNICIPALITY.to_string()
        } else {
            facts.municipio_incidencia.clone()
        };
        let note = format!(
            "ISS devido em {}, não retido na fonte por {}.",
            place, self.home_municipality
        );
        (WithholdingLine::waived(rate, note), municipio)
    }
}

/// IRRF and CSRF share the same statutory shape: exempt regimes withhold
/// nothing, and a computed value under the de-minimis threshold is waived.
/// The de-minimis comparison uses the raw pre-rounding product; a raw
/// value of exactly zero carries no observation.
fn federal_line(
    facts: &InvoiceFacts,
    rate: Rate,
    exemption_note: &str,
    de_minimis_note: &str,
) -> WithholdingLine {
    if facts.is_exempt() {
        return WithholdingLine::waived(rate, exemption_note);
    }

    let raw = facts.valor_bruto * rate.as_fraction();
    if raw > Decimal::ZERO && raw < DE_MINIMIS {
        return WithholdingLine::waived(rate, de_minimis_note);
    }

    WithholdingLine::withheld(rate, round2(raw))
}

/// INSS: an explicitly extracted amount is used as-is, unless both a base
/// and a rate are present, in which case base x rate wins. MEI zeroes
/// everything and cannot be overridden.
fn inss_line(facts: &InvoiceFacts) -> InssWithholding {
    if facts.is_mei {
        return InssWithholding {
            rate: Rate::ZERO,
            base: Decimal::ZERO,
            value: Decimal::ZERO,
            observation: Some(INSS_MEI_NOTE.to_string()),
        };
    }

    let has_components =
        facts.base_calculo_inss > Decimal::ZERO && !facts.aliquota_inss.is_zero();
    let value = if has_components {
        round2(facts.base_calculo_inss * facts.aliquota_inss.as_fraction())
    } else {
        round2(facts.valor_inss)
    };

    InssWithholding {
        rate: facts.aliquota_inss,
        base: facts.base_calculo_inss,
        value,
        observation: None,
    }
}
