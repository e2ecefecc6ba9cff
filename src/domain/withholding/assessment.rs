//! Assessment values produced by the withholding engine.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::Rate;

/// One computed withholding line: the applied rate, the withheld value
/// and, when the value was zeroed by a business rule, an observation
/// explaining why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingLine {
    pub rate: Rate,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

impl WithholdingLine {
    /// A line with an effectively withheld value and no observation.
    pub fn withheld(rate: Rate, value: Decimal) -> Self {
        Self {
            rate,
            value,
            observation: None,
        }
    }

    /// A zeroed line carrying the observation that justifies the waiver.
    pub fn waived(rate: Rate, observation: impl Into<String>) -> Self {
        Self {
            rate,
            value: Decimal::ZERO,
            observation: Some(observation.into()),
        }
    }

    /// Attaches an observation to the line.
    pub fn with_observation(mut self, observation: impl Into<String>) -> Self {
        self.observation = Some(observation.into());
        self
    }

    /// True when any amount is actually withheld.
    pub fn is_withheld(&self) -> bool {
        !self.value.is_zero()
    }
}

/// The INSS line additionally carries its calculation base.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InssWithholding {
    pub rate: Rate,
    pub base: Decimal,
    pub value: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observation: Option<String>,
}

/// Full result of assessing one invoice.
///
/// `municipio_incidencia` is the jurisdiction after the engine's rules
/// applied (a sale of goods forces it to the home municipality), which is
/// why it lives here and not only in the input facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithholdingAssessment {
    pub valor_bruto: Decimal,
    pub irrf: WithholdingLine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub csrf: Option<WithholdingLine>,
    pub iss: WithholdingLine,
    pub inss: InssWithholding,
    pub municipio_incidencia: String,
    pub valor_liquido: Decimal,
}

impl WithholdingAssessment {
    /// Sum of every withheld value, CSRF included when the line exists.
    pub fn total_withheld(&self) -> Decimal {
        let csrf = self
            .csrf
            .as_ref()
            .map(|line| line.value)
            .unwrap_or(Decimal::ZERO);
        self.irrf.value + csrf + self.iss.value + self.inss.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn waived_line_is_zero_with_observation() {
        let line = WithholdingLine::waived(Rate::new(dec!(1.2)), "dispensa");
        assert_eq!(line.value, dec!(0));
        assert_eq!(line.rate.value(), dec!(1.2));
        assert_eq!(line.observation.as_deref(), Some("dispensa"));
        assert!(!line.is_withheld());
    }

    #[test]
    fn withheld_line_has_no_observation() {
        let line = WithholdingLine::withheld(Rate::new(dec!(1.2)), dec!(12.00));
        assert!(line.observation.is_none());
        assert!(line.is_withheld());
    }

    #[test]
    fn total_withheld_includes_csrf_only_when_present() {
        let base = WithholdingAssessment {
            valor_bruto: dec!(1000),
            irrf: WithholdingLine::withheld(Rate::new(dec!(1.2)), dec!(12.00)),
            csrf: None,
            iss: WithholdingLine::withheld(Rate::new(dec!(3)), dec!(30.00)),
            inss: InssWithholding {
                rate: Rate::ZERO,
                base: dec!(0),
                value: dec!(0),
                observation: None,
            },
            municipio_incidencia: "Senador Canedo".to_string(),
            valor_liquido: dec!(958.00),
        };
        assert_eq!(base.total_withheld(), dec!(42.00));

        let with_csrf = WithholdingAssessment {
            csrf: Some(WithholdingLine::withheld(Rate::new(dec!(4.65)), dec!(46.50))),
            ..base
        };
        assert_eq!(with_csrf.total_withheld(), dec!(88.50));
    }

    #[test]
    fn absent_observation_is_not_serialized() {
        let line = WithholdingLine::withheld(Rate::new(dec!(1.2)), dec!(12.00));
        let json = serde_json::to_string(&line).unwrap();
        assert!(!json.contains("observation"));
    }
}
