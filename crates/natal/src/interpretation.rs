//! Interpretive text for a computed chart.
//!
//! The engine never calls out on its own. Callers inject an [`Interpreter`]
//! and go through [`interpret_with_fallback`], which bounds the call with a
//! timeout and substitutes fallback text on any failure.

use crate::chart::NatalChart;
use crate::ephemeris::CelestialBody;
use crate::error::InterpretationError;
use crate::zodiac::{sign, Element, Sign};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationKind {
    Natal,
    Synastry,
    PersonalHoroscope,
}

impl fmt::Display for InterpretationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpretationKind::Natal => f.write_str("natal"),
            InterpretationKind::Synastry => f.write_str("synastry"),
            InterpretationKind::PersonalHoroscope => f.write_str("personal_horoscope"),
        }
    }
}

impl FromStr for InterpretationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "natal" | "interpret" => Ok(InterpretationKind::Natal),
            "synastry" => Ok(InterpretationKind::Synastry),
            "personal_horoscope" | "horoscope" => Ok(InterpretationKind::PersonalHoroscope),
            other => Err(format!("Unknown interpretation kind: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodySummary {
    pub name: CelestialBody,
    pub sign: Sign,
    pub element: Element,
    pub degree: f64,
    pub is_retrograde: bool,
}

/// The part of a chart an interpreter gets to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub bodies: Vec<BodySummary>,
    /// Absent when the chart has no houses.
    pub ascendant_sign: Option<Sign>,
    pub midheaven_sign: Option<Sign>,
}

impl From<&NatalChart> for ChartSummary {
    fn from(chart: &NatalChart) -> Self {
        let bodies = chart
            .bodies
            .iter()
            .map(|p| BodySummary {
                name: p.body,
                sign: p.sign,
                element: p.sign.element(),
                degree: p.degree_in_sign,
                is_retrograde: p.retrograde,
            })
            .collect();
        let (ascendant_sign, midheaven_sign) = if chart.has_houses() {
            (Some(sign(chart.angles.ascendant)), Some(sign(chart.angles.midheaven)))
        } else {
            (None, None)
        };
        Self {
            bodies,
            ascendant_sign,
            midheaven_sign,
        }
    }
}

#[async_trait]
pub trait Interpreter: Send + Sync {
    fn name(&self) -> &str;

    async fn interpret(
        &self,
        kind: InterpretationKind,
        summary: &ChartSummary,
    ) -> Result<String, InterpretationError>;
}

/// Fixed markdown per request kind. Stands in for a real text service.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticInterpreter;

#[async_trait]
impl Interpreter for StaticInterpreter {
    fn name(&self) -> &str {
        "static"
    }

    async fn interpret(
        &self,
        kind: InterpretationKind,
        summary: &ChartSummary,
    ) -> Result<String, InterpretationError> {
        let text = match kind {
            InterpretationKind::Natal => format!(
                "### Natal interpretation\n\nChart computed for {} bodies.",
                summary.bodies.len()
            ),
            InterpretationKind::Synastry => {
                "### Synastry\n\nCompatibility calculation is ready.".to_string()
            }
            InterpretationKind::PersonalHoroscope => {
                "### Horoscope\n\nPersonal forecast loaded.".to_string()
            }
        };
        Ok(text)
    }
}

/// Ask `interpreter` for text, bounded by `timeout`. Any error or timeout
/// yields `fallback_text`.
pub async fn interpret_with_fallback(
    interpreter: &dyn Interpreter,
    kind: InterpretationKind,
    chart: &NatalChart,
    timeout: Duration,
    fallback_text: &str,
) -> String {
    let summary = ChartSummary::from(chart);
    let result = match tokio::time::timeout(timeout, interpreter.interpret(kind, &summary)).await {
        Ok(result) => result,
        Err(_) => Err(InterpretationError::Timeout(timeout)),
    };

    match result {
        Ok(text) => text,
        Err(e) => {
            log::warn!(
                "{} interpretation via {} failed, using fallback text: {}",
                kind,
                interpreter.name(),
                e
            );
            fallback_text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(
            "personal-horoscope".parse::<InterpretationKind>().unwrap(),
            InterpretationKind::PersonalHoroscope
        );
        assert!("tarot".parse::<InterpretationKind>().is_err());
    }

    #[test]
    fn test_summary_carries_element() {
        let chart = NatalChart {
            bodies: vec![crate::chart::BodyPosition::from_raw(
                CelestialBody::Mars,
                crate::ephemeris::RawPosition {
                    longitude: 125.0,
                    latitude: 0.0,
                    distance: 1.5,
                    speed_longitude: 0.6,
                },
            )],
            houses: vec![],
            angles: Default::default(),
        };
        let summary = ChartSummary::from(&chart);
        assert_eq!(summary.bodies[0].sign, Sign::Leo);
        assert_eq!(summary.bodies[0].element, Element::Fire);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["bodies"][0]["element"], "fire");
    }

    #[test]
    fn test_summary_without_houses() {
        let chart = NatalChart {
            bodies: vec![],
            houses: vec![],
            angles: Default::default(),
        };
        let summary = ChartSummary::from(&chart);
        assert_eq!(summary.ascendant_sign, None);
        assert_eq!(summary.midheaven_sign, None);
    }
}
