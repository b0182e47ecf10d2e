use async_trait::async_trait;
use natal::chart::{ChartAssembler, Observer};
use natal::ephemeris::{AnalyticalEphemeris, CelestialBody, EphemerisSource, PrecisionMode, RawPosition};
use natal::interpretation::{
    interpret_with_fallback, ChartSummary, InterpretationKind, Interpreter, StaticInterpreter,
};
use natal::{EphemerisError, InterpretationError, NatalChart};
use std::time::Duration;

struct Analytical(AnalyticalEphemeris);

impl EphemerisSource for Analytical {
    fn position(
        &self,
        body: CelestialBody,
        julian_day_ut: f64,
        _mode: PrecisionMode,
    ) -> Result<RawPosition, EphemerisError> {
        self.0.calc_body_position(body, julian_day_ut)
    }
}

fn chart(latitude: f64) -> NatalChart {
    let assembler = ChartAssembler::new(Analytical(AnalyticalEphemeris::new()));
    assembler
        .compute_for_observer(&Observer {
            latitude,
            longitude: 10.0,
            julian_day: 2_448_000.5,
        })
        .chart
}

struct SlowInterpreter;

#[async_trait]
impl Interpreter for SlowInterpreter {
    fn name(&self) -> &str {
        "slow"
    }

    async fn interpret(
        &self,
        _kind: InterpretationKind,
        _summary: &ChartSummary,
    ) -> Result<String, InterpretationError> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok("too late".to_string())
    }
}

struct FailingInterpreter;

#[async_trait]
impl Interpreter for FailingInterpreter {
    fn name(&self) -> &str {
        "failing"
    }

    async fn interpret(
        &self,
        _kind: InterpretationKind,
        _summary: &ChartSummary,
    ) -> Result<String, InterpretationError> {
        Err(InterpretationError::Service("503".to_string()))
    }
}

#[tokio::test]
async fn test_static_interpreter_answers_every_kind() {
    let chart = chart(45.0);
    for kind in [
        InterpretationKind::Natal,
        InterpretationKind::Synastry,
        InterpretationKind::PersonalHoroscope,
    ] {
        let text = interpret_with_fallback(
            &StaticInterpreter,
            kind,
            &chart,
            Duration::from_secs(1),
            "fallback",
        )
        .await;
        assert!(text.starts_with("###"), "{kind}: {text}");
    }
}

#[tokio::test]
async fn test_timeout_yields_fallback() {
    let text = interpret_with_fallback(
        &SlowInterpreter,
        InterpretationKind::Natal,
        &chart(45.0),
        Duration::from_millis(20),
        "fallback",
    )
    .await;
    assert_eq!(text, "fallback");
}

#[tokio::test]
async fn test_service_error_yields_fallback() {
    let text = interpret_with_fallback(
        &FailingInterpreter,
        InterpretationKind::Synastry,
        &chart(45.0),
        Duration::from_secs(1),
        "fallback",
    )
    .await;
    assert_eq!(text, "fallback");
}

#[test]
fn test_summary_carries_signs_and_retrograde() {
    let chart = chart(45.0);
    let summary = ChartSummary::from(&chart);
    assert_eq!(summary.bodies.len(), chart.bodies.len());
    assert_eq!(summary.ascendant_sign, Some(chart.houses[0].sign));
    assert_eq!(summary.midheaven_sign, Some(chart.houses[9].sign));

    let json = serde_json::to_value(&summary).unwrap();
    let first = &json["bodies"][0];
    assert_eq!(first["name"], "Sun");
    assert!(first["isRetrograde"].is_boolean());
    assert!(json.get("ascendantSign").is_some());
}

#[test]
fn test_polar_chart_summary_has_no_angle_signs() {
    let summary = ChartSummary::from(&chart(89.9));
    assert!(summary.ascendant_sign.is_none());
}
