//! Chart assembly: resolve the instant, negotiate a precision mode, compute
//! the bodies, then the houses, then classify.
//!
//! Only an unparseable timestamp aborts a request. A body that fails is left
//! out; a house failure leaves the houses empty and the angles at zero.

use super::types::{
    BirthData, BodyPosition, ChartAngles, ChartComputation, ChartDiagnostics, HouseCusp,
    NatalChart, Observer, SkippedBody,
};
use crate::ephemeris::{negotiate_mode, CelestialBody, EphemerisSource, PrecisionMode, RawPosition};
use crate::error::{ChartError, EphemerisError, HouseError};
use crate::houses::{calc_houses, HousePositions, HouseSystem};
use crate::time::{julian_day_to_datetime, resolve_instant, Localization};
use crate::zodiac::normalize_longitude;
use rayon::prelude::*;

pub struct ChartAssembler<S> {
    source: S,
    house_system: HouseSystem,
    parallel: bool,
}

impl<S: EphemerisSource> ChartAssembler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            house_system: HouseSystem::Placidus,
            parallel: true,
        }
    }

    pub fn with_house_system(mut self, house_system: HouseSystem) -> Self {
        self.house_system = house_system;
        self
    }

    /// Fan bodies out over the rayon pool. Output order is canonical either way.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Compute a chart from caller input.
    pub fn compute(&self, input: &BirthData) -> Result<ChartComputation, ChartError> {
        let instant = resolve_instant(&input.birth_date_time, &input.zone_id)?;
        log::debug!(
            "Resolved {} ({}) to {} / JD {:.6}",
            input.birth_date_time,
            input.zone_id,
            instant.utc,
            instant.julian_day
        );
        let observer = Observer {
            latitude: input.latitude,
            longitude: input.longitude,
            julian_day: instant.julian_day,
        };
        Ok(self.assemble(&observer, Some(instant.localization)))
    }

    /// Compute a chart for an already resolved observer. Never fails.
    pub fn compute_for_observer(&self, observer: &Observer) -> ChartComputation {
        self.assemble(observer, None)
    }

    fn assemble(&self, observer: &Observer, localization: Option<Localization>) -> ChartComputation {
        let mode = negotiate_mode(&self.source, observer.julian_day);

        let (raw_bodies, skipped) = self.compute_bodies(observer.julian_day, mode);

        let house_result = calc_houses(
            self.house_system,
            observer.julian_day,
            observer.latitude,
            observer.longitude,
        );
        let (houses, angles, house_error) = match house_result {
            Ok(positions) => {
                let (houses, angles) = classify_houses(&positions);
                (houses, angles, None)
            }
            Err(e) => {
                log::warn!("Houses unavailable, reporting none: {}", e);
                (Vec::new(), ChartAngles::default(), Some(e))
            }
        };

        let bodies = raw_bodies
            .into_iter()
            .map(|(body, raw)| BodyPosition::from_raw(body, raw))
            .collect();

        ChartComputation {
            chart: NatalChart {
                bodies,
                houses,
                angles,
            },
            diagnostics: ChartDiagnostics {
                julian_day: observer.julian_day,
                utc: julian_day_to_datetime(observer.julian_day),
                mode,
                localization,
                skipped,
                house_error: house_error.as_ref().map(HouseError::to_string),
            },
        }
    }

    fn compute_bodies(
        &self,
        julian_day: f64,
        mode: PrecisionMode,
    ) -> (Vec<(CelestialBody, RawPosition)>, Vec<SkippedBody>) {
        let compute = |body: &CelestialBody| -> Result<(CelestialBody, RawPosition), EphemerisError> {
            let raw = self.source.position(*body, julian_day, mode)?;
            if !raw.is_finite() {
                return Err(EphemerisError::CalculationFailed {
                    body: *body,
                    julian_day,
                    message: format!("source returned a non-finite position {:?}", raw),
                });
            }
            log::debug!("{} at {:.6} ({:+.6}/day)", body, raw.longitude, raw.speed_longitude);
            Ok((*body, raw))
        };

        let results: Vec<_> = if self.parallel {
            CelestialBody::ALL.par_iter().map(compute).collect()
        } else {
            CelestialBody::ALL.iter().map(compute).collect()
        };

        let mut positions = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        for result in results {
            match result {
                Ok(position) => positions.push(position),
                Err(e) => {
                    log::warn!("Skipping {}: {}", e.body(), e);
                    skipped.push(SkippedBody {
                        body: e.body(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        (positions, skipped)
    }
}

fn classify_houses(positions: &HousePositions) -> (Vec<HouseCusp>, ChartAngles) {
    let houses = positions
        .cusps
        .iter()
        .zip(1u8..)
        .map(|(&lon, number)| HouseCusp::new(number, lon))
        .collect();
    let angles = ChartAngles {
        ascendant: normalize_longitude(positions.ascendant),
        midheaven: normalize_longitude(positions.midheaven),
    };
    (houses, angles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::J2000;

    struct FixedSource;

    impl EphemerisSource for FixedSource {
        fn position(
            &self,
            body: CelestialBody,
            _julian_day_ut: f64,
            _mode: PrecisionMode,
        ) -> Result<RawPosition, EphemerisError> {
            let index = CelestialBody::ALL.iter().position(|b| *b == body).unwrap_or(0);
            Ok(RawPosition {
                longitude: index as f64 * 31.0 - 20.0,
                latitude: 0.0,
                distance: 1.0,
                speed_longitude: if index % 2 == 0 { 1.0 } else { -0.5 },
            })
        }
    }

    /// Returns NaN for the Moon and a finite position for everything else.
    struct NanMoonSource;

    impl EphemerisSource for NanMoonSource {
        fn position(
            &self,
            body: CelestialBody,
            julian_day_ut: f64,
            mode: PrecisionMode,
        ) -> Result<RawPosition, EphemerisError> {
            let mut raw = FixedSource.position(body, julian_day_ut, mode)?;
            if body == CelestialBody::Moon {
                raw.longitude = f64::NAN;
            }
            Ok(raw)
        }
    }

    fn observer(latitude: f64) -> Observer {
        Observer {
            latitude,
            longitude: 0.0,
            julian_day: J2000,
        }
    }

    #[test]
    fn test_bodies_in_canonical_order() {
        let result = ChartAssembler::new(FixedSource).compute_for_observer(&observer(10.0));
        let order: Vec<_> = result.chart.bodies.iter().map(|p| p.body).collect();
        assert_eq!(order, CelestialBody::ALL.to_vec());
        assert_eq!(result.diagnostics.mode, PrecisionMode::HighPrecision);
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let parallel = ChartAssembler::new(FixedSource).compute_for_observer(&observer(10.0));
        let sequential = ChartAssembler::new(FixedSource)
            .with_parallel(false)
            .compute_for_observer(&observer(10.0));
        assert_eq!(parallel.chart, sequential.chart);
    }

    #[test]
    fn test_longitudes_normalized_before_classification() {
        let result = ChartAssembler::new(FixedSource).compute_for_observer(&observer(10.0));
        let sun = result.chart.body(CelestialBody::Sun).unwrap();
        assert_eq!(sun.ecliptic_longitude, 340.0);
        assert_eq!(sun.sign, crate::zodiac::Sign::Pisces);
        for pos in &result.chart.bodies {
            assert_eq!(pos.retrograde, pos.speed_longitude < 0.0);
        }
    }

    #[test]
    fn test_houses_numbered_and_angles_match() {
        let result = ChartAssembler::new(FixedSource).compute_for_observer(&observer(45.0));
        let chart = result.chart;
        assert_eq!(chart.houses.len(), 12);
        for (i, cusp) in chart.houses.iter().enumerate() {
            assert_eq!(cusp.house_number as usize, i + 1);
        }
        assert_eq!(chart.houses[0].ecliptic_longitude, chart.angles.ascendant);
        assert!(result.diagnostics.house_error.is_none());
    }

    #[test]
    fn test_non_finite_position_is_skipped() {
        let result = ChartAssembler::new(NanMoonSource).compute_for_observer(&observer(10.0));
        assert_eq!(result.chart.bodies.len(), 12);
        assert!(result.chart.body(CelestialBody::Moon).is_none());
        assert_eq!(result.diagnostics.skipped.len(), 1);
        assert_eq!(result.diagnostics.skipped[0].body, CelestialBody::Moon);
        for pos in &result.chart.bodies {
            assert!(pos.ecliptic_longitude.is_finite());
        }
    }

    #[test]
    fn test_diagnostics_report_utc_instant() {
        let result = ChartAssembler::new(FixedSource).compute_for_observer(&observer(10.0));
        let utc = result.diagnostics.utc.unwrap();
        assert_eq!(utc.to_rfc3339(), "2000-01-01T12:00:00+00:00");
    }

    #[test]
    fn test_polar_latitude_keeps_bodies() {
        let result = ChartAssembler::new(FixedSource).compute_for_observer(&observer(89.9));
        assert_eq!(result.chart.bodies.len(), 13);
        assert!(result.chart.houses.is_empty());
        assert_eq!(result.chart.angles, ChartAngles::default());
        assert!(result.diagnostics.house_error.is_some());
    }
}
