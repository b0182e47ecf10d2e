use natal::zodiac::{classify, degree_in_sign, normalize_longitude, sign, Sign, SIGN_ORDER};

fn samples() -> impl Iterator<Item = f64> {
    (-2000..2000).map(|i| i as f64 * 0.731 + 0.0137)
}

#[test]
fn test_normalize_range_and_idempotence() {
    for lon in samples() {
        let n = normalize_longitude(lon);
        assert!((0.0..360.0).contains(&n), "{lon} -> {n}");
        assert_eq!(normalize_longitude(n), n);
    }
}

#[test]
fn test_sign_and_degree_agree() {
    for lon in samples() {
        let (n, s, deg) = classify(lon);
        assert!(SIGN_ORDER.contains(&s));
        assert!((0.0..30.0).contains(&deg));
        assert_eq!(s, sign(n));
        assert_eq!(deg, degree_in_sign(n));
        assert!((s.index() as f64 * 30.0 + deg - n).abs() < 1e-9);
    }
}

#[test]
fn test_sign_names_round_trip_through_json() {
    let json = serde_json::to_string(&Sign::Sagittarius).unwrap();
    assert_eq!(json, "\"Sagittarius\"");
    assert_eq!(Sign::Sagittarius.to_string(), "Sagittarius");
}
