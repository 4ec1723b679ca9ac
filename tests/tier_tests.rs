use std::collections::HashSet;

use dash_chart::core::{Tier, classify, classify_with_priority, resolve_bar_paint};
use dash_chart::render::{Color, Paint};
use proptest::prelude::*;

#[test]
fn dashboard_examples_land_in_expected_tiers() {
    let cases = [
        (92.0, Tier::Critical),
        (75.0, Tier::Critical),
        (68.0, Tier::High),
        (50.0, Tier::High),
        (42.0, Tier::Medium),
        (25.0, Tier::Medium),
        (23.0, Tier::Low),
        (0.0, Tier::Low),
    ];
    for (value, expected) in cases {
        assert_eq!(classify(value), expected, "value {value}");
    }
}

#[test]
fn every_tier_has_its_own_gradient_and_fallback() {
    let tiers = [Tier::Critical, Tier::High, Tier::Medium, Tier::Low];
    let ids: HashSet<_> = tiers.iter().map(|tier| tier.gradient_id()).collect();
    assert_eq!(ids.len(), 4);

    for tier in tiers {
        tier.color().validate().expect("valid tier color");
        match tier.paint() {
            Paint::Gradient { id, fallback } => {
                assert_eq!(id, tier.gradient_id());
                assert_eq!(fallback, tier.color());
            }
            other => panic!("expected gradient, got {other:?}"),
        }
    }
}

#[test]
fn tier_names_serialize_lowercase() {
    assert_eq!(serde_json::to_string(&Tier::Medium).expect("json"), "\"medium\"");
    let parsed: Tier = serde_json::from_str("\"critical\"").expect("parse");
    assert_eq!(parsed, Tier::Critical);
    assert_eq!(Tier::Low.as_str(), "low");
}

#[test]
fn override_color_applies_regardless_of_tier_coloring() {
    let custom = Color::rgb(0.5, 0.5, 0.5);
    let bar_color = Color::rgb(0.0, 0.0, 1.0);
    for color_by_tier in [true, false] {
        assert_eq!(
            resolve_bar_paint(Tier::Critical, Some(custom), color_by_tier, bar_color),
            Paint::Solid(custom)
        );
    }
}

fn rank(tier: Tier) -> u8 {
    match tier {
        Tier::Low => 0,
        Tier::Medium => 1,
        Tier::High => 2,
        Tier::Critical => 3,
    }
}

proptest! {
    #[test]
    fn classification_is_monotone_in_value(a in -50.0f64..150.0, b in -50.0f64..150.0) {
        let (low, high) = (a.min(b), a.max(b));
        prop_assert!(rank(classify(low)) <= rank(classify(high)));
    }

    #[test]
    fn explicit_priority_always_wins(value in -50.0f64..150.0, pick in 0usize..4) {
        let tier = [Tier::Critical, Tier::High, Tier::Medium, Tier::Low][pick];
        prop_assert_eq!(classify_with_priority(value, Some(tier)), tier);
        prop_assert_eq!(classify_with_priority(value, None), classify(value));
    }
}
