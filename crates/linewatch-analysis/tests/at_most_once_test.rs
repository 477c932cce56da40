//! Property tests: every track produces at most one crossing, whatever its
//! path through the band and whatever storage outcomes occur.

use linewatch_analysis::{CrossingDetector, DetectorSettings};
use linewatch_core::config::CrossingRule;
use linewatch_core::types::{Observation, Timestamp, TrackId};
use proptest::prelude::*;
use rustc_hash::FxHashMap;

fn rule_strategy() -> impl Strategy<Value = CrossingRule> {
    prop_oneof![
        Just(CrossingRule::Band),
        Just(CrossingRule::LineInBand),
        Just(CrossingRule::Directional),
    ]
}

proptest! {
    #[test]
    fn each_track_is_confirmed_at_most_once(
        rule in rule_strategy(),
        // (track id, centre y) per frame, several observations per frame.
        frames in prop::collection::vec(
            prop::collection::vec((0i64..6, 0.0f32..1000.0), 0..6),
            1..60,
        ),
    ) {
        let mut det = CrossingDetector::new(DetectorSettings {
            rule,
            ..DetectorSettings::default()
        })
        .unwrap();
        let mut confirmed: FxHashMap<i64, usize> = FxHashMap::default();

        for (i, obs) in frames.iter().enumerate() {
            let observations: Vec<Observation> = obs
                .iter()
                .map(|(id, y)| Observation::new(*id, 2, 0.9, *y))
                .collect();
            let out = det.process(1000, &observations, Timestamp(i as f64));
            for c in out.candidates {
                prop_assert!(det.confirm(c.track_id));
                *confirmed.entry(c.track_id.0).or_default() += 1;
            }
        }

        for (track, n) in confirmed {
            prop_assert_eq!(n, 1, "track {} counted {} times", track, n);
        }
    }

    #[test]
    fn reverts_never_allow_double_confirmation(
        path in prop::collection::vec((540.0f32..660.0, any::<bool>()), 1..80),
    ) {
        let mut det = CrossingDetector::new(DetectorSettings::default()).unwrap();
        let mut confirmations = 0;

        for (i, (y, persist_ok)) in path.iter().enumerate() {
            let out = det.process(1000, &[Observation::new(1, 2, 0.9, *y)], Timestamp(i as f64));
            prop_assert!(out.candidates.len() <= 1);
            for c in out.candidates {
                if *persist_ok {
                    det.confirm(c.track_id);
                    confirmations += 1;
                } else {
                    det.revert(c.track_id);
                }
            }
        }

        prop_assert!(confirmations <= 1);
        if confirmations == 1 {
            prop_assert!(det.is_counted(TrackId(1)));
        }
    }
}
