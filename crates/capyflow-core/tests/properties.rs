//! Property tests for the score bound and single-flight completion.

use std::rc::Rc;

use capyflow_core::history::HistoryRecorder;
use capyflow_core::{
    AppState, CapyFlow, Clock, Event, FixedClock, FocusHistory, PcgRandom, SessionEngine, Tunables,
};
use chrono::{Duration, NaiveDate, Utc};
use proptest::prelude::*;

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

proptest! {
    #[test]
    fn ecosystem_score_stays_in_range(
        offsets in prop::collection::vec(-30i64..30, 0..300),
        today_offset in -40i64..40,
    ) {
        let mut history = FocusHistory::new();
        for off in &offsets {
            history.increment(base_date() + Duration::days(*off));
        }
        let today = base_date() + Duration::days(today_offset);
        let score = history.ecosystem_score(today);
        prop_assert!(score <= 100);
        prop_assert!(history.week_total(today) as usize <= offsets.len());
    }

    #[test]
    fn recorder_score_matches_recompute(days in prop::collection::vec(0i64..14, 1..60)) {
        let mut rec = HistoryRecorder::default();
        let mut last = None;
        for d in &days {
            let date = base_date() + Duration::days(*d);
            last = Some((date, rec.record_session(date)));
        }
        let (date, update) = last.unwrap();
        prop_assert_eq!(update.ecosystem_score, rec.history.ecosystem_score(date));
        prop_assert_eq!(rec.ecosystem_score, update.ecosystem_score);
    }

    #[test]
    fn countdown_completes_exactly_once(
        focus_min in 1u32..4,
        extra_ticks in 0u32..600,
        pauses in prop::collection::vec(0u32..240, 0..4),
    ) {
        let at = Utc::now();
        let mut engine = SessionEngine::new(focus_min, 5);
        engine.start(at);
        let mut completions = 0;
        let total = focus_min * 60 + extra_ticks;
        for t in 0..total {
            if pauses.contains(&t) {
                engine.pause(at);
                engine.resume(at);
            }
            if engine.tick().is_some() {
                completions += 1;
            }
        }
        prop_assert_eq!(completions, 1);
    }

    #[test]
    fn each_completion_adds_one_fish_and_one_streak(sessions in 1usize..5, seed in any::<u64>()) {
        let clock = Rc::new(FixedClock::at("2026-10-17T09:00:00+07:00").unwrap());
        let mut flow = CapyFlow::with_parts(
            AppState::new(clock.now_utc()),
            Tunables::default(),
            Box::new(PcgRandom::seeded(seed)),
            Box::new(clock.clone()),
        );
        flow.set_durations(1, 1).unwrap();
        let mut fish_events = 0;
        for n in 1..=sessions {
            flow.start();
            for _ in 0..61 {
                clock.advance(Duration::seconds(1));
                fish_events += flow
                    .tick()
                    .iter()
                    .filter(|e| matches!(e, Event::FishCaught { .. }))
                    .count();
            }
            // Skip the break.
            flow.start();
            flow.catch_up(61);
            prop_assert_eq!(flow.state().rewards().fish_caught_count() as usize, n);
            prop_assert_eq!(flow.state().rewards().current_streak() as usize, n);
        }
        prop_assert_eq!(fish_events, sessions);
    }
}
