//! Unit tests for ibm-events.

#[cfg(test)]
mod queue {
    use ibm_core::{EventId, PersonId};

    use crate::{Delays, EventQueue};

    const RECOVERY: EventId = EventId(0);
    const DEATH: EventId = EventId(1);

    fn p(raw: &[u32]) -> Vec<PersonId> {
        raw.iter().copied().map(PersonId).collect()
    }

    #[test]
    fn delays_check() {
        assert!(Delays::Scalar(1).check(3).is_ok());
        assert!(Delays::Scalar(0).check(3).is_err());
        assert!(Delays::Each(&[1, 2]).check(3).is_err());
        assert!(Delays::Each(&[1, 0, 2]).check(3).is_err());
        assert_eq!(Delays::Each(&[4, 5]).get(1), 5);
        assert_eq!(Delays::from(7).get(99), 7);
    }

    #[test]
    fn persons_for_sorted_unique() {
        let mut q = EventQueue::new();
        q.push_all(&p(&[5, 2]), Delays::Scalar(3), RECOVERY);
        q.push_all(&p(&[2, 9]), Delays::Scalar(1), RECOVERY);
        q.push_all(&p(&[1]), Delays::Scalar(1), DEATH);
        assert_eq!(q.len(), 5);
        assert_eq!(q.persons_for(RECOVERY), p(&[2, 5, 9]));
        assert_eq!(q.persons_for(DEATH), p(&[1]));
    }

    #[test]
    fn tick_saturates_and_due_tracks_zero() {
        let mut q = EventQueue::new();
        q.push_all(&p(&[0, 1]), Delays::Each(&[1, 2]), RECOVERY);
        q.tick();
        assert_eq!(q.due(RECOVERY), p(&[0]));
        q.tick();
        q.tick();
        assert_eq!(q.remaining_delays(PersonId(0), RECOVERY), vec![0]);
        assert_eq!(q.due(RECOVERY), p(&[0, 1]));
        assert_eq!(q.remove_due(RECOVERY), 2);
        assert!(q.is_empty());
    }

    #[test]
    fn clear_filters_by_event() {
        let mut q = EventQueue::new();
        q.push_all(&p(&[0, 1, 2]), Delays::Scalar(2), RECOVERY);
        q.push_all(&p(&[0, 1]), Delays::Scalar(2), DEATH);
        assert_eq!(q.clear(&p(&[1]), Some(DEATH)), 1);
        assert_eq!(q.persons_for(DEATH), p(&[0]));
        assert_eq!(q.clear(&p(&[0, 7]), None), 2);
        assert_eq!(q.persons_for(RECOVERY), p(&[1, 2]));
        assert_eq!(q.clear(&[], None), 0);
    }
}

#[cfg(test)]
mod scheduler {
    use std::sync::{Arc, Mutex};

    use ibm_core::{IbmError, IbmResult, PersonId, SimRng, Tick};
    use ibm_state::{StateStore, StateStoreBuilder};

    use crate::{EventContext, Scheduler};

    fn p(raw: &[u32]) -> Vec<PersonId> {
        raw.iter().copied().map(PersonId).collect()
    }

    fn setup(n: usize) -> (StateStore, Scheduler, SimRng) {
        let state = StateStoreBuilder::new(n).labels(["S", "I", "R"]).build().unwrap();
        let scheduler = Scheduler::with_events(n, ["Recovery", "Death"]).unwrap();
        (state, scheduler, SimRng::new(1))
    }

    type Log = Arc<Mutex<Vec<(String, Vec<PersonId>)>>>;

    fn recorder(log: &Log, tag: &str) -> impl FnMut(&[PersonId], Tick, &mut EventContext<'_>) -> IbmResult<()> + Send + 'static {
        let log = Arc::clone(log);
        let tag = tag.to_owned();
        move |targets: &[PersonId], _now: Tick, _ctx: &mut EventContext<'_>| {
            log.lock().unwrap().push((tag.clone(), targets.to_vec()));
            Ok(())
        }
    }

    #[test]
    fn delay_fires_that_many_steps_later() {
        let (mut state, mut sched, mut rng) = setup(4);
        let log: Log = Arc::default();
        sched.register_listener("Recovery", recorder(&log, "r")).unwrap();
        // Scheduled during step 1, before its event pass.
        sched.schedule(&p(&[2]), 3u32, "Recovery").unwrap();

        for t in 1..=3 {
            assert_eq!(sched.advance(&mut state, &mut rng, Tick(t)).unwrap(), 0);
            assert_eq!(sched.get_scheduled("Recovery").unwrap(), p(&[2]));
        }
        assert_eq!(sched.remaining_delays(PersonId(2), "Recovery").unwrap(), vec![0]);
        assert_eq!(sched.advance(&mut state, &mut rng, Tick(4)).unwrap(), 1);
        assert_eq!(*log.lock().unwrap(), vec![("r".to_owned(), p(&[2]))]);
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn tick_process_pairs_fire_on_the_third_pair() {
        let (mut state, mut sched, mut rng) = setup(8);
        sched.schedule(&p(&[7]), 3u32, "Recovery").unwrap();
        for (t, left) in [(1, 2u32), (2, 1)] {
            sched.tick();
            assert_eq!(sched.remaining_delays(PersonId(7), "Recovery").unwrap(), vec![left]);
            assert_eq!(sched.process(&mut state, &mut rng, Tick(t)).unwrap(), 0);
            assert_eq!(sched.get_scheduled("Recovery").unwrap(), p(&[7]));
        }
        sched.tick();
        assert_eq!(sched.process(&mut state, &mut rng, Tick(3)).unwrap(), 1);
        assert!(sched.get_scheduled("Recovery").unwrap().is_empty());
    }

    #[test]
    fn duplicate_entries_fire_once_per_person() {
        let (mut state, mut sched, mut rng) = setup(4);
        let log: Log = Arc::default();
        sched.register_listener("Recovery", recorder(&log, "r")).unwrap();
        sched.schedule(&p(&[3, 1]), 1u32, "Recovery").unwrap();
        sched.schedule(&p(&[1]), 1u32, "Recovery").unwrap();
        assert_eq!(sched.pending_len(), 3);
        assert_eq!(sched.get_scheduled("Recovery").unwrap(), p(&[1, 3]));

        assert_eq!(sched.advance(&mut state, &mut rng, Tick(1)).unwrap(), 0);
        assert_eq!(sched.advance(&mut state, &mut rng, Tick(2)).unwrap(), 2);
        assert_eq!(log.lock().unwrap()[0].1, p(&[1, 3]));
        assert!(sched.get_scheduled("Recovery").unwrap().is_empty());
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let (mut state, mut sched, mut rng) = setup(3);
        let log: Log = Arc::default();
        sched.register_listener("Death", recorder(&log, "d1")).unwrap();
        sched.register_listener("Recovery", recorder(&log, "r1")).unwrap();
        sched.register_listener("Recovery", recorder(&log, "r2")).unwrap();
        sched.register_listener("Death", recorder(&log, "d2")).unwrap();
        sched.schedule(&p(&[0]), 1u32, "Death").unwrap();
        sched.schedule(&p(&[1]), 1u32, "Recovery").unwrap();

        sched.advance(&mut state, &mut rng, Tick(1)).unwrap();
        sched.advance(&mut state, &mut rng, Tick(2)).unwrap();
        let tags: Vec<String> = log.lock().unwrap().iter().map(|(t, _)| t.clone()).collect();
        // Events in label order, listeners in registration order within each.
        assert_eq!(tags, vec!["r1", "r2", "d1", "d2"]);
    }

    #[test]
    fn listener_updates_are_committed_by_apply() {
        let (mut state, mut sched, mut rng) = setup(3);
        sched
            .register_listener(
                "Recovery",
                |targets: &[PersonId], _now: Tick, ctx: &mut EventContext<'_>| {
                    ctx.queue_update(targets, "R")
                },
            )
            .unwrap();
        sched.schedule(&p(&[0, 2]), 1u32, "Recovery").unwrap();
        sched.advance(&mut state, &mut rng, Tick(1)).unwrap();
        assert!(!state.has_pending());
        sched.advance(&mut state, &mut rng, Tick(2)).unwrap();
        assert_eq!(state.counts(), vec![3, 0, 0]);
        assert_eq!(state.apply_updates(), 2);
        assert_eq!(state.counts(), vec![1, 0, 2]);
    }

    #[test]
    fn listener_can_reschedule() {
        let (mut state, mut sched, mut rng) = setup(2);
        let fired_at: Arc<Mutex<Vec<u64>>> = Arc::default();
        let seen = Arc::clone(&fired_at);
        sched
            .register_listener(
                "Recovery",
                move |targets: &[PersonId], now: Tick, ctx: &mut EventContext<'_>| {
                    seen.lock().unwrap().push(now.0);
                    if now.0 < 4 {
                        ctx.schedule(targets, 1u32, "Recovery")?;
                    }
                    Ok(())
                },
            )
            .unwrap();
        sched.schedule(&p(&[1]), 1u32, "Recovery").unwrap();
        for t in 1..=6 {
            sched.advance(&mut state, &mut rng, Tick(t)).unwrap();
        }
        assert_eq!(*fired_at.lock().unwrap(), vec![2, 3, 4]);
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn earlier_event_can_cancel_later_event() {
        let (mut state, mut sched, mut rng) = setup(3);
        let log: Log = Arc::default();
        sched
            .register_listener(
                "Recovery",
                |targets: &[PersonId], _now: Tick, ctx: &mut EventContext<'_>| {
                    ctx.clear(targets, Some("Death")).map(|_| ())
                },
            )
            .unwrap();
        sched.register_listener("Death", recorder(&log, "d")).unwrap();
        sched.schedule(&p(&[0, 1]), 1u32, "Death").unwrap();
        sched.schedule(&p(&[0]), 1u32, "Recovery").unwrap();

        assert_eq!(sched.advance(&mut state, &mut rng, Tick(1)).unwrap(), 0);
        assert_eq!(sched.advance(&mut state, &mut rng, Tick(2)).unwrap(), 2);
        assert_eq!(*log.lock().unwrap(), vec![("d".to_owned(), p(&[1]))]);
    }

    #[test]
    fn failed_schedule_changes_nothing() {
        let (_, mut sched, _) = setup(3);
        assert!(matches!(
            sched.schedule(&p(&[0, 1]), 0u32, "Recovery"),
            Err(IbmError::InvalidParameter(_))
        ));
        assert!(matches!(
            sched.schedule(&p(&[0, 1]), &[1u32][..], "Recovery"),
            Err(IbmError::LengthMismatch { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            sched.schedule(&p(&[0, 3]), 2u32, "Recovery"),
            Err(IbmError::InvalidIndex { index: 3, count: 3 })
        ));
        assert!(matches!(
            sched.schedule(&p(&[0]), 2u32, "Hospital"),
            Err(IbmError::UnknownLabel { kind: "event", .. })
        ));
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn per_target_delays() {
        let (_, mut sched, _) = setup(3);
        let delays = vec![4u32, 2];
        sched.schedule(&p(&[0, 2]), &delays, "Recovery").unwrap();
        assert_eq!(sched.remaining_delays(PersonId(2), "Recovery").unwrap(), vec![2]);
        assert_eq!(sched.remaining_delays(PersonId(0), "Recovery").unwrap(), vec![4]);
    }

    #[test]
    fn schedule_then_clear_leaves_nothing() {
        let (_, mut sched, _) = setup(8);
        sched.schedule(&p(&[1, 3, 5]), 4u32, "Recovery").unwrap();
        assert_eq!(sched.clear(&p(&[1, 3, 5]), Some("Recovery")).unwrap(), 3);
        assert!(sched.get_scheduled("Recovery").unwrap().is_empty());
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn clear_is_noop_for_unscheduled_persons() {
        let (_, mut sched, _) = setup(4);
        sched.schedule(&p(&[0]), 2u32, "Recovery").unwrap();
        assert_eq!(sched.clear(&p(&[1, 2]), None).unwrap(), 0);
        assert_eq!(sched.clear(&p(&[0]), Some("Death")).unwrap(), 0);
        assert_eq!(sched.clear(&p(&[0]), Some("Recovery")).unwrap(), 1);
        assert!(sched.clear(&p(&[9]), None).is_err());
        assert!(sched.clear(&p(&[0]), Some("Nope")).is_err());
    }

    #[test]
    fn failing_listener_still_removes_due_entries() {
        let (mut state, mut sched, mut rng) = setup(2);
        let log: Log = Arc::default();
        sched
            .register_listener(
                "Recovery",
                |targets: &[PersonId], _now: Tick, ctx: &mut EventContext<'_>| {
                    ctx.queue_update(targets, "Zombie")
                },
            )
            .unwrap();
        sched.register_listener("Recovery", recorder(&log, "after")).unwrap();
        sched.schedule(&p(&[0]), 1u32, "Recovery").unwrap();

        assert_eq!(sched.advance(&mut state, &mut rng, Tick(1)).unwrap(), 0);
        let err = sched.advance(&mut state, &mut rng, Tick(2)).unwrap_err();
        assert!(matches!(err, IbmError::UnknownLabel { kind: "state", .. }));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(sched.pending_len(), 0);
        assert!(!state.has_pending());
    }

    #[test]
    fn register_unknown_event_rejected() {
        let (_, mut sched, _) = setup(1);
        let log: Log = Arc::default();
        assert!(sched.register_listener("Nope", recorder(&log, "x")).is_err());
        assert_eq!(sched.listener_count("Recovery").unwrap(), 0);
    }

    #[test]
    fn events_without_listeners_still_drain() {
        let (mut state, mut sched, mut rng) = setup(2);
        sched.schedule(&p(&[0, 1]), 1u32, "Death").unwrap();
        assert_eq!(sched.advance(&mut state, &mut rng, Tick(1)).unwrap(), 0);
        assert_eq!(sched.advance(&mut state, &mut rng, Tick(2)).unwrap(), 2);
        assert_eq!(sched.pending_len(), 0);
    }

    #[test]
    fn context_exposes_tick_and_rng() {
        let (mut state, mut sched, mut rng) = setup(2);
        let seen: Arc<Mutex<Option<(u64, u64)>>> = Arc::default();
        let out = Arc::clone(&seen);
        sched
            .register_listener(
                "Recovery",
                move |_targets: &[PersonId], _now: Tick, ctx: &mut EventContext<'_>| {
                    use rand::Rng;
                    let draw: u64 = ctx.rng().r#gen();
                    *out.lock().unwrap() = Some((ctx.now().0, draw));
                    Ok(())
                },
            )
            .unwrap();
        sched.schedule(&p(&[0]), 2u32, "Recovery").unwrap();
        sched.advance(&mut state, &mut rng, Tick(7)).unwrap();
        sched.advance(&mut state, &mut rng, Tick(8)).unwrap();
        assert!(seen.lock().unwrap().is_none());
        sched.advance(&mut state, &mut rng, Tick(9)).unwrap();
        assert_eq!(seen.lock().unwrap().map(|(t, _)| t), Some(9));
    }
}
