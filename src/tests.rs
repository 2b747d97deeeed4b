#[cfg(test)]
mod tests {
    use crate::automaton::{audit_all_rules, CaEngine, EngineConfig, RuleKind, VoxelField};
    use crate::ffi::{grid, lanes, lifecycle, region};
    use crate::lanes::{LaneDetector, MIN_TRACKED_FRAMES};

    #[test]
    fn test_single_x_line_lane_id() {
        let mut field = VoxelField::new(4).unwrap();
        for x in 0..4 {
            field.set(x, 0, 0, 1);
        }

        let lanes = LaneDetector::default().detect_lanes(&field);
        assert_eq!(lanes.len(), 1);
        assert_eq!(lanes[0].length, 4);
        assert!(lanes[0].id.to_string().starts_with("x_0_0_"));
    }

    #[test]
    fn test_default_engine_is_seeded() {
        let engine = CaEngine::new(EngineConfig::default()).unwrap();
        assert_eq!(engine.resolution(), 20);
        assert_eq!(engine.rule(), RuleKind::Rotate);
        assert_eq!(engine.active_count(), 12);
        assert_eq!(engine.history().len(), 1);
    }

    #[test]
    fn test_every_rule_round_trips_through_history() {
        for rule in RuleKind::ALL {
            let mut engine =
                CaEngine::new(EngineConfig::default().with_rule(rule)).unwrap();
            let initial = engine.field().clone();

            for _ in 0..5 {
                engine.step_forward();
                assert_eq!(engine.active_count(), 12, "{rule} must conserve cells");
            }
            for _ in 0..5 {
                assert!(engine.step_backward());
            }

            assert_eq!(engine.field(), &initial, "{rule}");
            assert_eq!(engine.generation(), 0);
        }
    }

    #[test]
    fn test_thread_count_does_not_change_results() {
        let mut single = CaEngine::new(EngineConfig::default().with_rule(RuleKind::Bbm)).unwrap();
        let mut pooled = CaEngine::new(
            EngineConfig::default()
                .with_rule(RuleKind::Bbm)
                .with_num_threads(4),
        )
        .unwrap();

        for _ in 0..8 {
            single.step_forward();
            pooled.step_forward();
        }
        assert_eq!(single.field(), pooled.field());
    }

    #[test]
    fn test_history_frames_feed_lane_tracking() {
        let mut engine = CaEngine::new(EngineConfig::default().with_resolution(12)).unwrap();
        engine.field_mut().fill(0);
        for x in 2..8 {
            engine.set_cell(x, 4, 4, 1);
        }
        for _ in 0..4 {
            engine.step_forward();
        }

        let frames = engine.history().frames();
        assert!(frames.len() >= MIN_TRACKED_FRAMES);

        let tracked = LaneDetector::default().detect_hyperspace_lanes(&frames);
        assert!(!tracked.is_empty());
        for h in &tracked {
            assert_eq!(h.time_end, h.time_start + 1);
            assert!(h.time_end < frames.len());
            assert!(h.evolution.similarity > 0.6);
        }
    }

    #[test]
    fn test_all_rules_are_bijective() {
        for audit in audit_all_rules() {
            assert!(audit.bijective, "{} is not bijective", audit.rule);
            assert_eq!(audit.distinct_images, 256);
            assert_eq!(audit.round_trips, 256);
        }
    }

    #[test]
    fn test_ffi_session() {
        unsafe {
            let engine = lifecycle::va_engine_create(20, 1);
            assert!(!engine.is_null());

            let mut before = vec![0u8; 8000];
            assert_eq!(
                region::va_engine_extract_region(engine, before.as_mut_ptr(), 0, 0, 0, 20, 20, 20),
                8000
            );

            for _ in 0..3 {
                grid::va_engine_step_forward(engine);
            }
            assert_eq!(lifecycle::va_engine_generation(engine), 3);
            assert_eq!(lifecycle::va_engine_history_len(engine), 4);
            assert_eq!(lifecycle::va_engine_active_count(engine), 12);

            for _ in 0..3 {
                assert_eq!(grid::va_engine_step_backward(engine), 1);
            }

            let mut after = vec![0u8; 8000];
            region::va_engine_extract_region(engine, after.as_mut_ptr(), 0, 0, 0, 20, 20, 20);
            assert_eq!(before, after);

            lifecycle::va_engine_reset(engine);
            assert_eq!(lifecycle::va_engine_history_len(engine), 1);
            assert_eq!(lifecycle::va_engine_active_count(engine), 12);
            assert_eq!(
                lanes::va_engine_lane_count(engine),
                LaneDetector::default().detect_lanes((*engine).field()).len() as u64
            );

            lifecycle::va_engine_destroy(engine);
        }
    }
}
