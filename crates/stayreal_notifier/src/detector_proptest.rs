#[cfg(test)]
mod tests {
    use crate::detector::is_new_event;
    use proptest::prelude::*;

    /// Number of runs of equal consecutive ids
    fn run_count(ids: &[String]) -> usize {
        if ids.is_empty() {
            return 0;
        }
        1 + ids.windows(2).filter(|w| w[0] != w[1]).count()
    }

    proptest! {
        // Recording after every detected change yields exactly one change per run of ids
        #[test]
        fn test_one_change_per_run(ids in prop::collection::vec("[a-c]{1,2}", 0..40)) {
            let mut stored: Option<String> = None;
            let mut changes = 0;

            for id in &ids {
                if is_new_event(stored.as_deref(), id) {
                    changes += 1;
                    stored = Some(id.clone());
                }
            }

            prop_assert_eq!(changes, run_count(&ids));
        }

        // The last recorded id always equals the last observed id
        #[test]
        fn test_stored_id_tracks_latest(ids in prop::collection::vec("[a-z]{1,8}", 1..20)) {
            let mut stored: Option<String> = None;
            for id in &ids {
                if is_new_event(stored.as_deref(), id) {
                    stored = Some(id.clone());
                }
            }
            prop_assert_eq!(stored.as_ref(), ids.last());
        }
    }
}
