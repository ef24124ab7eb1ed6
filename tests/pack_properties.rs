//! Packing invariants over arbitrary issue sets

use proptest::prelude::*;
use proptest::test_runner::Config;
use remedy::batch::{pack_into_batches, BatchLimits};
use remedy::types::Issue;

fn issues_from_counts(counts: &[usize]) -> Vec<Issue> {
    counts
        .iter()
        .enumerate()
        .map(|(i, count)| {
            let systems = (0..*count).map(|s| format!("issue-{i}-system-{s}")).collect();
            Issue::new(format!("issue-{i}"), systems)
        })
        .collect()
}

fn limits_strategy() -> impl Strategy<Value = BatchLimits> {
    (1_usize..20, 1_usize..60, 1_usize..80).prop_map(|(issues, per_issue, total)| BatchLimits {
        max_issues_per_batch: issues,
        max_systems_per_issue: per_issue,
        max_total_systems_per_batch: total,
    })
}

proptest! {
    #![proptest_config(Config::with_cases(256))]

    #[test]
    fn packing_preserves_every_system_in_order(
        counts in prop::collection::vec(1_usize..150, 0..30),
        limits in limits_strategy()
    ) {
        let issues = issues_from_counts(&counts);
        let batches = pack_into_batches(&issues, limits);

        let sent: Vec<&String> = batches
            .iter()
            .flat_map(|b| b.fragments.iter())
            .flat_map(|f| f.systems.iter())
            .collect();
        let expected: Vec<&String> = issues.iter().flat_map(|i| i.systems.iter()).collect();
        prop_assert_eq!(sent, expected);

        for issue in &issues {
            let rebuilt: Vec<&String> = batches
                .iter()
                .flat_map(|b| b.fragments.iter())
                .filter(|f| f.id == issue.id)
                .flat_map(|f| f.systems.iter())
                .collect();
            prop_assert_eq!(rebuilt, issue.systems.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn batches_respect_limits(
        counts in prop::collection::vec(1_usize..150, 0..30),
        limits in limits_strategy()
    ) {
        let batches = pack_into_batches(&issues_from_counts(&counts), limits);

        for batch in &batches {
            prop_assert!(!batch.is_empty());
            prop_assert!(batch.len() <= limits.max_issues_per_batch);
            for fragment in &batch.fragments {
                prop_assert!(!fragment.systems.is_empty());
                prop_assert!(fragment.systems.len() <= limits.max_systems_per_issue);
            }
            // a lone fragment may exceed the batch total when it exceeds it on its own
            prop_assert!(
                batch.system_count() <= limits.max_total_systems_per_batch || batch.len() == 1
            );
        }
    }

    #[test]
    fn packing_is_deterministic(
        counts in prop::collection::vec(0_usize..120, 0..20),
        limits in limits_strategy()
    ) {
        let issues = issues_from_counts(&counts);
        prop_assert_eq!(
            pack_into_batches(&issues, limits),
            pack_into_batches(&issues, limits)
        );
    }
}
