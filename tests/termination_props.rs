mod common;

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use common::{ScriptedWork, batch};
use retrypool::{Pool, PoolConfig, TaskOutcome};

/// Outcome a task must reach given its verdict script (missing verdicts fail).
fn expected(script: &[bool], max_retries: u32) -> TaskOutcome {
    let budget = max_retries as usize + 1;
    match script.iter().take(budget).position(|ok| *ok) {
        Some(i) => TaskOutcome::Succeeded {
            attempts: i as u32 + 1,
        },
        None => TaskOutcome::Exhausted {
            attempts: max_retries + 1,
        },
    }
}

fn case() -> impl Strategy<Value = (usize, u32, Vec<Vec<bool>>)> {
    (
        1usize..=4,
        0u32..=3,
        prop::collection::vec(prop::collection::vec(any::<bool>(), 0..5), 1..=8),
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_task_reaches_its_scripted_outcome((workers, max_retries, scripts) in case()) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();

        let exec = scripts
            .iter()
            .enumerate()
            .fold(ScriptedWork::new(false), |w, (i, s)| w.script(i as u64 + 1, s.clone()));
        let exec = Arc::new(exec);
        let pool = Pool::builder(PoolConfig::new(workers, max_retries), exec.clone()).build();
        let n = scripts.len() as u64;

        let report = rt
            .block_on(async { tokio::time::timeout(Duration::from_secs(10), pool.run(batch(n))).await })
            .expect("pool did not terminate")
            .unwrap();

        prop_assert_eq!(report.len(), scripts.len());
        for (i, script) in scripts.iter().enumerate() {
            let id = i as u64 + 1;
            let outcome = report.get(id).unwrap();
            prop_assert!(outcome.attempts() <= max_retries + 1);
            prop_assert_eq!(outcome, expected(script, max_retries));
            prop_assert_eq!(exec.calls_for(id), outcome.attempts() as usize);
            prop_assert_eq!(report.failures(id), outcome.attempts() - u32::from(outcome.is_success()));
        }
    }
}
