use std::sync::Arc;

use ledgerbench_runtime::{Counters, ResultAggregator};

const INCREMENTS: u64 = 200;

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_increments_are_never_lost() {
    for tasks in [1u64, 2, 10, 100, 1000] {
        let aggregator = Arc::new(ResultAggregator::new());

        let handles: Vec<_> = (0..tasks)
            .map(|t| {
                let aggregator = aggregator.clone();
                tokio::spawn(async move {
                    for i in 0..INCREMENTS {
                        if (t + i) % 2 == 0 {
                            aggregator.record_success();
                        } else {
                            aggregator.record_failure();
                        }
                        if i % 50 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let counters = aggregator.snapshot();
        assert_eq!(counters.total(), tasks * INCREMENTS, "tasks = {tasks}");
    }
}

#[test]
fn os_threads_see_every_update() {
    let aggregator = Arc::new(ResultAggregator::new());

    std::thread::scope(|scope| {
        for _ in 0..16 {
            let aggregator = aggregator.clone();
            scope.spawn(move || {
                for _ in 0..1000 {
                    aggregator.record_success();
                    aggregator.record_failure();
                }
            });
        }
    });

    assert_eq!(
        aggregator.snapshot(),
        Counters {
            success: 16_000,
            failure: 16_000,
        }
    );
}

#[test]
fn starts_at_zero() {
    assert_eq!(ResultAggregator::new().snapshot(), Counters::default());
}
