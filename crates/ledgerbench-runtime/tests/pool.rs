mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{connect_options, key_index, MockGateway};
use ledgerbench_core::Gateway;
use ledgerbench_runtime::{JobQueue, JobTemplate, ResultAggregator, Worker, WorkerPool};

fn filled_queue(total: u64) -> Arc<JobQueue> {
    let queue = Arc::new(JobQueue::with_capacity(total as usize));
    for job in JobTemplate::new("CreateCar", vec!["{key}".into()]).jobs(total) {
        queue.enqueue(job).unwrap();
    }
    queue.close();
    queue
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn every_job_is_delivered_exactly_once() {
    let gateway = MockGateway::succeeding().with_latency(Duration::from_millis(1));
    let probe = gateway.probe.clone();
    let session = Arc::new(gateway.connect(connect_options()).await.unwrap());
    let aggregator = Arc::new(ResultAggregator::new());

    let summary = WorkerPool::new(32)
        .run(session, filled_queue(1000), aggregator.clone())
        .await;

    let mut expected: Vec<String> = (0..1000).map(|i| format!("Car-{i}")).collect();
    expected.sort();
    assert_eq!(probe.submitted_keys(), expected);
    assert_eq!(summary.handled, 1000);
    assert_eq!(summary.workers, 32);
    assert_eq!(summary.lost_workers, 0);
    assert_eq!(aggregator.snapshot().success, 1000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn failures_do_not_stop_workers() {
    let gateway = MockGateway::failing_when(|p| key_index(p) % 2 == 0);
    let session = Arc::new(gateway.connect(connect_options()).await.unwrap());
    let aggregator = Arc::new(ResultAggregator::new());

    let summary = WorkerPool::new(3)
        .run(session, filled_queue(101), aggregator.clone())
        .await;

    let counters = aggregator.snapshot();
    assert_eq!(summary.handled, 101);
    assert_eq!(counters.failure, 51);
    assert_eq!(counters.success, 50);
}

#[tokio::test]
async fn workers_wait_for_jobs_until_the_queue_closes() {
    let gateway = MockGateway::succeeding();
    let probe = gateway.probe.clone();
    let session = Arc::new(gateway.connect(connect_options()).await.unwrap());
    let aggregator = Arc::new(ResultAggregator::new());
    let queue = Arc::new(JobQueue::with_capacity(4));

    let running = WorkerPool::new(2).start(session, queue.clone(), aggregator.clone());

    let template = JobTemplate::new("CreateCar", vec!["{key}".into()]);
    for job in template.jobs(4) {
        queue.enqueue(job).unwrap();
        tokio::task::yield_now().await;
    }
    queue.close();

    let summary = running.wait().await;
    assert_eq!(summary.handled, 4);
    assert_eq!(probe.submitted.lock().len(), 4);
    assert_eq!(probe.closes.load(Ordering::SeqCst), 0);
}

#[test]
fn pool_never_has_zero_workers() {
    assert_eq!(WorkerPool::new(0).size(), 1);
    assert_eq!(WorkerPool::new(100).size(), 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn panicking_sessions_do_not_lose_workers() {
    let gateway = MockGateway::panicking_when(|p| key_index(p) % 2 == 1);
    let session = Arc::new(gateway.connect(connect_options()).await.unwrap());
    let aggregator = Arc::new(ResultAggregator::new());

    let summary = WorkerPool::new(2)
        .run(session, filled_queue(40), aggregator.clone())
        .await;

    assert_eq!(summary.lost_workers, 0);
    assert_eq!(summary.handled, 40);
    let counters = aggregator.snapshot();
    assert_eq!((counters.success, counters.failure), (20, 20));
}

#[tokio::test]
async fn worker_ids_are_not_truncated() {
    let gateway = MockGateway::succeeding();
    let session = Arc::new(gateway.connect(connect_options()).await.unwrap());
    let aggregator = Arc::new(ResultAggregator::new());
    let worker = Worker {
        id: u32::MAX as usize + 1,
        queue: filled_queue(3),
        session,
        aggregator: aggregator.clone(),
    };
    assert!(worker.id > u32::MAX as usize);

    assert_eq!(worker.run().await, 3);
    assert_eq!(aggregator.snapshot().success, 3);
}
