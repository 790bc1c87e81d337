//! Tests for batch-means collection
//!
//! These tests feed the collector synthetic streams with known structure, then
//! run it inside a full network until every center holds its batches.

use airport_checkpoint_sim::center::Center;
use airport_checkpoint_sim::network::{Branch, CenterDescriptor, CenterKind, Route, RoutingPoint, Topology};
use airport_checkpoint_sim::random::{ArrivalProcess, RandomStreams, RandomVariateGenerator, ServiceProcess};
use airport_checkpoint_sim::simulation::{SimulationModel, StopCondition};
use airport_checkpoint_sim::stats::*;
use airport_checkpoint_sim::types::{CenterId, CenterNames, MetricKind, SimulationConfig, StreamId};
use std::sync::Arc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn scope() -> MetricScope {
    MetricScope::Center(CenterId(0))
}

fn ts_key() -> MetricKey {
    MetricKey::center(CenterId(0), MetricKind::ResponseTime)
}

/// Scenario E: warmup observations never reach a batch
#[test]
fn test_job_warmup_then_exact_batch_count() {
    let mut collector = BatchCollector::new(100, 10, Warmup::Jobs(1000));
    collector.track(scope());
    let mut stats = StatCollector::new();
    let mut rng = StdRng::seed_from_u64(17);

    let mut closed = 0;
    for i in 0..5_000 {
        // Warmup values are huge so any leak shows in the means
        let value = if i < 1000 { 1.0e6 } else { rng.gen::<f64>() };
        stats.add_sample(ts_key(), value);
        if collector.observe(i as f64, scope(), &mut stats) {
            closed += 1;
        }
    }

    assert_eq!(closed, 10);
    assert_eq!(collector.state(), BatchState::Done);
    assert_eq!(collector.discarded_for(scope()), 1000);

    let means = collector.means_for(&ts_key());
    assert_eq!(means.len(), 10);
    assert!(means.iter().all(|&mean| (0.0..1.0).contains(&mean)));
}

/// Batches stop once the collector is done, whatever else arrives
#[test]
fn test_no_batches_after_done() {
    let mut collector = BatchCollector::new(10, 3, Warmup::Jobs(0));
    collector.track(scope());
    let mut stats = StatCollector::new();

    for i in 0..500 {
        stats.add_sample(ts_key(), 1.0);
        collector.observe(i as f64, scope(), &mut stats);
    }
    assert_eq!(collector.batches_for(scope()), 3);
    assert_eq!(collector.means_for(&ts_key()).len(), 3);
}

/// Batch means of an i.i.d. stream show no lag-1 correlation
#[test]
fn test_iid_batch_means_uncorrelated() {
    let mut rng = StdRng::seed_from_u64(42);
    let normal = Normal::new(10.0, 2.0).unwrap();
    let values: Vec<f64> = (0..4_000).map(|_| normal.sample(&mut rng)).collect();

    let r = lag1_autocorrelation(&values).unwrap();
    assert!(r.abs() < 0.1, "r = {}", r);
}

/// A strongly autoregressive stream is clearly correlated
#[test]
fn test_autoregressive_stream_correlated() {
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 1.0).unwrap();
    let mut x = 0.0;
    let values: Vec<f64> = (0..4_000)
        .map(|_| {
            x = 0.9 * x + noise.sample(&mut rng);
            x
        })
        .collect();

    let r = lag1_autocorrelation(&values).unwrap();
    assert!(r > 0.7, "r = {}", r);

    let row = IntervalEstimationRow::from_series("Ts_XRay".to_string(), &values, DEFAULT_CONFIDENCE, true).unwrap();
    assert!(row.is_correlated());
}

/// Interval rows carry the autocorrelation of their batch means
#[test]
fn test_interval_rows_from_collector() {
    let mut collector = BatchCollector::new(50, 8, Warmup::Jobs(0));
    collector.track(scope());
    let mut stats = StatCollector::new();
    let mut rng = StdRng::seed_from_u64(7);

    for i in 0..400 {
        stats.add_sample(ts_key(), 5.0 + rng.gen::<f64>());
        collector.observe(i as f64, scope(), &mut stats);
    }

    let mut names = CenterNames::new();
    names.insert(CenterId(0), "XRay");
    let rows = collector.interval_rows(&names, DEFAULT_CONFIDENCE);
    assert_eq!(rows.len(), 1);
    let (metric, row) = &rows[0];
    assert_eq!(metric, "Ts_XRay");
    let row = row.as_ref().unwrap();
    assert!(row.autocorrelation.is_some());
    assert!(row.min <= row.mean && row.mean <= row.max);
    assert!(row.mean > 5.0 && row.mean < 6.0);

    let batch_rows = collector.batch_rows(&names);
    assert_eq!(batch_rows.len(), 8);
    assert_eq!(batch_rows[7].batch, 7);
}

/// A full network run stops as soon as every visited center holds its batches
#[test]
fn test_network_run_until_batches_complete() {
    let config = SimulationConfig::default();
    let topology = Topology::from_config(&config).unwrap();
    let centers = topology.centers().len();

    let collector = BatchCollector::new(40, 5, Warmup::Jobs(20));
    let mut model = SimulationModel::new(topology, RandomStreams::new(config.seed)).unwrap().with_batches(collector);
    model.run(StopCondition::BatchesComplete).unwrap();

    let batches = model.batches().unwrap();
    assert!(batches.is_done());
    for id in 0..centers {
        assert_eq!(batches.batches_for(MetricScope::Center(CenterId(id))), 5);
        let ts = MetricKey::center(CenterId(id), MetricKind::ResponseTime);
        assert_eq!(batches.means_for(&ts).len(), 5);
    }
    assert_eq!(batches.batches_for(MetricScope::System), 5);
}

/// Time warmup discards everything before the cutoff
#[test]
fn test_network_time_warmup() {
    let config = SimulationConfig::default();
    let topology = Topology::from_config(&config).unwrap();

    let collector = BatchCollector::new(40, 3, Warmup::Time(600.0));
    let mut model = SimulationModel::new(topology, RandomStreams::new(9)).unwrap().with_batches(collector);
    let summary = model.run(StopCondition::BatchesComplete).unwrap();

    assert!(summary.end_time > 600.0);
    let batches = model.batches().unwrap();
    assert!(batches.discarded_for(MetricScope::System) > 0);
    assert!(batches.discarded_for(MetricScope::Center(CenterId(1))) > 0);
}

/// One desk behind an entry that lets a share of the jobs leave at once
fn desk_with_direct_exit(exit_share: f64) -> Topology {
    let arrivals = ArrivalProcess::poisson(2.0, StreamId(0)).unwrap();
    let entry = RoutingPoint::binary(
        StreamId(1),
        exit_share,
        Branch::new(exit_share, Route::Exit),
        Branch::otherwise(Route::Next(CenterId(0))),
    )
    .unwrap();
    let mut topology = Topology::new(arrivals, entry);
    let service = ServiceProcess::new(RandomVariateGenerator::exponential(1.0).unwrap(), StreamId(2));
    topology.add_center(
        CenterDescriptor::new("Desk", CenterKind::SingleServerSingleQueue, 1, service, Arc::new(RoutingPoint::exit()))
            .with_visit_ratio(1.0 - exit_share),
    );
    topology
}

/// Jobs routed from the entry straight to the exit keep the arrival process going
#[test]
fn test_entry_exit_keeps_arrivals_flowing() {
    let collector = BatchCollector::new(30, 4, Warmup::Jobs(10));
    let mut model =
        SimulationModel::new(desk_with_direct_exit(0.5), RandomStreams::new(21)).unwrap().with_batches(collector);
    let summary = model.run(StopCondition::BatchesComplete).unwrap();

    let batches = model.batches().unwrap();
    assert!(batches.is_done());
    assert_eq!(batches.batches_for(MetricScope::Center(CenterId(0))), 4);
    assert!(summary.exits > model.center(CenterId(0)).unwrap().core().departures());

    let mut model = SimulationModel::new(desk_with_direct_exit(0.5), RandomStreams::new(21)).unwrap();
    let summary = model.run(StopCondition::Horizon(2_000.0)).unwrap();
    // Mean inter-arrival of 2 over 2000 time units
    assert!(summary.jobs > 800, "only {} jobs arrived", summary.jobs);
    assert_eq!(summary.exits, summary.jobs);
}
