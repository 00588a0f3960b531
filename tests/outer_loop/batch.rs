use smbo::batch::{BatchStrategy, Lie};
use smbo::optimizer::MultiStartOptimizer;
use smbo::{Observation, OptimizationLoop};

use crate::common::{NearestNeighbor, quartic, seed_design, unit_interval};

fn pairwise_distinct(batch: &[Vec<f64>], tol: f64) {
    for i in 0..batch.len() {
        for j in (i + 1)..batch.len() {
            let dist_sq: f64 = batch[i]
                .iter()
                .zip(&batch[j])
                .map(|(a, b)| (a - b) * (a - b))
                .sum();
            assert!(
                dist_sq.sqrt() > tol,
                "points {i} and {j} coincide: {:?} vs {:?}",
                batch[i],
                batch[j]
            );
        }
    }
}

#[test]
fn test_penalized_batch_of_three_is_distinct() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(51))
        .batch_size(3)
        .batch_strategy(BatchStrategy::LocalPenalization { length_scale: 0.2 })
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let batch = opt.get_next_points(&[]).unwrap();
    assert_eq!(batch.len(), 3);
    for point in &batch {
        assert!(opt.space().contains(point));
    }
    pairwise_distinct(&batch, 1e-6);
}

#[test]
fn test_fantasized_batch_of_three_is_distinct() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(53))
        .batch_size(3)
        .batch_strategy(BatchStrategy::Fantasize(Lie::PredictedMean))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let batch = opt.get_next_points(&[]).unwrap();
    assert_eq!(batch.len(), 3);
    for point in &batch {
        assert!(opt.space().contains(point));
    }
    pairwise_distinct(&batch, 1e-6);
}

#[test]
fn test_constant_liar_batch_stays_in_space() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(59))
        .batch_size(4)
        .batch_strategy(BatchStrategy::Fantasize(Lie::Pessimistic))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let batch = opt.get_next_points(&[]).unwrap();
    assert_eq!(batch.len(), 4);
    for point in &batch {
        assert!(opt.space().contains(point));
    }
}

#[test]
fn test_batch_round_trip_updates_history_once() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(61))
        .batch_size(3)
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let batch = opt.get_next_points(&[]).unwrap();
    let results: Vec<Observation> = batch
        .into_iter()
        .map(|x| {
            let y = quartic(&x);
            Observation::new(x, y)
        })
        .collect();
    opt.submit(&results).unwrap();

    assert_eq!(opt.state().len(), 6);
    assert_eq!(opt.state().rounds(), 1);
}
