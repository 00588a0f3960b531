use smbo::optimizer::MultiStartOptimizer;
use smbo::{Observation, OptimizationLoop};

use crate::common::{NearestNeighbor, quartic, seed_design, unit_interval};

#[test]
fn test_single_step_proposes_one_in_space_point() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(1))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let batch = opt.get_next_points(&[]).unwrap();
    assert_eq!(batch.len(), 1);
    assert!(opt.space().contains(&batch[0]));
    assert_eq!(opt.last_proposed().unwrap(), batch.as_slice());
}

#[test]
fn test_ten_rounds_accumulate_thirteen_observations() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(3))
        .seed_history(inputs.clone(), outputs.clone())
        .build()
        .unwrap();

    let mut results: Vec<Observation> = Vec::new();
    for _ in 0..10 {
        let batch = opt.get_next_points(&results).unwrap();
        assert_eq!(batch.len(), 1);
        results = batch
            .into_iter()
            .map(|x| {
                let y = quartic(&x);
                Observation::new(x, y)
            })
            .collect();
    }
    opt.submit(&results).unwrap();

    assert_eq!(opt.state().len(), 13);
    let (final_inputs, final_outputs) = opt.state().snapshot();
    assert_eq!(&final_inputs[..3], &inputs[..]);
    assert_eq!(&final_outputs[..3], &outputs[..]);
}

#[test]
fn test_every_proposed_point_satisfies_the_space() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(9))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let mut results: Vec<Observation> = Vec::new();
    for _ in 0..5 {
        let batch = opt.get_next_points(&results).unwrap();
        for point in &batch {
            assert!(opt.space().contains(point), "out of space: {point:?}");
        }
        results = batch
            .into_iter()
            .map(|x| {
                let y = quartic(&x);
                Observation::new(x, y)
            })
            .collect();
    }
}

#[test]
fn test_results_at_unproposed_points_are_accepted() {
    // External callers may evaluate wherever they like; any in-space
    // observation is valid history.
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(5))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let _proposed = opt.get_next_points(&[]).unwrap();
    let elsewhere = Observation::new(vec![0.25], quartic(&[0.25]));
    opt.get_next_points(&[elsewhere.clone()]).unwrap();

    assert_eq!(opt.state().observations()[3], elsewhere);
}

#[test]
fn test_first_call_with_results_seeds_then_proposes() {
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(2))
        .build()
        .unwrap();

    let seed = vec![
        Observation::new(vec![0.2], quartic(&[0.2])),
        Observation::new(vec![0.8], quartic(&[0.8])),
    ];
    let batch = opt.get_next_points(&seed).unwrap();
    assert_eq!(batch.len(), 1);
    assert_eq!(opt.state().len(), 2);
}
