use smbo::optimizer::MultiStartOptimizer;
use smbo::{Observation, OptimizationLoop};

use crate::common::{GridOptimizer, NearestNeighbor, quartic, seed_design, unit_interval};

#[test]
fn test_rebuilt_loop_has_identical_history() {
    let (inputs, outputs) = seed_design(quartic);
    let mut original = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(31))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let mut results: Vec<Observation> = Vec::new();
    for _ in 0..4 {
        let batch = original.get_next_points(&results).unwrap();
        results = batch
            .into_iter()
            .map(|x| {
                let y = quartic(&x);
                Observation::new(x, y)
            })
            .collect();
    }
    original.submit(&results).unwrap();

    let (inputs, outputs) = original.state().snapshot();
    let rebuilt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    assert_eq!(rebuilt.state().snapshot(), original.state().snapshot());
}

#[test]
fn test_resume_from_observations() {
    let (inputs, outputs) = seed_design(quartic);
    let mut original = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(37))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();
    let batch = original.get_next_points(&[]).unwrap();
    let results: Vec<Observation> = batch
        .into_iter()
        .map(|x| {
            let y = quartic(&x);
            Observation::new(x, y)
        })
        .collect();
    original.submit(&results).unwrap();

    let mut resumed = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(37))
        .resume(original.state().observations())
        .build()
        .unwrap();

    assert_eq!(resumed.state().snapshot(), original.state().snapshot());

    // The resumed loop keeps optimizing from where the original stopped.
    let next = resumed.get_next_points(&[]).unwrap();
    assert!(resumed.space().contains(&next[0]));
    assert_eq!(resumed.state().len(), 4);
}

#[test]
fn test_recreate_per_round_matches_long_lived_loop() {
    // The external-management pattern: a brand-new loop is rebuilt from the
    // full history before every round. With a deterministic model and an
    // RNG-free optimizer, the rebuilt loop proposes exactly what a single
    // long-lived loop would have.
    let (inputs, outputs) = seed_design(quartic);

    let mut long_lived = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(GridOptimizer { resolution: 101 })
        .seed_history(inputs.clone(), outputs.clone())
        .build()
        .unwrap();

    let mut history = (inputs, outputs);
    let mut results: Vec<Observation> = Vec::new();
    for round in 0..3 {
        let batch = long_lived.get_next_points(&results).unwrap();
        results = batch
            .into_iter()
            .map(|x| {
                let y = quartic(&x);
                Observation::new(x, y)
            })
            .collect();

        let mut fresh = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
            .optimizer(GridOptimizer { resolution: 101 })
            .seed_history(history.0.clone(), history.1.clone())
            .build()
            .unwrap();
        let fresh_batch = fresh.get_next_points(&[]).unwrap();
        assert_eq!(
            fresh_batch[0], results[0].input,
            "round {round} diverged between recreated and long-lived loops"
        );

        history.0.push(results[0].input.clone());
        history.1.push(results[0].output);
    }
}
