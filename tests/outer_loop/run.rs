use smbo::optimizer::MultiStartOptimizer;
use smbo::stopping::{ConvergenceThreshold, FixedIterations, StoppingCondition};
use smbo::{Error, LoopPhase, Observation, OptimizationLoop, UserFunctionWrapper};

use crate::common::{NearestNeighbor, quartic, seed_design, unit_interval};

#[test]
fn test_run_to_completion_with_iteration_budget() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(11))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    opt.run_to_completion(quartic, FixedIterations(10)).unwrap();

    assert_eq!(opt.phase(), LoopPhase::Finished);
    assert_eq!(opt.state().len(), 13);
    assert_eq!(opt.state().rounds(), 10);
}

#[test]
fn test_step_and_run_modes_are_equivalent() {
    // Driving rounds one at a time with external evaluation must produce the
    // same history as the automatic mode, given identical seeds.
    let (inputs, outputs) = seed_design(quartic);
    const ROUNDS: usize = 6;

    let mut stepped = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(99))
        .seed_history(inputs.clone(), outputs.clone())
        .build()
        .unwrap();
    let mut results: Vec<Observation> = Vec::new();
    for _ in 0..ROUNDS {
        let batch = stepped.get_next_points(&results).unwrap();
        results = batch
            .into_iter()
            .map(|x| {
                let y = quartic(&x);
                Observation::new(x, y)
            })
            .collect();
    }
    stepped.submit(&results).unwrap();

    let mut automatic = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(99))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();
    automatic
        .run_to_completion(quartic, FixedIterations(ROUNDS))
        .unwrap();

    assert_eq!(stepped.state().snapshot(), automatic.state().snapshot());
}

#[test]
fn test_closure_stopping_condition() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(13))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    opt.run_to_completion(quartic, |s: &smbo::LoopState| s.len() >= 7)
        .unwrap();
    assert_eq!(opt.state().len(), 7);
}

#[test]
fn test_convergence_threshold_stops_eventually() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(17))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    // Guard with an iteration cap so the test terminates regardless of how
    // the threshold fires.
    let threshold = ConvergenceThreshold(0.05);
    let capped = move |s: &smbo::LoopState| threshold.should_stop(s) || s.rounds() >= 50;
    opt.run_to_completion(quartic, capped).unwrap();

    assert_eq!(opt.phase(), LoopPhase::Finished);
    assert!(opt.state().rounds() <= 50);
}

#[test]
fn test_batch_closure_objective() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(19))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let objective =
        UserFunctionWrapper::new(|batch: &[Vec<f64>]| batch.iter().map(|x| quartic(x)).collect());
    opt.run_to_completion(objective, FixedIterations(3)).unwrap();
    assert_eq!(opt.state().len(), 6);
}

#[test]
fn test_objective_count_mismatch_surfaces_and_pauses() {
    let (inputs, outputs) = seed_design(quartic);
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(23))
        .seed_history(inputs, outputs)
        .build()
        .unwrap();

    let broken = UserFunctionWrapper::new(|_batch: &[Vec<f64>]| Vec::new());
    let err = opt
        .run_to_completion(broken, FixedIterations(3))
        .unwrap_err();
    assert!(matches!(err, Error::CountMismatch { .. }));

    // The proposal stays outstanding; external evaluation can resume it.
    assert_eq!(opt.phase(), LoopPhase::AwaitingResult);
    let pending = opt.last_proposed().unwrap().to_vec();
    let results: Vec<Observation> = pending
        .into_iter()
        .map(|x| {
            let y = quartic(&x);
            Observation::new(x, y)
        })
        .collect();
    assert!(opt.get_next_points(&results).is_ok());
}
