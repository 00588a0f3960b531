use smbo::optimizer::MultiStartOptimizer;
use smbo::stopping::FixedIterations;
use smbo::{Error, LoopPhase, Observation, OptimizationLoop};

use crate::common::{NearestNeighbor, quartic, seed_design, unit_interval};

fn seeded_loop(seed: u64) -> OptimizationLoop {
    let (inputs, outputs) = seed_design(quartic);
    OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(seed))
        .seed_history(inputs, outputs)
        .build()
        .unwrap()
}

#[test]
fn test_double_ask_without_results_is_a_protocol_violation() {
    let mut opt = seeded_loop(1);

    let first = opt.get_next_points(&[]).unwrap();
    let len_before = opt.state().len();

    let err = opt.get_next_points(&[]).unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation(_)));

    // No mutation: history and outstanding proposal are untouched.
    assert_eq!(opt.state().len(), len_before);
    assert_eq!(opt.phase(), LoopPhase::AwaitingResult);
    assert_eq!(opt.last_proposed().unwrap(), first.as_slice());
}

#[test]
fn test_malformed_results_leave_state_unchanged() {
    let mut opt = seeded_loop(2);
    let _batch = opt.get_next_points(&[]).unwrap();

    // Wrong dimensionality.
    let err = opt
        .get_next_points(&[Observation::new(vec![0.1, 0.2], 1.0)])
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { expected: 1, got: 2 }));
    assert_eq!(opt.state().len(), 3);
    assert_eq!(opt.phase(), LoopPhase::AwaitingResult);

    // Out-of-space value; no coercion.
    let err = opt
        .get_next_points(&[Observation::new(vec![1.5], 1.0)])
        .unwrap_err();
    assert!(matches!(err, Error::OutOfSpace { .. }));
    assert_eq!(opt.state().len(), 3);
}

#[test]
fn test_finished_loop_rejects_further_asks() {
    let mut opt = seeded_loop(3);
    opt.run_to_completion(quartic, FixedIterations(2)).unwrap();
    assert_eq!(opt.phase(), LoopPhase::Finished);

    assert!(matches!(
        opt.get_next_points(&[]),
        Err(Error::ProtocolViolation(_))
    ));
    assert!(matches!(
        opt.submit(&[Observation::new(vec![0.5], 1.0)]),
        Err(Error::ProtocolViolation(_))
    ));
}

#[test]
fn test_run_with_pending_proposal_is_rejected() {
    let mut opt = seeded_loop(4);
    let _batch = opt.get_next_points(&[]).unwrap();

    let err = opt
        .run_to_completion(quartic, FixedIterations(2))
        .unwrap_err();
    assert!(matches!(err, Error::ProtocolViolation(_)));
    assert_eq!(opt.phase(), LoopPhase::AwaitingResult);
}

#[test]
fn test_model_fit_failure_keeps_results_for_retry() {
    // An empty history cannot be fit; adding seed data afterwards recovers.
    let mut opt = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .optimizer(MultiStartOptimizer::with_seed(5))
        .build()
        .unwrap();

    let err = opt.get_next_points(&[]).unwrap_err();
    assert!(matches!(err, Error::ModelFit(_)));
    assert_eq!(opt.phase(), LoopPhase::Ready);

    opt.submit(&[Observation::new(vec![0.4], quartic(&[0.4]))])
        .unwrap();
    assert!(opt.get_next_points(&[]).is_ok());
}

#[test]
fn test_zero_batch_size_is_rejected_at_build() {
    let result = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .batch_size(0)
        .build();
    assert!(matches!(result, Err(Error::InvalidBatchSize)));
}

#[test]
fn test_mismatched_seed_arrays_are_rejected_at_build() {
    let result = OptimizationLoop::builder(unit_interval(), NearestNeighbor::new())
        .seed_history(vec![vec![0.1], vec![0.2]], vec![1.0])
        .build();
    assert!(matches!(
        result,
        Err(Error::CountMismatch { inputs: 2, outputs: 1 })
    ));
}
