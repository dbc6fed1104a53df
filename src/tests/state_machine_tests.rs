//! Transition-table tests for the attempt state machine

use crate::engine::attempt::{apply, Attempt, AttemptEvent, AttemptPhase};
use crate::types::Path;

#[test]
fn test_successful_attempt_walks_the_full_chain() {
    use AttemptEvent as E;
    use AttemptPhase as P;

    let chain = [
        (E::StartResolving, P::ResolvingEligibility),
        (E::PathChosen, P::PathSelected),
        (E::StartSigning, P::Signing),
        (E::SignSucceeded, P::Signed),
        (E::StartBroadcast, P::Broadcasting),
        (E::BroadcastOk, P::BroadcastAccepted),
        (E::DeliveryCompleted, P::Finalized),
    ];

    let mut phase = P::Idle;
    for (event, expected) in chain {
        phase = apply(phase, event).unwrap();
        assert_eq!(phase, expected);
    }
    assert!(phase.is_terminal());
}

#[test]
fn test_signing_failure_terminates_through_error_reported() {
    use AttemptEvent as E;
    use AttemptPhase as P;

    let phase = apply(P::Signing, E::SignFailed).unwrap();
    assert_eq!(phase, P::SigningFailed);
    assert!(!phase.is_terminal());

    let phase = apply(phase, E::FailureSurfaced).unwrap();
    assert_eq!(phase, P::ErrorReported);
    assert!(phase.is_terminal());
}

#[test]
fn test_broadcast_failure_terminates_through_error_reported() {
    use AttemptEvent as E;
    use AttemptPhase as P;

    let phase = apply(P::Broadcasting, E::BroadcastErr).unwrap();
    assert_eq!(phase, P::BroadcastFailed);

    let phase = apply(phase, E::FailureSurfaced).unwrap();
    assert_eq!(phase, P::ErrorReported);
}

#[test]
fn test_failure_can_surface_from_any_non_terminal_phase() {
    use AttemptEvent as E;
    use AttemptPhase as P;

    for phase in [
        P::Idle,
        P::ResolvingEligibility,
        P::PathSelected,
        P::Signing,
        P::Signed,
        P::Broadcasting,
        P::BroadcastAccepted,
        P::BroadcastFailed,
        P::SigningFailed,
    ] {
        assert_eq!(apply(phase, E::FailureSurfaced).unwrap(), P::ErrorReported);
    }
}

#[test]
fn test_terminal_phases_accept_no_events() {
    use AttemptEvent as E;
    use AttemptPhase as P;

    for terminal in [P::Finalized, P::ErrorReported] {
        for event in [
            E::StartResolving,
            E::PathChosen,
            E::StartSigning,
            E::SignSucceeded,
            E::SignFailed,
            E::StartBroadcast,
            E::BroadcastOk,
            E::BroadcastErr,
            E::DeliveryCompleted,
            E::FailureSurfaced,
        ] {
            assert!(apply(terminal, event).is_err());
        }
    }
}

#[test]
fn test_out_of_order_events_are_rejected() {
    use AttemptEvent as E;
    use AttemptPhase as P;

    // No broadcast without a signature.
    assert!(apply(P::PathSelected, E::StartBroadcast).is_err());
    assert!(apply(P::Idle, E::SignSucceeded).is_err());
    // No delivery without an accepted broadcast.
    assert!(apply(P::Broadcasting, E::DeliveryCompleted).is_err());
}

#[test]
fn test_attempt_record_tracks_path_and_phase() {
    let mut attempt = Attempt::begin();
    assert_eq!(attempt.phase, AttemptPhase::Idle);
    assert!(attempt.path.is_none());

    attempt.transition(AttemptEvent::StartResolving);
    attempt.set_path(Path::Sponsored);
    assert_eq!(attempt.phase, AttemptPhase::PathSelected);
    assert_eq!(attempt.path, Some(Path::Sponsored));

    // An invalid event leaves the phase unchanged.
    attempt.transition(AttemptEvent::BroadcastOk);
    assert_eq!(attempt.phase, AttemptPhase::PathSelected);
}
