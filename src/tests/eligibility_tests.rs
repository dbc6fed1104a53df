//! Eligibility resolution tests

use std::sync::Arc;

use super::test_helpers::sample_unsigned;
use crate::config::SponsorshipConfig;
use crate::eligibility::{EligibilityResolver, IneligibilityReason, SponsorshipEligibility};
use crate::queries::QuerySnapshot;
use crate::test_utils::MockVerifier;
use crate::types::{AccountBalance, FeeCalculation, FeeQuote, NextNonce, QueryStatus};

fn config(enabled: bool) -> SponsorshipConfig {
    SponsorshipConfig {
        enabled,
        api_url: "http://sponsor.test/api".to_string(),
    }
}

fn settled_snapshot() -> QuerySnapshot {
    QuerySnapshot {
        nonce: QueryStatus::Success(NextNonce { nonce: 5 }),
        fees: QueryStatus::Success(FeeQuote {
            calculation: FeeCalculation::FeeRate,
            options: vec![100, 180, 250],
        }),
        balance: QueryStatus::Success(AccountBalance {
            available_unlocked_balance: 1_000_000,
        }),
    }
}

#[tokio::test]
async fn test_disabled_sponsorship_short_circuits_without_verification() {
    let verifier = Arc::new(MockVerifier::verdict(true));
    let resolver = EligibilityResolver::new(&config(false), verifier.clone());

    let result = resolver
        .resolve(&sample_unsigned(), &settled_snapshot())
        .await;

    assert_eq!(
        result,
        SponsorshipEligibility::Ineligible {
            reason: IneligibilityReason::SponsorshipDisabled
        }
    );
    assert_eq!(verifier.call_count(), 0);
}

#[tokio::test]
async fn test_pending_queries_yield_verifying() {
    let resolver =
        EligibilityResolver::new(&config(true), Arc::new(MockVerifier::verdict(true)));

    let mut snapshot = settled_snapshot();
    snapshot.nonce = QueryStatus::Pending;
    let result = resolver.resolve(&sample_unsigned(), &snapshot).await;
    assert!(result.is_verifying());

    let mut snapshot = settled_snapshot();
    snapshot.fees = QueryStatus::Pending;
    let result = resolver.resolve(&sample_unsigned(), &snapshot).await;
    assert!(result.is_verifying());
}

#[tokio::test]
async fn test_failed_queries_yield_specific_reasons() {
    let resolver =
        EligibilityResolver::new(&config(true), Arc::new(MockVerifier::verdict(true)));

    let mut snapshot = settled_snapshot();
    snapshot.nonce = QueryStatus::Error("node down".to_string());
    assert_eq!(
        resolver.resolve(&sample_unsigned(), &snapshot).await,
        SponsorshipEligibility::Ineligible {
            reason: IneligibilityReason::NonceUnavailable
        }
    );

    let mut snapshot = settled_snapshot();
    snapshot.fees = QueryStatus::Error("estimator down".to_string());
    assert_eq!(
        resolver.resolve(&sample_unsigned(), &snapshot).await,
        SponsorshipEligibility::Ineligible {
            reason: IneligibilityReason::FeeEstimateUnavailable
        }
    );
}

#[tokio::test]
async fn test_eligible_builds_the_sponsored_variant_from_the_resolved_nonce() {
    let resolver =
        EligibilityResolver::new(&config(true), Arc::new(MockVerifier::verdict(true)));

    let result = resolver
        .resolve(&sample_unsigned(), &settled_snapshot())
        .await;

    let sponsored = result.sponsored_tx().expect("eligible");
    assert!(sponsored.is_sponsored());
    assert_eq!(sponsored.fee(), 0);
    assert_eq!(sponsored.nonce(), 5);
    assert_eq!(sponsored.sender(), sample_unsigned().sender());
}

#[tokio::test]
async fn test_service_rejection_and_verification_failure_never_throw() {
    let resolver =
        EligibilityResolver::new(&config(true), Arc::new(MockVerifier::verdict(false)));
    assert_eq!(
        resolver
            .resolve(&sample_unsigned(), &settled_snapshot())
            .await,
        SponsorshipEligibility::Ineligible {
            reason: IneligibilityReason::RejectedByService
        }
    );

    let resolver = EligibilityResolver::new(
        &config(true),
        Arc::new(MockVerifier::failing("service timeout")),
    );
    let result = resolver
        .resolve(&sample_unsigned(), &settled_snapshot())
        .await;
    match result {
        SponsorshipEligibility::Ineligible {
            reason: IneligibilityReason::VerificationFailed(message),
        } => assert!(message.contains("service timeout")),
        other => panic!("expected verification failure, got {other:?}"),
    }
}

#[test]
fn test_reasons_render_for_display() {
    assert_eq!(
        IneligibilityReason::SponsorshipDisabled.to_string(),
        "sponsorship disabled"
    );
    assert_eq!(
        IneligibilityReason::VerificationFailed("boom".to_string()).to_string(),
        "verification failed: boom"
    );
}
