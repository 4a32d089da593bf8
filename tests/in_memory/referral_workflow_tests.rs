//! In-memory integration tests for referral triage.

use super::helpers::{Hospital, hospital};
use carepath::config::CarePathConfig;
use carepath::error::ErrorKind;
use carepath::normalization::{Priority, TriageStatus};
use carepath::referral::{
    domain::Referral,
    ports::ReferralFilter,
    services::{CreateReferralRequest, TriageRequest, UpdateReferralRequest},
};
use eyre::{bail, ensure};
use rstest::rstest;

async fn refer(hospital: &Hospital) -> eyre::Result<Referral> {
    let request = CreateReferralRequest::new(
        hospital.patient,
        hospital.primary_care,
        hospital.cardiology,
        "P2",
        hospital.nurse,
    )
    .with_clinical("atrial fibrillation", "rate control", "review anticoagulation")
    .with_intervention_types([hospital.therapy]);
    Ok(hospital.referrals.create_referral(request).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reject_needs_notes_and_then_closes_triage(hospital: Hospital) -> eyre::Result<()> {
    let referral = refer(&hospital).await?;

    let Err(empty) = hospital
        .referrals
        .triage(TriageRequest::new(referral.id(), "reject", hospital.nurse).with_notes(""))
        .await
    else {
        bail!("rejection without notes should fail");
    };
    ensure!(empty.kind() == ErrorKind::Validation);

    let rejected = hospital
        .referrals
        .triage(
            TriageRequest::new(referral.id(), "reject", hospital.nurse)
                .with_notes("insufficient capacity"),
        )
        .await?;
    ensure!(rejected.triage_status() == TriageStatus::Rejected);

    let Err(late) = hospital
        .referrals
        .triage(TriageRequest::new(referral.id(), "accept", hospital.nurse))
        .await
    else {
        bail!("triage after rejection should fail");
    };
    ensure!(late.kind() == ErrorKind::InvalidStateTransition);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redirect_chain_is_flagged_but_completes(hospital: Hospital) -> eyre::Result<()> {
    let referral = refer(&hospital).await?;
    let route = [
        hospital.neurology,
        hospital.cardiology,
        hospital.neurology,
        hospital.primary_care,
    ];
    let mut latest = referral;
    for department in route {
        latest = hospital
            .referrals
            .triage(
                TriageRequest::new(latest.id(), "redirect", hospital.nurse)
                    .with_redirect_to(department),
            )
            .await?;
    }

    ensure!(latest.redirect_history().len() == 4);
    ensure!(latest.needs_review());
    ensure!(latest.triage_status() == TriageStatus::Pending);
    ensure!(latest.destination_department() == hospital.primary_care);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redirect_threshold_follows_configuration(hospital: Hospital) -> eyre::Result<()> {
    let config = CarePathConfig::from_json_str(r#"{"redirect":{"review_after_hops":1}}"#)?;
    let referrals = hospital.referrals.clone().with_config(&config);
    let referral = refer(&hospital).await?;

    let first = referrals
        .triage(
            TriageRequest::new(referral.id(), "redirect", hospital.nurse)
                .with_redirect_to(hospital.neurology),
        )
        .await?;
    ensure!(!first.needs_review());

    let second = referrals
        .triage(
            TriageRequest::new(referral.id(), "redirect", hospital.nurse)
                .with_redirect_to(hospital.cardiology),
        )
        .await?;
    ensure!(second.needs_review());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn redirect_to_current_destination_is_refused(hospital: Hospital) -> eyre::Result<()> {
    let referral = refer(&hospital).await?;
    let Err(err) = hospital
        .referrals
        .triage(
            TriageRequest::new(referral.id(), "redirect", hospital.nurse)
                .with_redirect_to(hospital.cardiology),
        )
        .await
    else {
        bail!("redirect to the same department should fail");
    };
    ensure!(err.kind() == ErrorKind::Validation);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn pending_referral_can_be_edited_and_listed(hospital: Hospital) -> eyre::Result<()> {
    let referral = refer(&hospital).await?;
    let updated = hospital
        .referrals
        .update_referral(
            UpdateReferralRequest::new(referral.id(), "urgent")
                .with_clinical("atrial flutter", "rate control", "cardioversion work-up"),
        )
        .await?;
    ensure!(updated.priority() == Priority::High);
    ensure!(updated.clinical().diagnosis() == "atrial flutter");

    let inbox = hospital
        .referrals
        .list(&ReferralFilter {
            destination_department: Some(hospital.cardiology),
            triage_status: Some(TriageStatus::Pending),
            ..ReferralFilter::default()
        })
        .await?;
    ensure!(inbox == vec![updated]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hidden_referral_is_retained_and_restorable(hospital: Hospital) -> eyre::Result<()> {
    let referral = refer(&hospital).await?;
    hospital.referrals.toggle_hide(referral.id()).await?;

    ensure!(hospital.referrals.list(&ReferralFilter::default()).await?.is_empty());
    ensure!(hospital.referrals.find_by_id(referral.id()).await?.is_some());

    let restored = hospital.referrals.toggle_hide(referral.id()).await?;
    ensure!(!restored.record_state().is_hidden());
    ensure!(hospital.referrals.list(&ReferralFilter::default()).await?.len() == 1);
    Ok(())
}
