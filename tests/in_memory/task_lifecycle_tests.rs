//! In-memory integration tests for referral conversion through completion.

use super::helpers::{Hospital, date};
use carepath::error::ErrorKind;
use carepath::normalization::TaskStatus;
use carepath::referral::services::{CreateReferralRequest, TriageRequest};
use carepath::task::services::CreateTaskRequest;
use eyre::{bail, ensure};
use rstest::rstest;

#[rstest]
#[case::before_first_session("2024-02-01", TaskStatus::Assigned)]
#[case::during_first_session("2024-02-03", TaskStatus::InProgress)]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_referral_becomes_completed_task(
    #[case] today: &str,
    #[case] scheduled_status: TaskStatus,
) -> eyre::Result<()> {
    let hospital = Hospital::open_on(today);
    let referral = hospital
        .referrals
        .create_referral(
            CreateReferralRequest::new(
                hospital.patient,
                hospital.primary_care,
                hospital.cardiology,
                "P2",
                hospital.nurse,
            )
            .with_clinical("chest pain", "exclude ischaemia", "stress echo"),
        )
        .await?;
    hospital
        .referrals
        .triage(TriageRequest::new(referral.id(), "accept", hospital.nurse))
        .await?;

    let created = hospital
        .orchestrator
        .create_task(
            CreateTaskRequest::new(
                hospital.patient,
                hospital.cardiology,
                "medium",
                date("2024-02-01"),
                date("2024-02-10"),
            )
            .from_referral(referral.id()),
        )
        .await?;
    ensure!(created.task.details().diagnosis() == "chest pain");
    ensure!(created.status == TaskStatus::NotAssigned);

    hospital
        .scheduler
        .add_intervention(
            created.task.id(),
            hospital.booking(hospital.physio, "2024-02-02", "2024-02-04"),
        )
        .await?;
    let scheduled = hospital.orchestrator.find_by_id(created.task.id()).await?;
    ensure!(scheduled.is_some_and(|view| view.status == scheduled_status));

    let completed = hospital
        .orchestrator
        .complete_task(created.task.id(), "resolved")
        .await?;
    ensure!(completed.status == TaskStatus::Completed);
    ensure!(!completed.overdue);

    let Err(again) = hospital
        .orchestrator
        .create_task(
            CreateTaskRequest::new(
                hospital.patient,
                hospital.cardiology,
                "medium",
                date("2024-02-01"),
                date("2024-02-10"),
            )
            .from_referral(referral.id()),
        )
        .await
    else {
        bail!("a referral converts at most once");
    };
    ensure!(again.kind() == ErrorKind::AlreadyConverted);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn completed_task_stays_on_time_long_after_end() -> eyre::Result<()> {
    let during = Hospital::open_on("2024-02-05");
    let created = during
        .orchestrator
        .create_task(CreateTaskRequest::new(
            during.patient,
            during.cardiology,
            "low",
            date("2024-02-01"),
            date("2024-02-10"),
        ))
        .await?;
    let completed = during
        .orchestrator
        .complete_task(created.task.id(), "resolved")
        .await?;

    ensure!(!completed.task.is_overdue(date("2025-01-01")));
    ensure!(completed.task.status(date("2025-01-01")) == TaskStatus::Completed);
    ensure!(created.task.is_overdue(date("2024-02-11")));
    Ok(())
}
