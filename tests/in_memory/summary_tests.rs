//! In-memory integration tests for reporting summaries.

use super::helpers::{Hospital, date, hospital};
use carepath::normalization::{Priority, TaskStatus, TriageStatus};
use carepath::referral::services::{CreateReferralRequest, TriageRequest};
use carepath::summary::DepartmentBucket;
use carepath::task::services::CreateTaskRequest;
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_summary_counts_visible_tasks(hospital: Hospital) -> eyre::Result<()> {
    let mut hidden_id = None;
    for (priority, department) in [
        ("high", hospital.cardiology),
        ("high", hospital.cardiology),
        ("low", hospital.neurology),
        ("high", hospital.neurology),
    ] {
        let created = hospital
            .orchestrator
            .create_task(CreateTaskRequest::new(
                hospital.patient,
                department,
                priority,
                date("2024-02-01"),
                date("2024-02-29"),
            ))
            .await?;
        hidden_id = Some(created.task.id());
    }
    if let Some(id) = hidden_id {
        hospital.orchestrator.toggle_hide(id).await?;
    }

    let summary = hospital.orchestrator.summary().await?;

    ensure!(summary.total == 3);
    ensure!(summary.by_priority.get(Priority::High) == 2);
    ensure!(summary.by_priority.get(Priority::Low) == 1);
    ensure!(summary.by_status.get(TaskStatus::NotAssigned) == 3);
    ensure!(
        summary
            .by_department
            .get(&DepartmentBucket::Department(hospital.neurology))
            == Some(&1)
    );
    ensure!(summary.by_department.get(&DepartmentBucket::Unassigned) == Some(&0));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn referral_summary_tracks_triage_outcomes(hospital: Hospital) -> eyre::Result<()> {
    let mut ids = Vec::new();
    for grade in ["p1", "p2", "p3"] {
        let referral = hospital
            .referrals
            .create_referral(CreateReferralRequest::new(
                hospital.patient,
                hospital.primary_care,
                hospital.cardiology,
                grade,
                hospital.nurse,
            ))
            .await?;
        ids.push(referral.id());
    }
    if let Some(first) = ids.first() {
        hospital
            .referrals
            .triage(TriageRequest::new(*first, "accept", hospital.nurse))
            .await?;
    }
    if let Some(last) = ids.last() {
        hospital
            .referrals
            .triage(
                TriageRequest::new(*last, "redirect", hospital.nurse)
                    .with_redirect_to(hospital.neurology),
            )
            .await?;
    }

    let summary = hospital.referrals.summary().await?;

    ensure!(summary.total == 3);
    ensure!(summary.by_triage_status.get(TriageStatus::Accepted) == 1);
    ensure!(summary.by_triage_status.get(TriageStatus::Pending) == 2);
    ensure!(summary.by_priority.get(Priority::Medium) == 1);
    ensure!(
        summary
            .by_destination
            .get(&DepartmentBucket::Department(hospital.neurology))
            == Some(&1)
    );
    ensure!(summary.converted == 0);
    Ok(())
}
