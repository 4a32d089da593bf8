//! In-memory integration tests for intervention scheduling.

use super::helpers::{Hospital, date, hospital};
use carepath::error::ErrorKind;
use carepath::task::services::{CreateTaskRequest, TaskView};
use eyre::{bail, ensure};
use rstest::rstest;

async fn february_task(hospital: &Hospital) -> eyre::Result<TaskView> {
    let request = CreateTaskRequest::new(
        hospital.patient,
        hospital.cardiology,
        "medium",
        date("2024-02-01"),
        date("2024-02-29"),
    );
    Ok(hospital.orchestrator.create_task(request).await?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn staff_cannot_be_in_two_wards_at_once(hospital: Hospital) -> eyre::Result<()> {
    let first = february_task(&hospital).await?;
    let second = february_task(&hospital).await?;
    hospital
        .scheduler
        .add_intervention(
            first.task.id(),
            hospital.booking(hospital.nurse, "2024-02-01", "2024-02-05"),
        )
        .await?;

    let Err(err) = hospital
        .scheduler
        .add_intervention(
            second.task.id(),
            hospital.booking(hospital.nurse, "2024-02-03", "2024-02-10"),
        )
        .await
    else {
        bail!("overlapping booking should be refused");
    };
    ensure!(err.kind() == ErrorKind::SchedulingConflict);

    hospital
        .scheduler
        .add_intervention(
            second.task.id(),
            hospital.booking(hospital.physio, "2024-02-03", "2024-02-10"),
        )
        .await?;
    hospital
        .scheduler
        .add_intervention(
            second.task.id(),
            hospital.booking(hospital.nurse, "2024-02-06", "2024-02-10"),
        )
        .await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn many_concurrent_bookings_leave_no_overlap(hospital: Hospital) -> eyre::Result<()> {
    let mut task_ids = Vec::new();
    for _ in 0..8 {
        task_ids.push(february_task(&hospital).await?.task.id());
    }

    let mut handles = Vec::new();
    for task_id in task_ids {
        let scheduler = hospital.scheduler.clone();
        let booking = hospital.booking(hospital.nurse, "2024-02-10", "2024-02-12");
        handles.push(tokio::spawn(async move {
            scheduler.add_intervention(task_id, booking).await
        }));
    }
    let mut accepted = 0_usize;
    for handle in handles {
        match handle.await? {
            Ok(_) => accepted += 1,
            Err(err) => {
                ensure!(err.kind() == ErrorKind::SchedulingConflict);
            }
        }
    }

    let schedule = hospital.scheduler.staff_schedule(hospital.nurse).await?;
    ensure!(accepted == 1);
    ensure!(schedule.len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn hiding_a_task_releases_its_staff(hospital: Hospital) -> eyre::Result<()> {
    let first = february_task(&hospital).await?;
    let second = february_task(&hospital).await?;
    hospital
        .scheduler
        .add_intervention(
            first.task.id(),
            hospital.booking(hospital.nurse, "2024-02-01", "2024-02-05"),
        )
        .await?;
    hospital.orchestrator.toggle_hide(first.task.id()).await?;

    hospital
        .scheduler
        .add_intervention(
            second.task.id(),
            hospital.booking(hospital.nurse, "2024-02-02", "2024-02-03"),
        )
        .await?;

    let schedule = hospital.scheduler.staff_schedule(hospital.nurse).await?;
    ensure!(schedule.iter().all(|booking| booking.task_id == second.task.id()));
    Ok(())
}
