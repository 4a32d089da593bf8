//! When steps for referral triage scenarios.

use super::world::{TriageWorld, run_async};
use carepath::referral::services::TriageRequest;
use carepath::task::services::CreateTaskRequest;
use chrono::NaiveDate;
use rstest_bdd_macros::when;

fn triage(world: &mut TriageWorld, request: TriageRequest) {
    match run_async(world.referrals.triage(request)) {
        Ok(referral) => {
            world.referral = Some(referral);
            world.last_triage_error = None;
        }
        Err(err) => world.last_triage_error = Some(err),
    }
}

#[when("the destination accepts the referral")]
fn accept(world: &mut TriageWorld) -> Result<(), eyre::Report> {
    let id = world.current_referral()?.id();
    let request = TriageRequest::new(id, "accept", world.staff);
    triage(world, request);
    Ok(())
}

#[when("the destination rejects the referral without notes")]
fn reject_without_notes(world: &mut TriageWorld) -> Result<(), eyre::Report> {
    let id = world.current_referral()?.id();
    let request = TriageRequest::new(id, "reject", world.staff);
    triage(world, request);
    Ok(())
}

#[when(r#"the destination rejects the referral with notes "{notes}""#)]
fn reject_with_notes(world: &mut TriageWorld, notes: String) -> Result<(), eyre::Report> {
    let id = world.current_referral()?.id();
    let request = TriageRequest::new(id, "reject", world.staff).with_notes(notes);
    triage(world, request);
    Ok(())
}

#[when(r#"the referral is redirected to "{department}""#)]
fn redirect(world: &mut TriageWorld, department: String) -> Result<(), eyre::Report> {
    let id = world.current_referral()?.id();
    let target = world.department(&department)?;
    let request = TriageRequest::new(id, "redirect", world.staff)
        .with_notes(format!("better handled by {department}"))
        .with_redirect_to(target);
    triage(world, request);
    Ok(())
}

#[when("the referral is converted into a task")]
fn convert(world: &mut TriageWorld) -> Result<(), eyre::Report> {
    let referral = world.current_referral()?;
    let start = NaiveDate::from_ymd_opt(2026, 11, 2)
        .ok_or_else(|| eyre::eyre!("invalid start date"))?;
    let end = NaiveDate::from_ymd_opt(2026, 11, 20)
        .ok_or_else(|| eyre::eyre!("invalid end date"))?;
    let request = CreateTaskRequest::new(
        referral.patient_id(),
        referral.destination_department(),
        referral.priority().as_str(),
        start,
        end,
    )
    .from_referral(referral.id());
    match run_async(world.orchestrator.create_task(request)) {
        Ok(view) => {
            world.converted.push(view);
            world.last_conversion_error = None;
        }
        Err(err) => world.last_conversion_error = Some(err),
    }
    Ok(())
}
