//! Then steps for referral triage scenarios.

use super::world::{TriageWorld, run_async};
use carepath::normalization::{CodedEnum, TriageStatus};
use eyre::{ensure, eyre};
use rstest_bdd_macros::then;

#[then(r#"the referral is "{status}""#)]
fn referral_status(world: &TriageWorld, status: String) -> Result<(), eyre::Report> {
    let id = world.current_referral()?.id();
    let stored = run_async(world.referrals.find_by_id(id))?
        .ok_or_else(|| eyre!("referral {id} missing from the store"))?;
    let expected = TriageStatus::from_label(&status)?;
    ensure!(
        stored.triage_status() == expected,
        "expected {expected}, found {}",
        stored.triage_status()
    );
    Ok(())
}

#[then(r#"triage fails with a "{kind}" error"#)]
fn triage_fails(world: &TriageWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_triage_error
        .as_ref()
        .ok_or_else(|| eyre!("triage unexpectedly succeeded"))?;
    ensure!(err.kind().as_str() == kind, "unexpected error: {err}");
    Ok(())
}

#[then("the referral needs review")]
fn needs_review(world: &TriageWorld) -> Result<(), eyre::Report> {
    ensure!(world.current_referral()?.needs_review());
    Ok(())
}

#[then("the referral does not need review")]
fn does_not_need_review(world: &TriageWorld) -> Result<(), eyre::Report> {
    ensure!(!world.current_referral()?.needs_review());
    Ok(())
}

#[then("the redirect history has {hops:usize} hops")]
fn redirect_hops(world: &TriageWorld, hops: usize) -> Result<(), eyre::Report> {
    let history = world.current_referral()?.redirect_history();
    ensure!(
        history.len() == hops,
        "expected {hops} hops, found {}",
        history.len()
    );
    Ok(())
}

#[then(r#"conversion fails with a "{kind}" error"#)]
fn conversion_fails(world: &TriageWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_conversion_error
        .as_ref()
        .ok_or_else(|| eyre!("conversion unexpectedly succeeded"))?;
    ensure!(err.kind().as_str() == kind, "unexpected error: {err}");
    Ok(())
}

#[then("the referral is linked to the first task")]
fn linked_to_first_task(world: &TriageWorld) -> Result<(), eyre::Report> {
    let first = world
        .converted
        .first()
        .ok_or_else(|| eyre!("no task was created"))?;
    ensure!(world.converted.len() == 1, "expected exactly one task");
    let id = world.current_referral()?.id();
    let stored = run_async(world.referrals.find_by_id(id))?
        .ok_or_else(|| eyre!("referral {id} missing from the store"))?;
    ensure!(stored.converted_to_task_id() == Some(first.task.id()));
    Ok(())
}
