//! Given steps for referral triage scenarios.

use super::world::{TriageWorld, run_async};
use carepath::referral::services::CreateReferralRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a referral from "{origin}" to "{destination}" with priority "{priority}""#)]
fn pending_referral(
    world: &mut TriageWorld,
    origin: String,
    destination: String,
    priority: String,
) -> Result<(), eyre::Report> {
    let origin_department = world.department(&origin)?;
    let destination_department = world.department(&destination)?;
    let request = CreateReferralRequest::new(
        world.patient,
        origin_department,
        destination_department,
        priority,
        world.staff,
    )
    .with_clinical(
        "suspected arrhythmia",
        "rate control",
        "review within the week",
    );
    let referral = run_async(world.referrals.create_referral(request))
        .wrap_err("create pending referral")?;
    world.referral = Some(referral);
    Ok(())
}
