use clap::Subcommand;
use habitly_core::entitlement::{PlanLimits, PRO_ENTITLEMENT_ID};
use habitly_core::{Config, Entitlement, StaticEntitlement};
use serde_json::json;

use super::print_json;

#[derive(Subcommand)]
pub enum AccountAction {
    /// Show the current plan and its limits
    Status,
    /// Start the purchase flow
    Upgrade,
}

pub fn run(action: AccountAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let entitlement = StaticEntitlement::new(config.account.pro);

    match action {
        AccountAction::Status => {
            let limits = PlanLimits::for_entitlement(&entitlement);
            let plan = if entitlement.is_entitled() {
                PRO_ENTITLEMENT_ID
            } else {
                "Free"
            };
            print_json(&json!({
                "plan": plan,
                "identityLimit": limits.identities,
                "habitLimit": limits.habits,
            }))?;
        }
        AccountAction::Upgrade => {
            if entitlement.is_entitled() {
                println!("already on {PRO_ENTITLEMENT_ID}");
            } else {
                entitlement.request_upgrade()?;
                println!("upgraded to {PRO_ENTITLEMENT_ID}");
            }
        }
    }
    Ok(())
}
