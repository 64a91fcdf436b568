use clap::Subcommand;
use habitly_core::entitlement::{check_feature, PremiumFeature};
use habitly_core::reminders::plan_reminders;
use habitly_core::Timing;
use serde_json::json;

use super::print_json;
use crate::outbox::read_outbox;
use crate::session::Session;

#[derive(Subcommand)]
pub enum RemindersAction {
    /// Show what would be scheduled now, without scheduling it
    Plan,
    /// Cancel and reschedule every reminder now
    Sync,
    /// Show scheduled reminders
    List,
    /// Turn reminders on and schedule them
    Enable,
    /// Turn reminders off and cancel them
    Disable,
    /// Show or change the hour of a timing bucket
    Hours {
        /// Bucket to change
        timing: Option<Timing>,
        /// Hour of day, 0-23
        hour: Option<u8>,
    },
}

pub async fn run(action: RemindersAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;

    match action {
        RemindersAction::Plan => {
            let plan = plan_reminders(
                &session.tracker.snapshot(),
                session.tracker.today(),
                &session.tracker.reminder_hours(),
            );
            print_json(&plan)?;
        }
        RemindersAction::Sync => {
            let scheduled = session.tracker.reschedule_reminders();
            println!("{scheduled} reminder(s) scheduled");
        }
        RemindersAction::List => {
            let scheduled = read_outbox(&session.db)?;
            print_json(&json!({
                "enabled": session.tracker.reminders_enabled(),
                "scheduled": scheduled,
            }))?;
        }
        RemindersAction::Enable => {
            set_enabled(&mut session, true)?;
            println!("reminders enabled");
        }
        RemindersAction::Disable => {
            set_enabled(&mut session, false)?;
            println!("reminders disabled");
        }
        RemindersAction::Hours { timing, hour } => match (timing, hour) {
            (Some(timing), Some(hour)) => {
                check_feature(&session.entitlement, PremiumFeature::CustomReminderHours)?;
                let key = format!("reminders.hours.{}", timing.as_str().to_lowercase());
                session.config.set(&key, &hour.to_string())?;
                session.tracker.set_reminder_hours(session.config.reminders.hours);
                println!("{timing} reminders at {hour}:00");
            }
            (Some(timing), None) => {
                println!("{}", session.tracker.reminder_hours().hour_for(timing));
            }
            (None, _) => {
                print_json(&session.tracker.reminder_hours())?;
            }
        },
    }

    session.finish().await;
    Ok(())
}

fn set_enabled(session: &mut Session, enabled: bool) -> Result<(), Box<dyn std::error::Error>> {
    session.config.set("reminders.enabled", &enabled.to_string())?;
    session.tracker.set_reminders_enabled(enabled);
    Ok(())
}
