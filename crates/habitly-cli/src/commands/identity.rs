use clap::Subcommand;
use habitly_core::catalog::find_template;
use habitly_core::entitlement::check_add_identity;
use habitly_core::model::DEFAULT_ICON;
use habitly_core::{Identity, IdentityPatch};
use uuid::Uuid;

use super::print_json;
use crate::session::Session;

#[derive(Subcommand)]
pub enum IdentityAction {
    /// Create an identity
    Add {
        /// Label (e.g. "Reader"); optional with --template
        label: Option<String>,
        /// Icon glyph
        #[arg(long)]
        icon: Option<String>,
        /// Start from a catalog template (id or label)
        #[arg(long)]
        template: Option<String>,
    },
    /// List identities with today's status
    List,
    /// Change label or icon
    Edit {
        id: String,
        #[arg(long)]
        label: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Delete an identity and all its habits
    Delete { id: String },
}

pub async fn run(action: IdentityAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open()?;

    match action {
        IdentityAction::Add {
            label,
            icon,
            template,
        } => {
            let identity = match (template, label) {
                (Some(key), label) => {
                    let template =
                        find_template(&key).ok_or_else(|| format!("unknown template: {key}"))?;
                    let mut identity = template.instantiate();
                    if let Some(label) = label {
                        identity.label = label;
                    }
                    identity
                }
                (None, Some(label)) => Identity::new(
                    Uuid::new_v4().to_string(),
                    label,
                    DEFAULT_ICON.to_string(),
                ),
                (None, None) => return Err("a label or --template is required".into()),
            };
            let identity = match icon {
                Some(icon) => Identity { icon, ..identity },
                None => identity,
            };

            if identity.label.trim().is_empty() {
                return Err("label must not be empty".into());
            }
            if session.tracker.snapshot().iter().any(|i| i.id == identity.id) {
                return Err(format!("identity already exists: {}", identity.id).into());
            }
            check_add_identity(&session.entitlement, &session.tracker.snapshot())?;

            session.tracker.add_identity(identity.clone());
            print_json(&identity)?;
        }
        IdentityAction::List => {
            print_json(&session.tracker.identities())?;
        }
        IdentityAction::Edit { id, label, icon } => {
            let patch = IdentityPatch { label, icon };
            if !session.tracker.snapshot().iter().any(|i| i.id == id) {
                return Err(format!("unknown identity: {id}").into());
            }
            session.tracker.edit_identity(&id, &patch);
            println!("ok");
        }
        IdentityAction::Delete { id } => {
            if !session.tracker.delete_identity(&id) {
                return Err(format!("unknown identity: {id}").into());
            }
            println!("identity deleted: {id}");
        }
    }

    session.finish().await;
    Ok(())
}
