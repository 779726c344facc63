//! Owner listing command.
//!
//! # Usage
//!
//! ```bash
//! fleet-cli owners
//! ```

use fleet_admin::listing::owner_picker::NO_OWNERS_MESSAGE;
use fleet_admin::{FleetConfig, SupabaseClient};

use super::CommandError;

/// Print active owners ordered by name.
///
/// # Errors
///
/// Returns an error if the owners cannot be fetched.
pub async fn list(config: &FleetConfig) -> Result<(), CommandError> {
    let client = SupabaseClient::new(config.supabase());
    let owners = client.list_active_owners().await?;

    if owners.is_empty() {
        println!("{NO_OWNERS_MESSAGE}");
        return Ok(());
    }

    for owner in &owners {
        let initial = owner.initial().unwrap_or('?');
        let email = owner.email.as_deref().unwrap_or("-");
        println!("{:>6}  [{initial}] {}  <{email}>", owner.id, owner.name);
    }
    tracing::info!(count = owners.len(), "Listed owners");
    Ok(())
}
