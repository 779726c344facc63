//! Vehicle add/edit commands.
//!
//! Both commands drive the same listing screen a person would use: the
//! listing file is applied as form edits, the form is validated, the user
//! confirms, and the result is shown as the feedback modal.
//!
//! # Usage
//!
//! ```bash
//! fleet-cli vehicle create --file camry.yaml
//! fleet-cli vehicle edit --id 42 --file camry.yaml --yes
//! ```

use std::path::Path;

use tokio::io::{AsyncBufReadExt, BufReader};

use fleet_admin::listing::{ListingScreen, ModalSpec, SubmitPhase};
use fleet_admin::services::ImageUploader;
use fleet_admin::{AppError, FleetConfig, SupabaseClient};
use fleet_core::VehicleId;

use crate::listing_file::ListingFile;

use super::CommandError;

/// Add a new vehicle from a listing file.
///
/// # Errors
///
/// Returns an error if the file is invalid, validation fails, or the
/// submission fails.
pub async fn create(config: &FleetConfig, file: &Path, yes: bool) -> Result<(), CommandError> {
    let listing = ListingFile::load(file).await?;
    let client = SupabaseClient::new(config.supabase());

    let mut screen = ListingScreen::new();
    screen.mount(&client).await;

    run_screen(config, &client, screen, listing, file, yes).await
}

/// Apply a listing file over a stored vehicle.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] if the vehicle does not exist, or an
/// error if the file is invalid, validation fails, or the submission fails.
pub async fn edit(
    config: &FleetConfig,
    id: VehicleId,
    file: &Path,
    yes: bool,
) -> Result<(), CommandError> {
    let listing = ListingFile::load(file).await?;
    let client = SupabaseClient::new(config.supabase());

    let screen = ListingScreen::open_vehicle(&client, id).await?;

    run_screen(config, &client, screen, listing, file, yes).await
}

async fn run_screen(
    config: &FleetConfig,
    client: &SupabaseClient,
    mut screen: ListingScreen,
    listing: ListingFile,
    file: &Path,
    yes: bool,
) -> Result<(), CommandError> {
    let base_dir = file.parent().unwrap_or_else(|| Path::new("."));
    listing.apply(&mut screen, base_dir)?;

    println!("Owner: {}", screen.owner_label());
    screen.press_submit().map_err(AppError::from)?;

    let confirmation = screen.modal();
    print_modal(&confirmation);
    if !yes && !prompt(&confirmation.confirm_text).await? {
        screen.cancel_confirmation();
        println!("Cancelled.");
        return Ok(());
    }

    println!("{}", screen.submit_label());
    let uploader = ImageUploader::new(config.supabase().image_prefix.clone());
    let phase = screen.confirm_submit(client, &uploader).await;

    let feedback = screen.modal();
    print_modal(&feedback);
    screen.dismiss_feedback();

    if phase == SubmitPhase::Failed {
        return Err(CommandError::SubmitFailed(feedback.message));
    }
    Ok(())
}

fn print_modal(modal: &ModalSpec) {
    if modal.visible {
        println!("{}\n  {}", modal.title, modal.message);
    }
}

/// Ask a yes/no question on stdin. Anything but `y`/`yes` is a no.
async fn prompt(action: &str) -> Result<bool, CommandError> {
    println!("{action}? [y/N]");

    let mut answer = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut answer)
        .await
        .map_err(CommandError::Prompt)?;

    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
