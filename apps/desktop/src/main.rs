use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{
    FormField, HttpRegistryClient, LoadOutcome, PhotoFile, RegistrationPage, SubmitOutcome,
    UserListController,
};
use shared::{domain::Position, protocol::User};
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Parser, Debug)]
#[command(about = "Register users and browse the user registry")]
struct Args {
    /// Overrides `api_url` from the config file and environment.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print registered users, following "show more" for the given number of pages.
    List {
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Register a user, then print the reloaded first page.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
        /// Position id, see `positions`.
        #[arg(long)]
        position: String,
        #[arg(long)]
        photo: PathBuf,
    },
    /// Print the selectable positions.
    Positions,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = config::load_settings(args.config.as_deref())?;
    if let Some(api_url) = args.api_url {
        settings.api_url = api_url;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let api = Arc::new(HttpRegistryClient::with_timeout(
        &settings.api_url,
        settings.request_timeout,
    )?);
    let mut page = RegistrationPage::with_user_list(
        api,
        UserListController::with_page_size(settings.page_size),
    );

    match args.command {
        Command::Positions => {
            for position in Position::ALL {
                println!("{}\t{}", position.id(), position.label());
            }
        }
        Command::List { pages } => {
            if page.mount().await == LoadOutcome::Failed {
                bail!("failed to load users from {}", settings.api_url);
            }
            for _ in 1..pages {
                if matches!(page.show_more().await, LoadOutcome::Skipped | LoadOutcome::Failed) {
                    break;
                }
            }
            print_users(page.users().users());
            if page.users().next_page_available() {
                println!("(more users available)");
            }
        }
        Command::Register {
            name,
            email,
            phone,
            position,
            photo,
        } => {
            let photo = PhotoFile::from_path(&photo).await?;
            if !photo.is_jpeg() {
                bail!("photo must be a JPEG image, got {:?}", photo.mime_type);
            }

            page.mount().await;
            let form = page.form_mut();
            form.set_field(FormField::Name, name)?;
            form.set_field(FormField::Email, email)?;
            form.set_field(FormField::Phone, phone)?;
            form.set_field(FormField::Position, position)?;
            form.set_field(FormField::Photo, photo)?;

            match page.submit().await {
                SubmitOutcome::Registered => {
                    println!("{}", page.form().headline());
                    print_users(page.users().users());
                }
                SubmitOutcome::Invalid => {
                    for field in FormField::ALL {
                        if let Some(message) = page.form().visible_error(field) {
                            eprintln!("{field}: {message}");
                        }
                    }
                    bail!("registration form is invalid");
                }
                SubmitOutcome::Failed(err) => bail!("{err}"),
                SubmitOutcome::AlreadySubmitted | SubmitOutcome::InFlight => {
                    bail!("registration is not accepting submissions")
                }
            }
        }
    }

    Ok(())
}

fn print_users(users: &[User]) {
    for user in users {
        println!(
            "{}\t{}\t{}\t{}\t{}",
            user.id, user.name, user.email, user.phone, user.position
        );
    }
}
