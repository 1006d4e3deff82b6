use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use waveshelf_client::{AudioLibrary, CandidateFile, UploadObserver, UploadPipeline};
use waveshelf_core::{AppError, AudioFileRecord, AuthProvider, User};
use waveshelf_rest::RestBackend;

#[derive(Parser, Debug)]
#[command(name = "waveshelf")]
#[command(about = "Manage your audio library from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new account
    SignUp { email: String, password: String },
    /// Verify the credentials from the environment and print the user
    Login,
    /// Upload an audio file
    Upload {
        path: PathBuf,
        /// Override the MIME type guessed from the file extension
        #[arg(long, value_name = "MIME")]
        mime_type: Option<String>,
    },
    /// List your audio files, newest first
    List {
        /// Output format: json or table
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Search file names (case-insensitive substring)
    Search { query: String },
    /// Rename a file's display name
    Rename { id: Uuid, new_name: String },
    /// Delete a file and its stored blob
    Delete { id: Uuid },
    /// Print a temporary playback URL for a file
    Url { id: Uuid },
    /// Print the browser URL for an OAuth sign-in
    OauthUrl {
        /// Provider name, e.g. github or google
        provider: String,
        #[arg(long, default_value = "http://localhost:3000")]
        redirect_to: String,
    },
    /// Request a password-reset email
    ResetPassword { email: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let backend = Arc::new(RestBackend::from_env()?);

    match cli.command {
        Command::SignUp { email, password } => {
            let user = backend.sign_up(&email, &password).await?;
            println!("Signed up {} ({})", user.email, user.id);
            println!("Check your inbox if the backend requires email confirmation.");
        }
        Command::Login => {
            let user = sign_in(&backend).await?;
            println!("Signed in as {} ({})", user.email, user.id);
        }
        Command::Upload { path, mime_type } => {
            let user = sign_in(&backend).await?;
            let record = upload(&backend, &user, &path, mime_type).await?;
            println!("Uploaded {} as {}", record.file_name, record.id);
            println!("  path:     {}", record.file_path);
            println!("  size:     {:.2} MB", record.file_size as f64 / 1024.0 / 1024.0);
            println!("  duration: {:.1}s", record.duration);
        }
        Command::List { format } => {
            let user = sign_in(&backend).await?;
            let library = refreshed_library(&backend, &user).await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(library.files())?),
                _ => print_table(library.files()),
            }
        }
        Command::Search { query } => {
            let user = sign_in(&backend).await?;
            let library = refreshed_library(&backend, &user).await?;
            let hits: Vec<AudioFileRecord> = library.search(&query).into_iter().cloned().collect();
            print_table(&hits);
        }
        Command::Rename { id, new_name } => {
            let user = sign_in(&backend).await?;
            let mut library = refreshed_library(&backend, &user).await?;
            let record = library.rename(id, &new_name).await?;
            println!("Renamed {} to {}", id, record.file_name);
        }
        Command::Delete { id } => {
            let user = sign_in(&backend).await?;
            let mut library = refreshed_library(&backend, &user).await?;
            let record = library.delete(id).await?;
            println!("Deleted {} ({})", record.file_name, record.file_path);
        }
        Command::Url { id } => {
            let user = sign_in(&backend).await?;
            let library = refreshed_library(&backend, &user).await?;
            let signed = library.resolve_playback_url(id).await?;
            println!("{}", signed.url);
            println!("Expires at {}", signed.expires_at);
        }
        Command::OauthUrl {
            provider,
            redirect_to,
        } => {
            println!("{}", backend.oauth_authorize_url(&provider, &redirect_to));
        }
        Command::ResetPassword { email } => {
            backend.request_password_reset(&email).await?;
            println!("Password reset requested for {}", email);
        }
    }

    Ok(())
}

/// Sign in with the credentials from the environment. The backend keeps the
/// session for the rest of the invocation.
async fn sign_in(backend: &RestBackend) -> Result<User> {
    let email = std::env::var("WAVESHELF_EMAIL").context("WAVESHELF_EMAIL is not set")?;
    let password = std::env::var("WAVESHELF_PASSWORD").context("WAVESHELF_PASSWORD is not set")?;
    let session = backend.sign_in_with_password(&email, &password).await?;
    Ok(session.user)
}

async fn refreshed_library(backend: &Arc<RestBackend>, user: &User) -> Result<AudioLibrary> {
    let mut library = AudioLibrary::new(backend.clone(), backend.clone(), user.id);
    library.refresh().await?;
    Ok(library)
}

async fn upload(
    backend: &Arc<RestBackend>,
    user: &User,
    path: &Path,
    mime_type: Option<String>,
) -> Result<AudioFileRecord> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .context("File path has no usable file name")?
        .to_string();
    let mime_type = match mime_type {
        Some(m) => m,
        None => guess_mime_type(&file_name)?,
    };
    let bytes = Bytes::from(
        tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
    );

    let pipeline = UploadPipeline::new(backend.clone(), backend.clone())
        .with_observer(Arc::new(PrintProgress));
    let record = pipeline
        .upload(
            user.id,
            CandidateFile {
                file_name,
                mime_type,
                bytes,
            },
        )
        .await?;
    Ok(record)
}

fn guess_mime_type(file_name: &str) -> Result<String> {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "aac" => "audio/aac",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        _ => {
            return Err(AppError::Validation(format!(
                "Cannot guess MIME type for '{}'; pass --mime-type",
                file_name
            ))
            .into())
        }
    };
    Ok(mime.to_string())
}

struct PrintProgress;

impl UploadObserver for PrintProgress {
    fn on_progress(&self, file_name: &str, percent: u8) {
        println!("{}: {}%", file_name, percent);
    }
}

fn print_table(files: &[AudioFileRecord]) {
    if files.is_empty() {
        println!("No audio files.");
        return;
    }
    println!(
        "{:<36}  {:<40}  {:>9}  {:>8}  {}",
        "ID", "NAME", "SIZE (MB)", "DURATION", "CREATED"
    );
    for file in files {
        println!(
            "{:<36}  {:<40}  {:>9.2}  {:>7.1}s  {}",
            file.id,
            truncate(&file.file_name, 40),
            file.file_size as f64 / 1024.0 / 1024.0,
            file.duration,
            file.created_at.format("%Y-%m-%d %H:%M"),
        );
    }
    println!("{} file(s)", files.len());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
