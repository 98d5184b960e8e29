use anyhow::Context;
use std::sync::Arc;
use voxquery_client::retry::{DEFAULT_INITIAL_DELAY, DEFAULT_RETRIES};
use voxquery_client::{ApiClient, AuthRedirect, KeyringStore, SessionStore, retry_with_backoff};
use voxquery_core::config::ClientConfig;
use voxquery_core::error::{ApiError, format_error};
use voxquery_core::types::UploadFile;

struct LoginPrompt;

impl AuthRedirect for LoginPrompt {
    fn redirect_to_login(&self) {
        // A terminal has no login view to navigate to; tell the user what
        // the redirect would have done.
        eprintln!("Session expired. Run `voxquery login <token>` to sign in again.");
    }
}

fn usage() -> ! {
    eprintln!(
        "usage: voxquery <command>\n\
         \n\
         commands:\n\
         \x20 health               check backend availability\n\
         \x20 search <question>    query the indexed documents\n\
         \x20 ingest <file.pdf>    upload a PDF for indexing\n\
         \x20 login <token>        store a session token\n\
         \x20 logout               clear the stored session token\n\
         \n\
         Set VOXQUERY_API_URL to override the backend (default http://localhost:3001)."
    );
    std::process::exit(2);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let store = Arc::new(KeyringStore);

    // Token commands don't need a client.
    match args.first().map(String::as_str) {
        Some("login") => {
            let token = args.get(1).map(String::as_str).unwrap_or_else(|| usage());
            store.set(token).context("store session token")?;
            println!("Session token stored.");
            return Ok(());
        }
        Some("logout") => {
            store.clear().context("clear session token")?;
            println!("Session token cleared.");
            return Ok(());
        }
        _ => {}
    }

    let cfg = ClientConfig::from_env();
    let client = ApiClient::new(&cfg, store, Arc::new(LoginPrompt))?;

    match args.first().map(String::as_str) {
        Some("health") => {
            // The backend may still be warming up; give it a few tries.
            let health = retry_with_backoff(
                || client.health(),
                DEFAULT_RETRIES,
                DEFAULT_INITIAL_DELAY,
            )
            .await
            .map_err(report)?;
            println!(
                "{} ({} documents indexed) at {}",
                health.status,
                health.documents_indexed,
                client.base_url()
            );
        }
        Some("search") => {
            let query = args.get(1).map(String::as_str).unwrap_or_else(|| usage());
            let resp = client.search(query).await.map_err(report)?;
            println!("{}", resp.answer);
            for source in &resp.sources {
                match source.page {
                    Some(page) => println!("  - {} p.{}: {}", source.document, page, source.snippet),
                    None => println!("  - {}: {}", source.document, source.snippet),
                }
            }
        }
        Some("ingest") => {
            let path = args.get(1).map(String::as_str).unwrap_or_else(|| usage());
            let bytes = std::fs::read(path).with_context(|| format!("read file: {path}"))?;
            let filename = std::path::Path::new(path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.pdf")
                .to_string();

            let receipt = client
                .ingest(&UploadFile {
                    filename,
                    mime_type: "application/pdf".into(),
                    bytes,
                })
                .await
                .map_err(report)?;
            println!(
                "Ingested {}: {} pages, {} chunks indexed",
                receipt.document_id, receipt.pages, receipt.chunks_indexed
            );
        }
        _ => usage(),
    }

    Ok(())
}

/// Turns a client failure into the message a user should see, keeping the
/// original chain for `RUST_LOG`-level debugging.
fn report(err: anyhow::Error) -> anyhow::Error {
    if let Some(api_err) = err.downcast_ref::<ApiError>() {
        log::debug!("api call failed: {err:#}");
        return anyhow::anyhow!("{}", format_error(api_err));
    }
    err
}
