//! Run with: cargo run -p osusume-api --example dashboard
//!
//! Walks the onboarding and dashboard flows end to end: likes an item to
//! seed similar suggestions, requests category/genre recommendations (the
//! remote service at the configured base URL degrades to sample data when
//! it isn't running), and records a history entry. Also shows host wiring
//! of the onboarding hooks onto storage flags.

use std::rc::Rc;

use osusume_api::client::RecommendationClient;
use osusume_api::fallback::FallbackFetcher;
use osusume_core::catalog::Catalog;
use osusume_core::config::AppConfig;
use osusume_core::ledger::{EntryDraft, HistoryLedger};
use osusume_core::models::{Category, Item};
use osusume_core::session::{RequestContext, Session, SessionHooks};
use osusume_core::similar::GenreMatch;
use osusume_core::storage::{Storage, FLAG_ONBOARDING_COMPLETE};

/// Host-side hook wiring: onboarding milestones become storage flags.
struct FlagHooks {
    storage: Rc<Storage>,
}

impl SessionHooks for FlagHooks {
    fn on_onboarding_finished(&mut self) {
        if let Err(err) = self.storage.set_flag(FLAG_ONBOARDING_COMPLETE, true) {
            eprintln!("failed to persist onboarding flag: {err}");
        }
    }
}

fn print_batch(label: &str, batch: &[Item]) {
    println!("{label}");
    if batch.is_empty() {
        println!("  (no matches)");
    }
    for item in batch {
        println!("  {} [{}]", item.title, item.genre);
    }
    println!();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = AppConfig::default();
    let storage = Rc::new(Storage::open_memory()?);
    let mut session = Session::with_hooks(
        Catalog::sample(),
        Box::new(FlagHooks {
            storage: storage.clone(),
        }),
    );

    // Onboarding: like a movie, get similar suggestions.
    session.select_category(Category::Movies);
    let inception = session
        .catalog()
        .items(Category::Movies)
        .iter()
        .find(|i| i.title == "Inception")
        .cloned()
        .ok_or("Inception missing from sample catalog")?;
    session.like_item(&inception, &GenreMatch);
    print_batch("Because you liked Inception:", session.batch());

    session.finish_onboarding();
    println!(
        "onboarding complete flag: {}\n",
        storage.get_flag(FLAG_ONBOARDING_COMPLETE)?
    );

    // Record some history; it rides along as request context.
    let mut ledger = HistoryLedger::new();
    ledger.add_entry(EntryDraft {
        title: "Dune".into(),
        media_type: "Books".into(),
        genre: Some("Sci-Fi".into()),
        rating: Some(5),
    });

    // Dashboard: category + genre scoped fetch, degrading to sample data
    // when the remote service is unreachable.
    let client =
        RecommendationClient::with_timeout(&config.api.base_url, config.api.timeout_secs)?;
    let fetcher = FallbackFetcher::new(client);
    let ctx = RequestContext {
        access_token: storage.get_token()?,
        history: ledger.entries().to_vec(),
    };

    session.select_category(Category::Movies);
    session.select_genre("Sci-Fi");
    session.request_recommendations(&fetcher, &ctx).await;
    print_batch("Sci-Fi movie recommendations:", session.batch());
    if let Some(origin) = session.origin() {
        println!("source: {origin:?}");
    }

    Ok(())
}
