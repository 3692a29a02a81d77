//! Flipdeck - Flashcards in the terminal from published CSV
//!
//! Fetches a question/answer deck, then lets you page through it, flip cards,
//! and mark the ones to revisit.

use anyhow::{Context, Result};
use argh::FromArgs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::warn;

use flipdeck::app::{App, Phase, Settings};
use flipdeck::events::{event_channel, AppEvent};
use flipdeck::session::{create_session, CardColumns};
use flipdeck::source::{FetchOptions, Source};
use flipdeck::tui::Tui;
use flipdeck::{logging, tabular};

/// Flipdeck - flashcards from a published CSV deck
#[derive(FromArgs)]
struct Args {
    /// deck source: an http(s) URL, a CSV file path, or - for stdin
    #[argh(positional)]
    source: String,

    /// column holding the question text (default: question)
    #[argh(option, short = 'q', default = "String::from(\"question\")")]
    question_column: String,

    /// column holding the answer text (default: answer)
    #[argh(option, short = 'a', default = "String::from(\"answer\")")]
    answer_column: String,

    /// card slide duration in milliseconds (default: 300)
    #[argh(option, default = "300")]
    transition_ms: u64,

    /// switch cards without the slide animation
    #[argh(switch)]
    no_animation: bool,

    /// timeout for HTTP fetches in seconds (default: 30)
    #[argh(option, default = "30")]
    timeout: u64,

    /// write logs to this file
    #[argh(option)]
    log_file: Option<PathBuf>,

    /// print the parsed deck as JSON and exit (no TUI)
    #[argh(switch, short = 'd')]
    dump: bool,
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    // Stderr belongs to the TUI unless we're dumping
    logging::init(args.log_file.as_deref(), args.dump)?;

    let source = Source::parse(&args.source);
    let options = FetchOptions {
        timeout: Duration::from_secs(args.timeout),
    };
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    // Headless mode, no TUI
    if args.dump {
        return runtime.block_on(run_dump_mode(&source, &options));
    }

    let columns = CardColumns {
        question: args.question_column,
        answer: args.answer_column,
    };
    let settings = Settings {
        transition: Duration::from_millis(args.transition_ms),
        animate: !args.no_animation,
    };
    let mut app = App::new(source.display_name(), settings);

    // Fetch in the background while the loading screen is up
    let (tx, mut rx) = event_channel();
    runtime.spawn(async move {
        let result = create_session(source.fetch(&options), columns).await;
        let _ = tx.send(AppEvent::Loaded(result));
    });

    let mut tui = Tui::new()?;

    // Main event loop
    loop {
        while let Ok(event) = rx.try_recv() {
            app.handle_event(event);
        }

        app.tick(Instant::now());
        tui.draw(&app)?;

        if let Some(action) = tui.next_action(&app, Duration::from_millis(16))? {
            app.apply(action, Instant::now());
        }

        if app.should_quit {
            break;
        }
    }

    tui.restore()?;
    // Don't wait on a fetch still in progress
    runtime.shutdown_background();

    match app.phase {
        Phase::Ready(session) => {
            eprintln!(
                "✓ {} of {} cards marked this session",
                session.marked_count(),
                session.len()
            );
        }
        Phase::Failed(err) => return Err(err).context("Failed to load deck"),
        Phase::Loading => {}
    }
    eprintln!("👋 Goodbye!");

    Ok(())
}

/// Fetch and parse the deck, then print it as JSON
async fn run_dump_mode(source: &Source, options: &FetchOptions) -> Result<()> {
    eprintln!("📂 Fetching {}...", source.display_name());

    let text = source
        .fetch(options)
        .await
        .with_context(|| format!("Failed to fetch deck from {}", source.display_name()))?;

    let records = tabular::parse(&text);
    if records.is_empty() {
        warn!("Deck from {} has no cards", source.display_name());
    }
    eprintln!(
        "✓ Parsed {} cards with columns: {}",
        records.len(),
        records.headers().join(", ")
    );

    let json = serde_json::to_string_pretty(&records).context("Failed to serialize deck")?;
    println!("{}", json);

    Ok(())
}
