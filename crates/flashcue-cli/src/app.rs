//! Composition root for a console Listen-Mode session.
//!
//! Loads the deck, wires the speech adapter into a session controller, then
//! forwards typed commands to the session until `quit` or end of input.

use std::ops::ControlFlow;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use flashcue_core::{CardFilter, CardSource, SessionEvent, SessionState, SpeechPort, StudyItem};
use flashcue_session::{EngineConfig, Intent, SessionController, SessionHandle};
use flashcue_speech::{SpeechAdapter, SpeechAdapterConfig, SpeechBackend, UnavailableBackend};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use crate::console::ConsoleBackend;
use crate::deck::JsonDeckSource;
use crate::parser::Cli;
use crate::presentation::{describe, format_voices, render_event};
use crate::repl::{HELP, ReplCommand};

pub async fn run(cli: Cli) -> Result<()> {
    let engine = load_engine_config(cli.engine_config.as_deref())?;
    let source = JsonDeckSource::from_path(&cli.library)?;
    let deck = source.deck(&cli.deck).ok_or_else(|| {
        anyhow!(
            "Deck '{}' not found (available: {})",
            cli.deck,
            source.deck_ids().join(", ")
        )
    })?;
    let deck_name = deck.name.clone();
    let settings = cli.playback_settings(deck.shuffle_cards);

    let items = load_items(&source, &cli.deck, &cli.filter()).await?;
    let count = items.len();

    let speech = build_speech(cli.mute, &engine);
    let (handle, events) = SessionController::spawn(items, settings, Arc::clone(&speech), engine)?;
    let printer = tokio::spawn(print_events(events, handle.subscribe()));

    println!("Listen Mode: {deck_name} ({count} cards). Type 'help' for commands.");
    if cli.autoplay {
        handle.play().await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<ReplCommand>() {
            Ok(command) => {
                if execute(&handle, speech.as_ref(), command).await?.is_break() {
                    break;
                }
            }
            Err(message) => println!("{message}"),
        }
    }

    handle.shutdown().await;
    if let Err(e) = printer.await {
        tracing::debug!(error = %e, "Event printer ended abnormally");
    }
    Ok(())
}

/// Load a deck's cards and apply the caller-side pre-filter.
///
/// Fails when the filter leaves nothing to study, since a session cannot
/// start without items.
pub async fn load_items(
    source: &dyn CardSource,
    deck_id: &str,
    filter: &CardFilter,
) -> Result<Vec<StudyItem>> {
    let records = source
        .load_cards_for_deck(deck_id)
        .await
        .with_context(|| format!("Failed to load cards for deck '{deck_id}'"))?;
    let items = filter.apply(&records);

    tracing::debug!(
        deck_id,
        loaded = records.len(),
        kept = items.len(),
        "Cards loaded"
    );

    if items.is_empty() {
        if filter.is_empty() {
            bail!("Deck '{deck_id}' has no cards");
        }
        bail!("No cards in deck '{deck_id}' match the filter");
    }
    Ok(items)
}

pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read engine config {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Invalid engine config {}", path.display()))
}

fn build_speech(mute: bool, engine: &EngineConfig) -> Arc<dyn SpeechPort> {
    let backend: Arc<dyn SpeechBackend> = if mute {
        Arc::new(UnavailableBackend)
    } else {
        Arc::new(ConsoleBackend::new())
    };
    let config = SpeechAdapterConfig {
        keepalive_interval: engine.keepalive_interval(),
        voice_load_timeout: engine.voice_load_timeout(),
    };
    Arc::new(SpeechAdapter::with_config(backend, config))
}

/// Run one typed command against the session.
pub async fn execute(
    handle: &SessionHandle,
    speech: &dyn SpeechPort,
    command: ReplCommand,
) -> Result<ControlFlow<()>> {
    match command {
        ReplCommand::Intent(intent) => {
            let is_setting = matches!(
                intent,
                Intent::SetVoice(_)
                    | Intent::SetPauseDuration(_)
                    | Intent::SetVolume(_)
                    | Intent::SetRate(_)
                    | Intent::SetPitch(_)
                    | Intent::SetLoopMode(_)
                    | Intent::ToggleShuffle
            );
            let state = handle.send(intent).await?;
            if is_setting {
                println!("{}", describe(&state));
            }
        }
        ReplCommand::Status => println!("{}", describe(&handle.state())),
        ReplCommand::Voices { refresh } => {
            let voices = if refresh {
                speech.refresh_voices().await
            } else {
                speech.list_voices().await
            };
            let selected = handle.state().settings.voice_id;
            println!("{}", format_voices(&voices, selected.as_deref()));
        }
        ReplCommand::Help => println!("{HELP}"),
        ReplCommand::Quit => return Ok(ControlFlow::Break(())),
    }
    Ok(ControlFlow::Continue(()))
}

async fn print_events(
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    state: watch::Receiver<SessionState>,
) {
    while let Some(event) = events.recv().await {
        tracing::trace!(event = event.label(), "Session event");
        let snapshot = state.borrow().clone();
        if let Some(line) = render_event(&event, &snapshot) {
            println!("{line}");
        }
    }
}
