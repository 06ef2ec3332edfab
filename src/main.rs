// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use std::env;
use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use riffsmith::content::{AudioReference, NoteEvent, SongContent, TheoryContent};
use riffsmith::media::{AudioProber, MediaBlob};
use riffsmith::remote::{ServerResult, SimulatedRemote};
use riffsmith::services::{FixedConfirmation, InMemorySongService, StaticAuth};
use riffsmith::{Content, ContentType, EditorConfig, EditorError, EditorOrchestrator, EditorServices, ErrorKind};
use tracing_subscriber::EnvFilter;

const DEMO_ATTEMPTS: usize = 3;

fn print_usage() {
    println!("RIFFSMITH - Lesson Content Editor");
    println!();
    println!("Usage: riffsmith [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --probe <FILE>          Print duration and metadata of an audio file");
    println!("  --demo [CONFIG]         Author and publish a theory lesson and a song");
    println!("                          against the simulated backend");
    println!("  --print-config          Print the default configuration as YAML");
    println!("  --help                  Show this help message");
}

fn guess_mime_type(path: &str) -> &'static str {
    match path.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).as_deref() {
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("ogg") => "audio/ogg",
        Some("flac") => "audio/flac",
        Some("m4a") | Some("mp4") => "audio/mp4",
        Some("aac") => "audio/aac",
        _ => "application/octet-stream",
    }
}

async fn probe_file(path: &str) -> Result<()> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read audio file: {}", path))?;
    let name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());
    let blob = MediaBlob::new(name, guess_mime_type(path), data);

    let metadata = AudioProber::symphonia().probe(&blob).await?;
    println!("{}", serde_json::to_string_pretty(&metadata)?);
    Ok(())
}

/// Retry an operation that failed on the backend; everything else is final
async fn with_retries<F, Fut>(label: &str, mut operation: F) -> riffsmith::Result<ServerResult>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = riffsmith::Result<ServerResult>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Err(e) if e.kind() == ErrorKind::Remote && attempt < DEMO_ATTEMPTS => {
                println!("  {} failed ({}), retrying...", label, e);
                attempt += 1;
            }
            other => return other,
        }
    }
}

fn report(label: &str, result: &riffsmith::Result<ServerResult>) {
    match result {
        Ok(server) => println!(
            "  {}: {} {}",
            label,
            server.message.as_deref().unwrap_or("ok"),
            server.data_str("path").unwrap_or("")
        ),
        Err(e) => println!("  {} failed [{:?}]: {}", label, e.kind(), e),
    }
}

async fn run_demo(config: EditorConfig) -> Result<()> {
    let songs = Arc::new(InMemorySongService::new());
    let services = EditorServices::new(
        Arc::new(FixedConfirmation::new(true)),
        Arc::new(StaticAuth::signed_in("demo-author")),
        Arc::new(SimulatedRemote::new(config.simulator.clone())),
        songs.clone(),
    );
    let editor = EditorOrchestrator::new(config, services);

    println!("Theory lesson");
    editor.change_content_type(ContentType::Theory).await?;
    editor.update_content(Content::Theory(TheoryContent {
        body: Some("Intervals measure the distance between two notes.".to_string()),
    }))?;
    println!("  progress: {}%", editor.progress());
    report("save", &with_retries("save", || editor.save()).await);
    report("publish", &with_retries("publish", || editor.publish()).await);

    println!("Song");
    editor.change_content_type(ContentType::Song).await?;
    editor.update_content(Content::Song(SongContent {
        audio: Some(AudioReference {
            source: "demo://smoke-on-the-water.mp3".to_string(),
            name: "smoke-on-the-water.mp3".to_string(),
            mime_type: "audio/mpeg".to_string(),
            size_bytes: 3_200_000,
            duration_secs: 200.0,
        }),
        ..Default::default()
    }))?;
    editor.navigate_step(2)?;
    editor.update_content(Content::Song(SongContent {
        notes: Some(vec![
            NoteEvent::new(0.0, 43, 0.5),
            NoteEvent::new(0.5, 46, 0.5),
            NoteEvent::new(1.0, 48, 0.75),
            NoteEvent::new(2.0, 43, 0.5),
        ]),
        ..Default::default()
    }))?;
    editor.navigate_step(3)?;
    editor.update_content(Content::Song(SongContent {
        title: Some("Smoke Riff".to_string()),
        ..Default::default()
    }))?;
    println!("  progress: {}%", editor.progress());

    let published = editor.publish().await;
    report("publish", &published);
    if let Err(EditorError::DependentEntity { song_id, .. }) = &published {
        println!("  song {} is left without a sequence", song_id);
    }
    println!("  songs stored: {}, sequences stored: {}", songs.songs().len(), songs.sequences().len());

    let session = editor.session();
    for warning in &session.warnings {
        println!("  warning: {}", warning);
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&session)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("RIFFSMITH - Lesson Content Editor");
        println!("Run with --help for usage information");
        return Ok(());
    }

    match args[1].as_str() {
        "--probe" => {
            if args.len() < 3 {
                eprintln!("Error: --probe requires a file path");
                std::process::exit(1);
            }
            probe_file(&args[2]).await?;
        }
        "--demo" => {
            let config = match args.get(2) {
                Some(path) => EditorConfig::load(path)?,
                None => EditorConfig::default(),
            };
            run_demo(config).await?;
        }
        "--print-config" => {
            print!("{}", EditorConfig::default().to_yaml()?);
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[1]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
