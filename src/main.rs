use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use domovoy::config::DEFAULT_BASE_URL;
use domovoy::media::{AudioSink, AudioSource, FileFrameSource, MicrophoneSource, Speaker};
use domovoy::{Backend, Config, ConversationLog, HttpGateway, Sender, SessionController};

/// Domovoy - accessible resident-assistant chat client
#[derive(Parser)]
#[command(name = "domovoy", version, about)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "DOMOVOY_URL", default_value = DEFAULT_BASE_URL)]
    url: String,

    /// Gesture sampling interval in milliseconds
    #[arg(long, env = "DOMOVOY_GESTURE_INTERVAL_MS", default_value = "1000")]
    gesture_interval_ms: u64,

    /// Speak successful replies through the TTS endpoint
    #[arg(long, env = "DOMOVOY_SPEAK")]
    speak: bool,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone capture
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Synthesize a line through the backend and play it
    TestTts {
        /// Text to speak
        #[arg(default_value = "Здравствуйте! Проверка синтеза речи.")]
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = Config::new(&cli.url)
        .with_gesture_interval(Duration::from_millis(cli.gesture_interval_ms))
        .with_speak(cli.speak);

    match cli.command {
        Some(Command::TestMic { duration }) => test_mic(duration).await,
        Some(Command::TestTts { text }) => test_tts(&config, &text).await,
        None => chat(config).await,
    }
}

/// Interactive chat loop over stdin
async fn chat(config: Config) -> Result<()> {
    let backend: Arc<dyn Backend> = Arc::new(HttpGateway::new(&config.base_url));
    let log = ConversationLog::new();

    let mut controller = SessionController::new(Arc::clone(&backend), log.clone(), &config);
    if config.speak {
        controller = controller.with_speaker(Arc::new(Speaker::new()));
    }

    // Display loop: print every appended message as it arrives
    let display_log = log.clone();
    let mut revision = log.subscribe();
    tokio::spawn(async move {
        let mut printed = 0usize;
        loop {
            for message in display_log.messages_since(printed) {
                let who = match message.sender {
                    Sender::User => "вы",
                    Sender::Assistant => "домовой",
                };
                println!("[{}] {who}: {}", message.timestamp.format("%H:%M:%S"), message.text);
                printed += 1;
            }
            if revision.changed().await.is_err() {
                break;
            }
        }
    });

    log.append(Sender::Assistant, domovoy::strings::WELCOME);
    println!(
        "Команды: /rec и /stop — голос, /sign <папка с кадрами> — жесты, /text — текст, /quit — выход"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.as_str() {
            "" => {}
            "/quit" => break,
            "/text" => controller.set_mode(domovoy::InputMode::Text).await,
            "/rec" => {
                // Acquisition errors already land in the log
                let _ = controller
                    .start_recording(Box::new(MicrophoneSource::new()))
                    .await;
            }
            "/stop" => {
                controller.stop_recording().await;
                controller.stop_streaming().await;
            }
            _ if line.starts_with("/sign") => {
                let dir = line
                    .strip_prefix("/sign")
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .unwrap_or("frames");
                let _ = controller
                    .start_streaming(Box::new(FileFrameSource::new(dir)))
                    .await;
            }
            _ => controller.submit_text(&line).await,
        }
    }

    controller.teardown().await;
    Ok(())
}

/// Record from the default microphone and report what was captured
async fn test_mic(duration: u64) -> Result<()> {
    println!("Recording for {duration}s...");

    let mut source = MicrophoneSource::new();
    let mut chunks = source.start()?;

    tokio::time::sleep(Duration::from_secs(duration)).await;
    source.stop();

    let mut count = 0usize;
    let mut bytes = 0usize;
    while let Some(chunk) = chunks.recv().await {
        count += 1;
        bytes += chunk.len();
    }

    println!("Captured {count} chunks, {bytes} bytes of PCM");
    Ok(())
}

/// Synthesize one line through the backend TTS and play it
async fn test_tts(config: &Config, text: &str) -> Result<()> {
    let gateway = HttpGateway::new(&config.base_url);
    let audio = gateway.synthesize_speech(text).await?;
    println!("Received {} audio bytes, playing...", audio.len());

    Speaker::new().play(&audio).await?;
    Ok(())
}
