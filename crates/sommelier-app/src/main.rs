//! Sommelier client binary - composition root.
//!
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Validate the taste profile (config `[profile]` overlaid with flags)
//! 3. Build the HTTP service client
//! 4. Run the interactive conversation, or a one-shot profile recommendation

mod cli;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use sommelier_chat::render::{render_message, render_wine_cards};
use sommelier_chat::{
    ChatError, HttpSommelierService, SessionController, SommelierService, TransportError,
};
use sommelier_core::config::SommelierConfig;
use sommelier_core::types::TasteProfile;

use cli::{CliArgs, Command};

const QUIT_COMMAND: &str = "/quit";

type PendingTurn = JoinHandle<Result<String, TransportError>>;

/// Forward stdin lines until EOF or the receiver goes away.
async fn read_lines(tx: mpsc::Sender<String>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if tx.send(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read from stdin");
                break;
            }
        }
    }
}

/// Resolve the in-flight turn, or never when there is none.
async fn wait_pending(
    pending: &mut Option<PendingTurn>,
) -> Result<String, TransportError> {
    match pending {
        Some(handle) => match handle.await {
            Ok(outcome) => outcome,
            Err(e) => Err(TransportError::Network(e.to_string())),
        },
        None => std::future::pending().await,
    }
}

/// Interactive conversation loop.
///
/// Input keeps being read while a request is in flight; such lines are
/// refused by the controller and reported as busy.
async fn run_chat(mut controller: SessionController) -> Result<(), ChatError> {
    for message in controller.history() {
        println!("{}\n", render_message(message));
    }
    println!("(종료하려면 {} 입력)", QUIT_COMMAND);

    let (tx, mut rx) = mpsc::channel::<String>(16);
    tokio::spawn(read_lines(tx));

    let mut pending: Option<PendingTurn> = None;
    let mut input_closed = false;

    loop {
        tokio::select! {
            outcome = wait_pending(&mut pending) => {
                pending = None;
                let message = controller.complete_turn(outcome)?;
                println!("{}\n", render_message(message));
                if input_closed {
                    break;
                }
            }
            line = rx.recv(), if !input_closed => {
                let Some(line) = line else {
                    input_closed = true;
                    if pending.is_none() {
                        break;
                    }
                    continue;
                };
                if line.trim() == QUIT_COMMAND {
                    break;
                }
                match controller.begin_turn(&line) {
                    Ok(Some(request)) => {
                        let dispatcher = controller.dispatcher();
                        pending = Some(tokio::spawn(async move {
                            dispatcher.dispatch(request).await
                        }));
                        println!("(답변을 기다리는 중...)");
                    }
                    Ok(None) => {}
                    Err(ChatError::Busy) => {
                        println!("이전 질문에 대한 답변을 기다리는 중입니다. 잠시 후 다시 입력해주세요.");
                    }
                    Err(ChatError::MessageTooLong(max)) => {
                        println!("메시지가 너무 깁니다. {}자 이내로 입력해주세요.", max);
                    }
                    Err(e) => return Err(e),
                }
            }
        }
    }

    if let Some(handle) = pending.take() {
        handle.abort();
    }
    if let Some(session) = controller.session() {
        tracing::info!(
            session_id = %session.id,
            history_len = session.store.len(),
            "Conversation ended"
        );
    }
    Ok(())
}

/// One-shot recommendation for the profile, outside of any conversation.
async fn run_recommend(
    service: &dyn SommelierService,
    profile: &TasteProfile,
    timeout: Duration,
    fallback: &str,
) -> Result<(), ChatError> {
    let outcome = match tokio::time::timeout(timeout, service.recommend_for_profile(profile)).await
    {
        Ok(outcome) => outcome,
        Err(_) => Err(TransportError::Timeout(timeout.as_secs())),
    };
    match outcome {
        Ok(wines) if wines.is_empty() => println!("조건에 맞는 와인을 찾지 못했습니다."),
        Ok(wines) => println!("{}", render_wine_cards(&wines)),
        Err(e) => {
            eprintln!("{}", e.user_message(fallback));
            return Err(e.into());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = SommelierConfig::load_or_default(&config_file);
    args.apply(&mut config);

    // Tracing. Chat output owns stdout.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting sommelier v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        path = %config_file.display(),
        base_url = %config.service.base_url,
        timeout_secs = config.service.timeout_secs,
        "Configuration resolved"
    );

    // Taste profile. An invalid profile never starts a conversation.
    let candidate = config.profile.clone().unwrap_or_default();
    let profile = match TasteProfile::submit(candidate) {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %e, "Taste profile rejected");
            eprintln!("취향 프로필이 올바르지 않습니다: {}", e);
            eprintln!(
                "--sweetness/--acidity/--body/--tannin (1-5), --price-min/--price-max 또는 {} 의 [profile] 섹션을 확인하세요.",
                config_file.display()
            );
            std::process::exit(2);
        }
    };

    let timeout = Duration::from_secs(config.service.timeout_secs);
    let service = Arc::new(HttpSommelierService::new(&config.service));

    match args.command() {
        Command::Chat => {
            let mut controller =
                SessionController::new(service, config.chat.clone(), timeout);
            controller.start_session(profile)?;
            run_chat(controller).await?;
        }
        Command::Recommend => {
            run_recommend(
                service.as_ref(),
                &profile,
                timeout,
                &config.chat.error_message,
            )
            .await?;
        }
    }

    Ok(())
}
