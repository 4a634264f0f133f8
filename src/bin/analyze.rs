use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::warn;

use text_analysis::form::{FormController, SubmitOutcome};
use text_analysis::terminal::TerminalView;
use text_analysis::{Config, HttpTransport};

/// Submit text to the analysis server and print sentiment, translation and chat
#[derive(Debug, Parser)]
#[command(name = "analyze")]
struct Args {
    /// Server base URL
    #[arg(long, env = "ANALYZE_ENDPOINT")]
    endpoint: Option<String>,

    /// Source language code
    #[arg(long, short)]
    source: Option<String>,

    /// Target language code
    #[arg(long, short)]
    target: Option<String>,

    /// Give up on a request after this many seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Text to analyze. Reads one submission per line from stdin when omitted.
    text: Vec<String>,
}

/// Why the stdin loop stopped
#[derive(Debug, PartialEq, Eq)]
enum Exit {
    EndOfInput,
    Interrupted,
}

#[tokio::main]
async fn main() -> Result<()> {
    text_analysis::init_tracing("text_analysis=warn");
    let args = Args::parse();

    let (config, _) = Config::discover()?;
    let mut client_config = config.client_config;
    if let Some(endpoint) = args.endpoint {
        client_config.endpoint = endpoint;
    }
    if let Some(timeout) = args.timeout {
        client_config.timeout_secs = Some(timeout);
    }

    let view = Arc::new(TerminalView::new(
        args.source.as_deref().unwrap_or(&client_config.source_lang),
        args.target.as_deref().unwrap_or(&client_config.target_lang),
    ));
    let transport = Arc::new(HttpTransport::from_config(&client_config));
    let controller = FormController::new(view.clone(), transport);

    if !args.text.is_empty() {
        view.enter_text(&args.text.join(" "));
        submit(&controller, &view, interrupted()).await;
        return Ok(());
    }

    let stdin = BufReader::new(tokio::io::stdin());
    if run_lines(&controller, &view, stdin, interrupted).await? == Exit::Interrupted {
        eprintln!("interrupted");
    }
    Ok(())
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Ctrl-C handler unavailable, requests cannot be cancelled: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Submit each line of `input`. An interrupt while waiting for a line ends
/// the loop; an interrupt during a request cancels only that request.
async fn run_lines<R, F, I>(
    controller: &FormController,
    view: &TerminalView,
    input: R,
    interrupt: F,
) -> Result<Exit>
where
    R: AsyncBufRead + Unpin,
    F: Fn() -> I,
    I: Future<Output = ()>,
{
    let mut lines = input.lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => return Ok(Exit::Interrupted),
        };
        let Some(line) = line else {
            return Ok(Exit::EndOfInput);
        };
        view.enter_text(&line);
        submit(controller, view, interrupt()).await;
    }
}

async fn submit(controller: &FormController, view: &TerminalView, cancel: impl Future<Output = ()>) {
    if controller.submit_until(cancel).await == SubmitOutcome::Cancelled {
        eprintln!("cancelled");
        return;
    }
    print!("{}", view.report());
}
