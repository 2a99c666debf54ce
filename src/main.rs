use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use collection_chat::config::{IdentityPool, WidgetConfig};
use collection_chat::net::chat::{ChatError, HttpChatService};
use collection_chat::net::identity::{IdentityProvider, SessionTokens, StaticSession};
use collection_chat::render::{self, BUSY_LABEL, TRIGGER_LABEL};
use collection_chat::widget::{ChatWidget, SubmitOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http client setup failed: {0}")]
    Chat(#[from] ChatError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "collection-chat", about = "Ask questions about a document collection")]
struct Cli {
    /// Identity token of an already signed-in user.
    #[arg(long, env = "CHAT_ID_TOKEN", hide_env_values = true)]
    id_token: Option<String>,

    #[arg(long, env = "CHAT_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask a single question and print the answer.
    Ask {
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Read questions from stdin. An empty line re-sends the last one;
    /// `:signout` ends the session and `:quit` exits.
    Repl,
}

#[tokio::main]
async fn main() -> Result<ExitCode, CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    let tokens = SessionTokens::from_parts(cli.access_token, cli.id_token);

    let mut widget = ChatWidget::new(Arc::new(HttpChatService::new()?));
    widget.activate(WidgetConfig::from_env(), move |pool: &IdentityPool| {
        Arc::new(StaticSession::new(pool.clone(), tokens)) as Arc<dyn IdentityProvider>
    });

    match cli.command {
        Command::Ask { prompt } => run_ask(&mut widget, prompt.join(" ")).await,
        Command::Repl => run_repl(&mut widget).await,
    }
}

async fn run_ask(widget: &mut ChatWidget, prompt: String) -> Result<ExitCode, CliError> {
    widget.set_input(prompt);
    let outcome = widget.submit().await;
    print_view(widget)?;

    Ok(match outcome {
        SubmitOutcome::Answered => ExitCode::SUCCESS,
        SubmitOutcome::Inactive | SubmitOutcome::Busy | SubmitOutcome::Failed => ExitCode::FAILURE,
    })
}

async fn run_repl(widget: &mut ChatWidget) -> Result<ExitCode, CliError> {
    if widget.is_active() {
        match widget.username().await {
            Some(name) => println!("Hello {name}"),
            None => println!("Hello"),
        }
    } else {
        print_view(widget)?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if widget.is_active() {
            print!("{TRIGGER_LABEL}> ");
            io::stdout().flush()?;
        }
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let line = line.trim();
        match line {
            ":quit" | ":q" => break,
            ":signout" => {
                match widget.sign_out().await {
                    Ok(()) => println!("Signed out"),
                    Err(e) => tracing::warn!(error = %e, "sign out failed"),
                }
                continue;
            }
            _ => {}
        }

        // placeholder only: input is not accepted until activation
        if !widget.is_active() {
            print_view(widget)?;
            continue;
        }
        if !line.is_empty() {
            widget.set_input(line);
        }

        eprintln!("[{BUSY_LABEL}]");
        widget.submit().await;
        print_view(widget)?;
    }

    Ok(ExitCode::SUCCESS)
}

fn print_view(widget: &ChatWidget) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", render::view(widget))?;
    stdout.flush()?;
    Ok(())
}
