use std::io::{self, BufRead, Write};

use clap::Parser;

use folio_cli::ConfigArgs;
use folio_core::logging::init_tracing;
use folio_responder::{AppContext, Responder};

#[derive(Parser, Debug)]
#[command(name = "folio-chat", about = "Ask questions about the résumé from the terminal")]
struct ChatCli {
    #[command(flatten)]
    config: ConfigArgs,

    /// Answer a single question and exit; omit for an interactive session
    #[arg(long)]
    query: Option<String>,

    /// Print the assembled prompt instead of calling the model
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("warn");
    let cli = ChatCli::parse();
    let config = cli.config.load()?;
    let ctx = AppContext::bootstrap(&config)?;
    let responder = ctx.responder();

    if let Some(query) = cli.query {
        if cli.dry_run {
            println!("{}", dry_run(&responder, &query)?);
        } else {
            println!("{}", responder.respond(&query).await);
        }
        return Ok(());
    }

    println!("💬 Ask about {}'s résumé (empty line or 'exit' to quit)", ctx.settings.responder.subject_name);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else { break };
        let line = line?;
        let query = line.trim();
        if query.is_empty() || query.eq_ignore_ascii_case("exit") || query.eq_ignore_ascii_case("quit") {
            break;
        }
        if cli.dry_run {
            println!("{}\n", dry_run(&responder, query)?);
        } else {
            println!("{}\n", responder.respond(query).await);
        }
    }
    Ok(())
}

/// The prompt the model would receive, or the validation message for a blank query.
fn dry_run(responder: &Responder, query: &str) -> anyhow::Result<String> {
    if query.trim().is_empty() {
        return Ok(responder.options().empty_query_message.clone());
    }
    Ok(responder.prepare(query)?.render())
}
