//! Interactive chat against the configured provider
//!
//! Tool calls the model makes are translated and printed; nothing runs
//! against the cluster.

use std::sync::Arc;

use anyhow::Result;
use kubebridge_core::{Assistant, Translator, TurnRole};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Commands:
  help     show this message
  history  show the conversation so far
  clear    forget the conversation
  exit     leave (also: quit)
Anything else is sent to the model.";

pub async fn run(assistant: Arc<Assistant>, translator: Translator) -> Result<()> {
    let provider = assistant.provider();
    println!(
        "kubebridge chat ({} / {}). Type 'help' for commands.",
        provider.name(),
        provider.model()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        eprint!("> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();

        match line {
            "" => continue,
            "exit" | "quit" => break,
            "help" => println!("{}", HELP),
            "clear" => {
                assistant.clear_history();
                println!("History cleared.");
            }
            "history" => {
                for turn in assistant.history() {
                    let who = match turn.role {
                        TurnRole::User => "you",
                        TurnRole::Assistant => "assistant",
                    };
                    println!("{:>9}: {}", who, turn.content);
                }
            }
            query => match assistant.process(query).await {
                Ok(response) => {
                    if !response.content.trim().is_empty() {
                        println!("{}", response.content.trim());
                    }
                    for call in &response.tool_calls {
                        match translator.translate(call) {
                            Ok(command) => println!("  $ {}", command),
                            Err(err) => println!("  ! {}: {}", call.name, err),
                        }
                    }
                }
                Err(err) => eprintln!("error: {}", err),
            },
        }
    }
    Ok(())
}
