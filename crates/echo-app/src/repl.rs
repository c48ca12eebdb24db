//! Interactive terminal chat.
//!
//! Owns the read-submit-pump loop around the session coordinator. Slash
//! commands manage sessions; anything else is sent as a prompt and the
//! reply is printed fragment by fragment as it streams in.

use std::io::Write;
use std::time::Duration;

use tokio::io::AsyncBufReadExt;

use echo_core::coordinator::{ExchangePhase, SessionCoordinator};
use echo_types::message::Role;
use echo_types::{ChatError, Result};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

enum ReplCommand<'a> {
    Quit,
    New,
    List,
    Switch(&'a str),
    Delete(&'a str),
    Help,
    Submit(&'a str),
    Empty,
}

fn parse_command(line: &str) -> ReplCommand<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Empty;
    }
    if !trimmed.starts_with('/') {
        // Pass the raw line through so the prompt keeps its whitespace
        return ReplCommand::Submit(line);
    }
    let mut parts = trimmed.splitn(2, ' ');
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().unwrap_or("").trim();
    match command {
        "/quit" | "/exit" => ReplCommand::Quit,
        "/new" => ReplCommand::New,
        "/list" => ReplCommand::List,
        "/switch" => ReplCommand::Switch(arg),
        "/delete" => ReplCommand::Delete(arg),
        _ => ReplCommand::Help,
    }
}

pub async fn run(mut coordinator: SessionCoordinator) -> Result<()> {
    println!("echo-chat — type a message, or /help for commands.");

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| ChatError::Other(e.to_string()))?
        else {
            break;
        };

        match parse_command(&line) {
            ReplCommand::Quit => break,
            ReplCommand::Empty => {}
            ReplCommand::Help => print_help(),
            ReplCommand::New => {
                coordinator.new_session().await;
                println!("Started a new chat.");
            }
            ReplCommand::List => print_sessions(&coordinator),
            ReplCommand::Switch(id) => {
                if id.is_empty() {
                    println!("Usage: /switch <session-id>");
                } else {
                    coordinator.switch_to(id).await;
                    replay_messages(&coordinator);
                }
            }
            ReplCommand::Delete(id) => {
                if id.is_empty() {
                    println!("Usage: /delete <session-id>");
                } else {
                    coordinator.delete_session(id).await;
                    println!("Deleted. Now on: {}", coordinator.active_id());
                }
            }
            ReplCommand::Submit(text) => {
                if coordinator.submit(text).await {
                    pump_exchange(&mut coordinator).await;
                }
            }
        }
    }
    Ok(())
}

/// Poll the coordinator until the exchange settles, printing each new
/// fragment of the live reply as it arrives.
async fn pump_exchange(coordinator: &mut SessionCoordinator) {
    let mut seen = String::new();
    loop {
        coordinator.process_events().await;
        let snapshot = coordinator.snapshot();

        if snapshot.live_reply.len() > seen.len() {
            print!("{}", &snapshot.live_reply[seen.len()..]);
            std::io::stdout().flush().ok();
            seen = snapshot.live_reply;
        }

        if snapshot.phase == ExchangePhase::Idle {
            match snapshot.messages.last() {
                Some(last) if last.role == Role::Model => {
                    if let Some(rest) = last.content.strip_prefix(seen.as_str()) {
                        // Fragments that settled in the final poll batch
                        println!("{}", rest);
                    } else if seen.is_empty() {
                        println!("{}", last.content);
                    } else {
                        // Synthetic replies replace the partial stream
                        println!("\n{}", last.content);
                    }
                }
                _ => println!(),
            }
            return;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

fn print_sessions(coordinator: &SessionCoordinator) {
    for entry in coordinator.snapshot().sessions {
        let marker = if entry.id == coordinator.active_id() {
            "*"
        } else {
            " "
        };
        println!("{} {}  {}", marker, entry.id, entry.title);
    }
}

fn replay_messages(coordinator: &SessionCoordinator) {
    for message in coordinator.snapshot().messages {
        let speaker = match message.role {
            Role::User => "you",
            Role::Model => "model",
        };
        println!("[{}] {}", speaker, message.content);
    }
}

fn print_help() {
    println!("Commands:");
    println!("  /new            start a new chat");
    println!("  /list           list chats (* marks the active one)");
    println!("  /switch <id>    switch to a chat");
    println!("  /delete <id>    delete a chat");
    println!("  /quit           exit");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_slash_commands() {
        assert!(matches!(parse_command("/quit"), ReplCommand::Quit));
        assert!(matches!(parse_command("/exit"), ReplCommand::Quit));
        assert!(matches!(parse_command("/new"), ReplCommand::New));
        assert!(matches!(parse_command("/list"), ReplCommand::List));
        assert!(matches!(parse_command("/switch abc"), ReplCommand::Switch("abc")));
        assert!(matches!(parse_command("/delete abc"), ReplCommand::Delete("abc")));
        assert!(matches!(parse_command("/unknown"), ReplCommand::Help));
    }

    #[test]
    fn test_parse_missing_argument_is_empty() {
        assert!(matches!(parse_command("/switch"), ReplCommand::Switch("")));
        assert!(matches!(parse_command("/switch   "), ReplCommand::Switch("")));
    }

    #[test]
    fn test_parse_keeps_prompt_whitespace() {
        assert!(matches!(
            parse_command("  padded prompt  "),
            ReplCommand::Submit("  padded prompt  ")
        ));
    }

    #[test]
    fn test_parse_blank_line() {
        assert!(matches!(parse_command("   "), ReplCommand::Empty));
        assert!(matches!(parse_command(""), ReplCommand::Empty));
    }
}
