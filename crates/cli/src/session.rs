//! Interactive session on stdin/stdout

use std::fmt::Write as _;

use glassbox_common::resilience::CircuitSnapshot;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::warn;

use crate::context::AgentContext;

const BANNER: &str = "Glassbox coding agent. Commands: reset, circuits, quit.";

/// One line of user input
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    Reset,
    Circuits,
    Empty,
    Prompt(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" => Self::Empty,
            "quit" | "exit" | "q" => Self::Quit,
            "reset" => Self::Reset,
            "circuits" => Self::Circuits,
            _ => Self::Prompt(line),
        }
    }
}

/// Run the read-eval-print loop until `quit` or end of input.
pub async fn run(mut ctx: AgentContext) -> anyhow::Result<()> {
    let mut stdout = io::stdout();
    let mut lines = BufReader::new(io::stdin()).lines();

    stdout.write_all(format!("{BANNER}\n").as_bytes()).await?;

    loop {
        stdout.write_all(b"\nYou: ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let output = match Command::parse(&line) {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Reset => {
                ctx.agent.reset();
                "Conversation cleared.".to_string()
            }
            Command::Circuits => render_circuits(&ctx.executor.snapshots()),
            Command::Prompt(prompt) => match ctx.agent.run(prompt).await {
                Ok(answer) => format!("Agent: {answer}"),
                Err(err) => {
                    warn!(error = %err, "turn failed, resetting conversation");
                    ctx.agent.reset();
                    format!("Error: {err}")
                }
            },
        };

        stdout.write_all(format!("{output}\n").as_bytes()).await?;
    }

    stdout.write_all(b"Goodbye!\n").await?;
    stdout.flush().await?;
    Ok(())
}

fn render_circuits(snapshots: &[CircuitSnapshot]) -> String {
    if snapshots.is_empty() {
        return "No circuits yet.".to_string();
    }

    let mut out = String::new();
    for snapshot in snapshots {
        let _ = writeln!(
            out,
            "{:<32} {:<9} failures={} calls={} rejected={}",
            snapshot.channel,
            snapshot.state.to_string(),
            snapshot.consecutive_failures,
            snapshot.total_calls,
            snapshot.rejected_calls,
        );
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use glassbox_common::resilience::CircuitState;

    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("  QUIT "), Command::Quit);
        assert_eq!(Command::parse("exit"), Command::Quit);
        assert_eq!(Command::parse("q"), Command::Quit);
        assert_eq!(Command::parse("reset"), Command::Reset);
        assert_eq!(Command::parse("circuits"), Command::Circuits);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse(" list the src dir "), Command::Prompt("list the src dir"));
    }

    #[test]
    fn renders_circuit_table() {
        let snapshot = CircuitSnapshot {
            channel: "llm:ollama:llama3.1:8b".to_string(),
            state: CircuitState::Open,
            consecutive_failures: 5,
            half_open_successes: 0,
            half_open_in_flight: 0,
            opened_at: None,
            total_calls: 7,
            total_failures: 5,
            rejected_calls: 2,
        };

        let table = render_circuits(&[snapshot]);
        assert!(table.starts_with("llm:ollama:llama3.1:8b"));
        assert!(table.contains("OPEN"));
        assert!(table.ends_with("failures=5 calls=7 rejected=2"));
        assert_eq!(render_circuits(&[]), "No circuits yet.");
    }
}
