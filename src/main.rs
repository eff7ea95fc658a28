use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::net::TcpStream;

use anyhow::{Context, Result, anyhow};

use rummikub_client::config::ClientConfig;
use rummikub_client::protocol::{self, InputSource, ScriptedInput, Step, TurnProtocol};
use rummikub_client::report::{EvaluationResult, HandReport};
use rummikub_client::{Hand, Tile};

/// Player input read from the console one line at a time
struct ConsoleInput {
    stdin: io::Stdin,
}

impl InputSource for ConsoleInput {
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.stdin.lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                eprintln!("Failed to read from console: {}", e);
                None
            }
        }
    }

    fn prompt(&mut self, message: &str) {
        println!("{}", message);
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match args.first().map(String::as_str) {
        Some("--version") => {
            println!("rummikub-client {}", env!("BUILD_COMMIT"));
            Ok(())
        }
        Some("eval") => evaluate(&args[1..]),
        Some(other) => Err(anyhow!("Unknown argument: {}", other)),
        None => play(ClientConfig::from_env()),
    }
}

/// Print the JSON evaluation of the tiles given on the command line
fn evaluate(tokens: &[String]) -> Result<()> {
    let hand = tokens
        .iter()
        .map(|t| Tile::from_string(t))
        .collect::<Result<Hand, String>>()
        .map_err(|e| anyhow!(e))?;

    let result = EvaluationResult::from(Ok::<_, String>(HandReport::for_hand(&hand)));
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn play(config: ClientConfig) -> Result<()> {
    let mut console = ConsoleInput { stdin: io::stdin() };

    console.prompt("What is your name?");
    let name = console
        .next_line()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .context("No player name given")?;

    let stream = TcpStream::connect(config.address())
        .with_context(|| format!("Fail to join the server at {}", config.address()))?;
    let reader = BufReader::new(stream.try_clone().context("Failed to clone socket")?);
    let mut writer = BufWriter::new(stream);

    send_lines(&mut writer, &[name])?;

    if config.scripted {
        let mut script = ScriptedInput::default();
        while let Some(line) = console.next_line() {
            script.push(line);
        }
        run_session(reader, &mut writer, &mut script)?;
    } else {
        run_session(reader, &mut writer, &mut console)?;
    }

    println!("Game Over");
    Ok(())
}

fn run_session<R, W, S>(reader: R, writer: &mut W, input: &mut S) -> Result<()>
where
    R: BufRead,
    W: Write,
    S: InputSource,
{
    let mut session = TurnProtocol::new();
    let mut lines = reader.lines();

    loop {
        let line = lines
            .next()
            .transpose()
            .context("Fail to receive message from server")?;

        match session.feed(line.as_deref()) {
            Step::Show(text) => println!("{}", text),
            Step::Prompt(kind) => {
                let reply = protocol::answer(kind, input).map_err(|e| anyhow!(e))?;
                send_lines(writer, &reply)?;
            }
            Step::Close => return Ok(()),
        }
    }
}

fn send_lines<W: Write>(writer: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush().context("Failed to send reply to server")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(server: &str, script: &[&str]) -> String {
        let mut sent = Vec::new();
        let mut input = ScriptedInput::new(script.iter().copied());
        run_session(server.as_bytes(), &mut sent, &mut input).unwrap();
        String::from_utf8(sent).unwrap()
    }

    #[test]
    fn test_session_answers_turn_prompt() {
        let sent = run("Your turn\nhand: {R1 R2}\n\nEND\n", &["draw"]);
        assert_eq!(sent, "draw\n");
    }

    #[test]
    fn test_session_answers_edit_prompt() {
        let sent = run("EDIT\nEND\n", &["{B2 R1}", "{R3 R4 R5}"]);
        assert_eq!(sent, "R1 B2\n{R3 R4 R5}\n");
    }

    #[test]
    fn test_session_edit_abort() {
        let sent = run("EDIT\n", &["end"]);
        assert_eq!(sent, "end\n");
    }

    #[test]
    fn test_session_fails_when_input_runs_out() {
        let mut sent = Vec::new();
        let mut input = ScriptedInput::default();
        assert!(run_session("\n".as_bytes(), &mut sent, &mut input).is_err());
    }
}
