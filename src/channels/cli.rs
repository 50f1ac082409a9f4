//! CLI channel — stdin/stdout REPL over a single screening session.

use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::error::ChannelError;
use crate::screening::{FieldKey, Phase, Session, Speaker};

/// Typed to leave the conversation early.
const QUIT_COMMAND: &str = "/quit";
/// Typed to change the selected dial code: `/country +44`.
const COUNTRY_COMMAND: &str = "/country";

/// A parsed line of terminal input.
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    SelectCountry(&'a str),
    Answer {
        text: &'a str,
        country_code: Option<&'a str>,
    },
}

/// Parse a line. On the phone step a leading `+CC` is taken as the dial
/// code, so `+44 7911123456` works without `/country`.
fn parse_line(line: &str, phone_step: bool) -> Command<'_> {
    let trimmed = line.trim();
    if trimmed == QUIT_COMMAND {
        return Command::Quit;
    }
    if let Some(rest) = trimmed.strip_prefix(COUNTRY_COMMAND) {
        let code = rest.trim();
        if !code.is_empty() {
            return Command::SelectCountry(code);
        }
    }
    if phone_step && trimmed.starts_with('+') {
        if let Some((code, number)) = trimmed.split_once(char::is_whitespace) {
            return Command::Answer {
                text: number.trim(),
                country_code: Some(code),
            };
        }
    }
    Command::Answer {
        text: line,
        country_code: None,
    }
}

type LineStream = BoxStream<'static, std::io::Result<String>>;

fn stdin_lines() -> LineStream {
    let reader = BufReader::new(tokio::io::stdin());
    stream::unfold(reader.lines(), |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((Ok(line), lines)),
            Ok(None) => None,
            Err(e) => Some((Err(e), lines)),
        }
    })
    .boxed()
}

/// Drives one session from the terminal.
pub struct CliChannel {
    session: Session,
    /// Transcript entries already printed.
    printed: usize,
}

impl CliChannel {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            printed: 0,
        }
    }

    /// Run until the conversation completes, stdin closes, or `/quit`.
    pub async fn run(self) -> Result<(), ChannelError> {
        self.run_with(stdin_lines()).await
    }

    async fn run_with(mut self, mut lines: LineStream) -> Result<(), ChannelError> {
        self.session.start().await;
        self.flush();

        while !self.session.is_completed() {
            self.print_hint();
            let line = match lines.next().await {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    tracing::error!(session_id = %self.session.id(), "Error reading stdin: {}", e);
                    return Err(ChannelError::ReadFailed {
                        name: "cli".to_string(),
                        reason: e.to_string(),
                    });
                }
                None => break,
            };

            let phone_step = self.session.state().phase() == Phase::Collecting(FieldKey::Phone);
            match parse_line(&line, phone_step) {
                Command::Quit => break,
                Command::SelectCountry(code) => match self.session.select_country(code) {
                    Ok(()) => eprintln!("Country code set to {}", self.session.country_code()),
                    Err(e) => eprintln!("{e}"),
                },
                Command::Answer { text, country_code } => {
                    self.session.submit(text, country_code).await;
                    self.flush();
                }
            }
        }

        if let Some(confirmation) = self.session.view().confirmation {
            println!("\n✅ {}\n", confirmation.message);
        }
        Ok(())
    }

    /// Print new assistant turns. User turns are already on screen.
    fn flush(&mut self) {
        let transcript = self.session.state().transcript();
        for turn in &transcript[self.printed.min(transcript.len())..] {
            if turn.speaker == Speaker::Assistant {
                println!("\n{}\n", turn.text);
            }
        }
        self.printed = transcript.len();
    }

    fn print_hint(&self) {
        match self.session.state().phase() {
            Phase::Collecting(FieldKey::Phone) => eprint!(
                "[{}] (or `+CC number`, `/country +CC`) > ",
                self.session.country_code()
            ),
            Phase::TechQuestion => eprint!("(answer or 'skip') > "),
            _ => eprint!("> "),
        }
    }
}
