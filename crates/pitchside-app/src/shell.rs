// Line-oriented shell: each line is a page command, and the session lives
// for the whole run, so pages opened before `home` get the guidance text.

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use crate::app::App;
use crate::cli::ShellLine;

pub const PROMPT: &str = "pitchside> ";

/// Split a line into words. Double quotes group words containing spaces
/// ("Manchester City"); quotes themselves are dropped.
pub fn split_words(line: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_word = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                quoted = !quoted;
                in_word = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            c => {
                current.push(c);
                in_word = true;
            }
        }
    }
    if in_word {
        words.push(current);
    }
    words
}

/// Run the shell until `quit`, `exit` or end of input.
pub async fn run<R, W>(app: &mut App, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!("shell started");
    let mut lines = input.lines();

    loop {
        output.write_all(PROMPT.as_bytes()).await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words = split_words(&line);
        let reply = match words.first().map(String::as_str) {
            None => continue,
            Some("quit" | "exit") => break,
            Some(_) => match ShellLine::try_parse_from(words.iter()) {
                Ok(cmd) => {
                    debug!(page = ?cmd.page, "shell command");
                    match app.open(&cmd.page).await {
                        Ok(text) => text,
                        Err(e) => format!("error: {e:#}"),
                    }
                }
                Err(e) => e.to_string(),
            },
        };

        output.write_all(reply.trim_end().as_bytes()).await?;
        output.write_all(b"\n").await?;
    }

    output.write_all(b"\n").await?;
    output.flush().await?;
    info!("shell finished");
    Ok(())
}
