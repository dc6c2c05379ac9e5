use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::dispatcher::Handle;
use crate::frame::Request;

const SAVE: &str = "save";
const EXIT: &str = "exit";

/// Asks for the collection file until a non-empty line is entered.
pub fn prompt_for_path<R, W>(input: &mut R, output: &mut W) -> io::Result<PathBuf>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();

    loop {
        write!(output, "Path to the collection file: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no collection file given",
            ));
        }

        let path = line.trim();
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
}

/// Reads operator commands line by line. `save` persists the collection through the dispatcher,
/// `exit` cancels `shutdown` and returns. Returns as well when `input` is exhausted.
///
/// Blocks the calling thread; run it outside the async runtime.
pub fn listen<R: BufRead>(input: R, dispatcher: Handle, shutdown: CancellationToken) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                error!(error = %e, "Failed to read from console");
                return;
            }
        };

        let token = line.trim();
        if token.eq_ignore_ascii_case(SAVE) {
            match dispatcher.blocking_submit(Request::new(SAVE)) {
                Ok(response) if response.success => info!("{}", response.message),
                Ok(response) => warn!(message = %response.message, "Save failed"),
                Err(e) => {
                    error!(error = %e, "Dispatcher unavailable");
                    return;
                }
            }
        } else if token.eq_ignore_ascii_case(EXIT) {
            info!("Exit requested from console");
            shutdown.cancel();
            return;
        } else if !token.is_empty() {
            warn!("Unknown console command: {}", token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{database, flat};
    use crate::commands::Registry;
    use crate::dispatcher::Dispatcher;
    use crate::flat::Flat;
    use crate::frame::Payload;
    use crate::persistence::{JsonFile, Persistence};
    use std::io::Cursor;

    #[test]
    fn prompt_skips_blank_lines() {
        let mut input = Cursor::new("\n   \n/tmp/flats.json\n");
        let mut output = Vec::new();

        let path = prompt_for_path(&mut input, &mut output).unwrap();

        assert_eq!(path, PathBuf::from("/tmp/flats.json"));
        let prompts = String::from_utf8(output).unwrap();
        assert_eq!(prompts.matches("Path to the collection file").count(), 3);
    }

    #[test]
    fn prompt_fails_on_eof() {
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();

        let err = prompt_for_path(&mut input, &mut output).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[tokio::test]
    async fn save_then_exit() {
        let (dir, db) = database();
        let (dispatcher, handle) = Dispatcher::new(Registry::with_defaults(), db);
        tokio::spawn(dispatcher.run());

        handle
            .submit(Request::with_payload("add", Payload::Record(flat("A"))))
            .await
            .unwrap();

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        tokio::task::spawn_blocking(move || {
            listen(Cursor::new("bogus\nSAVE\nexit\nsave\n"), handle, token)
        })
        .await
        .unwrap();

        assert!(shutdown.is_cancelled());
        let saved: Vec<Flat> = JsonFile::new(dir.path().join("flats.json")).load().unwrap();
        assert_eq!(saved.len(), 1);
    }

    #[tokio::test]
    async fn eof_does_not_cancel() {
        let (_dir, db) = database();
        let (dispatcher, handle) = Dispatcher::new(Registry::with_defaults(), db);
        tokio::spawn(dispatcher.run());

        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        tokio::task::spawn_blocking(move || listen(Cursor::new("save\n"), handle, token))
            .await
            .unwrap();

        assert!(!shutdown.is_cancelled());
    }
}
