use std::future::Future;
use std::io;
use std::pin::Pin;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

use crate::error::{NetworkError, Result};
use crate::output;
use crate::query::{PageRequest, PageSource};
use crate::responses::Page;
use crate::view::{FeedView, Screen, Scroll};

type PendingFetch<'a> =
    Pin<Box<dyn Future<Output = (PageRequest, std::result::Result<Page, NetworkError>)> + 'a>>;

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Scroll(Scroll),
    Retry,
    Quit,
    Unknown(String),
}

fn parse_command(input: &str) -> Command {
    match input.trim() {
        "" | "d" => Command::Scroll(Scroll::PageDown),
        "u" => Command::Scroll(Scroll::PageUp),
        "j" => Command::Scroll(Scroll::RowDown),
        "k" => Command::Scroll(Scroll::RowUp),
        "g" => Command::Scroll(Scroll::Top),
        "G" => Command::Scroll(Scroll::Bottom),
        "r" => Command::Retry,
        "q" | "quit" => Command::Quit,
        other => Command::Unknown(other.to_string()),
    }
}

fn spawn_fetch<'a, S: PageSource + 'a>(source: &'a S, request: PageRequest) -> PendingFetch<'a> {
    Box::pin(async move {
        let result = source.fetch_page(request.offset, request.take).await;
        (request, result)
    })
}

/// Interactive viewer on stdin and stdout.
pub async fn run<S: PageSource>(source: &S, rows: u16) -> Result<()> {
    let input = BufReader::new(tokio::io::stdin());
    browse(source, FeedView::new(rows), input, output::draw_screen).await
}

/// Keyboard input and the single pending page fetch are multiplexed on the
/// current thread. A finished fetch is applied before the next key is read.
/// Quitting, or running out of input, drops any fetch still in flight.
async fn browse<S, R, D>(source: &S, mut view: FeedView, input: R, mut draw: D) -> Result<()>
where
    S: PageSource,
    R: AsyncBufRead + Unpin,
    D: FnMut(&Screen) -> io::Result<()>,
{
    let mut pending: Option<PendingFetch<'_>> = view.start().map(|r| spawn_fetch(source, r));
    let mut input = input.lines();

    loop {
        draw(&view.render())?;

        if let Some(request) = view.observe_sentinel() {
            debug!(offset = request.offset, "Loading row in view");
            pending = Some(spawn_fetch(source, request));
            continue;
        }

        tokio::select! {
            biased;

            (request, result) = async {
                match pending.as_mut() {
                    Some(fetch) => fetch.await,
                    None => std::future::pending().await,
                }
            } => {
                pending = None;
                view.receive(request, result);
            }
            line = input.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_command(&line) {
                    Command::Scroll(scroll) => view.scroll(scroll),
                    Command::Retry => pending = Some(spawn_fetch(source, view.retry())),
                    Command::Quit => break,
                    Command::Unknown(other) => warn!(input = %other, "Unknown key"),
                }
            }
        }
    }

    Ok(())
}
