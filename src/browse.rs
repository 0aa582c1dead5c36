//! Interactive file browser (`arcv browse`).
//!
//! Starts the metadata load in the background, shows a loading indicator
//! until it settles, then reads one command per line and redraws the file
//! page after each change.

use std::io::Write;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use archive_viewer_core::view::ViewEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::loader::{wait_settled, LoadState};
use crate::render;
use crate::session::Session;

const HELP: &str = "\
Commands:
  search <text>   filter files by name (also: /<text>)
  clear           remove the search filter
  next, n         next page
  prev, p         previous page
  page <n>, <n>   jump to page n
  open <row>      print the download link for a row on this page
  info            show record metadata
  help            show this help
  quit, q         leave";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    View(ViewEvent),
    Open(usize),
    Info,
    Help,
    Quit,
    Nothing,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Nothing;
    }
    if let Some(term) = line.strip_prefix('/') {
        return Command::View(ViewEvent::Search(term.trim().to_string()));
    }

    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_lowercase().as_str() {
        "search" | "s" => Command::View(ViewEvent::Search(rest.to_string())),
        "clear" => Command::View(ViewEvent::ClearSearch),
        "next" | "n" => Command::View(ViewEvent::Next),
        "prev" | "previous" | "p" => Command::View(ViewEvent::Previous),
        "page" | "g" => match rest.parse() {
            Ok(n) => Command::View(ViewEvent::Page(n)),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "open" | "o" => match rest.parse() {
            Ok(n) => Command::Open(n),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "info" | "i" => Command::Info,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => match line.parse() {
            Ok(n) => Command::View(ViewEvent::Page(n)),
            Err(_) => Command::Unknown(line.to_string()),
        },
    }
}

/// Load the record, then run the command loop until `quit` or end of input.
pub async fn run_browse<R, W>(session: &mut Session, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", render::render_loading(session.identifier()))?;
    out.flush()?;

    let mut rx = session.subscribe();
    let task = session.start();
    let state = wait_with_indicator(&mut rx).await;
    let _ = task.await.context("metadata loader task panicked")?;

    if let LoadState::Failed(cause) = &state {
        writeln!(out, "{}", render::render_failure(session.identifier(), cause))?;
        bail!("could not load record '{}'", session.identifier());
    }
    if !state.is_settled() {
        bail!("metadata loader stopped before finishing");
    }
    session.adopt(state);

    let Some(doc) = session.document() else {
        bail!("metadata loader finished without a document");
    };
    writeln!(out, "{}", render::render_header(doc))?;
    print_page(session, out)?;
    writeln!(out, "Type 'help' for commands.")?;

    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };

        match parse_command(&line) {
            Command::Nothing => {}
            Command::Quit => break,
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Info => {
                if let Some(doc) = session.document() {
                    write!(out, "{}", render::render_info(doc))?;
                }
            }
            Command::Open(row) => open_row(session, row, out)?,
            Command::View(event) => handle_view_event(session, event, out)?,
            Command::Unknown(text) => {
                writeln!(out, "Unknown command '{}'. Type 'help' for commands.", text)?
            }
        }
    }
    Ok(())
}

/// Await a settled state, ticking a spinner on an interactive stderr.
async fn wait_with_indicator(rx: &mut tokio::sync::watch::Receiver<LoadState>) -> LoadState {
    let interactive = atty::is(atty::Stream::Stderr);
    let settled = wait_settled(rx);
    tokio::pin!(settled);
    let mut ticker = tokio::time::interval(Duration::from_millis(250));
    let mut ticks = 0u64;

    let state = loop {
        tokio::select! {
            state = &mut settled => break state,
            _ = ticker.tick() => {
                ticks += 1;
                if interactive && ticks > 1 {
                    eprint!(".");
                }
            }
        }
    };
    if interactive && ticks > 1 {
        eprintln!();
    }
    state
}

fn handle_view_event<W: Write>(session: &mut Session, event: ViewEvent, out: &mut W) -> Result<()> {
    let before = session.view().current_page();
    let changed = session.apply(event.clone());

    match event {
        ViewEvent::Search(_) | ViewEvent::ClearSearch => return print_page(session, out),
        _ if changed => return print_page(session, out),
        _ => {}
    }

    let pages = session
        .document()
        .map(|doc| session.view().page_count(doc))
        .unwrap_or(0);
    let message = match event {
        _ if pages == 0 => "No pages to show.".to_string(),
        ViewEvent::Page(n) if n == before => format!("Already on page {}.", n),
        ViewEvent::Page(n) => format!("Page {} is out of range (1-{}).", n, pages),
        ViewEvent::Next => "Already on the last page.".to_string(),
        ViewEvent::Previous => "Already on the first page.".to_string(),
        ViewEvent::Search(_) | ViewEvent::ClearSearch => return Ok(()),
    };
    writeln!(out, "{}", message)?;
    Ok(())
}

fn open_row<W: Write>(session: &Session, row: usize, out: &mut W) -> Result<()> {
    let Some(page) = session.page() else {
        return Ok(());
    };
    let first_row = (page.current_page - 1) * page.page_size + 1;
    let visible = row
        .checked_sub(first_row)
        .and_then(|offset| page.rows.get(offset));
    match visible {
        Some(file) => writeln!(out, "{}", file.download_url)?,
        None => writeln!(out, "Row {} is not on this page.", row)?,
    }
    Ok(())
}

fn print_page<W: Write>(session: &Session, out: &mut W) -> Result<()> {
    if let Some(page) = session.page() {
        write!(out, "{}", render::render_page(&page))?;
    }
    Ok(())
}
