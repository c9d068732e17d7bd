//! Interactive exploration over stdin/stdout.
//!
//! Each input line is one interaction, applied as one tick. Re-derived
//! views are written to stdout as JSON lines; see [`wtv_session::JsonRenderer`].

use crate::startup::{self, SourceArgs};
use log::{info, warn};
use std::io::{BufRead, Write};
use wtv_session::{Interaction, JsonRenderer, Session};

pub async fn run_explore(args: &SourceArgs) -> anyhow::Result<()> {
    let startup = startup::load(args).await?;
    let session = Session::new(startup.tables, startup.registry, startup.config);

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_loop(session, stdin.lock(), stdout.lock())?;
    Ok(())
}

/// Render the initial view, then apply one event per input line until EOF
/// or `quit`. Returns the finished session.
pub fn run_loop<R: BufRead, W: Write>(
    mut session: Session,
    input: R,
    output: W,
) -> anyhow::Result<Session> {
    let mut renderer = JsonRenderer::new(output);
    session.render_all().deliver(&mut renderer)?;

    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        match Interaction::parse_line(trimmed) {
            Ok(interaction) => {
                session.dispatch(interaction, &mut renderer)?;
            }
            Err(e) => warn!("Ignoring input '{}': {}", trimmed, e),
        }
    }

    info!(
        "Session ended after {} ticks with {} stations selected",
        session.ticks(),
        session.selection().len()
    );
    Ok(session)
}
