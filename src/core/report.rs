//! Plain-text rendering of a session, for non-interactive output

use std::fmt::Write;

use super::session::{LookupState, Session};

/// Render the selector, signature area and all blocks as text.
///
/// `browse_url` is the base of the manual lookup link.
pub fn render_report(session: &Session, browse_url: &str) -> String {
    let mut out = String::new();

    if let Some(selector) = session.selector() {
        let _ = writeln!(out, "Function selector: {selector}");
        let _ = writeln!(out, "Lookup: {}", selector.browse_url(browse_url));

        if let Some(message) = session.lookup_state().message() {
            let _ = writeln!(out, "{message}");
        }
        if let LookupState::Found {
            candidates,
            selected,
        } = session.lookup_state()
        {
            if candidates.len() > 1 {
                for (idx, candidate) in candidates.iter().enumerate() {
                    let marker = if idx == *selected { '*' } else { ' ' };
                    let _ = writeln!(out, " {marker} {}", candidate.text);
                }
            }
        }
    }

    if let Some(view) = session.signature_view() {
        let _ = writeln!(out, "Signature: {}", view.signature);
        for row in &view.rows {
            let _ = writeln!(out, "  [{}] {} → {}", row.index, row.ty, row.display_value());
        }
    }

    if session.selector().is_some() {
        out.push('\n');
    }

    for row in session.block_rows() {
        let _ = write!(out, "{}", row.header);
        if let Some(hint) = &row.hint {
            let _ = write!(out, "  {hint}");
        }
        out.push('\n');
        let _ = writeln!(out, "  {}", row.content);
        if let (Some(kind), Some(decoded)) = (row.choice, &row.decoded) {
            let _ = writeln!(out, "  {kind}: {decoded}");
        }
    }

    out
}
