use picker_session::SessionSnapshot;
use std::fmt::Write as _;

/// Plain-text rendering: section titles, flattened row numbers and the
/// status line.
pub fn render_text(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();

    for section in &snapshot.sections {
        if let Some(title) = &section.title {
            let _ = writeln!(out, "{title}");
        }
        for (position, candidate) in section.candidates.iter().enumerate() {
            let index = section.index_offset + position;
            let _ = write!(out, "  {index:>3}  {}", candidate.display_name);
            if let Some(alternate) = candidate
                .alternate_text
                .as_deref()
                .filter(|text| *text != candidate.display_name)
            {
                let _ = write!(out, "  <{alternate}>");
            }
            if !candidate.is_selectable() {
                out.push_str("  (not selectable)");
            }
            out.push('\n');
        }
    }

    if !snapshot.status_text.is_empty() {
        let _ = writeln!(out, "{}", snapshot.status_text);
    }

    out
}
