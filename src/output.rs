//! Output formatting for search results and corpus listings

use crate::index::corpus::CorpusSnapshot;
use crate::index::types::{ImageMatch, MatchEvidence, MatchKind};
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

fn kind_color(kind: MatchKind) -> Color {
    match kind {
        MatchKind::Exact => Color::Green,
        MatchKind::Substring => Color::Yellow,
        MatchKind::Fuzzy => Color::Red,
    }
}

/// Print results grouped under one heading per image
pub fn print_matches(results: &[ImageMatch], snapshot: &CorpusSnapshot, color: bool) -> io::Result<()> {
    let choice = if color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    for (i, result) in results.iter().enumerate() {
        if i > 0 {
            // Add blank line between images
            writeln!(stdout)?;
        }

        let name = snapshot
            .get(result.image_id)
            .map(|r| r.display_name.as_str())
            .filter(|n| !n.is_empty())
            .unwrap_or("-");

        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(stdout, "{}", result.image_id)?;
        stdout.reset()?;
        writeln!(
            stdout,
            " {} ({} term{})",
            name,
            result.matched_terms,
            if result.matched_terms == 1 { "" } else { "s" }
        )?;

        for evidence in &result.evidence {
            print_evidence_line(&mut stdout, evidence)?;
        }
    }

    Ok(())
}

/// Print a single evidence entry with the matched token highlighted
fn print_evidence_line(stdout: &mut StandardStream, evidence: &MatchEvidence) -> io::Result<()> {
    let [x, y, w, h] = evidence.bbox.to_xywh();

    write!(stdout, "  ")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
    write!(stdout, "{:<9}", evidence.kind.as_str())?;
    stdout.reset()?;
    write!(stdout, " {} -> ", evidence.term)?;

    stdout.set_color(ColorSpec::new().set_fg(Some(kind_color(evidence.kind))).set_bold(true))?;
    write!(stdout, "{}", evidence.token)?;
    stdout.reset()?;

    writeln!(stdout, "  [{}, {}, {}, {}]", x, y, w, h)
}

/// Print results as a JSON array
pub fn print_json(results: &[ImageMatch]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut lock = stdout.lock();
    serde_json::to_writer_pretty(&mut lock, results)?;
    writeln!(lock)
}

/// Print every indexed image, newest id first
pub fn print_image_list(snapshot: &CorpusSnapshot) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    let mut images: Vec<_> = snapshot.all_images().collect();
    images.sort_by(|a, b| b.id.cmp(&a.id));

    for image in images {
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)))?;
        write!(stdout, "{}", image.id)?;
        stdout.reset()?;
        write!(stdout, ":")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", image.tokens.len())?;
        stdout.reset()?;
        writeln!(stdout, " {}", image.display_name)?;
    }

    Ok(())
}
