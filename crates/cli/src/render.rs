// Human-readable output for check and validate

use std::io::{self, Write};

use followcheck_recon::{Outcome, ReconciliationResult};

use crate::check::ValidationReport;

pub fn print_result<W: Write>(out: &mut W, result: &ReconciliationResult, search: Option<&str>) -> io::Result<()> {
    if let Some(message) = &result.message {
        writeln!(out, "{message}")?;
        if let Some(subtext) = &result.subtext {
            writeln!(out, "{subtext}")?;
        }
    }

    let edge = matches!(result.outcome, Outcome::EmptyFollowing | Outcome::EmptyFollowers);
    if !edge {
        print_list(out, "Not following you back", &result.not_following_back)?;
        print_list(out, "You don't follow back", &result.you_dont_follow_back)?;

        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            if result.not_following_back.is_empty() && result.you_dont_follow_back.is_empty() {
                writeln!(out, "No usernames match \"{}\".", term.trim())?;
            }
        }
    }

    let s = &result.stats;
    writeln!(
        out,
        "\n{} following, {} followers from {} followers file{}",
        s.following,
        s.followers,
        s.followers_files,
        if s.followers_files == 1 { "" } else { "s" },
    )
}

fn print_list<W: Write>(out: &mut W, title: &str, usernames: &[String]) -> io::Result<()> {
    if usernames.is_empty() {
        return Ok(());
    }
    writeln!(out, "\n{title} ({}):", usernames.len())?;
    for username in usernames {
        writeln!(out, "  {username}")?;
    }
    Ok(())
}

pub fn print_validation<W: Write>(out: &mut W, report: &ValidationReport) -> io::Result<()> {
    let width = report.files.iter().map(|f| f.file.len()).max().unwrap_or(0);
    for file in &report.files {
        write!(out, "{:<width$}  {:<9}  {} usernames", file.file, file.role.to_string(), file.usernames)?;
        if file.skipped_entries > 0 {
            write!(out, " ({} entries skipped)", file.skipped_entries)?;
        }
        writeln!(out)?;
    }
    for name in &report.ignored_following {
        writeln!(out, "{name}: ignored (extra following.json)")?;
    }
    writeln!(out, "ok")
}
