use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use serde::Serialize;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{debug, info};
use ymca_core::error::{Result, YmcaError};
use ymca_core::{DecodeOptions, Message, read_archive, read_many, scan_archive, summarize};

use crate::presentation::cli::OutputFormat;

const CLOCK: &[BorrowedFormatItem<'static>] = format_description!("[hour]:[minute]:[second]");
const STAMP: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second] [offset_hour sign:mandatory]:[offset_minute]"
);

const FALLBACK_CONTACT: &str = "contact";

#[derive(Serialize)]
struct ArchiveOut<'a> {
    path: &'a Path,
    messages: &'a [Message],
}

fn decode_options(utc: bool) -> DecodeOptions {
    DecodeOptions {
        utc_offset: utc.then_some(UtcOffset::UTC),
    }
}

/// Profiles store archives as `.../messages/<contact>/<date>-<owner>.dat`.
fn contact_for(archive: &Path) -> String {
    archive
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| FALLBACK_CONTACT.to_string())
}

fn format_error(e: time::error::Format) -> io::Error {
    io::Error::other(e)
}

fn fmt_time(t: OffsetDateTime, fd: &[BorrowedFormatItem<'_>]) -> io::Result<String> {
    t.format(fd).map_err(format_error)
}

fn report(path: &Path, e: &YmcaError) {
    eprintln!("error: {}: {e}", path.display());
}

fn write_text(
    out: &mut impl Write,
    msgs: &[Message],
    owner: &str,
    contact: &str,
) -> io::Result<()> {
    for m in msgs {
        writeln!(
            out,
            "{} {} {}",
            fmt_time(m.timestamp(), CLOCK)?,
            m.sender(owner, contact),
            m.content()
        )?;
    }
    Ok(())
}

pub fn handle_read(
    archives: Vec<PathBuf>,
    username: String,
    contact: Option<String>,
    utc: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let opts = decode_options(utc);
    let results = read_many(&archives, &username, &opts);

    let mut out = io::stdout().lock();
    let mut failed = 0usize;
    let mut decoded = Vec::new();
    let multi = results.len() > 1;

    for (path, res) in &results {
        match res {
            Ok(msgs) => {
                info!("{}: {} messages", path.display(), msgs.len());
                if format == OutputFormat::Text {
                    if multi {
                        writeln!(out, "== {} ==", path.display())?;
                    }
                    let contact = contact.clone().unwrap_or_else(|| contact_for(path));
                    write_text(&mut out, msgs, &username, &contact)?;
                } else {
                    decoded.push(ArchiveOut {
                        path,
                        messages: msgs,
                    });
                }
            }
            Err(e) => {
                report(path, e);
                failed += 1;
            }
        }
    }

    if format == OutputFormat::Json {
        serde_json::to_writer_pretty(&mut out, &decoded).map_err(io::Error::from)?;
        writeln!(out)?;
    }
    out.flush()?;

    debug!("read: {} ok, {} failed", results.len() - failed, failed);
    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn handle_verify(archive: PathBuf, footers: bool) -> Result<ExitCode> {
    let recs = match scan_archive(&archive) {
        Ok(r) => r,
        Err(e) => {
            report(&archive, &e);
            return Ok(ExitCode::FAILURE);
        }
    };
    let mut out = io::stdout().lock();
    if footers {
        for r in &recs {
            writeln!(
                out,
                "@{:<8} flag={:<3} len={:<3} footer={}",
                r.offset,
                r.direction_flag,
                r.ciphertext.len(),
                hex::encode(r.footer)
            )?;
        }
    }
    let bytes: u64 = recs.iter().map(|r| r.encoded_len()).sum();
    writeln!(out, "{}: {} records, {} bytes", archive.display(), recs.len(), bytes)?;
    eprintln!("verify: OK");
    Ok(ExitCode::SUCCESS)
}

pub fn handle_info(
    archive: PathBuf,
    username: String,
    utc: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let msgs = match read_archive(&archive, &username, &decode_options(utc)) {
        Ok(m) => m,
        Err(e) => {
            report(&archive, &e);
            return Ok(ExitCode::FAILURE);
        }
    };
    let s = summarize(&msgs);
    let mut out = io::stdout().lock();
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, &s).map_err(io::Error::from)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out, "archive:  {}", archive.display())?;
            writeln!(
                out,
                "messages: {} (sent {}, received {}, empty {})",
                s.messages, s.sent, s.received, s.empty
            )?;
            if let (Some(first), Some(last)) = (s.first, s.last) {
                writeln!(out, "first:    {}", fmt_time(first, STAMP)?)?;
                writeln!(out, "last:     {}", fmt_time(last, STAMP)?)?;
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use ymca_core::Direction;

    #[test]
    fn contact_comes_from_parent_dir() {
        let p = Path::new("/p/jdoe/Archive/Messages/buddy42/20090301-jdoe.dat");
        assert_eq!(contact_for(p), "buddy42");
        assert_eq!(contact_for(Path::new("lone.dat")), FALLBACK_CONTACT);
    }

    #[test]
    fn format_failure_becomes_io_other() {
        let e = format_error(time::error::Format::InvalidComponent("hour"));
        assert_eq!(e.kind(), io::ErrorKind::Other);
        assert!(e.to_string().contains("hour"), "{e}");
    }

    #[test]
    fn text_lines_use_clock_and_sender() {
        let msgs = vec![
            Message::new(datetime!(2009-03-01 08:05:09 UTC), Direction::Received, "hey".into()),
            Message::new(datetime!(2009-03-01 08:06:00 UTC), Direction::Sent, "yo".into()),
        ];
        let mut buf = Vec::new();
        write_text(&mut buf, &msgs, "me", "buddy").unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "08:05:09 buddy hey\n08:06:00 me yo\n"
        );
    }
}
