//! Edit script parsing.
//!
//! One command per line; blank lines and lines starting with `#` are
//! ignored. Parsing is pure: the runner in `main.rs` applies commands.

use anyhow::{Context, Result, anyhow, bail};
use core_history::DocumentId;
use core_spans::Style;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptCommand {
    Open(DocumentId),
    Use(DocumentId),
    Type(String),
    Select(usize, usize),
    Backspace,
    Effect { style: Style, enabled: bool },
    Link(String),
    Unlink,
    Image(String),
    ClearFormatting,
    Wait(u64),
    Undo,
    Redo,
    Close { id: DocumentId, saved: bool },
    Print,
}

pub fn parse_script(source: &str) -> Result<Vec<ScriptCommand>> {
    source
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                return None;
            }
            Some(parse_line(line).with_context(|| format!("line {}: `{}`", idx + 1, line)))
        })
        .collect()
}

pub fn parse_line(line: &str) -> Result<ScriptCommand> {
    let (word, payload) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = payload.trim();
    let cmd = match word {
        "open" => ScriptCommand::Open(parse_id(rest)?),
        "use" => ScriptCommand::Use(parse_id(rest)?),
        // `type` keeps everything after the separator, including inner whitespace.
        "type" => ScriptCommand::Type(payload.to_string()),
        "select" => {
            let mut parts = rest.split_whitespace();
            let start = parse_num(parts.next(), "select start")?;
            let end = parse_num(parts.next(), "select end")?;
            ScriptCommand::Select(start as usize, end as usize)
        }
        "backspace" => ScriptCommand::Backspace,
        "style" => {
            let mut parts = rest.split_whitespace();
            let style = match parts.next() {
                Some("bold") => Style::Bold,
                Some("italic") => Style::Italic,
                Some("underline") => Style::Underline,
                Some("strike") => Style::Strikethrough,
                Some("bullet") => Style::Bullet,
                other => bail!("unknown style {:?}", other.unwrap_or("")),
            };
            let enabled = match parts.next() {
                Some("on") => true,
                Some("off") => false,
                other => bail!("expected on|off, got {:?}", other.unwrap_or("")),
            };
            ScriptCommand::Effect { style, enabled }
        }
        "link" if !rest.is_empty() => ScriptCommand::Link(rest.to_string()),
        "unlink" => ScriptCommand::Unlink,
        "image" if !rest.is_empty() => ScriptCommand::Image(rest.to_string()),
        "clear" => ScriptCommand::ClearFormatting,
        "wait" => ScriptCommand::Wait(parse_num(Some(rest), "wait millis")?),
        "undo" => ScriptCommand::Undo,
        "redo" => ScriptCommand::Redo,
        "close" => {
            let mut parts = rest.split_whitespace();
            let id = parse_id(parts.next().unwrap_or(""))?;
            let saved = match parts.next() {
                None | Some("save") => true,
                Some("discard") => false,
                Some(other) => bail!("expected save|discard, got {other:?}"),
            };
            ScriptCommand::Close { id, saved }
        }
        "print" => ScriptCommand::Print,
        other => bail!("unknown command {other:?}"),
    };
    Ok(cmd)
}

fn parse_num(raw: Option<&str>, what: &str) -> Result<u64> {
    let raw = raw.ok_or_else(|| anyhow!("missing {what}"))?;
    raw.parse::<u64>()
        .with_context(|| format!("invalid {what} {raw:?}"))
}

fn parse_id(raw: &str) -> Result<DocumentId> {
    Ok(DocumentId(parse_num(Some(raw), "document id")?))
}
