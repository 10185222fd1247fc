//! Plain-text roster files.
//!
//! Each actor is one record of five lines followed by a blank separator:
//!
//! ```text
//! <kind code>
//! <x>
//! <y>
//! <name>
//! <alive: 1 or 0>
//!
//! ```
//!
//! Loading trims every field and tolerates any number of blank lines
//! between records. Line numbers in errors are 1-based. Saving refuses
//! names that would not read back unchanged.

use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use skirmish_core::{Actor, ActorKind, KindError, Position};

/// Number of field lines in one record, excluding the separator.
const RECORD_FIELDS: usize = 5;

// ── Errors ──────────────────────────────────────────────────────

/// A roster could not be written or read back.
#[derive(Debug)]
pub enum PersistError {
    /// The underlying reader or writer failed.
    Io(io::Error),
    /// A field could not be parsed.
    Parse {
        /// 1-based line number of the offending field.
        line: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// The kind code does not name a known kind.
    Kind {
        /// 1-based line number of the kind field.
        line: usize,
        /// The underlying kind error.
        source: KindError,
    },
    /// A name is blank, spans lines, or has surrounding whitespace.
    InvalidName {
        /// The rejected name.
        name: String,
    },
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "roster i/o error: {e}"),
            Self::Parse { line, reason } => write!(f, "line {line}: {reason}"),
            Self::Kind { line, source } => write!(f, "line {line}: {source}"),
            Self::InvalidName { name } => write!(f, "name {name:?} cannot be stored"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Kind { source, .. } => Some(source),
            Self::Parse { .. } | Self::InvalidName { .. } => None,
        }
    }
}

impl From<io::Error> for PersistError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

// ── Saving ──────────────────────────────────────────────────────

/// Write every actor, dead or alive, as one record.
///
/// Each actor is read under its own shared lock. Nothing is written when
/// any name is rejected.
pub fn save<W: Write>(actors: &[Actor], mut out: W) -> Result<(), PersistError> {
    let snaps: Vec<_> = actors.iter().map(Actor::snapshot).collect();
    if let Some(bad) = snaps.iter().find(|s| !storable_name(&s.name)) {
        return Err(PersistError::InvalidName {
            name: bad.name.to_string(),
        });
    }

    for snap in &snaps {
        write!(
            out,
            "{}\n{}\n{}\n{}\n{}\n\n",
            snap.kind.code(),
            snap.position.x,
            snap.position.y,
            snap.name,
            u8::from(snap.alive),
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Create (or truncate) `path` and save `actors` into it.
pub fn save_to_path(actors: &[Actor], path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    save(actors, BufWriter::new(file))?;
    tracing::debug!(path = %path.display(), count = actors.len(), "roster saved");
    Ok(())
}

/// A name must be a single non-blank line with no surrounding whitespace.
fn storable_name(name: &str) -> bool {
    !name.is_empty() && name.trim() == name && !name.contains(['\n', '\r'])
}

// ── Loading ─────────────────────────────────────────────────────

/// Read every record from `input`.
pub fn load<R: BufRead>(input: R) -> Result<Vec<Actor>, PersistError> {
    let mut actors = Vec::new();
    let mut fields: Vec<(usize, String)> = Vec::with_capacity(RECORD_FIELDS);
    let mut last_line = 0;

    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = line?;
        let trimmed = line.trim();

        // Blank lines only separate records; a name is never blank.
        if trimmed.is_empty() {
            if fields.is_empty() {
                continue;
            }
            return Err(PersistError::Parse {
                line: line_no,
                reason: format!(
                    "record ends after {} of {RECORD_FIELDS} fields",
                    fields.len()
                ),
            });
        }

        fields.push((line_no, trimmed.to_string()));
        if let [kind, x, y, name, alive] = fields.as_slice() {
            actors.push(parse_record([kind, x, y, name, alive])?);
            fields.clear();
        }
    }

    if !fields.is_empty() {
        return Err(PersistError::Parse {
            line: last_line + 1,
            reason: format!(
                "unexpected end of input after {} of {RECORD_FIELDS} fields",
                fields.len()
            ),
        });
    }
    Ok(actors)
}

/// Open `path` and load every record from it.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<Vec<Actor>, PersistError> {
    let path = path.as_ref();
    let actors = load(BufReader::new(File::open(path)?))?;
    tracing::debug!(path = %path.display(), count = actors.len(), "roster loaded");
    Ok(actors)
}

fn parse_record(record: [&(usize, String); RECORD_FIELDS]) -> Result<Actor, PersistError> {
    let [(kind_line, kind), (x_line, x), (y_line, y), (_, name), (alive_line, alive)] = record;

    let code: u8 = parse_field(*kind_line, kind, "kind code")?;
    let kind = ActorKind::from_code(code).map_err(|source| PersistError::Kind {
        line: *kind_line,
        source,
    })?;
    let x: i32 = parse_field(*x_line, x, "x coordinate")?;
    let y: i32 = parse_field(*y_line, y, "y coordinate")?;
    let alive = match alive.as_str() {
        "1" => true,
        "0" => false,
        other => {
            return Err(PersistError::Parse {
                line: *alive_line,
                reason: format!("alive flag must be 1 or 0, got '{other}'"),
            })
        }
    };

    Ok(Actor::with_state(kind, Position { x, y }, name.as_str(), alive))
}

fn parse_field<T: FromStr>(line: usize, text: &str, what: &str) -> Result<T, PersistError> {
    text.parse().map_err(|_| PersistError::Parse {
        line,
        reason: format!("invalid {what} '{text}'"),
    })
}
