//! Fixed pattern catalog for dbBuilder wysiwyg migration logs.
//!
//! Every matcher is case-insensitive and stateless. Classifiers check the
//! cheap phrase constants below before running the capturing expressions.
//! Gates in front of case-insensitive expressions ([`SESSION_MARKER`],
//! [`WYSIWYG`]) are compared with [`contains_ignore_ascii_case`].

use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("catalog pattern must compile")
}

/// A component instance id: letters followed by digits (`kmelia12`).
pub static COMPONENT_ID: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)([a-z]+[0-9]+)"));

/// A sub-document id (`simpledoc_42`).
pub static SUBDOC_ID: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)(simpledoc_[0-9]+)"));

/// A full wysiwyg file name, basename plus variant suffix (`12wysiwyg_en.txt`).
pub static WYSIWYG_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)([a-z_]*[0-9]+wysiwyg[^ \\/]+)"));

/// A two-letter language directory inside a path (`/fr/`).
pub static PATH_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)[\\/]([a-z]{2})[\\/]"));

/// The language suffix of a wysiwyg file. No capture means the default language.
pub static VARIANT_LANGUAGE: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)wysiwyg_([a-z]{2})?\.txt"));

/// `<component>/<simpledoc>/.../<basename>` inside a single path.
pub static OPERATION: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)([a-z]+[0-9]+)[\\/](simpledoc_[0-9]+)[^ ]+[\\/]([a-z_]*[0-9]+wysiwyg)")
});

/// Every wysiwyg file mentioned as the last segment of a path.
pub static OPERATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)[\\/]([a-z_]*[0-9]+wysiwyg[^ ]+)"));

/// `<component>/<simpledoc>` directory of a physical backup.
pub static BACKUP: LazyLock<Regex> =
    LazyLock::new(|| compile(r"(?i)([a-z]+[0-9]+)[\\/](simpledoc_[0-9]+)"));

static COMPONENT_ID_SHAPE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^[a-z]+[0-9]+$"));
static SUBDOC_ID_SHAPE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^simpledoc_[0-9]+$"));
static BASENAME_SHAPE: LazyLock<Regex> = LazyLock::new(|| compile(r"(?i)^.+wysiwyg$"));

static ADJUSTMENT_START: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)Starting wysiwyg adjustment for component instance id ([a-z]+[0-9]+)")
});
static ADJUSTMENT_END: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)Finishing wysiwyg adjustment for component instance id ([a-z]+[0-9]+)")
});
static PURGE_START: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)Starting wysiwyg contents purge for component instance id ([a-z]+[0-9]+)")
});
static PURGE_END: LazyLock<Regex> = LazyLock::new(|| {
    compile(r"(?i)Finishing wysiwyg contents purge for component instance id ([a-z]+[0-9]+)")
});

/// Shared by every session start/end marker of every profile.
pub const SESSION_MARKER: &str = "for component instance id";
/// Present in every operation line (the basename always ends with it).
pub const WYSIWYG: &str = "wysiwyg";

pub const DELETED: &str = "has been deleted";
pub const RIGHT_LANGUAGE_SUFFIX: &str = "with the right language suffix";
pub const BACKUP_PERFORMED: &str = "Physical backup has been performed for directory";
pub const MERGED_INTO: &str = "has been merged into";
pub const COPIED_INTO: &str = "has been copied into";
pub const INTO_RIGHT_LOCATION_LANGUAGE: &str = "into right location language";
pub const NOT_MERGED_INTO_TARGET: &str = "has not been merged into the target";

/// Operation lines that mention a single wysiwyg file on purpose.
pub const SINGLE_MENTION_PHRASES: &[&str] = &[
    "will be deleted from the JCR",
    RIGHT_LANGUAGE_SUFFIX,
    "will be renamed with right language suffix",
];

/// Component family whose same-language duplicates were historically dropped.
pub const KMELIA_PREFIX: &str = "kmelia";

/// Which migration job produced the log. Only the session markers differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// `Starting/Finishing wysiwyg adjustment for component instance id <id>`
    #[default]
    Adjustment,
    /// `Starting/Finishing wysiwyg contents purge for component instance id <id>`
    Purge,
}

impl Profile {
    pub fn start_detector(self) -> &'static Regex {
        match self {
            Profile::Adjustment => &ADJUSTMENT_START,
            Profile::Purge => &PURGE_START,
        }
    }

    pub fn end_detector(self) -> &'static Regex {
        match self {
            Profile::Adjustment => &ADJUSTMENT_END,
            Profile::Purge => &PURGE_END,
        }
    }

    /// Id captured by the session-start marker, if the line carries one.
    pub fn started<'l>(self, line: &'l str) -> Option<&'l str> {
        if !is_session_marker(line) {
            return None;
        }
        first_capture(self.start_detector(), line)
    }

    /// Id captured by the session-end marker, if the line carries one.
    pub fn finished<'l>(self, line: &'l str) -> Option<&'l str> {
        if !is_session_marker(line) {
            return None;
        }
        first_capture(self.end_detector(), line)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Profile::Adjustment => write!(f, "adjustment"),
            Profile::Purge => write!(f, "purge"),
        }
    }
}

/// ASCII case-insensitive substring test, without allocating.
pub fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.as_bytes();
    needle.is_empty()
        || haystack
            .as_bytes()
            .windows(needle.len())
            .any(|window| window.eq_ignore_ascii_case(needle))
}

/// Cheap pre-filter for the start/end detectors of every profile.
pub fn is_session_marker(line: &str) -> bool {
    contains_ignore_ascii_case(line, SESSION_MARKER)
}

/// First capture group of the first match.
pub fn first_capture<'l>(regex: &Regex, line: &'l str) -> Option<&'l str> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Nth (0-based) capture group 1 across successive matches.
pub fn nth_capture<'l>(regex: &Regex, line: &'l str, n: usize) -> Option<&'l str> {
    regex
        .captures_iter(line)
        .nth(n)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

pub fn verify_component_id<'v>(value: &'v str, line: &str) -> Result<&'v str> {
    if COMPONENT_ID_SHAPE.is_match(value) {
        Ok(value)
    } else {
        Err(ReconcileError::MalformedComponentId {
            value: value.to_string(),
            line: line.to_string(),
        })
    }
}

pub fn verify_subdoc_id<'v>(value: &'v str, line: &str) -> Result<&'v str> {
    if SUBDOC_ID_SHAPE.is_match(value) {
        Ok(value)
    } else {
        Err(ReconcileError::MalformedSubdocId {
            value: value.to_string(),
            line: line.to_string(),
        })
    }
}

pub fn verify_basename<'v>(value: &'v str, line: &str) -> Result<&'v str> {
    if BASENAME_SHAPE.is_match(value) {
        Ok(value)
    } else {
        Err(ReconcileError::MalformedBasename {
            value: value.to_string(),
            line: line.to_string(),
        })
    }
}

/// Checks a configured default language: exactly two ASCII letters.
pub fn is_language_code(code: &str) -> bool {
    code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic())
}
