//! Per-line classifiers feeding the correlation model.
//!
//! Each classifier is a (gate, handler) pair. The gate is a plain substring
//! test that must pass before the handler runs its capturing expressions.
//! Every classifier sees every line.

use tracing::{debug, trace, warn};

use super::{CorrelationModel, TransitionKind};
use crate::error::{ReconcileError, Result};
use crate::patterns::{self, nth_capture};

type Handler = fn(&mut CorrelationModel, &str) -> Result<bool>;

/// Substring that must occur in a line before a handler runs.
#[derive(Debug, Clone, Copy)]
pub(super) enum Gate {
    /// Exact phrase, for handlers that test the same phrase verbatim.
    Phrase(&'static str),
    /// ASCII case-insensitive, for handlers driven by `(?i)` expressions.
    Word(&'static str),
}

impl Gate {
    fn admits(self, line: &str) -> bool {
        match self {
            Gate::Phrase(phrase) => line.contains(phrase),
            Gate::Word(word) => patterns::contains_ignore_ascii_case(line, word),
        }
    }
}

pub(super) struct Classifier {
    name: &'static str,
    gate: Gate,
    handler: Handler,
}

impl Classifier {
    /// Returns true when the line contributed to the model.
    pub(super) fn run(&self, model: &mut CorrelationModel, line: &str) -> Result<bool> {
        if !self.gate.admits(line) {
            return Ok(false);
        }
        let matched = (self.handler)(model, line)?;
        if matched {
            trace!(classifier = self.name, "{}", line);
        }
        Ok(matched)
    }
}

pub(super) static CLASSIFIERS: [Classifier; 5] = [
    Classifier {
        name: "deleted",
        gate: Gate::Phrase(patterns::DELETED),
        handler: classify_deleted,
    },
    Classifier {
        name: "renamed",
        gate: Gate::Phrase(patterns::RIGHT_LANGUAGE_SUFFIX),
        handler: classify_renamed,
    },
    Classifier {
        name: "session",
        gate: Gate::Word(patterns::SESSION_MARKER),
        handler: classify_session_boundary,
    },
    Classifier {
        name: "operation",
        gate: Gate::Word(patterns::WYSIWYG),
        handler: classify_operation,
    },
    Classifier {
        name: "backup",
        gate: Gate::Phrase(patterns::BACKUP_PERFORMED),
        handler: classify_backup,
    },
];

fn classify_deleted(model: &mut CorrelationModel, line: &str) -> Result<bool> {
    let subdoc = patterns::first_capture(&patterns::SUBDOC_ID, line)
        .ok_or_else(|| ReconcileError::missing("deleted simpledoc id", line))?;
    let subdoc = patterns::verify_subdoc_id(subdoc, line)?;
    model.mark_deleted(subdoc);
    Ok(true)
}

/// Renames to the right language suffix. A deletion line is never a rename.
fn classify_renamed(model: &mut CorrelationModel, line: &str) -> Result<bool> {
    if line.contains(patterns::DELETED) {
        return Ok(false);
    }
    let component = patterns::first_capture(&patterns::COMPONENT_ID, line)
        .ok_or_else(|| ReconcileError::missing("renamed component id", line))?;
    let component = patterns::verify_component_id(component, line)?;
    let subdoc = patterns::first_capture(&patterns::SUBDOC_ID, line)
        .ok_or_else(|| ReconcileError::missing("renamed simpledoc id", line))?;
    let subdoc = patterns::verify_subdoc_id(subdoc, line)?;
    let language = nth_capture(&patterns::PATH_LANGUAGE, line, 0)
        .ok_or_else(|| ReconcileError::missing("original path language", line))?;
    let (from, to) = name_pair(line)?;

    let description = format!("original path {language}, file {from} to {to}");
    model
        .transitions
        .record(TransitionKind::Renamed, component, &description, subdoc);
    Ok(true)
}

/// Session markers only register the component; open/close is the rewriter's job.
fn classify_session_boundary(model: &mut CorrelationModel, line: &str) -> Result<bool> {
    let profile = model.profile();
    let mut matched = false;
    for detector in [profile.start_detector(), profile.end_detector()] {
        for caps in detector.captures_iter(line) {
            let component = patterns::verify_component_id(&caps[1], line)?;
            model.register_component(component);
            matched = true;
        }
    }
    Ok(matched)
}

/// Locations referenced by one operation line, one entry per path mention.
#[derive(Debug, Default)]
struct Mentions<'l> {
    component: &'l str,
    basename: &'l str,
    subdocs: Vec<&'l str>,
    path_languages: Vec<&'l str>,
    variant_languages: Vec<&'l str>,
}

impl<'l> Mentions<'l> {
    fn add_subdoc(&mut self, subdoc: &'l str) {
        if !self.subdocs.contains(&subdoc) {
            self.subdocs.push(subdoc);
        }
    }

    /// `from -> to` ids; both mentions are required.
    fn subdoc_pair(&self, line: &str) -> Result<String> {
        match self.subdocs.as_slice() {
            [from, to, ..] => Ok(format!("{from} -> {to}")),
            _ => Err(ReconcileError::missing("destination simpledoc id", line)),
        }
    }

    fn describe(&self, line: &str) -> Result<String> {
        let to_language = self
            .path_languages
            .get(1)
            .ok_or_else(|| ReconcileError::missing("destination path language", line))?;
        let (from, to) = name_pair(line)?;
        Ok(format!(
            "path {}, file {} to path {}, file {}",
            self.path_languages[0], from, to_language, to
        ))
    }
}

fn name_pair(line: &str) -> Result<(&str, &str)> {
    let mut names = patterns::WYSIWYG_NAME.find_iter(line).map(|m| m.as_str());
    let from = names
        .next()
        .ok_or_else(|| ReconcileError::missing("source wysiwyg name", line))?;
    let to = names
        .next()
        .ok_or_else(|| ReconcileError::missing("destination wysiwyg name", line))?;
    Ok((from, to))
}

/// Operations touching `<component>/<simpledoc>/.../<basename>` locations.
fn classify_operation(model: &mut CorrelationModel, line: &str) -> Result<bool> {
    let default_language = model.settings.default_language().to_string();
    let mut path_languages = patterns::PATH_LANGUAGE.captures_iter(line);
    let mut variant_languages = patterns::VARIANT_LANGUAGE.captures_iter(line);
    let mut mentions = Mentions::default();
    let mut found = false;

    for caps in patterns::OPERATION.captures_iter(line) {
        let path_language = path_languages
            .next()
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ReconcileError::missing("path language", line))?;
        mentions.path_languages.push(path_language);

        let variant = match variant_languages.next() {
            Some(c) => c.get(1).map(|m| m.as_str()),
            None => {
                debug!("No language extension: {}", line);
                None
            }
        };
        mentions.variant_languages.push(variant.unwrap_or(&default_language));

        let (component, subdoc, basename) = (
            caps.get(1).map_or("", |m| m.as_str()),
            caps.get(2).map_or("", |m| m.as_str()),
            caps.get(3).map_or("", |m| m.as_str()),
        );
        let component = patterns::verify_component_id(component, line)?;
        let subdoc = patterns::verify_subdoc_id(subdoc, line)?;
        let basename = patterns::verify_basename(basename, line)?;

        model.register_component(component);
        model.link_subdoc(component, subdoc);
        model.link_basename(component, basename);

        mentions.component = component;
        mentions.add_subdoc(subdoc);
        mentions.basename = basename;
        found = true;
    }

    if !found {
        return Ok(false);
    }
    trace!(
        component = mentions.component,
        languages = ?mentions.variant_languages,
        "operation mentions"
    );

    let mut names = patterns::OPERATION_NAME
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str());
    let first = names
        .next()
        .ok_or_else(|| ReconcileError::missing("wysiwyg name", line))?;

    let Some(second) = names.next() else {
        if !patterns::SINGLE_MENTION_PHRASES
            .iter()
            .any(|phrase| line.contains(phrase))
        {
            warn!(name = first, "Unrecognized operation: {}", line);
        }
        return Ok(true);
    };

    let merged = line.contains(patterns::MERGED_INTO);
    let translated = line.contains(patterns::INTO_RIGHT_LOCATION_LANGUAGE);

    if first == second {
        let copied = line.contains(patterns::COPIED_INTO);
        let non_default_tagged_as_default = mentions.path_languages[0] != default_language;
        let kmelia_same_language_duplicate = mentions.component.starts_with(patterns::KMELIA_PREFIX)
            && mentions.subdocs.len() > 1
            && mentions.path_languages[0] == mentions.path_languages[1]
            && line.contains(patterns::NOT_MERGED_INTO_TARGET);

        if non_default_tagged_as_default || kmelia_same_language_duplicate {
            for subdoc in &mentions.subdocs {
                model.flag_potential_loss(mentions.component, mentions.basename, subdoc);
            }
        }

        if copied {
            let description = mentions.describe(line)?;
            let ids = mentions.subdoc_pair(line)?;
            model
                .transitions
                .record(TransitionKind::Copied, mentions.component, &description, &ids);
        }
    }

    if translated {
        let description = mentions.describe(line)?;
        let from = mentions.subdocs[0];
        let to = mentions.subdocs.get(1).copied().unwrap_or(from);
        model.mark_translated(from);
        model.mark_translated(to);
        model.transitions.record(
            TransitionKind::Translated,
            mentions.component,
            &description,
            &format!("{from} -> {to}"),
        );
    }

    if merged {
        let description = mentions.describe(line)?;
        let ids = mentions.subdoc_pair(line)?;
        model
            .transitions
            .record(TransitionKind::Merged, mentions.component, &description, &ids);
    }

    Ok(true)
}

/// Physical backups of `<component>/<simpledoc>` directories.
fn classify_backup(model: &mut CorrelationModel, line: &str) -> Result<bool> {
    let mut matched = false;
    for caps in patterns::BACKUP.captures_iter(line) {
        let component = patterns::verify_component_id(&caps[1], line)?;
        let subdoc = patterns::verify_subdoc_id(&caps[2], line)?;
        model.register_component(component);
        model.link_subdoc(component, subdoc);
        matched = true;
    }
    Ok(matched)
}
