//! Correlation model built from one full pass over a dbBuilder log.
//!
//! The model records which component ids, simpledoc ids and wysiwyg basenames
//! reference each other, and classifies the operations the migration performed
//! on them (merge, copy, translation, rename, deletion, backup).
//!
//! # Module Structure
//!
//! - [`collections`] - insertion-ordered sets and relations
//! - `classify` - the per-line classifiers feeding the model

mod classify;
pub mod collections;

use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use crate::error::{ReconcileError, Result};
use crate::input;
use crate::patterns::{self, Profile};

pub use collections::{OrderedMap, OrderedSet, Relation, TransitionTable};

/// Language used when a path or file name carries no language tag.
pub const DEFAULT_LANGUAGE: &str = "fr";

/// Settings the engine needs from the surrounding configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSettings {
    default_language: String,
    profile: Profile,
}

impl ModelSettings {
    /// Validates `default_language` (two ASCII letters).
    pub fn new(default_language: impl Into<String>, profile: Profile) -> Result<Self> {
        let default_language = default_language.into();
        if !patterns::is_language_code(&default_language) {
            return Err(ReconcileError::InvalidLanguage(default_language));
        }
        Ok(Self {
            default_language,
            profile,
        })
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            profile: Profile::default(),
        }
    }
}

/// Kinds of operation that produce a transition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionKind {
    Merged,
    Copied,
    Translated,
    Renamed,
}

impl TransitionKind {
    /// Report order.
    pub const ALL: [TransitionKind; 4] = [
        TransitionKind::Merged,
        TransitionKind::Copied,
        TransitionKind::Translated,
        TransitionKind::Renamed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TransitionKind::Merged => "merged",
            TransitionKind::Copied => "copied",
            TransitionKind::Translated => "translated",
            TransitionKind::Renamed => "renamed",
        }
    }
}

/// Transition records of every kind, each keyed by component then description.
#[derive(Debug, Clone, Default)]
pub struct Transitions {
    merged: TransitionTable,
    copied: TransitionTable,
    translated: TransitionTable,
    renamed: TransitionTable,
}

impl Transitions {
    pub fn table(&self, kind: TransitionKind) -> &TransitionTable {
        match kind {
            TransitionKind::Merged => &self.merged,
            TransitionKind::Copied => &self.copied,
            TransitionKind::Translated => &self.translated,
            TransitionKind::Renamed => &self.renamed,
        }
    }

    fn table_mut(&mut self, kind: TransitionKind) -> &mut TransitionTable {
        match kind {
            TransitionKind::Merged => &mut self.merged,
            TransitionKind::Copied => &mut self.copied,
            TransitionKind::Translated => &mut self.translated,
            TransitionKind::Renamed => &mut self.renamed,
        }
    }

    pub fn record(&mut self, kind: TransitionKind, component: &str, description: &str, ids: &str) {
        self.table_mut(kind).record(component, description, ids);
    }
}

/// In-memory graph of the entities referenced by a log.
#[derive(Debug, Clone, Default)]
pub struct CorrelationModel {
    settings: ModelSettings,
    components: OrderedSet,
    component_subdocs: Relation,
    subdoc_owners: Relation,
    component_basenames: Relation,
    basename_components: Relation,
    potential_losses: TransitionTable,
    deleted_subdocs: HashSet<String>,
    translated_subdocs: HashSet<String>,
    transitions: Transitions,
    lines_scanned: usize,
}

impl CorrelationModel {
    pub fn new(settings: ModelSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Builds the model from every line of a log, in order.
    pub fn build<I, S>(lines: I, settings: ModelSettings) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut model = Self::new(settings);
        for line in lines {
            model.scan_line(line.as_ref())?;
        }
        Ok(model)
    }

    /// Builds the model by reading the log file once.
    pub fn build_from_path(path: &Path, settings: ModelSettings) -> Result<Self> {
        let mut model = Self::new(settings);
        for line in input::open_log(path)? {
            model.scan_line(&input::decode(&line?))?;
        }
        info!(
            lines = model.lines_scanned,
            components = model.components.len(),
            "Correlation model built"
        );
        Ok(model)
    }

    /// Runs every classifier against one line. None short-circuits another.
    pub fn scan_line(&mut self, line: &str) -> Result<()> {
        self.lines_scanned += 1;
        for classifier in &classify::CLASSIFIERS {
            classifier.run(self, line)?;
        }
        Ok(())
    }

    pub fn settings(&self) -> &ModelSettings {
        &self.settings
    }

    pub fn profile(&self) -> Profile {
        self.settings.profile
    }

    pub fn lines_scanned(&self) -> usize {
        self.lines_scanned
    }

    /// Known component ids, in registration order.
    pub fn components(&self) -> &OrderedSet {
        &self.components
    }

    pub fn subdocs_of(&self, component: &str) -> Option<&OrderedSet> {
        self.component_subdocs.values_of(component)
    }

    pub fn basenames_of(&self, component: &str) -> Option<&OrderedSet> {
        self.component_basenames.values_of(component)
    }

    /// `basename -> {component ids}` over the whole log.
    pub fn basename_components(&self) -> &Relation {
        &self.basename_components
    }

    /// `component -> basename -> {simpledoc ids}` flagged by the loss heuristics.
    pub fn potential_losses(&self) -> &TransitionTable {
        &self.potential_losses
    }

    pub fn transitions(&self, kind: TransitionKind) -> &TransitionTable {
        self.transitions.table(kind)
    }

    pub fn deleted_count(&self) -> usize {
        self.deleted_subdocs.len()
    }

    pub fn is_deleted(&self, subdoc: &str) -> bool {
        self.deleted_subdocs.contains(subdoc)
    }

    pub fn is_translated(&self, subdoc: &str) -> bool {
        self.translated_subdocs.contains(subdoc)
    }

    /// Finds the known component a line belongs to.
    ///
    /// Component-id tokens of the line are matched first, the earliest
    /// registered component winning. Otherwise the simpledoc ids of the line
    /// are looked up among the simpledocs owned by known components.
    pub fn component_id_for_line<'a>(&'a self, line: &'a str) -> Option<&'a str> {
        let by_token = patterns::COMPONENT_ID
            .find_iter(line)
            .filter_map(|m| self.components.rank(m.as_str()).map(|rank| (rank, m.as_str())))
            .min_by_key(|(rank, _)| *rank);
        if let Some((_, id)) = by_token {
            return Some(id);
        }

        patterns::SUBDOC_ID
            .find_iter(line)
            .filter_map(|m| self.subdoc_owners.values_of(m.as_str()))
            .flat_map(|owners| owners.iter())
            .filter_map(|owner| self.components.rank(owner).map(|rank| (rank, owner)))
            .min_by_key(|(rank, _)| *rank)
            .map(|(_, owner)| owner)
    }

    /// Drops a component and the simpledocs/basenames attributed to it from the
    /// live lookup tables. Operation records and report relations are kept.
    pub fn forget(&mut self, component: &str) {
        self.components.remove(component);
        if let Some(subdocs) = self.component_subdocs.remove(component) {
            for subdoc in subdocs.iter() {
                if let Some(owners) = self.subdoc_owners.get_mut(subdoc) {
                    owners.remove(component);
                }
            }
        }
        self.component_basenames.remove(component);
    }

    fn register_component(&mut self, component: &str) {
        self.components.insert(component);
    }

    fn link_subdoc(&mut self, component: &str, subdoc: &str) {
        self.component_subdocs.put(component, subdoc);
        self.subdoc_owners.put(subdoc, component);
    }

    fn link_basename(&mut self, component: &str, basename: &str) {
        self.component_basenames.put(component, basename);
        self.basename_components.put(basename, component);
    }

    fn flag_potential_loss(&mut self, component: &str, basename: &str, subdoc: &str) {
        self.potential_losses.record(component, basename, subdoc);
    }

    fn mark_deleted(&mut self, subdoc: &str) {
        self.deleted_subdocs.insert(subdoc.to_string());
    }

    fn mark_translated(&mut self, subdoc: &str) {
        self.translated_subdocs.insert(subdoc.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(lines: &[&str]) -> CorrelationModel {
        CorrelationModel::build(lines.iter(), ModelSettings::default()).unwrap()
    }

    #[test]
    fn settings_reject_bad_language() {
        assert!(ModelSettings::new("en", Profile::Purge).is_ok());
        assert!(matches!(
            ModelSettings::new("eng", Profile::Adjustment),
            Err(ReconcileError::InvalidLanguage(_))
        ));
    }

    #[test]
    fn session_lines_register_components_in_order() {
        let model = build(&[
            "Starting wysiwyg adjustment for component instance id kw12",
            "Starting wysiwyg adjustment for component instance id almanach3",
            "Finishing wysiwyg adjustment for component instance id kw12",
        ]);
        assert_eq!(
            model.components().iter().collect::<Vec<_>>(),
            vec!["kw12", "almanach3"]
        );
        assert_eq!(model.lines_scanned(), 3);
    }

    #[test]
    fn component_lookup_matches_whole_tokens_only() {
        let model = build(&["Starting wysiwyg adjustment for component instance id kw12"]);
        assert_eq!(model.component_id_for_line("processing kw12 now"), Some("kw12"));
        assert_eq!(model.component_id_for_line("processing kw123 now"), None);
        assert_eq!(model.component_id_for_line("nothing here"), None);
    }

    #[test]
    fn earliest_registered_component_wins() {
        let model = build(&[
            "Starting wysiwyg adjustment for component instance id kw1",
            "Starting wysiwyg adjustment for component instance id kw2",
        ]);
        assert_eq!(model.component_id_for_line("kw2 then kw1"), Some("kw1"));
    }

    #[test]
    fn subdoc_lookup_falls_back_to_owner() {
        let model = build(&[
            "Physical backup has been performed for directory /data/kw12/simpledoc_7",
        ]);
        assert_eq!(model.subdocs_of("kw12").map(OrderedSet::len), Some(1));
        assert_eq!(
            model.component_id_for_line("simpledoc_7 content is empty"),
            Some("kw12")
        );
        assert_eq!(model.component_id_for_line("simpledoc_8 content is empty"), None);
    }

    #[test]
    fn forget_stops_attribution() {
        let mut model = build(&[
            "Physical backup has been performed for directory /data/kw12/simpledoc_7",
            "Physical backup has been performed for directory /data/kw13/simpledoc_7",
        ]);
        assert_eq!(model.component_id_for_line("simpledoc_7"), Some("kw12"));

        model.forget("kw12");
        assert!(!model.components().contains("kw12"));
        assert!(model.subdocs_of("kw12").is_none());
        assert_eq!(model.component_id_for_line("kw12 simpledoc_7"), Some("kw13"));

        model.forget("kw13");
        assert_eq!(model.component_id_for_line("kw12 simpledoc_7"), None);
    }

    #[test]
    fn malformed_deleted_line_is_fatal() {
        let result = CorrelationModel::build(
            ["this thing has been deleted"],
            ModelSettings::default(),
        );
        assert!(matches!(result, Err(ReconcileError::MissingToken { .. })));
    }
}
