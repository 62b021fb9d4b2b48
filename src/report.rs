//! Statistics report rendered from a [`CorrelationModel`].
//!
//! The text layout is fixed: a `#` rule, then sections separated by `-`
//! rules, every list in model insertion order. Rendering the same model
//! twice yields byte-identical output.

use std::fmt::Write as _;

use serde::Serialize;

use crate::model::{CorrelationModel, OrderedSet, Relation, TransitionKind, TransitionTable};
use crate::patterns;

const HASH_RULE: &str = "###################################";
const DASH_RULE: &str = "-----------------------------------";

/// Renders the full statistics block, ending with a blank line.
pub fn render_statistics(model: &CorrelationModel) -> String {
    let mut out = String::new();
    out.push_str(HASH_RULE);
    out.push_str("\nStatistics");
    rule(&mut out);

    write_components(&mut out, model);
    rule(&mut out);

    let _ = write!(out, "\nNb simpledoc deletions : {}", model.deleted_count());
    rule(&mut out);

    write_shared_basenames(&mut out, model);
    rule(&mut out);

    write_potential_losses(&mut out, model);

    for kind in TransitionKind::ALL {
        rule(&mut out);
        write_transitions(&mut out, model, kind);
    }

    out.push('\n');
    out.push_str(HASH_RULE);
    out.push_str("\n\n");
    out
}

fn rule(out: &mut String) {
    out.push('\n');
    out.push_str(DASH_RULE);
}

fn join<'a>(values: impl IntoIterator<Item = &'a str>, separator: &str) -> String {
    values.into_iter().collect::<Vec<_>>().join(separator)
}

fn write_components(out: &mut String, model: &CorrelationModel) {
    let _ = write!(out, "\nNb components : {}", model.components().len());
    out.push_str("\nPer component :");
    for component in model.components().iter() {
        let _ = write!(out, "\n\t{component}");
        if let Some(subdocs) = model.subdocs_of(component) {
            let _ = write!(out, "\n\t\tnb simpledocs -> {}", subdocs.len());
        }
        if let Some(basenames) = model.basenames_of(component) {
            let _ = write!(out, "\n\t\tnb wysiwyg basenames -> {}", basenames.len());
        }
    }
}

fn shared(relation: &Relation) -> impl Iterator<Item = (&str, &OrderedSet)> {
    relation.iter().filter(|(_, components)| components.len() > 1)
}

fn write_shared_basenames(out: &mut String, model: &CorrelationModel) {
    let mut basenames = OrderedSet::new();
    let mut components = OrderedSet::new();
    for (basename, owners) in shared(model.basename_components()) {
        let _ = write!(
            out,
            "\n{basename} basename occurs in several component ids ({}): {}",
            owners.len(),
            join(owners.iter(), ", ")
        );
        basenames.insert(basename);
        for component in owners.iter() {
            components.insert(component);
        }
    }
    let _ = write!(
        out,
        "\nNb wysiwyg basenames ids that occur in several component ids : {}",
        basenames.len()
    );
    let _ = write!(out, "\n--> {}", join(basenames.iter(), ", "));
    let _ = write!(
        out,
        "\nNb component ids containing same wysiwyg basenames with others : {}",
        components.len()
    );
    let _ = write!(out, "\n--> {}", join(components.iter(), ", "));
}

fn write_potential_losses(out: &mut String, model: &CorrelationModel) {
    let losses = model.potential_losses();
    for (component, basenames) in losses.iter() {
        let _ = write!(out, "\n{component}");
        for (basename, subdocs) in basenames.iter() {
            let _ = write!(out, "\n\t{basename}");
            let all_deleted = subdocs.iter().all(|s| model.is_deleted(s));
            let annotated: Vec<String> = subdocs
                .iter()
                .map(|s| {
                    if model.is_deleted(s) {
                        format!("{s}(d)")
                    } else {
                        s.to_string()
                    }
                })
                .collect();
            let prefix = if all_deleted { "\n\t~d\t" } else { "\n\t\t" };
            out.push_str(prefix);
            out.push_str(&annotated.join(", "));
        }
    }
    let _ = write!(
        out,
        "\nNb component ids with potential losses: {}",
        losses.len()
    );
    let _ = write!(
        out,
        "\nNb wysiwyg basenames with potential losses: {}",
        losses.description_count()
    );
}

/// Annotates the simpledoc ids found in transition values: `(d)` deleted,
/// `(t)` translated. Ids repeated across values are listed once.
fn annotate_transition(model: &CorrelationModel, values: &OrderedSet) -> String {
    let mut ids = OrderedSet::new();
    for value in values.iter() {
        for id in patterns::SUBDOC_ID.find_iter(value) {
            let id = id.as_str();
            let annotated = if model.is_deleted(id) {
                format!("{id}(d)")
            } else if model.is_translated(id) {
                format!("{id}(t)")
            } else {
                id.to_string()
            };
            ids.insert(&annotated);
        }
    }
    join(ids.iter(), " -> ")
}

fn write_transitions(out: &mut String, model: &CorrelationModel, kind: TransitionKind) {
    let table = model.transitions(kind);
    for (component, descriptions) in table.iter() {
        let _ = write!(out, "\n{component}");
        for (description, values) in descriptions.iter() {
            let _ = write!(out, "\n\t{description}");
            let _ = write!(out, "\n\t\t{}", annotate_transition(model, values));
        }
    }
    let action = kind.label();
    let _ = write!(
        out,
        "\nNb component ids with {action} wysiwyg: {}",
        table.len()
    );
    let _ = write!(
        out,
        "\nNb wysiwyg names {action}: {}",
        table.description_count()
    );
}

/// Per-section counts of the report, for machine consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticsSummary {
    pub components: usize,
    pub simpledoc_deletions: usize,
    pub shared_basenames: Vec<String>,
    pub components_sharing_basenames: usize,
    pub components_with_potential_losses: usize,
    pub basenames_with_potential_losses: usize,
    pub merged: ActionSummary,
    pub copied: ActionSummary,
    pub translated: ActionSummary,
    pub renamed: ActionSummary,
}

/// Counts for one transition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActionSummary {
    pub components: usize,
    pub names: usize,
}

impl From<&TransitionTable> for ActionSummary {
    fn from(table: &TransitionTable) -> Self {
        Self {
            components: table.len(),
            names: table.description_count(),
        }
    }
}

impl StatisticsSummary {
    pub fn from_model(model: &CorrelationModel) -> Self {
        let mut components_sharing = OrderedSet::new();
        let mut shared_basenames = Vec::new();
        for (basename, owners) in shared(model.basename_components()) {
            shared_basenames.push(basename.to_string());
            for owner in owners.iter() {
                components_sharing.insert(owner);
            }
        }
        let action = |kind| ActionSummary::from(model.transitions(kind));

        Self {
            components: model.components().len(),
            simpledoc_deletions: model.deleted_count(),
            shared_basenames,
            components_sharing_basenames: components_sharing.len(),
            components_with_potential_losses: model.potential_losses().len(),
            basenames_with_potential_losses: model.potential_losses().description_count(),
            merged: action(TransitionKind::Merged),
            copied: action(TransitionKind::Copied),
            translated: action(TransitionKind::Translated),
            renamed: action(TransitionKind::Renamed),
        }
    }
}
