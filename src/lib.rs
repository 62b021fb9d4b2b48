//! Wysiwyg Log Rewriter - reconciles content-migration build logs.
//!
//! A dbBuilder log interleaves the wysiwyg migration of many component
//! instances. This crate reads such a log twice: the first pass builds a
//! correlation model of components, simpledocs and wysiwyg basenames and
//! classifies the operations performed on them, the second pass regroups the
//! log lines per component session. The output starts with a statistics
//! report followed by the regrouped log.
//!
//! # Module Structure
//!
//! - [`patterns`] - fixed regular expressions and phrases recognized in logs
//! - [`model`] - the correlation model and its line classifiers
//! - [`report`] - statistics rendering
//! - [`rewriter`] - session tracking and the two-pass rewrite
//! - [`config`] - user configuration
//! - [`cli`] - command-line definitions shared with `xtask`

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod patterns;
pub mod report;
pub mod rewriter;

pub use config::Config;
pub use error::{ReconcileError, Result};
pub use model::{CorrelationModel, ModelSettings, TransitionKind};
pub use patterns::Profile;
pub use report::{render_statistics, StatisticsSummary};
pub use rewriter::{LogRewriter, RewriteOptions, RewriteSummary};
