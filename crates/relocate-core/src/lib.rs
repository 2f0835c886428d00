//! Relocate Core - Image relocation for packaged Helm charts
//!
//! Rewrites `global.imageRegistry` and `global.imageNamespace` in the
//! top-level `values.yaml` of a chart archive, copying every other entry
//! through untouched:
//! - `transcoder`: single-pass `.tgz` to `.tgz` copy
//! - `rewriter`: `values.yaml` decode, relocate, encode
//! - `matcher`: which entry is the chart's own values file
//! - `relocation`: the target registry and namespace

pub mod body;
pub mod error;
pub mod matcher;
pub mod relocation;
pub mod rewriter;
pub mod transcoder;

pub use error::{RelocateError, Result, Stage};
pub use matcher::is_main_values_file;
pub use relocation::Relocation;
pub use rewriter::{relocate_values, rewrite_values};
pub use transcoder::{RewrittenEntry, TranscodeOptions, TranscodeReport, relocate_file, transcode};
