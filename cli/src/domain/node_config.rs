//! Node config patching by exact-string substitution.
//!
//! The node writes `.config/config.yml` on first start with placeholder
//! values. The installer rewrites three known fragments in place; the rest of
//! the file is left byte-for-byte untouched. No YAML parsing happens here, so
//! comments and key order in the node's file survive.

use serde::Serialize;

/// Values written into the node config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSettings {
    pub max_frames: i64,
    pub listen_grpc_multiaddr: String,
    pub listen_rest_multiaddr: String,
}

/// A single literal substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPatch {
    pub key: &'static str,
    pub from: String,
    pub to: String,
}

/// What happened to one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchOutcome {
    /// The placeholder was found and replaced.
    Patched,
    /// The target value is already present.
    AlreadySet,
    /// Neither the placeholder nor the target value is present.
    Missing,
}

/// Result of applying patches to a config text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchReport {
    pub text: String,
    pub outcomes: Vec<(&'static str, PatchOutcome)>,
}

impl PatchReport {
    /// Whether any patch rewrote the text.
    #[must_use]
    pub fn is_changed(&self) -> bool {
        self.outcomes
            .iter()
            .any(|(_, o)| *o == PatchOutcome::Patched)
    }

    /// Keys found in neither their placeholder nor their target form.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|(_, o)| *o == PatchOutcome::Missing)
            .map(|(k, _)| *k)
            .collect()
    }
}

/// The three substitutions applied after the node first writes its config.
#[must_use]
pub fn default_patches(settings: &NodeSettings) -> Vec<ConfigPatch> {
    vec![
        ConfigPatch {
            key: "maxFrames",
            from: "maxFrames: -1".to_string(),
            to: format!("maxFrames: {}", settings.max_frames),
        },
        ConfigPatch {
            key: "listenGrpcMultiaddr",
            from: "listenGrpcMultiaddr: \"\"".to_string(),
            to: format!("listenGrpcMultiaddr: {}", settings.listen_grpc_multiaddr),
        },
        ConfigPatch {
            key: "listenRESTMultiaddr",
            from: "listenRESTMultiaddr: \"\"".to_string(),
            to: format!("listenRESTMultiaddr: {}", settings.listen_rest_multiaddr),
        },
    ]
}

/// Apply each patch to `text` in order.
///
/// A key already holding its target value is `AlreadySet` and never touched
/// again. Substitution only rewrites lines whose trimmed content equals the
/// placeholder exactly.
#[must_use]
pub fn apply_patches(text: &str, patches: &[ConfigPatch]) -> PatchReport {
    let mut out = text.to_string();
    let mut outcomes = Vec::with_capacity(patches.len());
    for patch in patches {
        let outcome = if has_line_fragment(&out, &patch.to) {
            PatchOutcome::AlreadySet
        } else if let Some(patched) = replace_line_fragment(&out, &patch.from, &patch.to) {
            out = patched;
            PatchOutcome::Patched
        } else {
            PatchOutcome::Missing
        };
        outcomes.push((patch.key, outcome));
    }
    PatchReport { text: out, outcomes }
}

/// Report the state of each key without changing anything.
#[must_use]
pub fn inspect(text: &str, patches: &[ConfigPatch]) -> Vec<(&'static str, PatchOutcome)> {
    apply_patches(text, patches).outcomes
}

fn has_line_fragment(text: &str, fragment: &str) -> bool {
    text.lines().any(|l| l.trim() == fragment)
}

/// Rewrite every line whose trimmed content is `from`, keeping its
/// indentation and line ending. `None` when no line matched.
fn replace_line_fragment(text: &str, from: &str, to: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len() + to.len());
    let mut hit = false;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end_matches(['\n', '\r']);
        if content.trim() == from {
            let indent = &content[..content.len() - content.trim_start().len()];
            out.push_str(indent);
            out.push_str(to);
            out.push_str(&line[content.len()..]);
            hit = true;
        } else {
            out.push_str(line);
        }
    }
    hit.then_some(out)
}
