//! Built-in resource definitions.
//!
//! Both resources are served from the same five npm-backed mirror families;
//! only the package and probe path differ.

use crate::registry::resource::{CdnCandidate, CdnResource};
use crate::well_known::{
    EDITOR_ENGINE, EDITOR_ENGINE_PROBE_PATH, RUNTIME_CORE, RUNTIME_CORE_PROBE_PATH,
};

/// (label, base URL, priority) for every default mirror family.
const MIRRORS: [(&str, &str, u32); 5] = [
    ("jsdelivr", "https://cdn.jsdelivr.net/npm", 1),
    ("jsdelivr-fastly", "https://fastly.jsdelivr.net/npm", 2),
    ("unpkg", "https://unpkg.com", 3),
    ("jsdelivr-gcore", "https://gcore.jsdelivr.net/npm", 4),
    ("jsdmirror", "https://cdn.jsdmirror.com/npm", 5),
];

fn mirror_candidates() -> Vec<CdnCandidate> {
    MIRRORS
        .iter()
        .map(|(name, base_url, priority)| CdnCandidate::new(*name, *base_url, *priority))
        .collect()
}

/// The resources registered when no configuration overrides them.
pub fn default_resources() -> Vec<CdnResource> {
    vec![
        CdnResource::from_parts(
            EDITOR_ENGINE.to_string(),
            EDITOR_ENGINE_PROBE_PATH.to_string(),
            mirror_candidates(),
        ),
        CdnResource::from_parts(
            RUNTIME_CORE.to_string(),
            RUNTIME_CORE_PROBE_PATH.to_string(),
            mirror_candidates(),
        ),
    ]
}
