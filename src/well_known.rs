//! Well-known resources and their convenience lookups.
//!
//! The editor bootstrap loads the engine's AMD loader from
//! `editor_engine_base_url()`; the runtime bootstrap fetches its package
//! index from `runtime_core_base_url()`. Both treat the answer as the most
//! likely reachable mirror, not a guaranteed one.

use crate::error::ResolveResult;
use crate::health::Probe;
use crate::resolver::Resolver;

/// Browser code editor engine.
pub const EDITOR_ENGINE: &str = "editor-engine";
pub const EDITOR_ENGINE_VERSION_SUFFIX: &str = "/monaco-editor@0.52.2/min/vs";
pub const EDITOR_ENGINE_PROBE_PATH: &str = "/monaco-editor@0.52.2/min/vs/loader.js";

/// In-browser language runtime core package.
pub const RUNTIME_CORE: &str = "runtime-core";
pub const RUNTIME_CORE_VERSION_SUFFIX: &str = "/pyodide@0.27.2/";
pub const RUNTIME_CORE_PROBE_PATH: &str = "/pyodide@0.27.2/pyodide-lock.json";

/// Base URL for the editor engine's `vs` directory.
pub async fn editor_engine_base_url<P: Probe>(resolver: &Resolver<P>) -> ResolveResult<String> {
    resolver
        .resolve(EDITOR_ENGINE, Some(EDITOR_ENGINE_VERSION_SUFFIX))
        .await
}

/// Index URL for the language runtime's core package.
pub async fn runtime_core_base_url<P: Probe>(resolver: &Resolver<P>) -> ResolveResult<String> {
    resolver
        .resolve(RUNTIME_CORE, Some(RUNTIME_CORE_VERSION_SUFFIX))
        .await
}
