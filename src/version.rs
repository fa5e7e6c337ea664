//! Version of gitmeta itself, as named in generated footers.
//!
//! `build.rs` embeds `git describe` output of the gitmeta checkout in
//! `GITMETA_GIT_VERSION`. Builds from a source tarball have no such value and
//! report no version; callers treat that as a normal case.

/// Compile-time `git describe` output, if the build had one.
const GIT_VERSION: Option<&str> = option_env!("GITMETA_GIT_VERSION");

/// Best-effort version lookup. Never fails.
pub fn current_version() -> Option<&'static str> {
    normalize(GIT_VERSION)
}

fn normalize(raw: Option<&'static str>) -> Option<&'static str> {
    raw.map(str::trim).filter(|v| !v.is_empty())
}
