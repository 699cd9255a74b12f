//! Release context collection
//!
//! Gathers branch, explicit tag, commit and manifest version exactly once, in
//! precedence order: CLI flag, then the configured environment variables, then
//! version control. Environment access goes through a lookup closure so tests
//! never need to touch the process environment.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::EnvConfig;
use crate::domain::ReleaseContext;
use crate::error::Result;
use crate::git::Vcs;
use crate::manifest::PackageManifest;
use crate::warnings::PublishWarning;

/// Values given on the command line, which beat every other source
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextOverrides {
    pub branch: Option<String>,
    pub tag: Option<String>,
}

/// Read an environment variable, treating empty values as unset
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}

/// First non-empty value among `names`
fn first_env<F>(names: &[String], env: &F) -> Option<(String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| {
        env(name)
            .filter(|value| !value.trim().is_empty())
            .map(|value| (name.clone(), value))
    })
}

/// Build the release context for this invocation.
///
/// `vcs` is `None` when the working directory is not a repository. Version
/// control failures only produce warnings; the classifier decides later whether
/// a missing branch or commit is fatal. An unreadable manifest version is fatal.
pub fn collect_context<F>(
    overrides: &ContextOverrides,
    env_config: &EnvConfig,
    env: F,
    vcs: Option<&dyn Vcs>,
    manifest: &PackageManifest,
    now: DateTime<Utc>,
) -> Result<(ReleaseContext, Vec<PublishWarning>)>
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();

    let manifest_version = manifest.read_version()?;
    debug!(version = %manifest_version, path = %manifest.path().display(), "manifest version");

    let explicit_tag = match overrides.tag.clone().filter(|t| !t.trim().is_empty()) {
        Some(tag) => Some(tag),
        None => first_env(&env_config.tag, &env).map(|(name, value)| {
            debug!(variable = %name, tag = %value, "explicit tag from environment");
            value
        }),
    };

    let commit_short = match vcs {
        Some(vcs) => match vcs.current_commit_short() {
            Ok(commit) => commit.unwrap_or_default(),
            Err(e) => {
                warn!("cannot read HEAD commit: {}", e);
                warnings.push(PublishWarning::VcsUnavailable {
                    reason: e.to_string(),
                });
                String::new()
            }
        },
        None => {
            warnings.push(PublishWarning::VcsUnavailable {
                reason: "no repository found".to_string(),
            });
            String::new()
        }
    };

    let branch = if let Some(branch) = overrides.branch.clone().filter(|b| !b.trim().is_empty()) {
        branch
    } else if let Some((name, value)) = first_env(&env_config.branch, &env) {
        debug!(variable = %name, branch = %value, "branch from environment");
        value
    } else {
        branch_from_vcs(vcs, !commit_short.is_empty(), &mut warnings)
    };

    let context = ReleaseContext {
        branch,
        explicit_tag,
        commit_short,
        manifest_version,
        build_time: now,
    };

    Ok((context, warnings))
}

fn branch_from_vcs(
    vcs: Option<&dyn Vcs>,
    has_commit: bool,
    warnings: &mut Vec<PublishWarning>,
) -> String {
    let Some(vcs) = vcs else {
        return String::new();
    };

    match vcs.current_branch() {
        Ok(Some(branch)) => {
            debug!(branch = %branch, "branch from version control");
            branch
        }
        Ok(None) => {
            if has_commit {
                warnings.push(PublishWarning::DetachedHead);
            }
            String::new()
        }
        Err(e) => {
            // The commit lookup already failed the same way unless the repository changed under us
            if !warnings
                .iter()
                .any(|w| matches!(w, PublishWarning::VcsUnavailable { .. }))
            {
                warnings.push(PublishWarning::VcsUnavailable {
                    reason: e.to_string(),
                });
            }
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockVcs;
    use chrono::TimeZone;
    use semver::Version;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    fn manifest(dir: &TempDir, version: &str) -> PackageManifest {
        let path = dir.path().join("package.json");
        fs::write(
            &path,
            format!(r#"{{"name": "pkg", "version": "{}"}}"#, version),
        )
        .unwrap();
        PackageManifest::new(path)
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_vcs_fallback() {
        let dir = TempDir::new().unwrap();
        let vcs = MockVcs::new(Some("develop"), Some("a1b2c3d"));
        let (ctx, warnings) = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            env_of(&[]),
            Some(&vcs),
            &manifest(&dir, "1.4.0"),
            now(),
        )
        .unwrap();

        assert_eq!(ctx.branch, "develop");
        assert_eq!(ctx.commit_short, "a1b2c3d");
        assert_eq!(ctx.explicit_tag, None);
        assert_eq!(ctx.manifest_version, Version::new(1, 4, 0));
        assert_eq!(ctx.build_time, now());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_env_beats_vcs_and_flag_beats_env() {
        let dir = TempDir::new().unwrap();
        let vcs = MockVcs::new(Some("develop"), Some("a1b2c3d"));
        let env = env_of(&[("TRAVIS_BRANCH", "master"), ("TRAVIS_TAG", "nightly")]);

        let (ctx, _) = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            &env,
            Some(&vcs),
            &manifest(&dir, "1.4.0"),
            now(),
        )
        .unwrap();
        assert_eq!(ctx.branch, "master");
        assert_eq!(ctx.explicit_tag.as_deref(), Some("nightly"));

        let overrides = ContextOverrides {
            branch: Some("dev-x".to_string()),
            tag: Some("2.0.0".to_string()),
        };
        let (ctx, _) = collect_context(
            &overrides,
            &EnvConfig::default(),
            &env,
            Some(&vcs),
            &manifest(&dir, "1.4.0"),
            now(),
        )
        .unwrap();
        assert_eq!(ctx.branch, "dev-x");
        assert_eq!(ctx.explicit_tag.as_deref(), Some("2.0.0"));
    }

    #[test]
    fn test_branch_variables_in_order() {
        let dir = TempDir::new().unwrap();
        let env = env_of(&[("BRANCH_NAME", "first"), ("TRAVIS_BRANCH", "second")]);
        let (ctx, _) = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            env,
            Some(&MockVcs::new(Some("third"), Some("abc1234"))),
            &manifest(&dir, "1.0.0"),
            now(),
        )
        .unwrap();
        assert_eq!(ctx.branch, "first");
    }

    #[test]
    fn test_empty_env_values_are_unset() {
        let dir = TempDir::new().unwrap();
        let env = env_of(&[("BRANCH_NAME", ""), ("TRAVIS_TAG", "")]);
        let (ctx, _) = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            env,
            Some(&MockVcs::new(Some("develop"), Some("abc1234"))),
            &manifest(&dir, "1.0.0"),
            now(),
        )
        .unwrap();
        assert_eq!(ctx.branch, "develop");
        assert_eq!(ctx.explicit_tag, None);
    }

    #[test]
    fn test_detached_head_warns() {
        let dir = TempDir::new().unwrap();
        let (ctx, warnings) = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            env_of(&[]),
            Some(&MockVcs::new(None, Some("abc1234"))),
            &manifest(&dir, "1.0.0"),
            now(),
        )
        .unwrap();
        assert_eq!(ctx.branch, "");
        assert_eq!(warnings, vec![PublishWarning::DetachedHead]);
    }

    #[test]
    fn test_no_repository_warns_once() {
        let dir = TempDir::new().unwrap();
        let (ctx, warnings) = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            env_of(&[]),
            None,
            &manifest(&dir, "1.0.0"),
            now(),
        )
        .unwrap();
        assert_eq!(ctx.commit_short, "");
        assert_eq!(warnings.len(), 1);

        let (_, warnings) = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            env_of(&[]),
            Some(&MockVcs::broken()),
            &manifest(&dir, "1.0.0"),
            now(),
        )
        .unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_bad_manifest_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = collect_context(
            &ContextOverrides::default(),
            &EnvConfig::default(),
            env_of(&[]),
            None,
            &manifest(&dir, "not-a-version"),
            now(),
        );
        assert!(matches!(
            result,
            Err(crate::error::PublishError::ManifestVersion(_))
        ));
    }
}
