//! Main workflow orchestration logic
//!
//! Drives one release through its states:
//!
//! ```text
//! Start -> VersionResolved -> VersionWritten -> Published -> (Tagged) -> Done
//! ```
//!
//! Any fatal step moves the orchestrator to `Failed`; the last completed state
//! stays readable so callers can tell how far the release got. Every registry
//! call finishes before the next step starts.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use semver::Version;
use tracing::{info, warn};

use super::collect::{collect_context, ContextOverrides};
use crate::config::Config;
use crate::domain::{DistTag, PublishPlan, ReleaseClassifier, ReleaseContext};
use crate::error::Result;
use crate::git::Vcs;
use crate::manifest::PackageManifest;
use crate::registry::Registry;
use crate::warnings::PublishWarning;

/// Arguments for the publish workflow
///
/// Mirrors the CLI Args but in a format suitable for orchestration logic.
/// This decoupling allows the workflow to be called programmatically
/// without depending on clap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PublishWorkflowArgs {
    /// Path to custom config file
    pub config_path: Option<String>,

    /// Manifest path, overriding the configured one
    pub manifest_path: Option<String>,

    /// Branch name, overriding environment and version control
    pub branch: Option<String>,

    /// Explicit release tag, overriding the environment
    pub tag: Option<String>,

    /// Resolve and report the plan without touching the registry
    pub dry_run: bool,

    /// Do not add the marker dist-tag after publishing
    pub skip_secondary_tag: bool,
}

impl PublishWorkflowArgs {
    /// Manifest to read, from the arguments or the configuration
    pub fn manifest(&self, config: &Config) -> PackageManifest {
        let path = self
            .manifest_path
            .clone()
            .unwrap_or_else(|| config.manifest.clone());
        PackageManifest::new(PathBuf::from(path))
    }
}

/// What a dist-tag pointed to before a dry run
#[derive(Debug, Clone, PartialEq)]
pub struct DistTagStatus {
    pub tag: DistTag,
    pub current: Option<Version>,
}

/// Result of a successful publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    /// Package name from the manifest, when it has one
    pub package: Option<String>,

    /// The version that was (or would be) published
    pub version: Version,

    /// Primary dist-tags of the publish
    pub tags: Vec<DistTag>,

    /// Marker dist-tag, only when it was applied (or would be, in a dry run)
    pub secondary_tag: Option<DistTag>,

    /// Non-fatal problems met on the way
    pub warnings: Vec<PublishWarning>,

    /// Whether this was a dry run
    pub dry_run: bool,

    /// Current targets of the primary dist-tags, filled in by dry runs
    pub current_tags: Vec<DistTagStatus>,
}

/// Position of a release in the publish state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    Start,
    VersionResolved,
    VersionWritten,
    Published,
    Tagged,
    Done,
    Failed,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PublishState::Start => "START",
            PublishState::VersionResolved => "VERSION_RESOLVED",
            PublishState::VersionWritten => "VERSION_WRITTEN",
            PublishState::Published => "PUBLISHED",
            PublishState::Tagged => "TAGGED",
            PublishState::Done => "DONE",
            PublishState::Failed => "FAILED",
        };
        f.write_str(name)
    }
}

/// Runs one release against a registry
pub struct PublishOrchestrator<'a, R: Registry> {
    registry: &'a R,
    state: PublishState,
    last_completed: PublishState,
}

impl<'a, R: Registry> PublishOrchestrator<'a, R> {
    pub fn new(registry: &'a R) -> Self {
        PublishOrchestrator {
            registry,
            state: PublishState::Start,
            last_completed: PublishState::Start,
        }
    }

    /// Current state; `Failed` after a fatal error
    pub fn state(&self) -> PublishState {
        self.state
    }

    /// Last state reached before finishing or failing
    pub fn last_completed(&self) -> PublishState {
        self.last_completed
    }

    fn advance(&mut self, state: PublishState) {
        self.state = state;
        self.last_completed = state;
    }

    fn step<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = PublishState::Failed;
        }
        result
    }

    /// Classify the context and publish the resulting plan.
    ///
    /// A failing secondary tag is returned as a warning, never as an error.
    pub fn run(
        &mut self,
        ctx: &ReleaseContext,
        classifier: &ReleaseClassifier,
        dry_run: bool,
    ) -> Result<WorkflowResult> {
        let plan = self.step(classifier.classify(ctx))?;
        self.advance(PublishState::VersionResolved);
        info!("Publishing {}", plan);

        let mut result = WorkflowResult {
            package: None,
            version: plan.version.clone(),
            tags: plan.tags.clone(),
            secondary_tag: None,
            warnings: Vec::new(),
            dry_run,
            current_tags: Vec::new(),
        };

        if dry_run {
            result.current_tags = self.current_tags(&plan, &mut result.warnings);
            result.secondary_tag = plan.secondary_tag.clone();
            self.advance(PublishState::Done);
            return Ok(result);
        }

        let written = self.registry.set_version(&plan.version);
        self.step(written)?;
        self.advance(PublishState::VersionWritten);

        let published = self.registry.publish(&plan.tags);
        self.step(published)?;
        self.advance(PublishState::Published);

        if let Some(marker) = &plan.secondary_tag {
            match self.add_secondary_tag(&plan.version, marker) {
                Ok(()) => {
                    self.advance(PublishState::Tagged);
                    result.secondary_tag = Some(marker.clone());
                }
                Err(e) => {
                    warn!("Failed to add dist-tag '{}': {}", marker, e);
                    result.warnings.push(PublishWarning::SecondaryTagFailed {
                        tag: marker.to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        self.advance(PublishState::Done);
        Ok(result)
    }

    fn add_secondary_tag(&self, version: &Version, marker: &DistTag) -> Result<()> {
        let package = self.registry.query_name()?;
        self.registry.add_dist_tag(&package, version, marker)
    }

    fn current_tags(
        &self,
        plan: &PublishPlan,
        warnings: &mut Vec<PublishWarning>,
    ) -> Vec<DistTagStatus> {
        let mut statuses = Vec::new();
        for tag in &plan.tags {
            match self.registry.query_dist_tag(tag) {
                Ok(current) => statuses.push(DistTagStatus {
                    tag: tag.clone(),
                    current,
                }),
                Err(e) => warnings.push(PublishWarning::DistTagQueryFailed {
                    tag: tag.to_string(),
                    reason: e.to_string(),
                }),
            }
        }
        statuses
    }
}

/// Main publish workflow
///
/// Orchestrates the entire release:
/// 1. Collect the release context (flags, environment, version control, manifest)
/// 2. Build the classifier from configuration
/// 3. Classify and publish through the registry
///
/// # Arguments
///
/// * `args` - Workflow arguments (overrides, dry_run, secondary tag switch)
/// * `config` - Loaded configuration
/// * `registry` - Registry to publish to
/// * `vcs` - Version control, or `None` outside a repository
/// * `env` - Environment lookup
/// * `now` - Build time used for snapshot versions
pub fn run_publish_workflow<R, F>(
    args: &PublishWorkflowArgs,
    config: &Config,
    registry: &R,
    vcs: Option<&dyn Vcs>,
    env: F,
    now: DateTime<Utc>,
) -> Result<WorkflowResult>
where
    R: Registry,
    F: Fn(&str) -> Option<String>,
{
    let mut classifier = config.classifier()?;
    if args.skip_secondary_tag {
        classifier = classifier.with_secondary_tag(None);
    }

    let manifest = args.manifest(config);
    let overrides = ContextOverrides {
        branch: args.branch.clone(),
        tag: args.tag.clone(),
    };
    let (ctx, mut warnings) = collect_context(&overrides, &config.env, env, vcs, &manifest, now)?;
    for warning in &warnings {
        warn!("{}", warning);
    }

    let mut orchestrator = PublishOrchestrator::new(registry);
    let mut result = orchestrator.run(&ctx, &classifier, args.dry_run)?;

    result.package = manifest.read_name().ok().flatten();
    warnings.append(&mut result.warnings);
    result.warnings = warnings;

    Ok(result)
}
