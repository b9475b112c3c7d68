//! The scaffolding pipeline.
//!
//! ReleaseSource → variant selection → TemplateCache → target validation →
//! extraction → git → dependency install.
//!
//! [`Scaffold::run`] chains the stages and reports each one through a
//! [`Progress`] callback, which is how the CLI prints its step lines.
//! Every stage before git is a hard gate. Git and install failures come back
//! as warnings in the report.

use std::path::PathBuf;

use crate::error::{CreateError, Result};
use crate::git::{self, GitOutcome};
use crate::install::{self, InstallReport};
use crate::release::variant::{self, Track, Variant};
use crate::release::ReleaseSource;
use crate::target::{self, TargetDirectory};
use crate::template::{self, CacheKey, CachedArchive, ExtractionReport, TemplateCache};

/// Everything one `create` invocation asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    pub target: PathBuf,
    pub overwrite: bool,
    pub variant: Variant,
    pub track: Track,
    pub git_init: bool,
    pub commit_message: String,
    pub install: bool,
}

impl Default for CreateOptions {
    fn default() -> Self {
        Self {
            target: PathBuf::from(target::DEFAULT_TARGET),
            overwrite: false,
            variant: Variant::default(),
            track: Track::default(),
            git_init: true,
            commit_message: git::DEFAULT_COMMIT_MESSAGE.to_string(),
            install: false,
        }
    }
}

/// The template archive chosen for this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    pub tag: String,
    pub asset_name: String,
    pub key: CacheKey,
    pub archive: CachedArchive,
}

/// Outcome of a full pipeline run.
#[derive(Debug)]
pub struct ScaffoldReport {
    pub target: TargetDirectory,
    pub template: ResolvedTemplate,
    pub extraction: ExtractionReport,
    pub git: Option<GitOutcome>,
    pub install: Option<InstallReport>,
    /// Soft failures (git, install) that did not stop the run
    pub warnings: Vec<CreateError>,
}

/// A stage that just completed (or, for install, is about to start).
#[derive(Debug)]
pub enum Progress<'a> {
    TargetValidated(&'a TargetDirectory),
    TemplateResolved(&'a ResolvedTemplate),
    Materialized(&'a ExtractionReport),
    GitInitialized(GitOutcome),
    InstallStarted,
    Installed(&'a InstallReport),
}

pub struct Scaffold<S: ReleaseSource> {
    source: S,
    cache: TemplateCache,
}

impl<S: ReleaseSource> Scaffold<S> {
    pub fn new(source: S, cache: TemplateCache) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }

    /// Check the target before anything touches the network or disk.
    pub fn validate_target(&self, options: &CreateOptions) -> Result<TargetDirectory> {
        let target = target::validate(&options.target, options.overwrite)?;
        tracing::debug!(
            path = %target.path.display(),
            existed = target.existed,
            "target directory validation passed"
        );
        Ok(target)
    }

    /// Find the latest release and make sure its template is in the cache.
    pub fn resolve_template(&self, track: &Track, variant: Variant) -> Result<ResolvedTemplate> {
        let asset_name = variant::asset_name(track, variant);
        tracing::debug!(track = %track, asset = %asset_name, "template asset name");

        let release = self.source.latest_release()?;
        let asset = variant::select_asset(&release, &asset_name)?;
        let key = CacheKey::new(&release.tag, &asset_name);

        let archive = self.cache.resolve(
            &key,
            || self.source.download_asset(asset),
            |e| CreateError::RemoteUnavailable {
                repo: self.source.repository(),
                reason: format!("download of {asset_name} ({}) interrupted: {e}", release.tag),
            },
        )?;

        Ok(ResolvedTemplate {
            tag: release.tag.clone(),
            asset_name,
            key,
            archive,
        })
    }

    /// Create the target if needed and expand the archive into it.
    pub fn materialize(
        &self,
        target: &TargetDirectory,
        template: &ResolvedTemplate,
    ) -> Result<ExtractionReport> {
        target.ensure_exists()?;
        template::extract(&template.archive.path, &target.path)
    }

    /// Chain every stage, reporting each to `on_progress`.
    ///
    /// Soft failures land in `warnings`; anything else stops the run.
    pub fn run<P>(&self, options: &CreateOptions, mut on_progress: P) -> Result<ScaffoldReport>
    where
        P: FnMut(Progress<'_>),
    {
        let target = self.validate_target(options)?;
        on_progress(Progress::TargetValidated(&target));

        let template = self.resolve_template(&options.track, options.variant)?;
        on_progress(Progress::TemplateResolved(&template));

        let extraction = self.materialize(&target, &template)?;
        on_progress(Progress::Materialized(&extraction));

        let mut warnings = Vec::new();

        let git = if options.git_init {
            soften(
                git::initialize(&target.path, &options.commit_message),
                &mut warnings,
            )?
        } else {
            None
        };
        if let Some(outcome) = git {
            on_progress(Progress::GitInitialized(outcome));
        }

        let install = if options.install {
            on_progress(Progress::InstallStarted);
            soften(install::install_dependencies(&target.path), &mut warnings)?
        } else {
            None
        };
        if let Some(report) = &install {
            on_progress(Progress::Installed(report));
        }

        Ok(ScaffoldReport {
            target,
            template,
            extraction,
            git,
            install,
            warnings,
        })
    }
}

/// Downgrade a soft error to a warning; hard errors still propagate.
pub fn soften<T>(result: Result<T>, warnings: &mut Vec<CreateError>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_soft() => {
            tracing::warn!(error = %e, "continuing after soft failure");
            warnings.push(e);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_latest_behavior() {
        let options = CreateOptions::default();
        assert_eq!(options.variant, Variant::TypeScript);
        assert_eq!(options.track.as_str(), "arapaho");
        assert!(options.git_init);
        assert!(!options.install);
        assert_eq!(options.commit_message, "initial commit");
        assert_eq!(options.target, PathBuf::from("./redwood-app"));
    }

    #[test]
    fn test_soften_keeps_hard_errors() {
        let mut warnings = Vec::new();
        let hard: Result<()> = Err(CreateError::NotADirectory(PathBuf::from("x")));
        assert!(soften(hard, &mut warnings).is_err());
        assert!(warnings.is_empty());

        let soft: Result<()> = Err(CreateError::VersionControlInitFailed {
            path: PathBuf::from("x"),
            reason: "no identity".to_string(),
        });
        assert!(soften(soft, &mut warnings).unwrap().is_none());
        assert_eq!(warnings.len(), 1);
    }
}
