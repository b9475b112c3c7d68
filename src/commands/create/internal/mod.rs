//! Internal implementation for create command

pub mod options;

use anyhow::Result;

use rw::git::GitOutcome;
use rw::release::variant::Variant;
use rw::release::GitHubReleases;
use rw::scaffold::Progress;
use rw::template::TemplateCache;
use rw::{preflight, CreateOptions, Scaffold, Settings};

use self::options::{resolve_options, should_prompt, TerminalPrompt};
use super::CreateArgs;
use crate::commands::output;

/// Main execution logic for create command
pub fn execute_create(args: CreateArgs) -> Result<()> {
    tracing::debug!(positional = ?args.target, "create command");
    output::print_intro();

    // === STEP 1: TOOLCHAIN ===
    for tool in preflight::check_toolchain()? {
        println!("{} found:", capitalize(&tool.name));
        for location in &tool.locations {
            println!("  {}", location.display());
        }
        output::step(&format!("{} version", capitalize(&tool.name)), &tool.version);
    }

    // === STEP 2: OPTIONS ===
    let interactive = should_prompt(&args);
    let options = resolve_options(&args, interactive, &mut TerminalPrompt)?;
    tracing::debug!(?options, "create options");

    let settings = Settings::load()?;
    let source = GitHubReleases::new(&settings, Settings::token())?;
    let scaffold = Scaffold::new(source, TemplateCache::at_default_location());

    // === STEP 3: PIPELINE (TARGET IS CHECKED BEFORE ANY DOWNLOAD) ===
    let report = scaffold.run(&options, |progress| report_progress(&options, progress))?;

    for warning in &report.warnings {
        output::warning(&warning.to_string());
    }

    output::print_epilogue(&report.target.path);
    Ok(())
}

/// Step lines printed as the pipeline advances
fn report_progress(options: &CreateOptions, progress: Progress<'_>) {
    match progress {
        Progress::TargetValidated(target) => {
            output::step("Target directory", target.path.display());
            output::step(
                "Use TypeScript",
                matches!(options.variant, Variant::TypeScript),
            );
        }
        Progress::TemplateResolved(template) => {
            output::step("Latest version", &template.tag);
            output::step("Cached template", template.archive.hit);
        }
        Progress::Materialized(extraction) => {
            output::success(&format!("Created {} files", extraction.files));
            output::step("Use Git", options.git_init);
        }
        Progress::GitInitialized(GitOutcome::Committed) => {
            output::step("Commit message", &options.commit_message);
        }
        Progress::GitInitialized(GitOutcome::AlreadyInitialized) => {
            output::warning("Git repository already exists, skipping git init");
        }
        Progress::InstallStarted => println!("📦 Installing dependencies..."),
        Progress::Installed(install) => {
            output::success(&format!(
                "Dependencies installed in {:.1}s",
                install.elapsed.as_secs_f64()
            ));
        }
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("node"), "Node");
        assert_eq!(capitalize("yarn"), "Yarn");
        assert_eq!(capitalize(""), "");
    }
}
