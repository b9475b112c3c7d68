//! Turn flags (and answers to prompts) into `CreateOptions`

use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;

use rw::git::DEFAULT_COMMIT_MESSAGE;
use rw::release::variant::{Track, Variant};
use rw::target::DEFAULT_TARGET;
use rw::CreateOptions;

use super::super::CreateArgs;

/// Source of answers for options the user did not pass as flags
pub trait Prompt {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;
    fn input(&mut self, question: &str, default: &str) -> Result<String>;
}

/// Reads answers from stdin
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        let answer = read_line(&format!("{question} {hint}: "))?.to_lowercase();
        Ok(match answer.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn input(&mut self, question: &str, default: &str) -> Result<String> {
        let answer = read_line(&format!("{question} [{default}]: "))?;
        Ok(if answer.is_empty() {
            default.to_string()
        } else {
            answer
        })
    }
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}

/// Prompts are only shown to a person at a terminal who did not pass --yes
pub fn should_prompt(args: &CreateArgs) -> bool {
    !args.yes && console::user_attended()
}

/// Flags win; unset flags are asked about when `interactive`, else defaulted.
pub fn resolve_options(
    args: &CreateArgs,
    interactive: bool,
    prompt: &mut dyn Prompt,
) -> Result<CreateOptions> {
    let typescript = match args.typescript {
        Some(value) => value,
        None if interactive => prompt.confirm("Use TypeScript?", true)?,
        None => true,
    };

    let git_init = match args.git_init {
        Some(value) => value,
        None if interactive => prompt.confirm("Initialize a git repository?", true)?,
        None => true,
    };

    let commit_message = match &args.commit_message {
        Some(message) => message.clone(),
        None if interactive && git_init => {
            prompt.input("Initial commit message", DEFAULT_COMMIT_MESSAGE)?
        }
        None => DEFAULT_COMMIT_MESSAGE.to_string(),
    };

    let track = match (&args.track, args.bighorn) {
        (Some(name), _) => Track::new(name.as_str())?,
        (None, true) => Track::new(Track::BIGHORN)?,
        (None, false) => Track::default(),
    };

    Ok(CreateOptions {
        target: args
            .target
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TARGET)),
        overwrite: args.overwrite,
        variant: Variant::from_typescript(typescript),
        track,
        git_init,
        commit_message,
        install: args.install.unwrap_or(false),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers from a script; panics if asked more than scripted
    struct Scripted {
        confirms: Vec<bool>,
        inputs: Vec<String>,
        asked: Vec<String>,
    }

    impl Scripted {
        fn new(confirms: Vec<bool>, inputs: Vec<&str>) -> Self {
            Self {
                confirms,
                inputs: inputs.into_iter().map(String::from).collect(),
                asked: Vec::new(),
            }
        }
    }

    impl Prompt for Scripted {
        fn confirm(&mut self, question: &str, _default: bool) -> Result<bool> {
            self.asked.push(question.to_string());
            Ok(self.confirms.remove(0))
        }

        fn input(&mut self, question: &str, _default: &str) -> Result<String> {
            self.asked.push(question.to_string());
            Ok(self.inputs.remove(0))
        }
    }

    #[test]
    fn test_non_interactive_uses_defaults() -> Result<()> {
        let mut prompt = Scripted::new(vec![], vec![]);
        let options = resolve_options(&CreateArgs::default(), false, &mut prompt)?;

        assert_eq!(options, CreateOptions::default());
        assert!(prompt.asked.is_empty());
        Ok(())
    }

    #[test]
    fn test_flags_skip_prompts() -> Result<()> {
        let args = CreateArgs {
            target: Some(PathBuf::from("my-app")),
            typescript: Some(false),
            git_init: Some(true),
            commit_message: Some("scaffold".to_string()),
            install: Some(true),
            bighorn: true,
            ..CreateArgs::default()
        };
        let mut prompt = Scripted::new(vec![], vec![]);
        let options = resolve_options(&args, true, &mut prompt)?;

        assert!(prompt.asked.is_empty());
        assert_eq!(options.target, PathBuf::from("my-app"));
        assert_eq!(options.variant, Variant::JavaScript);
        assert_eq!(options.track.as_str(), "bighorn");
        assert_eq!(options.commit_message, "scaffold");
        assert!(options.install);
        Ok(())
    }

    #[test]
    fn test_interactive_asks_for_unset_flags() -> Result<()> {
        let mut prompt = Scripted::new(vec![false, true], vec!["first!"]);
        let options = resolve_options(&CreateArgs::default(), true, &mut prompt)?;

        assert_eq!(prompt.asked.len(), 3);
        assert_eq!(options.variant, Variant::JavaScript);
        assert!(options.git_init);
        assert_eq!(options.commit_message, "first!");
        Ok(())
    }

    #[test]
    fn test_no_commit_message_prompt_without_git() -> Result<()> {
        let args = CreateArgs {
            git_init: Some(false),
            ..CreateArgs::default()
        };
        let mut prompt = Scripted::new(vec![true], vec![]);
        let options = resolve_options(&args, true, &mut prompt)?;

        assert_eq!(prompt.asked, vec!["Use TypeScript?".to_string()]);
        assert!(!options.git_init);
        Ok(())
    }

    #[test]
    fn test_invalid_track_is_rejected() {
        let args = CreateArgs {
            track: Some("../../etc".to_string()),
            ..CreateArgs::default()
        };
        let mut prompt = Scripted::new(vec![], vec![]);
        assert!(resolve_options(&args, false, &mut prompt).is_err());
    }
}
