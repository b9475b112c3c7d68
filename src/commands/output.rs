//! Terminal output shared by commands: banner, step lines, epilogue, error box.

use colored::*;
use std::path::Path;

/// Width used when the terminal size cannot be determined
const FALLBACK_WIDTH: usize = 80;
const BANNER_WIDTH: usize = 66;

fn terminal_width() -> usize {
    let term = console::Term::stdout();
    if !term.is_term() {
        return FALLBACK_WIDTH;
    }
    let (_rows, cols) = term.size();
    match cols as usize {
        0 => FALLBACK_WIDTH,
        cols => cols,
    }
}

pub fn print_intro() {
    let rule = "-".repeat(BANNER_WIDTH);
    println!("{}", rule.yellow());
    println!("{:16}🌲⚡️ {} ⚡️🌲", "", "Welcome to RedwoodJS!".bold());
    println!("{}", rule.yellow());
}

/// `label: value` progress line
pub fn step(label: &str, value: impl std::fmt::Display) {
    println!("{} {}", format!("{label}:").bold(), value);
}

pub fn success(message: &str) {
    println!("  {} {}", "✓".green().bold(), message);
}

pub fn warning(message: &str) {
    println!("  {} {}", "⚠️ ".yellow(), message.yellow());
}

pub fn print_epilogue(target: &Path) {
    let dir = std::env::current_dir()
        .ok()
        .and_then(|cwd| target.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| target.to_path_buf());

    println!();
    println!("{}", "Thanks for trying out Redwood!".green());
    println!();
    println!(" ⚡️ Get up and running fast with this Quick Start guide: https://redwoodjs.com/quick-start");
    println!();
    println!("Fire it up! 🚀");
    println!();
    println!("{}", format!("  cd {}", dir.display()).green());
    println!("{}", "  yarn install".green());
    println!("{}", "  yarn rw dev".green());
    println!();
}

/// Red, double-ruled box around the error chain
pub fn print_error(err: &anyhow::Error) {
    let rule = "═".repeat(terminal_width());
    println!();
    println!("{}", rule.red().bold());
    println!("{}", "An error occurred:".red().bold());
    println!("{}", format!("{err:#}").red().bold());
    println!("{}", rule.red().bold());
    println!();
}
