use anyhow::Result;
use serde_json::json;
use std::process::Command;

use rw::{paths, preflight};

const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Injected at build time by the release pipeline
const BUILD_COMMIT: Option<&str> = option_env!("RW_BUILD_COMMIT");
const BUILD_DATE: Option<&str> = option_env!("RW_BUILD_DATE");

pub fn execute(json: bool, components: bool) -> Result<()> {
    if json {
        output_json(components)?;
    } else {
        output_human(components);
    }
    Ok(())
}

fn output_json(components: bool) -> Result<()> {
    let mut version_info = json!({
        "version": CORE_VERSION,
        "commit": BUILD_COMMIT.unwrap_or("unknown"),
        "date": BUILD_DATE.unwrap_or("unknown"),
    });

    if components {
        version_info["components"] = get_component_versions();
    }

    println!("{}", serde_json::to_string_pretty(&version_info)?);
    Ok(())
}

fn output_human(components: bool) {
    println!("Version: {CORE_VERSION}");
    println!("Commit:\t {}", BUILD_COMMIT.unwrap_or("unknown"));
    println!("Date:\t {}", BUILD_DATE.unwrap_or("unknown"));

    if components {
        println!("\nComponents:");
        let components_info = get_component_versions();
        if let Some(tools) = components_info.as_object() {
            for (name, version) in tools {
                if let Some(v) = version.as_str() {
                    println!("  {name}: {v}");
                }
            }
        }
    }
}

fn get_git_version() -> Option<String> {
    Command::new("git")
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().replace("git version ", ""))
}

fn get_component_versions() -> serde_json::Value {
    let mut components = json!({});

    for tool in preflight::REQUIRED_TOOLS {
        let version = preflight::check_tool(tool)
            .map(|report| report.version)
            .unwrap_or_else(|_| "not found".to_string());
        components[*tool] = json!(version);
    }

    components["git"] = json!(get_git_version().unwrap_or_else(|| "not found".to_string()));
    components["template cache"] = json!(paths::templates_dir().display().to_string());

    components
}
