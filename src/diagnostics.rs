//! Colored diagnostics for `wllvm-sanity`

use std::path::Path;

use owo_colors::OwoColorize;

/// Returns a platform-specific install suggestion for the given tool.
pub fn install_suggestion(tool_name: &str) -> String {
    if cfg!(target_os = "macos") {
        format!("brew install llvm  # provides {tool_name}")
    } else if cfg!(target_os = "windows") {
        format!("choco install llvm  # provides {tool_name}")
    } else if tool_name.contains("objcopy") || tool_name.ends_with("ld") {
        format!("sudo apt install binutils  # provides {tool_name}")
    } else {
        format!("sudo apt install llvm clang  # provides {tool_name}")
    }
}

/// Prints a colored line for a tool that was found.
pub fn print_found_tool(tool_name: &str, resolved_path: &Path) {
    eprintln!(
        "{} {} => {}",
        "ok:".green().bold(),
        tool_name.bold(),
        resolved_path.display(),
    );
}

/// Prints a colored error message for a missing tool with an install suggestion.
pub fn print_missing_tool_error(tool_name: &str, searched_path: Option<&Path>) {
    if let Some(path) = searched_path {
        eprintln!(
            "{} required tool `{}` not found at configured path: {}",
            "error:".red().bold(),
            tool_name.bold(),
            path.display(),
        );
    } else {
        eprintln!(
            "{} required tool `{}` not found on this system",
            "error:".red().bold(),
            tool_name.bold(),
        );
    }
    eprintln!(
        "  {} install it with: {}",
        "hint:".cyan().bold(),
        install_suggestion(tool_name),
    );
}

/// Prints a colored warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {message}", "warning:".yellow().bold());
}

/// Prints a colored error message.
pub fn print_error(message: &str) {
    eprintln!("{} {message}", "error:".red().bold());
}
