//! One-shot repair tool: re-bracket a malformed concatenation of JSON
//! objects into a valid JSON array, rewriting the file in place.
//!
//! Handles files that are already bracketed, hold one object per line,
//! or carry trailing commas. If the result still isn't valid JSON the
//! file is left untouched.
//!
//! Usage: rebracket_dataset <file.json>

use std::fs;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: {} <file.json>", args[0]);
        return ExitCode::FAILURE;
    }
    let path = &args[1];

    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: Failed to read {}: {}", path, e);
            return ExitCode::FAILURE;
        }
    };

    match rebracket(&content) {
        Ok(fixed) => {
            if let Err(e) = fs::write(path, fixed) {
                eprintln!("Error: Failed to write {}: {}", path, e);
                return ExitCode::FAILURE;
            }
            println!("Successfully fixed {}", path);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn rebracket(content: &str) -> Result<String, String> {
    let mut content = content.trim();
    if content.starts_with('[') && content.ends_with(']') {
        content = &content[1..content.len() - 1];
    }

    let entries: Vec<&str> = content
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.strip_suffix(',').unwrap_or(line))
        .collect();

    let fixed = format!("[\n{}\n]", entries.join(",\n"));

    serde_json::from_str::<serde_json::Value>(&fixed)
        .map_err(|e| format!("Still not valid JSON after re-bracketing: {}", e))?;
    Ok(fixed)
}
