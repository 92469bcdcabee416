//! One-shot repair tool: convert a JSON array file into the
//! newline-delimited format the sensor store expects.
//!
//! Usage: convert_dataset <input.json> <output.jsonl>

use std::fs;
use std::io::Write;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <input.json> <output.jsonl>", args[0]);
        return ExitCode::FAILURE;
    }

    match convert(&args[1], &args[2]) {
        Ok(count) => {
            println!("Wrote {} records to {}", count, args[2]);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn convert(input: &str, output: &str) -> Result<usize, String> {
    let content =
        fs::read_to_string(input).map_err(|e| format!("Failed to read {}: {}", input, e))?;

    let items: Vec<serde_json::Value> = serde_json::from_str(&content)
        .map_err(|e| format!("{} is not a valid JSON array: {}", input, e))?;

    let mut out =
        fs::File::create(output).map_err(|e| format!("Failed to create {}: {}", output, e))?;
    for item in &items {
        writeln!(out, "{}", item).map_err(|e| format!("Failed to write {}: {}", output, e))?;
    }
    Ok(items.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_array_to_lines() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.jsonl");
        fs::write(&input, r#"[{"a": 1}, {"b": 2}]"#).unwrap();

        let count = convert(input.to_str().unwrap(), output.to_str().unwrap()).unwrap();
        assert_eq!(count, 2);

        let lines: Vec<String> = fs::read_to_string(&output)
            .unwrap()
            .lines()
            .map(String::from)
            .collect();
        assert_eq!(lines, vec![r#"{"a":1}"#, r#"{"b":2}"#]);
    }

    #[test]
    fn test_convert_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.json");
        let output = dir.path().join("out.jsonl");
        fs::write(&input, "{not json").unwrap();

        assert!(convert(input.to_str().unwrap(), output.to_str().unwrap()).is_err());
    }
}
