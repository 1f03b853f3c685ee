use anyhow::{bail, Result};
use name2smiles::*;
use std::io::Read;
use std::path::PathBuf;

fn main() -> Result<()> {
    init_logging("info");

    let (sheet_path, positional) = parse_args(std::env::args().skip(1))?;
    let input = match positional {
        Some(text) => text,
        None => {
            // No names on the command line; read them from stdin instead.
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };

    let names = split_names(&input);
    if names.is_empty() {
        eprintln!("No compounds were entered.");
        return Ok(());
    }

    let client = PubChemClient::new()?;
    let resolution = resolve_names(&client, &names);

    append_results(&sheet_path, &resolution.resolved)?;

    println!(
        "Added {} compounds to {}",
        resolution.resolved.len(),
        sheet_path.display()
    );
    if !resolution.unresolved.is_empty() {
        let shown = resolution
            .unresolved
            .iter()
            .take(5)
            .map(String::as_str)
            .collect::<Vec<&str>>()
            .join(", ");
        println!(
            "Compounds not found ({}): {}",
            resolution.unresolved.len(),
            shown
        );
        if resolution.unresolved.len() > 5 {
            println!("... and {} more", resolution.unresolved.len() - 5);
        }
    }
    Ok(())
}

/// Splits the raw input on commas and newlines, dropping blank entries.
fn split_names(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(PathBuf, Option<String>)> {
    let mut sheet_path = PathBuf::from(DEFAULT_SHEET_PATH);
    let mut names: Vec<String> = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--sheet" => match args.next() {
                Some(path) => sheet_path = PathBuf::from(path),
                None => bail!("--sheet needs a path"),
            },
            "--help" | "-h" => {
                println!("usage: name2smiles [--sheet PATH] [NAMES...]");
                println!();
                println!("Resolves compound names to SMILES via PubChem and appends");
                println!("them to the workbook. Names are comma separated; with no");
                println!("names on the command line they are read from stdin.");
                std::process::exit(0);
            }
            _ => names.push(arg),
        }
    }

    let positional = if names.is_empty() {
        None
    } else {
        Some(names.join(","))
    };
    Ok((sheet_path, positional))
}
