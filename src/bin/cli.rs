#![cfg(not(tarpaulin_include))]

use clap::{Parser, ValueEnum};
use orgchart::hierarchy::{DEFAULT_ORG_NAME, build_tree_named};
use orgchart::loader::roster_from_file;
use orgchart::view::outline;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Print the org chart built from a roster CSV file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Roster CSV file
    input: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Organisation name shown on the root node
    #[arg(long, default_value = DEFAULT_ORG_NAME)]
    org_name: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let roster = roster_from_file(&cli.input)?;
    let Some(tree) = build_tree_named(&roster, &cli.org_name) else {
        eprintln!("{}: no employees found", cli.input);
        return Ok(());
    };

    match cli.format {
        Format::Text => print!("{}", outline(&tree)),
        Format::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
    }

    Ok(())
}
