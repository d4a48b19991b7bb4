//! CLI entry point for golden_comparator
//!
//! Compares, updates and inspects golden images under a base directory.

use env_logger::Target;
use golden_comparator::cli::{self, CommandStatus};
use std::path::PathBuf;
use std::process;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .format_timestamp(None)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(2);
    }

    let command = args[1].as_str();
    let rest = &args[2..];

    let result = match command {
        "compare" => match cli::parse_tolerance(rest) {
            Ok((positional, tolerance)) if positional.len() == 3 => {
                let id = positional[1].to_string_lossy().into_owned();
                cli::run_compare(&positional[0], &id, &positional[2], tolerance).await
            }
            Ok(_) => usage_error("compare needs <base_dir> <golden_id> <candidate_file>"),
            Err(err) => Err(err),
        },
        "update" if rest.len() == 3 => {
            cli::run_update(&PathBuf::from(&rest[0]), &rest[1], &PathBuf::from(&rest[2])).await
        }
        "update" => usage_error("update needs <base_dir> <golden_id> <source_file>"),
        "show" if rest.len() == 2 => cli::run_show(&PathBuf::from(&rest[0]), &rest[1]).await,
        "show" => usage_error("show needs <base_dir> <golden_id>"),
        "path" if rest.len() == 2 => cli::run_path(&PathBuf::from(&rest[0]), &rest[1]),
        "path" => usage_error("path needs <base_dir> <golden_id>"),
        "--help" | "-h" => {
            print_usage();
            Ok(CommandStatus::Success)
        }
        _ => usage_error(&format!("Unknown command '{command}'")),
    };

    match result {
        Ok(status) => process::exit(status.exit_code()),
        Err(err) => {
            eprintln!("Error: {err:#}");
            process::exit(2);
        }
    }
}

fn usage_error(message: &str) -> ! {
    eprintln!("Error: {message}");
    eprintln!();
    print_usage();
    process::exit(2);
}

fn print_usage() {
    println!("golden_comparator - Golden image comparison");
    println!();
    println!("USAGE:");
    println!("    golden_comparator <command> [args]");
    println!();
    println!("COMMANDS:");
    println!("    compare <base_dir> <golden_id> <candidate> [--tolerance <t>]");
    println!("                             Compare a candidate image against a golden");
    println!("    update <base_dir> <golden_id> <source>");
    println!("                             Create or overwrite a golden");
    println!("    show <base_dir> <golden_id>");
    println!("                             Print size and dimensions of a golden");
    println!("    path <base_dir> <golden_id>");
    println!("                             Print the resolved golden path");
    println!("    --help, -h               Show this help message");
    println!();
    println!("EXIT STATUS:");
    println!("    0 match or success, 1 mismatch, 2 error (including a missing golden)");
}
