use std::io::Write;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::error;

use crate::client::{ControlModule, ControlResult};
use crate::formatter::{books_table, query_menu, query_table, thumbnail_lines};

pub const USAGE: &str = "Usage: control-module [search <keyword> [--max N] | queries | analyze <id|name>]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Interactive,
    Search { keyword: String, max_results: Option<usize> },
    Queries,
    Analyze { selector: String },
    Help,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UsageError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("--max expects a number, got {0:?}")]
    InvalidMax(String),
}

/// Parses the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Command, UsageError> {
    let Some((command, rest)) = args.split_first() else {
        return Ok(Command::Interactive);
    };

    match command.as_str() {
        "search" => {
            let mut words = Vec::new();
            let mut max_results = None;
            let mut iter = rest.iter();
            while let Some(arg) = iter.next() {
                if arg == "--max" {
                    let value = iter.next().ok_or(UsageError::MissingArgument("--max"))?;
                    let parsed = value
                        .parse()
                        .map_err(|_| UsageError::InvalidMax(value.clone()))?;
                    max_results = Some(parsed);
                } else {
                    words.push(arg.as_str());
                }
            }
            let keyword = words.join(" ");
            if keyword.trim().is_empty() {
                return Err(UsageError::MissingArgument("search"));
            }
            Ok(Command::Search { keyword, max_results })
        }
        "queries" => Ok(Command::Queries),
        "analyze" => {
            let selector = rest.join(" ");
            if selector.trim().is_empty() {
                return Err(UsageError::MissingArgument("analyze"));
            }
            Ok(Command::Analyze { selector })
        }
        "help" | "-h" | "--help" => Ok(Command::Help),
        other => Err(UsageError::UnknownCommand(other.to_string())),
    }
}

pub async fn search_books(control: &ControlModule, keyword: &str, max_results: Option<usize>) {
    let cap = max_results.unwrap_or(control.config().max_results);

    match control.search(keyword, cap).await {
        Ok(report) => {
            for warning in &report.warnings {
                println!("Warning: {}", warning);
            }
            if report.fetched == 0 {
                println!("No books found for the given keyword.");
                return;
            }
            println!("Found {} books for the keyword: {}", report.fetched, report.keyword);
            println!("\nSearch Results");
            println!("{}", books_table(&report.books));
            for line in thumbnail_lines(&report.books) {
                println!("{}", line);
            }
        }
        Err(e) => {
            error!("Search for '{}' failed: {}", keyword, e);
            println!("Error: {}", e);
        }
    }
}

pub async fn show_queries(control: &ControlModule) -> ControlResult<()> {
    let queries = control.list_queries().await?;
    println!("{}", query_menu(&queries));
    Ok(())
}

pub async fn analyze(control: &ControlModule, selector: &str) {
    match control.run_query(selector).await {
        Ok(result) if result.status == "empty" || result.rows.is_empty() => {
            println!("No results found for this query.");
        }
        Ok(result) => {
            println!("Results for: {} ({})", result.name, result.id);
            println!("{}", query_table(&result));
        }
        Err(e) => println!("{}", e),
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, label: &str) -> ControlResult<Option<String>> {
    print!("{}", label);
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

/// Menu loop. Each action finishes before the next prompt; errors are printed, never fatal.
pub async fn run_interactive(control: &ControlModule) -> ControlResult<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("\nBookScape Explorer");
        println!("  1) Search Books");
        println!("  2) Analyze Data");
        println!("  q) Quit");

        let Some(choice) = prompt(&mut lines, "> ").await? else {
            break;
        };

        match choice.as_str() {
            "1" => {
                let Some(keyword) = prompt(&mut lines, "Enter a keyword to search for books: ").await? else {
                    break;
                };
                if !keyword.is_empty() {
                    search_books(control, &keyword, None).await;
                }
            }
            "2" => {
                if let Err(e) = show_queries(control).await {
                    println!("Error: {}", e);
                    continue;
                }
                let Some(selector) = prompt(&mut lines, "Query (id or name, blank to go back): ").await? else {
                    break;
                };
                if !selector.is_empty() {
                    analyze(control, &selector).await;
                }
            }
            "q" | "Q" | "quit" => break,
            "" => {}
            other => println!("Unknown choice: {}", other),
        }
    }

    Ok(())
}
