use crossterm::style::Stylize;
use flavor_core::config::AppConfig;
use flavor_core::core::types::{QueryResult, Resolution, SuggestionList, SuggestionReason};
use flavor_core::editing::AliasEditor;
use flavor_core::logging::init_logging;
use flavor_core::persistence::JsonAliasStore;
use flavor_core::FlavorService;
use std::io::{stdin, stdout, Write};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut config = AppConfig::load();
    if let Some(dir) = std::env::args().nth(1) {
        config.data.data_dir = Some(PathBuf::from(dir));
    }
    if let Err(e) = init_logging(&config.log_level) {
        eprintln!("[WARN] Logging unavailable: {}", e);
    }

    let service = match FlavorService::from_config(&config) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("[ERROR] {}", e);
            return ExitCode::FAILURE;
        }
    };
    let alias_file = JsonAliasStore::new(config.alias_path());

    println!("{}", "Flavor Finder. Type 'help' for commands, 'exit' to quit.".bold());
    println!("---------------------------------------------------------------");

    loop {
        print!("\n> ");
        if stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match stdin().read_line(&mut input) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let line = input.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "" => {}
            "exit" | "quit" => break,
            "help" => print_help(),
            "flavor" | "f" => print_resolution(&service.lookup_flavor(rest)),
            "ingredient" | "i" => match service.lookup_ingredient(rest) {
                Ok(resolution) => print_resolution(&resolution),
                Err(e) => println!("{} {}", "Could not read aliases, try again:".red(), e),
            },
            "aliases" => print_aliases(&service),
            "alias" => edit_aliases(&service, rest),
            "export" => export_aliases(&alias_file, rest.trim()),
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }
    ExitCode::SUCCESS
}

fn print_help() {
    println!("  flavor <name>                  ingredients for a flavor");
    println!("  ingredient <name>              flavors for an ingredient");
    println!("  aliases                        list alias entries");
    println!("  alias add <name> = <a, b, c>   add or replace an entry");
    println!("  alias remove <name>            remove an entry");
    println!("  export <path>                  copy the alias file to <path>");
    println!("  exit");
}

fn print_resolution(resolution: &Resolution) {
    match resolution {
        Resolution::Resolved(resolved) => {
            let result = &resolved.result;
            let heading = match result {
                QueryResult::Flavor(_) => format!("Ingredients with {} flavor:", result.name()),
                QueryResult::Ingredient(_) => format!("Flavors found in {}:", result.name()),
                QueryResult::IngredientAll(_) => {
                    format!("{} goes with every flavor:", result.name())
                }
                QueryResult::IngredientNone(_) => {
                    format!("{} has no flavors listed.", result.name())
                }
            };
            println!("{}", heading.green().bold());
            for value in result.values() {
                println!("  - {}", value);
            }
            if !matches!(result, QueryResult::Flavor(_)) && !resolved.missing_flavors.is_empty() {
                println!("{}", "Flavors not found:".dark_grey());
                println!("  {}", resolved.missing_flavors.join(", ").dark_grey());
            }
        }
        Resolution::Suggestions(list) => print_suggestions(list),
    }
}

fn print_suggestions(list: &SuggestionList) {
    let heading = match list.reason {
        SuggestionReason::EmptyQuery => "Type something to search for.",
        SuggestionReason::Ambiguous | SuggestionReason::Substring => "Several matches, pick one:",
        SuggestionReason::Fuzzy => "Did you mean:",
        SuggestionReason::NoMatch => "No matches found.",
    };
    println!("{}", heading.yellow());
    for (i, candidate) in list.candidates.iter().enumerate() {
        println!("  {}: {}", i + 1, candidate);
    }
}

fn print_aliases(service: &FlavorService) {
    match service.aliases().load() {
        Ok(snapshot) => {
            for (name, variants) in &snapshot.table {
                println!("  {} = {}", name.clone().bold(), variants.join(", "));
            }
            println!("{} entries", snapshot.table.len());
        }
        Err(e) => println!("{} {}", "Could not read aliases:".red(), e),
    }
}

fn edit_aliases(service: &FlavorService, args: &str) {
    let editor = AliasEditor::new(service.aliases());
    let (action, rest) = args.trim().split_once(' ').unwrap_or((args.trim(), ""));
    let outcome = match action {
        "add" => match rest.split_once('=') {
            Some((name, variants)) => editor
                .add_entry(name, variants)
                .map(|table| format!("{} entries saved", table.len())),
            None => {
                println!("Usage: alias add <name> = <a, b, c>");
                return;
            }
        },
        "remove" => editor.remove_entry(rest).map(|removed| {
            if removed {
                format!("Removed '{}'", rest.trim())
            } else {
                format!("No entry named '{}'", rest.trim())
            }
        }),
        _ => {
            println!("Usage: alias add <name> = <a, b, c> | alias remove <name>");
            return;
        }
    };
    match outcome {
        Ok(message) => println!("{}", message),
        Err(e) => println!("{} {}", "Could not save aliases:".red(), e),
    }
}

fn export_aliases(store: &JsonAliasStore, target: &str) {
    if target.is_empty() {
        println!("Usage: export <path>");
        return;
    }
    let written = store
        .export_bytes()
        .and_then(|bytes| std::fs::write(target, bytes).map_err(Into::into));
    match written {
        Ok(()) => println!("Aliases exported to '{}'", target),
        Err(e) => println!("{} {}", "Export failed:".red(), e),
    }
}
