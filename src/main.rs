use std::path::Path;
use std::process::ExitCode;

use questbook::data::{ResourceKey, SpecialItems};
use questbook::resolve::walk::expand_all;
use questbook::resolve::{aggregate, producer_combinations, walk_tree, ProducerIndex};
use questbook::{fmt, load};

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("usage: questbook <data-dir> [quest-name]");
        return ExitCode::from(2);
    }

    let dir = Path::new(&args[1]);
    let (catalog, book) = match load::load_dataset(dir) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("failed to load dataset: {e}");
            return ExitCode::FAILURE;
        }
    };
    let special = SpecialItems::load();
    let index = ProducerIndex::build(&book);

    let Some(name) = args.get(2) else {
        // No quest given: list the group tree.
        for group in &book.groups {
            match &group.caption {
                Some(caption) => println!("{} ({caption})", group.name),
                None => println!("{}", group.name),
            }
            for sub in &group.subgroups {
                println!("  {}", sub.name);
                for &id in &sub.quests {
                    if let Some(quest) = book.quest(id) {
                        println!("    {}", quest.name);
                    }
                }
            }
        }
        return ExitCode::SUCCESS;
    };

    let Some(root) = book.find_by_name(name) else {
        eprintln!("no quest named {name:?}");
        return ExitCode::FAILURE;
    };

    let expanded = expand_all(&book, &catalog, &index, &special, root);
    let tree = walk_tree(&book, &catalog, &index, &special, root, &expanded);
    println!("Tree:");
    for line in tree.visible_lines() {
        let connector = if line.depth > 0 { "└─ " } else { "" };
        println!("{}{connector}{}", "  ".repeat(line.depth), line.text);
    }

    let combos = producer_combinations(&book, &index, root);
    println!("\n{} combination(s)", combos.len());
    for (i, combo) in combos.iter().enumerate() {
        let totals = aggregate(&book, &catalog, &index, &special, root, combo);
        println!("\nOption {} totals:", i + 1);
        if totals.is_empty() {
            println!("  No materials required");
            continue;
        }
        for entry in &totals.entries {
            let slot = if entry.slot > 0 {
                format!(" [{}]", entry.slot)
            } else {
                String::new()
            };
            let amount = if entry.key == ResourceKey::Zeny {
                fmt::grouped(entry.amount)
            } else {
                entry.amount.to_string()
            };
            let extra = if entry.key != ResourceKey::Zeny && entry.unit_value > 0.0 {
                format!(" ({} zeny)", fmt::grouped(entry.amount * entry.unit_value))
            } else {
                String::new()
            };
            println!("  {}{slot} × {amount}{extra}", entry.name);
        }
        println!("  Total zeny value: {}", fmt::grouped(totals.zeny_value));
    }

    ExitCode::SUCCESS
}
