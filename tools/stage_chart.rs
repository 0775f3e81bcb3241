/// Stage chart — show how pages spread across the five-stage arc.
///
/// Usage: stage_chart [--pages <n>] [--max <n>]
///
/// `--pages n` prints each page of an n-page story with its stage and
/// scene. `--max n` prints a compact table for every length 1..=n.

use storybook_engine::core::phrasing::Scene;
use storybook_engine::core::stage::arc;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut pages: Option<usize> = None;
    let mut max = 10usize;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--pages" if i + 1 < args.len() => {
                i += 1;
                pages = Some(parse_count(&args[i]));
            }
            "--max" if i + 1 < args.len() => {
                i += 1;
                max = parse_count(&args[i]);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    match pages {
        Some(total) => print_story(total),
        None => print_table(max),
    }
}

fn print_story(total: usize) {
    println!("{} pages:", total);
    for (ordinal, stage) in arc(total).into_iter().enumerate() {
        let scene = Scene::for_page(ordinal == 0, stage);
        println!(
            "  page {:>3}  {} {:<14} {:<18} {}",
            ordinal,
            stage.index(),
            format!("{:?}", stage),
            scene.name(),
            stage.sentence()
        );
    }
}

fn print_table(max: usize) {
    for total in 1..=max {
        let row: Vec<String> = arc(total).iter().map(|s| s.index().to_string()).collect();
        println!("{:>3} | {}", total, row.join(" "));
    }
}

fn parse_count(s: &str) -> usize {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!("Expected a positive page count, got {}", s);
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    eprintln!("Usage: stage_chart [--pages <n>] [--max <n>]");
}
