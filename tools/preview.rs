/// Preview — write and illustrate a story from the command line.
///
/// Usage: preview [--batch <file.json>] [--config <file.ron>] [--style <style>]
///                [--mode synth|external|fallback] [--images]
///
/// With `--batch` the batch is written once and printed. Without it an
/// interactive shell builds a batch page by page:
///   hero <name>          — set the hero
///   world <place>        — set the world
///   theme <text>         — set the theme
///   page <kw1,kw2,...>   — append a page with keywords
///   clear                — drop all pages
///   mode <m>             — synth, external or fallback
///   write                — write the pages (and images with --images)
///   outline <n> <kws>    — suggest n scene lines from keywords
///   help                 — list commands
///   quit                 — exit

use std::io::{self, BufRead, Write};
use std::path::Path;

use storybook_engine::schema::page::PageRequest;
use storybook_engine::schema::story::StoryMeta;
use storybook_engine::{GenerationBatch, StoryService, StorybookConfig, WritingMode};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut batch_path = None;
    let mut config_path = None;
    let mut style = String::new();
    let mut mode = WritingMode::Synthesized;
    let mut with_images = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_usage();
                return;
            }
            "--batch" if i + 1 < args.len() => {
                i += 1;
                batch_path = Some(args[i].clone());
            }
            "--config" if i + 1 < args.len() => {
                i += 1;
                config_path = Some(args[i].clone());
            }
            "--style" if i + 1 < args.len() => {
                i += 1;
                style = args[i].clone();
            }
            "--mode" if i + 1 < args.len() => {
                i += 1;
                mode = match parse_mode(&args[i]) {
                    Some(m) => m,
                    None => {
                        eprintln!("Unknown mode: {}", args[i]);
                        std::process::exit(1);
                    }
                };
            }
            "--images" => with_images = true,
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(ref path) => match StorybookConfig::load_from_ron(Path::new(path)) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => StorybookConfig::default(),
    };

    let service = match StoryService::from_config(config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to build HTTP client: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = batch_path {
        let batch = match load_batch(Path::new(&path)) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Failed to load batch {}: {}", path, e);
                std::process::exit(1);
            }
        };
        if let Err(e) = write(&service, &batch, mode, &style, with_images).await {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
        return;
    }

    println!("Type 'help' for commands.\n");

    let mut meta = StoryMeta::default();
    let mut pages: Vec<PageRequest> = Vec::new();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("preview> ");
        stdout.flush().ok();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).is_err() || line.is_empty() {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd.to_lowercase(), rest.trim()),
            None => (line.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "quit" | "exit" | "q" => {
                println!("Goodbye.");
                break;
            }
            "help" | "h" | "?" => print_help(),
            "hero" => meta.hero = rest.to_string(),
            "world" => meta.world = rest.to_string(),
            "theme" => meta.theme = rest.to_string(),
            "page" => {
                let index = pages.len() as u32;
                pages.push(PageRequest {
                    index,
                    keywords: split_list(rest),
                });
                println!("page {} added ({} pages)", index, pages.len());
            }
            "clear" => {
                pages.clear();
                println!("pages cleared");
            }
            "mode" => match parse_mode(rest) {
                Some(m) => mode = m,
                None => println!("Unknown mode: {}", rest),
            },
            "outline" => {
                let (count, keywords) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let count = count.parse().unwrap_or(3);
                for line in service.outline(&split_list(keywords), count) {
                    println!("  {}", line);
                }
            }
            "write" => {
                let batch = match GenerationBatch::new(meta.clone(), pages.clone()) {
                    Ok(b) => b,
                    Err(e) => {
                        println!("ERROR: {}", e);
                        continue;
                    }
                };
                if let Err(e) = write(&service, &batch, mode, &style, with_images).await {
                    println!("ERROR: {}", e);
                }
            }
            _ => println!("Unknown command: {}. Type 'help' for commands.", cmd),
        }
    }
}

async fn write<G, C>(
    service: &StoryService<G, C>,
    batch: &GenerationBatch,
    mode: WritingMode,
    style: &str,
    with_images: bool,
) -> Result<(), storybook_engine::StoryError>
where
    G: storybook_engine::external::generator::TextGenerator,
    C: storybook_engine::assets::probe::ReachabilityCheck,
{
    let written = service.write_pages(batch, mode).await?;

    println!("\n--- Story ---");
    let images = if with_images {
        service.resolve_images(&written.pages, style).await
    } else {
        Vec::new()
    };
    for page in service.finalize(&written.pages, &images) {
        println!("[{}] {}", page.index, page.text);
        if with_images {
            println!("     {}", page.image_url);
        }
    }
    if !written.unfilled.is_empty() {
        println!("(unwritten: {:?})", written.unfilled);
    }
    println!("--- End ---\n");
    Ok(())
}

fn load_batch(path: &Path) -> Result<GenerationBatch, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
    let body: serde_json::Value = serde_json::from_str(&contents).map_err(|e| e.to_string())?;
    GenerationBatch::from_json(&body).map_err(|e| e.to_string())
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect()
}

fn parse_mode(s: &str) -> Option<WritingMode> {
    match s.to_lowercase().as_str() {
        "synth" | "synthesized" => Some(WritingMode::Synthesized),
        "external" => Some(WritingMode::External),
        "fallback" => Some(WritingMode::ExternalWithFallback),
        _ => None,
    }
}

fn print_usage() {
    eprintln!("Usage: preview [--batch <file.json>] [--config <file.ron>] [--style <style>]");
    eprintln!("               [--mode synth|external|fallback] [--images]");
}

fn print_help() {
    println!("Commands:");
    println!("  hero <name>          — set the hero");
    println!("  world <place>        — set the world");
    println!("  theme <text>         — set the theme");
    println!("  page <kw1,kw2,...>   — append a page with keywords");
    println!("  clear                — drop all pages");
    println!("  mode <m>             — synth, external or fallback");
    println!("  write                — write the pages");
    println!("  outline <n> <kws>    — suggest n scene lines from keywords");
    println!("  help                 — list commands");
    println!("  quit                 — exit");
}
