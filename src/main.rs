//! Filterlab CLI - Classical Image Filter Playground
//!
//! Applies a single named filter to an image file and writes the result.

use anyhow::{bail, Context};
use filterlab::io::intake::ACCEPTED_EXTENSIONS;
use filterlab::prelude::*;
use std::path::{Path, PathBuf};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage(&args[0]);
        return;
    }

    let result = match args[1].as_str() {
        "list" => {
            list_filters();
            Ok(())
        }
        "info" => match args.get(2) {
            Some(name) => filter_info(name, &args[3..]),
            None => Err(anyhow::anyhow!("Please specify a filter name")),
        },
        "apply" => {
            if args.len() < 4 {
                eprintln!(
                    "Usage: {} apply <input> <output> --filter <name> [--kernel <k>] [--config <file>] [--preview-json]",
                    args[0]
                );
                std::process::exit(2);
            }
            apply_filter(&args[2..])
        }
        "help" | "--help" | "-h" => {
            print_usage(&args[0]);
            Ok(())
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            print_usage(&args[0]);
            std::process::exit(2);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {:#}", e);
        std::process::exit(report(&e));
    }
}

/// Print a hint for `error` and pick the exit code: 2 for bad input, 1 otherwise.
fn report(error: &anyhow::Error) -> i32 {
    if let Some(filter_error) = error.downcast_ref::<FilterError>() {
        if let Some(fix) = filter_error.suggested_fix() {
            eprintln!("   → {}", fix);
        }
        if filter_error.is_user_error() {
            return 2;
        }
    }
    if let Some(intake_error) = error.downcast_ref::<IntakeError>() {
        if intake_error.is_rejected_upfront() {
            match intake_error {
                IntakeError::TooLarge { .. } => eprintln!("   → Raise intake.max_bytes in the config"),
                _ => eprintln!("   → Use a {} image", ACCEPTED_EXTENSIONS.join("/")),
            }
            return 2;
        }
    }
    1
}

fn print_usage(program: &str) {
    println!("🎨 Filterlab v{}", filterlab::VERSION);
    println!();
    println!("Usage: {} <command> [options]", program);
    println!();
    println!("Commands:");
    println!("  list                        List all available filters");
    println!("  info <filter> [--config f]  Show detailed info about a filter");
    println!("  apply <in> <out> [options]  Apply a filter to a PNG or JPEG image");
    println!("  help                        Show this help message");
    println!();
    println!("Apply options:");
    println!("  --filter <name>     Filter display name or id (default: first listed)");
    println!("  --kernel <k>        Odd kernel size 3-15 for filters that take one");
    println!("  --config <file>     TOML configuration file");
    println!();
    println!("Output files must end in .{}", ACCEPTED_EXTENSIONS.join(", ."));
    println!("  --preview-json      Print a JSON preview summary to stdout");
}

fn list_filters() {
    let registry = FilterRegistry::global();

    println!("Available filters ({} total):", registry.len());
    println!();

    for (index, descriptor) in registry.entries().enumerate() {
        let kernel = if descriptor.accepts_kernel_size() { " [kernel]" } else { "" };
        println!(
            "  {:>2}. {} ({}, {}){}",
            index + 1,
            descriptor.name(),
            descriptor.metadata.id,
            descriptor.metadata.category.display_name(),
            kernel
        );
    }
}

fn filter_info(name: &str, options: &[String]) -> anyhow::Result<()> {
    let config_path = match options {
        [] => None,
        [flag, path] if flag == "--config" => Some(PathBuf::from(path)),
        _ => bail!("Usage: filterlab info <filter> [--config <file>]"),
    };
    let config = FilterlabConfig::load(config_path.as_deref())
        .with_context(|| format!("loading config {}", display(config_path.as_deref())))?;

    let descriptor = FilterRegistry::global().lookup(name)?;
    let metadata = &descriptor.metadata;

    println!("Filter: {}", metadata.name);
    println!("ID: {}", metadata.id);
    println!("Category: {}", metadata.category.display_name());
    println!("Output: {}", metadata.output_mode);
    println!();
    println!("Description:");
    println!("  {}", metadata.description);

    if descriptor.accepts_kernel_size() {
        let control = config.kernel_control();
        println!();
        println!("Parameters:");
        println!(
            "  • kernel_size: odd integer {}-{} (step {}, default {})",
            control.min,
            control.max,
            control.step,
            control.default.get()
        );
    }
    Ok(())
}

struct ApplyArgs {
    input: PathBuf,
    output: PathBuf,
    filter: Option<String>,
    kernel: Option<i64>,
    config: Option<PathBuf>,
    preview_json: bool,
}

fn parse_apply_args(args: &[String]) -> anyhow::Result<ApplyArgs> {
    let mut parsed = ApplyArgs {
        input: PathBuf::from(&args[0]),
        output: PathBuf::from(&args[1]),
        filter: None,
        kernel: None,
        config: None,
        preview_json: false,
    };

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--filter" if i + 1 < args.len() => {
                parsed.filter = Some(args[i + 1].clone());
                i += 2;
            }
            "--kernel" if i + 1 < args.len() => {
                let raw = &args[i + 1];
                parsed.kernel = Some(
                    raw.parse()
                        .with_context(|| format!("--kernel expects an integer, got '{}'", raw))?,
                );
                i += 2;
            }
            "--config" if i + 1 < args.len() => {
                parsed.config = Some(PathBuf::from(&args[i + 1]));
                i += 2;
            }
            "--preview-json" => {
                parsed.preview_json = true;
                i += 1;
            }
            other => bail!("Unknown or incomplete option: {}", other),
        }
    }
    Ok(parsed)
}

fn apply_filter(args: &[String]) -> anyhow::Result<()> {
    let args = parse_apply_args(args)?;
    if !filterlab::io::has_accepted_extension(&args.output) {
        bail!(
            "Output {} must end in .{}",
            args.output.display(),
            ACCEPTED_EXTENSIONS.join(", .")
        );
    }
    let config = FilterlabConfig::load(args.config.as_deref())
        .with_context(|| format!("loading config {}", display(args.config.as_deref())))?;

    let registry = FilterRegistry::global();
    let name = match args.filter.as_deref().or_else(|| registry.default_name()) {
        Some(name) => name,
        None => bail!("No filters are registered"),
    };
    let descriptor = registry.lookup(name)?;

    // Mirrors the selection surface: the kernel control only exists for
    // filters that take one, and starts at the configured default.
    let kernel = match (descriptor.accepts_kernel_size(), args.kernel) {
        (true, None) => Some(config.kernel.default.get() as i64),
        (_, supplied) => supplied,
    };

    let image = filterlab::io::load(&args.input, config.intake.max_bytes)
        .with_context(|| format!("reading {}", args.input.display()))?;

    println!("⚙️  {} -> {} ({})", args.input.display(), args.output.display(), descriptor.name());
    let output = Dispatcher::new().apply(descriptor.name(), &image, kernel)?;

    filterlab::io::save(&output.buffer, &args.output)
        .with_context(|| format!("writing {}", args.output.display()))?;

    if args.preview_json {
        let preview = filterlab::io::preview(&output, config.render.embed_preview)?;
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        println!(
            "✅ {} result ({}x{}) in {}ms",
            output.mode,
            output.buffer.width(),
            output.buffer.height(),
            output.stats.duration_ms
        );
    }
    Ok(())
}

fn display(path: Option<&Path>) -> String {
    path.map(|p| p.display().to_string())
        .unwrap_or_else(|| "<defaults>".to_string())
}
