//! ai-carbon: energy and carbon estimates for AI token usage
//!
//! Usage:
//!   ai-carbon estimate --hardware <id> --data-center <id> --model <id> --tokens <n>
//!   ai-carbon count [--model <name> | --tokenizer <profile>] [--file <path>] [text...]
//!   ai-carbon cost --input <n> --output <n> --model <name> [--cached]
//!   ai-carbon profiles                         List catalog profiles

use ai_carbon_rust::emissions::{
    estimate, request_schema, validate, CalculationForm, CalculationResult,
};
use ai_carbon_rust::profiles::ProfileCatalog;
use ai_carbon_rust::tokens::{calculate_cost, count_tokens, ModelPricing, TokenizerProfile};
use ai_carbon_rust::{format_large_number, format_number, TokenBreakdown};
use anyhow::{anyhow, bail, Context};
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

const PROFILES_ENV: &str = "AI_CARBON_PROFILES";

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    let result = match args[1].as_str() {
        "estimate" => cmd_estimate(&args[2..]),
        "count" => cmd_count(&args[2..]),
        "cost" => cmd_cost(&args[2..]),
        "profiles" => cmd_profiles(&args[2..]),
        "schema" => cmd_schema(),
        "version" | "--version" | "-V" => {
            cmd_version();
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn print_usage() {
    println!(
        r#"ai-carbon: energy and carbon estimates for AI token usage

USAGE:
    ai-carbon <COMMAND> [OPTIONS]

COMMANDS:
    estimate    Estimate energy and emissions
                  --hardware <id> --data-center <id> --model <id>
                  --tokens <n> | --input-with-cache <n> --input-without-cache <n>
                                 --cache-read <n> --output-tokens <n> [--detailed]
                  [--context-window <n>] [--pue <x>] [--carbon-intensity <x>] [--json]
    count       Count tokens in text (arguments, --file <path>, or stdin)
                  [--model <name> | --tokenizer <profile>]
    cost        Price token usage
                  --input <n> --output <n> (--model <name> | --input-price <x> --output-price <x>)
                  [--cached-price <x>] [--cached]
    profiles    List hardware, data-center and model profiles
    schema      Print the JSON Schema of the estimate request
    version     Show version information
    help        Show this help message

OPTIONS:
    --profiles <path>    Profile catalog (YAML or JSON)

ENVIRONMENT:
    AI_CARBON_PROFILES   Default profile catalog path
    RUST_LOG             Log filter (default: warn)"#
    );
}

fn cmd_version() {
    println!("ai-carbon {}", env!("CARGO_PKG_VERSION"));
}

fn flag_value<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], name: &str) -> bool {
    args.iter().any(|a| a == name)
}

fn parse_flag<T>(args: &[String], name: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match flag_value(args, name) {
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("invalid value for {name}: {raw} ({e})")),
        None => Ok(None),
    }
}

fn required_flag<'a>(args: &'a [String], name: &str) -> anyhow::Result<&'a str> {
    flag_value(args, name).ok_or_else(|| anyhow!("missing required option {name}"))
}

/// Positional arguments: everything that is neither a flag nor a flag's value.
fn positionals(args: &[String], value_flags: &[&str]) -> Vec<String> {
    let mut out = Vec::new();
    let mut skip = false;
    for arg in args {
        if skip {
            skip = false;
            continue;
        }
        if value_flags.contains(&arg.as_str()) {
            skip = true;
        } else if !arg.starts_with("--") {
            out.push(arg.clone());
        }
    }
    out
}

fn load_catalog(args: &[String]) -> anyhow::Result<ProfileCatalog> {
    let path = flag_value(args, "--profiles")
        .map(PathBuf::from)
        .or_else(|| std::env::var(PROFILES_ENV).ok().map(PathBuf::from));
    match path {
        Some(p) => ProfileCatalog::from_path(&p)
            .with_context(|| format!("loading profile catalog {}", p.display())),
        None => Ok(ProfileCatalog::builtin()?),
    }
}

fn cmd_estimate(args: &[String]) -> anyhow::Result<()> {
    let catalog = load_catalog(args)?;

    let mut form = CalculationForm::by_ids(
        required_flag(args, "--hardware")?,
        required_flag(args, "--data-center")?,
        required_flag(args, "--model")?,
    );
    form.token_count = parse_flag(args, "--tokens")?;
    form.breakdown = TokenBreakdown {
        input_with_cache: parse_flag(args, "--input-with-cache")?,
        input_without_cache: parse_flag(args, "--input-without-cache")?,
        cache_read: parse_flag(args, "--cache-read")?,
        output_tokens: parse_flag(args, "--output-tokens")?,
    };
    form.use_detailed_tokens = has_flag(args, "--detailed");
    form.context_window = parse_flag(args, "--context-window")?;
    form.custom_pue = parse_flag(args, "--pue")?;
    form.custom_carbon_intensity = parse_flag(args, "--carbon-intensity")?;

    let request = form.resolve(&catalog)?;
    let report = validate(&request);
    if !report.is_valid() {
        eprintln!("{} validation error(s):", report.errors().len());
        for issue in report.errors() {
            eprintln!("  {issue}");
        }
        bail!("request rejected");
    }

    let result = estimate(&request);
    if has_flag(args, "--json") {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }
    Ok(())
}

fn print_result(r: &CalculationResult) {
    if let Some(w) = r.weighted_tokens {
        println!("Weighted tokens:     {}", format_large_number(w));
    }
    println!("Energy:              {} J", format_large_number(r.energy_joules));
    println!("                     {} kWh", format_number(r.energy_kwh, 6));
    println!(
        "Carbon per token:    {} g CO2",
        format_number(r.carbon_emissions_per_token_grams, 8)
    );
    println!(
        "Total emissions:     {} g CO2",
        format_number(r.total_emissions_grams, 4)
    );
    println!();
    println!("Equivalent to:");
    println!("  {} minutes of a 10 W bulb", format_number(r.lightbulb_minutes, 2));
    println!("  {} miles driven", format_number(r.car_miles, 4));
    println!("  {} tree-hours of absorption", format_number(r.tree_hours, 2));
}

fn cmd_count(args: &[String]) -> anyhow::Result<()> {
    let profile = match (
        parse_flag::<TokenizerProfile>(args, "--tokenizer")?,
        flag_value(args, "--model"),
    ) {
        (Some(p), _) => p,
        (None, Some(model)) => TokenizerProfile::from_model_name(model),
        (None, None) => TokenizerProfile::Cl100kBase,
    };

    let text = if let Some(path) = flag_value(args, "--file") {
        std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?
    } else {
        let words = positionals(args, &["--tokenizer", "--model", "--file"]);
        if words.is_empty() {
            std::io::read_to_string(std::io::stdin()).context("reading stdin")?
        } else {
            words.join(" ")
        }
    };

    println!("{} ({profile})", count_tokens(&text, profile));
    Ok(())
}

fn cmd_cost(args: &[String]) -> anyhow::Result<()> {
    let input: u64 = parse_flag(args, "--input")?
        .ok_or_else(|| anyhow!("missing required option --input"))?;
    let output: u64 = parse_flag(args, "--output")?
        .ok_or_else(|| anyhow!("missing required option --output"))?;

    let pricing = match (
        parse_flag::<f64>(args, "--input-price")?,
        parse_flag::<f64>(args, "--output-price")?,
    ) {
        (Some(i), Some(o)) => {
            let p = ModelPricing::new(flag_value(args, "--model").unwrap_or("custom"), i, o);
            match parse_flag::<f64>(args, "--cached-price")? {
                Some(c) => p.with_cached_input(c),
                None => p,
            }
        }
        _ => {
            let model = required_flag(args, "--model")?;
            ModelPricing::for_model(model).ok_or_else(|| {
                anyhow!("no pricing preset for '{model}'; pass --input-price and --output-price")
            })?
        }
    };

    let estimate = calculate_cost(input, output, &pricing, has_flag(args, "--cached"));
    println!("Model:   {}", estimate.model);
    println!(
        "Input:   {} tokens  {} {}",
        format_large_number(input as f64),
        estimate.currency,
        format_number(estimate.input_cost, 6)
    );
    println!(
        "Output:  {} tokens  {} {}",
        format_large_number(output as f64),
        estimate.currency,
        format_number(estimate.output_cost, 6)
    );
    println!("Total:   {}", estimate.format_detailed());
    Ok(())
}

fn cmd_profiles(args: &[String]) -> anyhow::Result<()> {
    let catalog = load_catalog(args)?;

    println!("=== Hardware ===");
    for hw in catalog.hardware_profiles() {
        println!(
            "  {:<20} {:>6} W  {:>8} tok/s",
            hw.id(),
            hw.power_watts(),
            hw.tokens_per_second()
        );
    }

    println!("\n=== Data Centers ===");
    for dc in catalog.data_center_profiles() {
        println!(
            "  {:<20} PUE {:<5}  {} kg CO2/kWh",
            dc.id(),
            dc.pue(),
            dc.carbon_intensity()
        );
    }

    println!("\n=== Models ===");
    for m in catalog.model_profiles() {
        println!(
            "  {:<20} ctx {:>8}  complexity {:<4}  tokenizer {}{}",
            m.id(),
            format_large_number(m.context_length() as f64),
            m.complexity_factor(),
            m.tokenizer(),
            if m.token_weights().is_some() {
                "  (weighted)"
            } else {
                ""
            }
        );
    }
    Ok(())
}

fn cmd_schema() -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&request_schema())?);
    Ok(())
}
