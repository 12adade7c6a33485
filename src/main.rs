use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use glider_launch::core::flight::{self, Sweep};
use glider_launch::core::gear;
use glider_launch::core::params::{AngleSweepRange, Settings};
use glider_launch::core::report;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Flight,
    Gear,
    Help,
}

#[derive(Clone, Debug, PartialEq)]
struct Options {
    command: Command,
    config: Option<PathBuf>,
    min_deg: Option<i32>,
    max_deg: Option<i32>,
    out_dir: PathBuf,
    plot: bool,
    quiet: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            command: Command::Flight,
            config: None,
            min_deg: None,
            max_deg: None,
            out_dir: PathBuf::from("."),
            plot: true,
            quiet: false,
        }
    }
}

fn parse_i32(value: &str, label: &str) -> Result<i32, String> {
    value
        .parse::<i32>()
        .map_err(|_| format!("Invalid {label}: '{value}'. Expected a whole number of degrees."))
}

fn flag_value<'a>(args: &'a [String], index: usize, flag: &str) -> Result<&'a str, String> {
    args.get(index)
        .map(String::as_str)
        .ok_or_else(|| format!("Missing value after {flag}."))
}

fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut options = Options::default();
    let mut command_seen = false;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                options.command = Command::Help;
                return Ok(options);
            }
            "--config" => {
                i += 1;
                options.config = Some(PathBuf::from(flag_value(args, i, "--config")?));
            }
            "--min" => {
                i += 1;
                options.min_deg = Some(parse_i32(flag_value(args, i, "--min")?, "--min")?);
            }
            "--max" => {
                i += 1;
                options.max_deg = Some(parse_i32(flag_value(args, i, "--max")?, "--max")?);
            }
            "--out" => {
                i += 1;
                options.out_dir = PathBuf::from(flag_value(args, i, "--out")?);
            }
            "--no-plot" => options.plot = false,
            "--quiet" => options.quiet = true,
            "flight" | "gear" if !command_seen => {
                command_seen = true;
                options.command = if args[i] == "gear" {
                    Command::Gear
                } else {
                    Command::Flight
                };
            }
            other => return Err(format!("Unexpected argument '{other}'.")),
        }
        i += 1;
    }

    if options.command == Command::Gear && (options.min_deg.is_some() || options.max_deg.is_some())
    {
        return Err("--min and --max only apply to the flight sweep.".to_string());
    }
    Ok(options)
}

fn load_settings(options: &Options) -> Result<Settings, String> {
    let mut settings = match &options.config {
        Some(path) => Settings::load(path).map_err(|e| e.to_string())?,
        None => Settings::default(),
    };
    settings.sweep = AngleSweepRange::new(
        options.min_deg.unwrap_or(settings.sweep.min_deg),
        options.max_deg.unwrap_or(settings.sweep.max_deg),
    )
    .map_err(|e| e.to_string())?;
    settings.validate().map_err(|e| e.to_string())?;
    Ok(settings)
}

fn ensure_dir(dir: &Path) -> Result<(), String> {
    fs::create_dir_all(dir)
        .map_err(|e| format!("Could not create output directory '{}': {e}", dir.display()))
}

fn run_flight(settings: &Settings, options: &Options) -> Result<(), String> {
    let params = settings.flight;
    let range = settings.sweep;
    println!("{}", report::format_inputs(&params, range));

    let mut flights = Vec::new();
    let result = flight::sweep_with(range, &params, |flight, best| {
        if !options.quiet {
            println!("{}", report::format_flight_line(&flight, best));
        }
        if options.plot {
            flights.push(flight);
        }
    });

    println!("=========");
    println!("{}", report::format_optimum(&result));

    if options.plot {
        ensure_dir(&options.out_dir)?;
        let sweep = Sweep {
            range,
            flights,
            result,
        };
        let path = report::timestamped_path(&options.out_dir, "flight_paths", "png", Local::now());
        match report::render_sweep_chart(&sweep, &path) {
            Ok(()) => println!("Saved flight path chart to {}", path.display()),
            Err(err) => eprintln!("Could not draw the flight path chart: {err}"),
        }
    }
    Ok(())
}

fn run_gear(settings: &Settings, options: &Options) -> Result<(), String> {
    println!("Designing launch gear...");
    let design = gear::design(&settings.gear).map_err(|e| e.to_string())?;
    println!("{}", report::format_gear_design(&design));

    ensure_dir(&options.out_dir)?;
    let points_path = options.out_dir.join("gear_points.txt");
    report::write_gear_points(&design.profile.points, &points_path).map_err(|e| e.to_string())?;
    println!("Saved gear points to {}", points_path.display());

    if options.plot {
        let path = report::timestamped_path(&options.out_dir, "gear_profile", "png", Local::now());
        match report::render_gear_chart(&design, &path) {
            Ok(()) => println!("Saved gear chart to {}", path.display()),
            Err(err) => eprintln!("Could not draw the gear chart: {err}"),
        }
    }
    Ok(())
}

fn print_usage(program: &str) {
    println!("Usage:");
    println!("  {program} [flight] [--config FILE] [--min DEG] [--max DEG] [--out DIR] [--no-plot] [--quiet]");
    println!("  {program} gear [--config FILE] [--out DIR] [--no-plot]");
    println!();
    println!("Examples:");
    println!("  {program}");
    println!("  {program} --min 5 --max 30 --out plots");
    println!("  {program} gear --config launcher.json");
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("glider_launch", String::as_str);
    let options = parse_args(&args)?;

    match options.command {
        Command::Help => {
            print_usage(program);
            Ok(())
        }
        Command::Flight => run_flight(&load_settings(&options)?, &options),
        Command::Gear => run_gear(&load_settings(&options)?, &options),
    }
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        print_usage("cargo run --");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{Command, Options, load_settings, parse_args};

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("glider_launch")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn no_arguments_runs_default_sweep() {
        let options = parse_args(&args(&[])).expect("parsing should succeed");
        assert_eq!(options, Options::default());
        assert_eq!(options.command, Command::Flight);
    }

    #[test]
    fn reads_sweep_flags() {
        let options = parse_args(&args(&[
            "flight", "--min", "-5", "--max", "30", "--out", "plots", "--no-plot", "--quiet",
        ]))
        .expect("parsing should succeed");

        assert_eq!(options.min_deg, Some(-5));
        assert_eq!(options.max_deg, Some(30));
        assert_eq!(options.out_dir, PathBuf::from("plots"));
        assert!(!options.plot);
        assert!(options.quiet);
    }

    #[test]
    fn help_wins_over_everything_else() {
        let options = parse_args(&args(&["gear", "--help", "--bogus"])).expect("help parses");
        assert_eq!(options.command, Command::Help);
    }

    #[test]
    fn gear_command_with_config() {
        let options =
            parse_args(&args(&["gear", "--config", "launcher.json"])).expect("parsing succeeds");
        assert_eq!(options.command, Command::Gear);
        assert_eq!(options.config, Some(PathBuf::from("launcher.json")));
    }

    #[test]
    fn rejects_bad_input() {
        let err = parse_args(&args(&["--min", "ten"])).expect_err("should fail");
        assert!(err.contains("Invalid --min"));

        let err = parse_args(&args(&["--max"])).expect_err("should fail");
        assert!(err.contains("Missing value after --max"));

        let err = parse_args(&args(&["gear", "--min", "3"])).expect_err("should fail");
        assert!(err.contains("only apply to the flight sweep"));

        let err = parse_args(&args(&["flight", "gear"])).expect_err("should fail");
        assert!(err.contains("Unexpected argument 'gear'"));
    }

    #[test]
    fn flags_override_default_sweep() {
        let options = parse_args(&args(&["--max", "12"])).expect("parsing succeeds");
        let settings = load_settings(&options).expect("defaults are valid");
        assert_eq!(settings.sweep.min_deg, 0);
        assert_eq!(settings.sweep.max_deg, 12);

        let options = parse_args(&args(&["--min", "20", "--max", "10"])).expect("parses");
        let err = load_settings(&options).expect_err("inverted range");
        assert!(err.contains("inverted"));
    }

    #[test]
    fn missing_config_file_is_reported() {
        let options = parse_args(&args(&["--config", "does/not/exist.json"])).expect("parses");
        let err = load_settings(&options).expect_err("file is missing");
        assert!(err.contains("could not read settings file"));
    }
}
