use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::debug;

use ecoloop::history::{append_entry, export_log, read_log, LogEntry, LogError};
use ecoloop::inputs::{
    validate_tree_age, DailyInputs, FootprintInputs, InputError, TransportMode, TravelMode,
    TreeSpecies,
};
use ecoloop::radar::{RadarChart, RadarVertex};
use ecoloop::scoring::{
    assess, calculate_scores_with_breakdown, calculate_sequestration, validate_scoring, Assessment,
};

const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 2;
const EXIT_LOG: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_OUTPUT: i32 = 5;

/// The day's lifestyle metrics. Defaults match an average day.
#[derive(Args, Debug)]
struct DailyArgs {
    /// Plastic waste in grams (0-500)
    #[arg(long, default_value_t = 50.0)]
    waste: f64,

    /// Main mode of transport: walking, cycling, bus, car, bike
    #[arg(long, default_value_t = TransportMode::Walking)]
    transport: TransportMode,

    /// Electricity used in kWh (0-20)
    #[arg(long, default_value_t = 5.0)]
    electricity: f64,

    /// Screen time in hours (0-15)
    #[arg(long, default_value_t = 5.0)]
    screen_time: f64,

    /// Water used in litres (0-500)
    #[arg(long, default_value_t = 100.0)]
    water: f64,

    /// Trees planted today
    #[arg(long, default_value_t = 0)]
    trees: u32,
}

/// Commute, device and gadget figures. Giving any of them enables the
/// footprint and eco score.
#[derive(Args, Debug)]
struct FootprintArgs {
    /// Commute mode: cycle, walk, bus, petrol-bike, electric-scooter
    #[arg(long)]
    commute: Option<TravelMode>,

    /// Commute distance in km (0-200)
    #[arg(long)]
    distance: Option<f64>,

    /// Devices in use during screen time (1-20)
    #[arg(long)]
    devices: Option<u32>,

    /// Hours of AI model usage (0-24)
    #[arg(long)]
    ai_hours: Option<f64>,

    /// Gadgets discarded today (0-50)
    #[arg(long)]
    gadgets: Option<u32>,
}

impl FootprintArgs {
    fn is_empty(&self) -> bool {
        self.commute.is_none()
            && self.distance.is_none()
            && self.devices.is_none()
            && self.ai_hours.is_none()
            && self.gadgets.is_none()
    }

    fn to_inputs(&self) -> FootprintInputs {
        let defaults = FootprintInputs::default();
        FootprintInputs {
            travel_mode: self.commute.unwrap_or(defaults.travel_mode),
            commute_distance_km: self.distance.unwrap_or(defaults.commute_distance_km),
            device_count: self.devices.unwrap_or(defaults.device_count),
            ai_model_usage_hours: self.ai_hours.unwrap_or(defaults.ai_model_usage_hours),
            discarded_gadgets: self.gadgets.unwrap_or(defaults.discarded_gadgets),
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score today's inputs and append them to the daily log
    Score {
        #[command(flatten)]
        daily: DailyArgs,

        #[command(flatten)]
        footprint: FootprintArgs,

        /// Print radar-chart vertices for the scores (a closed outline in JSON)
        #[arg(long)]
        radar: bool,

        /// Do not append the result to the daily log
        #[arg(long)]
        no_save: bool,

        /// Date to log the entry under (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Estimate commute, device and AI footprint and the eco score
    Footprint {
        /// Screen time in hours (0-15)
        #[arg(long, default_value_t = 5.0)]
        screen_time: f64,

        #[command(flatten)]
        footprint: FootprintArgs,
    },
    /// Estimate the CO2 a tree absorbs per year
    Sequestration {
        /// Species: banyan, neem, indian-almond, peepal
        #[arg(long)]
        species: TreeSpecies,

        /// Age of the tree in years
        #[arg(long)]
        age: f64,
    },
    /// List logged days
    History {
        /// Only show the most recent N entries (at least 1)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        last: Option<u64>,
    },
    /// Copy the full daily log to another file
    Export {
        /// Destination CSV file
        dest: PathBuf,
    },
    /// Create a config file
    Init {
        /// Write the defaults without prompting
        #[arg(long)]
        defaults: bool,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "ecoloop")]
#[command(about = "Score your daily impact on Earth, Water, Fire, Air and Space", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/ecoloop/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the daily log (overrides the config file)
    #[arg(short, long, global = true)]
    log: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Serialize)]
struct ScoreReport<'a> {
    date: NaiveDate,
    #[serde(flatten)]
    assessment: &'a Assessment,
    #[serde(skip_serializing_if = "Option::is_none")]
    radar: Option<Vec<RadarVertex>>,
}

fn exit_invalid_input(error: InputError) -> ! {
    let InputError::OutOfDomain(errors) = error;
    eprintln!("Invalid input:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    std::process::exit(EXIT_INPUT);
}

fn exit_log_error(error: LogError) -> ! {
    eprintln!("Log error: {:#}", anyhow::Error::from(error));
    std::process::exit(EXIT_LOG);
}

fn main() {
    let cli = Cli::parse();
    ecoloop::logging::init_logging(cli.verbose);

    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading config: the file may not exist yet
    if let Commands::Init { defaults, force } = cli.command {
        if let Err(e) = ecoloop::config::run_init_wizard(config_path, defaults, force) {
            eprintln!("Init failed: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
        std::process::exit(EXIT_SUCCESS);
    }

    // Load config
    let config = match ecoloop::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    // Validate scoring config at startup
    let scoring = config.effective_scoring();
    if let Err(errors) = validate_scoring(&scoring) {
        eprintln!("Scoring config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let log_path = cli.log.unwrap_or_else(|| config.effective_log_path());
    debug!(log = %log_path.display(), "using daily log");

    let use_colors = ecoloop::output::should_use_colors();

    match cli.command {
        Commands::Score {
            daily,
            footprint,
            radar,
            no_save,
            date,
            json,
        } => {
            let inputs = DailyInputs {
                plastic_waste_grams: daily.waste,
                transport_mode: daily.transport,
                electricity_kwh: daily.electricity,
                screen_time_hours: daily.screen_time,
                water_used_litres: daily.water,
                trees_planted_today: daily.trees,
                footprint: (!footprint.is_empty()).then(|| footprint.to_inputs()),
            };
            let inputs = inputs.validated().unwrap_or_else(|e| exit_invalid_input(e));

            let assessment = assess(&inputs, &scoring);
            let date = date.unwrap_or_else(|| chrono::Local::now().date_naive());
            let chart = radar.then(|| RadarChart::from_scores(&assessment.scores));

            if json {
                let report = ScoreReport {
                    date,
                    assessment: &assessment,
                    radar: chart.as_ref().map(RadarChart::closed_polygon),
                };
                match serde_json::to_string_pretty(&report) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Failed to serialize result: {}", e);
                        std::process::exit(EXIT_OUTPUT);
                    }
                }
            } else {
                println!("Elemental balance for {}", date);
                println!(
                    "{}",
                    ecoloop::output::format_scores_table(&assessment.scores, use_colors)
                );

                if cli.verbose {
                    println!();
                    println!(
                        "{}",
                        ecoloop::output::format_breakdown(&calculate_scores_with_breakdown(
                            &inputs
                        ))
                    );
                }

                if let Some(ref footprint) = assessment.footprint {
                    println!();
                    println!(
                        "{}",
                        ecoloop::output::format_footprint(footprint, use_colors)
                    );
                }

                if let Some(ref chart) = chart {
                    println!();
                    println!("{}", ecoloop::output::format_radar(chart));
                }
            }

            if !no_save {
                let entry = LogEntry::new(date, &inputs, &assessment.scores);
                if let Err(e) = append_entry(&log_path, &entry) {
                    exit_log_error(e);
                }
                if !json {
                    println!();
                    println!("Saved to {}", log_path.display());
                }
            }
        }
        Commands::Footprint {
            screen_time,
            footprint,
        } => {
            let inputs = DailyInputs {
                screen_time_hours: screen_time,
                footprint: Some(footprint.to_inputs()),
                ..DailyInputs::default()
            };
            let inputs = inputs.validated().unwrap_or_else(|e| exit_invalid_input(e));

            let assessment = assess(&inputs, &scoring);
            if let Some(ref footprint) = assessment.footprint {
                println!(
                    "{}",
                    ecoloop::output::format_footprint(footprint, use_colors)
                );
            }
        }
        Commands::Sequestration { species, age } => {
            if let Err(error) = validate_tree_age(age) {
                exit_invalid_input(InputError::OutOfDomain(vec![error]));
            }
            let kg = calculate_sequestration(species, age);
            println!(
                "{}",
                ecoloop::output::format_sequestration(species, age, kg)
            );
        }
        Commands::History { last } => {
            let entries = read_log(&log_path).unwrap_or_else(|e| exit_log_error(e));
            let start = match last {
                Some(n) => entries
                    .len()
                    .saturating_sub(usize::try_from(n).unwrap_or(usize::MAX)),
                None => 0,
            };
            println!(
                "{}",
                ecoloop::output::format_history(&entries[start..], use_colors)
            );
        }
        Commands::Export { dest } => {
            let count = export_log(&log_path, &dest).unwrap_or_else(|e| exit_log_error(e));
            println!("Exported {} entries to {}", count, dest.display());
        }
        Commands::Init { .. } => unreachable!("handled before config load"),
    }

    std::process::exit(EXIT_SUCCESS);
}
