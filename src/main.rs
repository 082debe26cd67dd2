use audiology::{
    project_to_plot, quantize, scenario_from_yaml, AnswerValue, AudiologyError, MaskingExercise,
    MaskingScenario, TrainerConfig,
};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser, Debug)]
#[command(name = "audiology")]
#[command(about = "Audiogram quantization and masking exercise checker")]
#[command(version)]
struct Cli {
    /// YAML file overriding the default grid and masking rules
    #[arg(short, long, global = true, env = "AUDIOLOGY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Snap a normalized plot position to the nearest test point
    Quantize {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
    },
    /// Normalized plot position of a frequency / level pair
    Project {
        frequency: f64,
        #[arg(allow_negative_numbers = true)]
        level: f64,
    },
    /// Check one answer at one stage of a masking scenario
    Evaluate {
        #[arg(short, long)]
        scenario: PathBuf,
        #[arg(long)]
        stage: String,
        #[arg(short, long, allow_hyphen_values = true)]
        answer: String,
    },
    /// Run a full exercise, one answer per stage attempt
    Exercise {
        #[arg(short, long)]
        scenario: PathBuf,
        /// Comma-separated answers, submitted in order
        #[arg(short, long, value_delimiter = ',', allow_hyphen_values = true)]
        answers: Vec<String>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(message) = run(cli) {
        eprintln!("Error: {}", message);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => TrainerConfig::from_yaml(&read_file(path)?).map_err(|e| e.to_string())?,
        None => TrainerConfig::default(),
    };

    match cli.command {
        Command::Quantize { x, y } => print_json(&quantize(&config.grid, x, y)),
        Command::Project { frequency, level } => {
            print_json(&project_to_plot(&config.grid, frequency, level))
        }
        Command::Evaluate {
            scenario,
            stage,
            answer,
        } => {
            let scenario = load_scenario(&scenario, &config)?;
            let result =
                audiology::evaluate_answer_text(&config.masking, &scenario, &stage, &answer)
                    .map_err(|e| e.to_string())?;
            print_json(&result)
        }
        Command::Exercise { scenario, answers } => {
            let scenario = load_scenario(&scenario, &config)?;
            run_exercise(scenario, &config, &answers)
        }
    }
}

fn run_exercise(
    scenario: MaskingScenario,
    config: &TrainerConfig,
    answers: &[String],
) -> Result<(), String> {
    let mut exercise = MaskingExercise::new(scenario, config.masking.clone());

    for text in answers {
        let stage = exercise.stage();
        let result = AnswerValue::parse(stage, text)
            .and_then(|answer| exercise.submit(&answer))
            .map_err(|e| e.to_string())?;
        print_json(&result)?;
        if exercise.is_complete() {
            break;
        }
    }

    if exercise.is_complete() {
        eprintln!("Exercise complete after {} answers", exercise.attempts());
    } else {
        eprintln!("Exercise stopped at stage {}", exercise.stage());
    }
    Ok(())
}

fn load_scenario(path: &Path, config: &TrainerConfig) -> Result<MaskingScenario, String> {
    let source = read_file(path)?;
    scenario_from_yaml(&source, &config.masking).map_err(|e: AudiologyError| e.to_string())
}

fn read_file(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("reading '{}': {}", path.display(), e))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{}", json);
    Ok(())
}
