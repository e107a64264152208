//! One-shot unit conversion from the command line
//! Usage: cargo run --bin convert -- <CATEGORY> <FROM> <TO> <VALUE>

use clap::Parser;
use tracing_subscriber::EnvFilter;

use uconv::config::Config;
use uconv::converter::{ConversionError, ConversionRequest, UnitConverter};
use uconv::fallback::{GeminiClient, TextGenerator};
use uconv::units::UnitCategory;

/// Bad input: unknown category or unit, invalid value, identical units
const EXIT_USAGE: i32 = 2;
/// Conversion could not be completed, or no credential
const EXIT_FAILURE: i32 = 1;

#[derive(Parser)]
#[command(name = "convert")]
#[command(about = "Convert a value between two units of the same category", long_about = None)]
struct Cli {
    /// List categories and their units, then exit
    #[arg(short, long)]
    list: bool,

    /// Unit category (e.g. "Length")
    #[arg(required_unless_present = "list")]
    category: Option<String>,

    /// Unit to convert from (e.g. "Meters")
    #[arg(required_unless_present = "list")]
    from: Option<String>,

    /// Unit to convert to (e.g. "Feet")
    #[arg(required_unless_present = "list")]
    to: Option<String>,

    /// Value to convert (zero or positive)
    #[arg(required_unless_present = "list", allow_negative_numbers = true)]
    value: Option<f64>,
}

fn print_catalog() {
    for category in UnitCategory::ALL {
        println!("{}: {}", category, category.units().join(", "));
    }
}

fn exit_code(error: &ConversionError) -> i32 {
    match error {
        ConversionError::Fallback(_) => EXIT_FAILURE,
        ConversionError::SameUnit
        | ConversionError::InvalidValue(_)
        | ConversionError::UnknownCategory(_)
        | ConversionError::UnknownUnit { .. } => EXIT_USAGE,
    }
}

/// Convert once and print the outcome, returning the process exit status
fn run<G: TextGenerator>(
    converter: &UnitConverter<G>,
    category: &str,
    from: String,
    to: String,
    value: f64,
) -> i32 {
    let outcome = ConversionRequest::parse(value, category, from, to)
        .and_then(|request| converter.convert(&request));

    match outcome {
        Ok(result) => {
            println!("{}: {}", result.label(), result);
            0
        }
        Err(e @ ConversionError::SameUnit) => {
            eprintln!("Warning: {}", e);
            exit_code(&e)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            exit_code(&e)
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.list {
        print_catalog();
        return;
    }

    let (Some(category), Some(from), Some(to), Some(value)) = (cli.category, cli.from, cli.to, cli.value)
    else {
        eprintln!("Error: category, from, to and value are required");
        std::process::exit(EXIT_USAGE);
    };

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    let converter = UnitConverter::new(GeminiClient::new(&config));
    std::process::exit(run(&converter, &category, from, to, value));
}

#[cfg(test)]
mod tests {
    use super::*;
    use uconv::fallback::FallbackError;

    struct Stub(Option<&'static str>);

    impl TextGenerator for Stub {
        fn generate(&self, _prompt: &str) -> Result<String, FallbackError> {
            self.0.map(str::to_string).ok_or(FallbackError::EmptyResponse)
        }
    }

    fn exit_for(generator: Stub, args: [&str; 4]) -> i32 {
        let converter = UnitConverter::new(generator);
        let value: f64 = args[3].parse().unwrap();
        run(&converter, args[0], args[1].into(), args[2].into(), value)
    }

    #[test]
    fn test_table_hit_exits_zero() {
        assert_eq!(exit_for(Stub(None), ["Length", "Meters", "Feet", "10"]), 0);
    }

    #[test]
    fn test_generated_answer_exits_zero() {
        assert_eq!(exit_for(Stub(Some("1.67")), ["Length", "Feet", "Yards", "5"]), 0);
    }

    #[test]
    fn test_same_unit_exits_usage() {
        assert_eq!(exit_for(Stub(Some("1")), ["Length", "Meters", "meters", "5"]), EXIT_USAGE);
    }

    #[test]
    fn test_unknown_unit_exits_usage() {
        assert_eq!(exit_for(Stub(Some("1")), ["Length", "Meters", "Grams", "5"]), EXIT_USAGE);
    }

    #[test]
    fn test_unknown_category_exits_usage() {
        assert_eq!(exit_for(Stub(Some("1")), ["Pressure", "Pascals", "Bars", "5"]), EXIT_USAGE);
    }

    #[test]
    fn test_fallback_failure_exits_failure() {
        assert_eq!(exit_for(Stub(None), ["Weight", "Tonnes", "Pounds", "2"]), EXIT_FAILURE);
    }

    #[test]
    fn test_negative_value_parses_and_is_refused() {
        let cli = Cli::try_parse_from(["convert", "Length", "Meters", "Feet", "-5"]).unwrap();
        assert_eq!(cli.value, Some(-5.0));

        let converter = UnitConverter::new(Stub(Some("1")));
        let code = run(&converter, "Length", "Meters".into(), "Feet".into(), -5.0);
        assert_eq!(code, EXIT_USAGE);
    }

    #[test]
    fn test_list_needs_no_positionals() {
        let cli = Cli::try_parse_from(["convert", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.value.is_none());
    }
}
