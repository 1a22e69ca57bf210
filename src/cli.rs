use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "dupes-report-csv")]
#[command(about = "Summarize a duplicates report into a CSV, one row per duplicate group", long_about = None)]
pub struct Cli {
    /// Name of the .json report to start with
    #[arg(long = "in", value_name = "PATH")]
    pub input: PathBuf,

    /// Name of the .csv report to output
    #[arg(long = "out", value_name = "PATH", default_value = "duplicates.csv")]
    pub output: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_defaults() {
        let cli = Cli::try_parse_from(["dupes-report-csv", "--in", "report.json"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("report.json"));
        assert_eq!(cli.output, PathBuf::from("duplicates.csv"));
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["dupes-report-csv"]).is_err());
    }
}
