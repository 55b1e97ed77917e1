use crate::commands::{
    run_ask, run_diagnose, run_recommend, run_soil_history, AskArgs, DiagnoseArgs,
    RecommendArgs, SoilHistoryArgs,
};
use crate::server;
use agri_advisor::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "agri-advisor",
    about = "Crop, fertilizer and yield recommendations over HTTP or from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Evaluate one recommendation form from key=value fields
    Recommend(RecommendArgs),
    /// Classify a farm assistant chat message
    Ask(AskArgs),
    /// Diagnose a leaf image by its file name
    Diagnose(DiagnoseArgs),
    /// Summarize a soil test history CSV export
    SoilHistory(SoilHistoryArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Recommend(args) => run_recommend(args),
        Command::Ask(args) => run_ask(args),
        Command::Diagnose(args) => run_diagnose(args),
        Command::SoilHistory(args) => run_soil_history(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::KindArg;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["agri-advisor"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn recommend_collects_repeated_fields() {
        let cli = Cli::try_parse_from([
            "agri-advisor",
            "recommend",
            "fertilizer",
            "--field",
            "N=70",
            "--field",
            "P=20",
            "--field",
            "K=35",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Recommend(args)) => {
                assert_eq!(args.kind, KindArg::Fertilizer);
                assert_eq!(args.fields.len(), 3);
                assert_eq!(args.fields[0], ("N".to_string(), "70".to_string()));
            }
            other => panic!("expected recommend command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_fields() {
        let result = Cli::try_parse_from(["agri-advisor", "recommend", "crop", "--field", "N70"]);
        assert!(result.is_err());
    }
}
