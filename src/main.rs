use std::error::Error;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, Level};

use abalone_nn::report::{render_error_chart, ChartStyle};
use abalone_nn::{
    AbaloneFile, DataSource, ErrorHistory, GradientScale, RandomSource, RunConfig, Trainer,
};

#[derive(Parser)]
#[command(name = "abalone-nn")]
#[command(about = "Train a three-layer sigmoid regression network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: Level,
}

#[derive(Subcommand)]
enum Command {
    /// Train on abalone records (or random data) and chart the error
    Train(TrainArgs),
    /// Re-render a chart from a saved error history
    Chart {
        /// History JSON written by `train --history`
        #[arg(long, value_name = "PATH")]
        history: PathBuf,
        /// Output PNG
        #[arg(short, long, value_name = "PATH", default_value = "error.png")]
        out: PathBuf,
    },
}

#[derive(Args)]
struct TrainArgs {
    /// JSON config file; flags override its values
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Abalone data file; random data is used when omitted
    #[arg(short, long, value_name = "PATH")]
    data: Option<PathBuf>,
    /// Number of records to train on
    #[arg(short = 'n', long, value_name = "INT")]
    examples: Option<usize>,
    /// Hidden layer widths, e.g. 5,5
    #[arg(long, value_name = "H1,H2", value_delimiter = ',')]
    hidden: Option<Vec<usize>>,
    /// Features per example (random data only)
    #[arg(long, value_name = "INT")]
    features: Option<usize>,
    /// Output width (random data only)
    #[arg(long, value_name = "INT")]
    outputs: Option<usize>,
    #[arg(short, long, value_name = "INT")]
    epochs: Option<usize>,
    #[arg(long, value_name = "FLOAT")]
    learning_rate: Option<f64>,
    /// Record the error every Nth epoch
    #[arg(long, value_name = "INT")]
    sample_every: Option<usize>,
    /// Weight gradient scaling; `mean` divides by the example count
    #[arg(long, value_enum, value_name = "SCALE")]
    gradient_scale: Option<GradientScale>,
    #[arg(short, long, value_name = "INT")]
    seed: Option<u64>,
    /// Output PNG for the error chart
    #[arg(long, value_name = "PATH")]
    chart: Option<PathBuf>,
    /// Skip writing the chart
    #[arg(long)]
    no_chart: bool,
    /// Also write the error history as JSON
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,
}

impl TrainArgs {
    fn overrides(&self) -> RunConfig {
        RunConfig {
            data: self.data.clone(),
            examples: self.examples,
            hidden: self.hidden.clone(),
            features: self.features,
            outputs: self.outputs,
            epochs: self.epochs,
            learning_rate: self.learning_rate,
            sample_every: self.sample_every,
            gradient_scale: self.gradient_scale,
            seed: self.seed,
            chart: self.chart.clone(),
            history: self.history.clone(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .compact()
        .with_max_level(cli.log_level)
        .init();

    match cli.command {
        Command::Train(args) => train(args)?,
        Command::Chart { history, out } => {
            let history = ErrorHistory::load_json(&history)?;
            render_error_chart(&history, &ChartStyle::default(), &out)?;
        }
    }
    Ok(())
}

fn train(args: TrainArgs) -> Result<(), Box<dyn Error>> {
    let base = match &args.config {
        Some(path) => RunConfig::load_json(path)?,
        None => RunConfig::default(),
    };
    let cfg = base.merge(args.overrides());

    let train_config = cfg.train_config()?;
    let hidden = cfg.hidden()?;
    let seed = cfg.seed();

    let source: Box<dyn DataSource> = match &cfg.data {
        Some(path) => Box::new(AbaloneFile::new(path)),
        None => {
            info!("no data file given, training on random data");
            Box::new(RandomSource::new(
                cfg.features.unwrap_or(3),
                cfg.outputs.unwrap_or(1),
                seed.wrapping_add(1),
            ))
        }
    };

    let mut rng = StdRng::seed_from_u64(seed);
    let trainer = Trainer::initialize(source.as_ref(), cfg.examples(), hidden, train_config, &mut rng)?;
    let outcome = trainer.train();

    if let (Some(first), Some(last)) = (outcome.history.first(), outcome.history.last()) {
        println!("Epoch {}: error = {:.6}", first.epoch, first.mean_abs_error);
        println!("Epoch {}: error = {:.6}", last.epoch, last.mean_abs_error);
    }
    println!("{} epochs run ({:?})", outcome.epochs_run, outcome.state);

    if let Some(path) = &cfg.history {
        outcome.history.save_json(path)?;
    }
    if !args.no_chart && !outcome.history.is_empty() {
        render_error_chart(&outcome.history, &ChartStyle::default(), cfg.chart_path())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn train_args(flags: &[&str]) -> TrainArgs {
        let argv = ["abalone-nn", "train"].iter().chain(flags).copied();
        match Cli::try_parse_from(argv).unwrap().command {
            Command::Train(args) => args,
            Command::Chart { .. } => panic!("expected the train subcommand"),
        }
    }

    #[test]
    fn gradient_scale_flag_overrides_config_file() {
        let file = RunConfig { gradient_scale: Some(GradientScale::Mean), ..RunConfig::default() };
        let merged = file.merge(train_args(&["--gradient-scale", "sum"]).overrides());
        assert_eq!(merged.gradient_scale, Some(GradientScale::Sum));
    }

    #[test]
    fn gradient_scale_left_to_config_when_flag_absent() {
        let file = RunConfig { gradient_scale: Some(GradientScale::Mean), ..RunConfig::default() };
        let merged = file.merge(train_args(&[]).overrides());
        assert_eq!(merged.gradient_scale, Some(GradientScale::Mean));
    }

    #[test]
    fn unknown_gradient_scale_is_rejected() {
        let argv = ["abalone-nn", "train", "--gradient-scale", "median"];
        assert!(Cli::try_parse_from(argv).is_err());
    }
}
