use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use env_logger::Env;
use log::{error, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use sigmoid_digits::data::dataset::parse_pixels;
use sigmoid_digits::eval::evaluate_path;
use sigmoid_digits::train::{train_loop, EpochStats};
use sigmoid_digits::{Dataset, Network, NetworkStructure, Result, RunSpec, Sgd, TrainConfig};

#[derive(Parser, Debug)]
#[command(about = "Train and run a sigmoid feedforward network on pixel CSV data")]
struct Cli {
    /// level of logging details (into stderr); RUST_LOG takes precedence
    #[arg(short, long, value_enum, default_value_t = LogLevel::Info, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train a new network and write its parameter file
    Train(TrainArgs),
    /// Report accuracy of a saved network on a labelled dataset
    Evaluate {
        /// parameter file written by `train`
        #[arg(short, long)]
        params: PathBuf,
        /// labelled dataset (label,pixel,pixel,...)
        #[arg(short, long)]
        data: PathBuf,
    },
    /// Print the predicted class of one image
    Classify {
        /// parameter file written by `train`
        #[arg(short, long)]
        params: PathBuf,
        /// comma-separated raw pixel intensities (0-255), no label
        #[arg(long)]
        pixels: String,
    },
}

#[derive(clap::Args, Debug)]
struct TrainArgs {
    /// labelled training dataset (label,pixel,pixel,...)
    #[arg(short, long)]
    train_data: PathBuf,

    /// labelled test dataset evaluated after training
    #[arg(long)]
    test_data: Option<PathBuf>,

    /// JSON run spec; flags below override its fields
    #[arg(short, long)]
    config: Option<String>,

    /// write the effective run spec to this JSON file
    #[arg(long)]
    save_config: Option<String>,

    /// layer sizes separated by commas, input first, e.g. 784,30,10
    #[arg(long, value_delimiter = ',')]
    structure: Option<Vec<usize>>,

    /// number of training epochs
    #[arg(long)]
    epochs: Option<usize>,

    /// samples per mini-batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// learning rate
    #[arg(long)]
    eta: Option<f64>,

    /// seed for weight initialization and shuffling
    #[arg(long)]
    seed: Option<u64>,

    /// where to write the trained parameters
    #[arg(short, long, default_value = "trained.txt")]
    output: PathBuf,

    /// measure training accuracy after every epoch
    #[arg(long, default_value_t = false)]
    track_accuracy: bool,

    /// print one JSON line of epoch statistics to stdout per epoch
    #[arg(long, default_value_t = false)]
    progress_json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "off,sigmoid_digits=error",
            LogLevel::Warn => "off,sigmoid_digits=warn",
            LogLevel::Info => "off,sigmoid_digits=info",
            LogLevel::Debug => "off,sigmoid_digits=debug",
            LogLevel::Trace => "off,sigmoid_digits=trace",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    env_logger::init_from_env(Env::default().default_filter_or(cli.log_level.filter()));

    let result = match cli.command {
        Command::Train(args) => run_train(args),
        Command::Evaluate { params, data } => run_evaluate(&params, &data),
        Command::Classify { params, pixels } => run_classify(&params, &pixels),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    let begin = Instant::now();

    let mut spec = match &args.config {
        Some(path) => RunSpec::load_json(path)?,
        None => RunSpec::default(),
    };
    if let Some(sizes) = args.structure {
        spec.structure = NetworkStructure::new(sizes)?;
    }
    if let Some(epochs) = args.epochs {
        spec.epochs = epochs;
    }
    if let Some(batch_size) = args.batch_size {
        spec.batch_size = batch_size;
    }
    if let Some(eta) = args.eta {
        spec.eta = eta;
    }
    if args.seed.is_some() {
        spec.seed = args.seed;
    }
    let seed = spec.seed.unwrap_or_else(|| rand::thread_rng().next_u64());
    spec.seed = Some(seed);
    spec.validate()?;
    if let Some(path) = &args.save_config {
        spec.save_json(path)?;
    }

    info!(
        "training {} for {} epochs, batch size {}, eta {}, seed {}",
        spec.structure, spec.epochs, spec.batch_size, spec.eta, seed
    );

    let dataset = Dataset::load(&args.train_data)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut network = Network::random(spec.structure.clone(), &mut rng);

    let mut config = TrainConfig::new(spec.epochs, spec.batch_size);
    config.track_accuracy = args.track_accuracy;
    let printer = if args.progress_json {
        let (tx, rx) = mpsc::channel::<EpochStats>();
        config.progress_tx = Some(tx);
        Some(thread::spawn(move || {
            for stats in rx {
                match serde_json::to_string(&stats) {
                    Ok(line) => println!("{}", line),
                    Err(e) => error!("cannot encode epoch stats: {}", e),
                }
            }
        }))
    } else {
        None
    };

    let outcome = train_loop(&mut network, &dataset, &Sgd::new(spec.eta), &config, &mut rng);
    drop(config);
    if let Some(handle) = printer {
        handle.join().ok();
    }
    let outcome = outcome?;
    info!(
        "training complete: {} epochs, {} updates",
        outcome.epochs_completed, outcome.batches_applied
    );
    network.save(&args.output)?;

    let trained = begin.elapsed();

    if let Some(test_data) = &args.test_data {
        let eval = evaluate_path(&network, test_data)?;
        println!("Final accuracy: {}", eval);
    }

    info!("time to train: {:.2} minutes", trained.as_secs_f64() / 60.0);
    info!("time to finish everything: {:.2} minutes", begin.elapsed().as_secs_f64() / 60.0);
    Ok(())
}

fn run_evaluate(params: &Path, data: &Path) -> Result<()> {
    let network = Network::load(params)?;
    let eval = evaluate_path(&network, data)?;
    println!("Final accuracy: {}", eval);
    Ok(())
}

fn run_classify(params: &Path, pixels: &str) -> Result<()> {
    let network = Network::load(params)?;
    let features = parse_pixels(pixels)?;
    println!("{}", network.classify(&features)?);
    Ok(())
}
