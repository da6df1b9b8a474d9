use std::fs::File;
use std::io::stderr;
use std::io::stdout;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::bail;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use log::debug;

use nfa2dfa::build_nfa;
use nfa2dfa::collect_words;
use nfa2dfa::compare;
use nfa2dfa::write_comparison;
use nfa2dfa::write_determinism;
use nfa2dfa::write_evaluation;
use nfa2dfa::WordSources;
use nfadfa_automata::random_nfa;
use nfadfa_automata::subset_construction;
use nfadfa_automata::subset_construction_traced;
use nfadfa_automata::FiniteAutomaton;
use nfadfa_io::dot::render;
use nfadfa_io::dot::write_dot;
use nfadfa_io::dot::ImageFormat;
use nfadfa_io::json::load_dfa;
use nfadfa_io::json::load_nfa;
use nfadfa_io::json::save_dfa;
use nfadfa_io::json::save_nfa;
use nfadfa_io::json::write_dfa;
use nfadfa_io::json::write_nfa;
use nfadfa_utilities::Timing;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Png,
    Svg,
    Pdf,
}

impl From<Format> for ImageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Png => ImageFormat::Png,
            Format::Svg => ImageFormat::Svg,
            Format::Pdf => ImageFormat::Pdf,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "nfa2dfa",
    about = "A finite automaton conversion tool",
    long_about = "Validates, converts, draws and simulates finite automata stored in the JSON format"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Print the time spent in the different phases.
    #[arg(long, global = true)]
    time: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the components of an automaton.
    Info {
        #[arg(value_name = "FILE")]
        automaton: PathBuf,

        /// The file contains a deterministic automaton.
        #[arg(long)]
        dfa: bool,
    },

    /// Decide whether a nondeterministic automaton is really nondeterministic.
    Validate {
        #[arg(value_name = "FILE")]
        nfa: PathBuf,
    },

    /// Build a nondeterministic automaton from its components.
    Create {
        /// Where to write the automaton, stdout by default.
        output: Option<PathBuf>,

        #[arg(long, value_delimiter = ',', required = true)]
        states: Vec<String>,

        #[arg(long, value_delimiter = ',', required = true)]
        alphabet: Vec<String>,

        #[arg(long)]
        initial: String,

        #[arg(long, value_delimiter = ',', required = true)]
        finals: Vec<String>,

        /// A transition from an origin on a symbol, can be repeated.
        #[arg(long = "transition", value_name = "ORIGIN,SYMBOL,DESTINATION...")]
        transitions: Vec<String>,
    },

    /// Convert a nondeterministic automaton with the subset construction.
    Convert {
        #[arg(value_name = "FILE")]
        nfa: PathBuf,

        /// Where to write the deterministic automaton, stdout by default.
        output: Option<PathBuf>,

        /// Print the steps of the construction.
        #[arg(long)]
        trace: bool,
    },

    /// Write an automaton as a Graphviz diagram.
    Dot {
        #[arg(value_name = "FILE")]
        automaton: PathBuf,

        /// Where to write the diagram, stdout by default.
        output: Option<PathBuf>,

        /// The file contains a deterministic automaton.
        #[arg(long)]
        dfa: bool,

        /// Draw the result of the subset construction instead.
        #[arg(long, conflicts_with = "dfa")]
        convert: bool,

        /// Render an image with the Graphviz dot program, requires an output.
        #[arg(long, value_enum, requires = "output")]
        render: Option<Format>,
    },

    /// Evaluate words on an automaton.
    Eval {
        #[arg(value_name = "FILE")]
        automaton: PathBuf,

        /// The words to evaluate, ε denotes the empty word.
        words: Vec<String>,

        /// The file contains a deterministic automaton.
        #[arg(long)]
        dfa: bool,

        /// Also convert the automaton and report every word on which both disagree.
        #[arg(long, conflicts_with = "dfa")]
        compare: bool,

        /// Evaluate all words up to the given length.
        #[arg(short = 'n', long)]
        max_length: Option<usize>,

        /// Evaluate the words in the given file, one per line.
        #[arg(short, long)]
        words_file: Option<PathBuf>,
    },

    /// Generate a random nondeterministic automaton.
    Random {
        /// Where to write the automaton, stdout by default.
        output: Option<PathBuf>,

        #[arg(long, default_value_t = 5)]
        states: usize,

        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=26))]
        symbols: u32,

        #[arg(long, default_value_t = 3)]
        outdegree: usize,
    },
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let cli = Cli::parse();
    let mut timing = Timing::new();

    let code = match cli.command {
        Command::Info { automaton, dfa } => {
            if dfa {
                println!("{:?}", load_dfa(&automaton)?);
            } else {
                println!("{:?}", load_nfa(&automaton)?);
            }

            ExitCode::SUCCESS
        }
        Command::Validate { nfa } => {
            write_determinism(stdout().lock(), &load_nfa(&nfa)?)?;
            ExitCode::SUCCESS
        }
        Command::Create {
            output,
            states,
            alphabet,
            initial,
            finals,
            transitions,
        } => {
            let nfa = build_nfa(&states, &alphabet, &initial, &finals, &transitions)?;
            debug!("Created automaton\n{nfa:?}");
            write_determinism(stderr().lock(), &nfa)?;

            if let Some(path) = output {
                save_nfa(path, &nfa)?;
            } else {
                write_nfa(stdout(), &nfa)?;
            }

            ExitCode::SUCCESS
        }
        Command::Convert { nfa, output, trace } => {
            let nfa = load_nfa(&nfa)?;

            let mut convert_time = timing.start("convert");
            let dfa = if trace {
                let (dfa, events) = subset_construction_traced(&nfa);
                for event in events {
                    eprintln!("{event}");
                }
                dfa
            } else {
                subset_construction(&nfa)
            };
            convert_time.finish();

            eprintln!("{dfa}");
            if let Some(path) = output {
                save_dfa(path, &dfa)?;
            } else {
                write_dfa(stdout(), &dfa)?;
            }

            ExitCode::SUCCESS
        }
        Command::Dot {
            automaton,
            output,
            dfa,
            convert,
            render: format,
        } => {
            if dfa {
                draw(&load_dfa(&automaton)?, output.as_deref(), format)?;
            } else if convert {
                draw(&subset_construction(&load_nfa(&automaton)?), output.as_deref(), format)?;
            } else {
                draw(&load_nfa(&automaton)?, output.as_deref(), format)?;
            }

            ExitCode::SUCCESS
        }
        Command::Eval {
            automaton,
            words,
            dfa,
            compare: both,
            max_length,
            words_file,
        } => {
            let sources = WordSources {
                words: &words,
                file: words_file.as_deref(),
                max_length,
            };

            if dfa {
                let dfa = load_dfa(&automaton)?;
                let words = collect_words(&dfa, &sources)?;
                write_evaluation(stdout().lock(), "DFA", &dfa, &words)?;
                ExitCode::SUCCESS
            } else {
                let nfa = load_nfa(&automaton)?;
                let words = collect_words(&nfa, &sources)?;

                if both {
                    let mut convert_time = timing.start("convert");
                    let dfa = subset_construction(&nfa);
                    convert_time.finish();

                    let mut compare_time = timing.start("compare");
                    let comparisons = compare(&nfa, &dfa, &words);
                    compare_time.finish();

                    if write_comparison(stdout().lock(), &comparisons)? {
                        ExitCode::SUCCESS
                    } else {
                        ExitCode::FAILURE
                    }
                } else {
                    write_evaluation(stdout().lock(), "NFA", &nfa, &words)?;
                    ExitCode::SUCCESS
                }
            }
        }
        Command::Random {
            output,
            states,
            symbols,
            outdegree,
        } => {
            if states == 0 {
                bail!("An automaton needs at least one state");
            }

            let nfa = random_nfa(&mut rand::rng(), states, symbols, outdegree);
            debug!("Generated automaton\n{nfa:?}");

            if let Some(path) = output {
                save_nfa(path, &nfa)?;
            } else {
                write_nfa(stdout(), &nfa)?;
            }

            ExitCode::SUCCESS
        }
    };

    if cli.time {
        timing.print();
    }

    Ok(code)
}

/// Writes the diagram to the output or stdout, or renders it when a format is given.
fn draw(
    automaton: &impl FiniteAutomaton,
    output: Option<&Path>,
    format: Option<Format>,
) -> Result<()> {
    match (format, output) {
        (Some(format), Some(path)) => render(automaton, format.into(), path)?,
        (None, Some(path)) => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_dot(&mut writer, automaton)?;
            writer.flush()?;
        }
        (_, None) => write_dot(stdout().lock(), automaton)?,
    }

    Ok(())
}
