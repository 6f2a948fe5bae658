use clap::Parser;
use crossfill_core::backtracking_search::{solve_with_budget, SolveFailure};
use crossfill_core::grid_config::{render_grid, Grid, GridConfig};
use crossfill_core::word_list::{WordList, WordListSourceConfig};
use std::fmt::{Debug, Formatter};
use std::fs;

const WORDLIST_RAW: &str = include_str!("../resources/wordlist.txt");

/// crossfill_core: Command-line crossword solving tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a grid template file using # for blocks and . for empty squares
    grid_path: String,

    /// Path to a wordlist file with one word per line [default: (embedded word list)]
    #[arg(long)]
    wordlist: Option<String>,

    /// Maximum number of search states to visit before giving up [default: none]
    #[arg(long)]
    node_budget: Option<usize>,

    /// Print solve statistics to stderr after solving
    #[arg(long)]
    stats: bool,
}

struct Error(String);

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0) // Print error unquoted
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let raw_grid_content = fs::read_to_string(&args.grid_path)
        .map_err(|_| Error(format!("Couldn't read file '{}'", args.grid_path)))?;

    let grid = Grid::parse(&raw_grid_content).map_err(|error| Error(format!("{error}")))?;
    let max_side = grid.width.max(grid.height);

    let word_list = WordList::new(
        &[match args.wordlist {
            Some(wordlist_path) => WordListSourceConfig::File {
                path: wordlist_path.into(),
            },
            None => WordListSourceConfig::FileContents {
                contents: WORDLIST_RAW,
            },
        }],
        Some(max_side),
    )
    .map_err(|error| Error(format!("{error}")))?;

    if word_list.word_id_by_string.is_empty() {
        return Err(Error("Word list is empty".into()));
    }

    let config = GridConfig::new(grid, word_list);

    let result = solve_with_budget(&config, args.node_budget).map_err(|failure| match failure {
        SolveFailure::Unsatisfiable => Error("Unsolvable grid".into()),
        SolveFailure::ExceededNodeBudget(states) => {
            Error(format!("Gave up after visiting {states} search states"))
        }
    })?;

    println!("{}", render_grid(&config, &result.choices));

    if args.stats {
        eprintln!("{:?}", result.statistics);
    }

    Ok(())
}
