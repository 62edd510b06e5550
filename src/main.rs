//! Thin CLI front end exposing the five public operations for ad hoc use
//! and manual QA. Not part of the library's public contract.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};

use difflcs::{
    diff_files, diff_lists, diff_strings, diff_strings_chunks, files_equal, AlignPin,
    DiffResult, FileEqualOptions, Ignore, Options, Range, Regsub, ResultStyle,
};

#[derive(Parser)]
#[command(name = "difflcs", version, about = "Hunt-McIlroy LCS line/character diffing")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fast byte/character identity check between two files.
    FilesEqual {
        file1: PathBuf,
        file2: PathBuf,
        /// Compare raw bytes rather than decoded UTF-8 text.
        #[arg(long)]
        binary: bool,
        #[arg(long)]
        ignore_case: bool,
        /// Treat `$Keyword$`/`$Keyword:...$` runs as equal regardless of body.
        #[arg(long)]
        ignore_key: bool,
        /// Only "utf-8" is supported; anything else is a bad-argument error.
        #[arg(long, default_value = "utf-8")]
        encoding: String,
    },
    /// Line-granularity diff between two files.
    DiffFiles {
        file1: PathBuf,
        file2: PathBuf,
        #[command(flatten)]
        shared: SharedOpts,
    },
    /// Element-granularity diff between the lines of two files, treated as
    /// plain lists (0-based output, no `--range`).
    DiffLists {
        file1: PathBuf,
        file2: PathBuf,
        #[command(flatten)]
        shared: SharedOpts,
    },
    /// Character- (or word-) granularity diff between two strings.
    DiffStrings {
        str1: String,
        str2: String,
        /// Align change boundaries to whitespace word boundaries.
        #[arg(long)]
        words: bool,
        #[command(flatten)]
        shared: SharedOpts,
    },
    /// Same as `diff-strings`, rendered as an alternating equal/diff chunk
    /// list instead of index tuples.
    DiffStringsChunks {
        str1: String,
        str2: String,
        #[arg(long)]
        words: bool,
        #[command(flatten)]
        shared: SharedOpts,
    },
}

#[derive(clap::Args)]
struct SharedOpts {
    #[arg(long)]
    ignore_case: bool,
    #[arg(long)]
    ignore_all_space: bool,
    #[arg(long)]
    ignore_space_change: bool,
    #[arg(long)]
    ignore_numbers: bool,
    /// Forbid empty-hash elements from the initial LCS pass.
    #[arg(long)]
    noempty: bool,
    /// Maximum equivalence-class size allowed before all its members are
    /// forbidden from the initial pass.
    #[arg(long, default_value_t = 100)]
    pivot: usize,
    /// `from:to` (1-based, inclusive; `to` omitted or 0 means "to end").
    /// Only honoured by `diff-files`.
    #[arg(long)]
    range1: Option<String>,
    #[arg(long)]
    range2: Option<String>,
    /// Alignment pin `i:j` (`L[i]` must align with `R[j]`); repeatable.
    #[arg(long = "align")]
    aligns: Vec<String>,
    /// `pattern:replacement` applied to the left side before hashing;
    /// repeatable.
    #[arg(long = "regsub-left")]
    regsub_left: Vec<String>,
    #[arg(long = "regsub-right")]
    regsub_right: Vec<String>,
    /// "diff" (change-block chunks) or "match" (parallel position lists).
    #[arg(long, default_value = "diff")]
    result_style: String,
}

impl SharedOpts {
    fn into_options(self) -> Result<Options> {
        let mut ignore = Ignore::NONE;
        if self.ignore_case {
            ignore |= Ignore::CASE;
        }
        if self.ignore_all_space {
            ignore |= Ignore::ALL_SPACE;
        }
        if self.ignore_space_change {
            ignore |= Ignore::SPACE_CHANGE;
        }
        if self.ignore_numbers {
            ignore |= Ignore::NUMBERS;
        }

        let result_style = match self.result_style.as_str() {
            "diff" => ResultStyle::Diff,
            "match" => ResultStyle::Match,
            other => return Err(anyhow!("bad argument: unknown --result-style '{other}'")),
        };

        let mut opts = Options::new()
            .with_ignore(ignore)
            .with_noempty(self.noempty)
            .with_pivot(self.pivot)
            .with_range1(parse_range(self.range1.as_deref())?)
            .with_range2(parse_range(self.range2.as_deref())?)
            .with_align(parse_aligns(&self.aligns)?)
            .with_regsub_left(parse_regsubs(&self.regsub_left)?)
            .with_regsub_right(parse_regsubs(&self.regsub_right)?)
            .with_result_style(result_style);
        opts.normalise().context("bad argument")?;
        Ok(opts)
    }
}

fn parse_range(spec: Option<&str>) -> Result<Range> {
    let Some(spec) = spec else {
        return Ok(Range::ALL);
    };
    let (from, to) = match spec.split_once(':') {
        Some((from, to)) => (from, to),
        None => (spec, "0"),
    };
    Ok(Range {
        from: from.parse().with_context(|| format!("malformed range '{spec}'"))?,
        to: to.parse().with_context(|| format!("malformed range '{spec}'"))?,
    })
}

fn parse_aligns(specs: &[String]) -> Result<Vec<AlignPin>> {
    specs
        .iter()
        .map(|spec| {
            let (i, j) = spec
                .split_once(':')
                .ok_or_else(|| anyhow!("malformed align pin '{spec}', expected 'i:j'"))?;
            Ok(AlignPin {
                i: i.parse().with_context(|| format!("malformed align pin '{spec}'"))?,
                j: j.parse().with_context(|| format!("malformed align pin '{spec}'"))?,
            })
        })
        .collect()
}

fn parse_regsubs(specs: &[String]) -> Result<Vec<Regsub>> {
    specs
        .iter()
        .map(|spec| {
            let (pattern, replacement) = spec
                .split_once(':')
                .ok_or_else(|| anyhow!("malformed regsub '{spec}', expected 'pattern:replacement'"))?;
            Ok(Regsub {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
            })
        })
        .collect()
}

fn print_result(result: &DiffResult) {
    match result {
        DiffResult::Chunks(chunks) => {
            for c in chunks {
                println!("{} {} {} {}", c.start1, c.n1, c.start2, c.n2);
            }
        }
        DiffResult::Matches { left, right } => {
            for (l, r) in left.iter().zip(right.iter()) {
                println!("{l} {r}");
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::FilesEqual { file1, file2, binary, ignore_case, ignore_key, encoding } => {
            if encoding != "utf-8" {
                return Err(anyhow!("bad argument: unsupported --encoding '{encoding}' (only utf-8 is supported)"));
            }
            let opts = FileEqualOptions { binary, no_case: ignore_case, ignore_key };
            let equal = files_equal(&file1, &file2, &opts)?;
            println!("{equal}");
            if !equal {
                return Err(anyhow!(""));
            }
            Ok(())
        }
        Command::DiffFiles { file1, file2, shared } => {
            let opts = shared.into_options()?;
            print_result(&diff_files(&file1, &file2, &opts)?);
            Ok(())
        }
        Command::DiffLists { file1, file2, shared } => {
            let opts = shared.into_options()?;
            let a = difflcs::ops::files::read_lines(&file1)?;
            let b = difflcs::ops::files::read_lines(&file2)?;
            print_result(&diff_lists(&a, &b, &opts)?);
            Ok(())
        }
        Command::DiffStrings { str1, str2, words, shared } => {
            let mut opts = shared.into_options()?;
            opts.wordparse = words;
            print_result(&diff_strings(&str1, &str2, &opts)?);
            Ok(())
        }
        Command::DiffStringsChunks { str1, str2, words, shared } => {
            let mut opts = shared.into_options()?;
            opts.wordparse = words;
            for chunk in diff_strings_chunks(&str1, &str2, &opts)? {
                println!("= {:?} {:?}", chunk.equal_a, chunk.equal_b);
                println!("! {:?} {:?}", chunk.diff_a, chunk.diff_b);
            }
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if !e.to_string().is_empty() {
                eprintln!("difflcs: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}
