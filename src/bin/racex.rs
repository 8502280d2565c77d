//! `racex` binary (SPEC_FULL.md §4.L): hand-rolled flag parsing over
//! `std::env::args()`, matching the teacher's own lack of a `clap`-style
//! dependency. This binary's self-check mode drives a tiny built-in
//! `InMemoryProgram` fixture — a real deployment would wire a compiler
//! front-end behind `racex::ssa::Program` instead.

use racex::analysis::race::{JsonReporter, RaceDetector, Reporter, TextReporter};
use racex::config::{DetectorConfig, ReportFormat};
use racex::ssa::{BasicBlockData, BlockId, FunctionData, FunctionId, InMemoryProgram, Instruction, InstructionKind, Pos, Value};

struct Args {
    entry: Option<String>,
    max_block_visits: Option<usize>,
    format: ReportFormat,
    verbosity: u8,
}

fn parse_args() -> Args {
    let mut entry = None;
    let mut max_block_visits = None;
    let mut format = ReportFormat::Text;
    let mut verbosity = 0u8;

    let mut argv = std::env::args().skip(1);
    while let Some(arg) = argv.next() {
        match arg.as_str() {
            "--entry" => entry = argv.next(),
            "--max-block-visits" => {
                max_block_visits = argv.next().and_then(|v| v.parse().ok());
            }
            "--format" => match argv.next().as_deref() {
                Some("json") => format = ReportFormat::Json,
                Some("text") => format = ReportFormat::Text,
                other => eprintln!("racex: ignoring unrecognised --format value {other:?}"),
            },
            "-v" => verbosity = verbosity.max(1),
            "-vv" => verbosity = verbosity.max(2),
            other => eprintln!("racex: ignoring unrecognised argument {other:?}"),
        }
    }

    Args {
        entry,
        max_block_visits,
        format,
        verbosity,
    }
}

/// A single racing function: two unsynchronized writes to the same value
/// from the entry task and a spawned one. Stands in for a real loaded
/// package until a compiler front-end is wired behind `Program`.
fn self_check_program() -> InMemoryProgram {
    let mut program = InMemoryProgram::new();

    let worker = FunctionId(1);
    let mut worker_blocks = std::collections::HashMap::new();
    worker_blocks.insert(
        BlockId(0),
        BasicBlockData {
            instructions: vec![Instruction::new(Pos(2), InstructionKind::Store { value: Value(1) })],
            successors: vec![],
        },
    );
    program.add_function(
        worker,
        FunctionData {
            name: "worker".to_string(),
            entry: BlockId(0),
            blocks: worker_blocks,
        },
    );

    let main = FunctionId(0);
    let mut main_blocks = std::collections::HashMap::new();
    main_blocks.insert(
        BlockId(0),
        BasicBlockData {
            instructions: vec![
                Instruction::new(Pos(1), InstructionKind::Spawn { callee: worker, args: vec![] }),
                Instruction::new(Pos(3), InstructionKind::Store { value: Value(1) }),
            ],
            successors: vec![],
        },
    );
    program.add_function(
        main,
        FunctionData {
            name: "main".to_string(),
            entry: BlockId(0),
            blocks: main_blocks,
        },
    );
    program.set_entry(main);
    program
}

fn main() {
    let args = parse_args();
    racex::logger::init(args.verbosity);

    let mut config = DetectorConfig {
        format: args.format,
        entry: args.entry,
        ..DetectorConfig::default()
    };
    if let Some(max_block_visits) = args.max_block_visits {
        config.max_block_visits = max_block_visits;
    }

    let program = self_check_program();
    let detector = RaceDetector::new(&program, config.clone());
    match detector.run() {
        Ok(report) => {
            let rendered = match config.format {
                ReportFormat::Text => TextReporter.render(&report),
                ReportFormat::Json => JsonReporter.render(&report),
            };
            println!("{rendered}");
            if !report.is_clean() {
                std::process::exit(1);
            }
        }
        Err(err) => {
            eprintln!("racex: {err}");
            std::process::exit(2);
        }
    }
}
