//! `cargo-racex`: the `cargo racex` subcommand shim (SPEC_FULL.md §4.L).
//! Cargo invokes subcommand binaries as `cargo-racex racex <args...>`,
//! injecting the subcommand name as `argv[1]` — the standard convention
//! every `cargo-*` plugin strips before doing its own parsing. Discovers
//! the workspace via `cargo_metadata` and reports which package would be
//! analysed; the actual analysis still runs in self-check mode until a
//! real front-end is wired behind `racex::ssa::Program`.

fn main() {
    let mut args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("racex") {
        args.remove(0);
    }

    let verbosity = args.iter().filter(|a| a.as_str() == "-v").count() as u8;
    racex::logger::init(verbosity);

    let metadata = cargo_metadata::MetadataCommand::new().exec();
    match metadata {
        Ok(metadata) => {
            let root_name = metadata
                .root_package()
                .map(|pkg| pkg.name.clone())
                .unwrap_or_else(|| "<virtual workspace>".to_string());
            racex::racex_info!("analysing workspace root package {}", root_name);
        }
        Err(err) => {
            eprintln!("cargo-racex: failed to read workspace metadata: {err}");
            std::process::exit(2);
        }
    }

    let status = std::process::Command::new(std::env::current_exe().unwrap().with_file_name("racex"))
        .args(&args)
        .status();

    match status {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(err) => {
            eprintln!("cargo-racex: failed to exec racex: {err}");
            std::process::exit(2);
        }
    }
}
