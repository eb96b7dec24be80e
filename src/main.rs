use std::path::Path;
use std::process;
#[macro_use]
extern crate log;

use anyhow::Context;
use clap::{Arg, Command};

mod features;
use features::{FileStore, KeyValueStore, MemoryStore, OperationRegistry, RecordStore, Response};

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        error!("{e:#}");
        process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let matches = Command::new("transfer-ledger")
        .about("Records money-transfer events in a key-value ledger")
        .arg(
            Arg::new("script")
                .help("CSV file of invocations, one per line: function,arg1,arg2,...")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::new("store")
                .help("JSON file backing the ledger; in-memory when omitted")
                .long("store")
                .takes_value(true),
        )
        .get_matches();

    let script = matches
        .value_of("script")
        .context("script argument is required")?;

    match matches.value_of("store") {
        Some(path) => {
            let store = FileStore::open(path)
                .with_context(|| format!("Unable to open ledger file {path}"))?;
            execute(Path::new(script), RecordStore::new(store))
        }
        None => execute(Path::new(script), RecordStore::new(MemoryStore::new())),
    }
}

fn execute<S: KeyValueStore>(script: &Path, mut records: RecordStore<S>) -> anyhow::Result<()> {
    let registry = OperationRegistry::<S>::with_defaults()?;

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(b',')
        .trim(csv::Trim::All)
        .from_path(script)
        .with_context(|| format!("Unable to read script {}", script.display()))?;

    for result in rdr.records() {
        let row = result?;
        let mut fields = row.iter().map(str::to_owned);
        let function = match fields.next() {
            Some(f) if !f.is_empty() => f,
            _ => continue,
        };
        let args: Vec<String> = fields.collect();

        match registry.invoke(&mut records, &function, &args) {
            Ok(response) => print_response(&function, response),
            Err(e) => warn!("{function}: {e} ({:?})", e.kind()),
        }
    }

    Ok(())
}

fn print_response(function: &str, response: Response) {
    match response {
        Some(bytes) => println!("{function}: {}", String::from_utf8_lossy(&bytes)),
        None => println!("{function}: ok"),
    }
}
