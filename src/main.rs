// src/main.rs
// Usage:
//   lexgen                               # demo grammar and its inline source
//   lexgen grammar.json                  # grammar's inline "source"
//   lexgen grammar.json input.txt        # or `-` for stdin
//
// LEXGEN_TRACE=json prints construction/scan events as `TRACE: {...}` lines,
// LEXGEN_TRACE=log routes them through the logger on stderr.

use std::{env, io, process};

use anyhow::{Context, Result, bail};
use lexgen::{
    Scanner, Source,
    dev::sample_grammar,
    grammar::Grammar,
    trace::{JsonTrace, LogTrace, NoTrace, Trace},
};

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn trace_sink(mode: Option<&str>) -> Box<dyn Trace> {
    match mode {
        Some("json") => Box::new(JsonTrace::new(io::stdout())),
        Some("log") => Box::new(LogTrace),
        _ => Box::new(NoTrace),
    }
}

fn run() -> Result<()> {
    let mode = env::var("LEXGEN_TRACE").ok();
    let level = match mode.as_deref() {
        Some("log") => log::LevelFilter::Trace,
        _ => log::LevelFilter::Warn,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }

    let mut args = env::args().skip(1);
    let grammar = match args.next() {
        Some(path) => Grammar::load(&path)?,
        None => sample_grammar(),
    };
    let source = match args.next() {
        Some(path) => {
            Source::load(&path).with_context(|| format!("failed to read source {path}"))?
        }
        None => match &grammar.source {
            Some(text) => Source::from(text.as_str()),
            None => bail!("no source given and the grammar has no inline \"source\""),
        },
    };

    let lexicon = grammar.build_with(trace_sink(mode.as_deref()))?;
    let mut scanner = Scanner::with(&lexicon, &source);
    scanner.set_trace(trace_sink(mode.as_deref()));

    println!("TOKENS:");
    for token in scanner.tokens() {
        let token = token?;
        println!("{}  {}  {:?}", token.location(), token.name(), token.text());
    }
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
