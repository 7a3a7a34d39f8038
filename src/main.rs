use std::{
    error::Error,
    io::{self, BufRead, Write},
    process::ExitCode,
};

use dualfont::{DualFont, FormatterConfig, Formatted};

const USAGE: &str = "\
usage: dualfont [--config FILE] [LABEL...]

Formats each LABEL (or each line of stdin when no LABEL is given) and prints
one line per label:

  markup\\t<rich-text value>
  font\\t<font>\\t<label>
  unchanged\\t<label>
  error\\t<message>

Set RUST_LOG=debug for dispatch details.";

struct Args {
    config: Option<String>,
    labels: Vec<String>,
}

fn parse_args() -> Result<Option<Args>, String> {
    let mut config = None;
    let mut labels = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "-c" | "--config" => {
                config = Some(args.next().ok_or("--config needs a file path")?);
            }
            "--" => {
                labels.extend(args.by_ref());
            }
            _ => labels.push(arg),
        }
    }
    Ok(Some(Args { config, labels }))
}

fn print_result(out: &mut impl Write, result: &Result<Formatted<'_>, dualfont::FormatError>) -> io::Result<()> {
    match result {
        Ok(Formatted::Markup(markup)) => writeln!(out, "markup\t{markup}"),
        Ok(Formatted::WholeFont { value, font, .. }) => writeln!(out, "font\t{font}\t{value}"),
        Ok(Formatted::Unchanged(value)) => writeln!(out, "unchanged\t{value}"),
        Err(e) => writeln!(out, "error\t{e}"),
    }
}

fn run(args: Args) -> Result<bool, Box<dyn Error + Send + Sync>> {
    let config = match &args.config {
        Some(path) => FormatterConfig::load(path)?,
        None => FormatterConfig::default(),
    };
    let formatter = DualFont::from_config(config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut all_ok = true;

    let mut handle = |label: &str| -> io::Result<()> {
        let result = formatter.apply(label);
        if let Err(e) = &result {
            tracing::error!(error = %e, "label left unformatted");
            all_ok = false;
        }
        print_result(&mut out, &result)
    };

    if args.labels.is_empty() {
        for line in io::stdin().lock().lines() {
            handle(&line?)?;
        }
    } else {
        for label in &args.labels {
            handle(label)?;
        }
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(msg) => {
            eprintln!("{msg}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "dualfont failed");
            eprintln!("dualfont: {e}");
            ExitCode::from(2)
        }
    }
}
