/*
 * main.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! The structural command line interface: probe the input format, parse,
//! compile, and render XHTML. A thin shell over the library crates.

use anyhow::{Context, bail};
use clap::Parser;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use structural_probe::Probes;
use structural_xhtml::SameDocumentLinks;
use structural_xml::{ParserRequest, XmlProbe};

#[derive(Parser, Debug)]
#[command(name = "structural")]
#[command(about = "Compile structural documents to XHTML")]
struct Args {
    /// The input document.
    #[arg(short = 'i', long = "input")]
    input: PathBuf,

    /// The output file; standard output if omitted.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// The base directory; file references may not resolve above it.
    /// Defaults to the directory containing the input.
    #[arg(long = "base-directory")]
    base_directory: Option<PathBuf>,

    /// Dump the compiled tree as JSON instead of rendering XHTML.
    #[arg(long = "dump-ast")]
    dump_ast: bool,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = if args.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("structural: error: {:#}", error);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let base_directory = match &args.base_directory {
        Some(path) => path.clone(),
        None => args
            .input
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf(),
    };
    let uri = args.input.display().to_string();

    let mut probes = Probes::new();
    probes.register(Box::new(XmlProbe::new()));

    let input = args.input.clone();
    let streams = move || {
        File::open(&input).map(|file| Box::new(file) as Box<dyn Read>)
    };
    let format = probes
        .probe_uri(&base_directory, &uri, &streams)
        .with_context(|| format!("unable to probe {}", uri))?;

    let Some(format) = format else {
        bail!("{}: unrecognized document format", uri);
    };
    tracing::debug!(%format, "input format detected");

    let stream = File::open(&args.input).with_context(|| format!("unable to open {}", uri))?;
    let document = match structural_xml::parse(ParserRequest {
        base_directory,
        file: uri.clone(),
        stream,
    }) {
        Ok(document) => document,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let compiled = match structural_compiler::compile(&document) {
        Ok(compiled) => compiled,
        Err(errors) => {
            for error in &errors {
                eprintln!("{}", error);
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    let output = if args.dump_ast {
        serde_json::to_string_pretty(&compiled.document)
            .context("unable to serialize the compiled tree")?
    } else {
        let links = SameDocumentLinks::new(&compiled.global);
        structural_xhtml::render(&compiled, &links)
            .with_context(|| format!("unable to render {}", uri))?
    };

    match &args.output {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("unable to write {}", path.display()))?,
        None => println!("{}", output),
    }

    Ok(ExitCode::SUCCESS)
}
