//! Binary to generate Kotlin, Java, or TypeScript classes from JSON Schema.
//!
//! Usage: `jsonclassgen schemas/ --output generated/ --package com.example --target kotlin`
//!
//! Takes a schema file or a directory of `.json` schema files; each file's
//! directory relative to the input root becomes part of the generated
//! package. Warnings stream to stderr via `RUST_LOG`-style filtering.

use clap::{Parser, ValueEnum};
use std::io;
use std::path::{Path, PathBuf};
use std::process;
use walkdir::WalkDir;

use json_class_gen::{
    DirectoryOutput, DocumentSet, Generator, GeneratorSettings, GenerationSummary, SchemaDocument,
    TargetLanguage,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TargetArg {
    Kotlin,
    Java,
    Typescript,
}

impl From<TargetArg> for TargetLanguage {
    fn from(target: TargetArg) -> Self {
        match target {
            TargetArg::Kotlin => Self::Kotlin,
            TargetArg::Java => Self::Java,
            TargetArg::Typescript => Self::TypeScript,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "jsonclassgen", about = "Generate classes from JSON Schema", version)]
struct Args {
    /// Schema file, or directory searched recursively for .json files.
    input: PathBuf,

    /// Output directory for generated sources.
    #[arg(short, long)]
    output: PathBuf,

    /// Base package applied to every generated type.
    #[arg(short, long, default_value = "")]
    package: String,

    /// Target language.
    #[arg(short, long, value_enum, default_value_t = TargetArg::Kotlin)]
    target: TargetArg,

    /// Generate fluent builders (java target only).
    #[arg(long)]
    builders: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args: Args = Args::parse();
    match run(&args) {
        Ok(summary) => {
            eprintln!("Generated {} file(s) into {}", summary.files, args.output.display());
            if !summary.warnings.is_empty() {
                eprintln!("{} warning(s); re-run with RUST_LOG=warn for details", summary.warnings.len());
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run(args: &Args) -> Result<GenerationSummary, Box<dyn std::error::Error>> {
    let mut documents = DocumentSet::new();
    for path in schema_files(&args.input)? {
        let text: String = std::fs::read_to_string(&path)?;
        let hint: Vec<String> = package_hint(&args.input, &path);
        let uri: String = path.to_string_lossy().replace('\\', "/");
        documents.add(SchemaDocument::parse_json(&uri, &hint, &text)?)?;
    }

    let settings = GeneratorSettings {
        target: args.target.into(),
        base_package: args.package.clone(),
        java_builders: args.builders,
    };
    let generator = Generator::new(settings);
    let mut output = DirectoryOutput::new(&args.output);
    Ok(generator.generate(&documents, &mut output)?)
}

/// All schema files under the input, in deterministic (sorted) order.
fn schema_files(input: &Path) -> Result<Vec<PathBuf>, walkdir::Error> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|extension| extension == "json")
        {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Package segments from the file's directory relative to the input root.
fn package_hint(root: &Path, file: &Path) -> Vec<String> {
    file.parent()
        .and_then(|parent| parent.strip_prefix(root).ok())
        .map(|relative| {
            relative
                .components()
                .filter_map(|component| component.as_os_str().to_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
