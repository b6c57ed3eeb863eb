//! Latte CLI - Command-line tool for Wii U BFRES resource inspection.
//!
//! This is the main entry point for the Latte command-line application.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;

use latte::prelude::*;

/// Latte - Wii U BFRES resource inspection and extraction tool
#[derive(Parser)]
#[command(name = "latte")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of a BFRES file
    Info {
        /// Path to the BFRES file (.bfres or Yaz0-compressed .szs)
        #[arg(short, long, env = "INPUT_BFRES")]
        input: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the textures of a BFRES file
    Textures {
        /// Path to the BFRES file
        #[arg(short, long, env = "INPUT_BFRES")]
        input: PathBuf,

        /// Show detailed information
        #[arg(short, long)]
        detailed: bool,
    },

    /// Extract textures as standalone GTX files
    ExtractTextures {
        /// Path to the BFRES file
        #[arg(short, long, env = "INPUT_BFRES")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,

        /// Filter pattern (glob-style) on texture names
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Extract the embedded files of a BFRES container
    ExtractEmbedded {
        /// Path to the BFRES file
        #[arg(short, long, env = "INPUT_BFRES")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, env = "OUTPUT_FOLDER")]
        output: PathBuf,
    },

    /// Decompress a Yaz0 (.szs) file
    Decompress {
        /// Input Yaz0 file
        #[arg(short, long)]
        input: PathBuf,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input, json } => {
            cmd_info(&input, json)?;
        }
        Commands::Textures { input, detailed } => {
            cmd_textures(&input, detailed)?;
        }
        Commands::ExtractTextures { input, output, filter } => {
            cmd_extract_textures(&input, &output, filter.as_deref())?;
        }
        Commands::ExtractEmbedded { input, output } => {
            cmd_extract_embedded(&input, &output)?;
        }
        Commands::Decompress { input, output } => {
            cmd_decompress(&input, &output)?;
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct FileSummary<'a> {
    name: &'a str,
    version: String,
    byte_order: &'static str,
    models: Vec<ModelSummary<'a>>,
    textures: Vec<TextureSummary<'a>>,
    embedded_files: Vec<EmbeddedSummary<'a>>,
}

#[derive(Serialize)]
struct ModelSummary<'a> {
    name: &'a str,
    vertex_buffers: usize,
    shapes: Vec<ShapeSummary<'a>>,
    materials: Vec<&'a str>,
}

#[derive(Serialize)]
struct ShapeSummary<'a> {
    name: &'a str,
    material: Option<&'a str>,
    lods: usize,
    indices: usize,
}

#[derive(Serialize)]
struct TextureSummary<'a> {
    name: &'a str,
    width: u32,
    height: u32,
    mip_count: u32,
    format: String,
    payload_bytes: usize,
}

#[derive(Serialize)]
struct EmbeddedSummary<'a> {
    name: &'a str,
    size: usize,
}

fn summarize(file: &BfresFile) -> FileSummary<'_> {
    let version = file
        .version()
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(".");

    let models = file
        .models()
        .iter()
        .map(|entry| {
            let model = &entry.value;
            ModelSummary {
                name: &entry.name,
                vertex_buffers: model.vertex_buffers().len(),
                shapes: model
                    .shapes()
                    .iter()
                    .map(|shape| ShapeSummary {
                        name: &shape.name,
                        material: model.material_for(&shape.value).map(Material::name),
                        lods: shape.value.lods().len(),
                        indices: shape
                            .value
                            .highest_detail()
                            .map_or(0, |lod| lod.indices().len()),
                    })
                    .collect(),
                materials: model.materials().names().collect(),
            }
        })
        .collect();

    let textures = file
        .textures()
        .iter()
        .map(|entry| TextureSummary {
            name: &entry.name,
            width: entry.value.width(),
            height: entry.value.height(),
            mip_count: entry.value.mip_count(),
            format: format!("{:?}", entry.value.pixel_format()),
            payload_bytes: entry.value.data().len() + entry.value.mipmap_data().len(),
        })
        .collect();

    let embedded_files = file
        .embedded_files()
        .iter()
        .map(|entry| EmbeddedSummary {
            name: &entry.name,
            size: entry.value.len(),
        })
        .collect();

    FileSummary {
        name: file.name(),
        version,
        byte_order: match file.endian() {
            Endian::Big => "big",
            Endian::Little => "little",
        },
        models,
        textures,
        embedded_files,
    }
}

fn cmd_info(input: &PathBuf, json: bool) -> Result<()> {
    let file = BfresFile::open(input).context("Failed to parse BFRES file")?;
    let summary = summarize(&file);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} (version {}, {}-endian)", summary.name, summary.version, summary.byte_order);
    println!(
        "{} models, {} textures, {} embedded files",
        summary.models.len(),
        summary.textures.len(),
        summary.embedded_files.len()
    );

    for model in &summary.models {
        println!("\nModel {} ({} vertex buffers)", model.name, model.vertex_buffers);
        for shape in &model.shapes {
            println!(
                "  {} -> {} ({} LODs, {} indices)",
                shape.name,
                shape.material.unwrap_or("?"),
                shape.lods,
                shape.indices
            );
        }
    }

    if !summary.textures.is_empty() {
        println!();
        for texture in &summary.textures {
            println!(
                "Texture {} {}x{} {} ({} mips, {} bytes)",
                texture.name,
                texture.width,
                texture.height,
                texture.format,
                texture.mip_count,
                texture.payload_bytes
            );
        }
    }

    for embedded in &summary.embedded_files {
        println!("Embedded {} ({} bytes)", embedded.name, embedded.size);
    }

    Ok(())
}

fn cmd_textures(input: &PathBuf, detailed: bool) -> Result<()> {
    let file = BfresFile::open(input).context("Failed to parse BFRES file")?;

    for entry in file.textures() {
        if detailed {
            println!(
                "{:>5}x{:<5} {:>2} mips {:<20} {}",
                entry.value.width(),
                entry.value.height(),
                entry.value.mip_count(),
                format!("{:?}", entry.value.pixel_format()),
                entry.name
            );
        } else {
            println!("{}", entry.name);
        }
    }

    println!("\nTotal: {} textures", file.textures().len());

    Ok(())
}

fn cmd_extract_textures(input: &PathBuf, output: &PathBuf, filter: Option<&str>) -> Result<()> {
    println!("Opening BFRES file: {}", input.display());

    let start = Instant::now();
    let file = BfresFile::open(input).context("Failed to parse BFRES file")?;

    println!("Parsed {} textures in {:?}", file.textures().len(), start.elapsed());

    let entries: Vec<_> = file
        .textures()
        .iter()
        .filter(|e| filter.map_or(true, |pattern| glob_match(pattern, &e.name)))
        .collect();

    println!("Extracting {} textures...", entries.len());

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    fs::create_dir_all(output)?;

    let start = Instant::now();
    entries.par_iter().try_for_each(|entry| -> Result<()> {
        let gtx = entry
            .value
            .to_gtx()
            .with_context(|| format!("Failed to encode texture {}", entry.name))?;
        fs::write(output.join(format!("{}.gtx", entry.name)), gtx)?;
        pb.inc(1);
        Ok(())
    })?;

    pb.finish_with_message("Done");
    println!("Extraction completed in {:?}", start.elapsed());

    Ok(())
}

fn cmd_extract_embedded(input: &PathBuf, output: &PathBuf) -> Result<()> {
    let file = BfresFile::open(input).context("Failed to parse BFRES file")?;

    if file.embedded_files().is_empty() {
        println!("No embedded files");
        return Ok(());
    }

    fs::create_dir_all(output)?;

    for entry in file.embedded_files() {
        let path = output.join(entry.name.as_ref());
        fs::write(&path, entry.value.data())?;
        println!("{} ({} bytes)", path.display(), entry.value.len());
    }

    Ok(())
}

fn cmd_decompress(input: &PathBuf, output: &PathBuf) -> Result<()> {
    println!("Decompressing: {} -> {}", input.display(), output.display());

    let data = fs::read(input).context("Failed to read input file")?;

    if !is_yaz0(&data) {
        anyhow::bail!("Input file is not a Yaz0 stream");
    }

    let raw = decompress(&data).context("Failed to decompress Yaz0 stream")?;
    fs::write(output, &raw).context("Failed to write output file")?;

    println!("{} -> {} bytes", data.len(), raw.len());

    Ok(())
}

/// Case-insensitive name filter: `*` matches any run of characters, and a
/// pattern without `*` matches anywhere in the name.
fn glob_match(pattern: &str, name: &str) -> bool {
    let pattern = pattern.to_lowercase();
    let name = name.to_lowercase();

    if !pattern.contains('*') {
        return name.contains(&pattern);
    }

    let mut remainder = name.as_str();
    let mut anchored = !pattern.starts_with('*');
    let mut segments = pattern.split('*').filter(|s| !s.is_empty()).peekable();

    while let Some(segment) = segments.next() {
        let Some(found) = remainder.find(segment) else {
            return false;
        };
        if anchored && found != 0 {
            return false;
        }
        remainder = &remainder[found + segment.len()..];
        // Without a trailing `*` the last segment must reach the end.
        if segments.peek().is_none() && !pattern.ends_with('*') && !remainder.is_empty() {
            return false;
        }
        anchored = false;
    }

    true
}
