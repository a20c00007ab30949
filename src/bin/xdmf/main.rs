//! XDMF CLI - Tool for inspecting XDMF triangle meshes.

use std::env;
use std::path::Path;
use std::time::Instant;

use serde_json::json;
use tracing_subscriber::EnvFilter;
use xdmf::prelude::*;

/// Verbosity level
const LOG_QUIET: u8 = 0;
const LOG_INFO: u8 = 1;
const LOG_DEBUG: u8 = 2;
const LOG_TRACE: u8 = 3;

fn init_logging(level: u8) {
    let default = match level {
        LOG_QUIET => "error",
        LOG_INFO => "xdmf=info",
        LOG_DEBUG => "xdmf=debug",
        _ => "xdmf=trace",
    };
    let filter = EnvFilter::try_from_env("XDMF_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args: Vec<String> = env::args().collect();

    // Parse global flags
    let mut level = LOG_INFO;
    let mut options = ImportOptions::default();
    let mut filtered_args: Vec<&str> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "-v" | "--verbose" => level = LOG_DEBUG,
            "-vv" | "--trace" => level = LOG_TRACE,
            "-q" | "--quiet" => level = LOG_QUIET,
            "--no-mmap" => options = options.with_mmap(false),
            "--parallel" | "-p" => options = options.with_parallel(true),
            _ => filtered_args.push(arg),
        }
    }
    init_logging(level);

    if filtered_args.is_empty() {
        print_help();
        return;
    }

    let importer = Importer::new(options);

    match filtered_args[0] {
        // Info command - grid summary
        "info" | "i" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: xdmf-cli info <file.xmf>");
                std::process::exit(1);
            }
            cmd_info(&importer, filtered_args[1]);
        }

        // Dump command - field statistics
        "dump" | "d" => {
            if filtered_args.len() < 2 {
                eprintln!("Error: missing file argument");
                eprintln!("Usage: xdmf-cli dump <file.xmf> [--json]");
                std::process::exit(1);
            }
            let json_mode = filtered_args.iter().any(|&s| s == "--json" || s == "-j");
            cmd_dump(&importer, filtered_args[1], json_mode);
        }

        "version" | "--version" | "-V" => print_version(),

        // Help
        "help" | "h" | "-h" | "--help" => print_help(),

        // Default: if file exists, show info; otherwise error
        _ => {
            if Path::new(filtered_args[0]).exists() {
                cmd_info(&importer, filtered_args[0]);
            } else {
                eprintln!("Unknown command: {}", filtered_args[0]);
                eprintln!();
                print_help();
                std::process::exit(1);
            }
        }
    }
}

fn print_help() {
    println!("xdmf-cli - XDMF triangle mesh toolkit");
    println!();
    println!("USAGE:");
    println!("    xdmf-cli [OPTIONS] <COMMAND> [ARGS]");
    println!();
    println!("COMMANDS:");
    println!("    i, info   <file>              Show grids, sizes, fields and bounds");
    println!("    d, dump   <file> [--json]     Show per-field statistics");
    println!("    version                       Show version and build date");
    println!("    h, help                       Show this help");
    println!();
    println!("OPTIONS:");
    println!("    -q, --quiet                   Only report errors");
    println!("    -v, --verbose                 Debug logging");
    println!("    -vv, --trace                  Trace logging");
    println!("    --no-mmap                     Read payloads instead of mapping them");
    println!("    -p, --parallel                Assemble grids in parallel");
    println!();
    println!("ENVIRONMENT:");
    println!("    XDMF_LOG                      Log filter, overrides -q/-v/-vv");
}

fn print_version() {
    println!(
        "xdmf-cli {} (built {} {})",
        env!("CARGO_PKG_VERSION"),
        env!("XDMF_BUILD_DATE"),
        env!("XDMF_BUILD_TIME")
    );
}

fn load(importer: &Importer, path: &str) -> Vec<MeshDescription> {
    let start = Instant::now();
    match importer.read(path) {
        Ok(meshes) => {
            tracing::info!(elapsed_s = start.elapsed().as_secs_f64(), "done importing");
            meshes
        }
        Err(e) => {
            eprintln!("Error importing {}: {}", path, e);
            std::process::exit(1);
        }
    }
}

fn cmd_info(importer: &Importer, path: &str) {
    let meshes = load(importer, path);

    println!("File: {}", path);
    println!("Grids: {}", meshes.len());
    for mesh in &meshes {
        let bounds = mesh.bounds();
        println!();
        println!("  {} (time {})", mesh.name, mesh.time);
        println!("    vertices:  {}", mesh.num_vertices());
        println!("    triangles: {}", mesh.num_triangles());
        if !bounds.is_empty() {
            println!("    bounds:    {:?} .. {:?}", bounds.min.to_array(), bounds.max.to_array());
        }
        let names: Vec<&str> = mesh.field_names().collect();
        if names.is_empty() {
            println!("    fields:    (none)");
        } else {
            println!("    fields:    {}", names.join(", "));
        }
    }
}

fn cmd_dump(importer: &Importer, path: &str, json_mode: bool) {
    let meshes = load(importer, path);

    if json_mode {
        let grids: Vec<_> = meshes
            .iter()
            .map(|mesh| {
                let bounds = mesh.bounds();
                let bounds = if bounds.is_empty() {
                    serde_json::Value::Null
                } else {
                    json!({ "min": bounds.min.to_array(), "max": bounds.max.to_array() })
                };
                let fields: serde_json::Map<String, serde_json::Value> = mesh
                    .field_names()
                    .map(|name| {
                        let range = mesh.field_range(name);
                        (
                            name.to_string(),
                            json!({
                                "len": mesh.field(name).map_or(0, |v| v.len()),
                                "min": range.map(|r| r.0),
                                "max": range.map(|r| r.1),
                            }),
                        )
                    })
                    .collect();
                json!({
                    "name": mesh.name,
                    "time": mesh.time,
                    "vertices": mesh.num_vertices(),
                    "triangles": mesh.num_triangles(),
                    "bounds": bounds,
                    "fields": fields,
                })
            })
            .collect();
        let doc = json!({ "file": path, "grids": grids });
        match serde_json::to_string_pretty(&doc) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error serializing dump: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for mesh in &meshes {
        println!("{} @ t={}", mesh.name, mesh.time);
        for name in mesh.field_names() {
            let len = mesh.field(name).map_or(0, |v| v.len());
            match mesh.field_range(name) {
                Some((lo, hi)) => println!("  {:<24} len={:<8} min={:<14} max={}", name, len, lo, hi),
                None => println!("  {:<24} len={:<8} (no finite values)", name, len),
            }
        }
    }
}
