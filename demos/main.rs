//! `xxsum`: a minimal digest-printing driver proving the public API is
//! usable end-to-end. Owns no algorithmic logic of its own.

use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use xxhash_core::{hash3_128, hash3_64, hash64, hash32};

#[derive(Copy, Clone, Eq, PartialEq, ValueEnum)]
enum Algorithm {
    H32,
    H64,
    H3,
    H3_128,
}

#[derive(Parser)]
#[command(name = "xxsum", about = "Print xxHash digests of files")]
struct Cli {
    /// Which hash to compute.
    #[arg(short, long, value_enum, default_value = "h3")]
    algorithm: Algorithm,

    /// Seed (decimal or 0x-prefixed hex).
    #[arg(short, long, default_value = "0")]
    seed: String,

    /// Files to hash. Reads stdin if none are given.
    files: Vec<PathBuf>,
}

fn parse_seed(raw: &str) -> u64 {
    if let Some(hex) = raw.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).expect("seed must be a valid hex/decimal number")
    } else {
        raw.parse().expect("seed must be a valid hex/decimal number")
    }
}

fn digest_line(algorithm: Algorithm, seed: u64, data: &[u8], label: &str) -> String {
    match algorithm {
        Algorithm::H32 => format!("{:08x}  {label}", hash32(data, seed as u32)),
        Algorithm::H64 => format!("{:016x}  {label}", hash64(data, seed)),
        Algorithm::H3 => format!(
            "{:016x}  {label}",
            xxhash_core::hash3_64_with_seed(data, seed)
        ),
        Algorithm::H3_128 => {
            let d = xxhash_core::hash3_128_with_seed(data, seed);
            format!("{:016x}{:016x}  {label}", d.high64, d.low64)
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let seed = parse_seed(&cli.seed);

    if cli.files.is_empty() {
        use std::io::Read;
        let mut data = Vec::new();
        std::io::stdin()
            .read_to_end(&mut data)
            .expect("failed to read stdin");
        println!("{}", digest_line(cli.algorithm, seed, &data, "-"));
        return;
    }

    for path in &cli.files {
        let data = fs::read(path).unwrap_or_else(|err| {
            eprintln!("xxsum: {}: {err}", path.display());
            std::process::exit(1);
        });
        println!(
            "{}",
            digest_line(cli.algorithm, seed, &data, &path.display().to_string())
        );
    }

    // Exercise the 128-bit one-shot entry point too, so this binary touches
    // every public hashing function at least once.
    let _ = hash3_128(b"");
    let _ = hash3_64(b"");
}
