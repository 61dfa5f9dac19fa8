use std::path::PathBuf;

use anyhow::Context as _;
use loopjunk::batch::{Transform, run_batch};
use loopjunk::obfuscate::ObfuscationConfig;
use rand::{SeedableRng as _, rngs::StdRng};

const USAGE: &str = "usage: batch <src-dir> <dest-dir>";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let src = PathBuf::from(args.next().context(USAGE)?);
    let dest = PathBuf::from(args.next().context(USAGE)?);

    let mut rng = StdRng::seed_from_u64(0);
    let cfg = ObfuscationConfig::default();
    let summary = run_batch(&src, &dest, Transform::Reads, &cfg, &mut rng)?;

    println!("success: {}", summary.succeeded);
    if !summary.failed.is_empty() {
        println!("failed:  {}", summary.failed.len());
        for path in &summary.failed {
            println!("  {}", path.display());
        }
    }

    Ok(())
}
