//! # threadpack CLI
//!
//! Command-line interface for threadpack library.

use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing_subscriber::{EnvFilter, fmt};

use threadpack::ThreadpackError;
use threadpack::cli::Args;
use threadpack::core::convert_file;

fn main() {
    init_logging();

    // Display already folds in the cause, so the chain is not walked
    if let Err(e) = run() {
        eprintln!("❌ Error: {}", e);
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), ThreadpackError> {
    let start = Instant::now();
    let args = <Args as ClapParser>::parse();
    let config = args.to_config();

    if !args.quiet {
        println!("📦 threadpack v{}", env!("CARGO_PKG_VERSION"));
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("📂 Input:    {}", args.input);
        println!("💾 Output:   {}", args.output);
        println!("🕒 Timezone: {}", config.timezone);
        println!("🔤 Quoting:  {}", config.quoting);
        println!();
        println!("⏳ Converting...");
    }

    let stats = convert_file(&args.input, &args.output, &config)?;
    let elapsed = start.elapsed();

    if !args.quiet {
        println!("✅ Done! Output saved to {}", args.output);
        println!();
        println!("📊 Summary:");
        println!("   Records:     {}", stats.records);
        println!(
            "   Group chats: {} ({:.1}%)",
            stats.group_chats,
            stats.group_ratio()
        );
        println!("   Direct:      {}", stats.direct_chats);
        println!("   Time:        {:.2}s", elapsed.as_secs_f64());
    }

    Ok(())
}
