//! Prints the effective configuration
//!
//! Run with: cargo run --example config_usage
//!
//! To override configuration with environment variables:
//! ```bash
//! JOBBOARD_SERVER__PORT=3000 \
//! JOBBOARD_DATABASE__URL=memory:// \
//! JOBBOARD_SECURITY__OTP__MODE=stored \
//! cargo run --example config_usage
//! ```

use jobboard::infrastructure::config::Config;

fn main() {
  match Config::load() {
    Ok(config) => {
      println!("Configuration loaded successfully!");
      println!();
      println!("Server:");
      println!("  Address: {}:{}", config.server.host, config.server.port);
      println!("  API prefix: {}", config.server.api_prefix);
      println!();
      println!("Database:");
      if config.database.is_in_memory() {
        println!("  In-memory store");
      } else {
        println!("  Max Connections: {}", config.database.max_connections);
        println!(
          "  Connect timeout: {} seconds",
          config.database.connect_timeout_seconds
        );
      }
      println!();
      println!("Security:");
      println!(
        "  Token TTL: {} seconds",
        config.security.token_ttl_seconds
      );
      println!("  OTP mode: {:?}", config.security.otp.mode);
      println!("  OTP TTL: {} seconds", config.security.otp.ttl_seconds);
      println!();
      println!("Storage:");
      println!("  Resumes: {}", config.storage.resume_dir.display());
      println!("  Logos: {}", config.storage.logo_dir.display());
    }
    Err(e) => {
      eprintln!("Failed to load configuration: {}", e);
      std::process::exit(1);
    }
  }
}
