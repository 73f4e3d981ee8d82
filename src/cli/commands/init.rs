//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "harvest.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Harvest configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Set api.base_url in {}", self.output);
                println!("  2. Optionally put HARVEST_API_TOKEN in a .env file");
                println!("  3. Validate configuration: harvest validate-config");
                println!("  4. Fetch and export: harvest run");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(5)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Harvest Configuration File

[application]
log_level = "info"
dry_run = false

[api]
base_url = "https://api.example.com/api/profiles"
page_size = 100
timeout_seconds = 30

[ingest]
start_page = 1
max_pages = 200
request_delay_ms = 800
backoff_delay_ms = 3000
empty_page_threshold = 3
output_path = "./result.json"

[export]
base_dir = "./organizations"
input_path = "./result.json"
max_concurrency = 4

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# Harvest Configuration File
#
# Every key can be overridden with HARVEST_<SECTION>_<KEY>, for example
# HARVEST_API_BASE_URL or HARVEST_INGEST_MAX_PAGES. Values may reference
# environment variables with ${VAR}.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Dry run mode: fetch, but write neither the result file nor the export tree
dry_run = false

# ============================================================================
# Remote API
# ============================================================================
[api]
# Paginated endpoint returning a JSON array of profiles.
# Requests look like <base_url>?<params>&page=<n>&limit=<page_size>
base_url = "https://api.example.com/api/profiles"

# Records per page (1-1000)
page_size = 100

# Per-request timeout
timeout_seconds = 30

# Optional bearer token
# api_token = "${HARVEST_API_TOKEN}"

# User-Agent header
# user_agent = "harvest"

# Extra static query parameters; "page" and "limit" are reserved
[api.params]
# region_id = "14"

# ============================================================================
# Pagination Loop
# ============================================================================
[ingest]
# First page requested
start_page = 1

# Safety limit: pages beyond this index are never requested
max_pages = 200

# Pause between consecutive requests (milliseconds)
request_delay_ms = 800

# Pause after a 5xx or 429 response before moving on (milliseconds)
backoff_delay_ms = 3000

# Consecutive empty pages (or backoffs) that end the run
empty_page_threshold = 3

# Where the deduplicated result is saved
output_path = "./result.json"

# ============================================================================
# Export Tree
# ============================================================================
[export]
# Root of the <region>/<organization>/<person>/ tree
base_dir = "./organizations"

# Result file read by "harvest export"
input_path = "./result.json"

# Records exported in parallel (1-64)
max_concurrency = 4

# Compute targets without touching the filesystem
dry_run = false

# ============================================================================
# Logging
# ============================================================================
[logging]
# Rolling JSON log files in addition to console output
local_enabled = false
local_path = "./logs"

# Rotation: daily or hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
