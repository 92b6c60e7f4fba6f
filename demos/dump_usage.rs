// Dump stored usage documents as JSON (deserializes wincode BLOBs).
//
// Usage: cargo run --example dump_usage -- [DB_PATH] [LIMIT]
//   DB_PATH  default: ./data/usage.db
//   LIMIT    default: 5

use housekeeper::usage_repo::UsageRepo;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = args.get(1).map(String::as_str).unwrap_or("./data/usage.db");
    let limit: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(5);

    let repo = UsageRepo::connect(path, 1).await?;
    let docs = repo.find_page(None, limit).await?;

    println!("{}", serde_json::to_string_pretty(&docs)?);
    Ok(())
}
