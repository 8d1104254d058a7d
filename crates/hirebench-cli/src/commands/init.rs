//! The `hirebench init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_once(Path::new("hirebench.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("questions")?;
    write_once(Path::new("questions/filter-products.json"), EXAMPLE_QUESTION)?;

    std::fs::create_dir_all("solutions")?;
    write_once(Path::new("solutions/filter-products.js"), EXAMPLE_SOLUTION)?;

    println!("\nNext steps:");
    println!("  1. Export GEMINI_API_KEY (or edit hirebench.toml)");
    println!("  2. Run: hirebench validate --question questions/filter-products.json");
    println!(
        "  3. Run: hirebench evaluate --question questions/filter-products.json --source solutions/filter-products.js"
    );
    println!("  4. Run: hirebench serve --static-dir ./public");

    Ok(())
}

fn write_once(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, content)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# hirebench configuration

[backend]
api_key = "${GEMINI_API_KEY}"
model = "gemini-2.5-flash"
timeout_secs = 60

[retry]
max_retries = 3
base_delay_ms = 1000

[evaluation]
# 0 disables the wall-clock budget
time_budget_ms = 5000
loop_iteration_limit = 10000000
recursion_limit = 512
# evaluation threads allowed at once, including timed-out ones still running
max_in_flight = 4

[server]
port = 8000
static_dir = "."
"#;

const EXAMPLE_QUESTION: &str = r#"{
  "id": "Q1",
  "description": "Implement filterProducts that returns products whose name contains the query (case-insensitive) and price within [minPrice,maxPrice] if provided.",
  "functionName": "filterProducts",
  "parameters": ["products", "query", "minPrice", "maxPrice"],
  "starterCode": "function filterProducts(products, query, minPrice, maxPrice) {\n  // return a new filtered array\n}\n",
  "sampleInput": {
    "products": [
      {"name": "Mouse", "price": 499},
      {"name": "Keyboard", "price": 1299},
      {"name": "House", "price": 9999}
    ],
    "query": "ou",
    "minPrice": 300,
    "maxPrice": 2000
  },
  "sampleOutput": [{"name": "Mouse", "price": 499}]
}
"#;

const EXAMPLE_SOLUTION: &str = r#"function filterProducts(products, query, minPrice, maxPrice) {
  const q = (query || "").toLowerCase();
  return products.filter((p) => {
    if (!p.name.toLowerCase().includes(q)) return false;
    if (typeof minPrice === "number" && p.price < minPrice) return false;
    if (typeof maxPrice === "number" && p.price > maxPrice) return false;
    return true;
  });
}
"#;
