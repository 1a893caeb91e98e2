//! Basic usage example of the caching aspect.

use cache_aspect::{
    backend::InMemoryBackend, error::Result, CacheKeyBuilder, CacheService, CachingOptions,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Example entity: Employment
#[derive(Clone, Serialize, Deserialize, Debug)]
struct Employment {
    id: String,
    loanapp_id: String,
    employer_name: String,
    salary: f64,
    end_date: Option<String>,
}

/// Mock repository that simulates database access
struct EmploymentRepository;

impl EmploymentRepository {
    async fn fetch_by_id(&self, id: &str) -> Result<Option<Employment>> {
        println!("  [DB] Fetching employment: {}", id);
        tokio::time::sleep(Duration::from_millis(50)).await;

        // Simulate some employments in the database
        let employment = match id {
            "emp_001" => Some(Employment {
                id: id.to_string(),
                loanapp_id: "loan_123".to_string(),
                employer_name: "Acme Corp".to_string(),
                salary: 75000.0,
                end_date: None,
            }),
            "emp_002" => Some(Employment {
                id: id.to_string(),
                loanapp_id: "loan_456".to_string(),
                employer_name: "Tech Inc".to_string(),
                salary: 95000.0,
                end_date: Some("2024-03-31".to_string()),
            }),
            _ => None,
        };

        Ok(employment)
    }

    fn count_active(&self) -> Result<u32> {
        println!("  [DB] Counting active employments");
        Ok(1)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    println!("\n=== Cache Aspect - Basic Example ===\n");

    // 1. Initialize cache service
    println!("1. Initializing in-memory cache...");
    let cache = CacheService::with_options(
        InMemoryBackend::new(),
        CachingOptions::new()
            .with_absolute_expiration(Duration::from_secs(300))
            .with_sliding_expiration(Duration::from_secs(60)),
    );
    let repository = EmploymentRepository;

    println!("   ✓ Cache ready\n");

    // 2. First request - cache miss, fetch from database
    println!("2. First request for employment (emp_001):");
    let key = CacheKeyBuilder::build("employment", &"emp_001");
    let employment = cache
        .invoke_async(&key, || repository.fetch_by_id("emp_001"))
        .await?;

    if let Some(emp) = &employment {
        println!(
            "   ✓ Employment loaded: {} from {} (${:.2})\n",
            emp.employer_name, emp.id, emp.salary
        );
    }

    // 3. Second request - cache hit, no database access
    println!("3. Second request for same employment (emp_001):");
    let employment = cache
        .invoke_async(&key, || repository.fetch_by_id("emp_001"))
        .await?;

    if let Some(emp) = &employment {
        println!(
            "   ✓ Employment loaded from cache: {} (${:.2})\n",
            emp.employer_name, emp.salary
        );
    }

    // 4. Missing rows are cached too
    println!("4. Request for unknown employment (emp_003):");
    let missing = cache
        .invoke_async(&CacheKeyBuilder::build("employment", &"emp_003"), || {
            repository.fetch_by_id("emp_003")
        })
        .await?;

    if missing.is_none() {
        println!("   ✓ Not found (absence is cached as well)\n");
    }

    // 5. Remove - force the next call to reload
    println!("5. Remove emp_001 and request it again:");
    cache.remove_async(&key).await?;
    let employment = cache
        .invoke_async(&key, || repository.fetch_by_id("emp_001"))
        .await?;

    if let Some(emp) = &employment {
        println!("   ✓ Employment reloaded from database: {}\n", emp.employer_name);
    }

    // ========================================================================
    // ADVANCED USAGE: Per-Call Options and Blocking Calls
    // ========================================================================

    println!("\n=== Advanced Usage Examples ===\n");

    // 6. Per-call options replace the service defaults for one write
    println!("6. Per-call options (short absolute expiration):");
    let short = CachingOptions::new().with_absolute_expiration(Duration::from_millis(200));
    let key = CacheKeyBuilder::build("employment", &"emp_002");

    cache
        .invoke_async_with_options(&key, || repository.fetch_by_id("emp_002"), &short)
        .await?;
    tokio::time::sleep(Duration::from_millis(300)).await;
    cache
        .invoke_async_with_options(&key, || repository.fetch_by_id("emp_002"), &short)
        .await?;
    println!("   ✓ Entry expired and was fetched again\n");

    // 7. Blocking invoke for synchronous computations
    println!("7. Blocking invoke:");
    let blocking_cache = cache.clone();
    let active = tokio::task::spawn_blocking(move || {
        let repository = EmploymentRepository;
        let first = blocking_cache.invoke("employment:active_count", || repository.count_active())?;
        let second = blocking_cache.invoke("employment:active_count", || repository.count_active())?;
        Ok::<_, cache_aspect::Error>((first, second))
    })
    .await
    .map_err(|e| cache_aspect::Error::Other(e.to_string()))??;

    println!(
        "   ✓ Active employments: {} (second call served from cache: {})\n",
        active.0, active.1
    );

    println!("=== Example Complete ===\n");

    Ok(())
}
