use std::time::Duration;

use cacher::prelude::*;

#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct Greeting {
    lang: String,
    text: String,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    // Uses REDIS_HOST / REDIS_PORT / REDIS_PASSWORD / REDIS_DB when set
    let config = RedisConfig::from_env();
    println!("Connecting to Redis at {}", config.url());

    let cache = Cacher::new(RedisStore::new(config));

    // Plain strings are stored verbatim
    cache
        .set("hello", "world", Some(Duration::from_secs(30)))
        .await?;
    match cache.get("hello").await? {
        Some(value) => println!("hello = {value}"),
        None => println!("hello missed"),
    }

    // Structured values go through JSON
    let greeting = Greeting {
        lang: "en".to_string(),
        text: "good morning".to_string(),
    };
    cache
        .set(
            "greeting",
            CacheValue::json(&greeting)?,
            Some(Duration::from_secs(30)),
        )
        .await?;

    if let Some(raw) = cache.get("greeting").await? {
        let decoded: Greeting = CacheValue::decode(&raw)?;
        println!("decoded: {decoded:?}");
    }

    let deleted = cache
        .del(&["hello".to_string(), "greeting".to_string()])
        .await?;
    println!("cleaned up {deleted} keys");

    cache.close().await?;
    Ok(())
}
