//! `palaver check` — Load and validate configuration, then exit.

use palaver_config::AppConfig;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Configuration invalid: {e}"))?;

    println!("Configuration OK");
    println!("   Inference endpoint: {}", config.inference.endpoint);
    println!("   Chat model:         {}", config.inference.chat_model);
    println!("   Embedding model:    {}", config.inference.embedding_model);
    println!("   Search endpoint:    {}", config.search.endpoint);
    println!("   Search index:       {}", config.search.index_name);
    println!("   History store:      {}", config.history.path);
    println!("   Replay window:      {}", config.history.replay_window);

    Ok(())
}
