use config_precedence::order::PriorityTable;
use config_precedence::Config;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AppConfig {
    app: AppSection,
    database: DatabaseSection,
}

#[derive(Debug, Deserialize)]
struct AppSection {
    name: String,
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct DatabaseSection {
    host: String,
    port: u16,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "config_precedence=debug".into()),
        )
        .init();

    let table = std::fs::read_to_string("demos/priorities.toml")?;
    let priorities = PriorityTable::from_toml_str(&table)?;

    // dev.toml is pinned ahead of the environment, e.g. DEMO__DATABASE__HOST
    let builder = Config::builder()
        .with_file("demos/default.toml", true)
        .with_file("demos/dev.toml", false)
        .with_env("DEMO", "__")
        .with_resolver(priorities);

    for source in builder.precedence()? {
        println!("{}", source.name);
    }

    let config: AppConfig = builder.build()?;
    println!("App: {} (debug={})", config.app.name, config.app.debug);
    println!("Database: {}:{}", config.database.host, config.database.port);

    Ok(())
}
