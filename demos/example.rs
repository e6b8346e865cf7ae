use ini_tree::Config;
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
    name: String,
}

fn main() -> Result<(), ini_tree::Error> {
    // DEMO_PROFILE=dev switches the database name
    let config: AppConfig = Config::builder()
        .with_file("demos/default.ini", true)
        .with_file("demos/local.ini", false)
        .with_env("DEMO_")
        .build()?;

    println!("App: {} (debug={})", config.app.name, config.app.debug);
    println!(
        "Database: {}:{}/{}",
        config.database.host, config.database.port, config.database.name
    );

    // Untyped access to the same data
    let tree = ini_tree::parse(&std::fs::read_to_string("demos/default.ini").unwrap_or_default())?;
    println!("{}", serde_json::to_string_pretty(&tree).unwrap_or_default());

    Ok(())
}
