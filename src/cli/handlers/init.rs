//! Database initialization handlers

use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::config::AppConfig;
use crate::database::Database;
use crate::vector_store::VectorStore;
use crate::Result;

/// Handle database initialization command
pub async fn handle_init_command(config: &AppConfig, force: bool) -> Result<()> {
    if !force {
        print_warning("This will initialize the database schema and the vector collection.");
        print_warning("This operation is safe - it uses CREATE IF NOT EXISTS.");
        println!("\nUse --force to proceed.");
        return Ok(());
    }

    print_info("🗄️  Initializing RAG chat database...");
    println!();

    let database = Database::from_config(config).await?;

    print_info("📋 Creating tables and indexes...");
    database.init_schema().await?;
    print_success("Tables created");

    print_info("📚 Creating vector collection...");
    let vector_store = VectorStore::new(
        database.pool().clone(),
        config.collection_name(),
        config.embedding_dimension(),
    )?;
    match vector_store.ensure_collection().await {
        Ok(()) => {
            print_success(&format!("Collection '{}' ready", config.collection_name()));
        }
        Err(e) => {
            if e.to_string().contains("vector") || e.to_string().contains("extension") {
                print_error(&format!("Could not enable pgvector extension: {e}"));
                print_warning("Run on the database server:");
                println!(
                    "  sudo -u postgres psql -d ragchat -c 'CREATE EXTENSION IF NOT EXISTS vector;'"
                );
                println!();
                println!("Then run: ragchat init --force");
            }
            return Err(e);
        }
    }

    println!();
    print_success("🎉 Database initialization complete!");
    println!();
    print_info("To start the API server, run:");
    println!("   ragchat serve");

    Ok(())
}
