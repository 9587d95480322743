//! Pressroom - blog content engine CLI.

use anyhow::{Context, Result, bail};
use clap::Parser;
use pressroom::{
    blog::{self, SiteEngine, metadata},
    check::check_content,
    cli::{Cli, Commands},
    config::SiteConfig,
    generator, log,
    serve::serve_site,
};
use serde::Serialize;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    let engine = blog::open(&config)?;
    run(&cli.command, &engine, &config)
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file falls back to the defaults.
fn load_config(cli: &Cli) -> Result<SiteConfig> {
    let root = cli.root.as_deref().unwrap_or(Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        SiteConfig::from_path(&config_path)?
    } else {
        log!("config"; "{} not found, using defaults", config_path.display());
        SiteConfig::default()
    };
    config.resolve_paths(root);

    if let Commands::Serve { interface, port } = &cli.command {
        config.update_serve(interface.as_ref(), port.as_ref());
    }

    config.validate()?;
    Ok(config)
}

fn run(command: &Commands, engine: &SiteEngine, config: &SiteConfig) -> Result<()> {
    match command {
        Commands::List { listing } => {
            let query = listing.to_query(config.content.page_size);
            print_json(&engine.filtered_query(&query))
        }
        Commands::Featured { vertical } => print_json(&engine.featured_post(vertical)),
        Commands::Related { slug, count } => {
            let count = count.unwrap_or(config.content.related_count);
            print_json(&engine.related_posts(slug, count))
        }
        Commands::Post { slug, json_ld } => {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            let Some(content) = runtime.block_on(engine.post_content_by_slug(slug)) else {
                bail!("post `{slug}` not found");
            };
            if *json_ld {
                print_json(&metadata::article(&content, engine.labels(), engine.permalinks()))
            } else {
                print_json(&content)
            }
        }
        Commands::Categories => print_json(&engine.category_labels()),
        Commands::Funnels => print_json(&engine.funnel_labels()),
        Commands::Metadata { listing, entries } => {
            let page = engine.filtered_query(&listing.to_query(config.content.page_size));
            let limit = entries.unwrap_or(config.content.metadata_limit);
            print_json(&engine.structured_metadata(&page.posts, limit))
        }
        Commands::Feed => {
            println!("{}", generator::rss_feed(engine, config)?);
            Ok(())
        }
        Commands::Sitemap => {
            print!("{}", generator::sitemap(engine, config)?);
            Ok(())
        }
        Commands::Check => {
            let report = check_content(engine.store(), engine.repository().dir());
            for issue in &report.issues {
                log!("error"; "{issue}");
            }
            if !report.is_ok() {
                bail!("{} issue(s) in {} content file(s)", report.issues.len(), report.checked);
            }
            log!("check"; "{} posts, {} content files, all consistent", engine.store().len(), report.checked);
            Ok(())
        }
        Commands::Serve { .. } => serve_site(engine, config),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
