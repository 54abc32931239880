use std::fs::File;
use std::sync::Arc;

use apimenu::Catalog;
use apimenu::core::config::{self, CliOverrides, ResolvedConfig};
use apimenu::core::ledger_file;
use apimenu::core::menu::{CatalogGroup, MenuItem, MenuItemType, MenuPatch};
use apimenu::core::recycle::RecycleCategory;
use apimenu::core::state::App;
use apimenu::core::store::DropPosition;
use apimenu::remote::HttpRemoteStore;
use apimenu::tree;
use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, WriteLogger};

#[derive(Parser)]
#[command(name = "apimenu", about = "Manage an API catalog's menu tree")]
struct Args {
    /// Remote store base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Project whose catalog to open
    #[arg(long)]
    project: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the catalog tree
    Tree {
        /// Only show items whose name contains this word
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Add a new menu item
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        kind: MenuItemType,
        /// Folder to add into (top level if omitted)
        #[arg(long)]
        parent: Option<String>,
    },
    /// Rename a menu item
    Rename {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
    },
    /// Move a menu item and its subtree to the recycle bin
    Remove {
        #[arg(long)]
        id: String,
    },
    /// Move a menu item relative to another
    Move {
        #[arg(long)]
        drag: String,
        #[arg(long)]
        drop: String,
        /// -1 = before, 0 = inside, 1 = after
        #[arg(long, allow_negative_numbers = true, value_parser = clap::value_parser!(i8).range(-1..=1))]
        position: i8,
    },
    /// List the recycle bin
    Recycle,
    /// Restore a recycle bin entry
    Restore {
        #[arg(long)]
        entry: String,
        #[arg(long, value_enum)]
        category: RecycleCategory,
    },
}

fn init_logging(config: &ResolvedConfig) {
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("apimenu.log") {
        let _ = WriteLogger::init(config.log_level, log_config, log_file);
    }
}

fn print_tree(catalog: &Catalog, search: Option<&str>) {
    let nodes = tree::filter(tree::build(catalog.store()), search.unwrap_or(""));
    for (group, title) in [
        (CatalogGroup::Http, "Endpoints"),
        (CatalogGroup::Schema, "Schemas"),
        (CatalogGroup::Request, "Requests"),
    ] {
        let section = tree::group(&nodes, group);
        if section.is_empty() {
            continue;
        }
        println!("{title}");
        print!("{}", tree::render(&section));
    }
}

fn print_recycle(catalog: &Catalog) {
    let ledger = catalog.store().ledger();
    if ledger.is_empty() {
        println!("Recycle bin is empty");
        return;
    }
    for category in RecycleCategory::ALL {
        let entries = ledger.entries(category);
        if entries.is_empty() {
            continue;
        }
        println!("{} ({})", category.label(), entries.len());
        for entry in entries {
            println!(
                "  {}  {} [{}]  deleted by {} at {}, expires in {}",
                entry.id,
                entry.deleted_item.name,
                entry.deleted_item.kind.label(),
                entry.creator.name,
                entry.deleted_at.format("%Y-%m-%d %H:%M"),
                entry.expired_at
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    let file_config = config::load_config()?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url.clone(),
            project_id: args.project.clone(),
        },
    );
    init_logging(&resolved);
    log::info!(
        "apimenu starting: base_url={}, project={}",
        resolved.base_url,
        resolved.project_id
    );

    let remote = Arc::new(HttpRemoteStore::from_config(&resolved)?);
    let ledger_path = ledger_file::ledger_path(&resolved.project_id)?;
    let mut catalog = Catalog::new(App::from_config(&resolved), remote).with_ledger_file(ledger_path);
    catalog.load().await?;

    match args.command {
        Command::Tree { search } => {
            print_tree(&catalog, search.as_deref());
            return Ok(());
        }
        Command::Recycle => {
            print_recycle(&catalog);
            return Ok(());
        }
        Command::Add { name, kind, parent } => {
            let mut item = MenuItem::new("", name, kind);
            item.parent_id = parent;
            if let Some(id) = catalog.add_menu_item(item) {
                println!("Added {id}");
            }
        }
        Command::Rename { id, name } => {
            catalog.update_menu_item(MenuPatch::new(id).name(name));
        }
        Command::Remove { id } => catalog.remove_menu_item(&id),
        Command::Move {
            drag,
            drop,
            position,
        } => {
            // Range-checked by clap
            if let Some(position) = DropPosition::from_offset(position) {
                catalog.move_menu_item(&drag, &drop, position);
            }
        }
        Command::Restore { entry, category } => catalog.restore_menu_item(&entry, category),
    }

    catalog.settle().await;
    println!("{}", catalog.app().status_message);
    if let Some(error) = &catalog.app().error {
        eprintln!("warning: {error}");
    }
    print_tree(&catalog, None);
    Ok(())
}
