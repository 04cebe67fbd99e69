//! Placard command-line driver
//!
//! Headless access to the template library and stored designs.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use placard_core::editor::ShortcutRegistry;
use placard_core::storage::{AutoSaveManager, FileStorage};
use placard_core::templates::{ALL_CATEGORY, Favorites};
use placard_core::{Canvas, Collaborators, EditorConfig, EditorSession, KeyValueStore, TemplateLibrary};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "placard", version, about = "Poster designs from the command line")]
struct Cli {
    /// Editor settings as JSON; unset fields keep their defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the template library.
    Templates {
        /// A category name, "all", or "favorites" (needs --store).
        #[arg(long, default_value = ALL_CATEGORY)]
        category: String,
        /// Only templates whose name or category contains this text.
        #[arg(long)]
        search: Option<String>,
        /// Store directory holding the favourites list.
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Mark a template as favourite, or unmark it if it already is.
    Favorite {
        template: String,
        #[arg(long)]
        store: PathBuf,
    },
    /// Start a design from a template.
    New {
        template: String,
        /// Write the design JSON here.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also save it as the working design in this store directory.
        #[arg(long)]
        store: Option<PathBuf>,
    },
    /// Summarize a design file or the working design of a store.
    Inspect {
        file: Option<PathBuf>,
        #[arg(long, conflicts_with = "file")]
        store: Option<PathBuf>,
    },
    /// Print the keyboard shortcuts.
    Shortcuts,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Templates { category, search, store } => {
            let favorites = match store {
                Some(dir) => pollster::block_on(load_favorites(dir))?,
                None => Favorites::new(),
            };
            list_templates(&category, search.as_deref(), &favorites)
        }
        Command::Favorite { template, store } => pollster::block_on(toggle_favorite(config, &template, store)),
        Command::New { template, out, store } => {
            if pollster::block_on(new_design(config, &template, out.as_deref(), store))? {
                println!("Saved working design");
            }
            Ok(())
        }
        Command::Inspect { file, store } => {
            let canvas = match (file, store) {
                (Some(file), _) => read_design(&file)?,
                (None, Some(store)) => pollster::block_on(load_working_design(config, store))?,
                (None, None) => bail!("pass a design file or --store <dir>"),
            };
            print_summary(&canvas);
            Ok(())
        }
        Command::Shortcuts => {
            println!("{}", ShortcutRegistry::describe());
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    let Some(path) = path else {
        return Ok(EditorConfig::default());
    };
    let json = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    let config = EditorConfig::from_json(&json).with_context(|| format!("parsing config {}", path.display()))?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

fn open_store(dir: PathBuf) -> Result<Arc<dyn KeyValueStore>> {
    Ok(Arc::new(FileStorage::new(dir).context("opening store")?))
}

async fn load_favorites(dir: PathBuf) -> Result<Favorites> {
    let store = open_store(dir)?;
    Favorites::load(store.as_ref()).await.context("reading favourites")
}

fn list_templates(category: &str, search: Option<&str>, favorites: &Favorites) -> Result<()> {
    let library = TemplateLibrary::builtin();
    let mut templates = library.in_category(category, favorites);
    if let Some(term) = search {
        templates.retain(|t| t.matches(term));
    }
    if templates.is_empty() {
        bail!("no templates match (categories: {})", library.categories().join(", "));
    }

    for template in templates {
        let star = if favorites.contains(&template.id) { "*" } else { " " };
        println!("{} {:14} {:14} {}", star, template.id, template.category, template.name);
    }
    Ok(())
}

async fn toggle_favorite(config: EditorConfig, template: &str, dir: PathBuf) -> Result<()> {
    let collaborators = Collaborators::in_memory().with_store(open_store(dir)?);
    let mut session = EditorSession::new(config, collaborators);
    session.start().await;
    for warning in session.take_warnings() {
        log::warn!("{}", warning.message());
    }

    if session.toggle_favorite(template).await? {
        println!("Added {} to favourites", template);
    } else {
        println!("Removed {} from favourites", template);
    }
    Ok(())
}

/// Instantiate a template. Returns true if it was saved as the working design,
/// which only happens when a store directory is given.
async fn new_design(config: EditorConfig, template: &str, out: Option<&Path>, store: Option<PathBuf>) -> Result<bool> {
    if out.is_none() && store.is_none() {
        bail!("nothing to do: pass --out <file> and/or --store <dir>");
    }

    let persist = store.is_some();
    let mut collaborators = Collaborators::in_memory();
    if let Some(dir) = store {
        collaborators = collaborators.with_store(open_store(dir)?);
    }

    let mut session = EditorSession::new(config, collaborators);
    session.apply_template(template, true)?;

    if let Some(path) = out {
        let json = session.canvas().to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    if !persist {
        return Ok(false);
    }
    Ok(session.save_now().await?)
}

async fn load_working_design(config: EditorConfig, dir: PathBuf) -> Result<Canvas> {
    let mut autosave = AutoSaveManager::new(open_store(dir)?).with_key(config.design_key);
    autosave
        .load()
        .await?
        .context("the store has no working design")
}

fn read_design(path: &Path) -> Result<Canvas> {
    let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    Canvas::from_json(&json).with_context(|| format!("parsing {}", path.display()))
}

fn print_summary(canvas: &Canvas) {
    println!("Canvas {}x{}, {} elements", canvas.width, canvas.height, canvas.len());
    for (index, element) in canvas.elements.iter().enumerate() {
        let g = element.geometry;
        let label = element.text_content().unwrap_or_default();
        let hidden = if element.is_visible() { "" } else { " (hidden)" };
        println!(
            "{:3} {:8} at ({}, {}) {}x{} rot {} {}{}",
            index, element.kind, g.x, g.y, g.width, g.height, g.rotation_degrees, label, hidden
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use placard_core::storage::DESIGN_KEY;
    use placard_core::templates::FAVORITES_KEY;

    #[test]
    fn test_new_without_store_only_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("design.json");

        let saved = pollster::block_on(new_design(EditorConfig::default(), "template-1", Some(&out), None)).unwrap();
        assert!(!saved);
        assert!(!read_design(&out).unwrap().is_empty());
    }

    #[test]
    fn test_new_with_store_saves_working_design() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("store");

        let saved =
            pollster::block_on(new_design(EditorConfig::default(), "template-2", None, Some(store.clone()))).unwrap();
        assert!(saved);
        let storage = open_store(store.clone()).unwrap();
        assert!(pollster::block_on(storage.get(DESIGN_KEY)).unwrap().is_some());
        assert!(!pollster::block_on(load_working_design(EditorConfig::default(), store)).unwrap().is_empty());
    }

    #[test]
    fn test_new_needs_a_destination() {
        assert!(pollster::block_on(new_design(EditorConfig::default(), "template-1", None, None)).is_err());
    }

    #[test]
    fn test_favorite_toggle_persists() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().to_path_buf();

        pollster::block_on(toggle_favorite(EditorConfig::default(), "template-3", store.clone())).unwrap();
        let favorites = pollster::block_on(load_favorites(store.clone())).unwrap();
        assert_eq!(favorites.ids(), ["template-3"]);
        assert!(list_templates("favorites", None, &favorites).is_ok());

        pollster::block_on(toggle_favorite(EditorConfig::default(), "template-3", store.clone())).unwrap();
        let storage = open_store(store.clone()).unwrap();
        assert!(pollster::block_on(storage.get(FAVORITES_KEY)).unwrap().is_some());
        let favorites = pollster::block_on(load_favorites(store)).unwrap();
        assert!(favorites.is_empty());
        assert!(list_templates("favorites", None, &favorites).is_err());
    }
}
