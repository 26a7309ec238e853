use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use cruds::editor::{ProductEditor, SubmitOutcome};
use cruds::errors::CrudsError;
use cruds::products::{Field, ProductFields};
use cruds::search::{Search, SearchMode};
use cruds::store::{FileStorage, ProductStore};
use cruds::{parse, parse_config, shell};

#[derive(Parser, Debug)]
#[command(version, about = "Keep a list of products with prices, taxes and categories", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
    #[arg(short, long)]
    debug: bool,
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show all products
    List,
    /// Create a product, or several identical ones with --count
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Overwrite the product shown under NUMBER
    Update {
        number: String,
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Delete the product shown under NUMBER
    Delete { number: String },
    /// Delete every product
    Clear {
        #[arg(short, long)]
        yes: bool,
    },
    /// Show products whose title or category contains QUERY
    Search {
        #[arg(short, long, value_enum, default_value_t = SearchMode::Title)]
        by: SearchMode,
        #[arg(default_value = "")]
        query: String,
    },
    /// Manage products interactively
    Shell,
}

#[derive(Args, Debug, Default)]
struct FieldArgs {
    #[arg(short, long)]
    title: Option<String>,
    #[arg(short, long, allow_hyphen_values = true)]
    price: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    taxes: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    ads: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    discount: Option<String>,
    #[arg(short = 'n', long)]
    count: Option<String>,
    #[arg(short = 'g', long)]
    category: Option<String>,
}

impl FieldArgs {
    /// Writes every given flag into the form, leaving the others as they are.
    fn apply(self, fields: &mut ProductFields) {
        let given = [
            (Field::Title, self.title),
            (Field::Price, self.price),
            (Field::Taxes, self.taxes),
            (Field::Ads, self.ads),
            (Field::Discount, self.discount),
            (Field::Count, self.count),
            (Field::Category, self.category),
        ];
        for (field, value) in given {
            if let Some(value) = value {
                fields.set(field, value);
            }
        }
    }
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), CrudsError> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    let config = parse_config(cli.config.as_deref())?;
    debug!(?config, "configuration");

    let storage = FileStorage::open(&config.data_dir)?;
    let mut store = ProductStore::open(storage, config.storage_key.clone())?;
    let all = Search::default();

    match cli.command {
        Command::List => shell::print_products(&store, &all, &config),
        Command::Add { fields } => {
            let mut editor = ProductEditor::default();
            fields.apply(editor.fields_mut());
            if let SubmitOutcome::Created { copies } = editor.submit(&mut store)? {
                println!("Created {} product(s)", copies);
            }
            shell::print_products(&store, &all, &config);
        }
        Command::Update { number, fields } => {
            let index = parse::parse_row_number(&number)?;
            let mut editor = ProductEditor::default();
            editor.begin_edit(&store, index)?;
            fields.apply(editor.fields_mut());
            editor.submit(&mut store)?;
            println!("Updated product #{}", index + 1);
            shell::print_products(&store, &all, &config);
        }
        Command::Delete { number } => {
            let index = parse::parse_row_number(&number)?;
            let removed = store.remove_at(index)?;
            println!("Deleted {}", removed);
            shell::print_products(&store, &all, &config);
        }
        Command::Clear { yes } => {
            if store.is_empty() {
                println!("Nothing to delete");
            } else if shell::clear_confirmed(&mut store, |len| {
                if yes {
                    Ok(true)
                } else {
                    shell::confirm_clear(len)
                }
            })? {
                println!("Deleted all products");
            }
        }
        Command::Search { by, query } => {
            let mut search = Search::default();
            search.select_mode(by);
            search.set_query(query);
            shell::print_products(&store, &search, &config);
        }
        Command::Shell => shell::run(&mut store, &config)?,
    }

    Ok(())
}
