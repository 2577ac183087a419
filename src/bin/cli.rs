//! Shopdesk CLI
//!
//! Command-line interface for Shopdesk operations:
//! - Sign in and out
//! - List and edit orders, products and customers
//! - Show KPIs and export CSV
//! - Chat with the assistant and generate documents
//! - Render Markdown the way the canvas preview does

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use shopdesk::assistant::{suggestions, Assistant, AssistantReply, Model};
use shopdesk::canvas::{
    export_document, reveal_into, CancelHandle, CanvasCommand, DocumentFormat, FileScratchStore,
    RevealOutcome, ScratchDraft, ScratchStore,
};
use shopdesk::export::{customers_table, orders_page_table, products_table, CsvFile};
use shopdesk::router::resolve_route;
use shopdesk::views::{
    kpi_cards, load_customers, load_dashboard, load_orders, load_products, next_order_number,
    CustomerFilter, CustomerSummary, OrderFilter, ProductFilter, ViewState,
};
use shopdesk::{
    AuthContext, Config, Draft, DraftError, FileTokenStore, Gateway, Locale, Message, NewOrder,
    Order, OrderStatus, RouteId, Session,
};

#[derive(Parser)]
#[command(name = "shopdesk")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "E-commerce admin dashboard")]
#[command(long_about = "Shopdesk manages orders, products and customers in a hosted table store,\nexports analytics to CSV and talks to an AI business assistant.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: ~/.config/shopdesk/config.toml or ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with email and password
    Login {
        #[arg(short, long)]
        email: String,
        /// Read from stdin when omitted
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Sign out and forget the stored session
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Orders
    Orders {
        #[command(subcommand)]
        command: OrdersCommand,
    },

    /// Products
    Products {
        #[command(subcommand)]
        command: ProductsCommand,
    },

    /// Customers
    Customers {
        #[command(subcommand)]
        command: CustomersCommand,
    },

    /// Dashboard KPIs and recent orders
    Kpis,

    /// Export tables to CSV
    Export {
        what: ExportTarget,
        /// Output directory (default: [export].dir)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Talk to the assistant. Without a message, starts an interactive session.
    /// Prefix a message with "[Canvas] " to generate a document.
    Chat {
        message: Option<String>,
        /// Model display name (gemini-3-pro, claude-opus-4.5-thinking, ...)
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Render a Markdown file to HTML
    Render {
        path: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders, newest first
    List {
        /// Order number or customer name
        #[arg(short, long, default_value = "")]
        search: String,
        /// all, pending, processing, shipped, completed or cancelled
        #[arg(long, default_value = "all")]
        status: String,
    },
    /// Show one order
    Show { id: String },
    /// Create an order with a generated order number
    Create {
        #[arg(long)]
        customer_name: String,
        #[arg(long)]
        customer_email: String,
        #[arg(long, default_value = "0")]
        amount: f64,
        #[arg(long, default_value = "1")]
        items: u32,
    },
    /// Delete an order
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum ProductsCommand {
    List {
        #[arg(short, long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all")]
        category: String,
    },
}

#[derive(Subcommand)]
pub enum CustomersCommand {
    List {
        /// Name or email
        #[arg(short, long, default_value = "")]
        search: String,
    },
    /// Counts by status
    Stats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportTarget {
    Orders,
    Products,
    Customers,
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config);

    let locale = config.locale();

    match cli.command {
        Commands::Config { output } => {
            let content = shopdesk::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &content)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", content);
                }
            }
        }

        Commands::Render { path, output } => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {:?}", path))?;
            let html = shopdesk::canvas::render(&text);

            match output {
                Some(out) => {
                    std::fs::write(&out, html)?;
                    println!("Rendered to {:?}", out);
                }
                None => println!("{}", html),
            }
        }

        Commands::Login { email, password } => {
            let mut session = open_session(&config).await?;
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            let user = session.sign_in(&email, &password).await?;
            println!("Signed in as {}", user.email.as_deref().unwrap_or(&user.id));
        }

        Commands::Register { email, password } => {
            let mut session = open_session(&config).await?;
            let password = match password {
                Some(p) => p,
                None => prompt("Password: ")?,
            };
            match session.sign_up(&email, &password).await? {
                shopdesk::gateway::SignUpOutcome::SignedIn(tokens) => {
                    println!("Registered and signed in as {}", tokens.user.id)
                }
                shopdesk::gateway::SignUpOutcome::ConfirmationRequired(_) => {
                    println!("Check {} for a confirmation link", email)
                }
            }
        }

        Commands::Logout => {
            let mut session = open_session(&config).await?;
            session.sign_out().await?;
            println!("Signed out");
        }

        Commands::Whoami => {
            let session = open_session(&config).await?;
            match session.user() {
                Some(user) => println!(
                    "{} ({})",
                    user.email.as_deref().unwrap_or("-"),
                    user.id
                ),
                None => println!("Not signed in"),
            }
        }

        Commands::Orders { command } => {
            let session = require(&config, RouteId::Orders).await?;
            run_orders(command, session.gateway(), locale, cli.format).await?;
        }

        Commands::Products { command } => {
            let session = require(&config, RouteId::Products).await?;
            let ProductsCommand::List { search, category } = command;
            let state = load_products(session.gateway(), locale).await;
            let filter = ProductFilter { search, category };
            let rows = filter.apply(state.rows());

            if let Some(message) = empty_or_failed(&state, rows.len(), locale) {
                println!("{}", message);
            } else if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                println!("{:<28} {:<10} {:>10} {:>8}  {}", "Name", "Category", "Price", "Stock", "Status");
                println!("{}", "-".repeat(72));
                for p in rows {
                    println!(
                        "{:<28} {:<10} {:>10.2} {:>8}  {}",
                        p.name,
                        p.category,
                        p.price,
                        p.stock,
                        p.status.label(locale)
                    );
                }
            }
        }

        Commands::Customers { command } => {
            let session = require(&config, RouteId::Customers).await?;
            match command {
                CustomersCommand::List { search } => {
                    let state = load_customers(session.gateway(), locale).await;
                    let filter = CustomerFilter {
                        search,
                        ..Default::default()
                    };
                    let rows = filter.apply(state.rows());

                    if let Some(message) = empty_or_failed(&state, rows.len(), locale) {
                        println!("{}", message);
                    } else if cli.format == OutputFormat::Json {
                        println!("{}", serde_json::to_string_pretty(&rows)?);
                    } else {
                        let summary = CustomerSummary::from_customers(state.rows());
                        println!(
                            "Total {}  Active {}  VIP {}  Spent {}",
                            summary.total,
                            summary.active,
                            summary.vip,
                            summary.total_spent_label(locale)
                        );
                        println!();
                        println!("{:<16} {:<28} {:<10} {:>8} {:>12}", "Name", "Email", "Status", "Orders", "Spent");
                        println!("{}", "-".repeat(78));
                        for c in rows {
                            println!(
                                "{:<16} {:<28} {:<10} {:>8} {:>12.2}",
                                c.name,
                                c.email,
                                c.status.label(locale),
                                c.total_orders,
                                c.total_spent
                            );
                        }
                    }
                }
                CustomersCommand::Stats => {
                    let stats = session.gateway().customers().stats().await?;
                    if cli.format == OutputFormat::Json {
                        println!("{}", serde_json::to_string_pretty(&stats)?);
                    } else {
                        println!("Total:    {}", stats.total);
                        println!("Active:   {}", stats.active);
                        println!("VIP:      {}", stats.vip);
                        println!("Inactive: {}", stats.inactive);
                        println!("New:      {}", stats.new);
                    }
                }
            }
        }

        Commands::Kpis => {
            let session = require(&config, RouteId::Dashboard).await?;
            let data = load_dashboard(session.gateway()).await?;

            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&data.kpis)?);
            } else {
                for card in kpi_cards(&data.kpis, locale) {
                    println!("{:<12} {}", card.title, card.formatted());
                }
                println!();
                print_orders(&data.recent_orders.iter().collect::<Vec<_>>(), locale);
            }
        }

        Commands::Export { what, dir } => {
            let session = require(&config, RouteId::Analytics).await?;
            let dir = dir.unwrap_or_else(|| expand_home(&config.export.dir));
            std::fs::create_dir_all(&dir)?;

            let files = match export_files(what, session.gateway(), locale).await {
                Ok(files) => files,
                Err(e) => {
                    tracing::error!(error = %e, "Export failed");
                    bail!(locale.text(&Message::ExportFailed));
                }
            };

            for file in &files {
                let path = file.write_to(&dir)?;
                println!("{}", path.display());
            }
            println!("{}", locale.text(&Message::ExportSucceeded { files: files.len() }));
        }

        Commands::Chat { message, model } => {
            let session = require(&config, RouteId::Ai).await?;
            let model = match model {
                Some(name) => Model::parse(&name)
                    .with_context(|| format!("Unknown model: {}", name))?,
                None => config.assistant_model(),
            };

            let mut assistant = Assistant::new(locale)
                .with_model(model)
                .with_persistence(config.assistant.persist_history);

            match message {
                Some(message) => {
                    chat_turn(&mut assistant, session.gateway(), &config, &message).await?;
                }
                None => {
                    println!("{} ({})", model, model.description(locale));
                    if let Some(greeting) = assistant.conversation().last() {
                        println!("{}", greeting.content);
                    }
                    println!();
                    for suggestion in suggestions(locale) {
                        println!("  - {}", suggestion);
                    }
                    println!();

                    let stdin = std::io::stdin();
                    loop {
                        print!("> ");
                        std::io::stdout().flush()?;
                        let mut line = String::new();
                        if stdin.lock().read_line(&mut line)? == 0 {
                            break;
                        }
                        let line = line.trim_end_matches(['\r', '\n']);
                        if line == "/exit" {
                            break;
                        }
                        chat_turn(&mut assistant, session.gateway(), &config, line).await?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("shopdesk={}", config.logging.level).into());

    if config.logging.format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn open_session(config: &Config) -> anyhow::Result<Session<FileTokenStore>> {
    let gateway = Gateway::new(config.gateway_config()?)?;
    let path = FileTokenStore::default_path()
        .unwrap_or_else(|| expand_home(&config.ui.scratch_dir).join("session.json"));

    let mut session = Session::new(gateway, FileTokenStore::new(path));
    session.init().await?;
    Ok(session)
}

/// Open the session and apply the route guard for `route`
async fn require(config: &Config, route: RouteId) -> anyhow::Result<Session<FileTokenStore>> {
    let session = open_session(config).await?;
    let resolution = resolve_route(route, session.is_authenticated());
    if resolution.view == RouteId::Login {
        bail!("Not signed in. Run `shopdesk login --email <EMAIL>` first.");
    }
    Ok(session)
}

async fn run_orders(
    command: OrdersCommand,
    gateway: &Gateway,
    locale: Locale,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        OrdersCommand::List { search, status } => {
            let state = load_orders(gateway, locale).await;
            let mut filter = OrderFilter {
                search,
                ..Default::default()
            };
            filter.set_tab(&status);
            let rows = filter.apply(state.rows());

            if let Some(message) = empty_or_failed(&state, rows.len(), locale) {
                println!("{}", message);
            } else if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print_orders(&rows, locale);
            }
        }

        OrdersCommand::Show { id } => {
            let order = gateway.orders().get(&id).await?;
            if format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&order)?);
            } else {
                println!("Order:    {}", order.order_number);
                println!("Customer: {} <{}>", order.customer_name, order.customer_email);
                println!("Amount:   ¥{:.2}", order.total_amount);
                println!("Items:    {}", order.items_count);
                println!("Status:   {}", order.status.label(locale));
                println!("Payment:  {}", order.payment_status.label(locale));
                println!("Created:  {}", order.created_at.format("%Y-%m-%d %H:%M"));
            }
        }

        OrdersCommand::Create {
            customer_name,
            customer_email,
            amount,
            items,
        } => {
            let mut draft = Draft::<Order>::create_with(NewOrder {
                order_number: next_order_number(),
                customer_name,
                customer_email,
                total_amount: amount,
                items_count: items,
                status: OrderStatus::Pending,
                ..Default::default()
            });

            match draft.save(gateway).await {
                Ok(order) => println!("Created {} ({})", order.order_number, order.id),
                Err(DraftError::Validation(e)) => bail!(locale.text(&e.message())),
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create order");
                    bail!(locale.text(&Message::SaveFailed));
                }
            }
        }

        OrdersCommand::Delete { id, yes } => {
            if !yes {
                let answer = prompt(&format!("{} [y/N] ", locale.text(&Message::ConfirmDeleteOrder)))?;
                if !answer.eq_ignore_ascii_case("y") {
                    return Ok(());
                }
            }
            if let Err(e) = gateway.orders().delete(&id).await {
                tracing::error!(error = %e, id = %id, "Failed to delete order");
                bail!(locale.text(&Message::DeleteFailed));
            }
            println!("Deleted {}", id);
        }
    }

    Ok(())
}

async fn export_files(
    what: ExportTarget,
    gateway: &Gateway,
    locale: Locale,
) -> anyhow::Result<Vec<CsvFile>> {
    let today = Utc::now().date_naive();
    let table = match what {
        ExportTarget::All => return Ok(shopdesk::export_all(gateway, locale, today).await?),
        ExportTarget::Orders => orders_page_table(&gateway.orders().list().await?, locale),
        ExportTarget::Products => products_table(&gateway.products().list().await?, locale),
        ExportTarget::Customers => customers_table(&gateway.customers().list().await?, locale),
    };
    Ok(vec![table.to_file(today)?])
}

async fn chat_turn(
    assistant: &mut Assistant,
    gateway: &Gateway,
    config: &Config,
    input: &str,
) -> anyhow::Result<()> {
    match assistant.send(gateway, input).await {
        None => {}
        Some(AssistantReply::Message(text)) => println!("{}\n", text),
        Some(AssistantReply::Document(generated)) => {
            let mut document = generated.open();
            let cancel = CancelHandle::new();

            let ctrl_c = {
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        cancel.cancel();
                    }
                })
            };

            println!("── {} ──", document.title());
            let mut stdout = std::io::stdout();
            let outcome = reveal_into(&generated.content, config.reveal_options(), &cancel, |command| {
                if let CanvasCommand::Reveal { text, .. } = &command {
                    let shown = document.content().len();
                    let _ = write!(stdout, "{}", &text[shown.min(text.len())..]);
                    let _ = stdout.flush();
                }
                document.apply(command);
            })
            .await;
            ctrl_c.abort();
            println!();

            if outcome == RevealOutcome::Cancelled {
                println!("(stopped)");
                return Ok(());
            }

            let scratch = FileScratchStore::new(expand_home(&config.ui.scratch_dir));
            scratch.save(&ScratchDraft::capture(&document))?;

            let dir = expand_home(&config.export.dir);
            std::fs::create_dir_all(&dir)?;
            let path = export_document(&document, DocumentFormat::Md, &dir)?;
            if let Some(turn) = assistant.conversation().last() {
                println!("{}", turn.content);
            }
            println!("{}\n", path.display());
        }
    }
    Ok(())
}

/// The localized empty/failed message, or the no-match message when the
/// filters hide every row
fn empty_or_failed<T>(state: &ViewState<T>, shown: usize, locale: Locale) -> Option<String> {
    match state.message() {
        Some(message) => Some(message.to_string()),
        None if shown == 0 => Some(locale.text(&Message::NoMatches)),
        None => None,
    }
}

fn print_orders(orders: &[&Order], locale: Locale) {
    println!(
        "{:<14} {:<16} {:>10} {:>6}  {:<10} {}",
        "Order", "Customer", "Amount", "Items", "Status", "Created"
    );
    println!("{}", "-".repeat(78));
    for o in orders {
        println!(
            "{:<14} {:<16} {:>10.2} {:>6}  {:<10} {}",
            o.order_number,
            o.customer_name,
            o.total_amount,
            o.items_count,
            o.status.label(locale),
            o.created_at.format("%Y-%m-%d")
        );
    }
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(path).to_path_buf(),
    }
}
