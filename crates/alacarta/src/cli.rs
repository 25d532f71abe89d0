//! Command-line front end
//!
//! One process acts as one tab: it hydrates the admin store from the shared
//! storage directory, runs one command and exits (`watch` keeps running).

use alacarta::cart::{item_price, CartAction, CartItem, CartStore, CartTotals, MediaType, PaymentType};
use alacarta::checkout::{self, CustomerInfo, DeliveryChoice, Order};
use alacarta::state::{NewDeliveryZone, NewNovel, PriceConfig};
use alacarta::Store;
use alacarta_config::AppConfig;
use alacarta_storage::FileStorage;
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "alacarta", about = "TV a la Carta admin and storefront CLI", long_about = None)]
pub struct Cli {
    /// Mirror log output to stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the admin state summary
    Show,
    /// Log in as administrator
    Login { username: String, password: String },
    Logout,
    /// Replace the price configuration (unset values keep their current value)
    Prices(PricesArgs),
    /// Manage delivery zones
    #[command(subcommand)]
    Zone(ZoneCommand),
    /// Manage the novel catalog
    #[command(subcommand)]
    Novel(NovelCommand),
    #[command(subcommand)]
    Notifications(NotificationsCommand),
    /// Simulated sync with the remote
    Sync,
    /// Write the system export archive
    Export {
        /// Target directory (defaults to the configured export dir)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Replace prices, zones and novels with those of an export archive
    Restore {
        /// Archive written by `export`
        archive: PathBuf,
    },
    /// Follow changes made by other tabs until Ctrl-C
    Watch,
    #[command(subcommand)]
    Cart(CartCommand),
    /// Build the order and print its message and WhatsApp link
    Checkout(CheckoutArgs),
}

#[derive(Debug, Args)]
struct PricesArgs {
    #[arg(long)]
    movie: Option<u32>,
    /// Price per season
    #[arg(long)]
    series: Option<u32>,
    /// Transfer surcharge in percent
    #[arg(long)]
    transfer_fee: Option<u32>,
    /// Novel price per chapter
    #[arg(long)]
    novel_chapter: Option<u32>,
}

#[derive(Debug, Subcommand)]
enum ZoneCommand {
    Add {
        name: String,
        cost: u32,
        #[arg(long)]
        inactive: bool,
    },
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        cost: Option<u32>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: u64,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum NovelCommand {
    Add {
        title: String,
        genre: String,
        chapters: u32,
        year: i32,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        genre: Option<String>,
        #[arg(long)]
        chapters: Option<u32>,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: u64,
    },
    List,
}

#[derive(Debug, Subcommand)]
enum NotificationsCommand {
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    Clear,
}

#[derive(Debug, Subcommand)]
enum CartCommand {
    Add {
        /// movie or tv
        media_type: MediaType,
        id: u64,
        title: String,
        /// Selected seasons, comma separated
        #[arg(long, value_delimiter = ',')]
        seasons: Vec<u32>,
    },
    Remove {
        id: u64,
    },
    Seasons {
        id: u64,
        #[arg(value_delimiter = ',', required = true)]
        seasons: Vec<u32>,
    },
    Payment {
        id: u64,
        /// cash or transfer
        payment_type: PaymentType,
    },
    Clear,
    Show,
}

#[derive(Debug, Args)]
struct CheckoutArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    address: String,
    /// Delivery zone id; pickup when omitted
    #[arg(long)]
    zone: Option<u64>,
}

/// Everything a command may touch
pub struct App {
    pub config: AppConfig,
    pub store: Store,
    pub storage: Arc<FileStorage>,
}

impl Cli {
    pub async fn run(self, app: &mut App) -> Result<()> {
        match self.command {
            Commands::Show => show(&app.store),
            Commands::Login { username, password } => {
                if app.store.login(&username, &password) {
                    println!("Sesión iniciada como {}", username);
                } else {
                    bail!("Credenciales incorrectas");
                }
            }
            Commands::Logout => {
                app.store.logout();
                println!("Sesión cerrada");
            }
            Commands::Prices(args) => update_prices(&mut app.store, args)?,
            Commands::Zone(command) => zone(&mut app.store, command)?,
            Commands::Novel(command) => novel(&mut app.store, command)?,
            Commands::Notifications(command) => notifications(&mut app.store, command),
            Commands::Sync => {
                if app.store.sync_with_remote().await {
                    println!("Sincronización completada");
                } else {
                    bail!("Error de sincronización");
                }
            }
            Commands::Export { dir } => {
                let dir = dir.unwrap_or_else(|| app.config.export_dir.clone());
                match app.store.export_system_backup(&dir).await {
                    Some(path) => println!("Exportado: {}", path.display()),
                    None => bail!("Error al exportar el sistema"),
                }
            }
            Commands::Restore { archive } => {
                require_login(&app.store)?;
                if app.store.restore_system_backup(&archive).await {
                    println!("Restaurado desde {}", archive.display());
                } else {
                    bail!("Error al restaurar el sistema");
                }
            }
            Commands::Watch => watch(&mut app.store).await?,
            Commands::Cart(command) => cart(app, command),
            Commands::Checkout(args) => place_order(app, args)?,
        }
        Ok(())
    }
}

fn require_login(store: &Store) -> Result<()> {
    if !store.state().is_authenticated {
        bail!("Inicie sesión primero: alacarta login <usuario> <contraseña>");
    }
    Ok(())
}

fn show(store: &Store) {
    let state = store.state();
    let prices = &state.prices;
    println!(
        "Sesión: {}",
        if state.is_authenticated { "administrador" } else { "anónima" }
    );
    println!(
        "Precios: película ${} | serie ${}/temporada | transferencia {}% | novela ${}/capítulo",
        prices.movie_price,
        prices.series_price,
        prices.transfer_fee_percentage,
        prices.novel_price_per_chapter
    );
    println!("Zonas de entrega: {}", state.delivery_zones.len());
    println!("Novelas: {}", state.novels.len());
    println!("Notificaciones: {}", state.notifications.len());
    let status = &state.sync_status;
    println!(
        "Sync: {} | cambios pendientes: {} | última: {}",
        if status.is_online { "en línea" } else { "sin conexión" },
        status.pending_changes,
        status
            .last_sync
            .map_or_else(|| "nunca".to_string(), |t| t.to_rfc3339())
    );
    if let Some(backup) = state.last_backup {
        println!("Último respaldo: {}", backup.to_rfc3339());
    }
}

fn update_prices(store: &mut Store, args: PricesArgs) -> Result<()> {
    require_login(store)?;
    let current = store.state().prices;
    let prices = PriceConfig {
        movie_price: args.movie.unwrap_or(current.movie_price),
        series_price: args.series.unwrap_or(current.series_price),
        transfer_fee_percentage: args.transfer_fee.unwrap_or(current.transfer_fee_percentage),
        novel_price_per_chapter: args.novel_chapter.unwrap_or(current.novel_price_per_chapter),
    };
    store.update_prices(prices);
    println!("Precios actualizados");
    Ok(())
}

fn zone(store: &mut Store, command: ZoneCommand) -> Result<()> {
    match command {
        ZoneCommand::List => {
            for zone in &store.state().delivery_zones {
                println!(
                    "{}\t{}\t${} CUP{}",
                    zone.id,
                    zone.name,
                    zone.cost,
                    if zone.active { "" } else { "\t(inactiva)" }
                );
            }
        }
        ZoneCommand::Add {
            name,
            cost,
            inactive,
        } => {
            require_login(store)?;
            let zone = NewDeliveryZone {
                name,
                cost,
                active: !inactive,
            };
            if let Some(id) = store.add_delivery_zone(zone) {
                println!("Zona agregada: {}", id);
            }
        }
        ZoneCommand::Update {
            id,
            name,
            cost,
            active,
        } => {
            require_login(store)?;
            let Some(mut zone) = store.state().find_delivery_zone(id).cloned() else {
                bail!("Zona {} no encontrada", id);
            };
            if let Some(name) = name {
                zone.name = name;
            }
            if let Some(cost) = cost {
                zone.cost = cost;
            }
            if let Some(active) = active {
                zone.active = active;
            }
            store.update_delivery_zone(zone);
            println!("Zona actualizada: {}", id);
        }
        ZoneCommand::Delete { id } => {
            require_login(store)?;
            let known = store.state().find_delivery_zone(id).is_some();
            store.delete_delivery_zone(id);
            if !known {
                bail!("Zona {} no encontrada", id);
            }
            println!("Zona eliminada: {}", id);
        }
    }
    Ok(())
}

fn novel(store: &mut Store, command: NovelCommand) -> Result<()> {
    match command {
        NovelCommand::List => {
            let prices = store.state().prices;
            for novel in &store.state().novels {
                println!(
                    "{}\t{} ({})\t{}\t{} capítulos\t${} CUP",
                    novel.id,
                    novel.title,
                    novel.year,
                    novel.genre,
                    novel.chapters,
                    prices.novel_cost(novel.chapters)
                );
            }
        }
        NovelCommand::Add {
            title,
            genre,
            chapters,
            year,
            description,
        } => {
            require_login(store)?;
            let mut novel = NewNovel::new(title, genre, chapters, year);
            if let Some(description) = description {
                novel = novel.with_description(description);
            }
            if let Some(id) = store.add_novel(novel) {
                println!("Novela agregada: {}", id);
            }
        }
        NovelCommand::Update {
            id,
            title,
            genre,
            chapters,
            year,
            description,
            active,
        } => {
            require_login(store)?;
            let Some(mut novel) = store.state().find_novel(id).cloned() else {
                bail!("Novela {} no encontrada", id);
            };
            if let Some(title) = title {
                novel.title = title;
            }
            if let Some(genre) = genre {
                novel.genre = genre;
            }
            if let Some(chapters) = chapters {
                novel.chapters = chapters;
            }
            if let Some(year) = year {
                novel.year = year;
            }
            if description.is_some() {
                novel.description = description;
            }
            if let Some(active) = active {
                novel.active = active;
            }
            store.update_novel(novel);
            println!("Novela actualizada: {}", id);
        }
        NovelCommand::Delete { id } => {
            require_login(store)?;
            let known = store.state().find_novel(id).is_some();
            store.delete_novel(id);
            if !known {
                bail!("Novela {} no encontrada", id);
            }
            println!("Novela eliminada: {}", id);
        }
    }
    Ok(())
}

fn notifications(store: &mut Store, command: NotificationsCommand) {
    match command {
        NotificationsCommand::List { limit } => {
            for notification in store.state().notifications.iter().take(limit) {
                println!(
                    "{} {} [{}] {}: {}",
                    notification.kind.emoji(),
                    notification.timestamp.format("%Y-%m-%d %H:%M:%S"),
                    notification.section,
                    notification.title,
                    notification.message
                );
            }
        }
        NotificationsCommand::Clear => {
            store.clear_notifications();
            println!("Notificaciones limpiadas");
        }
    }
}

async fn watch(store: &mut Store) -> Result<()> {
    let mut changes = store.change_feed().subscribe();
    let mut tick = tokio::time::interval(std::time::Duration::from_millis(250));
    let mut applied = store.state().applied_sequence;
    println!("Escuchando cambios (Ctrl-C para salir)...");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("Watch interrupted");
                break;
            }
            _ = tick.tick() => {
                store.process_pending();
                let state = store.state();
                if state.applied_sequence != applied {
                    applied = state.applied_sequence;
                    println!(
                        "#{}: precios película ${} | {} zonas | {} novelas | {} notificaciones",
                        applied,
                        state.prices.movie_price,
                        state.delivery_zones.len(),
                        state.novels.len(),
                        state.notifications.len()
                    );
                }
            }
            Ok(event) = changes.recv() => {
                println!("admin_state_change: {}", event.change);
            }
        }
    }

    store.transport().destroy();
    Ok(())
}

fn cart(app: &mut App, command: CartCommand) {
    let mut cart = CartStore::open(Arc::clone(&app.storage));
    let action = match command {
        CartCommand::Show => None,
        CartCommand::Add {
            media_type,
            id,
            title,
            seasons,
        } => {
            let mut item = match media_type {
                MediaType::Movie => CartItem::movie(id, title),
                MediaType::Tv => CartItem::series(id, title),
            };
            if !seasons.is_empty() {
                item = item.with_seasons(seasons);
            }
            Some(CartAction::Add(item))
        }
        CartCommand::Remove { id } => Some(CartAction::Remove(id)),
        CartCommand::Seasons { id, seasons } => Some(CartAction::UpdateSeasons { id, seasons }),
        CartCommand::Payment { id, payment_type } => {
            Some(CartAction::UpdatePaymentType { id, payment_type })
        }
        CartCommand::Clear => Some(CartAction::Clear),
    };
    if let Some(action) = action {
        cart.dispatch(action);
    }

    let prices = app.store.state().prices;
    for item in &cart.state().items {
        println!(
            "{}\t{}\t{}\t{}\t${} CUP",
            item.id,
            item.media_type,
            item.title,
            item.payment_type,
            item_price(item, &prices)
        );
    }
    let totals = CartTotals::compute(cart.state(), &prices);
    println!(
        "Efectivo: ${} | Transferencia: ${} | Total: ${} CUP",
        totals.cash,
        totals.transfer,
        totals.total()
    );
}

fn place_order(app: &mut App, args: CheckoutArgs) -> Result<()> {
    let cart = CartStore::open(Arc::clone(&app.storage));
    if cart.state().is_empty() {
        bail!("El carrito está vacío");
    }

    let state = app.store.state();
    let delivery = match args.zone {
        Some(id) => DeliveryChoice::home(state, id),
        None => DeliveryChoice::Pickup,
    };
    let customer = CustomerInfo {
        full_name: args.name,
        phone: args.phone,
        address: args.address,
    };

    match Order::build(&customer, &delivery, cart.state(), &state.prices, chrono::Utc::now()) {
        Ok(order) => {
            let message = order.message();
            println!("{}\n", message);
            println!(
                "{}",
                checkout::whatsapp_url(&app.config.whatsapp_number, &message)
            );
            Ok(())
        }
        Err(errors) => {
            for (field, message) in &errors {
                eprintln!("{}: {}", field, message);
            }
            if args.zone.is_some() {
                eprintln!("Zonas disponibles:");
                for zone in checkout::available_zones(state) {
                    eprintln!("  {}\t{}\t${} CUP", zone.id, zone.name, zone.cost);
                }
            }
            bail!("Datos de entrega incompletos");
        }
    }
}
