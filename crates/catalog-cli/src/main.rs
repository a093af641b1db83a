//! Command-line front end for the vehicle catalog.
//!
//! Bootstraps the store and drives the marketplace one command at a time.

mod config;

use clap::{Parser, Subcommand};
use tracing::info;

use catalog::{Decision, Marketplace, NewVehicle, Registration};
use catalog_core::{AdStatus, Advertisement, Role};
use catalog_db::{seed, stats, Database, DatabaseError};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Vehicle catalog: users, vehicles and advertisements")]
struct Args {
    /// SQLite database URL. Falls back to CATALOG_DATABASE_URL.
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the schema and the default administrator
    Init {
        /// Drop every table first
        #[arg(long)]
        reset: bool,

        /// Insert the demonstration catalog
        #[arg(long)]
        with_data: bool,
    },

    /// Show row counts
    Stats {
        #[arg(long)]
        json: bool,
    },

    /// Register a user
    Register {
        /// admin, anunciante (advertiser) or cliente (client)
        #[arg(long)]
        role: Role,
        #[arg(long)]
        cpf: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Required for advertisers
        #[arg(long)]
        phone: Option<String>,
        /// Admins only (defaults to the next free id)
        #[arg(long)]
        admin_id: Option<i64>,
    },

    /// Check credentials and mark the user logged in
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Add a vehicle
    AddVehicle {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        year: i32,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        mileage: i32,
        /// Owning advertiser's user id
        #[arg(long)]
        owner: Option<i64>,
    },

    /// Publish an advertisement for a vehicle
    CreateAd {
        #[arg(long)]
        owner: i64,
        #[arg(long)]
        vehicle: i64,
    },

    /// List advertisements
    ListAds {
        /// Pendente, Aprovado or Rejeitado
        #[arg(long)]
        status: Option<AdStatus>,
        #[arg(long)]
        owner: Option<i64>,
        #[arg(long)]
        json: bool,
    },

    /// Approve a pending advertisement
    Approve {
        #[arg(long)]
        admin: i64,
        #[arg(long)]
        ad: i64,
    },

    /// Reject a pending advertisement
    Reject {
        #[arg(long)]
        admin: i64,
        #[arg(long)]
        ad: i64,
    },

    /// Search approved advertisements by brand or model
    Search {
        #[arg(long)]
        client: i64,
        text: String,
    },

    /// Show a client's search history
    History {
        #[arg(long)]
        client: i64,
    },
}

fn allowed<T>(decision: Decision<T>) -> Result<T, Box<dyn std::error::Error>> {
    match decision {
        Decision::Allowed(value) => Ok(value),
        Decision::Denied(denial) => Err(format!("denied: {}", denial).into()),
    }
}

fn print_ads(ads: &[Advertisement]) {
    if ads.is_empty() {
        println!("No advertisements.");
    }
    for ad in ads {
        println!("{}", ad.summary());
    }
}

async fn init(db: &Database, reset: bool, with_data: bool) -> Result<(), Box<dyn std::error::Error>> {
    if reset {
        db.reset().await?;
    }
    db.migrate().await?;

    match seed::create_default_admin(db).await {
        Ok(_) => println!("Default admin: {} / {}", seed::DEFAULT_ADMIN_EMAIL, seed::DEFAULT_ADMIN_PASSWORD),
        Err(DatabaseError::AlreadyExists { .. }) => info!("Default admin already present"),
        Err(e) => return Err(e.into()),
    }

    if with_data {
        seed::insert_sample_data(db).await?;
    }

    println!("{}", stats::collect(db.pool()).await?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::from_env()?;
    let database_url = args.database_url.unwrap_or(config.database_url);

    let db = Database::connect_with_pool_size(&database_url, config.pool_size).await?;

    let outcome = run(&db, args.command).await;
    db.close().await;
    outcome
}

async fn run(db: &Database, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    if let Command::Init { reset, with_data } = command {
        return init(db, reset, with_data).await;
    }

    db.migrate().await?;
    let market = Marketplace::new(db.clone());

    match command {
        Command::Init { .. } => {}
        Command::Stats { json } => {
            let stats = stats::collect(db.pool()).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", stats);
            }
        }
        Command::Register {
            role,
            cpf,
            name,
            email,
            password,
            phone,
            admin_id,
        } => {
            let mut registration = Registration::new(role, cpf, name, email, password);
            registration.phone = phone;
            registration.admin_id = admin_id;
            let user = market.register(registration).await?;
            println!("Registered user {}", user.id());
            println!("{}", user.exhibit_profile());
        }
        Command::Login { email, password } => match market.login(&email, &password).await? {
            Some(user) => {
                println!("Welcome, {} ({})", user.name(), user.role().display_name());
            }
            None => return Err("invalid email or password".into()),
        },
        Command::AddVehicle {
            brand,
            model,
            year,
            price,
            mileage,
            owner,
        } => {
            let mut new = NewVehicle::new(brand, model, year, price, mileage);
            new.owner_id = owner;
            let vehicle = allowed(market.create_vehicle(new).await?)?;
            println!("{}", vehicle.describe());
        }
        Command::CreateAd { owner, vehicle } => {
            let ad = allowed(market.create_advertisement(owner, vehicle).await?)?;
            println!("{}", ad.summary());
        }
        Command::ListAds { status, owner, json } => {
            let ads = market.list_advertisements(status, owner).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&ads)?);
            } else {
                print_ads(&ads);
            }
        }
        Command::Approve { admin, ad } => {
            let ad = allowed(market.approve(admin, ad).await?)?;
            println!("{}", ad.summary());
        }
        Command::Reject { admin, ad } => {
            let ad = allowed(market.reject(admin, ad).await?)?;
            println!("{}", ad.summary());
        }
        Command::Search { client, text } => {
            let hits = allowed(market.search(client, &text).await?)?;
            print_ads(&hits);
        }
        Command::History { client } => {
            let entries = allowed(market.history(client).await?)?;
            if entries.is_empty() {
                println!("No searches yet.");
            }
            for entry in entries {
                println!("{}  {}", entry.searched_at, entry.filter);
            }
        }
    }

    Ok(())
}
