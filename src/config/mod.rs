use crate::shared::{AppError, AppResult};

/// Fixed set of expense categories.
///
/// The labels double as the reply-keyboard buttons shown during the entry
/// flow, so user input is matched against them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Food,
    Transport,
    Clothing,
    Electronics,
    Car,
    Household,
    Health,
    Other,
}

impl Category {
    /// All categories, in menu order.
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Clothing,
        Category::Electronics,
        Category::Car,
        Category::Household,
        Category::Health,
        Category::Other,
    ];

    /// Button label for this category.
    pub fn label(self) -> &'static str {
        match self {
            Category::Food => "🍔 Food",
            Category::Transport => "🚕 Transport",
            Category::Clothing => "👕 Clothing",
            Category::Electronics => "📱 Electronics",
            Category::Car => "🚗 Car",
            Category::Household => "🏠 Household",
            Category::Health => "💊 Health",
            Category::Other => "📦 Other",
        }
    }

    /// Example descriptions shown when this category is picked.
    pub fn examples(self) -> &'static str {
        match self {
            Category::Food => "burger, plov, pepsi, breakfast",
            Category::Transport => "taxi, metro, bus fare, toll",
            Category::Clothing => "t-shirt, trousers, sneakers, coat",
            Category::Electronics => "phone, charger, tablet, headphones",
            Category::Car => "fuel, repair, car wash, parking",
            Category::Household => "lamp, carpet, kitchenware",
            Category::Health => "medicine, vitamins, doctor, tests",
            Category::Other => "gift, charity, toys, books",
        }
    }

    /// Resolves a button label back to its category. Exact match only.
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.label() == label)
    }
}

/// Input limits enforced by the entry flow and pagination.
#[derive(Debug, Clone)]
pub struct Limits {
    /// Amount ceiling, inclusive.
    pub max_amount: f64,
    /// Maximum description length in characters.
    pub max_description_len: usize,
    /// Page size for the full expense listing.
    pub expenses_per_page: usize,
    /// Page size for the detail section of period reports.
    pub report_per_page: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_amount: 1_000_000_000.0,
            max_description_len: 200,
            expenses_per_page: 5,
            report_per_page: 5,
        }
    }
}

/// Bot configuration loaded once at startup.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram bot API token.
    pub bot_token: String,
    /// Connection string for the primary backend. When absent the bot goes
    /// straight to the fallback backend.
    pub database_url: Option<String>,
    /// Path of the fallback SQLite database file.
    pub sqlite_path: String,
    /// Log filter applied when RUST_LOG is not set.
    pub log_level: String,
    pub limits: Limits,
}

impl BotConfig {
    /// Loads configuration from the environment.
    ///
    /// `BOT_TOKEN` is required; everything else has a default. Call after
    /// `dotenv::dotenv()` so a local `.env` file is honored.
    pub fn from_env() -> AppResult<Self> {
        let bot_token = std::env::var("BOT_TOKEN")
            .map_err(|_| AppError::configuration("BOT_TOKEN is not set"))?;

        let database_url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        let sqlite_path =
            std::env::var("SQLITE_PATH").unwrap_or_else(|_| "expenses.db".to_string());

        let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| {
            if cfg!(debug_assertions) {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

        Ok(Self {
            bot_token,
            database_url,
            sqlite_path,
            log_level,
            limits: Limits::default(),
        })
    }
}

/// Initializes the logging system.
///
/// `RUST_LOG` wins when set; otherwise the configured level is used.
pub fn init_logging(log_level: &str) {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level),
    )
    .init();
}
