use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Path to the catalog CSV file
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// Path to the per-user selections store
    #[serde(default = "default_selections_path")]
    pub selections_path: String,

    /// Path to the per-user ratings store
    #[serde(default = "default_ratings_path")]
    pub ratings_path: String,

    /// Path to the user account store
    #[serde(default = "default_users_path")]
    pub users_path: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of genre blocks returned by ranking and recommendation endpoints
    #[serde(default = "default_top_genres")]
    pub top_genres: usize,

    /// Number of games per genre block
    #[serde(default = "default_top_games")]
    pub top_games: usize,

    /// Number of entries in the overall top list
    #[serde(default = "default_top_overall")]
    pub top_overall: usize,
}

fn default_catalog_path() -> String {
    "data/items.csv".to_string()
}

fn default_selections_path() -> String {
    "data/user_selections.json".to_string()
}

fn default_ratings_path() -> String {
    "data/user_ratings.json".to_string()
}

fn default_users_path() -> String {
    "data/users.json".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_top_genres() -> usize {
    10
}

fn default_top_games() -> usize {
    20
}

fn default_top_overall() -> usize {
    20
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            selections_path: default_selections_path(),
            ratings_path: default_ratings_path(),
            users_path: default_users_path(),
            host: default_host(),
            port: default_port(),
            top_genres: default_top_genres(),
            top_games: default_top_games(),
            top_overall: default_top_overall(),
        }
    }
}
