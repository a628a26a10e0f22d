use envconfig::Envconfig;

#[derive(Debug, Clone, Envconfig)]
pub struct StoreConfig {
    #[envconfig(from = "DATABASE_PATH", default = "studygroups.db")]
    pub database_path: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<StoreConfig, envconfig::Error> {
        dotenv::dotenv().ok();
        StoreConfig::init_from_env()
    }
}
