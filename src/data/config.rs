/// Contains environment variables and other configurations.
#[derive(Debug)]
pub struct Config {
    pub yt_dlp_path: String,

    pub discord_token: String,
}

impl Config {
    fn get_env(key: &str) -> String {
        std::env::var(key).unwrap_or_else(|_| panic!("{} must be set.", key))
    }

    pub fn init() -> Self {
        Self {
            yt_dlp_path: {
                let path = Self::get_env("YT_DLP_PATH");
                if path.is_empty() {
                    tracing::error!("YT_DLP_PATH is empty");
                    std::process::exit(1);
                }
                if !std::path::Path::new(&path).exists() {
                    tracing::error!("YT_DLP_PATH points to a non-existing path");
                    std::process::exit(1);
                }
                path
            },
            discord_token: {
                let token = Self::get_env("DISCORD_TOKEN");
                if token.is_empty() {
                    tracing::error!("DISCORD_TOKEN is empty");
                    std::process::exit(1);
                }
                token
            },
        }
    }
}
