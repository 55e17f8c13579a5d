use bourse_core::config::AppConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;

// 配置文件路径的环境变量
const CONFIG_PATH_ENV: &str = "BOURSE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "bourse.toml";

/// # Summary
/// 加载应用配置。
///
/// # Logic
/// 1. 配置文件路径取自 `BOURSE_CONFIG`，缺省为 `bourse.toml`，文件可不存在。
/// 2. `BOURSE__SECTION__KEY` 形式的环境变量覆盖文件中的值。
/// 3. 未出现的字段使用 `AppConfig` 的默认值。
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_from(Path::new(&path))
}

/// 从指定文件加载配置，叠加环境变量覆盖。
pub fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from(path).required(false))
        .add_source(
            Environment::with_prefix("BOURSE")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("dashboard.reference_indices")
                .with_list_parse_key("dashboard.core_symbols")
                .with_list_parse_key("dashboard.watch_symbols")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bourse_core::common::{Period, Symbol};

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.dashboard.default_period, Period::Year5);
        assert_eq!(config.storage.thresholds_file, "action_values.txt");
    }

    #[test]
    fn test_file_overrides_selected_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bourse.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[storage]
data_dir = "/var/lib/bourse"

[storage.lists]
stock = "stocks.txt"

[dashboard]
default_period = "1y"
dividend_start_year = 2020
core_symbols = ["TTE.PA", "ORA.PA"]
"#,
        )
        .unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.storage.data_dir, "/var/lib/bourse");
        assert_eq!(config.storage.lists.stock, "stocks.txt");
        assert_eq!(config.storage.lists.etf, "etf_list.txt");
        assert_eq!(config.dashboard.default_period, Period::Year1);
        assert_eq!(config.dashboard.dividend_start_year, 2020);
        assert_eq!(
            config.dashboard.core_symbols,
            vec![Symbol::new("TTE.PA"), Symbol::new("ORA.PA")]
        );
        assert_eq!(config.dashboard.sma_window, 30);
    }
}
