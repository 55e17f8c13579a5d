use crate::common::{ListKind, Period, Symbol};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 全局应用配置
///
/// 由 app 层加载一次后按需拆分传入各组件，不存在进程级单例。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// # Summary
/// 平面文件存储配置。
///
/// # Invariants
/// - 所有文件名均相对于 `data_dir`。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: String,
    // 阈值（参考价）文件，格式 `TICKER:VALUE`
    pub thresholds_file: String,
    pub lists: ListFilesConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            thresholds_file: "action_values.txt".to_string(),
            lists: ListFilesConfig::default(),
        }
    }
}

impl StorageConfig {
    pub fn thresholds_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.thresholds_file)
    }

    pub fn list_path(&self, kind: ListKind) -> PathBuf {
        PathBuf::from(&self.data_dir).join(self.lists.file_name(kind))
    }

    /// 滚动日志目录
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join("logs")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListFilesConfig {
    pub etf: String,
    pub stock: String,
    pub currency: String,
    pub research: String,
}

impl Default for ListFilesConfig {
    fn default() -> Self {
        Self {
            etf: "etf_list.txt".to_string(),
            stock: "actions_list.txt".to_string(),
            currency: "devises_list.txt".to_string(),
            research: "recherche_list.txt".to_string(),
        }
    }
}

impl ListFilesConfig {
    pub fn file_name(&self, kind: ListKind) -> &str {
        match kind {
            ListKind::Etf => &self.etf,
            ListKind::Stock => &self.stock,
            ListKind::Currency => &self.currency,
            ListKind::Research => &self.research,
        }
    }
}

/// # Summary
/// 看板流水线参数。
///
/// # Invariants
/// - `sma_window` 需落在 `SmaWindow` 的合法区间内，否则加载后回退为默认值。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub default_period: Period,
    pub sma_window: usize,
    // 股息年度汇总的起始年份（包含）
    pub dividend_start_year: i32,
    // 可选的比值参考指数
    pub reference_indices: Vec<Symbol>,
    // 核心持仓标记列表
    pub core_symbols: Vec<Symbol>,
    // 观察标记列表
    pub watch_symbols: Vec<Symbol>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_period: Period::Year5,
            sma_window: 30,
            dividend_start_year: 2023,
            reference_indices: vec![
                Symbol::new("^FCHI"),
                Symbol::new("^STOXX50E"),
                Symbol::new("^SPX"),
            ],
            core_symbols: Vec::new(),
            watch_symbols: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self { timeout_secs: 10 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.storage.data_dir, "data");
        assert_eq!(config.dashboard.default_period, Period::Year5);
        assert_eq!(config.dashboard.sma_window, 30);
        assert_eq!(config.dashboard.dividend_start_year, 2023);
        assert_eq!(config.feed.timeout_secs, 10);
    }

    #[test]
    fn test_list_paths_resolve_under_data_dir() {
        let storage = StorageConfig {
            data_dir: "/srv/bourse".to_string(),
            ..StorageConfig::default()
        };
        assert_eq!(
            storage.list_path(ListKind::Stock),
            PathBuf::from("/srv/bourse/actions_list.txt")
        );
        assert_eq!(
            storage.thresholds_path(),
            PathBuf::from("/srv/bourse/action_values.txt")
        );
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"server": {"port": 9000}, "dashboard": {"sma_window": 20}}"#)
                .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.dashboard.sma_window, 20);
        assert_eq!(config.dashboard.reference_indices.len(), 3);
    }
}
