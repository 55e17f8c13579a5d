use bourse_core::analysis::entity::SmaWindow;
use bourse_core::common::time::FakeClockProvider;
use bourse_core::common::{HistoryRange, ListKind, Period, Symbol, parse_symbol_input};
use bourse_core::config::DashboardConfig;
use bourse_core::market::entity::{AnnualDividend, DividendEvent, PricePoint, PriceSeries};
use bourse_core::store::error::StoreError;
use bourse_core::store::port::{ThresholdMap, ThresholdStore};
use bourse_core::testing::{MemListStore, MemThresholdStore, StaticProvider};
use bourse_manager::dashboard::{ChartRequest, DashboardManager, ManagerError, Marker};
use chrono::{Days, TimeZone, Utc};
use rust_decimal_macros::dec;
use std::sync::Arc;

/// 从 2024-01-01（周一）起，每周一条周三的日线，收盘价依次取 `closes`。
fn weekly_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    let wednesday = Utc.with_ymd_and_hms(2024, 1, 3, 17, 30, 0).unwrap();
    let points = closes
        .iter()
        .enumerate()
        .map(|(week, &close)| PricePoint {
            time: wednesday
                .checked_add_days(Days::new(u64::try_from(week).unwrap() * 7))
                .unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: None,
        })
        .collect();
    PriceSeries::new(Symbol::new(symbol), points)
}

fn dividend(y: i32, m: u32, amount: f64) -> DividendEvent {
    DividendEvent {
        time: Utc.with_ymd_and_hms(y, m, 15, 0, 0, 0).unwrap(),
        amount,
        utc_offset: 0,
    }
}

struct Fixture {
    provider: Arc<StaticProvider>,
    manager: Arc<DashboardManager>,
}

fn fixture() -> Fixture {
    let provider = Arc::new(
        StaticProvider::new()
            .with_prices(weekly_series("TTE.PA", &[10.0, 10.0, 10.0, 10.0, 12.0, 14.0]))
            .with_prices(weekly_series("ORA.PA", &[8.0, 9.0, 10.0, 11.0, 12.0, 13.0]))
            .with_prices(weekly_series("^FCHI", &[5.0, 5.0, 5.0, 0.0]))
            .with_dividends(
                "TTE.PA",
                vec![dividend(2023, 6, 3.0), dividend(2024, 3, 1.0), dividend(2024, 9, 1.5)],
            )
            .with_dividends("ORA.PA", vec![dividend(2023, 6, 0.7)]),
    );

    let lists = MemListStore::new()
        .with_list(ListKind::Stock, &["TTE.PA", "MISSING", "ORA.PA"])
        .with_list(ListKind::Etf, &["^FCHI", "TTE.PA"]);

    let mut thresholds = ThresholdMap::new();
    thresholds.insert(Symbol::new("TTE.PA"), 50.0);
    thresholds.insert(Symbol::new("ORA.PA"), 10.0);

    let config = DashboardConfig {
        core_symbols: vec![Symbol::new("TTE.PA")],
        watch_symbols: vec![Symbol::new("ORA.PA")],
        ..DashboardConfig::default()
    };

    let manager = DashboardManager::new(
        provider.clone(),
        Arc::new(lists),
        Arc::new(MemThresholdStore::new(thresholds)),
        Arc::new(FakeClockProvider::new(
            Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap(),
        )),
        config,
    );
    Fixture { provider, manager }
}

/// 读取总是失败的阈值存储，模拟损坏或无权限的文件。
struct UnreadableThresholds;

#[async_trait::async_trait]
impl ThresholdStore for UnreadableThresholds {
    async fn load(&self) -> Result<ThresholdMap, StoreError> {
        Err(StoreError::Io("permission denied".to_string()))
    }

    async fn save(&self, _thresholds: &ThresholdMap) -> Result<(), StoreError> {
        Err(StoreError::Io("permission denied".to_string()))
    }
}

fn request(sma: Option<usize>, reference: Option<&str>) -> ChartRequest {
    ChartRequest {
        range: HistoryRange::Period(Period::Year1),
        sma: sma.map(|w| SmaWindow::new(w).unwrap()),
        reference: reference.map(Symbol::new),
    }
}

#[tokio::test]
async fn test_candlestick_panels_keep_list_order_and_warn() -> anyhow::Result<()> {
    let fx = fixture();
    let batch = fx
        .manager
        .candlestick_panels(ListKind::Stock, &request(Some(5), None))
        .await?;

    let symbols: Vec<&str> = batch.panels.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["TTE.PA", "ORA.PA"]);
    assert_eq!(batch.warnings.len(), 1);
    assert_eq!(batch.warnings[0].symbol, Symbol::new("MISSING"));

    let tte = &batch.panels[0];
    assert_eq!(tte.marker, Marker::Core);
    assert_eq!(tte.threshold, Some(50.0));
    assert_eq!(tte.bars.len(), 6);
    let sma = tte.moving_average.as_ref().unwrap();
    assert_eq!(sma.len(), 6);
    assert!(sma[..4].iter().all(|p| p.value.is_none()));
    assert!((sma[4].value.unwrap() - 10.4).abs() < 1e-9);
    assert!(tte.differential.is_none());

    // 参考年份 2024：2.5 / 50 → 5.00%
    assert_eq!(tte.dividend_yield, Some(dec!(5.00)));
    // ORA.PA 在 2024 年没有派息
    assert_eq!(batch.panels[1].marker, Marker::Watch);
    assert_eq!(batch.panels[1].dividend_yield, None);
    Ok(())
}

#[tokio::test]
async fn test_candlestick_panel_without_sma() -> anyhow::Result<()> {
    let fx = fixture();
    let batch = fx
        .manager
        .candlestick_panels(ListKind::Stock, &request(None, None))
        .await?;
    assert!(batch.panels.iter().all(|p| p.moving_average.is_none()));
    Ok(())
}

#[tokio::test]
async fn test_differential_overlay_skips_reference_itself() -> anyhow::Result<()> {
    let fx = fixture();
    let batch = fx
        .manager
        .candlestick_panels(ListKind::Etf, &request(Some(5), Some("^FCHI")))
        .await?;

    assert_eq!(batch.panels.len(), 2);
    assert!(batch.panels[0].differential.is_none());

    let overlay = batch.panels[1].differential.as_ref().unwrap();
    assert_eq!(overlay.reference, Symbol::new("^FCHI"));
    // 第 4 周参考收盘为 0，该点被剔除；第 5、6 周参考无数据
    let ratios: Vec<f64> = overlay.points.iter().map(|p| p.ratio).collect();
    assert_eq!(ratios, vec![2.0, 2.0, 2.0]);
    let sma = overlay.moving_average.as_ref().unwrap();
    assert_eq!(sma.len(), 3);
    assert!(sma.iter().all(|p| p.value.is_none()));
    Ok(())
}

#[tokio::test]
async fn test_missing_reference_drops_overlay_only() -> anyhow::Result<()> {
    let fx = fixture();
    let batch = fx
        .manager
        .candlestick_panels(ListKind::Stock, &request(None, Some("NOPE")))
        .await?;
    assert_eq!(batch.panels.len(), 2);
    assert!(batch.panels.iter().all(|p| p.differential.is_none()));
    Ok(())
}

#[tokio::test]
async fn test_differential_panels() -> anyhow::Result<()> {
    let fx = fixture();
    let batch = fx
        .manager
        .differential_panels(ListKind::Stock, &request(Some(5), Some("TTE.PA")))
        .await?;

    let symbols: Vec<&str> = batch.panels.iter().map(|p| p.symbol.as_str()).collect();
    assert_eq!(symbols, vec!["ORA.PA"]);
    assert_eq!(batch.warnings.len(), 1);

    let panel = &batch.panels[0];
    assert_eq!(panel.reference, Symbol::new("TTE.PA"));
    assert_eq!(panel.points.len(), 6);
    assert!((panel.points[0].ratio - 0.8).abs() < 1e-9);
    assert!(panel.moving_average.as_ref().unwrap()[4].value.is_some());
    Ok(())
}

#[tokio::test]
async fn test_differential_panels_require_reference() {
    let fx = fixture();
    let result = fx
        .manager
        .differential_panels(ListKind::Stock, &request(Some(5), None))
        .await;
    assert!(matches!(result, Err(ManagerError::MissingReference)));

    let result = fx
        .manager
        .differential_panels(ListKind::Stock, &request(Some(5), Some("NOPE")))
        .await;
    assert!(matches!(result, Err(ManagerError::Market(_))));
}

#[tokio::test]
async fn test_dividends_and_yields() -> anyhow::Result<()> {
    let fx = fixture();

    let annual = fx.manager.annual_dividends(&Symbol::new("TTE.PA")).await?;
    assert_eq!(
        annual,
        vec![
            AnnualDividend { year: 2023, total: 3.0 },
            AnnualDividend { year: 2024, total: 2.5 },
        ]
    );

    let table = fx.manager.dividend_yields().await?;
    assert_eq!(table.len(), 1);
    assert_eq!(table.get(&Symbol::new("TTE.PA")), Some(&dec!(5.00)));
    Ok(())
}

#[tokio::test]
async fn test_save_list_round_trip() -> anyhow::Result<()> {
    let fx = fixture();
    let saved = fx
        .manager
        .save_list(ListKind::Research, parse_symbol_input(" GC=F, ,^SPX "))
        .await?;
    assert_eq!(saved, vec![Symbol::new("GC=F"), Symbol::new("^SPX")]);
    assert_eq!(fx.manager.list(ListKind::Research).await?, saved);
    assert!(fx.manager.list(ListKind::Currency).await?.is_empty());
    assert_eq!(fx.provider.price_calls(), 0);
    Ok(())
}

#[tokio::test]
async fn test_unreadable_thresholds_degrade_to_empty() -> anyhow::Result<()> {
    let fx = fixture();
    let manager = DashboardManager::new(
        fx.provider.clone(),
        Arc::new(MemListStore::new().with_list(ListKind::Stock, &["TTE.PA", "ORA.PA"])),
        Arc::new(UnreadableThresholds),
        Arc::new(FakeClockProvider::new(
            Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap(),
        )),
        DashboardConfig::default(),
    );

    let batch = manager
        .candlestick_panels(ListKind::Stock, &request(Some(5), None))
        .await?;
    assert_eq!(batch.panels.len(), 2);
    assert!(batch.warnings.is_empty());
    assert!(batch.panels.iter().all(|p| p.threshold.is_none() && p.dividend_yield.is_none()));

    assert!(manager.dividend_yields().await?.is_empty());

    // 直接读取阈值时仍然报告错误
    assert!(matches!(
        manager.load_thresholds().await,
        Err(ManagerError::Store(_))
    ));
    Ok(())
}
