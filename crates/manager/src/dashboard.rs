use bourse_core::analysis::entity::{SmaWindow, YieldTable};
use bourse_core::analysis::error::AnalysisError;
use bourse_core::common::time::TimeProvider;
use bourse_core::common::{HistoryRange, ListKind, Symbol};
use bourse_core::config::DashboardConfig;
use bourse_core::market::entity::{
    AnnualDividend, DifferentialPoint, OverlayPoint, WeeklyBar,
};
use bourse_core::market::error::MarketError;
use bourse_core::market::port::MarketDataProvider;
use bourse_core::store::error::StoreError;
use bourse_core::store::port::{SymbolListStore, ThresholdMap, ThresholdStore};
use bourse_market::differential::differential;
use bourse_market::dividend::{annual_dividends, yield_table};
use bourse_market::indicator::{bar_moving_average, differential_moving_average};
use bourse_market::resample::resample_weekly;
use futures::future::join_all;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use utoipa::ToSchema;

/// # Summary
/// Manager 层的统一错误类型。
#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Market error: {0}")]
    Market(#[from] MarketError),
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
    #[error("A reference symbol is required")]
    MissingReference,
}

/// 代码的类别标记，决定界面标题前的色块。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Marker {
    Core,
    Watch,
    None,
}

/// # Summary
/// 图表批次请求参数。
#[derive(Debug, Clone, Default)]
pub struct ChartRequest {
    // 历史区间
    pub range: HistoryRange,
    // 为空时不生成移动平均
    pub sma: Option<SmaWindow>,
    // 比值参考代码
    pub reference: Option<Symbol>,
}

/// 叠加在 K 线面板上的比值曲线。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DifferentialOverlay {
    pub reference: Symbol,
    pub points: Vec<DifferentialPoint>,
    pub moving_average: Option<Vec<OverlayPoint>>,
}

/// # Summary
/// 单个代码的周 K 线面板。
///
/// # Invariants
/// - `moving_average` 与 `bars` 等长且日期一一对应。
/// - `differential` 的参考代码不等于 `symbol`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartPanel {
    pub symbol: Symbol,
    pub marker: Marker,
    pub bars: Vec<WeeklyBar>,
    pub moving_average: Option<Vec<OverlayPoint>>,
    // 阈值水平线
    pub threshold: Option<f64>,
    pub differential: Option<DifferentialOverlay>,
    // 股息率（百分比）
    #[schema(value_type = Option<f64>)]
    pub dividend_yield: Option<Decimal>,
}

/// 仅包含比值曲线的面板。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DifferentialPanel {
    pub symbol: Symbol,
    pub reference: Symbol,
    pub points: Vec<DifferentialPoint>,
    pub moving_average: Option<Vec<OverlayPoint>>,
}

/// 被跳过的代码及原因。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PanelWarning {
    pub symbol: Symbol,
    pub message: String,
}

/// # Summary
/// 一个列表的面板批次。
///
/// # Invariants
/// - `panels` 的顺序与列表文件中的顺序一致。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PanelBatch<T> {
    pub panels: Vec<T>,
    pub warnings: Vec<PanelWarning>,
}

impl<T> Default for PanelBatch<T> {
    fn default() -> Self {
        Self {
            panels: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl<T> PanelBatch<T> {
    fn collect(results: Vec<(Symbol, Result<T, ManagerError>)>) -> Self {
        let mut batch = Self::default();
        for (symbol, result) in results {
            match result {
                Ok(panel) => batch.panels.push(panel),
                Err(e) => {
                    warn!("Skipping panel for {}: {}", symbol, e);
                    batch.warnings.push(PanelWarning {
                        symbol,
                        message: e.to_string(),
                    });
                }
            }
        }
        batch
    }
}

/// # Summary
/// 一个批次内所有面板共享的注解数据。
#[derive(Debug, Clone, Default)]
pub struct PanelContext {
    pub thresholds: ThresholdMap,
    pub yields: YieldTable,
    // 参考代码及其周线，获取失败时为空
    pub reference: Option<(Symbol, Vec<WeeklyBar>)>,
}

/// # Summary
/// 看板应用服务，按列表驱动 重采样 → 指标 → 比值 → 股息率 流水线。
/// 编译期仅依赖 `bourse-core` 中的 Trait 定义，所有具体实现通过构造函数注入。
///
/// # Invariants
/// - 不持有可变状态，跨调用状态只存在于列表与阈值存储中。
/// - 单个代码失败只产生警告，不影响同批次其他代码。
pub struct DashboardManager {
    // 行情数据源（通常为带缓存的装饰器）
    provider: Arc<dyn MarketDataProvider>,
    // 代码列表存储
    lists: Arc<dyn SymbolListStore>,
    // 阈值存储
    thresholds: Arc<dyn ThresholdStore>,
    // 时钟，用于确定股息参考年份
    clock: Arc<dyn TimeProvider>,
    config: DashboardConfig,
}

impl DashboardManager {
    /// # Summary
    /// 创建 DashboardManager 实例。
    ///
    /// # Arguments
    /// * `provider` - 行情数据源。
    /// * `lists` - 代码列表存储。
    /// * `thresholds` - 阈值存储。
    /// * `clock` - 时间供给器。
    /// * `config` - 看板参数。
    ///
    /// # Returns
    /// * `Arc<Self>` - 可共享的管理器实例。
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        lists: Arc<dyn SymbolListStore>,
        thresholds: Arc<dyn ThresholdStore>,
        clock: Arc<dyn TimeProvider>,
        config: DashboardConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            provider,
            lists,
            thresholds,
            clock,
            config,
        })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// 配置中的移动平均窗口，越界时回退为默认值。
    pub fn default_window(&self) -> SmaWindow {
        SmaWindow::new(self.config.sma_window).unwrap_or_else(|e| {
            warn!("Configured SMA window rejected: {}", e);
            SmaWindow::default()
        })
    }

    /// 按配置生成默认请求：默认区间、默认窗口、无参考代码。
    pub fn default_request(&self) -> ChartRequest {
        ChartRequest {
            range: HistoryRange::Period(self.config.default_period),
            sma: Some(self.default_window()),
            reference: None,
        }
    }

    /// 股息率参考年份：时钟当前年份减一。
    pub fn reference_year(&self) -> i32 {
        self.clock.previous_year()
    }

    /// 可供选择的比值参考代码，按配置顺序。
    pub fn reference_options(&self) -> &[Symbol] {
        &self.config.reference_indices
    }

    /// 代码的类别标记，核心列表优先于观察列表。
    pub fn marker(&self, symbol: &Symbol) -> Marker {
        if self.config.core_symbols.contains(symbol) {
            Marker::Core
        } else if self.config.watch_symbols.contains(symbol) {
            Marker::Watch
        } else {
            Marker::None
        }
    }

    pub async fn list(&self, kind: ListKind) -> Result<Vec<Symbol>, ManagerError> {
        Ok(self.lists.load(kind).await?)
    }

    /// # Summary
    /// 保存列表。
    ///
    /// # Logic
    /// 丢弃空代码后整体覆盖写入，返回实际保存的列表。
    pub async fn save_list(
        &self,
        kind: ListKind,
        symbols: Vec<Symbol>,
    ) -> Result<Vec<Symbol>, ManagerError> {
        let symbols: Vec<Symbol> = symbols.into_iter().filter(|s| !s.is_empty()).collect();
        self.lists.save(kind, &symbols).await?;
        info!("Saved {} list with {} symbols", kind, symbols.len());
        Ok(symbols)
    }

    pub async fn load_thresholds(&self) -> Result<ThresholdMap, ManagerError> {
        Ok(self.thresholds.load().await?)
    }

    pub async fn save_thresholds(&self, thresholds: &ThresholdMap) -> Result<(), ManagerError> {
        self.thresholds.save(thresholds).await?;
        info!("Saved {} thresholds", thresholds.len());
        Ok(())
    }

    /// 批次内读取阈值，读取失败时降级为空映射。
    async fn thresholds_or_empty(&self) -> ThresholdMap {
        match self.thresholds.load().await {
            Ok(map) => map,
            Err(e) => {
                warn!("Thresholds unavailable, continuing without them: {}", e);
                ThresholdMap::new()
            }
        }
    }

    async fn weekly_bars(
        &self,
        symbol: &Symbol,
        range: &HistoryRange,
    ) -> Result<Vec<WeeklyBar>, ManagerError> {
        let series = self.provider.fetch_prices(symbol, range).await?;
        Ok(resample_weekly(&series))
    }

    /// # Summary
    /// 准备批次共享数据。
    ///
    /// # Logic
    /// 1. 读取阈值映射（失败时为空）并计算股息率表。
    /// 2. 若请求携带参考代码，获取其周线；失败时仅记录日志，叠加曲线随之省略。
    pub async fn panel_context(&self, request: &ChartRequest) -> Result<PanelContext, ManagerError> {
        let thresholds = self.thresholds_or_empty().await;
        let yields = self.yields_with(&thresholds).await?;

        let reference = match &request.reference {
            Some(symbol) => match self.weekly_bars(symbol, &request.range).await {
                Ok(bars) => Some((symbol.clone(), bars)),
                Err(e) => {
                    warn!("Reference {} unavailable, overlay dropped: {}", symbol, e);
                    None
                }
            },
            None => None,
        };

        Ok(PanelContext {
            thresholds,
            yields,
            reference,
        })
    }

    /// # Summary
    /// 生成单个代码的 K 线面板。
    ///
    /// # Logic
    /// 1. 获取价格并重采样为周线。
    /// 2. 按请求窗口计算移动平均。
    /// 3. 参考代码存在且不等于本代码时，叠加比值曲线及其移动平均。
    /// 4. 附加阈值、股息率与类别标记。
    ///
    /// # Returns
    /// 无数据时返回 `MarketError::NoDataAvailable`。
    pub async fn candlestick_panel(
        &self,
        symbol: &Symbol,
        request: &ChartRequest,
        context: &PanelContext,
    ) -> Result<ChartPanel, ManagerError> {
        let bars = self.weekly_bars(symbol, &request.range).await?;
        let moving_average = match request.sma {
            Some(window) => Some(bar_moving_average(&bars, window.get())?),
            None => None,
        };

        let differential = match &context.reference {
            Some((reference, reference_bars)) if reference != symbol => {
                let points = differential(&bars, reference_bars);
                let moving_average = match request.sma {
                    Some(window) => Some(differential_moving_average(&points, window.get())?),
                    None => None,
                };
                Some(DifferentialOverlay {
                    reference: reference.clone(),
                    points,
                    moving_average,
                })
            }
            _ => None,
        };

        Ok(ChartPanel {
            symbol: symbol.clone(),
            marker: self.marker(symbol),
            bars,
            moving_average,
            threshold: context.thresholds.get(symbol).copied(),
            differential,
            dividend_yield: context.yields.get(symbol).copied(),
        })
    }

    /// # Summary
    /// 并发生成整个列表的 K 线面板。
    ///
    /// # Logic
    /// 1. 读取列表并准备共享数据。
    /// 2. 每个代码一个 future，`join_all` 并发执行并保持列表顺序。
    /// 3. 失败的代码转为 `PanelWarning`。
    pub async fn candlestick_panels(
        &self,
        kind: ListKind,
        request: &ChartRequest,
    ) -> Result<PanelBatch<ChartPanel>, ManagerError> {
        let symbols = self.lists.load(kind).await?;
        if symbols.is_empty() {
            return Ok(PanelBatch::default());
        }
        let context = self.panel_context(request).await?;

        let results = join_all(symbols.into_iter().map(|symbol| {
            let context = &context;
            async move {
                let result = self.candlestick_panel(&symbol, request, context).await;
                (symbol, result)
            }
        }))
        .await;

        let batch = PanelBatch::collect(results);
        debug!(
            "Built {} {} panels, {} skipped",
            batch.panels.len(),
            kind,
            batch.warnings.len()
        );
        Ok(batch)
    }

    /// # Summary
    /// 生成单个代码相对参考周线的比值面板。
    pub async fn differential_panel(
        &self,
        symbol: &Symbol,
        request: &ChartRequest,
        reference: &Symbol,
        reference_bars: &[WeeklyBar],
    ) -> Result<DifferentialPanel, ManagerError> {
        let bars = self.weekly_bars(symbol, &request.range).await?;
        let points = differential(&bars, reference_bars);
        let moving_average = match request.sma {
            Some(window) => Some(differential_moving_average(&points, window.get())?),
            None => None,
        };
        Ok(DifferentialPanel {
            symbol: symbol.clone(),
            reference: reference.clone(),
            points,
            moving_average,
        })
    }

    /// # Summary
    /// 并发生成整个列表相对参考代码的比值面板。
    ///
    /// # Logic
    /// 1. 请求必须携带参考代码，否则返回 `MissingReference`。
    /// 2. 参考代码本身不生成面板。
    /// 3. 参考代码无数据时整个批次失败。
    pub async fn differential_panels(
        &self,
        kind: ListKind,
        request: &ChartRequest,
    ) -> Result<PanelBatch<DifferentialPanel>, ManagerError> {
        let reference = request
            .reference
            .as_ref()
            .ok_or(ManagerError::MissingReference)?;
        let symbols: Vec<Symbol> = self
            .lists
            .load(kind)
            .await?
            .into_iter()
            .filter(|s| s != reference)
            .collect();
        if symbols.is_empty() {
            return Ok(PanelBatch::default());
        }
        let reference_bars = self.weekly_bars(reference, &request.range).await?;

        let results = join_all(symbols.into_iter().map(|symbol| {
            let reference_bars = reference_bars.as_slice();
            async move {
                let result = self
                    .differential_panel(&symbol, request, reference, reference_bars)
                    .await;
                (symbol, result)
            }
        }))
        .await;

        Ok(PanelBatch::collect(results))
    }

    /// 单个代码自配置起始年份以来的年度派息。
    pub async fn annual_dividends(
        &self,
        symbol: &Symbol,
    ) -> Result<Vec<AnnualDividend>, ManagerError> {
        let events = self.provider.fetch_dividends(symbol).await?;
        Ok(annual_dividends(&events, self.config.dividend_start_year))
    }

    /// # Summary
    /// 计算股票列表的股息率表。
    ///
    /// # Logic
    /// 1. 读取股票列表与阈值映射（阈值即参考价，读取失败时为空）。
    /// 2. 参考年份取时钟当前年份减一。
    pub async fn dividend_yields(&self) -> Result<YieldTable, ManagerError> {
        let thresholds = self.thresholds_or_empty().await;
        self.yields_with(&thresholds).await
    }

    async fn yields_with(&self, thresholds: &ThresholdMap) -> Result<YieldTable, ManagerError> {
        let stocks = self.lists.load(ListKind::Stock).await?;

        let fetched = join_all(stocks.into_iter().map(|symbol| async move {
            let result = self.annual_dividends(&symbol).await;
            (symbol, result)
        }))
        .await;

        let mut dividends = BTreeMap::new();
        for (symbol, result) in fetched {
            match result {
                Ok(annual) => {
                    dividends.insert(symbol, annual);
                }
                Err(e) => warn!("Dividends unavailable for {}: {}", symbol, e),
            }
        }

        Ok(yield_table(&dividends, thresholds, self.reference_year()))
    }
}
