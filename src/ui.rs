use crate::app::App;
use crate::config;
use crate::data::{
    DashboardSnapshot, EquityPoint, HistoryRecord, Portfolio, ReportSummary, RunStatus, Signal,
    SignalBatch,
};
use crate::format::{
    ActionTag, display_text, display_value, format_number, format_percent, format_probability,
    format_shares, is_blank, map_action, map_opportunity, parse_number, text_or,
};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState,
        Wrap,
    },
};

/// Screen regions for one frame. Computed separately from rendering so
/// mouse events can be mapped back onto the history table.
pub struct DashboardLayout {
    pub header: Rect,
    pub status: Rect,
    pub chart: Rect,
    pub portfolio: Rect,
    pub signals: Rect,
    pub history: Rect,
    pub detail: Rect,
    pub research: Rect,
    pub data_report: Rect,
    pub footer: Rect,
}

pub fn layout(area: Rect) -> DashboardLayout {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Percentage(28),
            Constraint::Percentage(20),
            Constraint::Percentage(30),
            Constraint::Min(6),
            Constraint::Length(2),
        ])
        .split(area);

    let overview = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    let execution = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(rows[4]);

    let reports = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[5]);

    DashboardLayout {
        header: rows[0],
        status: rows[1],
        chart: overview[0],
        portfolio: overview[1],
        signals: rows[3],
        history: execution[0],
        detail: execution[1],
        research: reports[0],
        data_report: reports[1],
        footer: rows[6],
    }
}

/// Maps a click inside the history panel onto a row index. The border
/// and the column header sit above the first data row.
pub fn history_row_at(area: Rect, state: &TableState, column: u16, row: u16) -> Option<usize> {
    if area.width < 3 || area.height < 4 {
        return None;
    }
    if column <= area.x || column >= area.x + area.width - 1 {
        return None;
    }
    let first_row = area.y + 2;
    let last_row = area.y + area.height - 1;
    if row < first_row || row >= last_row {
        return None;
    }
    Some(state.offset() + (row - first_row) as usize)
}

pub fn render(f: &mut Frame, app: &mut App) {
    let layout = layout(f.area());
    let App {
        snapshot,
        history_state,
        load_error,
        ..
    } = app;

    render_header(f, load_error.as_deref(), snapshot.as_ref(), layout.header);

    // Placeholder rows belong to loaded-but-empty sections. Until a
    // load succeeds the data regions stay bare framed panels, with the
    // failure text confined to the header.
    let Some(snapshot) = snapshot.as_ref() else {
        for (title, area) in [
            (" 运行状态 ", layout.status),
            (" 收益曲线 ", layout.chart),
            (" 组合概览 ", layout.portfolio),
            (" 最新信号 ", layout.signals),
            (" 执行历史 ", layout.history),
            (" 执行详情 ", layout.detail),
            (" 研究报告 ", layout.research),
            (" 数据报告 ", layout.data_report),
        ] {
            f.render_widget(Block::default().borders(Borders::ALL).title(title), area);
        }
        render_footer(f, layout.footer);
        return;
    };

    render_status(f, &snapshot.status, layout.status);
    render_equity_chart(f, &snapshot.equity_curve, layout.chart);
    render_portfolio(f, &snapshot.portfolio, layout.portfolio);
    render_signals(f, &snapshot.latest_signals, layout.signals);
    render_history(f, &snapshot.history, history_state, layout.history);

    let selected = history_state
        .selected()
        .and_then(|index| snapshot.history.get(index));
    render_history_detail(f, selected, layout.detail);

    render_report(f, &snapshot.report_summaries.research, "研究报告", layout.research);
    render_report(f, &snapshot.report_summaries.data_report, "数据报告", layout.data_report);
    render_footer(f, layout.footer);
}

fn render_header(
    f: &mut Frame,
    error: Option<&str>,
    snapshot: Option<&DashboardSnapshot>,
    area: Rect,
) {
    let mut spans = vec![Span::styled(
        " TradeDash ",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];

    if let Some(message) = error {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            format!("加载失败：{message}"),
            Style::default().fg(Color::Red),
        ));
    } else if let Some(snapshot) = snapshot {
        spans.push(Span::raw(" | "));
        spans.push(Span::raw(format!(
            "数据生成时间：{}",
            display_text(&snapshot.generated_at)
        )));
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!(
                "信号生成时间：{}",
                display_text(&snapshot.latest_signals.signal_time)
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_status(f: &mut Frame, status: &RunStatus, area: Rect) {
    let line = Line::from(vec![
        Span::styled("阶段：", Style::default().fg(Color::Gray)),
        Span::styled(display_text(&status.phase), Style::default().fg(Color::Yellow)),
        Span::raw("  "),
        Span::styled("消息：", Style::default().fg(Color::Gray)),
        Span::raw(display_text(&status.message)),
        Span::raw("  "),
        Span::styled("信号时间：", Style::default().fg(Color::Gray)),
        Span::raw(display_text(&status.signal_time)),
        Span::raw("  "),
        Span::styled("执行时间：", Style::default().fg(Color::Gray)),
        Span::raw(display_text(&status.exec_time)),
    ]);

    let status = Paragraph::new(line)
        .block(Block::default().borders(Borders::ALL).title(" 运行状态 "));
    f.render_widget(status, area);
}

fn render_equity_chart(f: &mut Frame, curve: &[EquityPoint], area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" 收益曲线 ");

    if curve.is_empty() {
        let empty = Paragraph::new("暂无收益曲线数据")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let points: Vec<(f64, f64)> = curve
        .iter()
        .enumerate()
        .map(|(i, point)| (i as f64, point.value()))
        .collect();

    let min_val = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
    let max_val = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    // A flat curve still needs a non-zero span for the scale.
    let upper = if max_val > min_val { max_val } else { min_val + 1.0 };

    let datasets = vec![
        Dataset::default()
            .name("equity")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Cyan))
            .data(&points),
    ];

    let mut x_axis = Axis::default()
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, (points.len() - 1).max(1) as f64]);
    if points.len() > 1 {
        x_axis = x_axis.labels(vec![
            Span::styled("1", Style::default().fg(Color::Gray)),
            Span::styled(points.len().to_string(), Style::default().fg(Color::Gray)),
        ]);
    }

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(x_axis)
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::Gray))
                .bounds([min_val, upper])
                .labels(vec![
                    Span::styled(format!("{min_val:.2}"), Style::default().fg(Color::Gray)),
                    Span::styled(format!("{max_val:.2}"), Style::default().fg(Color::Gray)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_portfolio(f: &mut Frame, portfolio: &Portfolio, area: Rect) {
    let label = Style::default().fg(Color::Gray);
    let return_color = match parse_number(&portfolio.total_return) {
        Some(v) if v < 0.0 => Color::Red,
        Some(_) => Color::Green,
        None => Color::White,
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled("现金：", label),
            Span::raw(format!("{:<14}", format_number(&portfolio.cash))),
            Span::styled("持仓数：", label),
            Span::raw(display_value(&portfolio.positions_count)),
        ]),
        Line::from(vec![
            Span::styled("投入成本：", label),
            Span::raw(format!("{:<12}", format_number(&portfolio.invested_cost))),
            Span::styled("仓位：", label),
            Span::raw(format_percent(&portfolio.exposure)),
        ]),
        Line::from(vec![
            Span::styled("最新净值：", label),
            Span::raw(format!("{:<12}", format_number(&portfolio.last_equity))),
            Span::styled("总收益：", label),
            Span::styled(
                format_percent(&portfolio.total_return),
                Style::default().fg(return_color),
            ),
        ]),
        Line::from(vec![
            Span::styled("最后交易：", label),
            Span::raw(format!("{:<12}", display_text(&portfolio.last_trade_time))),
            Span::styled("更新时间：", label),
            Span::raw(display_text(&portfolio.last_update)),
        ]),
        Line::from(""),
    ];

    if portfolio.positions.is_empty() {
        lines.push(Line::from(Span::styled("暂无持仓", label)));
    } else {
        for position in portfolio.positions.iter().take(config::MAX_POSITION_ROWS) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:<10}", display_text(&position.symbol)),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(format!(
                    "{} @ {}",
                    display_value(&position.shares),
                    format_number(&position.avg_cost)
                )),
            ]));
        }
    }

    let panel = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" 组合概览 "));
    f.render_widget(panel, area);
}

fn render_signals(f: &mut Frame, batch: &SignalBatch, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" 最新信号 ");

    if batch.signals.is_empty() {
        let empty = Paragraph::new("暂无信号")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["代码", "名称", "方向", "概率", "机会", "触发时间"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = batch
        .signals
        .iter()
        .map(|signal| {
            let action = map_action(&signal.action);
            Row::new(vec![
                Cell::from(display_text(&signal.symbol_code)),
                Cell::from(display_text(&signal.symbol_name)),
                Cell::from(action.label).style(action_style(action.tag)),
                Cell::from(format_probability(&signal.probability)),
                Cell::from(map_opportunity(&signal.has_opportunity)),
                Cell::from(trigger_time(signal, batch)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Length(6),
            Constraint::Min(16),
        ],
    )
    .header(header)
    .block(block);

    f.render_widget(table, area);
}

/// A signal without its own trigger time inherits the batch time.
fn trigger_time(signal: &Signal, batch: &SignalBatch) -> String {
    if is_blank(&signal.trigger_time) {
        display_text(&batch.signal_time)
    } else {
        display_text(&signal.trigger_time)
    }
}

fn action_style(tag: ActionTag) -> Style {
    match tag {
        ActionTag::Buy => Style::default().fg(Color::Green),
        ActionTag::Sell => Style::default().fg(Color::Red),
        ActionTag::Hold => Style::default().fg(Color::Yellow),
        ActionTag::None => Style::default(),
    }
}

fn render_history(
    f: &mut Frame,
    history: &[HistoryRecord],
    state: &mut TableState,
    area: Rect,
) {
    let block = Block::default().borders(Borders::ALL).title(" 执行历史 ");

    if history.is_empty() {
        let empty = Paragraph::new("暂无执行记录")
            .style(Style::default().fg(Color::Gray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["时间", "订单数", "期末净值", "已实现盈亏"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = history
        .iter()
        .map(|record| {
            let orders = record.order_list();
            let count = record.order_count(&orders);
            let pnl_color = match parse_number(&record.realized_pnl) {
                Some(v) if v < 0.0 => Color::Red,
                Some(_) => Color::Green,
                None => Color::White,
            };
            Row::new(vec![
                Cell::from(display_text(&record.time)),
                Cell::from(format!("{count}")),
                Cell::from(format_number(&record.ending_equity)),
                Cell::from(format_number(&record.realized_pnl))
                    .style(Style::default().fg(pnl_color)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(8),
            Constraint::Length(12),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("▶ ");

    f.render_stateful_widget(table, area, state);
}

fn render_history_detail(f: &mut Frame, record: Option<&HistoryRecord>, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" 执行详情 ");
    let label = Style::default().fg(Color::Gray);

    let Some(record) = record else {
        let lines = vec![
            Line::from(Span::styled("点击日期行查看详情", label)),
            Line::from(""),
            Line::from(Span::styled("暂无详情", label)),
        ];
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };

    let orders = record.order_list();
    let count = record.order_count(&orders);
    let meta = vec![
        Line::from(vec![
            Span::styled("执行时间：", label),
            Span::styled(
                display_text(&record.time),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled("信号：", label),
            Span::raw(display_text(&record.signal_time)),
            Span::raw("  "),
            Span::styled("订单数：", label),
            Span::raw(format!("{count}")),
            Span::raw("  "),
            Span::styled("价格模式：", label),
            Span::raw(display_text(&record.price_mode)),
        ]),
    ];

    if orders.is_empty() {
        // A positive count with no rows means the generator skipped the
        // detail section, which a regeneration fixes.
        let message = if count > 0.0 {
            "订单明细缺失，请重新生成 dashboard.json"
        } else {
            "当日无成交订单"
        };
        let mut lines = meta;
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(message, label)));
        let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
        f.render_widget(panel, area);
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(inner);

    f.render_widget(Paragraph::new(meta), chunks[0]);

    let header = Row::new(["标的", "方向", "股数", "成交价", "交易额", "费用合计", "净额"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = orders
        .iter()
        .map(|order| {
            let action = map_action(&order.action);
            Row::new(vec![
                Cell::from(display_text(&order.symbol)),
                Cell::from(action.label).style(action_style(action.tag)),
                Cell::from(format_shares(&order.shares)),
                Cell::from(format_number(&order.price)),
                Cell::from(format_number(&order.gross)),
                Cell::from(format_number(&order.total_cost())),
                Cell::from(format_number(&order.total)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(9),
            Constraint::Min(8),
        ],
    )
    .header(header);

    f.render_widget(table, chunks[1]);
}

fn render_report(f: &mut Frame, summary: &ReportSummary, title: &str, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "));
    let label = Style::default().fg(Color::Gray);

    let lines = if is_blank(&summary.name) {
        vec![
            Line::from(Span::styled(format!("{title}暂无报告"), label)),
            Line::from(""),
            Line::from("暂无摘要"),
        ]
    } else {
        vec![
            Line::from(Span::styled(
                format!(
                    "更新时间：{} | 文件：{}",
                    display_text(&summary.updated_at),
                    display_text(&summary.name)
                ),
                label,
            )),
            Line::from(""),
            Line::from(text_or(&summary.summary, "暂无摘要")),
        ]
    };

    let panel = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
    f.render_widget(panel, area);
}

fn render_footer(f: &mut Frame, area: Rect) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" 按键: ", Style::default().fg(Color::Gray)),
        Span::styled(
            "↑/↓/j/k 选择记录 | Enter/空格 确认 | r 重新加载 | q/Esc 退出",
            Style::default().fg(Color::White),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SnapshotSource;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use serde_json::json;

    fn app_with(value: serde_json::Value) -> App {
        let snapshot: DashboardSnapshot = serde_json::from_value(value).expect("fixture snapshot");
        let mut app = App::new(SnapshotSource::parse("data/dashboard.json"));
        app.apply_snapshot(snapshot);
        app
    }

    /// Buffer contents with spaces removed: wide glyphs leave one
    /// space filler cell behind each, so contiguous Chinese text only
    /// survives a contains() check after despacing.
    fn rendered(app: &mut App) -> String {
        let backend = TestBackend::new(140, 60);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| render(f, app)).expect("draw");

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for (i, cell) in buffer.content.iter().enumerate() {
            text.push_str(cell.symbol());
            if (i + 1) % buffer.area.width as usize == 0 {
                text.push('\n');
            }
        }
        text.replace(' ', "")
    }

    fn full_fixture() -> serde_json::Value {
        json!({
            "generated_at": "2024-05-21 15:06:00",
            "status": {
                "phase": "已完成",
                "message": "执行成功",
                "signal_time": "2024-05-21 14:50:00",
                "exec_time": "2024-05-21 15:05:00",
            },
            "portfolio": {
                "cash": 12345.67,
                "positions_count": 2,
                "invested_cost": "88000",
                "exposure": 0.42,
                "last_equity": 101234.5,
                "total_return": 0.0123,
                "last_trade_time": "2024-05-21",
                "last_update": "2024-05-21 15:05:00",
                "positions": [
                    {"symbol": "600519", "shares": 100, "avg_cost": 1680.5},
                    {"symbol": "000001", "shares": 1200, "avg_cost": 10.2},
                ],
            },
            "latest_signals": {
                "signal_time": "2024-05-21 14:50:00",
                "signals": [
                    {
                        "symbol_code": "600519",
                        "symbol_name": "贵州茅台",
                        "action": "buy",
                        "probability": 0.98,
                        "has_opportunity": true,
                    },
                    {
                        "symbol_code": "000001",
                        "symbol_name": "平安银行",
                        "action": "观望",
                        "probability": "55%",
                        "has_opportunity": "no",
                        "trigger_time": "2024-05-21 14:49:30",
                    },
                ],
            },
            "equity_curve": [{"equity": 100000}, {"equity": 101234.5}],
            "history": [
                {
                    "time": "2024-05-20 15:05:00",
                    "signal_time": "2024-05-20 14:50:00",
                    "price_mode": "close",
                    "ending_equity": 100800,
                    "realized_pnl": -120.5,
                    "orders": 1,
                },
                {
                    "time": "2024-05-21 15:05:00",
                    "signal_time": "2024-05-21 14:50:00",
                    "price_mode": "open",
                    "ending_equity": 101234.5,
                    "realized_pnl": 434.5,
                    "orders_detail": [
                        {
                            "symbol": "SZ000001",
                            "action": "sell",
                            "shares": 300,
                            "price": 10.55,
                            "gross": 3165,
                            "costs": {"total_cost": 4.2},
                            "total": 3160.8,
                        },
                    ],
                },
            ],
            "report_summaries": {
                "research": {
                    "name": "research_2024-05-21.md",
                    "updated_at": "2024-05-21 15:06:00",
                    "summary": "两只标的触发买入条件",
                },
                "data": {"name": null},
            },
        })
    }

    #[test]
    fn test_full_snapshot_renders_every_panel() {
        let mut app = app_with(full_fixture());
        let text = rendered(&mut app);

        // Header and status strip.
        assert!(text.contains("数据生成时间：2024-05-2115:06:00"), "{text}");
        assert!(text.contains("阶段：已完成"));
        assert!(text.contains("消息：执行成功"));

        // Portfolio stats and positions.
        assert!(text.contains("12345.67"));
        assert!(text.contains("42.00%"));
        assert!(text.contains("1.23%"));
        assert!(text.contains("600519"));

        // Signals: normalized action labels, probabilities, and the
        // opportunity column sitting right after them.
        assert!(text.contains("贵州茅台"));
        assert!(text.contains("买入"));
        assert!(text.contains("98%有"), "{text}");
        assert!(text.contains("观望"));
        assert!(text.contains("55%无"), "{text}");

        // Chart axis labels from the curve extremes.
        assert!(text.contains("100000.00"));
        assert!(text.contains("101234.50"));

        // History rows, both records visible.
        assert!(text.contains("2024-05-2015:05:00"));
        assert!(text.contains("-120.50"));
        assert!(text.contains("434.50"));

        // Research summary present, data report missing.
        assert!(text.contains("文件：research_2024-05-21.md"));
        assert!(text.contains("两只标的触发买入条件"));
        assert!(text.contains("数据报告暂无报告"));
    }

    #[test]
    fn test_latest_record_detail_is_open_by_default() {
        let mut app = app_with(full_fixture());
        let text = rendered(&mut app);

        // The second record carries the order detail rows.
        assert!(text.contains("SZ000001"));
        assert!(text.contains("卖出"));
        assert!(text.contains("300"));
        assert!(text.contains("10.55"));
        assert!(text.contains("4.20"));
        assert!(text.contains("3160.80"));
        assert!(text.contains("价格模式：open"));
    }

    #[test]
    fn test_selecting_a_count_only_record_explains_the_missing_detail() {
        let mut app = app_with(full_fixture());
        app.history_state.select(Some(0));
        let text = rendered(&mut app);

        assert!(text.contains("订单明细缺失"));
        assert!(!text.contains("当日无成交订单"));
    }

    #[test]
    fn test_zero_order_record_shows_no_trades_message() {
        let mut app = app_with(json!({
            "history": [{"time": "2024-05-20", "orders": 0}],
        }));
        let text = rendered(&mut app);

        assert!(text.contains("当日无成交订单"));
        assert!(!text.contains("订单明细缺失"));
    }

    #[test]
    fn test_empty_snapshot_renders_placeholders_everywhere() {
        let mut app = app_with(json!({}));
        let text = rendered(&mut app);

        assert!(text.contains("暂无收益曲线数据"));
        assert!(text.contains("暂无持仓"));
        assert!(text.contains("暂无信号"));
        assert!(text.contains("暂无执行记录"));
        assert!(text.contains("点击日期行查看详情"));
        assert!(text.contains("暂无详情"));
        assert!(text.contains("研究报告暂无报告"));
        assert!(text.contains("数据报告暂无报告"));
        assert!(text.contains("暂无摘要"));
    }

    #[test]
    fn test_load_failure_keeps_every_panel_bare() {
        let mut app = App::new(SnapshotSource::parse("data/dashboard.json"));
        app.apply_error("无法读取 dashboard.json".to_string());
        let text = rendered(&mut app);

        // The header carries the failure. Placeholder rows only appear
        // when a load succeeds with empty sections, so none may show
        // here.
        assert!(text.contains("加载失败：无法读取dashboard.json"), "{text}");
        assert!(!text.contains("暂无信号"));
        assert!(!text.contains("暂无执行记录"));
        assert!(!text.contains("暂无收益曲线数据"));
        assert!(!text.contains("暂无持仓"));
        assert!(!text.contains("暂无报告"));
        assert!(!text.contains("点击日期行查看详情"));

        // The framed panels and the key hints still draw.
        assert!(text.contains("最新信号"));
        assert!(text.contains("执行历史"));
        assert!(text.contains("按键"));
    }

    #[test]
    fn test_frame_before_any_load_shows_only_the_chrome() {
        let mut app = App::new(SnapshotSource::parse("data/dashboard.json"));
        let text = rendered(&mut app);

        assert!(text.contains("TradeDash"));
        assert!(!text.contains("加载失败"));
        assert!(!text.contains("暂无"));
    }

    #[test]
    fn test_signal_trigger_time_falls_back_to_the_batch_time() {
        let mut app = app_with(json!({
            "latest_signals": {
                "signal_time": "2024-05-21 14:50:00",
                "signals": [{"symbol_code": "600519", "action": "buy"}],
            },
        }));
        let text = rendered(&mut app);
        assert!(text.contains("2024-05-2114:50:00"));
    }

    #[test]
    fn test_history_row_at_maps_clicks_onto_rows() {
        let area = Rect::new(0, 10, 40, 10);
        let state = TableState::default();

        // Border at y=10, header at y=11, first data row at y=12.
        assert_eq!(history_row_at(area, &state, 5, 12), Some(0));
        assert_eq!(history_row_at(area, &state, 5, 14), Some(2));
        assert_eq!(history_row_at(area, &state, 5, 11), None);
        assert_eq!(history_row_at(area, &state, 5, 19), None);
        // Clicks on the side borders or outside do not select.
        assert_eq!(history_row_at(area, &state, 0, 12), None);
        assert_eq!(history_row_at(area, &state, 39, 12), None);

        let mut scrolled = TableState::default();
        *scrolled.offset_mut() = 3;
        assert_eq!(history_row_at(area, &scrolled, 5, 12), Some(3));
    }

    #[test]
    fn test_layout_keeps_the_fixed_chrome_rows() {
        let layout = layout(Rect::new(0, 0, 140, 60));
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.status.height, 3);
        assert_eq!(layout.footer.height, 2);
        assert_eq!(layout.history.y, layout.detail.y);
        assert!(layout.research.y >= layout.history.y + layout.history.height);
    }
}
