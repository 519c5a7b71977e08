use std::ops::Range;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row,
        Table, TableState, Widget, Wrap,
    },
    Frame,
};

use crate::app::{App, Focus};
use crate::braille::BrailleCanvas;
use crate::map::{point_descriptors, BaseLayers, HeatLayers, PointLayers, Viewport};
use crate::query::DashboardView;

/// Glyph and color per heat level, index 0 unused
const HEAT_PALETTE: [(char, Color); 6] = [
    (' ', Color::Reset),
    ('░', Color::Blue),
    ('▒', Color::Cyan),
    ('▒', Color::Green),
    ('▓', Color::Yellow),
    ('█', Color::Red),
];

/// Screen areas of every dashboard pane
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Regions {
    pub title: Rect,
    pub countries: Rect,
    pub summary: Rect,
    pub chart: Rect,
    pub point_map: Rect,
    pub heat_map: Rect,
    pub table: Rect,
    pub status: Rect,
}

impl Regions {
    pub fn compute(area: Rect) -> Self {
        let [title, body, status] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(6), Constraint::Length(1)])
                .areas(area);
        let [sidebar, main] =
            Layout::horizontal([Constraint::Length(36), Constraint::Min(20)]).areas(body);
        let [countries, summary, chart] = Layout::vertical([
            Constraint::Min(5),
            Constraint::Length(4),
            Constraint::Length(12),
        ])
        .areas(sidebar);
        let [maps, table] =
            Layout::vertical([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(main);
        let [point_map, heat_map] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(maps);

        Self {
            title,
            countries,
            summary,
            chart,
            point_map,
            heat_map,
            table,
            status,
        }
    }
}

/// Drawable area inside a bordered pane
pub fn map_inner(area: Rect) -> Rect {
    area.inner(Margin::new(1, 1))
}

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let regions = Regions::compute(frame.area());
    // Derived state is rebuilt every frame from the current selection
    let view = app.view();

    render_title(frame, app, regions.title);
    render_countries(frame, app, regions.countries);
    render_summary(frame, app, &view, regions.summary);
    render_chart(frame, app, &view, regions.chart);
    render_point_map(frame, app, &view, regions.point_map);
    render_heat_map(frame, app, regions.heat_map);
    render_table(frame, app, &view, regions.table);
    render_status_bar(frame, app, regions.status);
}

fn pane(title: String, focused: bool) -> Block<'static> {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
}

fn render_title(frame: &mut Frame, app: &App, area: Rect) {
    let title = Paragraph::new(app.lang.title(app.range))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    frame.render_widget(title, area);
}

fn render_countries(frame: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app.catalog.countries().iter().map(ListItem::new).collect();
    let list = List::new(items)
        .block(pane(
            app.lang.selector_title().to_string(),
            app.focus == Focus::Countries,
        ))
        .highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected_index()));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_summary(frame: &mut Frame, app: &App, view: &DashboardView, area: Rect) {
    let message = app.lang.count_message(view.range, view.selected, view.count());
    let summary = Paragraph::new(message)
        .style(Style::default().fg(Color::Green))
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::DarkGray)));
    frame.render_widget(summary, area);
}

fn render_chart(frame: &mut Frame, app: &App, view: &DashboardView, area: Rect) {
    let bars: Vec<Bar> = view
        .yearly
        .iter()
        .map(|(year, count)| {
            Bar::default()
                .value(*count as u64)
                .label(Line::from(year.to_string()))
                .style(Style::default().fg(Color::Blue))
                .value_style(Style::default().fg(Color::White).bg(Color::Blue))
        })
        .collect();

    let block = pane(app.lang.chart_title(view.range, view.selected), false).title_bottom(
        Line::styled(app.lang.chart_axes(), Style::default().fg(Color::DarkGray)).right_aligned(),
    );
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(4)
        .bar_gap(1);
    frame.render_widget(chart, area);
}

/// Viewport resized to a pane's inner area (Braille gives 2x4 dots per cell)
fn pane_viewport(app: &App, inner: Rect) -> Viewport {
    app.viewport.with_size(inner.width as usize * 2, inner.height as usize * 4)
}

fn render_point_map(frame: &mut Frame, app: &App, view: &DashboardView, area: Rect) {
    let block = pane(app.lang.point_map_title(view.selected), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let viewport = pane_viewport(app, inner);
    let points = point_descriptors(&view.map_records, app.lang);
    let layers = app.map_renderer.render_points(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        &points,
        app.popup,
    );
    frame.render_widget(PointMapWidget { layers }, inner);

    let popup = app
        .popup
        .and_then(|id| points.iter().find(|p| p.id == id))
        .map(|point| {
            let (px, py) = viewport.project(point.longitude, point.latitude);
            let anchor = viewport
                .is_visible(px, py)
                .then(|| ((px.max(0) / 2) as u16, (py.max(0) / 4) as u16));
            (point.label.clone(), anchor)
        });
    if let Some((lines, anchor)) = popup {
        render_popup(frame, inner, lines, anchor);
    }
}

fn render_heat_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = pane(app.lang.heat_map_title().to_string(), false);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let viewport = pane_viewport(app, inner);
    let layers = app.map_renderer.render_heat(
        inner.width as usize,
        inner.height as usize,
        &viewport,
        app.catalog.heat_coordinates(),
    );
    frame.render_widget(HeatMapWidget { layers }, inner);
}

/// Popup box next to its marker, kept inside the map pane
fn render_popup(frame: &mut Frame, map: Rect, lines: Vec<String>, anchor: Option<(u16, u16)>) {
    let text_width = lines
        .iter()
        .map(|l| Line::from(l.as_str()).width())
        .max()
        .unwrap_or(0) as u16;
    let width = (text_width + 2).min(map.width);
    let height = (lines.len() as u16 + 2).min(map.height);
    if width < 3 || height < 3 {
        return;
    }

    let (ax, ay) = anchor.unwrap_or((0, 0));
    let x = map.x + (ax + 1).min(map.width - width);
    let y = map.y + (ay + 1).min(map.height - height);
    let area = Rect::new(x, y, width, height);

    let body: Vec<Line> = lines.into_iter().map(Line::from).collect();
    let popup = Paragraph::new(body).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow)),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(popup, area);
}

fn render_table(frame: &mut Frame, app: &App, view: &DashboardView, area: Rect) {
    let header = Row::new(app.lang.table_headers())
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    // Borders plus header
    let body_height = area.height.saturating_sub(3) as usize;
    let window = table_window(app.table_row(), view.count(), body_height);
    let selected = window.contains(&app.table_row()).then(|| app.table_row() - window.start);

    let rows: Vec<Row> = view.table_records[window]
        .iter()
        .map(|r| {
            Row::new(vec![
                r.time_text(),
                r.place_text().to_string(),
                format!("{:.4}", r.latitude),
                format!("{:.4}", r.longitude),
                format!("{:.1}", r.magnitude),
                format!("{:.2}", r.depth),
                r.country().to_string(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(19),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(10),
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(pane(app.lang.table_title().to_string(), app.focus == Focus::Table))
        .row_highlight_style(Style::default().fg(Color::Black).bg(Color::Cyan));

    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, area, &mut state);
}

/// Slice of a `count`-row table that fits `height` body rows and keeps
/// `selected` on screen.
pub fn table_window(selected: usize, count: usize, height: usize) -> Range<usize> {
    let height = height.max(1);
    let start = (selected + 1).saturating_sub(height).min(count.saturating_sub(height));
    start..(start + height).min(count)
}

/// Paint the non-blank cells of a Braille canvas in one color
fn paint_canvas(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
    for (col, row, ch) in canvas.glyphs() {
        if col >= area.width as usize || row >= area.height as usize {
            continue;
        }
        let (x, y) = (area.x + col as u16, area.y + row as u16);
        buf[(x, y)].set_char(ch).set_fg(color);
    }
}

fn paint_base(base: &BaseLayers, area: Rect, buf: &mut Buffer) {
    paint_canvas(&base.coastlines, Color::Cyan, area, buf);
    paint_canvas(&base.borders, Color::DarkGray, area, buf);
}

/// Base map with event markers on top
struct PointMapWidget {
    layers: PointLayers,
}

impl Widget for PointMapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        paint_base(&self.layers.base, area, buf);
        paint_canvas(&self.layers.markers, Color::LightBlue, area, buf);
        paint_canvas(&self.layers.highlight, Color::Yellow, area, buf);
    }
}

/// Base map under shaded event density
struct HeatMapWidget {
    layers: HeatLayers,
}

impl Widget for HeatMapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        paint_base(&self.layers.base, area, buf);

        let heat = &self.layers.heat;
        let cols = heat.width().min(area.width as usize);
        let rows = heat.height().min(area.height as usize);
        for row in 0..rows {
            for col in 0..cols {
                let level = heat.level(col, row) as usize;
                if level == 0 {
                    continue;
                }
                let (ch, color) = HEAT_PALETTE[level.min(HEAT_PALETTE.len() - 1)];
                buf[(area.x + col as u16, area.y + row as u16)]
                    .set_char(ch)
                    .set_fg(color);
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let settings = &app.map_renderer.settings;

    let status = Line::from(vec![
        Span::styled(" Zoom: ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", Style::default().fg(Color::DarkGray)),
        Span::styled(app.lod_level(), Style::default().fg(Color::Magenta)),
        Span::styled(") ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            if settings.show_borders { "[B]order " } else { "[b]order " },
            Style::default().fg(if settings.show_borders { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled("| ", Style::default().fg(Color::DarkGray)),
        Span::styled(app.center_coords(), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | ↑↓:select Tab:focus Enter:pin wasd:pan +/-:zoom Esc:close r:reset q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
