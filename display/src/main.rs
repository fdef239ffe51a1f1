use anyhow::Context as _;
use clap::Parser;
use http::HttpFeedSource;
use iced::{
    keyboard, mouse, time,
    widget::{
        canvas::{self, Canvas, Frame, Geometry, Path, Stroke},
        column, row, text, Column, Container,
    },
    Color, Element, Font, Length, Point, Rectangle, Renderer, Subscription, Task, Theme,
};
use scopecore::cache::{BackgroundCache, GeometryCache, GlyphCache, GlyphRasterizer, LayerGeometry};
use scopecore::config::ScopeConfig;
use scopecore::feed::record::TrackRecord;
use scopecore::feed::tracker::Tracker;
use scopecore::geo::{LocalProjection, ScreenPos};
use scopecore::view::OrderedView;
use std::cell::RefCell;
use std::fs;
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

mod http;

const BRIGHT_GREEN: [u8; 3] = [50, 255, 50];
const DIM_GREEN: [u8; 3] = [0, 180, 0];
const RED: [u8; 3] = [255, 50, 50];
const YELLOW: [u8; 3] = [255, 255, 0];
const AMBER: [u8; 3] = [255, 191, 0];

/// Frames between glyph-cache compaction checks (~1 minute at 6 FPS).
const COMPACT_CHECK_FRAMES: u64 = 300;

#[derive(Parser)]
#[command(author, version, about = "ADS-B radar scope display")]
struct Args {
    /// Load the scope configuration from YAML
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = Arc::new(match &args.config {
        Some(path) => load_config(path)?,
        None => ScopeConfig::default(),
    });

    let window_size = iced::Size::new(
        config.display.screen_width as f32,
        config.display.screen_height as f32,
    );
    let boot_config = config.clone();
    iced::application(
        move || ScopeApp::boot(boot_config.clone()),
        ScopeApp::update,
        ScopeApp::view,
    )
    .title(application_title)
    .subscription(application_subscription)
    .theme(application_theme)
    .window_size(window_size)
    .run()
    .context("running scope display")?;

    Ok(())
}

fn load_config(path: &FsPath) -> anyhow::Result<ScopeConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("reading scope config {}", path.display()))?;
    serde_yaml::from_str(&contents)
        .with_context(|| format!("parsing scope config {}", path.display()))
}

fn application_title(state: &ScopeApp) -> String {
    format!("{} ADS-B RADAR", state.config.location.area_name)
}

fn application_subscription(state: &ScopeApp) -> Subscription<Message> {
    let fps = state.config.performance.fps.max(1);
    let frame_interval = Duration::from_millis(1000 / u64::from(fps));
    Subscription::batch([
        time::every(frame_interval).map(|_| Message::Frame),
        keyboard::on_key_press(handle_key_press),
    ])
}

fn application_theme(_: &ScopeApp) -> Theme {
    Theme::Dark
}

fn handle_key_press(key: keyboard::Key, _modifiers: keyboard::Modifiers) -> Option<Message> {
    match key.as_ref() {
        keyboard::Key::Character("q") => Some(Message::Quit),
        keyboard::Key::Named(keyboard::key::Named::Escape) => Some(Message::Quit),
        _ => None,
    }
}

struct ScopeApp {
    config: Arc<ScopeConfig>,
    tracker: Tracker,
    started: Instant,
    frame_count: u64,
    font: Font,
    // Render-cadence state only: the sweep thread never touches the caches.
    render: RefCell<RenderState>,
}

#[derive(Debug, Clone)]
enum Message {
    Frame,
    FontLoaded(bool),
    Quit,
}

struct RenderState {
    glyphs: GlyphCache<TextRasterizer>,
    geometry: GeometryCache,
    background: BackgroundCache<Geometry>,
    scanlines: BackgroundCache<Geometry>,
    ordered: OrderedView,
}

impl RenderState {
    fn new(config: &ScopeConfig, font: Font) -> Self {
        let projection = LocalProjection::new(
            config.location.lat,
            config.location.lon,
            config.location.radius_nm,
        );
        Self {
            glyphs: GlyphCache::new(
                TextRasterizer { font },
                config.performance.enable_glyph_cache,
                config.performance.glyph_cache_capacity,
                Instant::now(),
            ),
            geometry: GeometryCache::new(
                projection,
                config.performance.enable_geometry_cache,
                Duration::from_secs_f64(config.performance.geometry_cache_ttl_secs),
            ),
            background: BackgroundCache::new(config.performance.enable_background_cache),
            scanlines: BackgroundCache::new(config.performance.enable_background_cache),
            ordered: OrderedView::new(config.performance.resort_threshold_nm),
        }
    }
}

impl ScopeApp {
    fn boot(config: Arc<ScopeConfig>) -> (Self, Task<Message>) {
        let source = HttpFeedSource::new(config.general.feed_url.clone());
        let tracker = Tracker::spawn(&config, source);

        let font = config
            .display
            .font_family
            .as_deref()
            .map(|family| Font::with_name(Box::leak(family.to_string().into_boxed_str())))
            .unwrap_or(Font::MONOSPACE);

        let font_task = match &config.display.font_path {
            Some(path) => match fs::read(path) {
                Ok(bytes) => {
                    iced::font::load(bytes).map(|result| Message::FontLoaded(result.is_ok()))
                }
                Err(err) => {
                    log::warn!("reading font {}: {err}", path.display());
                    Task::none()
                }
            },
            None => Task::none(),
        };

        let render = RenderState::new(&config, font);
        (
            Self {
                config,
                tracker,
                started: Instant::now(),
                frame_count: 0,
                font,
                render: RefCell::new(render),
            },
            font_task,
        )
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Frame => {
                state.frame_count += 1;
                if state.frame_count % COMPACT_CHECK_FRAMES == 0 {
                    state.render.borrow_mut().glyphs.compact(Instant::now());
                }
                Task::none()
            }
            Message::FontLoaded(loaded) => {
                if !loaded {
                    log::warn!("configured font failed to load, using the builtin monospace face");
                }
                Task::none()
            }
            Message::Quit => iced::exit(),
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let config = &state.config;
        let snapshot = state.tracker.snapshot();

        let table_lines: Vec<(String, [u8; 3])> = {
            let mut render = state.render.borrow_mut();
            render.ordered.update(&snapshot.records);
            render
                .ordered
                .ranked(Some(config.display.max_table_rows))
                .iter()
                .map(|record| {
                    let color = if record.military { RED } else { BRIGHT_GREEN };
                    (format_row(record), color)
                })
                .collect()
        };

        let table_size = config.display.table_font_size as f32;
        let header = text(format!(
            "{} {:.4}°, {:.4}°",
            config.location.area_name, config.location.lat, config.location.lon
        ))
        .size(config.display.header_font_size as f32)
        .font(state.font)
        .color(rgb(AMBER));

        let column_headings = format!(
            "{:<9}{:>6}{:>5}{:>7}{:>5}",
            "CALL", "ALT", "SPD", "DIST", "HDG"
        );
        let table = table_lines.into_iter().fold(
            column![
                text("AIRCRAFT DATA").size(table_size).font(state.font).color(rgb(AMBER)),
                text(column_headings).size(table_size).font(state.font).color(rgb(AMBER)),
            ]
            .spacing(4),
            |col, (line, color)| col.push(text(line).size(table_size).font(state.font).color(rgb(color))),
        );

        let counters = state.tracker.metrics().snapshot();
        let military_count = snapshot.records.iter().filter(|r| r.military).count();
        let interval = state.tracker.sweep_interval();
        let remaining = interval
            .checked_sub(snapshot.last_sweep_started.elapsed())
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let (next_update, next_color) = if remaining > 0 {
            (format!("{remaining:02}S"), BRIGHT_GREEN)
        } else {
            ("UPDATING".to_string(), YELLOW)
        };

        let status_lines = [
            (format!("STATUS: {}", snapshot.status.label()), BRIGHT_GREEN),
            (
                format!("CONTACTS: {} ({} MIL)", snapshot.records.len(), military_count),
                BRIGHT_GREEN,
            ),
            (format!("RANGE: {:.0}NM", config.location.radius_nm), BRIGHT_GREEN),
            (format!("INTERVAL: {}S", interval.as_secs()), BRIGHT_GREEN),
            (format!("NEXT UPDATE: {next_update}"), next_color),
            (
                format!("SWEEPS: {} ({} ERR)", counters.sweeps, counters.errors),
                BRIGHT_GREEN,
            ),
        ];
        let status = status_lines.into_iter().fold(
            Column::new().spacing(2),
            |col, (line, color)| col.push(text(line).size(table_size).font(state.font).color(rgb(color))),
        );

        let scope = Canvas::new(ScopePanel { app: state })
            .width(Length::FillPortion(1))
            .height(Length::Fill);

        let right_column = column![table, status]
            .spacing(20)
            .width(Length::FillPortion(1));

        let instructions = text("PRESS Q OR ESC TO QUIT")
            .size(config.display.instruction_font_size as f32)
            .font(state.font)
            .color(rgb(DIM_GREEN));

        let layout = column![
            Container::new(header).width(Length::Fill).center_x(Length::Fill),
            row![scope, right_column].spacing(16).height(Length::Fill),
            instructions,
        ]
        .spacing(8)
        .padding(12);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }
}

fn format_row(record: &TrackRecord) -> String {
    let altitude = if record.altitude_ft > 0 {
        record.altitude_ft.to_string()
    } else {
        "GND".to_string()
    };
    let speed = if record.ground_speed_kt > 0 {
        record.ground_speed_kt.to_string()
    } else {
        "N/A".to_string()
    };
    let distance = if record.distance_nm > 0.0 {
        format!("{:.1}", record.distance_nm)
    } else {
        "N/A".to_string()
    };
    let heading = if record.track_deg > 0.0 {
        format!("{:03.0}°", record.track_deg)
    } else {
        "N/A".to_string()
    };
    format!(
        "{:<9}{:>6}{:>5}{:>7}{:>5}",
        record.callsign, altitude, speed, distance, heading
    )
}

fn rgb(color: [u8; 3]) -> Color {
    Color::from_rgb8(color[0], color[1], color[2])
}

/// Prepared canvas text, positioned at blit time.
#[derive(Clone)]
struct TextGlyph(canvas::Text);

impl TextGlyph {
    fn at(&self, position: Point) -> canvas::Text {
        let mut text = self.0.clone();
        text.position = position;
        text
    }
}

struct TextRasterizer {
    font: Font,
}

impl GlyphRasterizer for TextRasterizer {
    type Glyph = TextGlyph;

    fn rasterize(&self, content: &str, color: [u8; 3], size_px: u32) -> TextGlyph {
        TextGlyph(canvas::Text {
            content: content.to_string(),
            color: rgb(color),
            size: (size_px as f32).into(),
            font: self.font,
            ..canvas::Text::default()
        })
    }
}

struct ScopePanel<'a> {
    app: &'a ScopeApp,
}

impl canvas::Program<Message> for ScopePanel<'_> {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let app = self.app;
        let config = &app.config;
        let snapshot = app.tracker.snapshot();
        let now = Instant::now();

        let center_x = (bounds.width / 2.0) as i32;
        let center_y = (bounds.height / 2.0) as i32;
        let radius_px = ((bounds.width.min(bounds.height) / 2.0) - 16.0).max(10.0) as i32;
        let layer_geometry = LayerGeometry {
            center_x,
            center_y,
            radius_px,
        };

        let mut render = app.render.borrow_mut();
        let render = &mut *render;
        let mut layers = Vec::with_capacity(3);

        layers.push(render.background.layer(layer_geometry, |geometry| {
            let mut frame = Frame::new(renderer, bounds.size());
            draw_static_elements(&mut frame, geometry);
            frame.into_geometry()
        }));

        let mut frame = Frame::new(renderer, bounds.size());

        // Ring labels track the configured radius, so they stay dynamic.
        for ring in 1..=3 {
            let ring_radius = (ring as f32 / 3.0) * radius_px as f32;
            let range_nm = (ring as f64 / 3.0) * config.location.radius_nm;
            let label = format!("{}NM", range_nm.round() as i64);
            let glyph =
                render
                    .glyphs
                    .render(&label, DIM_GREEN, config.display.instruction_font_size);
            frame.fill_text(glyph.at(Point::new(
                center_x as f32 + ring_radius - 20.0,
                center_y as f32 + 5.0,
            )));
        }

        let blink_on = (app.started.elapsed().as_millis() / 500) % 2 == 0;
        for record in snapshot.records.iter() {
            let Some(pos) = render.geometry.screen_pos(
                &record.hex,
                record.lat,
                record.lon,
                center_x,
                center_y,
                radius_px,
                now,
            ) else {
                continue;
            };
            if record.military && config.general.blink_military && !blink_on {
                continue;
            }
            let color = if record.military { RED } else { BRIGHT_GREEN };
            draw_contact(
                &mut frame,
                &mut render.glyphs,
                record,
                pos,
                color,
                config.display.radar_font_size,
            );
        }
        layers.push(frame.into_geometry());

        let scanline_period = config.performance.static_redraw_interval.max(1);
        if app.frame_count % scanline_period == 0 {
            layers.push(render.scanlines.layer(layer_geometry, |_| {
                let mut frame = Frame::new(renderer, bounds.size());
                draw_scanlines(&mut frame, bounds);
                frame.into_geometry()
            }));
        }

        layers
    }
}

fn draw_static_elements(frame: &mut Frame, geometry: LayerGeometry) {
    let center = Point::new(geometry.center_x as f32, geometry.center_y as f32);
    let radius = geometry.radius_px as f32;

    for ring in 1..=3 {
        let ring_radius = (ring as f32 / 3.0) * radius;
        let ring_path = Path::new(|builder| builder.circle(center, ring_radius));
        frame.stroke(
            &ring_path,
            Stroke::default().with_width(2.0).with_color(rgb(DIM_GREEN)),
        );
    }

    let crosshairs = Path::new(|builder| {
        builder.move_to(Point::new(center.x - radius, center.y));
        builder.line_to(Point::new(center.x + radius, center.y));
        builder.move_to(Point::new(center.x, center.y - radius));
        builder.line_to(Point::new(center.x, center.y + radius));
    });
    frame.stroke(
        &crosshairs,
        Stroke::default().with_width(2.0).with_color(rgb(DIM_GREEN)),
    );

    let boundary = Path::new(|builder| builder.circle(center, radius));
    frame.stroke(
        &boundary,
        Stroke::default().with_width(3.0).with_color(rgb(BRIGHT_GREEN)),
    );
}

fn draw_contact(
    frame: &mut Frame,
    glyphs: &mut GlyphCache<TextRasterizer>,
    record: &TrackRecord,
    pos: ScreenPos,
    color: [u8; 3],
    label_size: u32,
) {
    let center = Point::new(pos.x as f32, pos.y as f32);
    frame.fill(&Path::new(|builder| builder.circle(center, 5.0)), rgb(color));

    // Trailing line opposite the direction of travel.
    if record.track_deg > 0.0 {
        let track_rad = record.track_deg.to_radians() as f32;
        let trail = Point::new(
            center.x - 12.0 * track_rad.sin(),
            center.y + 12.0 * track_rad.cos(),
        );
        let path = Path::new(|builder| {
            builder.move_to(trail);
            builder.line_to(center);
        });
        frame.stroke(
            &path,
            Stroke::default().with_width(2.0).with_color(rgb(color)),
        );
    }

    let glyph = glyphs.render(&record.callsign, color, label_size);
    frame.fill_text(glyph.at(Point::new(center.x + 8.0, center.y - 12.0)));
}

fn draw_scanlines(frame: &mut Frame, bounds: Rectangle) {
    let mut y = 0.0;
    while y < bounds.height {
        let line = Path::line(Point::new(0.0, y), Point::new(bounds.width, y));
        frame.stroke(
            &line,
            Stroke::default()
                .with_width(1.0)
                .with_color(Color::from_rgba8(0, 0, 0, 0.12)),
        );
        y += 4.0;
    }
}
