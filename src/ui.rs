#![allow(
    // Cell coordinates are computed in f64 and are range checked before casting
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]

use crate::app::App;
use crate::commentary::Commentator;
use crate::components::{Decoration, DecorationKind};
use crate::game::{
    CANVAS_HEIGHT, CANVAS_WIDTH, GROUND_HEIGHT, STARS_AFTER, sky_for_score, theme_for_score,
};
use crate::scenery::SceneRng;
use crate::simulation::{Simulation, Snapshot};
use crate::sound::AudioState;
use crate::state::GameStatus;
use crate::store::BestScore;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;
const INFO_WIDTH: u16 = 26;
const MIN_FIELD_WIDTH: u16 = 16;
const MIN_FIELD_HEIGHT: u16 = 16;
const GROUND_COLOR: Color = Color::Rgb(0x1e, 0x29, 0x3b);
const CRANE_COLOR: Color = Color::Rgb(0x33, 0x41, 0x55);
const DOOR_COLOR: Color = Color::Rgb(0xfd, 0xe6, 0x8a);

/// Maps world coordinates onto a terminal rectangle
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub area: Rect,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Viewport {
    fn scale_x(&self, x: f64) -> f64 {
        (x + self.offset_x) / CANVAS_WIDTH * f64::from(self.area.width)
    }

    fn scale_y(&self, y: f64) -> f64 {
        (y + self.offset_y) / CANVAS_HEIGHT * f64::from(self.area.height)
    }

    /// Terminal cell for a world point, if it is on screen
    #[must_use]
    pub fn to_cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = self.scale_x(x).floor();
        let row = self.scale_y(y).floor();
        if col < 0.0
            || row < 0.0
            || col >= f64::from(self.area.width)
            || row >= f64::from(self.area.height)
        {
            return None;
        }
        Some((self.area.x + col as u16, self.area.y + row as u16))
    }

    /// Cell span covered by a world rectangle, clipped to the viewport.
    /// Anything on screen covers at least one cell.
    #[must_use]
    pub fn span(&self, x: f64, y: f64, width: f64, height: f64) -> Option<Rect> {
        let left = self.scale_x(x).floor().max(0.0);
        let right = self.scale_x(x + width).ceil().min(f64::from(self.area.width));
        let top = self.scale_y(y).floor().max(0.0);
        let bottom = self.scale_y(y + height).ceil().min(f64::from(self.area.height));
        if right <= left || bottom <= top {
            return None;
        }
        Some(Rect {
            x: self.area.x + left as u16,
            y: self.area.y + top as u16,
            width: (right - left) as u16,
            height: (bottom - top) as u16,
        })
    }
}

/// Playfield size in cells for the given terminal area, keeping the canvas
/// proportions and leaving room for the info panel
#[must_use]
pub fn calculate_playfield_size(area: Rect) -> (u16, u16) {
    let height = area.height;
    let ideal_width = (f64::from(height) * CANVAS_WIDTH / CANVAS_HEIGHT * CELL_ASPECT) as u16;
    let width = ideal_width.min(area.width.saturating_sub(INFO_WIDTH));
    (width, height)
}

pub fn render(f: &mut Frame, app: &mut App) {
    let (field_width, field_height) = calculate_playfield_size(f.area());
    if field_width < MIN_FIELD_WIDTH + 2 || field_height < MIN_FIELD_HEIGHT + 2 {
        let warning_text = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto keep building.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Tower Builder"));
        f.render_widget(warning_text, centered_rect(60, 40, f.area()));
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(field_width), Constraint::Min(INFO_WIDTH)])
        .split(f.area());

    let field_block = Block::default()
        .borders(Borders::ALL)
        .title(" TOWER BUILDER ");
    let field = field_block.inner(main_layout[0]);
    f.render_widget(field_block, main_layout[0]);

    let decorations: Vec<Decoration> = app
        .world
        .query::<&Decoration>()
        .iter(&app.world)
        .cloned()
        .collect();
    let shake = app.simulation().shake();
    let (shake_x, shake_y) = shake.jitter(&mut app.world.resource_mut::<SceneRng>().0);

    let simulation = app.world.resource::<Simulation>();
    let snapshot = simulation.snapshot();
    let viewport = Viewport {
        area: field,
        offset_x: shake_x,
        offset_y: snapshot.camera_y + shake_y,
    };

    render_sky(f, field, snapshot.score);
    render_decorations(f, &viewport, snapshot.camera_y, &decorations, snapshot.score);
    render_tower(f, &viewport, &snapshot);
    render_particles(f, &viewport, &snapshot);

    let best = app.world.resource::<BestScore>().get();
    match snapshot.status {
        GameStatus::Idle => render_idle_overlay(f, field),
        GameStatus::GameOver => render_game_over_overlay(f, field, snapshot.score, best),
        GameStatus::Playing => {}
    }

    render_info(f, app, main_layout[1]);
}

fn render_sky(f: &mut Frame, area: Rect, score: u32) {
    let sky = sky_for_score(score);
    let buffer = f.buffer_mut();
    for y in area.top()..area.bottom() {
        // Upper half uses the light tone, lower half the deep one
        let color = if y < area.top() + area.height / 2 {
            sky.top
        } else {
            sky.bottom
        };
        for x in area.left()..area.right() {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_symbol(" ");
                cell.set_bg(color);
            }
        }
    }
}

fn render_decorations(
    f: &mut Frame,
    viewport: &Viewport,
    camera_y: f64,
    decorations: &[Decoration],
    score: u32,
) {
    for decoration in decorations {
        // Stars sit far away and barely scroll; birds are closer
        let (symbol, parallax) = match decoration.kind {
            DecorationKind::Star if score > STARS_AFTER => ("·", 0.05),
            DecorationKind::Star => continue,
            DecorationKind::Bird => ("v", 0.5),
        };
        let far = Viewport {
            offset_y: viewport.offset_y - camera_y * (1.0 - parallax),
            ..*viewport
        };
        if let Some(position) = far.to_cell(decoration.x, decoration.y) {
            if let Some(cell) = f.buffer_mut().cell_mut(position) {
                cell.set_symbol(symbol);
                cell.set_fg(Color::White);
            }
        }
    }
}

fn fill(f: &mut Frame, span: Rect, symbol: &str, color: Color) {
    let buffer = f.buffer_mut();
    for y in span.top()..span.bottom() {
        for x in span.left()..span.right() {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_symbol(symbol);
                cell.set_fg(color);
            }
        }
    }
}

fn render_tower(f: &mut Frame, viewport: &Viewport, snapshot: &Snapshot<'_>) {
    // Ground
    if let Some(span) = viewport.span(
        -100.0,
        CANVAS_HEIGHT - GROUND_HEIGHT,
        CANVAS_WIDTH + 200.0,
        100.0,
    ) {
        fill(f, span, "█", GROUND_COLOR);
    }

    for (index, block) in snapshot.tower.iter().enumerate() {
        if let Some(span) = viewport.span(block.x, block.y, block.width, block.height) {
            fill(f, span, "█", block.color);
        }
        if index == 0 {
            // Lobby door on the foundation
            if let Some(span) = viewport.span(block.center_x() - 15.0, block.y + 15.0, 30.0, 35.0) {
                fill(f, span, "▒", DOOR_COLOR);
            }
        }
    }

    let Some(active) = snapshot.active else {
        return;
    };
    if snapshot.status != GameStatus::Playing {
        return;
    }

    if !active.is_falling {
        // Crane cable from off screen down to the hook
        let top = viewport.area.top();
        if let Some((x, block_row)) = viewport.to_cell(active.center_x(), active.y) {
            let hook_row = block_row.saturating_sub(1).max(top);
            let buffer = f.buffer_mut();
            for y in top..hook_row {
                if let Some(cell) = buffer.cell_mut((x, y)) {
                    cell.set_symbol("│");
                    cell.set_fg(CRANE_COLOR);
                }
            }
            if let Some(cell) = buffer.cell_mut((x, hook_row)) {
                cell.set_symbol("┴");
                cell.set_fg(CRANE_COLOR);
            }
        }
    }

    if let Some(span) = viewport.span(active.x, active.y, active.width, active.height) {
        fill(f, span, "█", active.color);
    }
}

fn render_particles(f: &mut Frame, viewport: &Viewport, snapshot: &Snapshot<'_>) {
    for particle in snapshot.particles {
        let Some(position) = viewport.to_cell(particle.x, particle.y) else {
            continue;
        };
        // Fade by glyph weight as life runs out
        let symbol = if particle.life > 0.66 {
            "●"
        } else if particle.life > 0.33 {
            "•"
        } else {
            "·"
        };
        if let Some(cell) = f.buffer_mut().cell_mut(position) {
            cell.set_symbol(symbol);
            cell.set_fg(particle.color);
        }
    }
}

fn render_idle_overlay(f: &mut Frame, area: Rect) {
    let text = Text::from(vec![
        Line::from(Span::styled(
            "TOWER BUILDER",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Defy gravity and build the"),
        Line::from("greatest skyscraper in the world"),
        Line::from(""),
        Line::from(Span::styled(
            "Press Space to start building",
            Style::default().fg(Color::LightBlue),
        )),
    ]);
    render_overlay(f, area, text, Color::Blue);
}

fn render_game_over_overlay(f: &mut Frame, area: Rect, score: u32, best: u32) {
    let mut lines = vec![
        Line::from(Span::styled(
            "THE TOWER COLLAPSED!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("{score}"),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from("FINAL SCORE"),
    ];
    if score > 0 && score >= best {
        lines.push(Line::from(Span::styled(
            "* NEW RECORD *",
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from("Press Space to rebuild"));
    render_overlay(f, area, Text::from(lines), Color::Red);
}

fn render_overlay(f: &mut Frame, area: Rect, text: Text<'_>, accent: Color) {
    let overlay_area = centered_rect(90, 50, area);
    f.render_widget(Clear, overlay_area);
    let overlay = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent)),
        );
    f.render_widget(overlay, overlay_area);
}

fn render_info(f: &mut Frame, app: &App, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(7), // Score, combo and best
            Constraint::Min(4),    // Commentary
            Constraint::Length(6), // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("FLOORS")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let simulation = app.simulation();
    let score = simulation.score();
    let combo = simulation.combo();
    let sound_on = app.world.resource::<AudioState>().is_sound_enabled();

    let mut stats = vec![
        Line::from(Span::styled(
            format!("Score: {score}"),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("Best: {}", app.best_score())),
        Line::from(format!("Sky: {}", sky_for_score(score).label)),
        Line::from(format!("Style: {}", theme_for_score(score).name)),
        Line::from(format!("Sound: {}", if sound_on { "on" } else { "muted" })),
    ];
    if combo > 1 {
        stats.push(Line::from(Span::styled(
            format!("Perfect x{combo}"),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
    }
    f.render_widget(Paragraph::new(stats), info_layout[1]);

    let comment = app
        .world
        .get_resource::<Commentator>()
        .and_then(Commentator::latest)
        .map(|comment| format!("\"{}\"", comment.text))
        .unwrap_or_default();
    let commentary = Paragraph::new(comment)
        .style(Style::default().fg(Color::LightCyan))
        .block(Block::default().borders(Borders::TOP).title("Architect"))
        .wrap(Wrap { trim: true });
    f.render_widget(commentary, info_layout[2]);

    let controls = Paragraph::new(
        "Space/Enter/Click: drop\n\
        M: Mute\n\
        Q/Esc: Quit",
    )
    .block(Block::default().borders(Borders::TOP).title("Controls"))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
#[must_use]
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
