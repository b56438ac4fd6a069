//! Text level layouts and the parser that turns them into entity placements.
//!
//! A level is a grid of characters, one row per line. Every character is one
//! cell wide; column `c` starts at `c * cell_width` and row `r` sits on the
//! line `r * row_height`.
//!
//! | Char | Meaning |
//! |------|---------|
//! | `[`…`]` | platform block; both brackets count as platform cells |
//! | `F` (in a block) | finish target above that sub-cell, marks the platform as a finish platform |
//! | `E` (in a block) | enemy hovering above that sub-cell |
//! | `E` (bare) | enemy hovering above the row line |
//! | `P` | player spawn |
//! | anything else | empty cell |
//!
//! Parsing never fails. Grammar problems become [`LevelDiagnostic`]s with a
//! defined recovery: an unterminated block runs to the end of its row, the
//! last `P` wins, and a level without `P` spawns the player at its centre.
//! [`validate_level_grammar`] turns the diagnostics into a hard error for
//! callers that want strictness.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::collision::{LevelBounds, Rect};
use crate::entities::Platform;

/// The level that ships with the game.
pub const BUILTIN_LEVEL: &str = include_str!("../../../assets/levels/level1.txt");

/// Rows of level text. Rows are expected to share one length; shorter rows are
/// padded with empty cells and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelGrid {
    rows: Vec<String>,
}

impl LevelGrid {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        Self {
            rows: rows.iter().map(|r| r.as_ref().to_string()).collect(),
        }
    }

    /// Split on newlines, dropping `\r` and trailing blank lines.
    pub fn from_text(text: &str) -> Self {
        let mut rows: Vec<String> = text
            .lines()
            .map(|line| line.trim_end_matches('\r').to_string())
            .collect();
        while rows.last().is_some_and(|r| r.trim().is_empty()) {
            rows.pop();
        }
        Self { rows }
    }

    pub fn builtin() -> Self {
        Self::from_text(BUILTIN_LEVEL)
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn width_cells(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.chars().count())
            .max()
            .unwrap_or(0)
    }

    pub fn height_rows(&self) -> usize {
        self.rows.len()
    }
}

/// World-space sizes used to place parsed cells.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LevelMetrics {
    pub cell_width: f32,
    pub row_height: f32,
    pub platform_height: f32,
    pub player_width: f32,
    pub player_height: f32,
    /// Extra gap between a finish target and the player's head height.
    pub finish_margin: f32,
    pub finish_size: f32,
    pub enemy_width: f32,
    pub enemy_height: f32,
}

impl Default for LevelMetrics {
    fn default() -> Self {
        Self {
            cell_width: 32.0,
            row_height: 64.0,
            platform_height: 16.0,
            player_width: 32.0,
            player_height: 48.0,
            finish_margin: 8.0,
            finish_size: 32.0,
            enemy_width: 32.0,
            enemy_height: 32.0,
        }
    }
}

impl LevelMetrics {
    pub fn validate(&self) -> Result<(), String> {
        let sizes = [
            ("cell_width", self.cell_width),
            ("row_height", self.row_height),
            ("platform_height", self.platform_height),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("finish_size", self.finish_size),
            ("enemy_width", self.enemy_width),
            ("enemy_height", self.enemy_height),
        ];
        for (name, value) in sizes {
            if !(value > 0.0) {
                return Err(format!("Level metrics validation failed: {name} must be > 0"));
            }
        }
        if self.finish_margin < 0.0 {
            return Err("Level metrics validation failed: finish_margin must be >= 0".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelDiagnostic {
    /// `[` without a matching `]`; the block was closed at the end of the row.
    UnterminatedBlock { row: usize, column: usize },
    /// A second (or later) `P`; this one replaced the earlier spawn.
    DuplicateSpawn { row: usize, column: usize },
    RaggedRow { row: usize, len: usize, expected: usize },
    /// No `P` anywhere; the player spawns at the level centre.
    MissingSpawn,
}

impl LevelDiagnostic {
    /// Whether the condition is part of the grammar's normal recovery rather
    /// than an authoring mistake.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::MissingSpawn)
    }
}

impl fmt::Display for LevelDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedBlock { row, column } => {
                write!(f, "unterminated '[' at row {row}, column {column}")
            }
            Self::DuplicateSpawn { row, column } => {
                write!(f, "duplicate 'P' at row {row}, column {column}")
            }
            Self::RaggedRow { row, len, expected } => {
                write!(f, "row {row} has {len} cells, expected {expected}")
            }
            Self::MissingSpawn => write!(f, "no 'P' spawn marker"),
        }
    }
}

/// Everything the parser found, in row-major scan order.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub platforms: Vec<Platform>,
    pub finish_targets: Vec<Rect>,
    pub enemies: Vec<Rect>,
    pub spawn: Option<Rect>,
    pub bounds: LevelBounds,
    pub diagnostics: Vec<LevelDiagnostic>,
}

impl LevelLayout {
    /// The parsed spawn, or a player box centred in the level.
    pub fn spawn_or_center(&self, metrics: &LevelMetrics) -> Rect {
        if let Some(spawn) = self.spawn {
            return spawn;
        }
        let size = self.bounds.size();
        Rect::new(
            (size.x - metrics.player_width) * 0.5,
            (size.y - metrics.player_height) * 0.5,
            metrics.player_width,
            metrics.player_height,
        )
    }
}

pub fn parse_level(grid: &LevelGrid, metrics: &LevelMetrics) -> LevelLayout {
    let width_cells = grid.width_cells();
    let mut layout = LevelLayout {
        platforms: Vec::new(),
        finish_targets: Vec::new(),
        enemies: Vec::new(),
        spawn: None,
        bounds: LevelBounds {
            width: (width_cells as f32 * metrics.cell_width).round() as u32,
            height: (grid.height_rows() as f32 * metrics.row_height).round() as u32,
        },
        diagnostics: Vec::new(),
    };

    for (row, line) in grid.rows().iter().enumerate() {
        let cells: Vec<char> = line.chars().collect();
        if cells.len() != width_cells {
            layout.diagnostics.push(LevelDiagnostic::RaggedRow {
                row,
                len: cells.len(),
                expected: width_cells,
            });
        }
        parse_row(&cells, row, metrics, &mut layout);
    }

    if layout.spawn.is_none() {
        layout.diagnostics.push(LevelDiagnostic::MissingSpawn);
    }
    for diagnostic in &layout.diagnostics {
        log::warn!("Level grammar: {diagnostic}");
    }
    layout
}

fn parse_row(cells: &[char], row: usize, metrics: &LevelMetrics, layout: &mut LevelLayout) {
    let line_y = row as f32 * metrics.row_height;
    let mut column = 0;
    while column < cells.len() {
        match cells[column] {
            '[' => {
                let close = cells[column + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .map(|offset| column + 1 + offset);
                // Exclusive end of the block; an unterminated block owns the rest of the row.
                let end = match close {
                    Some(close) => close + 1,
                    None => {
                        layout
                            .diagnostics
                            .push(LevelDiagnostic::UnterminatedBlock { row, column });
                        cells.len()
                    }
                };
                parse_block(cells, column, end, line_y, metrics, layout);
                column = end;
            }
            'P' => {
                if layout.spawn.is_some() {
                    layout
                        .diagnostics
                        .push(LevelDiagnostic::DuplicateSpawn { row, column });
                }
                layout.spawn = Some(Rect::new(
                    column as f32 * metrics.cell_width,
                    line_y - metrics.player_height,
                    metrics.player_width,
                    metrics.player_height,
                ));
                column += 1;
            }
            'E' => {
                layout.enemies.push(enemy_rect(column, line_y, metrics));
                column += 1;
            }
            _ => column += 1,
        }
    }
}

/// `start` is the `[` column, `end` is one past the closing `]` (or the row end).
fn parse_block(
    cells: &[char],
    start: usize,
    end: usize,
    line_y: f32,
    metrics: &LevelMetrics,
    layout: &mut LevelLayout,
) {
    let mut is_finish = false;
    for (column, &c) in cells.iter().enumerate().take(end).skip(start + 1) {
        match c {
            'F' => {
                is_finish = true;
                let center_x = (column as f32 + 0.5) * metrics.cell_width;
                layout.finish_targets.push(Rect::new(
                    center_x - metrics.finish_size * 0.5,
                    line_y - metrics.player_height - metrics.finish_margin,
                    metrics.finish_size,
                    metrics.finish_size,
                ));
            }
            'E' => layout.enemies.push(enemy_rect(column, line_y, metrics)),
            _ => {}
        }
    }

    let width_cells = (end - start) as u32;
    layout.platforms.push(Platform {
        rect: Rect::new(
            start as f32 * metrics.cell_width,
            line_y,
            width_cells as f32 * metrics.cell_width,
            metrics.platform_height,
        ),
        is_finish,
        width_cells,
    });
}

fn enemy_rect(column: usize, line_y: f32, metrics: &LevelMetrics) -> Rect {
    let center_x = (column as f32 + 0.5) * metrics.cell_width;
    Rect::new(
        center_x - metrics.enemy_width * 0.5,
        line_y - metrics.player_height,
        metrics.enemy_width,
        metrics.enemy_height,
    )
}

/// Reject layouts with authoring mistakes. A missing spawn is allowed: the
/// centre fallback is part of the grammar.
pub fn validate_level_grammar(layout: &LevelLayout) -> Result<(), String> {
    let problems: Vec<String> = layout
        .diagnostics
        .iter()
        .filter(|d| !d.is_recoverable())
        .map(|d| d.to_string())
        .collect();
    if problems.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "Level validation failed: {}",
            problems.join("; ")
        ))
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelGrid, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read level {}: {e}", path.display()))?;
    let grid = LevelGrid::from_text(&raw);
    if grid.height_rows() == 0 {
        return Err(format!("Level {} contains no rows", path.display()));
    }
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "ledge_level_test_{}_{}_{}.txt",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn parse(rows: &[&str]) -> LevelLayout {
        parse_level(&LevelGrid::from_rows(rows), &LevelMetrics::default())
    }

    #[test]
    fn minimal_block_is_three_cells_at_origin() {
        let layout = parse(&["[=]"]);
        assert_eq!(layout.platforms.len(), 1);
        let p = layout.platforms[0];
        assert_eq!(p.width_cells, 3);
        assert_eq!(p.rect.x, 0.0);
        assert_eq!(p.rect.w, 96.0);
        assert_eq!(p.rect.h, 16.0);
        assert!(!p.is_finish);
        assert!(layout.finish_targets.is_empty());
    }

    #[test]
    fn finish_block_centres_target_in_block() {
        let layout = parse(&["[===F===]"]);
        assert_eq!(layout.platforms.len(), 1);
        let p = layout.platforms[0];
        assert_eq!(p.width_cells, 9);
        assert!(p.is_finish);

        assert_eq!(layout.finish_targets.len(), 1);
        let target = layout.finish_targets[0];
        assert!((target.center().x - p.rect.center().x).abs() < 1e-4);
        // Above the platform top by player height plus margin.
        assert_eq!(target.y, p.rect.y - 48.0 - 8.0);
    }

    #[test]
    fn block_and_bare_enemies_are_both_collected() {
        let layout = parse(&["[=E=]  E  "]);
        assert_eq!(layout.enemies.len(), 2);
        assert_eq!(layout.platforms.len(), 1);
        // In-block enemy sits over column 2, bare one over column 7.
        assert!((layout.enemies[0].center().x - 80.0).abs() < 1e-4);
        assert!((layout.enemies[1].center().x - 240.0).abs() < 1e-4);
    }

    #[test]
    fn enemies_hover_one_player_height_above_their_row() {
        let layout = parse(&["          ", "[==E==]   "]);
        let enemy = layout.enemies[0];
        assert_eq!(enemy.y, 64.0 - 48.0);
    }

    #[test]
    fn blocks_advance_cursor_by_their_width() {
        let layout = parse(&["[=] [====]P"]);
        assert_eq!(layout.platforms.len(), 2);
        assert_eq!(layout.platforms[1].rect.x, 4.0 * 32.0);
        assert_eq!(layout.platforms[1].width_cells, 6);
        let spawn = layout.spawn.expect("spawn parsed");
        assert_eq!(spawn.x, 10.0 * 32.0);
    }

    #[test]
    fn rows_are_stacked_by_row_height() {
        let layout = parse(&["   ", "   ", "[=]"]);
        assert_eq!(layout.platforms[0].rect.y, 128.0);
        assert_eq!(layout.bounds.width, 96);
        assert_eq!(layout.bounds.height, 192);
    }

    #[test]
    fn player_marker_inside_block_is_ignored() {
        let layout = parse(&["[=P=]"]);
        assert!(layout.spawn.is_none());
        assert!(layout.diagnostics.contains(&LevelDiagnostic::MissingSpawn));
    }

    #[test]
    fn missing_spawn_falls_back_to_level_centre() {
        let layout = parse(&["          ", "[========]"]);
        let spawn = layout.spawn_or_center(&LevelMetrics::default());
        assert!((spawn.center().x - 160.0).abs() < 1e-4);
        assert!((spawn.center().y - 64.0).abs() < 1e-4);
        assert!(validate_level_grammar(&layout).is_ok());
    }

    #[test]
    fn last_spawn_marker_wins_and_is_reported() {
        let layout = parse(&["P  P"]);
        assert_eq!(layout.spawn.map(|s| s.x), Some(96.0));
        assert_eq!(
            layout.diagnostics,
            vec![LevelDiagnostic::DuplicateSpawn { row: 0, column: 3 }]
        );
        assert!(validate_level_grammar(&layout).is_err());
    }

    #[test]
    fn unterminated_block_runs_to_end_of_row() {
        let layout = parse(&["P [==E=="]);
        assert_eq!(layout.platforms.len(), 1);
        let p = layout.platforms[0];
        assert_eq!(p.rect.x, 64.0);
        assert_eq!(p.width_cells, 6);
        assert_eq!(layout.enemies.len(), 1);
        assert_eq!(
            layout.diagnostics,
            vec![LevelDiagnostic::UnterminatedBlock { row: 0, column: 2 }]
        );
        let err = validate_level_grammar(&layout).expect_err("strict check rejects");
        assert!(err.contains("unterminated"));
    }

    #[test]
    fn ragged_rows_are_reported() {
        let layout = parse(&["P    ", "[=]"]);
        assert!(layout
            .diagnostics
            .contains(&LevelDiagnostic::RaggedRow { row: 1, len: 3, expected: 5 }));
    }

    #[test]
    fn multiple_finish_markers_yield_one_target_each() {
        let layout = parse(&["[F==F]"]);
        assert_eq!(layout.finish_targets.len(), 2);
        assert!(layout.platforms[0].is_finish);
    }

    #[test]
    fn stray_closing_bracket_is_empty() {
        let layout = parse(&["] P"]);
        assert!(layout.platforms.is_empty());
        assert_eq!(layout.spawn.map(|s| s.x), Some(64.0));
    }

    #[test]
    fn from_text_trims_carriage_returns_and_trailing_blank_lines() {
        let grid = LevelGrid::from_text("P  \r\n[=]\r\n\n\n");
        assert_eq!(grid.rows(), &["P  ".to_string(), "[=]".to_string()]);
    }

    #[test]
    fn builtin_level_parses_cleanly() {
        let layout = parse_level(&LevelGrid::builtin(), &LevelMetrics::default());
        assert!(layout.diagnostics.is_empty(), "{:?}", layout.diagnostics);
        assert!(layout.spawn.is_some());
        assert!(!layout.finish_targets.is_empty());
        assert!(!layout.enemies.is_empty());
    }

    #[test]
    fn load_level_from_path_reads_text() {
        let path = temp_file_path("load");
        fs::write(&path, "P   \n[==]\n").expect("write temp level");
        let grid = load_level_from_path(&path).expect("level should load");
        assert_eq!(grid.height_rows(), 2);
        assert_eq!(grid.width_cells(), 4);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_rejects_empty_file() {
        let path = temp_file_path("empty");
        fs::write(&path, "\n\n").expect("write temp level");
        let err = load_level_from_path(&path).expect_err("empty level should fail");
        assert!(err.contains("no rows"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn metrics_validation_rejects_zero_cell() {
        let metrics = LevelMetrics {
            cell_width: 0.0,
            ..LevelMetrics::default()
        };
        assert!(metrics.validate().is_err());
        assert!(LevelMetrics::default().validate().is_ok());
    }
}
