//! Output formatting, text rendering and progress for the CLI

use std::{thread, time::Duration};

use crate::{
    environment::{Grid, Position},
    q_learning::QTable,
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, String)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Format a path as `[(0, 0), (0, 1), ...]`
pub fn format_path(path: &[Position]) -> String {
    let cells: Vec<String> = path.iter().map(Position::to_string).collect();
    format!("[{}]", cells.join(", "))
}

fn cell_glyph(grid: &Grid, pos: Position) -> char {
    if grid.is_goal(pos) {
        'G'
    } else if grid.is_obstacle(pos) {
        '#'
    } else if pos == grid.start() {
        'S'
    } else {
        '.'
    }
}

/// One text line per grid row, cells separated by spaces, each line
/// newline-terminated.
fn render_rows(grid: &Grid, glyph: impl Fn(Position) -> char) -> String {
    (0..grid.size())
        .map(|row| {
            let cells: Vec<String> = (0..grid.size())
                .map(|col| glyph(Position::new(row, col)).to_string())
                .collect();
            cells.join(" ") + "\n"
        })
        .collect()
}

/// Render the grid as text, marking `agent` with `A` when given.
///
/// Legend: `S` start, `G` goal, `#` obstacle, `.` open cell.
pub fn render_frame(grid: &Grid, agent: Option<Position>) -> String {
    render_rows(grid, |pos| {
        if Some(pos) == agent { 'A' } else { cell_glyph(grid, pos) }
    })
}

/// Render the greedy action of every cell as an arrow.
///
/// Obstacles keep their `#` so the map shows how the policy routes around
/// them; the goal is shown as `G`.
pub fn render_policy(table: &QTable, grid: &Grid) -> String {
    render_rows(grid, |pos| match cell_glyph(grid, pos) {
        fixed @ ('G' | '#') => fixed,
        _ => table.greedy_action(pos).arrow(),
    })
}

/// Print one frame per path element, pausing `delay` between frames.
pub fn animate_path(grid: &Grid, path: &[Position], delay: Duration) {
    for (step, &pos) in path.iter().enumerate() {
        println!("\nStep {}", step + 1);
        print!("{}", render_frame(grid, Some(pos)));
        if step + 1 < path.len() && !delay.is_zero() {
            thread::sleep(delay);
        }
    }
}
