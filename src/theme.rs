use ratatui::style::{Color, Modifier, Style};

// Palette for the two panes, the diagnostics strip and the status line.
// RGB values degrade to the nearest xterm-256 entry unless the terminal
// advertises truecolor.

pub const ACCENT_RGB: (u8, u8, u8) = (200, 100, 0);
pub const ACCENT_ALT_RGB: (u8, u8, u8) = (255, 165, 0);
pub const WARNING_RGB: (u8, u8, u8) = (230, 80, 60);

pub fn rgb_to_color(rgb: (u8, u8, u8)) -> Color {
    let truecolor = std::env::var("COLORTERM")
        .map(|v| {
            let v = v.to_lowercase();
            v.contains("truecolor") || v.contains("24bit")
        })
        .unwrap_or(false);
    map_rgb(rgb, truecolor)
}

fn map_rgb((r, g, b): (u8, u8, u8), truecolor: bool) -> Color {
    if truecolor {
        Color::Rgb(r, g, b)
    } else {
        Color::Indexed(xterm_index(r, g, b))
    }
}

fn xterm_index(r: u8, g: u8, b: u8) -> u8 {
    const LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];
    let cube = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (cube(r), cube(g), cube(b));
    let cube_rgb = (
        LEVELS[r6 as usize],
        LEVELS[g6 as usize],
        LEVELS[b6 as usize],
    );

    // Gray ramp 232..=255 runs 8, 18, .., 238.
    let avg = (r as u16 + g as u16 + b as u16) / 3;
    let gray_step = (avg.saturating_sub(8) / 10).min(23) as u8;
    let gray = 8 + gray_step * 10;

    let dist = |(cr, cg, cb): (u8, u8, u8)| {
        let d = |a: u8, b: u8| (a as i32 - b as i32).pow(2);
        d(r, cr) + d(g, cg) + d(b, cb)
    };
    if dist((gray, gray, gray)) < dist(cube_rgb) {
        232 + gray_step
    } else {
        16 + 36 * r6 + 6 * g6 + b6
    }
}

pub fn accent() -> Color {
    rgb_to_color(ACCENT_RGB)
}

pub fn accent_alt() -> Color {
    rgb_to_color(ACCENT_ALT_RGB)
}

// Pane borders
pub fn focus_border() -> Color {
    accent_alt()
}
pub fn idle_border() -> Color {
    Color::DarkGray
}

pub fn warning() -> Color {
    rgb_to_color(WARNING_RGB)
}

// Status line
pub fn status_bar() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}
pub fn status_bar_busy() -> Style {
    Style::default()
        .bg(accent())
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

pub fn debug_highlight() -> Color {
    accent_alt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truecolor_keeps_rgb() {
        assert_eq!(map_rgb(ACCENT_RGB, true), Color::Rgb(200, 100, 0));
    }

    #[test]
    fn pure_colors_land_on_cube_corners() {
        assert_eq!(map_rgb((255, 0, 0), false), Color::Indexed(196));
        assert_eq!(map_rgb((0, 0, 0), false), Color::Indexed(16));
    }

    #[test]
    fn mid_gray_prefers_gray_ramp() {
        match map_rgb((128, 128, 128), false) {
            Color::Indexed(i) => assert!((232..=255).contains(&i)),
            other => panic!("unexpected color {other:?}"),
        }
    }
}
