use std::fmt::Write;

use colored::Colorize;
use gltext_data::FontAtlasData;

const GLYPH_LABEL: (u8, u8, u8) = (0xfe, 0x80, 0x19);

/// Renders the occupied part of the atlas with half-block characters, two
/// pixel rows per terminal line. Empty pixels show the cell grid, with each
/// cell's top-left corner labelled by its character.
pub fn render_atlas(atlas: &FontAtlasData) -> String {
    let layout = &atlas.layout;
    let display_width = layout.columns * layout.cell_width;
    let display_height = layout.rows * layout.cell_height;

    let mut output = String::new();

    // column markers
    write!(&mut output, "   ").ok();
    for x in 0..display_width {
        if x % layout.cell_width == 0 {
            let col = (x / layout.cell_width) % 10;
            write!(&mut output, "{}", col.to_string().blue()).ok();
        } else {
            write!(&mut output, " ").ok();
        }
    }
    writeln!(&mut output).ok();

    for y in (0..display_height).step_by(2) {
        // row marker
        if y % layout.cell_height == 0 {
            write!(&mut output, "{:>2} ", (y / layout.cell_height).to_string().blue()).ok();
        } else {
            write!(&mut output, "   ").ok();
        }

        render_row(atlas, y, display_height, &mut output);
        writeln!(&mut output).ok();
    }

    output
}

fn render_row(atlas: &FontAtlasData, y: i32, display_height: i32, output: &mut String) {
    let layout = &atlas.layout;
    let display_width = layout.columns * layout.cell_width;
    let has_bottom = y + 1 < display_height;

    for x in 0..display_width {
        let a_top = atlas.alpha_at(x, y);
        let a_bottom = if has_bottom { atlas.alpha_at(x, y + 1) } else { 0 };

        // Determine which half-block character to use
        match (a_top > 0, a_bottom > 0) {
            (true, true) => {
                let px = "▀"
                    .truecolor(a_top, a_top, a_top)
                    .on_truecolor(a_bottom, a_bottom, a_bottom);
                write!(output, "{px}").ok();
            },
            (true, false) => {
                write!(output, "{}", "▀".truecolor(a_top, a_top, a_top)).ok();
            },
            (false, true) => {
                write!(output, "{}", "▄".truecolor(a_bottom, a_bottom, a_bottom)).ok();
            },
            (false, false) => {
                let on_h_grid = x % layout.cell_width == 0;
                let on_v_grid_top = y % layout.cell_height == 0;
                let on_v_grid_bottom = has_bottom && (y + 1) % layout.cell_height == 0;

                if on_h_grid && (on_v_grid_top || on_v_grid_bottom) {
                    let row_y = if on_v_grid_top { y } else { y + 1 };
                    let slot = (row_y / layout.cell_height * layout.columns
                        + x / layout.cell_width) as usize;

                    match atlas.glyphs.get(slot) {
                        Some(glyph) if !glyph.is_missing_glyph() => {
                            let (r, g, b) = GLYPH_LABEL;
                            write!(output, "{}", glyph.codepoint.to_string().truecolor(r, g, b))
                                .ok();
                        },
                        Some(_) => {
                            write!(output, "{}", "?".bright_red()).ok();
                        },
                        None => {
                            write!(output, "{}", "+".bright_black()).ok();
                        },
                    }
                } else if on_h_grid {
                    write!(output, "{}", "|".bright_black()).ok();
                } else if on_v_grid_top || on_v_grid_bottom {
                    write!(output, "{}", "-".bright_black()).ok();
                } else {
                    write!(output, " ").ok();
                }
            },
        }
    }
}
