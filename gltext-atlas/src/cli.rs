use clap::Parser;
use gltext_atlas::{FontDiscovery, FontFamily};
use gltext_data::{AtlasLayout, Padding};

#[derive(Parser, Debug)]
#[command(
    name = "gltext-atlas",
    about = "Bitmap font atlas generator for gltext",
    long_about = "Rasterizes the printable ASCII range of an installed font into a single alpha texture atlas"
)]
pub struct Cli {
    /// Font selection: family or PostScript name, or 1-based index from --list-fonts
    #[arg(value_name = "FONT", required_unless_present = "list_fonts")]
    pub font: Option<String>,

    /// Font size in pixels
    #[arg(short = 's', long, default_value = "24.0", value_name = "SIZE")]
    pub size: f32,

    /// Horizontal padding around each glyph, in pixels
    #[arg(long, default_value = "2", value_name = "PIXELS")]
    pub pad_x: i32,

    /// Vertical padding around each glyph, in pixels
    #[arg(long, default_value = "2", value_name = "PIXELS")]
    pub pad_y: i32,

    /// Output file path
    #[arg(short = 'o', long, default_value = "./font.atlas", value_name = "PATH")]
    pub output: String,

    /// Print the generated atlas to the terminal
    #[arg(short = 'p', long)]
    pub preview: bool,

    /// List available fonts and exit
    #[arg(short = 'L', long)]
    pub list_fonts: bool,
}

impl Cli {
    pub fn padding(&self) -> Padding {
        Padding::new(self.pad_x, self.pad_y)
    }

    /// Resolves the font argument to a name understood by the rasterizer.
    ///
    /// Numeric arguments select from `available_fonts`, anything else is passed
    /// through as a family or PostScript name.
    pub fn font_name(&self, available_fonts: &[FontFamily]) -> Result<String, String> {
        let font = self.font.as_deref().ok_or("No font given")?;

        // Try parsing as index first (1-based)
        if let Ok(idx) = font.parse::<usize>() {
            return if idx > 0 && idx <= available_fonts.len() {
                Ok(available_fonts[idx - 1].name.clone())
            } else {
                Err(format!("Font index {} out of range (1-{})", idx, available_fonts.len()))
            };
        }

        Ok(font.to_string())
    }

    /// Displays the list of available fonts
    pub fn display_font_list(available_fonts: &[FontFamily]) {
        if available_fonts.is_empty() {
            println!("No fonts found!");
            return;
        }

        println!("\nAvailable fonts:");
        println!("{:<4} {:<40} Faces", "ID", "Font Name");
        println!("{}", "-".repeat(56));

        for (i, font) in available_fonts.iter().enumerate() {
            let mono = if font.monospaced { " (mono)" } else { "" };
            println!("{:<4} {:<40} {}{mono}", i + 1, font.name, font.faces.len());
        }

        println!("\nTotal: {} font families", available_fonts.len());
    }

    /// Lists the installed font families, in the order used by numeric selection.
    pub fn discover_fonts() -> Vec<FontFamily> {
        FontDiscovery::new().discover_families()
    }

    /// Validates the CLI arguments
    pub fn validate(&self) -> Result<(), String> {
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err("Font size must be positive".to_string());
        }

        if self.pad_x < 0 || self.pad_y < 0 {
            return Err("Padding must not be negative".to_string());
        }

        let max_pad = AtlasLayout::CELL_SIZE_MAX / 2;
        if self.pad_x > max_pad || self.pad_y > max_pad {
            return Err(format!("Padding must not exceed {max_pad} pixels"));
        }

        if self.output.is_empty() {
            return Err("Output path must not be empty".to_string());
        }

        Ok(())
    }

    /// Prints a summary of the configuration
    pub fn print_summary(&self, font_name: &str) {
        println!("\nGenerating font atlas:");
        println!("  Font: {font_name}");
        println!("  Size: {}px", self.size);
        println!("  Padding: {}x{}px", self.pad_x, self.pad_y);
        println!("  Output: {}", self.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_for(font: &str) -> Cli {
        Cli {
            font: Some(font.to_string()),
            size: 24.0,
            pad_x: 2,
            pad_y: 2,
            output: "test.atlas".to_string(),
            preview: false,
            list_fonts: false,
        }
    }

    fn family(name: &str) -> FontFamily {
        FontFamily { name: name.to_string(), faces: Vec::new(), monospaced: true }
    }

    #[test]
    fn test_cli_validation() {
        assert!(cli_for("test").validate().is_ok());
    }

    #[test]
    fn test_invalid_font_size() {
        let negative = Cli { size: -1.0, ..cli_for("test") };
        assert!(negative.validate().is_err());

        let nan = Cli { size: f32::NAN, ..cli_for("test") };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_invalid_padding() {
        let negative = Cli { pad_y: -1, ..cli_for("test") };
        assert!(negative.validate().is_err());

        let oversized = Cli { pad_x: 91, ..cli_for("test") };
        assert!(oversized.validate().is_err());
    }

    #[test]
    fn test_font_selection_by_index() {
        let fonts = [family("DejaVu Sans Mono"), family("Hack")];

        assert_eq!(cli_for("2").font_name(&fonts), Ok("Hack".to_string()));
        assert!(cli_for("3").font_name(&fonts).is_err());
        assert!(cli_for("0").font_name(&fonts).is_err());
    }

    #[test]
    fn test_font_selection_by_name_is_passed_through() {
        assert_eq!(cli_for("Helvetica").font_name(&[]), Ok("Helvetica".to_string()));
    }

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::parse_from(["gltext-atlas", "Hack", "-s", "40", "--pad-x", "1", "-p"]);

        assert_eq!(cli.font.as_deref(), Some("Hack"));
        assert_eq!(cli.size, 40.0);
        assert_eq!(cli.padding(), Padding::new(1, 2));
        assert!(cli.preview);

        let cli = Cli::parse_from(["gltext-atlas", "--list-fonts"]);
        assert!(cli.list_fonts);
        assert!(cli.font.is_none());
    }
}
