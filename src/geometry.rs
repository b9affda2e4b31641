use core::fmt::Display;

// DDRAM line base addresses, already OR'd with the set DDRAM address command
const LCD_LINE_ADR1: u8 = 0x80; //  line 1, any width
const LCD_LINE_ADR2: u8 = 0xC0; //  line 2, any width
const LCD_LINE_ADR3_20: u8 = 0x94; //  line 3 on a 20 column display
const LCD_LINE_ADR4_20: u8 = 0xD4; //  line 4 on a 20 column display
const LCD_LINE_ADR3_16: u8 = 0x90; //  line 3 on a 16 column display
const LCD_LINE_ADR4_16: u8 = 0xD0; //  line 4 on a 16 column display

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// A display line, numbered from one.
pub enum LcdLine {
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
}

/// Every controller line in ascending order. A `static` so `Geometry::lines` can hand out
/// `'static` prefixes of it.
pub static LCD_LINES: [LcdLine; 4] = [LcdLine::One, LcdLine::Two, LcdLine::Three, LcdLine::Four];

impl TryFrom<u8> for LcdLine {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LcdLine::One),
            2 => Ok(LcdLine::Two),
            3 => Ok(LcdLine::Three),
            4 => Ok(LcdLine::Four),
            _ => Err(()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Column widths with a known line 3 and line 4 layout.
pub enum LineWidth {
    Cols16,
    Cols20,
}

impl LineWidth {
    pub const fn columns(self) -> u8 {
        match self {
            LineWidth::Cols16 => 16,
            LineWidth::Cols20 => 20,
        }
    }
}

impl TryFrom<u8> for LineWidth {
    type Error = ();

    fn try_from(columns: u8) -> Result<Self, Self::Error> {
        match columns {
            16 => Ok(LineWidth::Cols16),
            20 => Ok(LineWidth::Cols20),
            _ => Err(()),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Rows and column width of the attached display.
///
/// `rows` is kept as given. Only rows 1 through 4 exist on the controller, so a value outside
/// that range makes the clear screen operation a no-op.
pub struct Geometry {
    rows: u8,
    width: LineWidth,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            rows: 2,
            width: LineWidth::Cols16,
        }
    }
}

impl Geometry {
    pub const fn new(rows: u8, width: LineWidth) -> Self {
        Self { rows, width }
    }

    pub const fn rows(&self) -> u8 {
        self.rows
    }

    pub const fn columns(&self) -> u8 {
        self.width.columns()
    }

    pub const fn width(&self) -> LineWidth {
        self.width
    }

    /// The set DDRAM address command for column 0 of `line`.
    pub const fn line_base(&self, line: LcdLine) -> u8 {
        match (line, self.width) {
            (LcdLine::One, _) => LCD_LINE_ADR1,
            (LcdLine::Two, _) => LCD_LINE_ADR2,
            (LcdLine::Three, LineWidth::Cols16) => LCD_LINE_ADR3_16,
            (LcdLine::Three, LineWidth::Cols20) => LCD_LINE_ADR3_20,
            (LcdLine::Four, LineWidth::Cols16) => LCD_LINE_ADR4_16,
            (LcdLine::Four, LineWidth::Cols20) => LCD_LINE_ADR4_20,
        }
    }

    /// The set DDRAM address command for `col` on `line`. Columns are zero-indexed and are not
    /// range checked.
    pub const fn address(&self, line: LcdLine, col: u8) -> u8 {
        self.line_base(line).wrapping_add(col)
    }

    /// The lines present on this display, in ascending order. Empty when `rows` is outside 1..=4.
    pub fn lines(&self) -> &'static [LcdLine] {
        match self.rows {
            1..=4 => &LCD_LINES[..self.rows as usize],
            _ => &[],
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
/// Common display sizes. This is a shortcut for building the `Geometry` for a physical display.
pub enum LcdDisplayType {
    /// 16x1 display
    Lcd16x1,
    /// 16x2 display
    Lcd16x2,
    /// 16x4 display
    Lcd16x4,
    /// 20x1 display
    Lcd20x1,
    /// 20x2 display
    Lcd20x2,
    /// 20x4 display
    Lcd20x4,
}

impl From<&LcdDisplayType> for &'static str {
    fn from(display_type: &LcdDisplayType) -> Self {
        match display_type {
            LcdDisplayType::Lcd16x1 => "16x1",
            LcdDisplayType::Lcd16x2 => "16x2",
            LcdDisplayType::Lcd16x4 => "16x4",
            LcdDisplayType::Lcd20x1 => "20x1",
            LcdDisplayType::Lcd20x2 => "20x2",
            LcdDisplayType::Lcd20x4 => "20x4",
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LcdDisplayType {
    fn format(&self, fmt: defmt::Formatter) {
        let msg: &'static str = From::from(self);
        defmt::write!(fmt, "{}", msg);
    }
}

#[cfg(feature = "ufmt")]
impl ufmt::uDisplay for LcdDisplayType {
    fn fmt<W>(&self, w: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: ufmt::uWrite + ?Sized,
    {
        let msg: &'static str = From::from(self);
        ufmt::uwrite!(w, "{}", msg)
    }
}

impl Display for LcdDisplayType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = From::from(self);
        write!(f, "{}", msg)
    }
}

impl LcdDisplayType {
    /// Get the number of rows for the display type
    pub const fn rows(&self) -> u8 {
        match self {
            LcdDisplayType::Lcd16x1 | LcdDisplayType::Lcd20x1 => 1,
            LcdDisplayType::Lcd16x2 | LcdDisplayType::Lcd20x2 => 2,
            LcdDisplayType::Lcd16x4 | LcdDisplayType::Lcd20x4 => 4,
        }
    }

    /// Get the number of columns for the display type
    pub const fn cols(&self) -> u8 {
        self.width().columns()
    }

    const fn width(&self) -> LineWidth {
        match self {
            LcdDisplayType::Lcd16x1 | LcdDisplayType::Lcd16x2 | LcdDisplayType::Lcd16x4 => {
                LineWidth::Cols16
            }
            LcdDisplayType::Lcd20x1 | LcdDisplayType::Lcd20x2 | LcdDisplayType::Lcd20x4 => {
                LineWidth::Cols20
            }
        }
    }
}

impl From<LcdDisplayType> for Geometry {
    fn from(display_type: LcdDisplayType) -> Self {
        Geometry::new(display_type.rows(), display_type.width())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_addresses_16_columns() {
        let geometry = Geometry::new(4, LineWidth::Cols16);
        assert_eq!(geometry.address(LcdLine::One, 5), 0x85);
        assert_eq!(geometry.address(LcdLine::Two, 0), 0xC0);
        assert_eq!(geometry.address(LcdLine::Three, 5), 0x95);
        assert_eq!(geometry.address(LcdLine::Four, 15), 0xDF);
    }

    #[test]
    fn test_line_addresses_20_columns() {
        let geometry = Geometry::new(4, LineWidth::Cols20);
        assert_eq!(geometry.address(LcdLine::One, 19), 0x93);
        assert_eq!(geometry.address(LcdLine::Two, 3), 0xC3);
        assert_eq!(geometry.address(LcdLine::Three, 5), 0x99);
        assert_eq!(geometry.address(LcdLine::Four, 19), 0xE7);
    }

    #[test]
    fn test_or_and_add_agree_for_valid_columns() {
        for width in [LineWidth::Cols16, LineWidth::Cols20] {
            let geometry = Geometry::new(4, width);
            for &line in LCD_LINES.iter() {
                for col in 0..width.columns() {
                    let base = geometry.line_base(line);
                    if line == LcdLine::One || line == LcdLine::Two || width == LineWidth::Cols16 {
                        assert_eq!(geometry.address(line, col), base | col);
                    }
                    assert_eq!(geometry.address(line, col), base + col);
                }
            }
        }
    }

    #[test]
    fn test_present_lines() {
        assert_eq!(Geometry::new(1, LineWidth::Cols16).lines(), &[LcdLine::One]);
        assert_eq!(
            Geometry::new(3, LineWidth::Cols20).lines(),
            &[LcdLine::One, LcdLine::Two, LcdLine::Three]
        );
        assert!(Geometry::new(0, LineWidth::Cols16).lines().is_empty());
        assert!(Geometry::new(5, LineWidth::Cols16).lines().is_empty());
    }

    #[test]
    fn test_line_width_from_columns() {
        assert_eq!(LineWidth::try_from(16), Ok(LineWidth::Cols16));
        assert_eq!(LineWidth::try_from(20), Ok(LineWidth::Cols20));
        assert!(LineWidth::try_from(8).is_err());
        assert!(LineWidth::try_from(40).is_err());
        assert_eq!(LcdLine::try_from(3), Ok(LcdLine::Three));
        assert!(LcdLine::try_from(0).is_err());
    }

    #[test]
    fn test_display_type_geometry() {
        let geometry: Geometry = LcdDisplayType::Lcd20x4.into();
        assert_eq!(geometry.rows(), 4);
        assert_eq!(geometry.columns(), 20);
        assert_eq!(LcdDisplayType::Lcd16x1.rows(), 1);
        assert_eq!(LcdDisplayType::Lcd16x2.cols(), 16);
        assert_eq!(Geometry::default(), Geometry::from(LcdDisplayType::Lcd16x2));
    }
}
