//! Tables
//!
//! The rounded table style shared by the receipt and the terminal listings.

use std::ops::Range;

use tabled::{
    builder::Builder,
    grid::{config::HorizontalLine, util::string::get_line_width},
    settings::{Alignment, Style, Theme, object::Columns},
};

/// Render rows with a header separator, right-aligning the `numeric` columns.
#[must_use]
pub fn render(builder: Builder, numeric: Range<usize>) -> String {
    let mut table = builder.build();
    let mut theme = Theme::from(Style::modern_rounded());

    theme.remove_horizontal_lines();
    theme.insert_horizontal_line(
        1,
        HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤')),
    );

    table.with(theme);
    table.modify(Columns::new(numeric), Alignment::right());

    table.to_string()
}

/// Terminal columns taken up by a single line of text.
///
/// Wide characters such as emoji count twice and ANSI escape sequences count for nothing.
#[must_use]
pub fn display_width(line: &str) -> usize {
    get_line_width(line)
}
