/*!
Low-level layout helpers for help text: titled sections, and items
followed by their (wrapped, indented) descriptions.
 */

use core::fmt::{self, Display, Write};

use indent_write::fmt::IndentWriter;

/// Help text is wrapped to this many columns
pub const WIDTH: usize = 80;

/// Descriptions of items start at this column
const DESCRIPTION_COLUMN: usize = 24;

/// Write a section by writing a newline, then the `header`, then an
/// indented `body`.
pub fn section<O: Write + ?Sized, T>(
    out: &mut O,
    header: &str,
    body: impl FnOnce(IndentWriter<'_, &mut O>) -> Result<T, fmt::Error>,
) -> Result<T, fmt::Error> {
    writeln!(out, "\n{header}:")?;
    body(IndentWriter::new("  ", out))
}

/// Write an optional section, only if the iterator is not empty.
/// Otherwise identical to `section`.
pub fn maybe_section<O: Write + ?Sized, I: IntoIterator>(
    out: &mut O,
    header: &str,
    items: I,
    body: impl Fn(&mut IndentWriter<'_, &mut O>, I::Item) -> fmt::Result,
) -> fmt::Result {
    let mut items = items.into_iter();

    match items.next() {
        None => Ok(()),
        Some(first) => section(out, header, |mut out| {
            body(&mut out, first)?;
            items.try_for_each(|item| body(&mut out, item))
        }),
    }
}

/// Describe an item by printing the item, followed by its description.
///
/// If the item is short enough, the description starts on the same line,
/// aligned to a fixed column; otherwise it starts on the next line. Either
/// way it's wrapped to fit.
pub fn describe(out: &mut (impl Write + ?Sized), item: impl Display, description: &str) -> fmt::Result {
    let item = item.to_string();

    if description.is_empty() {
        return writeln!(out, "{item}");
    }

    // The enclosing section already indents by 2
    let column = DESCRIPTION_COLUMN - 2;
    let wrapped = textwrap::fill(description, WIDTH - DESCRIPTION_COLUMN);
    let width = item.chars().count();

    match column.checked_sub(width) {
        Some(space) if space >= 2 => {
            let mut lines = wrapped.lines();
            let first = lines.next().unwrap_or_default();
            writeln!(out, "{item}{:space$}{first}", "")?;

            let mut out = IndentWriter::new("                      ", out);
            lines.try_for_each(|line| writeln!(out, "{line}"))
        }
        _ => {
            writeln!(out, "{item}")?;
            let mut out = IndentWriter::new("                      ", out);
            writeln!(out, "{wrapped}")
        }
    }
}

/// Wrap a free-standing paragraph (or several) to the help width.
#[must_use]
pub fn paragraph(text: &str) -> String {
    textwrap::fill(text.trim(), WIDTH)
}
