use terminal_size::{terminal_size, Height, Width};

use crate::qr::QrMatrix;

/// Modules of quiet zone drawn around the code.
const QUIET_ZONE: usize = 2;

fn terminal_dimensions() -> (usize, usize) {
    terminal_size()
        .map(|(Width(w), Height(h))| {
            if w < 40 || h < 30 {
                (120, 60)
            } else {
                (w as usize, h as usize)
            }
        })
        .unwrap_or((120, 60))
}

/// Whether the code fits the current terminal, leaving room for a header.
pub fn fits_in_terminal(matrix: &QrMatrix) -> bool {
    let (term_width, term_height) = terminal_dimensions();
    let with_quiet = matrix.width() + 2 * QUIET_ZONE;
    with_quiet <= term_width && (with_quiet + 1) / 2 + 6 <= term_height
}

/// Draw the matrix with half-block characters, two module rows per line.
///
/// With `center`, the block is padded to the middle of the terminal.
pub fn render_to_terminal(matrix: &QrMatrix, center: bool) -> String {
    let with_quiet = matrix.width() + 2 * QUIET_ZONE;
    let lines = (with_quiet + 1) / 2;

    let (pad_left, pad_top) = if center {
        let (term_width, term_height) = terminal_dimensions();
        (
            term_width.saturating_sub(with_quiet) / 2,
            term_height.saturating_sub(lines + 8) / 2,
        )
    } else {
        (0, 0)
    };

    let is_dark = |row: usize, col: usize| -> bool {
        matrix.is_dark(
            row as isize - QUIET_ZONE as isize,
            col as isize - QUIET_ZONE as isize,
        )
    };

    let mut result = "\n".repeat(pad_top);
    let left_pad = " ".repeat(pad_left);

    for line in 0..lines {
        let top_row = line * 2;
        let bottom_row = top_row + 1;

        result.push_str(&left_pad);
        for col in 0..with_quiet {
            let top_dark = is_dark(top_row, col);
            let bottom_dark = bottom_row < with_quiet && is_dark(bottom_row, col);

            result.push(match (top_dark, bottom_dark) {
                (true, true) => '█',
                (true, false) => '▀',
                (false, true) => '▄',
                (false, false) => ' ',
            });
        }
        result.push('\n');
    }

    result
}
