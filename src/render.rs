use std::fmt::Write;

use crate::DpMatrix;

struct BoxChars {
    h: char,
    v: char,
    top: [char; 3],
    mid: [char; 3],
    bottom: [char; 3],
}

const UNICODE: BoxChars = BoxChars {
    h: '─',
    v: '│',
    top: ['┌', '┬', '┐'],
    mid: ['├', '┼', '┤'],
    bottom: ['└', '┴', '┘'],
};

const ASCII: BoxChars = BoxChars {
    h: '-',
    v: '|',
    top: ['+'; 3],
    mid: ['+'; 3],
    bottom: ['+'; 3],
};

/// Draws the matrix as a bordered grid. Columns are labelled with T, rows
/// with S, each preceded by `-` for the empty prefix.
pub fn render_matrix(matrix: &DpMatrix, s: &[u8], t: &[u8], unicode: bool) -> String {
    let chars = if unicode { &UNICODE } else { &ASCII };
    let num_w = matrix
        .as_slice()
        .iter()
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);
    let mut widths = vec![1];
    widths.extend(std::iter::repeat(num_w).take(matrix.cols()));

    let border = |ends: [char; 3]| {
        let mut line = String::new();
        line.push(ends[0]);
        for (k, w) in widths.iter().enumerate() {
            if k > 0 {
                line.push(ends[1]);
            }
            line.extend(std::iter::repeat(chars.h).take(w + 2));
        }
        line.push(ends[2]);
        line
    };
    let row_line = |cells: &[String]| {
        let mut line = String::new();
        line.push(chars.v);
        for (cell, w) in cells.iter().zip(&widths) {
            // Infallible for String
            let _ = write!(line, " {:>w$} ", cell, w = *w);
            line.push(chars.v);
        }
        line
    };
    let labels = |seq: &[u8]| -> Vec<String> {
        std::iter::once("-".to_string())
            .chain(seq.iter().map(|&b| (b as char).to_string()))
            .collect()
    };

    let mut out = String::new();
    out.push_str(&border(chars.top));
    out.push('\n');
    let mut header = vec![String::new()];
    header.extend(labels(t));
    out.push_str(&row_line(&header));
    out.push('\n');
    out.push_str(&border(chars.mid));
    out.push('\n');
    for (i, label) in labels(s).into_iter().enumerate().take(matrix.rows()) {
        let mut cells = vec![label];
        cells.extend(matrix.row(i).iter().map(|v| v.to_string()));
        out.push_str(&row_line(&cells));
        out.push('\n');
    }
    out.push_str(&border(chars.bottom));
    out.push('\n');
    out
}
