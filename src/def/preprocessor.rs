// SPDX-License-Identifier: MIT

//! Logical-line preprocessing.
//!
//! DEF statements may span several physical lines and end at a
//! semicolon. This pass strips comments, merges continuation lines
//! into one logical line each, and records the original starting line
//! so later warnings can point back into the file. Section bracket
//! lines (`END ...`, `DESIGN ...`) terminate a logical line even
//! without a semicolon.

/// One merged statement with its 1-based starting line in the file.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub text: String,
    pub line: usize,
}

/// Split `content` into logical lines.
pub fn preprocess(content: &str) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut start = 0usize;

    for (i, raw) in content.lines().enumerate() {
        let mut rest = strip_comment(raw).trim();
        if rest.is_empty() {
            // A blank line closes a dangling statement; this keeps
            // keyword-only lines like section headers from gluing to
            // whatever follows them.
            flush(&mut out, &mut current, start);
            continue;
        }

        // A physical line can carry several statements; each `;` ends
        // one.
        while !rest.is_empty() {
            if current.is_empty() {
                start = i + 1;
            } else {
                current.push(' ');
            }
            match rest.find(';') {
                Some(pos) => {
                    current.push_str(rest[..=pos].trim_end());
                    flush(&mut out, &mut current, start);
                    rest = rest[pos + 1..].trim_start();
                }
                None => {
                    current.push_str(rest);
                    // PROPERTYDEFINITIONS opens its section with a
                    // bare keyword, no semicolon.
                    let breaks = rest == "END"
                        || rest.starts_with("END ")
                        || rest == "DESIGN"
                        || rest.starts_with("DESIGN ")
                        || rest == "PROPERTYDEFINITIONS";
                    if breaks {
                        flush(&mut out, &mut current, start);
                    }
                    rest = "";
                }
            }
        }
    }
    flush(&mut out, &mut current, start);
    out
}

fn flush(out: &mut Vec<LogicalLine>, current: &mut String, start: usize) {
    if !current.is_empty() {
        out.push(LogicalLine {
            text: std::mem::take(current),
            line: start,
        });
    }
}

/// Comments run from a `#` at line start or preceded by whitespace.
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for i in 0..bytes.len() {
        if bytes[i] == b'#' && (i == 0 || bytes[i - 1] == b' ' || bytes[i - 1] == b'\t') {
            return &line[..i];
        }
    }
    line
}
