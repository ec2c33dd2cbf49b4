use std::io::{self, Write};

use super::{parse::Span, Source};

use ansi_term::Colour::Red;
use unicode_width::UnicodeWidthStr;

pub fn print_error<W: Write>(msg: &str, writer: &mut W) -> io::Result<()> {
    writer.write_all(msg.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

pub fn format_error(source: &Source, span: Span, msg: &str) -> String {
    let (line_nr, index) = find_line_index(source, span.start);

    format!(
        "error: {}\n--> {}:{}:{}\n{}",
        msg,
        source.name,
        line_nr,
        index,
        err_to_string(source, span, line_nr)
    )
}

pub fn find_line_index(source: &Source, start: usize) -> (usize, usize) {
    let slice = &source.code[..start];

    let line_nr = slice.chars().filter(|c| *c == '\n').count() + 1;
    let index = slice.chars().rev().take_while(|c| *c != '\n').count() + 1;

    (line_nr, index)
}

fn find_dist(source: &Source, start: usize) -> usize {
    let slice = &source.code[..start];

    UnicodeWidthStr::width(
        slice
            .chars()
            .rev()
            .take_while(|c| *c != '\n')
            .collect::<String>()
            .as_str(),
    )
}

fn err_to_string(source: &Source, span: Span, line_nr: usize) -> String {
    let (start_line, _) = find_line_index(source, span.start);
    let (end_line, _) = find_line_index(source, span.end);

    let start_line = start_line - 1;

    // the number of digits in the number displayed as string
    let len_line_nr = line_nr.to_string().len();
    let filler = " ".repeat(len_line_nr + 1);

    let len = UnicodeWidthStr::width(&source.code[span.start..span.end]) + 1;
    let dist = find_dist(source, span.start);

    let marker = format!("{}{}", " ".repeat(dist), "^".repeat(len));
    let marker = Red.paint(marker);

    let lines: Vec<String> = source
        .code
        .lines()
        .enumerate()
        .skip(start_line)
        .take(end_line - start_line)
        .map(|(nr, l)| {
            if nr + 1 == line_nr {
                format!("{}|\n{} |{}\n{}|{}", filler, line_nr, l, filler, marker)
            } else {
                format!("{}|{}", filler, l)
            }
        })
        .collect();

    lines.join("\n")
}
